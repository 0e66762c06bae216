//! Seal/open demonstration binary.
//!
//! Runs one full pass over a plaintext payload file: read it, take the first
//! line as the owner name, seal the bytes with a repeating key, persist the
//! sealed envelope, apply the same transform again, and persist the recovered
//! envelope. Storage failures are logged and the pass keeps going; a payload
//! or key the codec rejects aborts the run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use codec_stream::StreamCodec;
use storage_envelope::{extract_name, read_payload_or_empty, write_envelope_or_log};

#[derive(Debug, Parser)]
#[command(author, version, about = "Seal a payload file into an envelope and open it again")]
struct Args {
    /// Plaintext input whose first line names the payload owner.
    #[arg(long, default_value = "inputdatafile.txt")]
    input: PathBuf,

    /// Envelope written with the sealed payload.
    #[arg(long, default_value = "encrypteddatafile.txt")]
    sealed: PathBuf,

    /// Envelope written with the recovered payload.
    #[arg(long, default_value = "decrypteddatafile.txt")]
    opened: PathBuf,

    /// Repeating key applied to the payload bytes.
    #[arg(long, default_value = "password")]
    key: String,

    /// Emit a JSON run summary on stdout.
    #[arg(long)]
    summary: bool,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    input: PathBuf,
    sealed: PathBuf,
    opened: PathBuf,
    owner: String,
    payload_bytes: usize,
    sealed_written: bool,
    opened_written: bool,
}

fn run(args: &Args) -> Result<RunSummary> {
    let payload = read_payload_or_empty(&args.input);
    let owner = extract_name(&payload);

    let codec = StreamCodec::new(args.key.as_bytes())
        .with_context(|| format!("building codec for key of {} bytes", args.key.len()))?;
    let sealed = codec
        .transform(&payload)
        .with_context(|| format!("sealing payload from {}", args.input.display()))?;
    let sealed_written = write_envelope_or_log(&args.sealed, &owner, &args.key, &sealed);

    let recovered = codec.transform(&sealed).context("opening sealed payload")?;
    let opened_written = write_envelope_or_log(&args.opened, &owner, &args.key, &recovered);

    Ok(RunSummary {
        input: args.input.clone(),
        sealed: args.sealed.clone(),
        opened: args.opened.clone(),
        owner,
        payload_bytes: payload.len(),
        sealed_written,
        opened_written,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let summary = run(&args)?;
    if args.summary {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serialising run summary")?
        );
    } else {
        println!(
            "sealed envelope: {}\nrecovered envelope: {}",
            summary.sealed.display(),
            summary.opened.display()
        );
    }
    Ok(())
}
