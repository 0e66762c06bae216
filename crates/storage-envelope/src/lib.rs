//! Line-oriented envelope persistence for sealed payloads.
//!
//! The persisted layout is four fields, one per line, in fixed order: owner
//! name, date (`YYYY-MM-DD`, local time at write), key text, payload bytes
//! followed by one line terminator. There is no header, no length prefix,
//! and no escaping: a payload containing line breaks spans several physical
//! lines but is still a single field. [`read_envelope`] accounts for that by
//! treating everything after the third line break as payload; a reader
//! splitting strictly by line count would misparse such files.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("failed to open {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },
    #[error("I/O failure on {}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },
    #[error("malformed envelope {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// An envelope read back from storage. Produced only by [`read_envelope`];
/// the write side takes the fields directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeRecord {
    pub name: String,
    pub date: String,
    pub key: String,
    pub payload: Vec<u8>,
}

/// Reads the whole file at `path` into one buffer, sized by content length.
///
/// Failure to open and failure to read are reported as distinct variants, so
/// an empty result always means an empty file.
pub fn read_payload(path: impl AsRef<Path>) -> Result<Vec<u8>, EnvelopeError> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|err| EnvelopeError::Open {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let mut payload = Vec::new();
    file.read_to_end(&mut payload)
        .map_err(|err| EnvelopeError::Io {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    Ok(payload)
}

/// Soft-failure form of [`read_payload`]: logs one diagnostic line and
/// yields an empty payload so a batch sequence keeps going.
///
/// Callers that need to tell "empty file" from "read failed" should call
/// [`read_payload`] instead.
pub fn read_payload_or_empty(path: impl AsRef<Path>) -> Vec<u8> {
    match read_payload(path.as_ref()) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("{err}");
            Vec::new()
        }
    }
}

/// Returns the text before the first line-break byte, lossily decoded, or an
/// empty string when the payload holds no line break.
#[must_use]
pub fn extract_name(payload: &[u8]) -> String {
    match payload.iter().position(|&b| b == b'\n') {
        Some(pos) => String::from_utf8_lossy(&payload[..pos]).into_owned(),
        None => String::new(),
    }
}

/// Writes the four-field envelope, replacing any previous file at `path`.
///
/// The target is truncated up front; a failure mid-write can leave a partial
/// file behind, there is no rollback. The handle is released on every exit
/// path.
pub fn write_envelope(
    path: impl AsRef<Path>,
    name: &str,
    key: &str,
    payload: &[u8],
) -> Result<(), EnvelopeError> {
    let path = path.as_ref();
    let date = Local::now().format("%Y-%m-%d");
    let mut file = File::create(path).map_err(|err| EnvelopeError::Open {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let io_error = |err: std::io::Error| EnvelopeError::Io {
        path: path.to_path_buf(),
        reason: err.to_string(),
    };
    writeln!(file, "{name}").map_err(io_error)?;
    writeln!(file, "{date}").map_err(io_error)?;
    writeln!(file, "{key}").map_err(io_error)?;
    file.write_all(payload).map_err(io_error)?;
    file.write_all(b"\n").map_err(io_error)?;
    Ok(())
}

/// Soft-failure form of [`write_envelope`]: logs the diagnostic and reports
/// the outcome through the return value instead of an error.
pub fn write_envelope_or_log(
    path: impl AsRef<Path>,
    name: &str,
    key: &str,
    payload: &[u8],
) -> bool {
    match write_envelope(path, name, key, payload) {
        Ok(()) => true,
        Err(err) => {
            warn!("{err}");
            false
        }
    }
}

/// Reads an envelope back from storage.
///
/// The first three lines are name, date, and key; everything after the third
/// line break is the payload field, minus the single trailing terminator
/// [`write_envelope`] appends. Payloads containing line breaks therefore
/// round-trip intact.
pub fn read_envelope(path: impl AsRef<Path>) -> Result<EnvelopeRecord, EnvelopeError> {
    let path = path.as_ref();
    let bytes = read_payload(path)?;
    let malformed = |reason: &str| EnvelopeError::Malformed {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let (name, rest) = split_line(&bytes).ok_or_else(|| malformed("missing name line"))?;
    let (date, rest) = split_line(rest).ok_or_else(|| malformed("missing date line"))?;
    let (key, rest) = split_line(rest).ok_or_else(|| malformed("missing key line"))?;
    let payload = match rest.split_last() {
        Some((&b'\n', body)) => body,
        _ => rest,
    };

    Ok(EnvelopeRecord {
        name: String::from_utf8_lossy(name).into_owned(),
        date: String::from_utf8_lossy(date).into_owned(),
        key: String::from_utf8_lossy(key).into_owned(),
        payload: payload.to_vec(),
    })
}

fn split_line(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    bytes
        .iter()
        .position(|&b| b == b'\n')
        .map(|pos| (&bytes[..pos], &bytes[pos + 1..]))
}
