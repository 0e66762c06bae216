use std::fs;

use codec_stream::StreamCodec;
use regex::Regex;
use storage_envelope::{extract_name, read_envelope, read_payload, write_envelope};

#[test]
fn hello_world_seals_and_opens_through_storage() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let input = dir.path().join("input.txt");
    let sealed_path = dir.path().join("sealed.txt");
    let opened_path = dir.path().join("opened.txt");
    fs::write(&input, "Hello\nWorld").expect("seed input");

    let payload = read_payload(&input).expect("read input");
    let owner = extract_name(&payload);
    assert_eq!(owner, "Hello");

    let codec = StreamCodec::new("key").expect("key ok");
    let sealed = codec.transform(&payload).expect("seal");
    assert_ne!(sealed, payload);
    write_envelope(&sealed_path, &owner, "key", &sealed).expect("persist sealed");

    let stored = read_envelope(&sealed_path).expect("read sealed envelope");
    assert_eq!(stored.payload, sealed);

    let recovered = codec.transform(&stored.payload).expect("open");
    assert_eq!(recovered, b"Hello\nWorld");
    write_envelope(&opened_path, &owner, "key", &recovered).expect("persist recovered");

    let reopened = read_envelope(&opened_path).expect("read recovered envelope");
    assert_eq!(reopened.payload, b"Hello\nWorld");
    assert_eq!(reopened.name, "Hello");
    assert_eq!(reopened.key, "key");
}

#[test]
fn persisted_envelopes_carry_a_dated_metadata_block() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let path = dir.path().join("sealed.txt");

    let codec = StreamCodec::new("password").expect("key ok");
    let payload = b"Alice\nJury mast coxswain measured fer yer chains";
    let sealed = codec.transform(payload).expect("seal");
    write_envelope(&path, &extract_name(payload), "password", &sealed).expect("persist");

    let record = read_envelope(&path).expect("read back");
    assert_eq!(record.name, "Alice");
    assert_eq!(record.key, "password");
    let date = Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("pattern");
    assert!(date.is_match(&record.date), "bad date field: {}", record.date);
}

#[test]
fn sequence_survives_a_missing_input_without_panicking() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let missing = dir.path().join("absent.txt");

    let payload = storage_envelope::read_payload_or_empty(&missing);
    assert!(payload.is_empty());
    assert_eq!(extract_name(&payload), "");

    let codec = StreamCodec::new("key").expect("key ok");
    assert!(codec.transform(&payload).is_err());
}
