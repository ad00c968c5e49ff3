//! Integration tests for demus
//!
//! Tests the full pipeline: synthesize bank -> run demus -> verify output tree

mod bank_generator;

use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

use bank_generator::{SAMPLE_LEN, SEQUENCE_0};

fn demus(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_demus"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to run demus")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "demus failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Test a PC bank end to end with the default options
#[test]
fn test_extract_pc_bank() {
    let dir = tempdir().expect("Failed to create temp dir");
    bank_generator::write_pair(dir.path(), "overland").expect("Failed to write bank");

    let output = demus(dir.path(), &["overland.mus", "overland.sam"]);
    assert_success(&output);

    let out = dir.path().join("overland");
    let samples = bank_generator::build_samples();

    let seq0 = std::fs::read(out.join("sequences/overland_0000.msq")).unwrap();
    assert_eq!(seq0, SEQUENCE_0);

    // Second sequence starts at the labels table: empty, but still written
    let seq1 = std::fs::read(out.join("sequences/overland_0001.msq")).unwrap();
    assert!(seq1.is_empty());

    let flute = std::fs::read(out.join("samples/Flute.bin")).unwrap();
    assert_eq!(flute, &samples[0..16]);
    let drum = std::fs::read(out.join("samples/Drum.bin")).unwrap();
    assert_eq!(drum, &samples[16..SAMPLE_LEN]);

    let loops = std::fs::read_to_string(out.join("overland_smploopinfo.txt")).unwrap();
    assert_eq!(loops, "2 5 Flute.wav\n");

    let listing = std::fs::read_to_string(out.join("overland.txt")).unwrap();
    assert!(listing.starts_with("[Samples]\r\n"));
    assert!(listing.contains(
        "    SampleName=Drum\r\n        SampleRate=11025\r\n        Key=60\r\n"
    ));
    assert!(listing.contains("    InstrumentName=Lead\r\n"));
    assert!(listing.contains(
        "        Sample=Flute\r\n            Z_coarseTune=1\r\n            Z_fineTune=50\r\n"
    ));
    assert!(listing.contains(
        "    PresetName=Solo\r\n        Bank=0\r\n        Program=73\r\n"
    ));
    assert!(listing.contains("        Instrument=Lead\r\n"));
    assert!(listing.ends_with("Name=overland\r\nEditor=Demus\r\n"));
}

/// Test a console bank written as ADS containers
#[test]
fn test_extract_console_bank_as_ads() {
    let dir = tempdir().expect("Failed to create temp dir");
    bank_generator::write_pair(dir.path(), "town").expect("Failed to write bank");

    let output = demus(
        dir.path(),
        &[
            "town.mus",
            "town.sam",
            "--console",
            "--format",
            "ads",
            "-o",
            "extracted",
        ],
    );
    assert_success(&output);

    let out = dir.path().join("extracted");
    assert!(!dir.path().join("town").exists());

    let flute = std::fs::read(out.join("samples/Flute.ads")).unwrap();
    assert_eq!(flute.len(), 40 + 16);
    assert_eq!(&flute[0..4], b"SShd");
    assert_eq!(flute[8], 0x10);
    assert_eq!(&flute[12..16], &22050u32.to_le_bytes());
    assert_eq!(&flute[32..36], b"SSbd");
    assert_eq!(&flute[40..], &bank_generator::build_samples()[0..16]);

    let seq0 = std::fs::read(out.join("sequences/town_0000.msq")).unwrap();
    assert_eq!(seq0, SEQUENCE_0);
}

/// The platform flag changes sample handling only, never the table layout
#[test]
fn test_console_flag_decodes_the_same_tables() {
    let dir = tempdir().expect("Failed to create temp dir");
    bank_generator::write_pair(dir.path(), "bank").expect("Failed to write bank");

    assert_success(&demus(dir.path(), &["bank.mus", "bank.sam", "-o", "pc"]));
    assert_success(&demus(dir.path(), &["bank.mus", "bank.sam", "-c", "-o", "console"]));

    for file in [
        "sequences/bank_0000.msq",
        "sequences/bank_0001.msq",
        "samples/Flute.bin",
        "samples/Drum.bin",
        "bank.txt",
        "bank_smploopinfo.txt",
    ] {
        let pc = std::fs::read(dir.path().join("pc").join(file)).unwrap();
        let console = std::fs::read(dir.path().join("console").join(file)).unwrap();
        assert_eq!(pc, console, "{file} differs between platforms");
    }
}

#[test]
fn test_bad_magic_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    bank_generator::write_pair(dir.path(), "bank").expect("Failed to write bank");

    let mut data = bank_generator::build_bank();
    data[0..4].copy_from_slice(b"RIFF");
    std::fs::write(dir.path().join("bank.mus"), data).unwrap();

    let output = demus(dir.path(), &["bank.mus", "bank.sam"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid MUS magic"), "stderr: {stderr}");
    assert!(!dir.path().join("bank").exists());
}

#[test]
fn test_truncated_bank_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    bank_generator::write_pair(dir.path(), "bank").expect("Failed to write bank");

    // Cut inside the first wave entry
    let data = bank_generator::build_bank();
    std::fs::write(dir.path().join("bank.mus"), &data[..100]).unwrap();

    let output = demus(dir.path(), &["bank.mus", "bank.sam"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("wave table #0"), "stderr: {stderr}");
    assert!(stderr.contains("Truncated input"), "stderr: {stderr}");
}

#[test]
fn test_missing_arguments_fail() {
    let dir = tempdir().expect("Failed to create temp dir");

    let output = demus(dir.path(), &["only-one.mus"]);
    assert!(!output.status.success());
}

#[test]
fn test_existing_output_needs_force() {
    let dir = tempdir().expect("Failed to create temp dir");
    bank_generator::write_pair(dir.path(), "bank").expect("Failed to write bank");

    assert_success(&demus(dir.path(), &["bank.mus", "bank.sam"]));

    let stale = dir.path().join("bank/sequences/stale.msq");
    std::fs::write(&stale, "old").unwrap();

    let output = demus(dir.path(), &["bank.mus", "bank.sam"]);
    assert!(!output.status.success());
    assert!(stale.exists());

    assert_success(&demus(dir.path(), &["bank.mus", "bank.sam", "--force"]));
    assert!(!stale.exists());
    assert!(dir.path().join("bank/sequences/bank_0000.msq").exists());
}

/// Extracting next to the inputs with --force clears only the artifact dirs
#[test]
fn test_force_into_input_dir_keeps_inputs() {
    let dir = tempdir().expect("Failed to create temp dir");
    let work = dir.path().join("work");
    std::fs::create_dir(&work).unwrap();
    bank_generator::write_pair(&work, "bank").expect("Failed to write bank");
    std::fs::write(work.join("notes.txt"), "keep me").unwrap();

    let args = ["work/bank.mus", "work/bank.sam", "-o", "work", "--force"];
    assert_success(&demus(dir.path(), &args));
    std::fs::write(work.join("samples/stale.bin"), "old").unwrap();
    assert_success(&demus(dir.path(), &args));

    assert_eq!(std::fs::read(work.join("bank.mus")).unwrap(), bank_generator::build_bank());
    assert_eq!(std::fs::read(work.join("bank.sam")).unwrap(), bank_generator::build_samples());
    assert_eq!(std::fs::read_to_string(work.join("notes.txt")).unwrap(), "keep me");

    assert!(!work.join("samples/stale.bin").exists());
    assert!(work.join("samples/Flute.bin").exists());
    assert!(work.join("sequences/bank_0000.msq").exists());
    assert!(work.join("bank.txt").exists());
}

#[test]
fn test_no_listing() {
    let dir = tempdir().expect("Failed to create temp dir");
    bank_generator::write_pair(dir.path(), "bank").expect("Failed to write bank");

    assert_success(&demus(dir.path(), &["bank.mus", "bank.sam", "--no-listing", "-d"]));

    let out = dir.path().join("bank");
    assert!(out.join("samples/Flute.bin").exists());
    assert!(!out.join("bank.txt").exists());
    assert!(!out.join("bank_smploopinfo.txt").exists());
}
