//! Bank extraction pipeline (.mus + .sam -> output directory)
//!
//! Decodes the whole bank before anything is written, so a broken input
//! never leaves a half-filled output directory behind.

use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use mus_bank::{
    build_ads, extract_bank, parse_bank, write_instrument_listing, write_sample_loop_info, MusBank,
    MusError, Platform,
};

/// Subdirectory for extracted sequences
pub const SEQUENCES_DIR: &str = "sequences";

/// Subdirectory for extracted wave payloads
pub const SAMPLES_DIR: &str = "samples";

/// How wave payloads are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SampleFormat {
    /// Payload bytes exactly as stored in the sample file (`.bin`)
    #[default]
    Raw,
    /// Payload wrapped in an ADS header (`.ads`)
    Ads,
}

impl SampleFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SampleFormat::Raw => "bin",
            SampleFormat::Ads => "ads",
        }
    }
}

/// Everything a single extraction run needs besides the input paths
#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    pub platform: Platform,
    /// Output directory; defaults to the bank path without its extension
    pub output_dir: Option<PathBuf>,
    pub sample_format: SampleFormat,
    /// Write `<stem>.txt` and `<stem>_smploopinfo.txt`
    pub write_listing: bool,
    /// Replace existing `sequences/` and `samples/` directories
    pub force: bool,
}

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub output_dir: PathBuf,
    pub sequences: usize,
    pub waves: usize,
}

/// Load a whole input file into memory
pub fn read_buffer(path: &Path) -> Result<Vec<u8>, MusError> {
    fs::read(path).map_err(|source| MusError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `overland.mus` -> `overland/` next to it
pub fn default_output_dir(bank_path: &Path) -> PathBuf {
    bank_path.with_extension("")
}

fn bank_stem(bank_path: &Path) -> Result<String> {
    let stem = bank_path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("Bank path has no usable file name: {:?}", bank_path))?;
    Ok(stem.to_string())
}

/// Run the full extraction for one bank
///
/// # Arguments
/// * `bank_path` - Path to the `.mus` bank
/// * `sample_path` - Path to the matching `.sam` sample file
/// * `config` - Extraction options
pub fn run(bank_path: &Path, sample_path: &Path, config: &ExtractConfig) -> Result<Summary> {
    let stem = bank_stem(bank_path)?;
    let output_dir = config
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(bank_path));
    if output_dir == bank_path {
        bail!(
            "Default output directory would replace the bank itself: {:?} (use --output)",
            bank_path
        );
    }

    let bank_data = read_buffer(bank_path)?;
    let sample_data = read_buffer(sample_path)?;
    tracing::info!(
        "Loaded {:?} ({} bytes) and {:?} ({} bytes)",
        bank_path,
        bank_data.len(),
        sample_path,
        sample_data.len()
    );

    let bank = parse_bank(&bank_data, config.platform)
        .with_context(|| format!("Failed to decode bank: {:?}", bank_path))?;
    log_bank(&bank);

    let extraction = extract_bank(&bank, &bank_data, &sample_data, &stem)
        .with_context(|| format!("Failed to resolve regions of {:?}", bank_path))?;

    let sequences_dir = output_dir.join(SEQUENCES_DIR);
    let samples_dir = output_dir.join(SAMPLES_DIR);
    prepare_output_dirs(&[&sequences_dir, &samples_dir], config.force)?;

    for artifact in &extraction.sequences {
        write_file(&sequences_dir.join(&artifact.name), artifact.data)?;
    }

    let ext = config.sample_format.extension();
    for (artifact, wave) in extraction.waves.iter().zip(&bank.waves) {
        let path = samples_dir.join(format!("{}.{}", artifact.name, ext));
        match config.sample_format {
            SampleFormat::Raw => write_file(&path, artifact.data)?,
            SampleFormat::Ads => {
                let ads = build_ads(bank.platform, wave.sample_rate, artifact.data);
                write_file(&path, &ads)?;
            }
        }
    }

    if config.write_listing {
        let loop_path = output_dir.join(format!("{}_smploopinfo.txt", stem));
        let mut writer = create_writer(&loop_path)?;
        write_sample_loop_info(&mut writer, &bank.waves)
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to write {:?}", loop_path))?;

        let listing_path = output_dir.join(format!("{}.txt", stem));
        let mut writer = create_writer(&listing_path)?;
        write_instrument_listing(&mut writer, &bank, &stem)
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to write {:?}", listing_path))?;
    }

    tracing::info!(
        "Extracted {} sequences and {} waves to {:?}",
        extraction.sequences.len(),
        extraction.waves.len(),
        output_dir
    );

    Ok(Summary {
        output_dir,
        sequences: extraction.sequences.len(),
        waves: extraction.waves.len(),
    })
}

/// Create the artifact directories, clearing stale ones under `force`
///
/// Only these directories are ever removed; the rest of the output
/// directory (inputs included) is left alone and listings are overwritten.
fn prepare_output_dirs(dirs: &[&Path], force: bool) -> Result<()> {
    if let Some(existing) = dirs.iter().find(|dir| dir.exists()) {
        if !force {
            bail!(
                "Output already exists: {:?} (use --force to replace it)",
                existing
            );
        }
    }

    for dir in dirs {
        if dir.exists() {
            if !dir.is_dir() {
                bail!("Output path exists and is not a directory: {:?}", dir);
            }
            tracing::warn!("Replacing existing directory {:?}", dir);
            fs::remove_dir_all(dir).with_context(|| format!("Failed to remove {:?}", dir))?;
        }
        create_dir(dir)?;
    }
    Ok(())
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))
}

fn create_writer(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Failed to create output: {:?}", path))?;
    Ok(BufWriter::new(file))
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Wrote {:?} ({} bytes)", path, data.len());
    Ok(())
}

/// Dump every decoded table at debug level
fn log_bank(bank: &MusBank) {
    let h = &bank.header;
    tracing::debug!(
        "Header: version {}, reverb volume {} type {} multiply {}",
        h.version_number,
        h.reverb_volume,
        h.reverb_type,
        h.reverb_multiply
    );
    tracing::debug!(
        "Header: {} sequences, {} labels at 0x{:X}, {} waves, {} programs, {} presets",
        h.num_sequences,
        h.num_labels,
        h.offset_to_labels_offsets_table,
        h.num_waves,
        h.num_programs,
        h.num_presets
    );

    for seq in &bank.sequences {
        tracing::debug!("Sequence {}: offset 0x{:X}", seq.index, seq.offset);
    }
    for (i, layer) in bank.layers.iter().enumerate() {
        tracing::debug!("Layer #{}: {}", i, layer);
    }
    for (i, wave) in bank.waves.iter().enumerate() {
        tracing::debug!(
            "Wave #{} '{}': offset 0x{:X}, {} bytes, {} Hz, key {}, loop {}..{} ({})",
            i,
            wave.name,
            wave.offset,
            wave.size,
            wave.sample_rate,
            wave.root_key(),
            wave.loop_begin,
            wave.loop_end,
            wave.loop_info
        );
    }
    for (i, program) in bank.programs.iter().enumerate() {
        tracing::debug!("Program #{} '{}': {} zones", i, program.name, program.num_zones);
        for zone in &program.zones {
            tracing::debug!(
                "  wave {}, keys {}..{}, velocity {}..{}, root {}",
                zone.wave_index,
                zone.note_low,
                zone.note_high,
                zone.velocity_low,
                zone.velocity_high,
                zone.root_key
            );
        }
    }
    for (i, preset) in bank.presets.iter().enumerate() {
        tracing::debug!(
            "Preset #{} '{}': bank {}, program {}, {} zones",
            i,
            preset.name,
            preset.midi_bank_number,
            preset.midi_preset_number,
            preset.num_zones
        );
        for zone in &preset.zones {
            tracing::debug!(
                "  program {}, keys {}..{}, velocity {}..{}",
                zone.program_index,
                zone.note_low,
                zone.note_high,
                zone.velocity_low,
                zone.velocity_high
            );
        }
    }
}
