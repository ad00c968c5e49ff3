//! Mus-Bank: decoder for `.mus` sound banks and their `.sam` sample blobs
//!
//! A bank is a single binary file holding a fixed header followed by five
//! back-to-back tables (sequences, layers, waves, programs, presets) and the
//! raw sequence data. The wave payloads live in a separate sample blob and
//! are addressed by offset and size from the wave table.
//!
//! This crate decodes the tables, resolves the byte regions of every
//! sequence and wave, and hands them back as borrowed artifacts. Writing
//! files is left to the caller.
//!
//! # Bank Layout
//!
//! - Header: 12 × u32, the first being the `Mus!` magic
//! - Sequence table: `num_sequences` × (index, offset)
//! - Layer table: `num_programs + num_presets` × i32
//! - Wave table: `num_waves` × 52-byte entries
//! - Program table: `num_programs` entries, each followed by its zones
//! - Preset table: `num_presets` entries, each followed by its zones
//!
//! The magic is always stored big-endian. Every other multi-byte field is
//! little-endian, whichever [`Platform`] the bank was built for.
//!
//! # Usage
//!
//! ```ignore
//! use mus_bank::{extract_bank, parse_bank, Platform};
//!
//! let bank_data = std::fs::read("overland.mus").unwrap();
//! let sample_data = std::fs::read("overland.sam").unwrap();
//!
//! let bank = parse_bank(&bank_data, Platform::Pc).unwrap();
//! println!("Waves: {}", bank.waves.len());
//!
//! let extraction = extract_bank(&bank, &bank_data, &sample_data, "overland").unwrap();
//! for seq in &extraction.sequences {
//!     println!("  {}: {} bytes", seq.name, seq.data.len());
//! }
//! ```

mod ads;
mod bank;
mod cursor;
mod error;
mod extract;
mod listing;
mod parser;
mod region;

pub use ads::{build_ads, fix_adpcm_end_flag, AdsHeader, ADS_CODEC_PCM, ADS_CODEC_PSX_ADPCM};
pub use bank::{
    Envelope, FixedName, MusBank, MusHeader, Platform, PresetEntry, PresetZone, ProgramEntry,
    ProgramZone, SequenceEntry, WaveEntry,
};
pub use cursor::{Cursor, Endian};
pub use error::{MusError, RegionKind, Section};
pub use extract::{
    extract_bank, extract_sequences, extract_waves, sequence_artifact_name, wave_artifact_names,
    Artifact, Extraction, SEQUENCE_EXT,
};
pub use listing::{
    cents_tuning, pan_convert, percentage_to_decibels, secs_to_timecent, semitone_tuning,
    write_instrument_listing, write_sample_loop_info,
};
pub use parser::{
    parse_bank, parse_header, parse_layer_table, parse_preset_table, parse_program_table,
    parse_sequence_table, parse_wave_table,
};
pub use region::{resolve_sequence_regions, resolve_wave_regions, Region, Source};

// =============================================================================
// Constants
// =============================================================================

/// Bank magic, `Mus!` read as a big-endian u32
pub const MUS_MAGIC: u32 = 0x4D75_7321;

/// Byte order of every bank field after the magic
pub const BANK_ENDIAN: Endian = Endian::Little;

/// Size of the fixed header in bytes
pub const HEADER_SIZE: usize = 48;

/// Width of every fixed-size name field
pub const NAME_LEN: usize = 20;

// =============================================================================
// Record Sizes
// =============================================================================

/// Sequence table entry: index + offset
pub const SEQUENCE_ENTRY_SIZE: usize = 8;

/// Layer table entry
pub const LAYER_ENTRY_SIZE: usize = 4;

/// Wave table entry
pub const WAVE_ENTRY_SIZE: usize = 52;

/// Program entry, not counting its zones
pub const PROGRAM_ENTRY_SIZE: usize = 24;

/// Program zone
pub const PROGRAM_ZONE_SIZE: usize = 104;

/// Preset entry, not counting its zones
pub const PRESET_ENTRY_SIZE: usize = 32;

/// Preset zone
pub const PRESET_ZONE_SIZE: usize = 12;

// =============================================================================
// Tests
// =============================================================================
