//! Sequence and wave extraction
//!
//! Turns resolved regions into named artifacts borrowing from the input
//! buffers. Nothing is transformed here: an artifact's bytes are exactly
//! the region's bytes, and writing them out is left to the caller.

use std::collections::HashSet;

use crate::bank::{MusBank, WaveEntry};
use crate::error::{MusError, RegionKind};
use crate::region::{resolve_sequence_regions, resolve_wave_regions, Region};

/// File extension of extracted sequences
pub const SEQUENCE_EXT: &str = "msq";

/// Named slice of one of the input buffers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact<'a> {
    pub name: String,
    pub data: &'a [u8],
}

/// All artifacts of one bank
#[derive(Debug, Clone)]
pub struct Extraction<'a> {
    pub sequences: Vec<Artifact<'a>>,
    pub waves: Vec<Artifact<'a>>,
}

/// Name of the `index`th sequence of a bank, e.g. `overland_0003.msq`
pub fn sequence_artifact_name(base_name: &str, index: usize) -> String {
    format!("{base_name}_{index:04}.{SEQUENCE_EXT}")
}

/// File-safe names for every wave, without extension
///
/// Names that sanitize to nothing become `wave_NNNN`, and a name that is
/// already taken gets the wave index appended, so every wave keeps its own
/// output file.
pub fn wave_artifact_names(waves: &[WaveEntry]) -> Vec<String> {
    let mut taken = HashSet::with_capacity(waves.len());

    waves
        .iter()
        .enumerate()
        .map(|(index, wave)| {
            let mut name = wave.name.sanitized();
            if name.is_empty() {
                name = format!("wave_{index:04}");
            }
            while taken.contains(&name) {
                name = format!("{name}_{index}");
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

fn slice_region<'a>(
    region: &Region,
    buffer: &'a [u8],
    kind: RegionKind,
    index: usize,
) -> Result<&'a [u8], MusError> {
    region.slice(buffer).ok_or_else(|| MusError::MalformedRegion {
        kind,
        index,
        reason: format!(
            "0x{:X}..0x{:X} is outside the buffer (0x{:X} bytes)",
            region.start,
            region.end(),
            buffer.len()
        ),
    })
}

/// Cut one artifact per sequence region out of the bank buffer
pub fn extract_sequences<'a>(
    regions: &[Region],
    bank: &'a [u8],
    base_name: &str,
) -> Result<Vec<Artifact<'a>>, MusError> {
    regions
        .iter()
        .enumerate()
        .map(|(index, region)| {
            Ok(Artifact {
                name: sequence_artifact_name(base_name, index),
                data: slice_region(region, bank, RegionKind::Sequence, index)?,
            })
        })
        .collect()
}

/// Cut one artifact per wave region out of the sample buffer
///
/// `regions` and `waves` are parallel, as returned by
/// [`resolve_wave_regions`].
pub fn extract_waves<'a>(
    regions: &[Region],
    waves: &[WaveEntry],
    samples: &'a [u8],
) -> Result<Vec<Artifact<'a>>, MusError> {
    regions
        .iter()
        .zip(wave_artifact_names(waves))
        .enumerate()
        .map(|(index, (region, name))| {
            Ok(Artifact {
                name,
                data: slice_region(region, samples, RegionKind::Wave, index)?,
            })
        })
        .collect()
}

/// Resolve and extract every sequence and wave of a decoded bank
///
/// # Arguments
/// * `bank` - Decoded bank tables
/// * `bank_data` - The bank buffer the tables were decoded from
/// * `sample_data` - The matching sample blob
/// * `base_name` - Prefix for sequence names, usually the bank's file stem
pub fn extract_bank<'a>(
    bank: &MusBank,
    bank_data: &'a [u8],
    sample_data: &'a [u8],
    base_name: &str,
) -> Result<Extraction<'a>, MusError> {
    let sequence_regions = resolve_sequence_regions(
        &bank.sequences,
        bank.header.offset_to_labels_offsets_table,
        bank_data.len(),
    )?;
    for (i, region) in sequence_regions.iter().enumerate() {
        tracing::debug!("Sequence #{}: 0x{:X} + 0x{:X}", i, region.start, region.len);
    }

    let wave_regions = resolve_wave_regions(&bank.waves, sample_data.len())?;
    for (i, region) in wave_regions.iter().enumerate() {
        tracing::debug!("Wave #{}: 0x{:X} + 0x{:X}", i, region.start, region.len);
    }

    Ok(Extraction {
        sequences: extract_sequences(&sequence_regions, bank_data, base_name)?,
        waves: extract_waves(&wave_regions, &bank.waves, sample_data)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::FixedName;
    use crate::region::Source;

    fn wave(name: &str) -> WaveEntry {
        WaveEntry {
            name: FixedName::from_str_truncated(name),
            offset: 0,
            loop_begin: 0,
            size: 0,
            loop_end: 0,
            sample_rate: 22050,
            original_pitch: 0,
            loop_info: 0,
            snd_handle: 0,
        }
    }

    #[test]
    fn test_sequence_names_are_zero_padded() {
        assert_eq!(sequence_artifact_name("overland", 3), "overland_0003.msq");
        assert_eq!(sequence_artifact_name("town", 12345), "town_12345.msq");
    }

    #[test]
    fn test_wave_names() {
        let waves = [wave("Kick  "), wave(""), wave("Kick"), wave("a/b")];
        assert_eq!(
            wave_artifact_names(&waves),
            vec!["Kick", "wave_0001", "Kick_2", "a"]
        );
    }

    #[test]
    fn test_extract_sequences_copies_exact_bytes() {
        let bank: Vec<u8> = (0..32).collect();
        let regions = [
            Region {
                source: Source::Bank,
                start: 4,
                len: 4,
            },
            Region {
                source: Source::Bank,
                start: 8,
                len: 0,
            },
        ];

        let artifacts = extract_sequences(&regions, &bank, "song").unwrap();
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].name, "song_0000.msq");
        assert_eq!(artifacts[0].data, &[4, 5, 6, 7]);
        assert_eq!(artifacts[1].name, "song_0001.msq");
        assert!(artifacts[1].data.is_empty());
    }

    #[test]
    fn test_extract_waves_outside_buffer() {
        let samples = [0u8; 8];
        let regions = [Region {
            source: Source::Samples,
            start: 4,
            len: 8,
        }];
        let err = extract_waves(&regions, &[wave("x")], &samples).unwrap_err();
        assert!(matches!(
            err,
            MusError::MalformedRegion {
                kind: RegionKind::Wave,
                index: 0,
                ..
            }
        ));
    }
}
