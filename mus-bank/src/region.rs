//! Byte ranges of sequences and wave payloads
//!
//! Sequences have no stored length: each one runs up to the start of the
//! next, and the last one up to the labels table offset from the header.
//! Waves carry their own offset and size into the sample blob.

use crate::bank::{SequenceEntry, WaveEntry};
use crate::error::{MusError, RegionKind};

/// Buffer a region points into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The `.mus` bank file
    Bank,
    /// The `.sam` sample blob
    Samples,
}

/// Resolved byte range within one of the two input buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub source: Source,
    pub start: usize,
    pub len: usize,
}

impl Region {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Borrow the region's bytes, or `None` if it does not fit in `buffer`
    pub fn slice<'a>(&self, buffer: &'a [u8]) -> Option<&'a [u8]> {
        buffer.get(self.start..self.end())
    }
}

fn malformed(kind: RegionKind, index: usize, reason: String) -> MusError {
    MusError::MalformedRegion {
        kind,
        index,
        reason,
    }
}

/// Resolve one region per sequence entry
///
/// Offsets must be non-decreasing and the boundary must not come before the
/// last entry; every region must also lie within the bank.
///
/// # Arguments
/// * `entries` - Sequence index table, in table order
/// * `boundary` - `offset_to_labels_offsets_table` from the header
/// * `bank_len` - Length of the bank buffer
pub fn resolve_sequence_regions(
    entries: &[SequenceEntry],
    boundary: u32,
    bank_len: usize,
) -> Result<Vec<Region>, MusError> {
    let mut regions = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let start = entry.offset as usize;
        let end = entries
            .get(index + 1)
            .map_or(boundary, |next| next.offset) as usize;

        let len = end.checked_sub(start).ok_or_else(|| {
            malformed(
                RegionKind::Sequence,
                index,
                format!("ends at 0x{end:X} before it starts at 0x{start:X}"),
            )
        })?;

        if end > bank_len {
            return Err(malformed(
                RegionKind::Sequence,
                index,
                format!("ends at 0x{end:X}, past the end of the bank (0x{bank_len:X} bytes)"),
            ));
        }

        regions.push(Region {
            source: Source::Bank,
            start,
            len,
        });
    }

    Ok(regions)
}

/// Resolve one region per wave entry
///
/// Each wave's range comes straight from its own offset and size, so entries
/// are independent of each other and may overlap.
pub fn resolve_wave_regions(
    waves: &[WaveEntry],
    sample_len: usize,
) -> Result<Vec<Region>, MusError> {
    waves
        .iter()
        .enumerate()
        .map(|(index, wave)| {
            let start = wave.offset as usize;
            let len = wave.size as usize;
            match start.checked_add(len) {
                Some(end) if end <= sample_len => Ok(Region {
                    source: Source::Samples,
                    start,
                    len,
                }),
                _ => Err(malformed(
                    RegionKind::Wave,
                    index,
                    format!(
                        "0x{start:X} + 0x{len:X} is past the end of the sample data \
                         (0x{sample_len:X} bytes)"
                    ),
                )),
            }
        })
        .collect()
}
