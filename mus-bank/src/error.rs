//! MUS bank error types

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Table of the bank a decode step was working on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Sequences,
    Layers,
    Waves,
    Programs,
    ProgramZones,
    Presets,
    PresetZones,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Header => "header",
            Section::Sequences => "sequence table",
            Section::Layers => "layer table",
            Section::Waves => "wave table",
            Section::Programs => "program table",
            Section::ProgramZones => "program zone",
            Section::Presets => "preset table",
            Section::PresetZones => "preset zone",
        };
        f.write_str(name)
    }
}

/// Which kind of region failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Sequence,
    Wave,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionKind::Sequence => f.write_str("sequence"),
            RegionKind::Wave => f.write_str("wave"),
        }
    }
}

/// MUS bank decoding error types
#[derive(Debug, Error)]
pub enum MusError {
    /// Input file could not be loaded
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// First header field is not the "Mus!" signature
    #[error("Invalid MUS magic: 0x{actual:08X} (expected 0x{:08X})", crate::MUS_MAGIC)]
    InvalidMagic { actual: u32 },

    /// A read ran past the end of the buffer
    #[error("Truncated input at offset 0x{offset:X}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A resolved region has a negative length or leaves its buffer
    #[error("Malformed {kind} region #{index}: {reason}")]
    MalformedRegion {
        kind: RegionKind,
        index: usize,
        reason: String,
    },

    /// A nested failure, tagged with the table and record it happened in
    #[error("{section} #{index}")]
    Section {
        section: Section,
        index: usize,
        #[source]
        source: Box<MusError>,
    },
}

impl MusError {
    /// Wrap this error with the table and record index it occurred in
    pub fn in_section(self, section: Section, index: usize) -> Self {
        MusError::Section {
            section,
            index,
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping every `Section` wrapper
    pub fn root_cause(&self) -> &MusError {
        let mut err = self;
        while let MusError::Section { source, .. } = err {
            err = source;
        }
        err
    }

    /// Byte offset of the failed read, if this is (or wraps) a truncation
    pub fn offset(&self) -> Option<usize> {
        match self.root_cause() {
            MusError::TruncatedInput { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
