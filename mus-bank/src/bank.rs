//! MUS bank data structures

use std::fmt;

use crate::cursor::Endian;
use crate::{HEADER_SIZE, NAME_LEN};

/// Platform a bank was built for
///
/// Banks share one table layout on every platform. The platform only
/// decides the codec of the sample payloads the wave table points at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Platform {
    /// 16-bit PCM samples
    #[default]
    Pc,
    /// PS-ADPCM samples
    Console,
}

/// Fixed-capacity name field as stored in wave, program and preset records
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedName([u8; NAME_LEN]);

impl FixedName {
    pub const fn new(raw: [u8; NAME_LEN]) -> Self {
        Self(raw)
    }

    /// Build a name from a string, truncating to the field width
    pub fn from_str_truncated(s: &str) -> Self {
        let mut raw = [0u8; NAME_LEN];
        let len = s.len().min(NAME_LEN);
        raw[..len].copy_from_slice(&s.as_bytes()[..len]);
        Self(raw)
    }

    /// All 20 bytes, including anything after the terminator
    pub fn raw(&self) -> &[u8; NAME_LEN] {
        &self.0
    }

    /// Bytes up to the first NUL, or the whole field if there is none
    pub fn as_bytes(&self) -> &[u8] {
        let len = self.0.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        &self.0[..len]
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    /// Filesystem-safe form of the name
    ///
    /// Keeps the leading run of printable ASCII that is legal in a file name
    /// and drops trailing spaces. Banks often leave stale bytes after the
    /// terminator, so everything from the first illegal byte on is ignored.
    pub fn sanitized(&self) -> String {
        let len = self
            .0
            .iter()
            .position(|&b| !is_name_char(b))
            .unwrap_or(NAME_LEN);
        let kept = &self.0[..len];
        let trimmed = kept.len() - kept.iter().rev().take_while(|&&b| b == b' ').count();
        kept[..trimmed].iter().map(|&b| b as char).collect()
    }
}

fn is_name_char(b: u8) -> bool {
    match b {
        b'"' | b'$' | b'*' | b'/' | b':' | b';' | b'<' | b'>' | b'?' | b'\\' | b'^' | b'`' => false,
        0x20..=0x7E => true,
        _ => false,
    }
}

impl fmt::Debug for FixedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

impl fmt::Display for FixedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// Fixed 48-byte bank header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MusHeader {
    /// Always [`crate::MUS_MAGIC`], stored big-endian
    pub magic: u32,
    pub header_size: u32,
    pub version_number: u32,
    pub reverb_volume: u32,
    pub reverb_type: u32,
    pub reverb_multiply: u32,
    pub num_sequences: u32,
    pub num_labels: u32,
    /// End of the sequence data region, relative to the bank start
    pub offset_to_labels_offsets_table: u32,
    pub num_waves: u32,
    pub num_programs: u32,
    pub num_presets: u32,
}

impl MusHeader {
    pub const SIZE: usize = HEADER_SIZE;

    /// Encode the header back into its on-disk form
    pub fn to_bytes(&self, endian: Endian) -> [u8; Self::SIZE] {
        let fields = [
            self.header_size,
            self.version_number,
            self.reverb_volume,
            self.reverb_type,
            self.reverb_multiply,
            self.num_sequences,
            self.num_labels,
            self.offset_to_labels_offsets_table,
            self.num_waves,
            self.num_programs,
            self.num_presets,
        ];

        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic.to_be_bytes());
        for (i, field) in fields.iter().enumerate() {
            let at = 4 + i * 4;
            bytes[at..at + 4].copy_from_slice(&endian.u32_to(*field));
        }
        bytes
    }

    /// Number of entries in the layer table
    pub fn num_layers(&self) -> u64 {
        self.num_presets as u64 + self.num_programs as u64
    }
}

/// Entry of the sequence index table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceEntry {
    pub index: u32,
    /// Start of the sequence, relative to the bank start
    pub offset: u32,
}

/// Wave (sample) metadata
#[derive(Debug, Clone, PartialEq)]
pub struct WaveEntry {
    pub name: FixedName,
    /// Start of the payload, relative to the sample blob
    pub offset: u32,
    pub loop_begin: u32,
    /// Payload length in bytes (stored on disk in 16-bit units)
    pub size: u32,
    pub loop_end: u32,
    pub sample_rate: u32,
    /// Original pitch in 1/256 semitones
    pub original_pitch: i32,
    /// Non-zero when the sample loops
    pub loop_info: u32,
    pub snd_handle: u32,
}

impl WaveEntry {
    /// MIDI key the sample was recorded at
    pub fn root_key(&self) -> i32 {
        self.original_pitch / 256
    }

    pub fn is_looped(&self) -> bool {
        self.loop_info != 0
    }
}

/// Six-stage envelope, times in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Envelope {
    pub delay: f32,
    pub attack: f32,
    pub hold: f32,
    pub decay: f32,
    /// Sustain level in percent
    pub sustain: f32,
    pub release: f32,
}

/// Key zone of a program
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramZone {
    /// Pitch offset in 1/256 semitones
    pub pitch_finetuning: i32,
    pub reverb: i32,
    /// 0.0 = left, 0.5 = centre, 1.0 = right
    pub pan_position: f32,
    pub keynum_hold: i32,
    pub keynum_decay: i32,
    pub volume_env: Envelope,
    pub volume_env_atten: f32,
    pub vib_delay: f32,
    pub vib_frequency: f32,
    pub vib_to_pitch: f32,
    /// -1 means the wave's own original pitch applies
    pub root_key: i32,
    pub note_low: u8,
    pub note_high: u8,
    pub velocity_low: u8,
    pub velocity_high: u8,
    pub wave_index: i32,
    pub base_priority: f32,
    pub modul_env: Envelope,
    pub modul_env_to_pitch: f32,
}

/// Instrument program with its zones
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramEntry {
    pub name: FixedName,
    pub num_zones: u32,
    pub zones: Vec<ProgramZone>,
}

/// Key zone of a preset, pointing at a program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetZone {
    pub root_key: i32,
    pub note_low: u8,
    pub note_high: u8,
    pub velocity_low: u8,
    pub velocity_high: u8,
    pub program_index: i32,
}

/// MIDI-addressable preset with its zones
#[derive(Debug, Clone, PartialEq)]
pub struct PresetEntry {
    pub name: FixedName,
    pub midi_bank_number: i32,
    pub midi_preset_number: i32,
    pub num_zones: u32,
    pub zones: Vec<PresetZone>,
}

/// Fully decoded bank
#[derive(Debug, Clone, PartialEq)]
pub struct MusBank {
    pub platform: Platform,
    pub header: MusHeader,
    pub sequences: Vec<SequenceEntry>,
    /// Opaque cross references, one per preset and program
    pub layers: Vec<i32>,
    pub waves: Vec<WaveEntry>,
    pub programs: Vec<ProgramEntry>,
    pub presets: Vec<PresetEntry>,
}

impl MusBank {
    /// Wave referenced by a program zone, if the index is in range
    pub fn zone_wave(&self, zone: &ProgramZone) -> Option<&WaveEntry> {
        usize::try_from(zone.wave_index)
            .ok()
            .and_then(|i| self.waves.get(i))
    }

    /// Program referenced by a preset zone, if the index is in range
    pub fn zone_program(&self, zone: &PresetZone) -> Option<&ProgramEntry> {
        usize::try_from(zone.program_index)
            .ok()
            .and_then(|i| self.programs.get(i))
    }
}
