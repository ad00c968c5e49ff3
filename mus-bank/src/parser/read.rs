//! MUS bank header and table decoding

use crate::bank::{
    Envelope, MusBank, MusHeader, Platform, PresetEntry, PresetZone, ProgramEntry, ProgramZone,
    SequenceEntry, WaveEntry,
};
use crate::cursor::{Cursor, Endian};
use crate::error::{MusError, Section};
use crate::{
    BANK_ENDIAN, LAYER_ENTRY_SIZE, MUS_MAGIC, PRESET_ENTRY_SIZE, PRESET_ZONE_SIZE,
    PROGRAM_ENTRY_SIZE, PROGRAM_ZONE_SIZE, SEQUENCE_ENTRY_SIZE, WAVE_ENTRY_SIZE,
};

/// Parse a MUS bank into its header and tables
///
/// Tables are decoded in file order, each starting where the previous one
/// ended: sequence index, layer index, waves, programs (each followed by its
/// zones), presets (each followed by its zones).
///
/// # Arguments
/// * `data` - Raw bank file bytes
/// * `platform` - Recorded on the bank for sample handling; the tables decode
///   the same on every platform
///
/// # Example
/// ```ignore
/// let data = std::fs::read("overland.mus")?;
/// let bank = parse_bank(&data, Platform::Pc)?;
/// println!("{} waves", bank.waves.len());
/// ```
pub fn parse_bank(data: &[u8], platform: Platform) -> Result<MusBank, MusError> {
    let endian = BANK_ENDIAN;
    let mut cursor = Cursor::new(data);

    let header = parse_header(&mut cursor, endian).map_err(|e| match e {
        MusError::TruncatedInput { .. } => e.in_section(Section::Header, 0),
        other => other,
    })?;
    tracing::debug!(?header, "Decoded header");

    let sequences = parse_sequence_table(&mut cursor, header.num_sequences, endian)?;
    tracing::debug!(count = sequences.len(), ?sequences, "Decoded sequence table");

    let layers = parse_layer_table(&mut cursor, header.num_layers(), endian)?;
    tracing::debug!(count = layers.len(), ?layers, "Decoded layer table");

    let waves = parse_wave_table(&mut cursor, header.num_waves, endian)?;
    tracing::debug!(count = waves.len(), ?waves, "Decoded wave table");

    let programs = parse_program_table(&mut cursor, header.num_programs, endian)?;
    tracing::debug!(count = programs.len(), ?programs, "Decoded program table");

    let presets = parse_preset_table(&mut cursor, header.num_presets, endian)?;
    tracing::debug!(count = presets.len(), ?presets, "Decoded preset table");

    tracing::debug!(end = cursor.position(), "Finished decoding tables");

    Ok(MusBank {
        platform,
        header,
        sequences,
        layers,
        waves,
        programs,
        presets,
    })
}

/// Parse the fixed header
///
/// The magic is checked before anything is consumed, so on
/// [`MusError::InvalidMagic`] the cursor has not moved.
pub fn parse_header(cursor: &mut Cursor<'_>, endian: Endian) -> Result<MusHeader, MusError> {
    let magic = cursor.peek_u32(Endian::Big)?;
    if magic != MUS_MAGIC {
        return Err(MusError::InvalidMagic { actual: magic });
    }
    cursor.skip(4)?;

    Ok(MusHeader {
        magic,
        header_size: cursor.read_u32(endian)?,
        version_number: cursor.read_u32(endian)?,
        reverb_volume: cursor.read_u32(endian)?,
        reverb_type: cursor.read_u32(endian)?,
        reverb_multiply: cursor.read_u32(endian)?,
        num_sequences: cursor.read_u32(endian)?,
        num_labels: cursor.read_u32(endian)?,
        offset_to_labels_offsets_table: cursor.read_u32(endian)?,
        num_waves: cursor.read_u32(endian)?,
        num_programs: cursor.read_u32(endian)?,
        num_presets: cursor.read_u32(endian)?,
    })
}

/// Decode `count` records in index order
///
/// Failures are tagged with `section` and the record index. Preallocation is
/// capped by what the remaining bytes could hold, so a corrupt count fails on
/// truncation instead of on allocation.
fn parse_table<'a, T>(
    cursor: &mut Cursor<'a>,
    count: u64,
    record_size: usize,
    section: Section,
    mut parse_record: impl FnMut(&mut Cursor<'a>) -> Result<T, MusError>,
) -> Result<Vec<T>, MusError> {
    let fits = (cursor.remaining() / record_size) as u64;
    let mut records = Vec::with_capacity(count.min(fits) as usize);

    for index in 0..count {
        let record = parse_record(cursor).map_err(|e| e.in_section(section, index as usize))?;
        records.push(record);
    }

    Ok(records)
}

pub fn parse_sequence_table(
    cursor: &mut Cursor<'_>,
    count: u32,
    endian: Endian,
) -> Result<Vec<SequenceEntry>, MusError> {
    parse_table(
        cursor,
        count as u64,
        SEQUENCE_ENTRY_SIZE,
        Section::Sequences,
        |cursor| {
            Ok(SequenceEntry {
                index: cursor.read_u32(endian)?,
                offset: cursor.read_u32(endian)?,
            })
        },
    )
}

pub fn parse_layer_table(
    cursor: &mut Cursor<'_>,
    count: u64,
    endian: Endian,
) -> Result<Vec<i32>, MusError> {
    parse_table(cursor, count, LAYER_ENTRY_SIZE, Section::Layers, |cursor| {
        cursor.read_i32(endian)
    })
}

pub fn parse_wave_table(
    cursor: &mut Cursor<'_>,
    count: u32,
    endian: Endian,
) -> Result<Vec<WaveEntry>, MusError> {
    parse_table(cursor, count as u64, WAVE_ENTRY_SIZE, Section::Waves, |cursor| {
        parse_wave_entry(cursor, endian)
    })
}

/// Parse a single 52-byte wave entry
///
/// Fields after the name are little-endian on every platform:
///
/// ```text
/// 0x00  name            20 bytes
/// 0x14  offset          u32, into the sample blob
/// 0x18  loop_begin      u32
/// 0x1C  size            u32, in 16-bit units
/// 0x20  loop_end        u32
/// 0x24  sample_rate     u32
/// 0x28  original_pitch  i32, 1/256 semitones
/// 0x2C  loop_info       u32
/// 0x30  snd_handle      u32
/// ```
pub(crate) fn parse_wave_entry(
    cursor: &mut Cursor<'_>,
    endian: Endian,
) -> Result<WaveEntry, MusError> {
    let name = cursor.read_name()?;
    let offset = cursor.read_u32(endian)?;
    let loop_begin = cursor.read_u32(endian)?;
    // Saturates so an absurd size fails region bounds checks instead of wrapping
    let size = cursor.read_u32(endian)?.saturating_mul(2);
    let loop_end = cursor.read_u32(endian)?;
    let sample_rate = cursor.read_u32(endian)?;
    let original_pitch = cursor.read_i32(endian)?;
    let loop_info = cursor.read_u32(endian)?;
    let snd_handle = cursor.read_u32(endian)?;

    Ok(WaveEntry {
        name,
        offset,
        loop_begin,
        size,
        loop_end,
        sample_rate,
        original_pitch,
        loop_info,
        snd_handle,
    })
}

pub fn parse_program_table(
    cursor: &mut Cursor<'_>,
    count: u32,
    endian: Endian,
) -> Result<Vec<ProgramEntry>, MusError> {
    parse_table(
        cursor,
        count as u64,
        PROGRAM_ENTRY_SIZE,
        Section::Programs,
        |cursor| parse_program_entry(cursor, endian),
    )
}

/// Parse a program entry and the zones that immediately follow it
pub(crate) fn parse_program_entry(
    cursor: &mut Cursor<'_>,
    endian: Endian,
) -> Result<ProgramEntry, MusError> {
    let name = cursor.read_name()?;
    let num_zones = cursor.read_u32(endian)?;
    let zones = parse_table(
        cursor,
        num_zones as u64,
        PROGRAM_ZONE_SIZE,
        Section::ProgramZones,
        |cursor| parse_program_zone(cursor, endian),
    )?;

    Ok(ProgramEntry {
        name,
        num_zones,
        zones,
    })
}

pub(crate) fn parse_program_zone(
    cursor: &mut Cursor<'_>,
    endian: Endian,
) -> Result<ProgramZone, MusError> {
    Ok(ProgramZone {
        pitch_finetuning: cursor.read_i32(endian)?,
        reverb: cursor.read_i32(endian)?,
        pan_position: cursor.read_f32(endian)?,
        keynum_hold: cursor.read_i32(endian)?,
        keynum_decay: cursor.read_i32(endian)?,
        volume_env: parse_envelope(cursor, endian)?,
        volume_env_atten: cursor.read_f32(endian)?,
        vib_delay: cursor.read_f32(endian)?,
        vib_frequency: cursor.read_f32(endian)?,
        vib_to_pitch: cursor.read_f32(endian)?,
        root_key: cursor.read_i32(endian)?,
        note_low: cursor.read_u8()?,
        note_high: cursor.read_u8()?,
        velocity_low: cursor.read_u8()?,
        velocity_high: cursor.read_u8()?,
        wave_index: cursor.read_i32(endian)?,
        base_priority: cursor.read_f32(endian)?,
        modul_env: parse_envelope(cursor, endian)?,
        modul_env_to_pitch: cursor.read_f32(endian)?,
    })
}

fn parse_envelope(cursor: &mut Cursor<'_>, endian: Endian) -> Result<Envelope, MusError> {
    Ok(Envelope {
        delay: cursor.read_f32(endian)?,
        attack: cursor.read_f32(endian)?,
        hold: cursor.read_f32(endian)?,
        decay: cursor.read_f32(endian)?,
        sustain: cursor.read_f32(endian)?,
        release: cursor.read_f32(endian)?,
    })
}

pub fn parse_preset_table(
    cursor: &mut Cursor<'_>,
    count: u32,
    endian: Endian,
) -> Result<Vec<PresetEntry>, MusError> {
    parse_table(
        cursor,
        count as u64,
        PRESET_ENTRY_SIZE,
        Section::Presets,
        |cursor| parse_preset_entry(cursor, endian),
    )
}

/// Parse a preset entry and the zones that immediately follow it
pub(crate) fn parse_preset_entry(
    cursor: &mut Cursor<'_>,
    endian: Endian,
) -> Result<PresetEntry, MusError> {
    let name = cursor.read_name()?;
    let midi_bank_number = cursor.read_i32(endian)?;
    let midi_preset_number = cursor.read_i32(endian)?;
    let num_zones = cursor.read_u32(endian)?;
    let zones = parse_table(
        cursor,
        num_zones as u64,
        PRESET_ZONE_SIZE,
        Section::PresetZones,
        |cursor| {
            Ok(PresetZone {
                root_key: cursor.read_i32(endian)?,
                note_low: cursor.read_u8()?,
                note_high: cursor.read_u8()?,
                velocity_low: cursor.read_u8()?,
                velocity_high: cursor.read_u8()?,
                program_index: cursor.read_i32(endian)?,
            })
        },
    )?;

    Ok(PresetEntry {
        name,
        midi_bank_number,
        midi_preset_number,
        num_zones,
        zones,
    })
}
