//! Plain-text bank listings
//!
//! Two side files that let a decoded bank be rebuilt as a SoundFont with
//! common text-to-SF2 tools:
//!
//! - the instrument listing (`[Samples]`, `[Instruments]`, `[Presets]`,
//!   `[Info]`), CRLF-terminated, with every zone parameter converted to
//!   SoundFont generator units
//! - the sample loop listing, one `begin end name.wav` line per looped wave

use std::io::{self, Write};

use crate::bank::{MusBank, WaveEntry};
use crate::extract::wave_artifact_names;

/// Vibrato frequency that maps to 0 absolute cents (8.176 Hz, MIDI note 0)
const VIB_BASE_FREQUENCY: f32 = 8.176;

// =============================================================================
// Unit conversions
// =============================================================================

/// Seconds to timecents, clamping at 1 ms
pub fn secs_to_timecent(seconds: f32) -> i32 {
    (1200.0 * seconds.max(0.001).log2()) as i32
}

/// Whole semitones of a 1/256-semitone pitch value
pub fn semitone_tuning(pitch: i32) -> i32 {
    pitch / 256
}

/// Cents left over after [`semitone_tuning`]
pub fn cents_tuning(pitch: i32) -> i32 {
    (pitch % 256) * 100 / 256
}

/// 0.0..1.0 pan position to SoundFont pan (-500..500)
pub fn pan_convert(pan: f32) -> i32 {
    (pan * 1000.0 - 500.0) as i32
}

/// Percentage of full level to attenuation, scaled by `factor`
pub fn percentage_to_decibels(percentage: f32, factor: f32) -> i32 {
    (-(10.0 * (percentage.max(0.001) / 100.0).log10()) * factor) as i32
}

// =============================================================================
// Listings
// =============================================================================

/// Write the loop points of every looped wave
///
/// `loop_end` is stored exclusive; the listing wants the last looped frame.
pub fn write_sample_loop_info<W: Write>(w: &mut W, waves: &[WaveEntry]) -> io::Result<()> {
    for (wave, name) in waves.iter().zip(wave_artifact_names(waves)) {
        if wave.is_looped() {
            writeln!(
                w,
                "{} {} {}.wav",
                wave.loop_begin,
                wave.loop_end as i64 - 1,
                name
            )?;
        }
    }
    Ok(())
}

/// Write the full instrument listing of a bank
///
/// # Arguments
/// * `w` - Output
/// * `bank` - Decoded bank
/// * `title` - Value of the `Name=` entry, usually the bank's file stem
pub fn write_instrument_listing<W: Write>(
    w: &mut W,
    bank: &MusBank,
    title: &str,
) -> io::Result<()> {
    let wave_names = wave_artifact_names(&bank.waves);
    let wave_name = |index: i32| -> String {
        usize::try_from(index)
            .ok()
            .and_then(|i| wave_names.get(i).cloned())
            .unwrap_or_else(|| format!("<missing #{index}>"))
    };

    write!(w, "[Samples]")?;
    for (wave, name) in bank.waves.iter().zip(&wave_names) {
        write!(w, "\r\n    SampleName={}\r\n", name)?;
        write!(w, "        SampleRate={}\r\n", wave.sample_rate)?;
        write!(w, "        Key={}\r\n", wave.root_key())?;
        write!(w, "        FineTune=0\r\n")?;
        write!(w, "        Type=1\r\n")?;
    }

    write!(w, "\r\n\r\n[Instruments]\r\n")?;
    for program in &bank.programs {
        write!(w, "\r\n    InstrumentName={}\r\n", program.name.sanitized())?;

        for zone in &program.zones {
            let wave = bank.zone_wave(zone);
            if wave.is_none() {
                tracing::warn!(
                    "Program '{}' references missing wave #{}",
                    program.name,
                    zone.wave_index
                );
            }

            let vol = &zone.volume_env;
            let modul = &zone.modul_env;
            let params = [
                ("coarseTune", semitone_tuning(zone.pitch_finetuning)),
                ("fineTune", cents_tuning(zone.pitch_finetuning)),
                ("reverbEffectsSend", zone.reverb.saturating_mul(10)),
                ("pan", pan_convert(zone.pan_position)),
                ("keynumToVolEnvHold", zone.keynum_hold),
                ("keynumToVolEnvDecay", zone.keynum_decay),
                ("attackVolEnv", secs_to_timecent(vol.attack)),
                ("decayVolEnv", secs_to_timecent(vol.decay)),
                ("sustainVolEnv", percentage_to_decibels(vol.sustain, 10.0)),
                ("releaseVolEnv", secs_to_timecent(vol.release)),
                ("delayVolEnv", secs_to_timecent(vol.delay)),
                ("delayModEnv", secs_to_timecent(modul.delay)),
                (
                    "initialAttenuation",
                    percentage_to_decibels(100.0 - zone.volume_env_atten, 25.0),
                ),
                ("delayVibLFO", secs_to_timecent(zone.vib_delay)),
                (
                    "freqVibLFO",
                    secs_to_timecent(zone.vib_frequency / VIB_BASE_FREQUENCY),
                ),
                ("vibLfoToPitch", zone.vib_to_pitch as i32),
                ("LowKey", zone.note_low as i32),
                ("HighKey", zone.note_high as i32),
                ("LowVelocity", zone.velocity_low as i32),
                ("HighVelocity", zone.velocity_high as i32),
                ("attackModEnv", secs_to_timecent(modul.attack)),
                ("decayModEnv", secs_to_timecent(modul.decay)),
                ("sustainModEnv", (modul.sustain * 10.0) as i32),
                ("releaseModEnv", secs_to_timecent(modul.release)),
                ("modEnvToPitch", zone.modul_env_to_pitch as i32),
            ];

            write!(w, "\r\n        Sample={}\r\n", wave_name(zone.wave_index))?;
            for (key, value) in params {
                write!(w, "            Z_{}={}\r\n", key, value)?;
            }
            if zone.root_key != -1 {
                write!(w, "            Z_overridingRootKey={}\r\n", zone.root_key)?;
            }
            write!(
                w,
                "            Z_sampleModes={}\r\n",
                wave.map_or(0, |wave| wave.loop_info)
            )?;
        }

        write!(w, "\r\n        GlobalZone\r\n\r\n")?;
    }

    write!(w, "\r\n[Presets]\r\n")?;
    for preset in &bank.presets {
        write!(w, "\r\n\r\n    PresetName={}\r\n", preset.name.sanitized())?;
        write!(w, "        Bank={}\r\n", preset.midi_bank_number)?;
        write!(w, "        Program={}\r\n\r\n", preset.midi_preset_number)?;

        for zone in &preset.zones {
            let instrument = match bank.zone_program(zone) {
                Some(program) => program.name.sanitized(),
                None => {
                    tracing::warn!(
                        "Preset '{}' references missing program #{}",
                        preset.name,
                        zone.program_index
                    );
                    format!("<missing #{}>", zone.program_index)
                }
            };

            write!(w, "        Instrument={}\r\n", instrument)?;
            write!(w, "            L_LowKey={}\r\n", zone.note_low)?;
            write!(w, "            L_HighKey={}\r\n", zone.note_high)?;
            write!(w, "            L_LowVelocity={}\r\n", zone.velocity_low)?;
            write!(w, "            L_HighVelocity={}\r\n", zone.velocity_high)?;
            write!(w, "\r\n        GlobalLayer\r\n")?;
        }
    }

    write!(w, "\r\n\r\n[Info]\r\n")?;
    write!(w, "Version=2.1\r\n")?;
    write!(w, "Engine=EMU8000\r\n")?;
    write!(w, "Name={}\r\n", title)?;
    write!(w, "Editor=Demus\r\n")?;

    Ok(())
}
