//! Synthesized MUS/SAM pairs for the integration tests
//!
//! One small bank with two sequences (the second empty), two waves, one
//! program and one preset. Layout:
//!
//! ```text
//! 0x000  header          48
//! 0x030  sequences       2 × 8
//! 0x040  layers          2 × 4
//! 0x048  waves           2 × 52
//! 0x0B0  program + zone  24 + 104
//! 0x130  preset + zone   32 + 12
//! 0x15C  sequence data   10
//! 0x166  labels          4
//! ```

use std::io;
use std::path::Path;

/// Bytes of the first sequence
pub const SEQUENCE_0: [u8; 10] = [0x90, 0x3C, 0x7F, 0x00, 0x80, 0x3C, 0x00, 0x00, 0xFF, 0x2F];

/// Offset of the sequence data
const SEQUENCE_DATA: u32 = 0x15C;

/// Offset of the labels table, where the last sequence ends
const LABELS: u32 = SEQUENCE_DATA + SEQUENCE_0.len() as u32;

/// Length of the sample blob: "Flute" is 16 bytes at 0, "Drum" 8 bytes at 16
pub const SAMPLE_LEN: usize = 24;

struct Writer {
    out: Vec<u8>,
}

impl Writer {
    fn u32(&mut self, v: u32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    fn i32(&mut self, v: i32) {
        self.u32(v as u32);
    }

    fn f32(&mut self, v: f32) {
        self.u32(v.to_bits());
    }

    fn u8(&mut self, v: u8) {
        self.out.push(v);
    }

    fn name(&mut self, name: &str) {
        let mut raw = [0u8; 20];
        raw[..name.len()].copy_from_slice(name.as_bytes());
        self.out.extend_from_slice(&raw);
    }

    fn envelope(&mut self, values: [f32; 6]) {
        for v in values {
            self.f32(v);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn wave(
        &mut self,
        name: &str,
        offset: u32,
        loop_begin: u32,
        size_units: u32,
        loop_end: u32,
        sample_rate: u32,
        original_pitch: i32,
        loop_info: u32,
    ) {
        self.name(name);
        self.u32(offset);
        self.u32(loop_begin);
        self.u32(size_units);
        self.u32(loop_end);
        self.u32(sample_rate);
        self.i32(original_pitch);
        self.u32(loop_info);
        self.u32(0);
    }
}

/// Build the bank; every field after the magic is little-endian
pub fn build_bank() -> Vec<u8> {
    let mut w = Writer { out: Vec::new() };

    // Header, magic big-endian
    w.out.extend_from_slice(b"Mus!");
    for v in [48, 1, 100, 0, 0, 2, 0, LABELS, 2, 1, 1] {
        w.u32(v);
    }

    // Sequences
    w.u32(0);
    w.u32(SEQUENCE_DATA);
    w.u32(1);
    w.u32(LABELS);

    // Layers
    w.i32(0);
    w.i32(0);

    // Waves
    w.wave("Flute", 0, 2, 8, 6, 22050, 72 * 256, 1);
    w.wave("Drum", 16, 0, 4, 0, 11025, 60 * 256, 0);

    // Program "Lead" with one zone on wave 0
    w.name("Lead");
    w.u32(1);
    w.i32(0x0180);
    w.i32(0);
    w.f32(0.5);
    w.i32(0);
    w.i32(0);
    w.envelope([0.0, 1.0, 0.0, 2.0, 100.0, 0.5]);
    w.f32(0.0);
    w.f32(0.0);
    w.f32(8.176);
    w.f32(0.0);
    w.i32(-1);
    w.u8(0);
    w.u8(127);
    w.u8(0);
    w.u8(127);
    w.i32(0);
    w.f32(0.0);
    w.envelope([0.0; 6]);
    w.f32(0.0);

    // Preset "Solo" with one zone on program 0
    w.name("Solo");
    w.i32(0);
    w.i32(73);
    w.u32(1);
    w.i32(-1);
    w.u8(0);
    w.u8(127);
    w.u8(0);
    w.u8(127);
    w.i32(0);

    assert_eq!(w.out.len(), SEQUENCE_DATA as usize);
    w.out.extend_from_slice(&SEQUENCE_0);

    // Labels table, never read
    w.u32(0);

    w.out
}

/// Sample blob with a distinct byte per position
pub fn build_samples() -> Vec<u8> {
    (0..SAMPLE_LEN as u8).map(|b| b.wrapping_mul(3)).collect()
}

/// Write `<dir>/<stem>.mus` and `<dir>/<stem>.sam`
pub fn write_pair(dir: &Path, stem: &str) -> io::Result<()> {
    std::fs::write(dir.join(format!("{stem}.mus")), build_bank())?;
    std::fs::write(dir.join(format!("{stem}.sam")), build_samples())
}
