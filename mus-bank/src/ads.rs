//! ADS (`SShd`/`SSbd`) sample container
//!
//! Wraps a raw wave payload in the small header most PS2-era audio tools
//! understand, so extracted samples can be auditioned directly. The payload
//! itself is written untouched apart from the optional end-flag fix below.
//!
//! ```text
//! 0x00  "SShd"
//! 0x04  0x18            header body size (u32 LE)
//! 0x08  codec           0x01 = 16-bit PCM, 0x10 = PS-ADPCM (u32 LE)
//! 0x0C  sample_rate     (u32 LE)
//! 0x10  channels        always 1 (u32 LE)
//! 0x14  interleave      always 0 (u32 LE)
//! 0x18  loop_start      0xFFFFFFFF (no loop)
//! 0x1C  loop_end        0xFFFFFFFF (no loop)
//! 0x20  "SSbd"
//! 0x24  body_size       payload length in bytes (u32 LE)
//! ```

use crate::bank::Platform;

pub const ADS_HEADER_MAGIC: &[u8; 4] = b"SShd";
pub const ADS_BODY_MAGIC: &[u8; 4] = b"SSbd";

pub const ADS_CODEC_PCM: u32 = 0x01;
pub const ADS_CODEC_PSX_ADPCM: u32 = 0x10;

/// Last PS-ADPCM frame as some console banks store it: flag byte 0x00
/// where the decoder expects the 0x07 end marker.
const UNTERMINATED_ADPCM_TAIL: [u8; 16] = [
    0x07, 0x00, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77,
];

/// ADS header for a single mono wave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdsHeader {
    pub codec: u32,
    pub sample_rate: u32,
    pub body_size: u32,
}

impl AdsHeader {
    pub const SIZE: usize = 40;

    pub fn new(platform: Platform, sample_rate: u32, body_size: u32) -> Self {
        let codec = match platform {
            Platform::Pc => ADS_CODEC_PCM,
            Platform::Console => ADS_CODEC_PSX_ADPCM,
        };
        Self {
            codec,
            sample_rate,
            body_size,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(ADS_HEADER_MAGIC);
        bytes[4..8].copy_from_slice(&0x18u32.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.codec.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.sample_rate.to_le_bytes());
        bytes[16..20].copy_from_slice(&1u32.to_le_bytes());
        // interleave stays 0
        bytes[24..32].fill(0xFF);
        bytes[32..36].copy_from_slice(ADS_BODY_MAGIC);
        bytes[36..40].copy_from_slice(&self.body_size.to_le_bytes());
        bytes
    }
}

/// Mark the final ADPCM frame as the end of the stream
///
/// Returns `true` if the payload ended with an unterminated frame and was
/// patched.
pub fn fix_adpcm_end_flag(payload: &mut [u8]) -> bool {
    let Some(tail_start) = payload.len().checked_sub(UNTERMINATED_ADPCM_TAIL.len()) else {
        return false;
    };
    if payload[tail_start..] != UNTERMINATED_ADPCM_TAIL {
        return false;
    }
    payload[tail_start + 1] = 0x07;
    true
}

/// Build a complete ADS file for one wave payload
///
/// Console payloads get their end flag fixed on the way.
pub fn build_ads(platform: Platform, sample_rate: u32, payload: &[u8]) -> Vec<u8> {
    let header = AdsHeader::new(platform, sample_rate, payload.len() as u32);

    let mut out = Vec::with_capacity(AdsHeader::SIZE + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(payload);

    if platform == Platform::Console && fix_adpcm_end_flag(&mut out[AdsHeader::SIZE..]) {
        tracing::debug!("Patched ADPCM end flag");
    }
    out
}
