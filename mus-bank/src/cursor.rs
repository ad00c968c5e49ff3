//! Bounds-checked forward-only reader over a bank buffer

use crate::bank::FixedName;
use crate::error::MusError;

/// Byte order of multi-byte fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    pub fn u16_from(self, bytes: [u8; 2]) -> u16 {
        match self {
            Endian::Big => u16::from_be_bytes(bytes),
            Endian::Little => u16::from_le_bytes(bytes),
        }
    }

    pub fn u32_from(self, bytes: [u8; 4]) -> u32 {
        match self {
            Endian::Big => u32::from_be_bytes(bytes),
            Endian::Little => u32::from_le_bytes(bytes),
        }
    }

    pub fn u32_to(self, value: u32) -> [u8; 4] {
        match self {
            Endian::Big => value.to_be_bytes(),
            Endian::Little => value.to_le_bytes(),
        }
    }
}

/// Read position over an immutable byte buffer
///
/// Every read consumes exactly its width and advances the position. A read
/// that would run past the end of the buffer fails with
/// [`MusError::TruncatedInput`] carrying the absolute offset of the read,
/// and leaves the position where it was.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Absolute offset of the next read
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left between the position and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    fn peek_bytes(&self, len: usize) -> Result<&'a [u8], MusError> {
        let available = self.remaining();
        if len > available {
            return Err(MusError::TruncatedInput {
                offset: self.position,
                needed: len,
                available,
            });
        }
        Ok(&self.data[self.position..self.position + len])
    }

    /// Consume `len` bytes and return them as a slice of the buffer
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], MusError> {
        let bytes = self.peek_bytes(len)?;
        self.position += len;
        Ok(bytes)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), MusError> {
        self.read_bytes(len).map(|_| ())
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], MusError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, MusError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self, endian: Endian) -> Result<u16, MusError> {
        Ok(endian.u16_from(self.read_array()?))
    }

    pub fn read_u32(&mut self, endian: Endian) -> Result<u32, MusError> {
        Ok(endian.u32_from(self.read_array()?))
    }

    pub fn read_i32(&mut self, endian: Endian) -> Result<i32, MusError> {
        Ok(self.read_u32(endian)? as i32)
    }

    pub fn read_f32(&mut self, endian: Endian) -> Result<f32, MusError> {
        Ok(f32::from_bits(self.read_u32(endian)?))
    }

    pub fn read_u16_be(&mut self) -> Result<u16, MusError> {
        self.read_u16(Endian::Big)
    }

    pub fn read_u32_be(&mut self) -> Result<u32, MusError> {
        self.read_u32(Endian::Big)
    }

    /// Read a u32 without advancing
    pub fn peek_u32(&self, endian: Endian) -> Result<u32, MusError> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.peek_bytes(4)?);
        Ok(endian.u32_from(bytes))
    }

    /// Read a fixed-width 20 byte name field
    pub fn read_name(&mut self) -> Result<FixedName, MusError> {
        Ok(FixedName::new(self.read_array()?))
    }
}
