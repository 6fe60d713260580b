//! Sequential, bounds-checked byte cursor over an immutable map buffer.
//!
//! Every read advances the cursor by the consumed size; reading past the
//! end is a reported failure, never undefined behavior. H3M integers are
//! little-endian; strings are a `u32` byte length followed by the bytes.

use crate::error::{H3mError, Result};

/// How reserved (always-zero) regions are treated while skipping them.
///
/// Reserved spans are used as alignment self-checks: if one contains a
/// non-zero byte the cursor is very likely desynchronized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReservedCheck {
    /// A non-zero reserved byte aborts the decode with
    /// [`H3mError::ReservedRegionNotZero`]
    #[default]
    Strict,
    /// A non-zero reserved byte is logged as a warning and skipped
    Lenient,
}

/// Cursor over a byte buffer with exclusive ownership of the read offset.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Wrap a buffer; the cursor starts at offset 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current read offset in bytes.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(count)
            .filter(|end| *end <= self.data.len())
            .ok_or(H3mError::UnexpectedEndOfData {
                offset: self.offset,
            })?;
        let slice = &self.data[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a signed byte.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a little-endian `u32`.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a little-endian `i32`.
    pub fn read_i32_le(&mut self) -> Result<i32> {
        Ok(self.read_u32_le()? as i32)
    }

    /// Read one byte as a boolean (any non-zero value is `true`).
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Read `count` raw bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.take(count)
    }

    /// Read a length-prefixed string: `u32` byte length, then the bytes.
    ///
    /// Map files use a latin-ish single-byte encoding; non-UTF-8 bytes are
    /// replaced rather than rejected, since text never affects alignment.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32_le()? as usize;
        let bytes = self.take(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read a length-prefixed string, failing if the declared length
    /// exceeds `max_len` bytes. The cap catches desynchronized cursors
    /// before they trigger a huge bogus allocation.
    pub fn read_string_capped(&mut self, max_len: usize) -> Result<String> {
        let at = self.offset;
        let len = self.read_u32_le()? as usize;
        if len > max_len {
            return Err(H3mError::SanityBoundViolation {
                detail: format!("string length {len} exceeds cap {max_len}"),
                offset: at,
            });
        }
        let bytes = self.take(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read `byte_count` bytes as a bit array.
    ///
    /// Bit 0 of byte 0 is logical index 0, so the result has
    /// `byte_count * 8` entries in file bit order.
    pub fn read_bit_array(&mut self, byte_count: usize) -> Result<Vec<bool>> {
        let bytes = self.take(byte_count)?;
        let mut bits = Vec::with_capacity(byte_count * 8);
        for byte in bytes {
            for bit in 0..8 {
                bits.push(byte & (1 << bit) != 0);
            }
        }
        Ok(bits)
    }

    /// Advance the cursor over `count` bytes without interpreting them.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.take(count).map(|_| ())
    }

    /// Skip a reserved region, checking that every byte is zero.
    ///
    /// A non-zero byte means an unknown file variant or an upstream parser
    /// bug; depending on `check` it either aborts the decode or is logged.
    pub fn skip_reserved(&mut self, count: usize, check: ReservedCheck) -> Result<()> {
        let start = self.offset;
        let bytes = self.take(count)?;
        if let Some(bad) = bytes.iter().position(|b| *b != 0) {
            match check {
                ReservedCheck::Strict => {
                    return Err(H3mError::ReservedRegionNotZero {
                        offset: start + bad,
                    });
                }
                ReservedCheck::Lenient => {
                    log::warn!(
                        "reserved byte at offset {} is 0x{:02x}, expected zero",
                        start + bad,
                        bytes[bad]
                    );
                }
            }
        }
        Ok(())
    }
}
