//! Bounds-checked slice cursor used by the decoder.

use crate::error::DecodeError;
use crate::tag::{read_varint, Tag};

/// A cursor over an input byte slice that tracks how far decoding has
/// progressed and hands back sub-slices borrowed from the input.
///
/// Every read checks the remaining length first and fails with
/// [`DecodeError::Truncated`] rather than dereferencing past the end.
#[derive(Debug)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor over `input`, starting at position 0.
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the input buffer.
    pub fn total_len(&self) -> usize {
        self.input.len()
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// Whether the cursor has consumed the entire input.
    pub fn is_at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    /// Reads and consumes one byte.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = *self.input.get(self.pos).ok_or(DecodeError::Truncated)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads a tag byte and decodes it.
    pub fn read_tag(&mut self) -> Result<Tag, DecodeError> {
        Tag::try_from(self.read_u8()?)
    }

    /// Reads a varint-encoded unsigned integer.
    pub fn read_varint(&mut self) -> Result<u64, DecodeError> {
        read_varint(self.input, &mut self.pos)
    }

    /// Reads exactly `n` bytes and returns a slice borrowed from the
    /// input, without copying.
    pub fn read_slice(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos.checked_add(n).ok_or(DecodeError::Truncated)?;
        if end > self.input.len() {
            return Err(DecodeError::Truncated);
        }
        let slice = &self.input[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Reads exactly 8 bytes and interprets them as a big-endian `f64`.
    pub fn read_f64_be(&mut self) -> Result<f64, DecodeError> {
        let slice = self.read_slice(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(slice);
        Ok(f64::from_be_bytes(buf))
    }
}
