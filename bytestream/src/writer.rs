//! Byte-level writer over a pre-sized buffer.

use crate::error::{StreamError, StreamResult};

/// A little-endian writer that owns a pre-sized byte buffer.
///
/// The buffer length is fixed at construction; the codec sizes it exactly
/// from the length estimator before encoding. Writes overwrite in place,
/// which together with [`seek`](Self::seek) allows count/offset placeholders
/// to be back-patched once payload positions are known.
#[derive(Debug)]
pub struct ByteWriter {
    /// The owned buffer, zero-filled at construction.
    buf: Vec<u8>,
    /// Current byte position.
    pos: usize,
}

impl ByteWriter {
    /// Creates a writer over a zero-filled buffer of exactly `len` bytes.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            buf: vec![0; len],
            pos: 0,
        }
    }

    /// Returns the current cursor position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the fixed buffer length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if the buffer has zero length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the number of bytes remaining past the cursor.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Consumes the writer and returns the buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    /// Sets the cursor to an absolute position.
    ///
    /// Seeking to the end of the buffer (`position == len`) is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::SeekOutOfBounds`] if `position > len`.
    pub fn seek(&mut self, position: usize) -> StreamResult<()> {
        if position > self.buf.len() {
            return Err(StreamError::SeekOutOfBounds {
                position,
                len: self.buf.len(),
            });
        }
        self.pos = position;
        Ok(())
    }

    /// Advances the cursor by `n` bytes without writing.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::SeekOutOfBounds`] if the target lies past the end.
    pub fn skip(&mut self, n: usize) -> StreamResult<()> {
        self.seek(self.pos + n)
    }

    fn put(&mut self, bytes: &[u8]) -> StreamResult<()> {
        if bytes.len() > self.remaining() {
            return Err(StreamError::WriteOverflow {
                requested: bytes.len(),
                available: self.remaining(),
            });
        }
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    /// Writes a boolean as one byte (1 or 0).
    pub fn write_bool(&mut self, value: bool) -> StreamResult<()> {
        self.write_u8(u8::from(value))
    }

    /// Writes an unsigned 8-bit integer.
    pub fn write_u8(&mut self, value: u8) -> StreamResult<()> {
        self.put(&[value])
    }

    /// Writes a little-endian unsigned 16-bit integer.
    pub fn write_u16(&mut self, value: u16) -> StreamResult<()> {
        self.put(&value.to_le_bytes())
    }

    /// Writes a little-endian signed 16-bit integer.
    pub fn write_i16(&mut self, value: i16) -> StreamResult<()> {
        self.write_u16(value as u16)
    }

    /// Writes a little-endian unsigned 32-bit integer.
    pub fn write_u32(&mut self, value: u32) -> StreamResult<()> {
        self.put(&value.to_le_bytes())
    }

    /// Writes a little-endian signed 32-bit integer.
    pub fn write_i32(&mut self, value: i32) -> StreamResult<()> {
        self.write_u32(value as u32)
    }

    /// Writes a little-endian unsigned 64-bit integer.
    pub fn write_u64(&mut self, value: u64) -> StreamResult<()> {
        self.put(&value.to_le_bytes())
    }

    /// Writes a little-endian signed 64-bit integer.
    pub fn write_i64(&mut self, value: i64) -> StreamResult<()> {
        self.write_u64(value as u64)
    }

    /// Writes a little-endian IEEE-754 binary32 float.
    pub fn write_f32(&mut self, value: f32) -> StreamResult<()> {
        self.write_u32(value.to_bits())
    }

    /// Writes a little-endian IEEE-754 binary64 float.
    pub fn write_f64(&mut self, value: f64) -> StreamResult<()> {
        self.write_u64(value.to_bits())
    }

    /// Copies a run of raw bytes and advances.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> StreamResult<()> {
        self.put(bytes)
    }

    /// Writes a string as UTF-16LE code units followed by a 16-bit NUL.
    ///
    /// Characters above U+FFFF are emitted as surrogate pairs.
    pub fn write_utf16_string(&mut self, value: &str) -> StreamResult<()> {
        for unit in value.encode_utf16() {
            self.write_u16(unit)?;
        }
        self.write_u16(0)
    }
}
