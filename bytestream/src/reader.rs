//! Byte-level reader with bounded operations.

use crate::error::{StreamError, StreamResult};

/// A little-endian reader over a borrowed byte buffer.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug)]
pub struct ByteReader<'a> {
    /// The underlying byte buffer.
    data: &'a [u8],
    /// Current byte position.
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` over a byte slice, positioned at 0.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current cursor position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the total buffer length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of bytes remaining past the cursor.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Sets the cursor to an absolute position.
    ///
    /// Seeking to the end of the buffer (`position == len`) is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::SeekOutOfBounds`] if `position > len`.
    pub fn seek(&mut self, position: usize) -> StreamResult<()> {
        if position > self.data.len() {
            return Err(StreamError::SeekOutOfBounds {
                position,
                len: self.data.len(),
            });
        }
        self.pos = position;
        Ok(())
    }

    /// Advances the cursor by `n` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::SeekOutOfBounds`] if the target lies past the end.
    pub fn skip(&mut self, n: usize) -> StreamResult<()> {
        self.seek(self.pos + n)
    }

    fn take(&mut self, n: usize) -> StreamResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(StreamError::UnexpectedEof {
                requested: n,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads one byte as a boolean (nonzero = true).
    pub fn read_bool(&mut self) -> StreamResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads an unsigned 8-bit integer.
    pub fn read_u8(&mut self) -> StreamResult<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads a little-endian unsigned 16-bit integer.
    pub fn read_u16(&mut self) -> StreamResult<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Reads a little-endian signed 16-bit integer.
    pub fn read_i16(&mut self) -> StreamResult<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Reads a little-endian unsigned 32-bit integer.
    pub fn read_u32(&mut self) -> StreamResult<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Reads a little-endian signed 32-bit integer.
    pub fn read_i32(&mut self) -> StreamResult<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Reads a little-endian unsigned 64-bit integer.
    pub fn read_u64(&mut self) -> StreamResult<u64> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Reads a little-endian signed 64-bit integer.
    pub fn read_i64(&mut self) -> StreamResult<i64> {
        Ok(self.read_u64()? as i64)
    }

    /// Reads a little-endian IEEE-754 binary32 float.
    pub fn read_f32(&mut self) -> StreamResult<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Reads a little-endian IEEE-754 binary64 float.
    pub fn read_f64(&mut self) -> StreamResult<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Reads a run of `n` raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::UnexpectedEof`] if fewer than `n` bytes remain.
    pub fn read_bytes(&mut self, n: usize) -> StreamResult<&'a [u8]> {
        self.take(n)
    }

    /// Reads UTF-16LE code units up to (and consuming) a 16-bit NUL.
    ///
    /// Invalid code unit sequences decode to U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::UnterminatedString`] if the buffer ends before
    /// a terminator is found.
    pub fn read_utf16_string(&mut self) -> StreamResult<String> {
        let start = self.pos;
        let mut units = Vec::new();
        loop {
            let unit = match self.read_u16() {
                Ok(unit) => unit,
                Err(StreamError::UnexpectedEof { .. }) => {
                    return Err(StreamError::UnterminatedString { start });
                }
                Err(err) => return Err(err),
            };
            if unit == 0 {
                break;
            }
            units.push(unit);
        }
        Ok(char::decode_utf16(units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reader() {
        let reader = ByteReader::new(&[]);
        assert!(reader.is_empty());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_from_empty_fails() {
        let mut reader = ByteReader::new(&[]);
        let result = reader.read_u8();
        assert!(matches!(
            result,
            Err(StreamError::UnexpectedEof {
                requested: 1,
                available: 0
            })
        ));
    }

    #[test]
    fn read_scalars_little_endian() {
        let data = [
            0x01, // u8
            0x34, 0x12, // u16
            0x78, 0x56, 0x34, 0x12, // u32
            0xEF, 0xCD, 0xAB, 0x89, 0x67, 0x45, 0x23, 0x01, // u64
        ];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(reader.read_u64().unwrap(), 0x0123_4567_89AB_CDEF);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn read_signed_reinterprets_bit_pattern() {
        let data = [0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_i16().unwrap(), -1);
        assert_eq!(reader.read_i32().unwrap(), -2);
    }

    #[test]
    fn read_floats() {
        let mut data = Vec::new();
        data.extend_from_slice(&1.5f32.to_le_bytes());
        data.extend_from_slice(&(-2.25f64).to_le_bytes());
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_f32().unwrap(), 1.5);
        assert_eq!(reader.read_f64().unwrap(), -2.25);
    }

    #[test]
    fn read_bool_nonzero_is_true() {
        let mut reader = ByteReader::new(&[0, 1, 42]);
        assert!(!reader.read_bool().unwrap());
        assert!(reader.read_bool().unwrap());
        assert!(reader.read_bool().unwrap());
    }

    #[test]
    fn seek_and_skip() {
        let mut reader = ByteReader::new(&[0, 1, 2, 3]);
        reader.seek(2).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 2);
        reader.seek(0).unwrap();
        reader.skip(3).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 3);
    }

    #[test]
    fn seek_to_end_is_allowed() {
        let mut reader = ByteReader::new(&[0, 1]);
        reader.seek(2).unwrap();
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn seek_past_end_fails() {
        let mut reader = ByteReader::new(&[0, 1]);
        let result = reader.seek(3);
        assert!(matches!(
            result,
            Err(StreamError::SeekOutOfBounds { position: 3, len: 2 })
        ));
    }

    #[test]
    fn read_bytes_returns_slice_and_advances() {
        let mut reader = ByteReader::new(&[9, 8, 7, 6]);
        assert_eq!(reader.read_bytes(3).unwrap(), &[9, 8, 7]);
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn read_bytes_zero_length() {
        let mut reader = ByteReader::new(&[]);
        assert_eq!(reader.read_bytes(0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn read_utf16_string_basic() {
        // "Hi" + NUL
        let data = [0x48, 0x00, 0x69, 0x00, 0x00, 0x00];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_utf16_string().unwrap(), "Hi");
        assert_eq!(reader.position(), 6);
    }

    #[test]
    fn read_utf16_string_empty() {
        let data = [0x00, 0x00, 0xAA];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_utf16_string().unwrap(), "");
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn read_utf16_string_surrogate_pair() {
        // U+1F600 as a surrogate pair, then NUL
        let data = [0x3D, 0xD8, 0x00, 0xDE, 0x00, 0x00];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_utf16_string().unwrap(), "\u{1F600}");
    }

    #[test]
    fn read_utf16_string_lone_surrogate_replaced() {
        let data = [0x3D, 0xD8, 0x41, 0x00, 0x00, 0x00];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_utf16_string().unwrap(), "\u{FFFD}A");
    }

    #[test]
    fn read_utf16_string_unterminated() {
        let data = [0x48, 0x00, 0x69, 0x00];
        let mut reader = ByteReader::new(&data);
        let result = reader.read_utf16_string();
        assert!(matches!(
            result,
            Err(StreamError::UnterminatedString { start: 0 })
        ));
    }

    #[test]
    fn reader_is_const_constructible() {
        const READER: ByteReader<'static> = ByteReader::new(&[1, 2, 3]);
        assert_eq!(READER.remaining(), 3);
    }
}
