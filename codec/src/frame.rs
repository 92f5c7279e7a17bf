//! The 4-byte message frame header.

use bytestream::{ByteReader, ByteWriter, StreamResult};

use crate::error::{CodecError, CodecResult};

/// Frame header size in bytes: `uint16 total_length` + `uint16 opcode`.
pub const FRAME_HEADER_SIZE: usize = 4;

/// The header that prefixes every top-level encoded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Total frame length in bytes, including this header.
    pub length: u16,
    /// Opcode resolved from the message name.
    pub opcode: u16,
}

impl FrameHeader {
    /// Reads a header from the reader's current position.
    pub fn read(reader: &mut ByteReader<'_>) -> StreamResult<Self> {
        let length = reader.read_u16()?;
        let opcode = reader.read_u16()?;
        Ok(Self { length, opcode })
    }

    /// Writes the header at the writer's current position.
    pub fn write(self, writer: &mut ByteWriter) -> StreamResult<()> {
        writer.write_u16(self.length)?;
        writer.write_u16(self.opcode)
    }

    /// Parses the header of a full frame buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FrameTooShort`] for buffers under 4 bytes.
    pub fn parse(frame: &[u8]) -> CodecResult<Self> {
        if frame.len() < FRAME_HEADER_SIZE {
            return Err(CodecError::FrameTooShort { len: frame.len() });
        }
        let mut reader = ByteReader::new(frame);
        Ok(Self::read(&mut reader)?)
    }
}
