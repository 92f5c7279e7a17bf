//! Pointer-patched message codec for the TERA-family wire protocol.
//!
//! The codec is data-driven: a [`Protocol`] loads textual message
//! definitions and an opcode map once, and thereafter serializes and
//! deserializes records to and from framed byte buffers. Every frame starts
//! with a 4-byte `(uint16 length, uint16 opcode)` header; variable-length
//! fields are referenced by 16-bit count/offset headers in their enclosing
//! record, and array elements carry an intrusive here/next pointer chain.
//!
//! # Design Principles
//!
//! - **One buffer per message** - encoding sizes the output exactly from the
//!   length estimator and back-patches placeholders in place; decoding
//!   borrows the input and copies out strings and byte runs.
//! - **Tolerant reads, strict chains** - offset drift from imperfect
//!   producers is warned about and reconciled; a broken element self-pointer
//!   is a fatal decode error.
//! - **No I/O in the hot path** - file loading happens in
//!   [`Protocol::load`] only.
//!
//! # Example
//!
//! ```
//! use codec::{Protocol, Record};
//!
//! let mut protocol = Protocol::new();
//! protocol.load_map_text("protocol.map", "C_PING 1\n");
//! protocol.load_def_text("C_PING.1.def", "uint32 seq\n");
//!
//! let frame = protocol
//!     .write_latest("C_PING", &Record::new().field("seq", 7u32))
//!     .unwrap();
//! let decoded = protocol.parse_latest("C_PING", &frame).unwrap();
//! assert_eq!(frame.len(), 8);
//! assert_eq!(decoded, Record::new().field("seq", 7u32));
//! ```

mod decode;
mod encode;
mod error;
mod frame;
mod length;
mod limits;
mod protocol;
mod value;

pub use error::{CodecError, CodecResult};
pub use frame::{FrameHeader, FRAME_HEADER_SIZE};
pub use length::message_length;
pub use limits::CodecLimits;
pub use protocol::{LoadError, Protocol};
pub use value::{Record, Value};

// The registry types callers pass straight into parse/write.
pub use schema::{MessageSchema, MessageTarget, Registry, VersionSelect};

/// Joins a dotted field path as recursion descends.
pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
