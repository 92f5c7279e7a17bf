//! Cursor-based little-endian byte streams for framed game messages.
//!
//! This crate provides the two stream flavors the codec is built on:
//! - [`ByteReader`] borrows an existing buffer and tracks a read cursor
//! - [`ByteWriter`] owns a pre-sized buffer and tracks a write cursor
//!
//! Both support random-access `seek`/`skip`, which the codec uses to
//! back-patch count/offset placeholders after the payload positions are
//! known. All operations are bounds-checked and return errors on failure;
//! neither stream ever panics on malformed input.
//!
//! Strings on the wire are UTF-16LE code units terminated by a 16-bit zero.

mod error;
mod reader;
mod writer;

pub use error::{StreamError, StreamResult};
pub use reader::ByteReader;
pub use writer::ByteWriter;
