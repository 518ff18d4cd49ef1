//! # hexlink-protocol
//!
//! Wire codec for the hexlink device protocol: small structured records
//! exchanged between a controller and remote devices over a
//! character-oriented channel (typically a serial link).
//!
//! This crate provides:
//! - An ASCII-hex framed text envelope with CRC-8 integrity checking
//! - A fixed-capacity message buffer with encode/decode orchestration
//! - Typed field serialization (integers, booleans, fixed-point floats,
//!   strings, sequences and maps of records) with null-sentinel support
//! - A pluggable per-byte cipher seam (identity by default)

pub mod bits;
pub mod cipher;
pub mod crc8;
pub mod error;
pub mod hex;
pub mod message;
pub mod reader;
pub mod record;
pub mod scanner;
pub mod writer;

pub use cipher::{ByteCipher, IdentityCipher};
pub use crc8::Crc8;
pub use error::ProtocolError;
pub use message::MessageBuffer;
pub use reader::FieldReader;
pub use record::{Flagged, Record};
pub use scanner::FrameScanner;
pub use writer::FieldWriter;

/// Body capacity of a message buffer in bytes.
///
/// The trailing checksum byte must fit within the same bound at decode
/// time, so the longest encodable body is [`BODY_CAPACITY`]` - 1` bytes.
pub const BODY_CAPACITY: usize = 256;

/// Literal marker opening an envelope.
pub const MESSAGE_HEADER: &str = "<msg>";

/// Literal marker closing an envelope.
pub const MESSAGE_FOOTER: &str = "</msg>";

/// Line-break sequence used inside envelopes.
pub const NEW_LINE: &str = "\n\r";

/// Number of body bytes per envelope line (40 hex characters).
pub const LINE_WRAP_BYTES: usize = 20;

/// Seed for the CRC-8 accumulator.
pub const CRC_SEED: u8 = 0xAB;

/// Scale factor of the fixed-point float representation.
pub const FLOAT_FACTOR: f32 = 1000.0;

/// Null sentinel for nullable `u8` fields.
pub const U8_NULL: u8 = u8::MAX;

/// Null sentinel for nullable `u16` fields.
pub const U16_NULL: u16 = u16::MAX;

/// Null sentinel for nullable `i16` fields.
pub const I16_NULL: i16 = i16::MAX;

/// Null sentinel for nullable `u32` fields.
pub const U32_NULL: u32 = u32::MAX;

/// Null sentinel for nullable `i32` fields.
pub const I32_NULL: i32 = i32::MAX;

/// Null sentinel stored in place of the fixed-point integer for nullable
/// float fields.
pub const F32_NULL: i32 = i32::MAX;

/// Null sentinel for nullable boolean fields (outside the 0/1 domain).
pub const BOOL_NULL: u8 = 0xFF;
