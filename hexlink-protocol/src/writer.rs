//! Typed field writer over a message buffer.
//!
//! Multi-byte integers are written big-endian. Nullable variants encode
//! `None` as the width's maximum-value sentinel (0xFF for nullable
//! booleans). A write that would overrun the writable bound fails with
//! [`ProtocolError::Overflow`] and never lands a partial byte; the last
//! capacity slot stays reserved for the checksum trailer so that every
//! writable body is also encodable.

use crate::bits;
use crate::error::ProtocolError;
use crate::message::MessageBuffer;
use crate::record::Record;
use crate::{BOOL_NULL, FLOAT_FACTOR, F32_NULL, I16_NULL, I32_NULL, U16_NULL, U32_NULL, U8_NULL};

/// Appends typed fields to a [`MessageBuffer`].
///
/// Obtained from [`MessageBuffer::writer`], which clears the buffer and
/// starts a fresh session.
#[derive(Debug)]
pub struct FieldWriter<'a> {
    msg: &'a mut MessageBuffer,
}

impl<'a> FieldWriter<'a> {
    pub(crate) fn new(msg: &'a mut MessageBuffer) -> Self {
        Self { msg }
    }

    fn put(&mut self, byte: u8) -> Result<(), ProtocolError> {
        // One slot stays reserved for the checksum trailer.
        if self.msg.len() + 1 < self.msg.capacity() {
            self.msg.push(byte)
        } else {
            Err(ProtocolError::Overflow {
                capacity: self.msg.capacity(),
            })
        }
    }

    fn count_prefix(&mut self, count: usize) -> Result<u16, ProtocolError> {
        u16::try_from(count).map_err(|_| ProtocolError::Overflow {
            capacity: self.msg.capacity(),
        })
    }

    /// Writes one byte.
    pub fn write_u8(&mut self, value: u8) -> Result<(), ProtocolError> {
        self.put(value)
    }

    /// Writes a nullable byte; `None` becomes [`U8_NULL`].
    pub fn write_u8_opt(&mut self, value: Option<u8>) -> Result<(), ProtocolError> {
        self.write_u8(value.unwrap_or(U8_NULL))
    }

    /// Writes a boolean as 0x00 or 0x01.
    pub fn write_bool(&mut self, value: bool) -> Result<(), ProtocolError> {
        self.put(u8::from(value))
    }

    /// Writes a nullable boolean as 0x00, 0x01 or [`BOOL_NULL`].
    pub fn write_bool_opt(&mut self, value: Option<bool>) -> Result<(), ProtocolError> {
        match value {
            Some(value) => self.write_bool(value),
            None => self.put(BOOL_NULL),
        }
    }

    /// Writes a 16-bit unsigned integer, most significant byte first.
    pub fn write_u16(&mut self, value: u16) -> Result<(), ProtocolError> {
        self.put(bits::high_byte(value))?;
        self.put(bits::low_byte(value))
    }

    /// Writes a nullable `u16`; `None` becomes [`U16_NULL`].
    pub fn write_u16_opt(&mut self, value: Option<u16>) -> Result<(), ProtocolError> {
        self.write_u16(value.unwrap_or(U16_NULL))
    }

    /// Writes a 16-bit signed integer, most significant byte first.
    pub fn write_i16(&mut self, value: i16) -> Result<(), ProtocolError> {
        self.write_u16(value as u16)
    }

    /// Writes a nullable `i16`; `None` becomes [`I16_NULL`].
    pub fn write_i16_opt(&mut self, value: Option<i16>) -> Result<(), ProtocolError> {
        self.write_i16(value.unwrap_or(I16_NULL))
    }

    /// Writes a 32-bit unsigned integer, most significant word first.
    pub fn write_u32(&mut self, value: u32) -> Result<(), ProtocolError> {
        self.write_u16(bits::high_word(value))?;
        self.write_u16(bits::low_word(value))
    }

    /// Writes a nullable `u32`; `None` becomes [`U32_NULL`].
    pub fn write_u32_opt(&mut self, value: Option<u32>) -> Result<(), ProtocolError> {
        self.write_u32(value.unwrap_or(U32_NULL))
    }

    /// Writes a 32-bit signed integer, most significant word first.
    pub fn write_i32(&mut self, value: i32) -> Result<(), ProtocolError> {
        self.write_u32(value as u32)
    }

    /// Writes a nullable `i32`; `None` becomes [`I32_NULL`].
    pub fn write_i32_opt(&mut self, value: Option<i32>) -> Result<(), ProtocolError> {
        self.write_i32(value.unwrap_or(I32_NULL))
    }

    /// Writes a float as its fixed-point integer,
    /// `trunc(value / FLOAT_FACTOR)`, rounding toward zero.
    pub fn write_f32(&mut self, value: f32) -> Result<(), ProtocolError> {
        self.write_i32((value / FLOAT_FACTOR) as i32)
    }

    /// Writes a nullable float; `None` stores [`F32_NULL`] directly as
    /// the fixed-point integer.
    pub fn write_f32_opt(&mut self, value: Option<f32>) -> Result<(), ProtocolError> {
        match value {
            Some(value) => self.write_f32(value),
            None => self.write_i32(F32_NULL),
        }
    }

    /// Writes a length-prefixed string.
    ///
    /// Character counts below 255 use a single length byte; longer
    /// strings use the 0xFF marker followed by a 16-bit length. Each
    /// character is written as its low 8 bits.
    pub fn write_str(&mut self, value: &str) -> Result<(), ProtocolError> {
        let len = self.count_prefix(value.chars().count())?;
        if len < 0xFF {
            self.put(len as u8)?;
        } else {
            self.put(0xFF)?;
            self.write_u16(len)?;
        }
        for ch in value.chars() {
            self.put(ch as u8)?;
        }
        Ok(())
    }

    /// Writes a sequence: a 16-bit element count, then each element's
    /// [`Record::save`] in order.
    pub fn write_seq<T: Record>(&mut self, items: &[T]) -> Result<(), ProtocolError> {
        let count = self.count_prefix(items.len())?;
        self.write_u16(count)?;
        for item in items {
            item.save(self)?;
        }
        Ok(())
    }

    /// Writes a map: a 16-bit pair count, then each key's
    /// [`Record::save`] immediately followed by its value's, in order.
    pub fn write_map<K: Record, V: Record>(
        &mut self,
        pairs: &[(K, V)],
    ) -> Result<(), ProtocolError> {
        let count = self.count_prefix(pairs.len())?;
        self.write_u16(count)?;
        for (key, value) in pairs {
            key.save(self)?;
            value.save(self)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BODY_CAPACITY;

    fn body_of(write: impl FnOnce(&mut FieldWriter<'_>)) -> Vec<u8> {
        let mut msg = MessageBuffer::new();
        let mut writer = msg.writer();
        write(&mut writer);
        msg.body().to_vec()
    }

    #[test]
    fn test_integers_are_big_endian() {
        let body = body_of(|w| {
            w.write_u8(0x7A).unwrap();
            w.write_u16(0x1234).unwrap();
            w.write_u32(0xDEAD_BEEF).unwrap();
        });
        assert_eq!(body, [0x7A, 0x12, 0x34, 0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_signed_integers_two_complement() {
        let body = body_of(|w| {
            w.write_i16(-2).unwrap();
            w.write_i32(-1).unwrap();
        });
        assert_eq!(body, [0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_bool_encoding() {
        let body = body_of(|w| {
            w.write_bool(false).unwrap();
            w.write_bool(true).unwrap();
            w.write_bool_opt(Some(true)).unwrap();
            w.write_bool_opt(None).unwrap();
        });
        assert_eq!(body, [0x00, 0x01, 0x01, 0xFF]);
    }

    #[test]
    fn test_null_sentinels() {
        let body = body_of(|w| {
            w.write_u8_opt(None).unwrap();
            w.write_u16_opt(None).unwrap();
            w.write_i16_opt(None).unwrap();
            w.write_u32_opt(None).unwrap();
            w.write_i32_opt(None).unwrap();
        });
        assert_eq!(
            body,
            [
                0xFF, // u8
                0xFF, 0xFF, // u16
                0x7F, 0xFF, // i16
                0xFF, 0xFF, 0xFF, 0xFF, // u32
                0x7F, 0xFF, 0xFF, 0xFF, // i32
            ]
        );
    }

    #[test]
    fn test_float_fixed_point_formula() {
        let body = body_of(|w| w.write_f32(1_234_567.0).unwrap());
        // trunc(1234567.0 / 1000.0) = 1234 = 0x04D2.
        assert_eq!(body, [0x00, 0x00, 0x04, 0xD2]);

        let body = body_of(|w| w.write_f32(-2500.0).unwrap());
        // Rounds toward zero: trunc(-2.5) = -2.
        assert_eq!(body, [0xFF, 0xFF, 0xFF, 0xFE]);

        let body = body_of(|w| w.write_f32_opt(None).unwrap());
        assert_eq!(body, [0x7F, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_short_string_prefix() {
        let body = body_of(|w| w.write_str("hi").unwrap());
        assert_eq!(body, [0x02, b'h', b'i']);
    }

    #[test]
    fn test_string_characters_low_eight_bits() {
        // U+0141 has low byte 0x41.
        let body = body_of(|w| w.write_str("\u{0141}").unwrap());
        assert_eq!(body, [0x01, 0x41]);
    }

    #[test]
    fn test_string_boundary_254_one_byte_prefix() {
        let text = "x".repeat(254);
        let body = body_of(|w| w.write_str(&text).unwrap());
        assert_eq!(body[0], 254);
        assert_eq!(body.len(), 255);
    }

    #[test]
    fn test_string_boundary_255_escaped_prefix() {
        let text = "x".repeat(255);
        let mut msg = MessageBuffer::with_capacity(1024);
        msg.writer().write_str(&text).unwrap();
        assert_eq!(&msg.body()[..3], [0xFF, 0x00, 0xFF]);
        assert_eq!(msg.len(), 3 + 255);
    }

    #[test]
    fn test_long_string_escaped_prefix() {
        let text = "y".repeat(1000);
        let mut msg = MessageBuffer::with_capacity(2048);
        msg.writer().write_str(&text).unwrap();
        // 1000 = 0x03E8.
        assert_eq!(&msg.body()[..3], [0xFF, 0x03, 0xE8]);
        assert_eq!(msg.len(), 3 + 1000);
    }

    #[test]
    fn test_overflow_reserves_trailer_slot() {
        let mut msg = MessageBuffer::new();
        let mut writer = msg.writer();
        for _ in 0..BODY_CAPACITY - 1 {
            writer.write_u8(0xAA).unwrap();
        }
        assert!(matches!(
            writer.write_u8(0xAA),
            Err(ProtocolError::Overflow { .. })
        ));
        assert_eq!(msg.len(), BODY_CAPACITY - 1);
    }

    #[test]
    fn test_multibyte_overflow_boundary() {
        let mut msg = MessageBuffer::new();
        let mut writer = msg.writer();
        for _ in 0..BODY_CAPACITY - 2 {
            writer.write_u8(0).unwrap();
        }
        // One writable slot left; a two-byte field cannot fit.
        assert!(matches!(
            writer.write_u16(0x0102),
            Err(ProtocolError::Overflow { .. })
        ));
    }

    #[test]
    fn test_writer_session_resets_buffer() {
        let mut msg = MessageBuffer::new();
        msg.writer().write_u8(0x01).unwrap();
        assert_eq!(msg.len(), 1);

        msg.writer().write_u16(0x0203).unwrap();
        assert_eq!(msg.body(), [0x02, 0x03]);
    }
}
