//! Typed field reader over a message buffer.
//!
//! Mirrors the writer: big-endian integers, null sentinels, the string
//! length-prefix escape, and sequence/map reconstruction. A read that
//! needs more bytes than remain fails with
//! [`ProtocolError::BufferExhausted`]; booleans outside their domain fail
//! with [`ProtocolError::InvalidFieldValue`].

use crate::bits;
use crate::error::ProtocolError;
use crate::message::MessageBuffer;
use crate::record::Record;
use crate::{BOOL_NULL, FLOAT_FACTOR, F32_NULL, I16_NULL, I32_NULL, U16_NULL, U32_NULL, U8_NULL};

/// Consumes typed fields from a [`MessageBuffer`], front to back.
///
/// Obtained from [`MessageBuffer::reader`]; the cursor starts at the
/// first body byte.
#[derive(Debug)]
pub struct FieldReader<'a> {
    msg: &'a MessageBuffer,
    position: usize,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(msg: &'a MessageBuffer) -> Self {
        Self { msg, position: 0 }
    }

    /// Current cursor offset into the body.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of unread body bytes.
    pub fn remaining(&self) -> usize {
        self.msg.len() - self.position
    }

    /// Returns whether the cursor has consumed the whole body.
    pub fn at_end(&self) -> bool {
        self.position >= self.msg.len()
    }

    /// Returns whether at least `count` bytes remain.
    pub fn has(&self, count: usize) -> bool {
        self.remaining() >= count
    }

    fn require(&self, needed: usize) -> Result<(), ProtocolError> {
        if self.has(needed) {
            Ok(())
        } else {
            Err(ProtocolError::BufferExhausted {
                needed,
                remaining: self.remaining(),
            })
        }
    }

    fn take(&mut self) -> u8 {
        let byte = self.msg.body()[self.position];
        self.position += 1;
        byte
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        self.require(1)?;
        Ok(self.take())
    }

    /// Reads a nullable byte; [`U8_NULL`] becomes `None`.
    pub fn read_u8_opt(&mut self) -> Result<Option<u8>, ProtocolError> {
        let value = self.read_u8()?;
        Ok((value != U8_NULL).then_some(value))
    }

    /// Reads a boolean, rejecting any byte other than 0x00 or 0x01.
    pub fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        match self.read_u8()? {
            0x00 => Ok(false),
            0x01 => Ok(true),
            value => Err(ProtocolError::InvalidFieldValue { value }),
        }
    }

    /// Reads a nullable boolean, accepting only 0x00, 0x01 and
    /// [`BOOL_NULL`].
    pub fn read_bool_opt(&mut self) -> Result<Option<bool>, ProtocolError> {
        match self.read_u8()? {
            0x00 => Ok(Some(false)),
            0x01 => Ok(Some(true)),
            BOOL_NULL => Ok(None),
            value => Err(ProtocolError::InvalidFieldValue { value }),
        }
    }

    /// Reads a 16-bit unsigned integer, most significant byte first.
    pub fn read_u16(&mut self) -> Result<u16, ProtocolError> {
        self.require(2)?;
        let high = self.take();
        let low = self.take();
        Ok(bits::build_word(high, low))
    }

    /// Reads a nullable `u16`; [`U16_NULL`] becomes `None`.
    pub fn read_u16_opt(&mut self) -> Result<Option<u16>, ProtocolError> {
        let value = self.read_u16()?;
        Ok((value != U16_NULL).then_some(value))
    }

    /// Reads a 16-bit signed integer.
    pub fn read_i16(&mut self) -> Result<i16, ProtocolError> {
        Ok(self.read_u16()? as i16)
    }

    /// Reads a nullable `i16`; [`I16_NULL`] becomes `None`.
    pub fn read_i16_opt(&mut self) -> Result<Option<i16>, ProtocolError> {
        let value = self.read_i16()?;
        Ok((value != I16_NULL).then_some(value))
    }

    /// Reads a 32-bit unsigned integer, most significant word first.
    pub fn read_u32(&mut self) -> Result<u32, ProtocolError> {
        self.require(4)?;
        let high = bits::build_word(self.take(), self.take());
        let low = bits::build_word(self.take(), self.take());
        Ok(bits::build_dword(high, low))
    }

    /// Reads a nullable `u32`; [`U32_NULL`] becomes `None`.
    pub fn read_u32_opt(&mut self) -> Result<Option<u32>, ProtocolError> {
        let value = self.read_u32()?;
        Ok((value != U32_NULL).then_some(value))
    }

    /// Reads a 32-bit signed integer.
    pub fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        Ok(self.read_u32()? as i32)
    }

    /// Reads a nullable `i32`; [`I32_NULL`] becomes `None`.
    pub fn read_i32_opt(&mut self) -> Result<Option<i32>, ProtocolError> {
        let value = self.read_i32()?;
        Ok((value != I32_NULL).then_some(value))
    }

    /// Reads a float from its fixed-point integer, dividing by
    /// [`FLOAT_FACTOR`].
    ///
    /// The sentinel is not interpreted here; callers that wrote the field
    /// as nullable must read it with
    /// [`read_f32_opt`](FieldReader::read_f32_opt).
    pub fn read_f32(&mut self) -> Result<f32, ProtocolError> {
        Ok(self.read_i32()? as f32 / FLOAT_FACTOR)
    }

    /// Reads a nullable float; the stored [`F32_NULL`] integer becomes
    /// `None`.
    pub fn read_f32_opt(&mut self) -> Result<Option<f32>, ProtocolError> {
        let raw = self.read_i32()?;
        if raw == F32_NULL {
            Ok(None)
        } else {
            Ok(Some(raw as f32 / FLOAT_FACTOR))
        }
    }

    /// Reads a length-prefixed string, honoring the 0xFF escape for
    /// lengths of 255 and above.
    pub fn read_str(&mut self) -> Result<String, ProtocolError> {
        let short_len = self.read_u8()?;
        let len = if short_len == 0xFF {
            self.read_u16()? as usize
        } else {
            short_len as usize
        };

        self.require(len)?;
        let mut result = String::with_capacity(len);
        for _ in 0..len {
            result.push(self.take() as char);
        }
        Ok(result)
    }

    /// Reads a sequence written by [`FieldWriter::write_seq`]: a 16-bit
    /// count, then each element loaded into a freshly constructed
    /// instance.
    ///
    /// [`FieldWriter::write_seq`]: crate::writer::FieldWriter::write_seq
    pub fn read_seq<T: Record + Default>(&mut self) -> Result<Vec<T>, ProtocolError> {
        let count = self.read_u16()?;
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mut item = T::default();
            item.load(self)?;
            items.push(item);
        }
        Ok(items)
    }

    /// Reads a map written by [`FieldWriter::write_map`]: a 16-bit pair
    /// count, then alternating key/value records, preserving order.
    ///
    /// [`FieldWriter::write_map`]: crate::writer::FieldWriter::write_map
    pub fn read_map<K, V>(&mut self) -> Result<Vec<(K, V)>, ProtocolError>
    where
        K: Record + Default,
        V: Record + Default,
    {
        let count = self.read_u16()?;
        let mut pairs = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mut key = K::default();
            key.load(self)?;
            let mut value = V::default();
            value.load(self)?;
            pairs.push((key, value));
        }
        Ok(pairs)
    }
}
