//! The serializable-record capability and stock implementations.
//!
//! Anything implementing [`Record`] can travel inside sequences and maps;
//! concrete device message schemas implement it over the typed reader and
//! writer. The primitive field types implement it too, so `Vec<u32>` or
//! `Vec<(u8, String)>` serialize without wrapper types. Nullable
//! primitives use their width's sentinel encoding.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::reader::FieldReader;
use crate::writer::FieldWriter;

/// Behavioral contract for types that serialize through the typed field
/// layer.
///
/// `load` fills `self` from the reader's cursor; `save` appends the same
/// wire representation through the writer. Implementations must keep the
/// two in lockstep.
pub trait Record {
    /// Fills `self` from the reader.
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError>;

    /// Appends `self` through the writer.
    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError>;
}

impl Record for bool {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_bool()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_bool(*self)
    }
}

impl Record for u8 {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_u8()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_u8(*self)
    }
}

impl Record for u16 {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_u16()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_u16(*self)
    }
}

impl Record for i16 {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_i16()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_i16(*self)
    }
}

impl Record for u32 {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_u32()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_u32(*self)
    }
}

impl Record for i32 {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_i32()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_i32(*self)
    }
}

impl Record for f32 {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_f32()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_f32(*self)
    }
}

impl Record for String {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_str()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_str(self)
    }
}

impl Record for Option<bool> {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_bool_opt()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_bool_opt(*self)
    }
}

impl Record for Option<u8> {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_u8_opt()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_u8_opt(*self)
    }
}

impl Record for Option<u16> {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_u16_opt()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_u16_opt(*self)
    }
}

impl Record for Option<i16> {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_i16_opt()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_i16_opt(*self)
    }
}

impl Record for Option<u32> {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_u32_opt()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_u32_opt(*self)
    }
}

impl Record for Option<i32> {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_i32_opt()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_i32_opt(*self)
    }
}

impl Record for Option<f32> {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_f32_opt()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_f32_opt(*self)
    }
}

/// A key/value pair serializes as the key record immediately followed by
/// the value record, which makes a map the same wire bytes as a sequence
/// of pairs.
impl<K: Record, V: Record> Record for (K, V) {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        self.0.load(reader)?;
        self.1.load(reader)
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        self.0.save(writer)?;
        self.1.save(writer)
    }
}

impl<T: Record + Default> Record for Vec<T> {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        *self = reader.read_seq()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        writer.write_seq(self)
    }
}

/// A value with a companion flag, serialized value first.
///
/// Device schemas use this for readings that carry a validity or
/// change-pending marker next to the value itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Flagged<T> {
    pub value: T,
    pub flag: bool,
}

impl<T> Flagged<T> {
    /// Creates a flagged value.
    pub fn new(value: T, flag: bool) -> Self {
        Self { value, flag }
    }
}

impl<T: Record> Record for Flagged<T> {
    fn load(&mut self, reader: &mut FieldReader<'_>) -> Result<(), ProtocolError> {
        self.value.load(reader)?;
        self.flag = reader.read_bool()?;
        Ok(())
    }

    fn save(&self, writer: &mut FieldWriter<'_>) -> Result<(), ProtocolError> {
        self.value.save(writer)?;
        writer.write_bool(self.flag)
    }
}
