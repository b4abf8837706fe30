//! # Serializing Into Values
//!
//! A `serde::Serializer` whose output is a [`Value`]. It follows the shapes
//! `serde_json` produces (unit variants as strings, other variants as a
//! one-entry map, bytes as a sequence of integers) but keeps what JSON
//! cannot hold: non-finite floats stay [`Scalar::Float`], and integers past
//! `i64` become [`Scalar::Decimal`] instead of failing.
//!
//! Map keys must serialize to a scalar; numbers and booleans are rendered as
//! text.

use rust_decimal::Decimal;
use serde::ser::{self, Serialize};

use crate::error::NormalizeError;
use crate::value::{Map, Scalar, Value};

impl ser::Error for NormalizeError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        NormalizeError::Serialization(msg.to_string())
    }
}

fn wide_int(i: i128) -> Result<Value, NormalizeError> {
    match i64::try_from(i) {
        Ok(small) => Ok(Value::Scalar(Scalar::Int(small))),
        Err(_) => Decimal::try_from_i128_with_scale(i, 0)
            .map(|d| Value::Scalar(Scalar::Decimal(d)))
            .map_err(|_| NormalizeError::UnsupportedNumber(i.to_string())),
    }
}

fn key_text(key: Value) -> Result<String, NormalizeError> {
    match key {
        Value::Scalar(scalar) => Ok(scalar.render()),
        other => Err(NormalizeError::UnsupportedKey(other.kind_name().to_string())),
    }
}

fn single_entry(name: &str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(name, value);
    Value::Map(map)
}

/// Serializer producing a canonical [`Value`].
pub(crate) struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = NormalizeError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = VariantSeqBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = MapBuilder;
    type SerializeStructVariant = VariantMapBuilder;

    fn serialize_bool(self, v: bool) -> Result<Value, NormalizeError> {
        Ok(Value::from(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, NormalizeError> {
        Ok(Value::Scalar(Scalar::Int(i64::from(v))))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, NormalizeError> {
        Ok(Value::Scalar(Scalar::Int(i64::from(v))))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, NormalizeError> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, NormalizeError> {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, NormalizeError> {
        wide_int(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Value, NormalizeError> {
        Ok(Value::Scalar(Scalar::Int(i64::from(v))))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, NormalizeError> {
        Ok(Value::Scalar(Scalar::Int(i64::from(v))))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, NormalizeError> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, NormalizeError> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, NormalizeError> {
        i128::try_from(v)
            .map_err(|_| NormalizeError::UnsupportedNumber(v.to_string()))
            .and_then(wide_int)
    }

    fn serialize_f32(self, v: f32) -> Result<Value, NormalizeError> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, NormalizeError> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, NormalizeError> {
        Ok(Value::string(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, NormalizeError> {
        Ok(Value::string(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, NormalizeError> {
        Ok(Value::Sequence(
            v.iter().map(|b| Value::Scalar(Scalar::Int(i64::from(*b)))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Value, NormalizeError> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, NormalizeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, NormalizeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, NormalizeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Value, NormalizeError> {
        Ok(Value::string(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, NormalizeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, NormalizeError> {
        Ok(single_entry(variant, value.serialize(ValueSerializer)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, NormalizeError> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, NormalizeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, NormalizeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantSeqBuilder, NormalizeError> {
        Ok(VariantSeqBuilder {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder, NormalizeError> {
        Ok(MapBuilder {
            map: Map::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MapBuilder, NormalizeError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantMapBuilder, NormalizeError> {
        Ok(VariantMapBuilder {
            variant,
            map: Map::with_capacity(len),
        })
    }
}

/// Collects sequence, tuple and tuple-struct elements.
pub(crate) struct SeqBuilder {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = NormalizeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NormalizeError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NormalizeError> {
        Ok(Value::Sequence(self.items))
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Value;
    type Error = NormalizeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NormalizeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, NormalizeError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = Value;
    type Error = NormalizeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NormalizeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, NormalizeError> {
        ser::SerializeSeq::end(self)
    }
}

/// Collects the fields of a tuple variant under its variant name.
pub(crate) struct VariantSeqBuilder {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for VariantSeqBuilder {
    type Ok = Value;
    type Error = NormalizeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NormalizeError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NormalizeError> {
        Ok(single_entry(self.variant, Value::Sequence(self.items)))
    }
}

/// Collects map entries and struct fields in serialization order.
pub(crate) struct MapBuilder {
    map: Map,
    pending_key: Option<String>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = NormalizeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), NormalizeError> {
        self.pending_key = Some(key_text(key.serialize(ValueSerializer)?)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NormalizeError> {
        let key = self.pending_key.take().ok_or_else(|| {
            NormalizeError::Serialization("map value serialized before its key".to_string())
        })?;
        self.map.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NormalizeError> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStruct for MapBuilder {
    type Ok = Value;
    type Error = NormalizeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), NormalizeError> {
        self.map.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NormalizeError> {
        Ok(Value::Map(self.map))
    }
}

/// Collects the fields of a struct variant under its variant name.
pub(crate) struct VariantMapBuilder {
    variant: &'static str,
    map: Map,
}

impl ser::SerializeStructVariant for VariantMapBuilder {
    type Ok = Value;
    type Error = NormalizeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), NormalizeError> {
        self.map.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NormalizeError> {
        Ok(single_entry(self.variant, Value::Map(self.map)))
    }
}
