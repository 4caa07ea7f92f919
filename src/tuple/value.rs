use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bytes::{Buf, BufMut, BytesMut};

use crate::common::{ObjectOwner, ObjectRef, Result, TupleError, INLINE_OBJECT_NULL_BIT};
use crate::memory::{ObjectHeap, Pool};

use super::{DataType, Decimal};

/// Bytes of a string or binary value.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Free-standing bytes that are not stored in the object heap
    Bytes(Arc<[u8]>),
    /// An out-of-line object resolved from a tuple slot
    Object { object: ObjectRef, data: Arc<[u8]> },
}

impl Payload {
    /// Returns the payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Bytes(data) => data,
            Payload::Object { data, .. } => data,
        }
    }

    /// Returns the object this payload was resolved from, if any.
    pub fn object(&self) -> Option<ObjectRef> {
        match self {
            Payload::Bytes(_) => None,
            Payload::Object { object, .. } => Some(*object),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Represents a typed value that can be stored in a tuple.
/// Each variant corresponds to a DataType and holds the actual data.
///
/// Fixed-width values are stored with the minimum value of their type as the
/// NULL marker, so those minimums cannot be stored as ordinary values.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value - can be any type
    Null,

    /// Boolean value
    Boolean(bool),

    /// 8-bit signed integer
    TinyInt(i8),

    /// 16-bit signed integer
    SmallInt(i16),

    /// 32-bit signed integer
    Integer(i32),

    /// 64-bit signed integer
    BigInt(i64),

    /// 64-bit floating point
    Double(f64),

    /// Timestamp value (microseconds since Unix epoch)
    Timestamp(i64),

    /// Fixed-point decimal
    Decimal(Decimal),

    /// Character string
    String(Payload),

    /// Byte string
    Binary(Payload),
}

fn fixed<const N: usize>(data: &[u8]) -> Result<[u8; N]> {
    data.get(..N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(TupleError::Truncated {
            needed: N,
            available: data.len(),
        })
}

fn need(input: &impl Buf, needed: usize) -> Result<()> {
    if input.remaining() < needed {
        return Err(TupleError::Truncated {
            needed,
            available: input.remaining(),
        });
    }
    Ok(())
}

impl Value {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the name of this value's kind for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Boolean(_) => "BOOLEAN",
            Value::TinyInt(_) => "TINYINT",
            Value::SmallInt(_) => "SMALLINT",
            Value::Integer(_) => "INTEGER",
            Value::BigInt(_) => "BIGINT",
            Value::Double(_) => "DOUBLE",
            Value::Timestamp(_) => "TIMESTAMP",
            Value::Decimal(_) => "DECIMAL",
            Value::String(_) => "VARCHAR",
            Value::Binary(_) => "VARBINARY",
        }
    }

    /// Returns the bytes of a string or binary value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(p) | Value::Binary(p) => Some(p.as_bytes()),
            _ => None,
        }
    }

    /// Returns the out-of-line object backing this value, if any.
    pub fn object_ref(&self) -> Option<ObjectRef> {
        match self {
            Value::String(p) | Value::Binary(p) => p.object(),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Value::TinyInt(v) => Some(*v as i64),
            Value::SmallInt(v) => Some(*v as i64),
            Value::Integer(v) => Some(*v as i64),
            Value::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to cast this value to the target type.
    ///
    /// Integer narrowing is range checked; the minimum of each integer type is
    /// reserved for NULL and rejected. Variable-length widths are checked when
    /// the value is stored, not here.
    pub fn cast(&self, target: &DataType) -> Result<Value> {
        let fail = || TupleError::InvalidCast {
            from: format!("{} {}", self.kind_name(), self),
            to: *target,
        };

        if self.is_null() {
            return Ok(Value::Null);
        }

        if let Some(v) = self.as_i64() {
            return match target {
                DataType::TinyInt => i8::try_from(v)
                    .ok()
                    .filter(|v| *v != i8::MIN)
                    .map(Value::TinyInt)
                    .ok_or_else(fail),
                DataType::SmallInt => i16::try_from(v)
                    .ok()
                    .filter(|v| *v != i16::MIN)
                    .map(Value::SmallInt)
                    .ok_or_else(fail),
                DataType::Integer => i32::try_from(v)
                    .ok()
                    .filter(|v| *v != i32::MIN)
                    .map(Value::Integer)
                    .ok_or_else(fail),
                DataType::BigInt if v != i64::MIN => Ok(Value::BigInt(v)),
                DataType::Timestamp if v != i64::MIN => Ok(Value::Timestamp(v)),
                DataType::Double => Ok(Value::Double(v as f64)),
                DataType::Decimal => Ok(Value::Decimal(Decimal::from_i64(v))),
                _ => Err(fail()),
            };
        }

        match (self, target) {
            (Value::Boolean(b), DataType::Boolean) => Ok(Value::Boolean(*b)),
            (Value::Timestamp(v), DataType::Timestamp) if *v != i64::MIN => {
                Ok(Value::Timestamp(*v))
            }
            (Value::Timestamp(v), DataType::BigInt) if *v != i64::MIN => Ok(Value::BigInt(*v)),
            (Value::Double(v), DataType::Double) if *v != f64::MIN => Ok(Value::Double(*v)),
            (Value::Decimal(d), DataType::Decimal) if d.in_range() => Ok(Value::Decimal(*d)),
            (Value::Decimal(d), DataType::Double) => {
                Ok(Value::Double(d.unscaled() as f64 / 1e12))
            }
            (Value::String(p), DataType::VarChar(_)) => Ok(Value::String(p.clone())),
            (Value::String(p), DataType::Decimal) => std::str::from_utf8(p.as_bytes())
                .map_err(|_| fail())?
                .trim()
                .parse::<Decimal>()
                .map(Value::Decimal),
            (Value::Binary(p), DataType::VarBinary(_)) => Ok(Value::Binary(p.clone())),
            _ => Err(fail()),
        }
    }

    /// Materializes a value from a column slot. Out-of-line slots resolve to
    /// the referenced object without copying its bytes.
    pub(crate) fn read_from_slot(slot: &[u8], ty: &DataType, inlined: bool) -> Result<Value> {
        if !ty.is_variable_length() {
            return Self::read_fixed(slot, ty);
        }

        let payload = if inlined {
            let header = *slot.first().ok_or(TupleError::Truncated {
                needed: 1,
                available: 0,
            })?;
            if header & INLINE_OBJECT_NULL_BIT != 0 {
                return Ok(Value::Null);
            }
            let len = (header & (INLINE_OBJECT_NULL_BIT - 1)) as usize;
            let data = slot.get(1..1 + len).ok_or_else(|| {
                TupleError::Corrupt(format!("inline length {} exceeds slot width", len))
            })?;
            Payload::Bytes(Arc::from(data))
        } else {
            let object = match ObjectRef::decode(slot) {
                Some(Some(object)) => object,
                Some(None) => return Ok(Value::Null),
                None => return Err(TupleError::Corrupt("invalid object reference".into())),
            };
            let data = ObjectHeap::global().get(object)?;
            Payload::Object { object, data }
        };

        Ok(match ty {
            DataType::VarBinary(_) => Value::Binary(payload),
            _ => Value::String(payload),
        })
    }

    fn read_fixed(slot: &[u8], ty: &DataType) -> Result<Value> {
        let value = match ty {
            DataType::Boolean => match fixed::<1>(slot)?[0] {
                0x80 => Value::Null,
                b => Value::Boolean(b != 0),
            },
            DataType::TinyInt => match i8::from_le_bytes(fixed(slot)?) {
                i8::MIN => Value::Null,
                v => Value::TinyInt(v),
            },
            DataType::SmallInt => match i16::from_le_bytes(fixed(slot)?) {
                i16::MIN => Value::Null,
                v => Value::SmallInt(v),
            },
            DataType::Integer => match i32::from_le_bytes(fixed(slot)?) {
                i32::MIN => Value::Null,
                v => Value::Integer(v),
            },
            DataType::BigInt => match i64::from_le_bytes(fixed(slot)?) {
                i64::MIN => Value::Null,
                v => Value::BigInt(v),
            },
            DataType::Timestamp => match i64::from_le_bytes(fixed(slot)?) {
                i64::MIN => Value::Null,
                v => Value::Timestamp(v),
            },
            DataType::Double => {
                let v = f64::from_le_bytes(fixed(slot)?);
                if v == f64::MIN {
                    Value::Null
                } else {
                    Value::Double(v)
                }
            }
            DataType::Decimal => match i128::from_le_bytes(fixed(slot)?) {
                i128::MIN => Value::Null,
                v => Value::Decimal(Decimal::from_unscaled(v)),
            },
            DataType::VarChar(_) | DataType::VarBinary(_) => {
                return Err(TupleError::Corrupt(format!("{} is not fixed width", ty)))
            }
        };
        Ok(value)
    }

    /// Stores this value into a column slot. For an out-of-line column the
    /// slot receives a reference to the value's existing object; no payload
    /// is allocated.
    pub(crate) fn write_to_slot(
        &self,
        slot: &mut [u8],
        ty: &DataType,
        inlined: bool,
        column: usize,
    ) -> Result<()> {
        if !ty.is_variable_length() {
            return self.write_fixed(slot, ty);
        }
        if inlined {
            return self.write_inline(slot, ty, column);
        }

        match self {
            Value::Null => ObjectRef::encode_null(slot),
            Value::String(p) | Value::Binary(p) => {
                Self::check_width(p.len(), ty, column)?;
                let object = p.object().ok_or(TupleError::UnbackedObject { column })?;
                object.encode(slot);
            }
            _ => return Err(self.mismatch(ty)),
        }
        Ok(())
    }

    /// Stores this value into a column slot, copying the bytes of an
    /// out-of-line value into a new object allocated from `pool`, or from the
    /// heap if no pool is given. Returns the newly allocated object.
    pub(crate) fn write_to_slot_copying(
        &self,
        slot: &mut [u8],
        ty: &DataType,
        inlined: bool,
        column: usize,
        pool: Option<&Pool>,
    ) -> Result<Option<ObjectRef>> {
        if inlined || !ty.is_variable_length() {
            self.write_to_slot(slot, ty, inlined, column)?;
            return Ok(None);
        }

        match self {
            Value::Null => {
                ObjectRef::encode_null(slot);
                Ok(None)
            }
            Value::String(p) | Value::Binary(p) => {
                Self::check_width(p.len(), ty, column)?;
                let object = match pool {
                    Some(pool) => pool.allocate_object(p.as_bytes()),
                    None => ObjectHeap::global().allocate(ObjectOwner::Heap, p.as_bytes()),
                };
                object.encode(slot);
                Ok(Some(object))
            }
            _ => Err(self.mismatch(ty)),
        }
    }

    /// Writes the NULL encoding of `ty` into a column slot.
    pub(crate) fn write_null_to_slot(slot: &mut [u8], ty: &DataType, inlined: bool) {
        if !ty.is_variable_length() {
            Self::write_null_sentinel(slot, ty);
        } else if inlined {
            slot.fill(0);
            slot[0] = INLINE_OBJECT_NULL_BIT;
        } else {
            ObjectRef::encode_null(slot);
        }
    }

    /// The slot is left untouched when the value is rejected.
    fn write_inline(&self, slot: &mut [u8], ty: &DataType, column: usize) -> Result<()> {
        match self {
            Value::Null => {
                slot.fill(0);
                slot[0] = INLINE_OBJECT_NULL_BIT;
            }
            Value::String(p) | Value::Binary(p) => {
                let len = p.len();
                Self::check_width(len, ty, column)?;
                if len + 1 > slot.len() {
                    return Err(TupleError::ValueTooWide {
                        column,
                        length: len,
                        max: slot.len().saturating_sub(1),
                    });
                }
                slot.fill(0);
                slot[0] = len as u8;
                slot[1..1 + len].copy_from_slice(p.as_bytes());
            }
            _ => return Err(self.mismatch(ty)),
        }
        Ok(())
    }

    fn write_fixed(&self, slot: &mut [u8], ty: &DataType) -> Result<()> {
        match (self, ty) {
            (Value::Null, _) => Self::write_null_sentinel(slot, ty),
            (Value::Boolean(b), DataType::Boolean) => slot[0] = *b as u8,
            (Value::TinyInt(v), DataType::TinyInt) => slot[..1].copy_from_slice(&v.to_le_bytes()),
            (Value::SmallInt(v), DataType::SmallInt) => {
                slot[..2].copy_from_slice(&v.to_le_bytes())
            }
            (Value::Integer(v), DataType::Integer) => slot[..4].copy_from_slice(&v.to_le_bytes()),
            (Value::BigInt(v), DataType::BigInt) | (Value::Timestamp(v), DataType::Timestamp) => {
                slot[..8].copy_from_slice(&v.to_le_bytes())
            }
            (Value::Double(v), DataType::Double) => slot[..8].copy_from_slice(&v.to_le_bytes()),
            (Value::Decimal(d), DataType::Decimal) => {
                slot[..16].copy_from_slice(&d.unscaled().to_le_bytes())
            }
            _ => return Err(self.mismatch(ty)),
        }
        Ok(())
    }

    fn write_null_sentinel(slot: &mut [u8], ty: &DataType) {
        match ty {
            DataType::Boolean => slot[0] = 0x80,
            DataType::TinyInt => slot[..1].copy_from_slice(&i8::MIN.to_le_bytes()),
            DataType::SmallInt => slot[..2].copy_from_slice(&i16::MIN.to_le_bytes()),
            DataType::Integer => slot[..4].copy_from_slice(&i32::MIN.to_le_bytes()),
            DataType::BigInt | DataType::Timestamp => {
                slot[..8].copy_from_slice(&i64::MIN.to_le_bytes())
            }
            DataType::Double => slot[..8].copy_from_slice(&f64::MIN.to_le_bytes()),
            DataType::Decimal => slot[..16].copy_from_slice(&i128::MIN.to_le_bytes()),
            DataType::VarChar(_) | DataType::VarBinary(_) => {}
        }
    }

    fn check_width(len: usize, ty: &DataType, column: usize) -> Result<()> {
        match ty.max_length() {
            Some(max) if len > max => Err(TupleError::ValueTooWide {
                column,
                length: len,
                max,
            }),
            _ => Ok(()),
        }
    }

    fn mismatch(&self, ty: &DataType) -> TupleError {
        TupleError::InvalidCast {
            from: format!("{} {}", self.kind_name(), self),
            to: *ty,
        }
    }

    /// Writes the generic wire encoding of this value as a column of type
    /// `ty` (big-endian; NULL encoded per type).
    pub fn serialize_to(&self, ty: &DataType, out: &mut BytesMut) -> Result<()> {
        match (self, ty) {
            (Value::Null, DataType::Boolean) => out.put_i8(i8::MIN),
            (Value::Null, DataType::TinyInt) => out.put_i8(i8::MIN),
            (Value::Null, DataType::SmallInt) => out.put_i16(i16::MIN),
            (Value::Null, DataType::Integer) => out.put_i32(i32::MIN),
            (Value::Null, DataType::BigInt | DataType::Timestamp) => out.put_i64(i64::MIN),
            (Value::Null, DataType::Double) => out.put_f64(f64::MIN),
            (Value::Null, DataType::Decimal) => out.put_i128(i128::MIN),
            (Value::Null, DataType::VarChar(_) | DataType::VarBinary(_)) => out.put_i32(-1),

            (Value::Boolean(b), DataType::Boolean) => out.put_i8(*b as i8),
            (Value::TinyInt(v), DataType::TinyInt) => out.put_i8(*v),
            (Value::SmallInt(v), DataType::SmallInt) => out.put_i16(*v),
            (Value::Integer(v), DataType::Integer) => out.put_i32(*v),
            (Value::BigInt(v), DataType::BigInt) | (Value::Timestamp(v), DataType::Timestamp) => {
                out.put_i64(*v)
            }
            (Value::Double(v), DataType::Double) => out.put_f64(*v),
            (Value::Decimal(d), DataType::Decimal) => out.put_i128(d.unscaled()),
            (Value::String(p), DataType::VarChar(_)) | (Value::Binary(p), DataType::VarBinary(_)) => {
                out.put_i32(p.len() as i32);
                out.put_slice(p.as_bytes());
            }
            _ => return Err(self.mismatch(ty)),
        }
        Ok(())
    }

    /// Reads a value of type `ty` in the generic wire encoding.
    /// String and binary values come back as free-standing bytes.
    pub fn deserialize_from(input: &mut impl Buf, ty: &DataType) -> Result<Value> {
        need(&*input, ty.fixed_size().unwrap_or(4))?;
        let value = match ty {
            DataType::Boolean => match input.get_i8() {
                i8::MIN => Value::Null,
                b => Value::Boolean(b != 0),
            },
            DataType::TinyInt => match input.get_i8() {
                i8::MIN => Value::Null,
                v => Value::TinyInt(v),
            },
            DataType::SmallInt => match input.get_i16() {
                i16::MIN => Value::Null,
                v => Value::SmallInt(v),
            },
            DataType::Integer => match input.get_i32() {
                i32::MIN => Value::Null,
                v => Value::Integer(v),
            },
            DataType::BigInt => match input.get_i64() {
                i64::MIN => Value::Null,
                v => Value::BigInt(v),
            },
            DataType::Timestamp => match input.get_i64() {
                i64::MIN => Value::Null,
                v => Value::Timestamp(v),
            },
            DataType::Double => {
                let v = input.get_f64();
                if v == f64::MIN {
                    Value::Null
                } else {
                    Value::Double(v)
                }
            }
            DataType::Decimal => match input.get_i128() {
                i128::MIN => Value::Null,
                v => Value::Decimal(Decimal::from_unscaled(v)),
            },
            DataType::VarChar(_) | DataType::VarBinary(_) => {
                let len = input.get_i32();
                if len == -1 {
                    return Ok(Value::Null);
                }
                if len < 0 {
                    return Err(TupleError::Corrupt(format!("negative object length {}", len)));
                }
                need(&*input, len as usize)?;
                let mut data = vec![0u8; len as usize];
                input.copy_to_slice(&mut data);
                let payload = Payload::Bytes(Arc::from(data));
                match ty {
                    DataType::VarBinary(_) => Value::Binary(payload),
                    _ => Value::String(payload),
                }
            }
        };
        Ok(value)
    }

    /// Writes the export encoding of a non-null value of type `ty`
    /// (little-endian; integers and timestamps widened to 8 bytes).
    pub fn serialize_to_export(&self, ty: &DataType, out: &mut BytesMut) -> Result<()> {
        if !ty.is_exportable() {
            return Err(TupleError::UnsupportedExportType(*ty));
        }
        match (self, ty) {
            (Value::Null, _) => {}
            (Value::Double(v), DataType::Double) => out.put_f64_le(*v),
            (Value::Timestamp(v), DataType::Timestamp) => out.put_i64_le(*v),
            (Value::Decimal(d), DataType::Decimal) => {
                let text = d.to_string();
                out.put_i32_le(text.len() as i32);
                out.put_slice(text.as_bytes());
            }
            (Value::String(p), DataType::VarChar(_)) | (Value::Binary(p), DataType::VarBinary(_)) => {
                out.put_i32_le(p.len() as i32);
                out.put_slice(p.as_bytes());
            }
            (v, DataType::TinyInt | DataType::SmallInt | DataType::Integer | DataType::BigInt) => {
                let v = v.as_i64().ok_or_else(|| v.mismatch(ty))?;
                out.put_i64_le(v);
            }
            _ => return Err(self.mismatch(ty)),
        }
        Ok(())
    }

    /// Compares two values. NULL sorts before every other value; integer
    /// kinds compare with each other by value.
    pub fn compare(&self, other: &Value) -> Result<Ordering> {
        let ordering = match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,

            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Value::Binary(a), Value::Binary(b)) => a.as_bytes().cmp(b.as_bytes()),

            (a, b) => match (a.as_i64(), b.as_i64()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => {
                    return Err(TupleError::Incomparable {
                        left: self.kind_name().to_string(),
                        right: other.kind_name().to_string(),
                    })
                }
            },
        };
        Ok(ordering)
    }

    /// Returns true if the values compare equal.
    pub fn equals(&self, other: &Value) -> bool {
        matches!(self.compare(other), Ok(Ordering::Equal))
    }

    /// Folds this value's hash into `seed`. Values that compare equal
    /// contribute the same hash.
    pub fn hash_combine(&self, seed: &mut u64) {
        let mut hasher = DefaultHasher::new();
        match self {
            Value::Null => 0u8.hash(&mut hasher),
            Value::Boolean(b) => b.hash(&mut hasher),
            Value::Double(v) => v.to_bits().hash(&mut hasher),
            Value::Timestamp(v) => v.hash(&mut hasher),
            Value::Decimal(d) => d.hash(&mut hasher),
            Value::String(p) | Value::Binary(p) => p.as_bytes().hash(&mut hasher),
            v => v.as_i64().hash(&mut hasher),
        }
        let h = hasher.finish();
        *seed ^= h
            .wrapping_add(0x9e37_79b9)
            .wrapping_add(*seed << 6)
            .wrapping_add(*seed >> 2);
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::TinyInt(v) => write!(f, "{}", v),
            Value::SmallInt(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::BigInt(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Timestamp(v) => write!(f, "TIMESTAMP({})", v),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(p) => write!(f, "'{}'", String::from_utf8_lossy(p.as_bytes())),
            Value::Binary(p) => {
                write!(f, "x'")?;
                for b in p.as_bytes() {
                    write!(f, "{:02x}", b)?;
                }
                write!(f, "'")
            }
        }
    }
}

// Convenience conversions
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::TinyInt(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::SmallInt(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(Payload::Bytes(Arc::from(v.into_bytes())))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(Payload::Bytes(Arc::from(v.as_bytes())))
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(Payload::Bytes(Arc::from(v)))
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Binary(Payload::Bytes(Arc::from(v)))
    }
}
