use bytes::{Buf, BufMut, BytesMut};
use tracing::trace;

use crate::common::{Result, TupleError, OBJECT_LENGTH_PREFIX};
use crate::memory::{release_objects, ObjectHeap, Pool};

use super::{Tuple, TupleMut, Value};

impl Tuple<'_> {
    /// Appends the tuple in the generic wire format: an `i32` byte count
    /// followed by each column's value encoding in schema order. The header
    /// byte is not included. Nothing is appended on error.
    pub fn serialize_to(&self, out: &mut BytesMut) -> Result<()> {
        let start = out.len();
        out.put_i32(0);

        for i in 0..self.column_count() {
            let ty = self.column_type(i)?;
            let written = self
                .value_at(i)
                .and_then(|value| value.serialize_to(&ty, out));
            if let Err(e) = written {
                out.truncate(start);
                return Err(e);
            }
        }

        let length = (out.len() - start - 4) as i32;
        out[start..start + 4].copy_from_slice(&length.to_be_bytes());
        Ok(())
    }

    /// Appends the export encoding of every non-null column and marks each
    /// NULL column in `null_bitmap` at bit `column_offset + index`, most
    /// significant bit first.
    ///
    /// Fails with `UnsupportedExportType` before writing anything if a column
    /// type has no export encoding.
    pub fn serialize_to_export(
        &self,
        out: &mut BytesMut,
        column_offset: usize,
        null_bitmap: &mut [u8],
    ) -> Result<()> {
        let count = self.column_count();
        let needed = (column_offset + count + 7) / 8;
        if null_bitmap.len() < needed {
            return Err(TupleError::Truncated {
                needed,
                available: null_bitmap.len(),
            });
        }

        let mut values = Vec::with_capacity(count);
        for i in 0..count {
            let ty = self.column_type(i)?;
            if !ty.is_exportable() {
                return Err(TupleError::UnsupportedExportType(ty));
            }
            values.push((ty, self.value_at(i)?));
        }

        let start = out.len();
        for (i, (ty, value)) in values.iter().enumerate() {
            if value.is_null() {
                let bit = column_offset + i;
                null_bitmap[bit >> 3] |= 0x80 >> (bit % 8);
                continue;
            }
            if let Err(e) = value.serialize_to_export(ty, out) {
                out.truncate(start);
                return Err(e);
            }
        }
        trace!(bytes = out.len() - start, "exported tuple");
        Ok(())
    }

    /// Upper bound on the bytes `serialize_to_export` appends, not counting
    /// the null bitmap.
    pub fn max_export_serialization_size(&self) -> Result<usize> {
        let mut bytes = 0;
        for i in 0..self.column_count() {
            let ty = self.column_type(i)?;
            if let Some(width) = ty.export_width() {
                bytes += width;
            } else if ty.is_variable_length() {
                if let Some(data) = self.value_at(i)?.as_bytes() {
                    bytes += OBJECT_LENGTH_PREFIX + data.len();
                }
            } else {
                return Err(TupleError::UnsupportedExportType(ty));
            }
        }
        Ok(bytes)
    }

    /// Bytes the allocator charges for the objects referenced by this
    /// tuple's out-of-line columns.
    pub fn non_inlined_memory_size(&self) -> Result<usize> {
        let heap = ObjectHeap::global();
        let mut bytes = 0;
        for object in self.uninlined_objects()? {
            bytes += ObjectHeap::memory_used(heap.get(object)?.len());
        }
        Ok(bytes)
    }
}

impl TupleMut<'_> {
    /// Reads a tuple in the generic wire format. Out-of-line values are
    /// copied into new objects allocated from `pool`, or from the heap when
    /// no pool is given. The header byte is left untouched.
    pub fn deserialize_from(&mut self, input: &mut impl Buf, pool: Option<&Pool>) -> Result<()> {
        if input.remaining() < 4 {
            return Err(TupleError::Truncated {
                needed: 4,
                available: input.remaining(),
            });
        }
        let length = input.get_i32();
        if length < 0 {
            return Err(TupleError::Corrupt(format!("negative tuple length {}", length)));
        }
        let length = length as usize;
        if input.remaining() < length {
            return Err(TupleError::Truncated {
                needed: length,
                available: input.remaining(),
            });
        }

        let before = input.remaining();
        let mut values = Vec::with_capacity(self.schema().column_count());
        for i in 0..self.schema().column_count() {
            let ty = self.as_tuple().column_type(i)?;
            values.push(Value::deserialize_from(&mut *input, &ty)?);
        }

        let consumed = before - input.remaining();
        if consumed != length {
            return Err(TupleError::Corrupt(format!(
                "tuple declared {} bytes but its columns used {}",
                length, consumed
            )));
        }

        // Values are stored into a scratch copy so a rejected value leaves
        // this tuple unchanged.
        let mut scratch = self.data().to_vec();
        let mut staged = TupleMut::from_owned(self.schema(), &mut scratch);
        let mut allocated = Vec::new();
        for (i, value) in values.iter().enumerate() {
            match staged.set_value_with_copy(i, value, pool) {
                Ok(object) => allocated.extend(object),
                Err(e) => {
                    release_objects(&allocated);
                    return Err(e);
                }
            }
        }

        self.data_mut().copy_from_slice(&scratch);
        trace!(bytes = consumed, objects = allocated.len(), "deserialized tuple");
        Ok(())
    }
}
