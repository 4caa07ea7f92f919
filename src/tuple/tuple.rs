use std::cmp::Ordering;
use std::fmt::Write;
use std::ops::Range;

use crate::common::{ObjectRef, Result, TupleError, TUPLE_HEADER_SIZE};
use crate::memory::Pool;

use super::header::TupleFlag;
use super::{Column, DataType, Schema, Value};

/// Read-only view of a tuple stored in a buffer it does not own.
///
/// ## Tuple Binary Format
///
/// ```text
/// +--------+-----------+-----------+-----+-----------+
/// | Header | Column 0  | Column 1  | ... | Column N  |
/// | 1 byte | slot      | slot      |     | slot      |
/// +--------+-----------+-----------+-----+-----------+
/// ```
///
/// Where:
/// - **Header**: status flags (active, dirty, pending delete,
///   pending delete on undo release)
/// - **Slots**: at the offsets computed by the schema. Fixed-width values are
///   little-endian with the type minimum as NULL; an inlined variable-length
///   slot is a length byte plus the bytes; an out-of-line slot is an
///   `ObjectRef` into the object heap.
///
/// The view is `Copy`; the buffer belongs to a table, a pool, or one of the
/// owned storage wrappers. Mutation goes through `TupleMut`.
#[derive(Debug, Clone, Copy)]
pub struct Tuple<'a> {
    schema: &'a Schema,
    data: &'a [u8],
}

/// Mutable view of a tuple. Only the owner of a tuple buffer hands these out.
#[derive(Debug)]
pub struct TupleMut<'a> {
    schema: &'a Schema,
    data: &'a mut [u8],
}

fn check_length(schema: &Schema, len: usize) -> Result<()> {
    let expected = schema.row_length() + TUPLE_HEADER_SIZE;
    if len != expected {
        return Err(TupleError::BufferSizeMismatch {
            expected,
            actual: len,
        });
    }
    Ok(())
}

fn column_at(schema: &Schema, index: usize) -> Result<&Column> {
    schema.column(index).ok_or(TupleError::ColumnOutOfRange {
        index,
        count: schema.column_count(),
    })
}

pub(super) fn slot_range(col: &Column) -> Range<usize> {
    let start = TUPLE_HEADER_SIZE + col.offset();
    start..start + col.length()
}

impl<'a> Tuple<'a> {
    /// Binds a view to `data`, which must be exactly
    /// `schema.row_length() + TUPLE_HEADER_SIZE` bytes.
    pub fn new(schema: &'a Schema, data: &'a [u8]) -> Result<Self> {
        check_length(schema, data.len())?;
        Ok(Self { schema, data })
    }

    /// Binds a view to a buffer its owner sized from `schema`.
    pub(crate) fn from_owned(schema: &'a Schema, data: &'a [u8]) -> Self {
        debug_assert_eq!(data.len(), schema.row_length() + TUPLE_HEADER_SIZE);
        Self { schema, data }
    }

    /// Returns the schema of this tuple.
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Returns the raw tuple bytes, header included.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the number of columns in this tuple.
    pub fn column_count(&self) -> usize {
        self.schema.column_count()
    }

    /// Returns the tuple length excluding the header.
    pub fn row_length(&self) -> usize {
        self.schema.row_length()
    }

    pub(crate) fn header(&self) -> u8 {
        self.data[0]
    }

    fn slot(&self, index: usize) -> Result<(&'a Column, &'a [u8])> {
        let col = column_at(self.schema, index)?;
        let slot = self
            .data
            .get(slot_range(col))
            .ok_or(TupleError::BufferSizeMismatch {
                expected: self.schema.row_length() + TUPLE_HEADER_SIZE,
                actual: self.data.len(),
            })?;
        Ok((col, slot))
    }

    pub fn is_active(&self) -> bool {
        TupleFlag::Active.is_set(self.header())
    }

    pub fn is_dirty(&self) -> bool {
        TupleFlag::Dirty.is_set(self.header())
    }

    pub fn is_pending_delete(&self) -> bool {
        TupleFlag::PendingDelete.is_set(self.header())
    }

    pub fn is_pending_delete_on_undo_release(&self) -> bool {
        TupleFlag::PendingDeleteOnUndoRelease.is_set(self.header())
    }

    /// Returns the value of a column. Out-of-line values resolve to the
    /// referenced object; the payload bytes are shared, not copied.
    pub fn value_at(&self, index: usize) -> Result<Value> {
        let (col, slot) = self.slot(index)?;
        Value::read_from_slot(slot, col.data_type(), col.is_inlined())
    }

    /// Returns true if the column holds NULL.
    pub fn is_null(&self, index: usize) -> Result<bool> {
        let (col, slot) = self.slot(index)?;
        if !col.is_inlined() {
            return match ObjectRef::decode(slot) {
                Some(object) => Ok(object.is_none()),
                None => Err(TupleError::Corrupt("invalid object reference".into())),
            };
        }
        Ok(Value::read_from_slot(slot, col.data_type(), true)?.is_null())
    }

    /// Returns the declared type of a column.
    pub fn column_type(&self, index: usize) -> Result<DataType> {
        Ok(*column_at(self.schema, index)?.data_type())
    }

    /// Returns the object referenced by an out-of-line column, or None if the
    /// column is NULL or stored inline.
    pub(crate) fn object_at(&self, index: usize) -> Result<Option<ObjectRef>> {
        let (col, slot) = self.slot(index)?;
        if col.is_inlined() {
            return Ok(None);
        }
        ObjectRef::decode(slot).ok_or_else(|| {
            TupleError::Corrupt(format!("invalid object reference in column {}", index))
        })
    }

    /// Returns the objects referenced by every non-null out-of-line column.
    pub fn uninlined_objects(&self) -> Result<Vec<ObjectRef>> {
        let mut objects = Vec::with_capacity(self.schema.uninlined_object_column_count());
        for &index in self.schema.uninlined_object_columns() {
            if let Some(object) = self.object_at(index)? {
                objects.push(object);
            }
        }
        Ok(objects)
    }

    /// Returns true if both schemas have the same layout and every column is
    /// equal.
    pub fn equals(&self, other: &Tuple<'_>) -> Result<bool> {
        if self.schema != other.schema {
            return Ok(false);
        }
        self.equals_ignoring_schema(other)
    }

    /// Returns true if every column is equal, whatever the layouts.
    pub fn equals_ignoring_schema(&self, other: &Tuple<'_>) -> Result<bool> {
        if self.column_count() != other.column_count() {
            return Ok(false);
        }
        for i in 0..self.column_count() {
            if !self.value_at(i)?.equals(&other.value_at(i)?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Compares tuples column by column in schema order, stopping at the
    /// first column that differs. A tuple that is a prefix of the other sorts
    /// first.
    pub fn compare(&self, other: &Tuple<'_>) -> Result<Ordering> {
        let shared = self.column_count().min(other.column_count());
        for i in 0..shared {
            match self.value_at(i)?.compare(&other.value_at(i)?)? {
                Ordering::Equal => continue,
                ordering => return Ok(ordering),
            }
        }
        Ok(self.column_count().cmp(&other.column_count()))
    }

    pub fn hash_code(&self) -> Result<u64> {
        self.hash_code_with_seed(0)
    }

    /// Folds every column value into `seed` in schema order.
    pub fn hash_code_with_seed(&self, seed: u64) -> Result<u64> {
        let mut seed = seed;
        for i in 0..self.column_count() {
            self.value_at(i)?.hash_combine(&mut seed);
        }
        Ok(seed)
    }

    /// Renders the tuple with its flags, for logs and test failures.
    pub fn debug(&self, table_name: &str) -> String {
        let mut out = String::new();
        let _ = write!(out, "Tuple({}) ->", table_name);
        for (flag, name) in [
            (TupleFlag::Active, "active"),
            (TupleFlag::Dirty, "dirty"),
            (TupleFlag::PendingDelete, "pending_delete"),
            (TupleFlag::PendingDeleteOnUndoRelease, "pending_delete_on_undo_release"),
        ] {
            if flag.is_set(self.header()) {
                let _ = write!(out, " [{}]", name);
            }
        }
        out.push(' ');
        out.push_str(&self.debug_no_header());
        out
    }

    /// Renders the column values only.
    pub fn debug_no_header(&self) -> String {
        let mut out = String::from("(");
        for i in 0..self.column_count() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = match self.value_at(i) {
                Ok(value) => write!(out, "{}", value),
                Err(e) => write!(out, "<{}>", e),
            };
        }
        out.push(')');
        out
    }
}

impl<'a> TupleMut<'a> {
    /// Binds a mutable view to `data`, which must be exactly
    /// `schema.row_length() + TUPLE_HEADER_SIZE` bytes.
    pub fn new(schema: &'a Schema, data: &'a mut [u8]) -> Result<Self> {
        check_length(schema, data.len())?;
        Ok(Self { schema, data })
    }

    pub(crate) fn from_owned(schema: &'a Schema, data: &'a mut [u8]) -> Self {
        debug_assert_eq!(data.len(), schema.row_length() + TUPLE_HEADER_SIZE);
        Self { schema, data }
    }

    /// Returns a read-only view of the same tuple.
    pub fn as_tuple(&self) -> Tuple<'_> {
        Tuple {
            schema: self.schema,
            data: &*self.data,
        }
    }

    /// Returns the schema of this tuple.
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn value_at(&self, index: usize) -> Result<Value> {
        self.as_tuple().value_at(index)
    }

    pub fn is_null(&self, index: usize) -> Result<bool> {
        self.as_tuple().is_null(index)
    }

    pub(crate) fn data(&self) -> &[u8] {
        &*self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }

    pub(crate) fn set_header(&mut self, header: u8) {
        self.data[0] = header;
    }

    fn set_flag(&mut self, flag: TupleFlag, on: bool) {
        self.data[0] = flag.apply(self.data[0], on);
    }

    fn slot_mut(&mut self, index: usize) -> Result<(&'a Column, &mut [u8])> {
        let schema = self.schema;
        let col = column_at(schema, index)?;
        let actual = self.data.len();
        let slot = self
            .data
            .get_mut(slot_range(col))
            .ok_or(TupleError::BufferSizeMismatch {
                expected: schema.row_length() + TUPLE_HEADER_SIZE,
                actual,
            })?;
        Ok((col, slot))
    }

    pub fn is_active(&self) -> bool {
        self.as_tuple().is_active()
    }

    pub fn is_dirty(&self) -> bool {
        self.as_tuple().is_dirty()
    }

    pub fn is_pending_delete(&self) -> bool {
        self.as_tuple().is_pending_delete()
    }

    pub fn is_pending_delete_on_undo_release(&self) -> bool {
        self.as_tuple().is_pending_delete_on_undo_release()
    }

    pub fn set_active(&mut self, on: bool) {
        self.set_flag(TupleFlag::Active, on);
    }

    pub fn set_dirty(&mut self, on: bool) {
        self.set_flag(TupleFlag::Dirty, on);
    }

    pub fn set_pending_delete(&mut self, on: bool) {
        self.set_flag(TupleFlag::PendingDelete, on);
    }

    pub fn set_pending_delete_on_undo_release(&mut self, on: bool) {
        self.set_flag(TupleFlag::PendingDeleteOnUndoRelease, on);
    }

    /// Casts `value` to the column type and stores it.
    ///
    /// This is a shallow store: an out-of-line column ends up referencing
    /// the object that already backs `value`, so that object must outlive
    /// this tuple. A value with no backing object (one built in memory or
    /// read from an inlined column) cannot be stored shallowly into an
    /// out-of-line column; use `set_value_with_copy` for that.
    pub fn set_value(&mut self, index: usize, value: &Value) -> Result<()> {
        let (col, slot) = self.slot_mut(index)?;
        let value = value.cast(col.data_type())?;
        value.write_to_slot(slot, col.data_type(), col.is_inlined(), index)
    }

    /// Casts `value` to the column type and stores it, copying an
    /// out-of-line value into a new object from `pool` (or the heap when no
    /// pool is given). Returns the new object, which the caller now owns.
    pub fn set_value_with_copy(
        &mut self,
        index: usize,
        value: &Value,
        pool: Option<&Pool>,
    ) -> Result<Option<ObjectRef>> {
        let (col, slot) = self.slot_mut(index)?;
        let value = value.cast(col.data_type())?;
        value.write_to_slot_copying(slot, col.data_type(), col.is_inlined(), index, pool)
    }

    /// Shallow-copies the columns `range` of `source` into this tuple,
    /// starting at column `dest_start`. Column types must match exactly.
    pub fn set_values(
        &mut self,
        dest_start: usize,
        source: &Tuple<'_>,
        range: Range<usize>,
    ) -> Result<()> {
        if range.end > source.column_count() {
            return Err(TupleError::ColumnOutOfRange {
                index: range.end.saturating_sub(1),
                count: source.column_count(),
            });
        }

        for (offset, src) in range.enumerate() {
            let dest = dest_start + offset;
            let (source_type, dest_type) = (source.column_type(src)?, self.as_tuple().column_type(dest)?);
            if source_type != dest_type {
                return Err(TupleError::IncompatibleSchemas(format!(
                    "source column {} is {}, destination column {} is {}",
                    src, source_type, dest, dest_type
                )));
            }
            self.set_value(dest, &source.value_at(src)?)?;
        }
        Ok(())
    }

    /// Writes NULL into every column.
    pub fn set_all_nulls(&mut self) {
        let schema = self.schema;
        for col in schema.columns() {
            let slot = &mut self.data[slot_range(col)];
            Value::write_null_to_slot(slot, col.data_type(), col.is_inlined());
        }
    }
}
