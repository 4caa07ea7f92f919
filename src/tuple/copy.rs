use std::ops::Range;

use tracing::{debug, trace};

use crate::common::{ObjectRef, Result, TupleError, OBJECT_REF_SIZE};
use crate::memory::{release_objects, Pool};

use super::tuple::slot_range;
use super::{Tuple, TupleMut, Value};

/// An out-of-line column of a pending update, encoded but not yet written.
struct StagedSlot {
    range: Range<usize>,
    old: Option<ObjectRef>,
    object: Option<ObjectRef>,
    slot: [u8; OBJECT_REF_SIZE],
}

impl Tuple<'_> {
    /// Checks that `source` can be copied into this tuple: same column count
    /// and the same type in every column. The inline policies may differ.
    pub fn compatible_for_copy(&self, source: &Tuple<'_>) -> Result<()> {
        let (dest, src) = (self.schema(), source.schema());
        let incompatible = |reason: String| {
            TupleError::IncompatibleSchemas(format!(
                "{}\nsource: {}\ndestination: {}",
                reason, src, dest
            ))
        };

        if dest.column_count() != src.column_count() {
            return Err(incompatible(format!(
                "column counts differ ({} vs {})",
                src.column_count(),
                dest.column_count()
            )));
        }
        for (i, (d, s)) in dest.columns().zip(src.columns()).enumerate() {
            if d.data_type() != s.data_type() {
                return Err(incompatible(format!(
                    "column {} is {} in the source but {} in the destination",
                    i,
                    s.data_type(),
                    d.data_type()
                )));
            }
        }
        Ok(())
    }
}

impl TupleMut<'_> {
    fn same_inline_policy(&self, source: &Tuple<'_>) -> bool {
        self.schema().allow_inlined_objects() == source.schema().allow_inlined_objects()
    }

    fn bulk_copy(&mut self, source: &Tuple<'_>) -> Result<()> {
        let dest = self.data_mut();
        if dest.len() != source.data().len() {
            return Err(TupleError::IncompatibleSchemas(format!(
                "tuple lengths differ ({} vs {})",
                source.data().len(),
                dest.len()
            )));
        }
        dest.copy_from_slice(source.data());
        Ok(())
    }

    /// Copies `source` into this tuple, header included.
    ///
    /// This is a shallow copy: out-of-line columns end up referencing the
    /// source's objects, so the source's objects must outlive this tuple.
    /// When the inline policies differ the copy goes column by column, and a
    /// value inlined in the source cannot be stored into a column that is
    /// out of line here (`UnbackedObject`); use `copy_for_insert` for that.
    pub fn copy(&mut self, source: &Tuple<'_>) -> Result<()> {
        self.as_tuple().compatible_for_copy(source)?;

        if self.same_inline_policy(source) {
            debug!(columns = source.column_count(), "bulk tuple copy");
            return self.bulk_copy(source);
        }

        debug!(columns = source.column_count(), "per-column tuple copy");
        for i in 0..source.column_count() {
            self.set_value(i, &source.value_at(i)?)?;
        }
        self.set_header(source.header());
        Ok(())
    }

    /// Copies `source` into this tuple for insertion into durable storage.
    ///
    /// Every out-of-line value is copied into a new object allocated from
    /// `pool` (or the heap when no pool is given), so this tuple never shares
    /// an object with `source`. On error, the objects copied so far are
    /// released.
    pub fn copy_for_insert(&mut self, source: &Tuple<'_>, pool: Option<&Pool>) -> Result<()> {
        self.as_tuple().compatible_for_copy(source)?;

        let mut allocated = Vec::new();
        let result = self.copy_for_insert_into(source, pool, &mut allocated);
        if result.is_err() && !allocated.is_empty() {
            release_objects(&allocated);
        }
        result
    }

    fn copy_for_insert_into(
        &mut self,
        source: &Tuple<'_>,
        pool: Option<&Pool>,
        allocated: &mut Vec<ObjectRef>,
    ) -> Result<()> {
        if self.same_inline_policy(source) {
            debug!(
                uninlined = source.schema().uninlined_object_column_count(),
                "bulk tuple copy for insert"
            );
            self.bulk_copy(source)?;
            for &index in source.schema().uninlined_object_columns() {
                trace!(column = index, "copying out-of-line value");
                let value = source.value_at(index)?;
                allocated.extend(self.set_value_with_copy(index, &value, pool)?);
            }
        } else {
            debug!(columns = source.column_count(), "per-column tuple copy for insert");
            for index in 0..source.column_count() {
                let value = source.value_at(index)?;
                allocated.extend(self.set_value_with_copy(index, &value, pool)?);
            }
        }

        self.set_header(source.header());
        Ok(())
    }

    /// Overwrites this tuple with `source`, whose schema must have the same
    /// layout.
    ///
    /// An out-of-line column whose object is unchanged is skipped. Otherwise
    /// the value is copied into a new heap object; the object this tuple
    /// referenced before is pushed to `old_objects` (to release once the
    /// update commits) and the new one to `new_objects` (to release if the
    /// update is undone). NULL references are never pushed.
    pub fn copy_for_update(
        &mut self,
        source: &Tuple<'_>,
        old_objects: &mut Vec<ObjectRef>,
        new_objects: &mut Vec<ObjectRef>,
    ) -> Result<()> {
        let schema = source.schema();
        if !std::ptr::eq(self.schema(), schema) && self.schema() != schema {
            return Err(TupleError::SchemaMismatch);
        }

        if schema.uninlined_object_column_count() == 0 {
            debug!("bulk tuple copy for update");
            return self.bulk_copy(source);
        }

        // Every changed out-of-line value is copied before the row is
        // touched, so a failure leaves both the row and the lists unchanged.
        let mut staged = Vec::new();
        if let Err(e) = self.stage_update(source, &mut staged) {
            let copied: Vec<ObjectRef> = staged.iter().filter_map(|s| s.object).collect();
            release_objects(&copied);
            return Err(e);
        }

        for col in schema.columns().filter(|c| c.is_inlined()) {
            let range = slot_range(col);
            self.data_mut()[range.clone()].copy_from_slice(&source.data()[range]);
        }
        for update in &staged {
            self.data_mut()[update.range.clone()].copy_from_slice(&update.slot);
            old_objects.extend(update.old);
            new_objects.extend(update.object);
        }

        debug!(changed = staged.len(), "copied tuple for update");
        self.set_header(source.header());
        Ok(())
    }

    fn stage_update(&self, source: &Tuple<'_>, staged: &mut Vec<StagedSlot>) -> Result<()> {
        let schema = source.schema();
        for &index in schema.uninlined_object_columns() {
            let old = self.as_tuple().object_at(index)?;
            let new = source.object_at(index)?;
            if old == new {
                trace!(column = index, "out-of-line value unchanged");
                continue;
            }

            let col = schema.column(index).ok_or(TupleError::ColumnOutOfRange {
                index,
                count: schema.column_count(),
            })?;
            let value = source.value_at(index)?;
            let mut slot = [0u8; OBJECT_REF_SIZE];
            let object =
                value.write_to_slot_copying(&mut slot, col.data_type(), false, index, None)?;
            let range = slot_range(col);
            staged.push(StagedSlot {
                range,
                old,
                object,
                slot,
            });
        }
        Ok(())
    }

    /// Releases every object referenced by an out-of-line column and writes
    /// NULL into those columns. Returns the number of objects released.
    pub fn free_object_columns(&mut self) -> Result<usize> {
        let objects = self.as_tuple().uninlined_objects()?;
        let released = release_objects(&objects);

        let schema = self.schema();
        for col in schema.columns().filter(|c| !c.is_inlined()) {
            let slot = &mut self.data_mut()[slot_range(col)];
            Value::write_null_to_slot(slot, col.data_type(), false);
        }

        debug!(released, "freed out-of-line columns");
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::common::TUPLE_HEADER_SIZE;
    use crate::memory::ObjectHeap;
    use crate::tuple::{DataType, Schema};

    fn schema(allow_inlined: bool) -> Arc<Schema> {
        Schema::builder()
            .column("id", DataType::Integer)
            .column("tag", DataType::VarChar(8))
            .nullable_column("body", DataType::VarChar(200))
            .allow_inlined_objects(allow_inlined)
            .build_arc()
    }

    fn buffer(schema: &Schema) -> Vec<u8> {
        vec![0u8; schema.row_length() + TUPLE_HEADER_SIZE]
    }

    #[test]
    fn test_compatible_for_copy() {
        let a = schema(true);
        let b = schema(false);
        let other = Schema::builder().column("id", DataType::BigInt).build_arc();
        let (da, db, dother) = (buffer(&a), buffer(&b), buffer(&other));

        let ta = Tuple::new(&a, &da).unwrap();
        let tb = Tuple::new(&b, &db).unwrap();
        let tother = Tuple::new(&other, &dother).unwrap();

        assert!(ta.compatible_for_copy(&tb).is_ok());
        assert!(matches!(
            ta.compatible_for_copy(&tother),
            Err(TupleError::IncompatibleSchemas(_))
        ));
    }

    #[test]
    fn test_bulk_copy_aliases_objects() {
        let s = schema(true);
        let pool = Pool::new();
        let mut src_data = buffer(&s);
        let mut src = TupleMut::new(&s, &mut src_data).unwrap();
        src.set_active(true);
        src.set_value(0, &Value::Integer(3)).unwrap();
        src.set_value(1, &Value::from("t")).unwrap();
        let object = src
            .set_value_with_copy(2, &Value::from("body"), Some(&pool))
            .unwrap();

        let mut dest_data = buffer(&s);
        let mut dest = TupleMut::new(&s, &mut dest_data).unwrap();
        dest.copy(&src.as_tuple()).unwrap();

        assert!(dest.is_active());
        assert_eq!(dest.value_at(2).unwrap().object_ref(), object);
        assert!(dest.as_tuple().equals(&src.as_tuple()).unwrap());
    }

    #[test]
    fn test_copy_for_insert_owns_its_objects() {
        let s = schema(true);
        let src_pool = Pool::new();
        let dest_pool = Pool::new();
        let mut src_data = buffer(&s);
        let mut src = TupleMut::new(&s, &mut src_data).unwrap();
        src.set_value(0, &Value::Integer(1)).unwrap();
        src.set_value(1, &Value::from("x")).unwrap();
        src.set_value_with_copy(2, &Value::from("payload"), Some(&src_pool))
            .unwrap();

        let mut dest_data = buffer(&s);
        let mut dest = TupleMut::new(&s, &mut dest_data).unwrap();
        dest.copy_for_insert(&src.as_tuple(), Some(&dest_pool)).unwrap();

        let copied = dest.value_at(2).unwrap().object_ref().unwrap();
        assert_ne!(Some(copied), src.value_at(2).unwrap().object_ref());
        assert_eq!(copied.owner(), crate::common::ObjectOwner::Pool(dest_pool.id()));
        assert!(dest.as_tuple().equals(&src.as_tuple()).unwrap());
    }

    #[test]
    fn test_copy_for_update_requires_same_schema() {
        let a = schema(true);
        let b = schema(false);
        let da = buffer(&a);
        let mut db = buffer(&b);
        let source = Tuple::new(&a, &da).unwrap();
        let mut dest = TupleMut::new(&b, &mut db).unwrap();

        let (mut old, mut new) = (Vec::new(), Vec::new());
        assert_eq!(
            dest.copy_for_update(&source, &mut old, &mut new),
            Err(TupleError::SchemaMismatch)
        );
    }

    #[test]
    fn test_copy_for_update_accepts_renamed_columns() {
        let a = schema(true);
        let renamed = Schema::builder()
            .column("key", DataType::Integer)
            .column("label", DataType::VarChar(8))
            .nullable_column("text", DataType::VarChar(200))
            .build_arc();

        let mut src_data = buffer(&a);
        let mut src = TupleMut::new(&a, &mut src_data).unwrap();
        src.set_all_nulls();
        src.set_value(0, &Value::Integer(4)).unwrap();
        src.set_value(1, &Value::from("t")).unwrap();

        let mut dest_data = buffer(&renamed);
        let mut dest = TupleMut::new(&renamed, &mut dest_data).unwrap();
        dest.set_all_nulls();

        let (mut old, mut new) = (Vec::new(), Vec::new());
        dest.copy_for_update(&src.as_tuple(), &mut old, &mut new)
            .unwrap();
        assert!(old.is_empty() && new.is_empty());
        assert!(dest.as_tuple().equals(&src.as_tuple()).unwrap());
    }

    #[test]
    fn test_free_object_columns() {
        let s = schema(false);
        let mut data = buffer(&s);
        let mut tuple = TupleMut::new(&s, &mut data).unwrap();
        tuple.set_all_nulls();
        let a = tuple
            .set_value_with_copy(1, &Value::from("a"), None)
            .unwrap()
            .unwrap();
        let b = tuple
            .set_value_with_copy(2, &Value::from("b"), None)
            .unwrap()
            .unwrap();

        assert_eq!(tuple.free_object_columns().unwrap(), 2);
        assert!(!ObjectHeap::global().is_live(a));
        assert!(!ObjectHeap::global().is_live(b));
        assert!(tuple.is_null(1).unwrap());

        // Nothing left to release
        assert_eq!(tuple.free_object_columns().unwrap(), 0);
    }
}
