use std::sync::Arc;

use crate::common::TUPLE_HEADER_SIZE;
use crate::memory::Pool;

use super::{Schema, Tuple, TupleMut};

/// A tuple whose buffer is allocated from a `Pool` and lives until the pool
/// is purged.
///
/// The buffer is private; callers only ever get views of it, so a view can
/// never be pointed at foreign storage while this wrapper claims it.
pub struct PoolBackedTuple<'p> {
    schema: Arc<Schema>,
    data: &'p mut [u8],
}

impl<'p> PoolBackedTuple<'p> {
    /// Allocates a zeroed tuple from `pool` and marks it active.
    pub fn allocate_active(schema: Arc<Schema>, pool: &'p Pool) -> Self {
        let data = pool.allocate_zeroes(schema.row_length() + TUPLE_HEADER_SIZE);
        let mut tuple = Self { schema, data };
        tuple.tuple_mut().set_active(true);
        tuple
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns a read-only view of the tuple.
    pub fn tuple(&self) -> Tuple<'_> {
        Tuple::from_owned(&self.schema, &*self.data)
    }

    /// Returns a mutable view of the tuple.
    pub fn tuple_mut(&mut self) -> TupleMut<'_> {
        TupleMut::from_owned(&self.schema, &mut *self.data)
    }
}

/// A tuple with its own heap buffer, for rows that no table or pool backs,
/// such as scratch rows and default values.
#[derive(Debug, Clone)]
pub struct StandaloneTuple {
    schema: Arc<Schema>,
    data: Box<[u8]>,
}

impl StandaloneTuple {
    /// Allocates a tuple with every column NULL and marks it active.
    pub fn new(schema: Arc<Schema>) -> Self {
        let data = vec![0u8; schema.row_length() + TUPLE_HEADER_SIZE].into_boxed_slice();
        let mut tuple = Self { schema, data };
        let mut view = tuple.tuple_mut();
        view.set_all_nulls();
        view.set_active(true);
        tuple
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns a read-only view of the tuple.
    pub fn tuple(&self) -> Tuple<'_> {
        Tuple::from_owned(&self.schema, &self.data)
    }

    /// Returns a mutable view of the tuple.
    pub fn tuple_mut(&mut self) -> TupleMut<'_> {
        TupleMut::from_owned(&self.schema, &mut self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple::{DataType, Value};

    fn create_test_schema() -> Arc<Schema> {
        Schema::builder()
            .column("id", DataType::BigInt)
            .nullable_column("label", DataType::VarChar(12))
            .nullable_column("blob", DataType::VarBinary(500))
            .build_arc()
    }

    #[test]
    fn test_pool_backed_allocation() {
        let schema = create_test_schema();
        let pool = Pool::new();
        let mut tuple = PoolBackedTuple::allocate_active(schema.clone(), &pool);

        let view = tuple.tuple();
        assert!(view.is_active());
        assert!(!view.is_dirty());
        assert_eq!(view.data().len(), schema.row_length() + TUPLE_HEADER_SIZE);
        // Zeroed out-of-line slots read as NULL
        assert!(view.is_null(2).unwrap());

        tuple.tuple_mut().set_value(0, &Value::BigInt(99)).unwrap();
        assert_eq!(tuple.tuple().value_at(0).unwrap(), Value::BigInt(99));
    }

    #[test]
    fn test_standalone_starts_null_and_active() {
        let tuple = StandaloneTuple::new(create_test_schema());
        let view = tuple.tuple();

        assert!(view.is_active());
        for i in 0..view.column_count() {
            assert!(view.is_null(i).unwrap());
        }
    }

    #[test]
    fn test_standalone_is_independent_on_clone() {
        let mut a = StandaloneTuple::new(create_test_schema());
        a.tuple_mut().set_value(1, &Value::from("first")).unwrap();

        let mut b = a.clone();
        b.tuple_mut().set_value(1, &Value::from("second")).unwrap();

        assert_eq!(a.tuple().value_at(1).unwrap(), Value::from("first"));
        assert_eq!(b.tuple().value_at(1).unwrap(), Value::from("second"));
    }
}
