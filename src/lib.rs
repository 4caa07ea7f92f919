//! Tuplecore - the row storage core of an in-memory relational engine
//!
//! This crate provides the fixed-layout binary representation of a table row
//! (a "tuple"), addressed through a schema, plus the protocols that copy,
//! compare, serialize and reclaim rows across insert, update, undo and export
//! paths.
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! - **Common** (`common`): layout constants, the error type, and payload
//!   reference types
//!
//! - **Memory** (`memory`): where out-of-line column values live
//!   - `ObjectHeap`: process-wide store of payloads behind tagged,
//!     generation-checked `ObjectRef`s
//!   - `Pool`: bump arena for tuple buffers that also owns the payloads
//!     copied into it, released in bulk on purge
//!
//! - **Tuple** (`tuple`): the row itself
//!   - `Schema`: column types, slot offsets and the inline policy
//!   - `Value`: typed values read from and written to column slots
//!   - `Tuple` / `TupleMut`: read-only and mutable views over a tuple buffer
//!   - `PoolBackedTuple` / `StandaloneTuple`: owned tuple storage
//!   - `TupleHasher`, `TupleEqualityChecker`, `TupleKey`: value-based keys
//!
//! # Example
//!
//! ```rust
//! use tuplecore::memory::Pool;
//! use tuplecore::tuple::{DataType, PoolBackedTuple, Schema, StandaloneTuple, Value};
//!
//! let schema = Schema::builder()
//!     .column("id", DataType::Integer)
//!     .nullable_column("name", DataType::VarChar(100))
//!     .build_arc();
//!
//! // Build a scratch row, then copy it into pool-owned storage
//! let mut scratch = StandaloneTuple::new(schema.clone());
//! scratch.tuple_mut().set_value(0, &Value::Integer(1)).unwrap();
//! scratch
//!     .tuple_mut()
//!     .set_value_with_copy(1, &Value::from("alice"), None)
//!     .unwrap();
//!
//! let pool = Pool::new();
//! let mut stored = PoolBackedTuple::allocate_active(schema, &pool);
//! stored
//!     .tuple_mut()
//!     .copy_for_insert(&scratch.tuple(), Some(&pool))
//!     .unwrap();
//! assert!(stored.tuple().equals(&scratch.tuple()).unwrap());
//!
//! scratch.tuple_mut().free_object_columns().unwrap();
//! ```

pub mod common;
pub mod memory;
pub mod tuple;

// Re-export commonly used types at the crate root
pub use common::{ObjectOwner, ObjectRef, PoolId, Result, TupleError};
