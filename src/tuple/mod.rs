mod copy;
mod data_type;
mod decimal;
mod hasher;
mod header;
mod schema;
mod serialize;
mod storage;
mod tuple;
mod value;

pub use data_type::DataType;
pub use decimal::Decimal;
pub use hasher::{TupleEqualityChecker, TupleHasher, TupleKey};
pub use schema::{Column, Schema, SchemaBuilder};
pub use storage::{PoolBackedTuple, StandaloneTuple};
pub use tuple::{Tuple, TupleMut};
pub use value::{Payload, Value};
