mod config;
mod error;
mod types;

pub use config::*;
pub use error::{Result, TupleError};
pub use types::{ObjectOwner, ObjectRef, PoolId};
