mod object_heap;
mod pool;

pub use object_heap::{release_objects, ObjectHeap};
pub use pool::Pool;
