use std::cell::RefCell;
use std::sync::atomic::{AtomicU32, Ordering};

use bumpalo::Bump;
use tracing::debug;

use crate::common::{ObjectOwner, ObjectRef, PoolId};

use super::ObjectHeap;

static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(1);

/// Pool is an arena for tuple buffers and the out-of-line payloads copied
/// into them.
///
/// Tuple buffers come from a bump arena and live until the pool is purged.
/// Payloads are allocated in the global `ObjectHeap` tagged with this pool's
/// id; the pool remembers them so a purge (or drop) releases all of them at
/// once. Payloads released individually beforehand are skipped.
pub struct Pool {
    id: PoolId,
    arena: Bump,
    objects: RefCell<Vec<ObjectRef>>,
}

impl Pool {
    /// Creates an empty pool with a fresh id.
    pub fn new() -> Self {
        Self {
            id: PoolId::new(NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed)),
            arena: Bump::new(),
            objects: RefCell::new(Vec::new()),
        }
    }

    /// Returns the pool id carried by every payload this pool owns.
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// Allocates `len` zeroed bytes that live until the pool is purged.
    #[allow(clippy::mut_from_ref)]
    pub fn allocate_zeroes(&self, len: usize) -> &mut [u8] {
        self.arena.alloc_slice_fill_copy(len, 0u8)
    }

    /// Copies `data` into a payload owned by this pool.
    pub fn allocate_object(&self, data: &[u8]) -> ObjectRef {
        let object = ObjectHeap::global().allocate(ObjectOwner::Pool(self.id), data);
        self.objects.borrow_mut().push(object);
        object
    }

    /// Number of payloads allocated since the last purge, including any that
    /// were released individually.
    pub fn object_count(&self) -> usize {
        self.objects.borrow().len()
    }

    /// Number of payloads owned by this pool that have not been released.
    pub fn live_object_count(&self) -> usize {
        let heap = ObjectHeap::global();
        self.objects
            .borrow()
            .iter()
            .filter(|object| heap.is_live(**object))
            .count()
    }

    /// Bytes currently reserved by the tuple buffer arena.
    pub fn allocated_bytes(&self) -> usize {
        self.arena.allocated_bytes()
    }

    /// Releases every payload this pool owns and recycles the buffer arena.
    pub fn purge(&mut self) {
        self.release_objects();
        self.arena.reset();
    }

    fn release_objects(&self) {
        let objects = std::mem::take(&mut *self.objects.borrow_mut());
        if objects.is_empty() {
            return;
        }
        let released = ObjectHeap::global().release_owned(&objects);
        debug!(pool = %self.id, released, "purged pool objects");
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        self.release_objects();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::release_objects;

    #[test]
    fn test_allocate_zeroes() {
        let pool = Pool::new();
        let a = pool.allocate_zeroes(32);
        assert_eq!(a.len(), 32);
        assert!(a.iter().all(|&b| b == 0));

        a[0] = 1;
        let b = pool.allocate_zeroes(8);
        assert!(b.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pool_ids_are_unique() {
        let a = Pool::new();
        let b = Pool::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_objects_tagged_with_pool() {
        let pool = Pool::new();
        let r = pool.allocate_object(b"payload");
        assert_eq!(r.owner(), ObjectOwner::Pool(pool.id()));
        assert_eq!(&*ObjectHeap::global().get(r).unwrap(), b"payload");
    }

    #[test]
    fn test_purge_releases_objects() {
        let mut pool = Pool::new();
        let a = pool.allocate_object(b"a");
        let b = pool.allocate_object(b"b");
        assert_eq!(pool.object_count(), 2);

        pool.purge();
        assert_eq!(pool.object_count(), 0);
        assert!(!ObjectHeap::global().is_live(a));
        assert!(!ObjectHeap::global().is_live(b));
    }

    #[test]
    fn test_purge_after_individual_release() {
        let mut pool = Pool::new();
        let a = pool.allocate_object(b"a");
        let b = pool.allocate_object(b"b");

        assert_eq!(release_objects(&[a]), 1);
        assert_eq!(pool.object_count(), 2);
        assert_eq!(pool.live_object_count(), 1);
        pool.purge();
        assert!(!ObjectHeap::global().is_live(b));
    }

    #[test]
    fn test_drop_releases_objects() {
        let r = {
            let pool = Pool::new();
            pool.allocate_object(b"short lived")
        };
        assert!(!ObjectHeap::global().is_live(r));
    }
}
