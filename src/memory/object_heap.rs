use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::common::{
    ObjectOwner, ObjectRef, Result, TupleError, MIN_OBJECT_ALLOCATION, OBJECT_ALLOCATION_OVERHEAD,
    OBJECT_LENGTH_PREFIX,
};

/// A single payload slot. The generation is bumped on every release so that
/// references into a recycled slot are detected as stale.
struct ObjectSlot {
    generation: u32,
    object: Option<StoredObject>,
}

struct StoredObject {
    owner: ObjectOwner,
    data: Arc<[u8]>,
}

/// Internal state guarded by the heap lock
struct HeapState {
    /// Payload slots, indexed by `ObjectRef::index`
    slots: Vec<ObjectSlot>,
    /// Free list: slots that are not currently holding a payload
    free_list: Vec<u32>,
    /// Number of live payloads
    live_objects: usize,
    /// Bytes charged to live payloads by the allocation accounting
    bytes_in_use: usize,
}

/// ObjectHeap stores every out-of-line column payload, whichever arena owns it.
///
/// Tuples never hold payload bytes for out-of-line columns, only an
/// `ObjectRef` into this heap. The owner tag on the reference decides who is
/// responsible for releasing it; the generation check turns a release or read
/// through an already released reference into a detectable condition instead
/// of a double free.
pub struct ObjectHeap {
    state: RwLock<HeapState>,
}

impl ObjectHeap {
    fn new() -> Self {
        Self {
            state: RwLock::new(HeapState {
                slots: Vec::new(),
                free_list: Vec::new(),
                live_objects: 0,
                bytes_in_use: 0,
            }),
        }
    }

    /// Returns the process-wide object heap.
    pub fn global() -> &'static ObjectHeap {
        static HEAP: OnceLock<ObjectHeap> = OnceLock::new();
        HEAP.get_or_init(ObjectHeap::new)
    }

    /// Number of bytes the allocator charges for a payload of `len` bytes:
    /// bookkeeping overhead plus the power-of-two size class holding the
    /// length-prefixed payload.
    pub fn memory_used(len: usize) -> usize {
        let class = (len + OBJECT_LENGTH_PREFIX)
            .next_power_of_two()
            .max(MIN_OBJECT_ALLOCATION);
        OBJECT_ALLOCATION_OVERHEAD + class
    }

    /// Copies `data` into a fresh payload owned by `owner`.
    pub fn allocate(&self, owner: ObjectOwner, data: &[u8]) -> ObjectRef {
        let mut state = self.state.write();
        let object = StoredObject {
            owner,
            data: Arc::from(data),
        };

        let index = match state.free_list.pop() {
            Some(index) => {
                state.slots[index as usize].object = Some(object);
                index
            }
            None => {
                state.slots.push(ObjectSlot {
                    generation: 0,
                    object: Some(object),
                });
                (state.slots.len() - 1) as u32
            }
        };

        state.live_objects += 1;
        state.bytes_in_use += Self::memory_used(data.len());
        let generation = state.slots[index as usize].generation;
        ObjectRef::new(owner, index, generation)
    }

    /// Resolves a reference to its payload bytes without copying them.
    pub fn get(&self, object: ObjectRef) -> Result<Arc<[u8]>> {
        let state = self.state.read();
        Self::live_slot(&state, object)
            .map(|stored| Arc::clone(&stored.data))
            .ok_or(TupleError::StaleObject(object))
    }

    /// Replaces the payload bytes behind `object` in place. Every tuple that
    /// references `object` observes the new bytes.
    pub fn overwrite(&self, object: ObjectRef, data: &[u8]) -> Result<()> {
        let mut state = self.state.write();
        let old_len = Self::live_slot(&state, object)
            .map(|stored| stored.data.len())
            .ok_or(TupleError::StaleObject(object))?;

        state.bytes_in_use -= Self::memory_used(old_len);
        state.bytes_in_use += Self::memory_used(data.len());
        if let Some(stored) = state.slots[object.index() as usize].object.as_mut() {
            stored.data = Arc::from(data);
        }
        Ok(())
    }

    /// Returns true if `object` still refers to a live payload.
    pub fn is_live(&self, object: ObjectRef) -> bool {
        Self::live_slot(&self.state.read(), object).is_some()
    }

    /// Releases a batch of payloads. References that are already released
    /// are skipped and reported; returns the number of payloads freed.
    pub fn release_objects(&self, objects: &[ObjectRef]) -> usize {
        self.release_batch(objects, true)
    }

    /// Releases payloads on behalf of their owning pool. A pool-owned payload
    /// may have been released individually already, which is not an error.
    pub(crate) fn release_owned(&self, objects: &[ObjectRef]) -> usize {
        self.release_batch(objects, false)
    }

    fn release_batch(&self, objects: &[ObjectRef], report_stale: bool) -> usize {
        let mut state = self.state.write();
        let mut released = 0;

        for &object in objects {
            let len = match Self::live_slot(&state, object) {
                Some(stored) => stored.data.len(),
                None => {
                    if report_stale {
                        warn!(object = %object, "skipping release of stale object reference");
                    }
                    continue;
                }
            };

            let slot = &mut state.slots[object.index() as usize];
            slot.object = None;
            slot.generation = slot.generation.wrapping_add(1);
            state.free_list.push(object.index());
            state.live_objects -= 1;
            state.bytes_in_use -= Self::memory_used(len);
            released += 1;
        }

        debug!(requested = objects.len(), released, "released out-of-line objects");
        released
    }

    /// Returns the number of live payloads.
    pub fn live_objects(&self) -> usize {
        self.state.read().live_objects
    }

    /// Returns the bytes charged to live payloads.
    pub fn bytes_in_use(&self) -> usize {
        self.state.read().bytes_in_use
    }

    fn live_slot(state: &HeapState, object: ObjectRef) -> Option<&StoredObject> {
        let slot = state.slots.get(object.index() as usize)?;
        if slot.generation != object.generation() {
            return None;
        }
        slot.object
            .as_ref()
            .filter(|stored| stored.owner == object.owner())
    }
}

/// Releases a batch of payload references through the global object heap.
pub fn release_objects(objects: &[ObjectRef]) -> usize {
    ObjectHeap::global().release_objects(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PoolId;

    #[test]
    fn test_allocate_and_get() {
        let heap = ObjectHeap::new();
        let r = heap.allocate(ObjectOwner::Heap, b"hello");

        assert_eq!(&*heap.get(r).unwrap(), b"hello");
        assert!(heap.is_live(r));
        assert_eq!(heap.live_objects(), 1);
        assert_eq!(heap.bytes_in_use(), ObjectHeap::memory_used(5));
    }

    #[test]
    fn test_release_bumps_generation() {
        let heap = ObjectHeap::new();
        let first = heap.allocate(ObjectOwner::Heap, b"one");
        assert_eq!(heap.release_objects(&[first]), 1);

        // The slot is recycled, but the old reference stays dead
        let second = heap.allocate(ObjectOwner::Heap, b"two");
        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());
        assert_eq!(heap.get(first), Err(TupleError::StaleObject(first)));
        assert_eq!(&*heap.get(second).unwrap(), b"two");
    }

    #[test]
    fn test_double_release_is_skipped() {
        let heap = ObjectHeap::new();
        let r = heap.allocate(ObjectOwner::Heap, b"x");

        assert_eq!(heap.release_objects(&[r, r]), 1);
        assert_eq!(heap.release_objects(&[r]), 0);
        assert_eq!(heap.live_objects(), 0);
        assert_eq!(heap.bytes_in_use(), 0);
    }

    #[test]
    fn test_owner_tag_must_match() {
        let heap = ObjectHeap::new();
        let r = heap.allocate(ObjectOwner::Pool(PoolId::new(3)), b"pooled");
        let forged = ObjectRef::new(ObjectOwner::Heap, r.index(), r.generation());

        assert!(heap.get(forged).is_err());
        assert_eq!(heap.release_objects(&[forged]), 0);
        assert!(heap.is_live(r));
    }

    #[test]
    fn test_overwrite_in_place() {
        let heap = ObjectHeap::new();
        let r = heap.allocate(ObjectOwner::Heap, b"abc");
        heap.overwrite(r, b"a much longer payload").unwrap();

        assert_eq!(&*heap.get(r).unwrap(), b"a much longer payload");
        assert_eq!(heap.bytes_in_use(), ObjectHeap::memory_used(21));
    }

    #[test]
    fn test_memory_used_size_classes() {
        assert_eq!(ObjectHeap::memory_used(0), OBJECT_ALLOCATION_OVERHEAD + 16);
        assert_eq!(ObjectHeap::memory_used(12), OBJECT_ALLOCATION_OVERHEAD + 16);
        assert_eq!(ObjectHeap::memory_used(13), OBJECT_ALLOCATION_OVERHEAD + 32);
        assert_eq!(ObjectHeap::memory_used(200), OBJECT_ALLOCATION_OVERHEAD + 256);
    }
}
