use std::fmt;

use super::config::OBJECT_REF_SIZE;

/// Pool identifier - distinguishes arenas that own out-of-line payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(pub u32);

impl PoolId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PoolId({})", self.0)
    }
}

/// The arena an out-of-line payload was allocated from.
///
/// Carried on every `ObjectRef` so a release never has to guess which
/// allocator a payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectOwner {
    /// General heap memory, released individually
    Heap,
    /// A transactional pool, released in bulk when the pool is purged
    Pool(PoolId),
}

const OWNER_TAG_HEAP: u8 = 1;
const OWNER_TAG_POOL: u8 = 2;

/// Tagged reference to an out-of-line payload held in the object heap.
///
/// ## Slot Encoding
///
/// ```text
/// +-----+----------+-----------+-------------+-----------+
/// | tag | reserved | index u32 | generation  | pool u32  |
/// | 1 B | 3 B      | LE        | u32 LE      | LE        |
/// +-----+----------+-----------+-------------+-----------+
/// ```
///
/// A slot of all zeroes (tag 0) is the NULL reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    owner: ObjectOwner,
    index: u32,
    generation: u32,
}

impl ObjectRef {
    pub(crate) fn new(owner: ObjectOwner, index: u32, generation: u32) -> Self {
        Self {
            owner,
            index,
            generation,
        }
    }

    /// Returns the arena that owns the referenced payload.
    pub fn owner(&self) -> ObjectOwner {
        self.owner
    }

    pub(crate) fn index(&self) -> u32 {
        self.index
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }

    /// Writes this reference into an out-of-line column slot.
    pub fn encode(&self, slot: &mut [u8]) {
        debug_assert_eq!(slot.len(), OBJECT_REF_SIZE);
        let (tag, pool) = match self.owner {
            ObjectOwner::Heap => (OWNER_TAG_HEAP, 0),
            ObjectOwner::Pool(id) => (OWNER_TAG_POOL, id.as_u32()),
        };
        slot[0] = tag;
        slot[1..4].fill(0);
        slot[4..8].copy_from_slice(&self.index.to_le_bytes());
        slot[8..12].copy_from_slice(&self.generation.to_le_bytes());
        slot[12..16].copy_from_slice(&pool.to_le_bytes());
    }

    /// Writes the NULL reference into an out-of-line column slot.
    pub fn encode_null(slot: &mut [u8]) {
        slot[..OBJECT_REF_SIZE].fill(0);
    }

    /// Reads a reference from an out-of-line column slot.
    /// Returns `Some(None)` for the NULL reference and `None` if the slot
    /// does not hold a valid reference.
    pub fn decode(slot: &[u8]) -> Option<Option<Self>> {
        if slot.len() < OBJECT_REF_SIZE {
            return None;
        }
        let word = |at: usize| u32::from_le_bytes([slot[at], slot[at + 1], slot[at + 2], slot[at + 3]]);
        let owner = match slot[0] {
            0 => return Some(None),
            OWNER_TAG_HEAP => ObjectOwner::Heap,
            OWNER_TAG_POOL => ObjectOwner::Pool(PoolId::new(word(12))),
            _ => return None,
        };
        Some(Some(Self::new(owner, word(4), word(8))))
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            ObjectOwner::Heap => write!(f, "heap#{}.{}", self.index, self.generation),
            ObjectOwner::Pool(id) => write!(f, "pool{}#{}.{}", id.0, self.index, self.generation),
        }
    }
}
