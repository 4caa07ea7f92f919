/// Size of the per-row header byte holding the status flags
pub const TUPLE_HEADER_SIZE: usize = 1;

/// Variable-length columns declared narrower than this are stored inline
/// when the schema allows inlined objects
pub const UNINLINEABLE_OBJECT_LENGTH: usize = 64;

/// Width of an out-of-line column slot (an encoded `ObjectRef`)
pub const OBJECT_REF_SIZE: usize = 16;

/// Bit set in an inline length byte to mark a NULL value
pub const INLINE_OBJECT_NULL_BIT: u8 = 0x40;

/// Maximum number of decimal digits a DECIMAL can hold
pub const MAX_DECIMAL_PRECISION: usize = 38;

/// Number of fractional digits a DECIMAL carries
pub const DECIMAL_SCALE: u32 = 12;

/// Bookkeeping bytes charged to every out-of-line payload
pub const OBJECT_ALLOCATION_OVERHEAD: usize = 16;

/// Smallest allocation size class for out-of-line payloads
pub const MIN_OBJECT_ALLOCATION: usize = 16;

/// Length prefix stored in front of every out-of-line payload
pub const OBJECT_LENGTH_PREFIX: usize = 4;
