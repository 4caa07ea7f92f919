/// Status flags stored in the tuple header byte.
///
/// The header is byte 0 of every tuple buffer. Each flag owns one bit, so
/// setting or clearing one never disturbs the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum TupleFlag {
    /// Slot holds a live tuple
    Active = 0x01,
    /// Tuple was modified since the last snapshot
    Dirty = 0x02,
    /// Tuple is deleted but still visible to an in-flight reader
    PendingDelete = 0x04,
    /// Tuple storage is reclaimed when its undo action is released
    PendingDeleteOnUndoRelease = 0x08,
}

impl TupleFlag {
    #[inline]
    pub(crate) fn is_set(self, header: u8) -> bool {
        header & self as u8 != 0
    }

    #[inline]
    pub(crate) fn apply(self, header: u8, on: bool) -> u8 {
        if on {
            header | self as u8
        } else {
            header & !(self as u8)
        }
    }
}
