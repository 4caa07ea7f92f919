use std::hash::{Hash, Hasher};

use crate::common::Result;

use super::Tuple;

/// Hashes a tuple by its column values.
#[derive(Debug, Default, Clone, Copy)]
pub struct TupleHasher;

impl TupleHasher {
    pub fn hash(&self, tuple: &Tuple<'_>) -> Result<u64> {
        tuple.hash_code()
    }
}

/// Compares two tuples by their column values, ignoring layout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TupleEqualityChecker;

impl TupleEqualityChecker {
    pub fn eq(&self, left: &Tuple<'_>, right: &Tuple<'_>) -> Result<bool> {
        left.equals_ignoring_schema(right)
    }
}

/// A tuple keyed by value, for `HashSet`/`HashMap` grouping.
///
/// The hash is computed once when the key is built, so every out-of-line
/// value must resolve at that point. Keys compare with
/// `equals_ignoring_schema`; a comparison that fails to read a value counts
/// as unequal.
#[derive(Debug, Clone, Copy)]
pub struct TupleKey<'a> {
    tuple: Tuple<'a>,
    hash: u64,
}

impl<'a> TupleKey<'a> {
    pub fn new(tuple: Tuple<'a>) -> Result<Self> {
        let hash = TupleHasher.hash(&tuple)?;
        Ok(Self { tuple, hash })
    }

    pub fn tuple(&self) -> Tuple<'a> {
        self.tuple
    }

    pub fn hash_code(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for TupleKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && TupleEqualityChecker
                .eq(&self.tuple, &other.tuple)
                .unwrap_or(false)
    }
}

impl Eq for TupleKey<'_> {}

impl Hash for TupleKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}
