//! Faster (but not DoS-resistant) hashmaps and sets
//!
//! Every table in the graph is keyed either by a word or by an integer id
//! whose bits are already well distributed, so SipHash buys nothing here.
use farmhash;
use hash_hasher::HashBuildHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher, BuildHasherDefault};

/// Act like a farmhash
///
/// Farmhash isn't a streaming hash, so successive writes are folded in by
/// reseeding with the running value. Words arrive in one write anyway; the
/// fold only matters for the trailing length marker str hashing appends.
pub struct FarmHasher (u64);

impl Default for FarmHasher {
    #[inline]
    fn default() -> FarmHasher { FarmHasher(0) }
}

impl Hasher for FarmHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.0 = farmhash::hash64_with_seed(bytes, self.0);
    }
}

pub type Farm = BuildHasherDefault<FarmHasher>;
pub type FarmMap<X, Y> = HashMap<X, Y, Farm>;
pub type FarmSet<X> = HashSet<X, Farm>;

pub fn new_farm<X: Hash+Eq, Y>() -> FarmMap<X, Y> {
    Default::default()
}

pub fn new_farm_set<X: Hash+Eq>() -> FarmSet<X> {
    Default::default()
}

/// Tweet ids, node ids, and edge keys go into the table nearly untouched
pub type IntMap<X, Y> = HashMap<X, Y, HashBuildHasher>;
pub type IntSet<X> = HashSet<X, HashBuildHasher>;
