// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::hash::Hash;
use std::hash::Hasher;

use super::Fingerprint;
use crate::hash::mix64;
use crate::hash::Fnv1a64;
use crate::hash::MurmurHash3X64128;
use crate::hash::DEFAULT_UPDATE_SEED;

/// Turns keys of type `K` into the 64-bit seeds a [`RibbonFilter`](super::RibbonFilter) is
/// built from.
///
/// Only [`seed`](Self::seed) is required. Fingerprints and slot indices are both derived from
/// the seed, so two keys with the same seed are indistinguishable to the filter.
///
/// # Examples
///
/// A hasher for a key type whose identity is a single integer field:
///
/// ```
/// # use ribbonfilter::ribbon::RibbonFilterBuilder;
/// # use ribbonfilter::ribbon::RibbonFilter;
/// # use ribbonfilter::ribbon::RibbonHasher;
/// struct UserId(u64);
///
/// struct UserIdHasher;
///
/// impl RibbonHasher<UserId> for UserIdHasher {
///     fn seed(&self, key: &UserId) -> u64 {
///         key.0.wrapping_mul(0x9e3779b97f4a7c15)
///     }
/// }
///
/// let mut filter: RibbonFilter<UserId, u16, UserIdHasher> =
///     RibbonFilterBuilder::with_expected_items(10).build_with_hasher(UserIdHasher);
/// filter.add(&UserId(7)).unwrap();
/// filter.build().unwrap();
/// assert!(filter.might_contain(&UserId(7)));
/// ```
pub trait RibbonHasher<K: ?Sized> {
    /// Maps a key to its seed. Must be deterministic; need not be cryptographic.
    fn seed(&self, key: &K) -> u64;

    /// Derives the fingerprint stored for a key with this seed.
    fn fingerprint_from_seed<F: Fingerprint>(&self, seed: u64) -> F {
        F::from_seed(seed)
    }

    /// Derives one slot index per block for a key with this seed.
    ///
    /// The default delegates to [`BlockIndexer`]. Every index must be below
    /// `N * block_size`; a filter treats anything else as a construction failure.
    fn slot_indices<const N: usize>(&self, seed: u64, block_size: usize) -> [usize; N] {
        BlockIndexer::<N>::indices(seed, block_size)
    }
}

/// Generates `N` slot indices, one inside each of `N` equally sized blocks.
///
/// Index `i` comes from the `i`-th round of a chained 64-bit avalanche mix of the seed, reduced
/// modulo the block size and offset into block `i`. Landing in different blocks keeps the
/// indices of a key pairwise distinct.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockIndexer<const N: usize>;

impl<const N: usize> BlockIndexer<N> {
    /// Returns the `N` slot indices for `seed`.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ribbonfilter::ribbon::BlockIndexer;
    /// let indices = BlockIndexer::<3>::indices(42, 100);
    /// assert!(indices[0] < 100);
    /// assert!((100..200).contains(&indices[1]));
    /// assert!((200..300).contains(&indices[2]));
    /// ```
    pub fn indices(seed: u64, block_size: usize) -> [usize; N] {
        assert!(block_size > 0, "block_size must be at least 1");
        let modulus = block_size as u64;
        let mut h = seed;
        std::array::from_fn(|block| {
            h = mix64(h);
            (h % modulus) as usize + block * block_size
        })
    }
}

/// The default hasher: any [`Hash`] key, hashed with MurmurHash3.
///
/// `String` and `str` hash identically, as do `Vec<T>` and `[T]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashKeyHasher {
    hash_seed: u64,
}

impl HashKeyHasher {
    /// Creates a hasher with the default seed (9001).
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_UPDATE_SEED)
    }

    /// Creates a hasher with a custom seed.
    ///
    /// Reseeding changes every key's slots, which can turn an unpeelable key set into a
    /// peelable one.
    pub fn with_seed(hash_seed: u64) -> Self {
        HashKeyHasher { hash_seed }
    }

    /// Returns the hash seed.
    pub fn hash_seed(&self) -> u64 {
        self.hash_seed
    }
}

impl Default for HashKeyHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + ?Sized> RibbonHasher<K> for HashKeyHasher {
    fn seed(&self, key: &K) -> u64 {
        let mut hasher = MurmurHash3X64128::with_seed(self.hash_seed);
        key.hash(&mut hasher);
        hasher.finish()
    }
}

/// Content hasher for byte-like keys: FNV-1a over the key's bytes.
///
/// Equal content gives equal seeds whatever the container, so a filter built from `String`s
/// can be queried with `&str` or `&[u8]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BytesKeyHasher {
    hash_seed: u64,
}

impl BytesKeyHasher {
    /// Creates a hasher computing plain FNV-1a (seed 0).
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Creates a hasher whose seed is folded into the FNV offset basis.
    pub fn with_seed(hash_seed: u64) -> Self {
        BytesKeyHasher { hash_seed }
    }

    /// Returns the hash seed.
    pub fn hash_seed(&self) -> u64 {
        self.hash_seed
    }
}

impl<K: AsRef<[u8]> + ?Sized> RibbonHasher<K> for BytesKeyHasher {
    fn seed(&self, key: &K) -> u64 {
        let mut hasher = Fnv1a64::with_seed(self.hash_seed);
        hasher.write(key.as_ref());
        hasher.finish()
    }
}
