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

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use super::peel;
use super::Fingerprint;
use super::HashKeyHasher;
use super::RibbonFilterBuilder;
use super::RibbonHasher;
use crate::error::Error;

/// Lifecycle of a [`RibbonFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterState {
    /// Accepting keys; queries report nothing.
    Collecting,
    /// The array is final; keys are rejected and queries are answered.
    Built,
    /// The last build could not peel every key. Staged keys were discarded, queries report
    /// nothing, and adding keys starts collecting again.
    Failed,
}

/// A key staged for construction.
#[derive(Debug, Clone, Copy)]
struct StagingItem<F> {
    seed: u64,
    fingerprint: F,
}

/// A static approximate-membership filter.
///
/// Keys are staged with [`add()`](Self::add) and compiled once by [`build()`](Self::build). A
/// built filter never reports a false negative for a key added before the build; a key that was
/// never added is reported present with probability about `2^-F::BITS`.
///
/// Type parameters:
/// - `K`: key type, may be unsized (`str`, `[u8]`); keys are never stored
/// - `F`: fingerprint width (default `u16`)
/// - `H`: [`RibbonHasher`] for `K` (default [`HashKeyHasher`])
/// - `N`: slots per key (default 3)
///
/// Use [`RibbonFilter::new()`] or [`super::RibbonFilterBuilder`] to construct instances.
pub struct RibbonFilter<K: ?Sized, F = u16, H = HashKeyHasher, const N: usize = 3> {
    hasher: H,
    state: FilterState,
    block_size: usize,
    /// Always `N * block_size`, even after a failed build empties `slots`.
    array_size: usize,
    staged: Vec<StagingItem<F>>,
    slots: Box<[F]>,
    num_items: usize,
    _key: PhantomData<fn(&K)>,
}

impl<K, F> RibbonFilter<K, F>
where
    K: Hash + ?Sized,
    F: Fingerprint,
{
    /// Creates an empty filter sized for `expected_items` keys with the default hasher.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ribbonfilter::ribbon::RibbonFilter;
    /// let mut filter = RibbonFilter::<str>::new(1000);
    /// for fruit in ["apple", "banana", "cherry", "date"] {
    ///     filter.add(fruit).unwrap();
    /// }
    /// filter.build().unwrap();
    ///
    /// assert!(filter.might_contain("apple"));
    /// assert!(!filter.might_contain("kiwi")); // false - never added (probably)
    /// ```
    pub fn new(expected_items: usize) -> Self {
        RibbonFilterBuilder::with_expected_items(expected_items).build()
    }
}

impl<K, F, H, const N: usize> RibbonFilter<K, F, H, N>
where
    K: ?Sized,
    F: Fingerprint,
    H: RibbonHasher<K>,
{
    /// Creates an empty filter sized for `expected_items` keys with a caller supplied hasher.
    ///
    /// # Panics
    ///
    /// Panics if `N` is not between 3 and 7.
    pub fn with_hasher(expected_items: usize, hasher: H) -> Self {
        RibbonFilterBuilder::with_expected_items(expected_items).build_with_hasher(hasher)
    }

    pub(super) fn from_parts(hasher: H, block_size: usize, expected_items: usize) -> Self {
        RibbonFilter {
            hasher,
            state: FilterState::Collecting,
            block_size,
            array_size: block_size * N,
            staged: Vec::with_capacity(expected_items),
            slots: Box::default(),
            num_items: 0,
            _key: PhantomData,
        }
    }

    /// Stages a key for the next [`build()`](Self::build).
    ///
    /// Adding the same key twice is allowed; both copies resolve to one equation at build time.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::AlreadyBuilt`](crate::error::ErrorKind::AlreadyBuilt) once the filter
    /// has been built. The filter stays queryable.
    pub fn add(&mut self, key: &K) -> Result<(), Error> {
        if self.state == FilterState::Built {
            return Err(Error::already_built());
        }
        let seed = self.hasher.seed(key);
        let fingerprint = self.hasher.fingerprint_from_seed::<F>(seed);
        self.staged.push(StagingItem { seed, fingerprint });
        self.state = FilterState::Collecting;
        Ok(())
    }

    /// Stages every key of `keys`, stopping at the first error.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ribbonfilter::ribbon::RibbonFilter;
    /// let mut filter = RibbonFilter::<u64>::new(100);
    /// filter.add_all(&[1, 2, 3]).unwrap();
    /// assert_eq!(filter.num_staged(), 3);
    /// ```
    pub fn add_all<'a, I>(&mut self, keys: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        keys.into_iter().try_for_each(|key| self.add(key))
    }

    /// Compiles the staged keys into the filter array.
    ///
    /// Calling `build()` on a built filter does nothing and succeeds. Building with no staged
    /// keys succeeds and yields a filter that contains nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConstructionFailed`](crate::error::ErrorKind::ConstructionFailed)
    /// when the keys cannot all be peeled, which becomes likely once the key count exceeds the
    /// expected count. The staged keys are discarded and the filter moves to
    /// [`FilterState::Failed`]. Retrying needs a larger filter or a different hash seed, and the
    /// keys must be added again.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ribbonfilter::error::ErrorKind;
    /// # use ribbonfilter::ribbon::RibbonFilter;
    /// let mut filter = RibbonFilter::<u32>::new(10);
    /// for i in 0..100 {
    ///     filter.add(&i).unwrap();
    /// }
    /// let err = filter.build().unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::ConstructionFailed);
    /// assert_eq!(filter.size(), 0);
    /// assert!(!filter.might_contain(&1));
    /// ```
    pub fn build(&mut self) -> Result<(), Error> {
        if self.state == FilterState::Built {
            return Ok(());
        }

        let mut staged = std::mem::take(&mut self.staged);
        let num_items = staged.len();
        debug!(
            items = num_items,
            slots = self.array_size,
            block_size = self.block_size,
            num_indices = N,
            "building ribbon filter"
        );

        // equal seeds give identical hyperedges, which never peel; one equation covers them all
        staged.sort_unstable_by_key(|item| item.seed);
        staged.dedup_by_key(|item| item.seed);
        if staged.len() < num_items {
            trace!(
                collapsed = num_items - staged.len(),
                "collapsed keys with equal seeds"
            );
        }

        let mut edges = Vec::with_capacity(staged.len());
        for item in &staged {
            let indices = self.hasher.slot_indices::<N>(item.seed, self.block_size);
            if let Some(&index) = indices.iter().find(|&&index| index >= self.array_size) {
                warn!(
                    index,
                    slots = self.array_size,
                    "hasher produced an out of range slot; discarding staged keys"
                );
                self.fail();
                return Err(Error::slot_out_of_range(index, self.array_size));
            }
            edges.push(indices);
        }
        let fingerprints: Vec<F> = staged.iter().map(|item| item.fingerprint).collect();

        match peel::solve(&edges, &fingerprints, self.array_size) {
            Ok(slots) => {
                debug!(
                    items = num_items,
                    distinct = edges.len(),
                    slots = self.array_size,
                    "ribbon filter built"
                );
                self.slots = slots.into_boxed_slice();
                self.num_items = num_items;
                self.state = FilterState::Built;
                Ok(())
            }
            Err(unpeelable) => {
                warn!(
                    items = num_items,
                    distinct = edges.len(),
                    peeled = unpeelable.peeled,
                    slots = self.array_size,
                    "ribbon filter construction failed; discarding staged keys"
                );
                self.fail();
                Err(Error::construction_failed(
                    num_items,
                    edges.len(),
                    unpeelable.peeled,
                    self.array_size,
                ))
            }
        }
    }

    fn fail(&mut self) {
        self.staged = Vec::new();
        self.slots = Box::default();
        self.num_items = 0;
        self.state = FilterState::Failed;
    }

    /// Tests whether a key is possibly in the set.
    ///
    /// Returns:
    /// - `true`: the key was **possibly** added (or is a false positive)
    /// - `false`: the key was **definitely not** added, or the filter is not built
    pub fn might_contain(&self, key: &K) -> bool {
        if self.state != FilterState::Built || self.num_items == 0 || self.array_size == 0 {
            return false;
        }

        let seed = self.hasher.seed(key);
        let fingerprint = self.hasher.fingerprint_from_seed::<F>(seed);
        let mut xor = F::default();
        for index in self.hasher.slot_indices::<N>(seed, self.block_size) {
            match self.slots.get(index) {
                Some(&value) => xor ^= value,
                None => return false,
            }
        }
        xor == fingerprint
    }
}

impl<K: ?Sized, F: Fingerprint, H, const N: usize> RibbonFilter<K, F, H, N> {
    /// Returns the number of keys in the filter: the keys staged at the last successful build,
    /// or 0 if the filter is not built.
    pub fn size(&self) -> usize {
        match self.state {
            FilterState::Built => self.num_items,
            _ => 0,
        }
    }

    /// Returns the total number of slots in the filter array.
    pub fn capacity_slots(&self) -> usize {
        self.array_size
    }

    /// Returns whether the filter has been built.
    pub fn is_built(&self) -> bool {
        self.state == FilterState::Built
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Returns the number of keys staged for the next build.
    pub fn num_staged(&self) -> usize {
        self.staged.len()
    }

    /// Returns the number of slots in each block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns the number of slots each key maps to.
    pub fn num_indices(&self) -> usize {
        N
    }

    /// Returns the fingerprint width in bits.
    pub fn fingerprint_bits(&self) -> u32 {
        F::BITS
    }

    /// Returns the ratio of keys to slots, or 0.0 if the filter is not built.
    pub fn load_factor(&self) -> f64 {
        if self.array_size == 0 {
            return 0.0;
        }
        self.size() as f64 / self.array_size as f64
    }

    /// Returns the array size in bits divided by the number of keys.
    ///
    /// `None` unless the filter is built with at least one key.
    pub fn bits_per_key(&self) -> Option<f64> {
        match self.size() {
            0 => None,
            n => Some((self.array_size as u64 * u64::from(F::BITS)) as f64 / n as f64),
        }
    }

    /// Estimates the false positive probability: `2^-F::BITS`.
    pub fn estimated_fpp(&self) -> f64 {
        (-f64::from(F::BITS)).exp2()
    }

    /// Returns the hasher.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}

impl<K: ?Sized, F: Clone, H: Clone, const N: usize> Clone for RibbonFilter<K, F, H, N> {
    fn clone(&self) -> Self {
        RibbonFilter {
            hasher: self.hasher.clone(),
            state: self.state,
            block_size: self.block_size,
            array_size: self.array_size,
            staged: self.staged.clone(),
            slots: self.slots.clone(),
            num_items: self.num_items,
            _key: PhantomData,
        }
    }
}

impl<K: ?Sized, F, H: fmt::Debug, const N: usize> fmt::Debug for RibbonFilter<K, F, H, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RibbonFilter")
            .field("hasher", &self.hasher)
            .field("state", &self.state)
            .field("num_indices", &N)
            .field("block_size", &self.block_size)
            .field("array_size", &self.array_size)
            .field("num_staged", &self.staged.len())
            .field("num_items", &self.num_items)
            .finish()
    }
}
