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

use super::Fingerprint;
use super::HashKeyHasher;
use super::RibbonFilter;
use super::RibbonHasher;
use crate::hash::DEFAULT_UPDATE_SEED;

/// Fewest slots per key a filter may use.
pub const MIN_NUM_INDICES: usize = 3;
/// Most slots per key a filter may use.
pub const MAX_NUM_INDICES: usize = 7;

/// Builder for creating [`RibbonFilter`] instances.
///
/// The builder turns an expected key count into an array layout. The layout only affects how
/// likely construction is to succeed; it never makes a built filter answer incorrectly.
#[derive(Debug, Clone)]
pub struct RibbonFilterBuilder {
    expected_items: usize,
    load_factor: Option<f64>,
    seed: u64,
}

impl RibbonFilterBuilder {
    /// Creates a builder sized for `expected_items` keys.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ribbonfilter::ribbon::RibbonFilter;
    /// # use ribbonfilter::ribbon::RibbonFilterBuilder;
    /// let filter: RibbonFilter<str> = RibbonFilterBuilder::with_expected_items(1000).build();
    /// assert_eq!(filter.capacity_slots(), 1236);
    /// ```
    pub fn with_expected_items(expected_items: usize) -> Self {
        RibbonFilterBuilder {
            expected_items,
            load_factor: None,
            seed: DEFAULT_UPDATE_SEED,
        }
    }

    /// Overrides the target ratio of keys to slots.
    ///
    /// Lower values allocate more slots and make construction more likely to succeed. The
    /// default depends on the number of indices per key, see
    /// [`default_load_factor()`](Self::default_load_factor).
    ///
    /// # Panics
    ///
    /// Panics if `load_factor` is not in (0.0, 1.0].
    pub fn load_factor(mut self, load_factor: f64) -> Self {
        check_load_factor(load_factor);
        self.load_factor = Some(load_factor);
        self
    }

    /// Sets the seed of the default [`HashKeyHasher`] (default: 9001).
    ///
    /// Only [`build()`](Self::build) uses it; a hasher passed to
    /// [`build_with_hasher()`](Self::build_with_hasher) carries its own seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds an empty filter over any [`Hash`] key, using the default hasher and three
    /// indices per key.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ribbonfilter::ribbon::RibbonFilterBuilder;
    /// let mut filter = RibbonFilterBuilder::with_expected_items(100)
    ///     .seed(42)
    ///     .build::<str, u32>();
    /// filter.add("apple").unwrap();
    /// filter.build().unwrap();
    /// assert!(filter.might_contain("apple"));
    /// ```
    pub fn build<K, F>(self) -> RibbonFilter<K, F>
    where
        K: Hash + ?Sized,
        F: Fingerprint,
    {
        let hasher = HashKeyHasher::with_seed(self.seed);
        self.build_with_hasher(hasher)
    }

    /// Builds an empty filter using a caller supplied hasher and `N` indices per key.
    ///
    /// # Panics
    ///
    /// Panics if `N` is not in [`MIN_NUM_INDICES`]`..=`[`MAX_NUM_INDICES`] (3 to 7).
    ///
    /// # Examples
    ///
    /// ```
    /// # use ribbonfilter::ribbon::BytesKeyHasher;
    /// # use ribbonfilter::ribbon::RibbonFilter;
    /// # use ribbonfilter::ribbon::RibbonFilterBuilder;
    /// let filter: RibbonFilter<[u8], u16, BytesKeyHasher, 4> =
    ///     RibbonFilterBuilder::with_expected_items(750).build_with_hasher(BytesKeyHasher::new());
    /// assert_eq!(filter.num_indices(), 4);
    /// assert_eq!(filter.capacity_slots(), 1000);
    /// ```
    pub fn build_with_hasher<K, F, H, const N: usize>(self, hasher: H) -> RibbonFilter<K, F, H, N>
    where
        K: ?Sized,
        F: Fingerprint,
        H: RibbonHasher<K>,
    {
        assert!(
            (MIN_NUM_INDICES..=MAX_NUM_INDICES).contains(&N),
            "num_indices must be between {MIN_NUM_INDICES} and {MAX_NUM_INDICES}"
        );
        let load_factor = self
            .load_factor
            .unwrap_or_else(|| Self::default_load_factor(N));
        let block_size = Self::suggest_block_size(self.expected_items, N, load_factor);
        RibbonFilter::from_parts(hasher, block_size, self.expected_items)
    }

    /// Returns the default load factor for `num_indices` indices per key.
    ///
    /// Each value sits just below the load at which peeling a random `num_indices`-uniform
    /// hypergraph stops succeeding with high probability.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ribbonfilter::ribbon::RibbonFilterBuilder;
    /// assert_eq!(RibbonFilterBuilder::default_load_factor(3), 0.81);
    /// assert_eq!(RibbonFilterBuilder::default_load_factor(4), 0.75);
    /// ```
    pub fn default_load_factor(num_indices: usize) -> f64 {
        match num_indices {
            4 => 0.75,
            5 => 0.68,
            6 => 0.62,
            n if n >= 7 => 0.56,
            _ => 0.81,
        }
    }

    /// Suggests the block size for `expected_items` keys.
    ///
    /// Formula: `ceil(ceil(expected_items / load_factor) / num_indices)`, with one slot per
    /// block when no keys are expected.
    ///
    /// # Panics
    ///
    /// Panics if `load_factor` is not in (0.0, 1.0].
    ///
    /// # Examples
    ///
    /// ```
    /// # use ribbonfilter::ribbon::RibbonFilterBuilder;
    /// assert_eq!(RibbonFilterBuilder::suggest_block_size(0, 3, 0.81), 1);
    /// assert_eq!(RibbonFilterBuilder::suggest_block_size(10, 3, 0.81), 5);
    /// assert_eq!(RibbonFilterBuilder::suggest_block_size(1000, 3, 0.81), 412);
    /// ```
    pub fn suggest_block_size(expected_items: usize, num_indices: usize, load_factor: f64) -> usize {
        check_load_factor(load_factor);
        if expected_items == 0 {
            return 1;
        }
        let total_slots = (expected_items as f64 / load_factor).ceil() as usize;
        total_slots.div_ceil(num_indices.max(1)).max(1)
    }

    /// Suggests the total number of slots for `expected_items` keys.
    ///
    /// Always a multiple of `num_indices`.
    ///
    /// # Panics
    ///
    /// Panics if `load_factor` is not in (0.0, 1.0].
    ///
    /// # Examples
    ///
    /// ```
    /// # use ribbonfilter::ribbon::RibbonFilterBuilder;
    /// assert_eq!(RibbonFilterBuilder::suggest_array_size(0, 3, 0.81), 3);
    /// assert_eq!(RibbonFilterBuilder::suggest_array_size(10, 3, 0.81), 15);
    /// ```
    pub fn suggest_array_size(expected_items: usize, num_indices: usize, load_factor: f64) -> usize {
        Self::suggest_block_size(expected_items, num_indices, load_factor) * num_indices
    }
}

fn check_load_factor(load_factor: f64) {
    assert!(
        load_factor > 0.0 && load_factor <= 1.0,
        "load_factor must be between 0.0 and 1.0 (inclusive of 1.0)"
    );
}
