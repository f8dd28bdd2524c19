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

//! Ribbon filter: a static approximate-membership filter built by hypergraph peeling.
//!
//! A ribbon filter stores one small fingerprint per slot. Every key maps to `N` slots (one in
//! each of `N` blocks), and the filter is constructed so that XOR-ing a key's slots yields the
//! key's fingerprint. A query recomputes the slots and compares.
//!
//! # Properties
//!
//! - **No false negatives**: every key added before a successful build is reported present
//! - **Possible false positives**: about `2^-bits` for `bits`-wide fingerprints
//! - **Build once**: keys are staged, compiled by `build()`, and the filter is immutable after
//! - **Compact**: about `bits / 0.81` bits per key with the default three indices
//!
//! # Usage
//!
//! ```rust
//! use ribbonfilter::ribbon::RibbonFilter;
//!
//! let mut filter = RibbonFilter::<str>::new(1000);
//! filter.add("apple").unwrap();
//! filter.add("banana").unwrap();
//! filter.build().unwrap();
//!
//! assert!(filter.might_contain("apple")); // true - was added
//! assert!(!filter.might_contain("grape")); // false - never added (probably)
//!
//! println!("Slots: {}", filter.capacity_slots());
//! println!("Bits per key: {:.1}", filter.bits_per_key().unwrap());
//! ```
//!
//! # Construction Failure
//!
//! Construction can fail when the slots are too few for the keys, or through unlucky hashing.
//! Failure is an ordinary outcome, reported as
//! [`ErrorKind::ConstructionFailed`](crate::error::ErrorKind::ConstructionFailed). The staged keys
//! are discarded; rebuild with a larger expected count or another seed and add the keys again:
//!
//! ```rust
//! # use ribbonfilter::ribbon::RibbonFilter;
//! # use ribbonfilter::ribbon::RibbonFilterBuilder;
//! let keys: Vec<u64> = (0..100).collect();
//!
//! let mut expected = 10;
//! let filter = loop {
//!     let mut filter = RibbonFilterBuilder::with_expected_items(expected).build::<u64, u16>();
//!     filter.add_all(&keys).unwrap();
//!     match filter.build() {
//!         Ok(()) => break filter,
//!         Err(_) => expected *= 2,
//!     }
//! };
//! assert!(keys.iter().all(|k| filter.might_contain(k)));
//! ```
//!
//! # Hashing
//!
//! Keys reach the filter through a [`RibbonHasher`]. [`HashKeyHasher`] (the default) accepts any
//! [`Hash`](std::hash::Hash) type; [`BytesKeyHasher`] hashes the content of byte-like keys.
//! Implement [`RibbonHasher`] to control hashing for your own key type.
//!
//! # References
//!
//! - Graf and Lemire (2020). "Xor Filters: Faster and Smaller Than Bloom and Cuckoo Filters"
//! - Molloy (2005). "Cores in random hypergraphs and Boolean formulas"

mod builder;
mod filter;
mod fingerprint;
mod hasher;
mod peel;

pub use self::builder::MAX_NUM_INDICES;
pub use self::builder::MIN_NUM_INDICES;
pub use self::builder::RibbonFilterBuilder;
pub use self::filter::FilterState;
pub use self::filter::RibbonFilter;
pub use self::fingerprint::Fingerprint;
pub use self::hasher::BlockIndexer;
pub use self::hasher::BytesKeyHasher;
pub use self::hasher::HashKeyHasher;
pub use self::hasher::RibbonHasher;
