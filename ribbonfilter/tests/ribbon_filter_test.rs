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

use googletest::assert_that;
use googletest::prelude::eq;
use googletest::prelude::lt;
use googletest::prelude::near;
use ribbonfilter::error::ErrorKind;
use ribbonfilter::ribbon::BytesKeyHasher;
use ribbonfilter::ribbon::FilterState;
use ribbonfilter::ribbon::HashKeyHasher;
use ribbonfilter::ribbon::RibbonFilter;
use ribbonfilter::ribbon::RibbonFilterBuilder;

fn keys(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}_{i}")).collect()
}

#[test]
fn test_end_to_end() {
    let mut filter = RibbonFilter::<str>::new(1000);
    for fruit in ["apple", "banana", "cherry", "date"] {
        filter.add(fruit).unwrap();
    }
    assert!(!filter.is_built());
    assert_eq!(filter.size(), 0);

    filter.build().unwrap();
    assert!(filter.is_built());
    assert_eq!(filter.size(), 4);
    assert!(filter.might_contain("apple"));
    assert!(filter.might_contain("banana"));
    assert!(filter.might_contain("cherry"));
    assert!(filter.might_contain("date"));
    // probabilistic in general; deterministic for the default seed
    assert!(!filter.might_contain("kiwi"));
}

#[test]
fn test_end_to_end_failure() {
    let mut filter = RibbonFilter::<i32>::new(10);
    for i in 0..100 {
        filter.add(&i).unwrap();
    }

    let err = filter.build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstructionFailed);
    assert_eq!(err.context("items"), Some("100"));
    assert_eq!(err.context("slots"), Some("15"));

    assert_eq!(filter.size(), 0);
    assert!(!filter.is_built());
    assert_eq!(filter.state(), FilterState::Failed);
    for i in 0..100 {
        assert!(!filter.might_contain(&i));
    }
}

#[test]
fn test_no_false_negatives() {
    let keys = keys("key", 1000);
    let mut filter = RibbonFilter::<str>::new(2000);
    for key in &keys {
        filter.add(key).unwrap();
    }
    filter.build().unwrap();

    for key in &keys {
        assert!(filter.might_contain(key), "missing {key}");
    }
}

#[test]
fn test_false_positive_rate() {
    let mut filter = RibbonFilter::<str>::new(2000);
    for key in keys("key", 1000) {
        filter.add(&key).unwrap();
    }
    filter.build().unwrap();

    let trials = 10_000;
    let positives = keys("other", trials)
        .iter()
        .filter(|key| filter.might_contain(key))
        .count();
    assert_that!(positives as f64 / trials as f64, lt(0.01));
}

#[test]
fn test_false_positive_rate_tracks_width() {
    let mut filter = RibbonFilterBuilder::with_expected_items(2000).build::<str, u8>();
    for key in keys("key", 1000) {
        filter.add(&key).unwrap();
    }
    filter.build().unwrap();

    let trials = 10_000;
    let positives = keys("other", trials)
        .iter()
        .filter(|key| filter.might_contain(key))
        .count();
    let rate = positives as f64 / trials as f64;
    assert_that!(rate, near(filter.estimated_fpp(), 0.002));
}

#[test]
fn test_idempotent_build() {
    let mut filter = RibbonFilter::<u64>::new(10);
    filter.add(&1).unwrap();
    filter.add(&2).unwrap();
    filter.build().unwrap();
    assert_eq!(filter.size(), 2);

    filter.build().unwrap();
    assert!(filter.is_built());
    assert_eq!(filter.size(), 2);
}

#[test]
fn test_reject_after_build() {
    let mut filter = RibbonFilter::<str>::new(10);
    filter.add("test1").unwrap();
    filter.build().unwrap();

    let err = filter.add("test2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyBuilt);
    assert_eq!(filter.size(), 1);
    assert!(filter.might_contain("test1"));

    let err = filter.add_all(["a", "b"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyBuilt);
}

#[test]
fn test_deterministic_sizing() {
    let filter = RibbonFilter::<u64>::new(0);
    assert_eq!(filter.capacity_slots(), 3);
    assert_eq!(filter.block_size(), 1);

    let filter = RibbonFilter::<u64>::new(10);
    assert_eq!(filter.capacity_slots(), 15);
}

#[test]
fn test_query_before_build() {
    let mut filter = RibbonFilter::<u32>::new(10);
    filter.add(&1).unwrap();
    assert!(!filter.might_contain(&1));
}

#[test]
fn test_zero_item_build() {
    let mut filter = RibbonFilter::<u32>::new(10);
    filter.build().unwrap();
    assert!(filter.is_built());
    assert_eq!(filter.size(), 0);
    assert!(!filter.might_contain(&0));
    assert!(!filter.might_contain(&1));
}

#[test]
fn test_wide_fingerprint() {
    let mut filter = RibbonFilterBuilder::with_expected_items(100).build::<i32, u32>();
    for i in 0..50 {
        filter.add(&(i * 100)).unwrap();
    }
    filter.build().unwrap();
    assert_eq!(filter.size(), 50);
    assert_eq!(filter.fingerprint_bits(), 32);

    assert!(filter.might_contain(&1000));
    assert!(filter.might_contain(&0));
    assert!(filter.might_contain(&4900));
    assert!(!filter.might_contain(&1001));
    assert!(!filter.might_contain(&5000));
}

#[test]
fn test_reseed_after_failure() {
    let keys: Vec<i32> = (0..50).map(|i| i * 100).collect();

    let mut filter = RibbonFilterBuilder::with_expected_items(50).build::<i32, u32>();
    filter.add_all(&keys).unwrap();
    assert_eq!(
        filter.build().unwrap_err().kind(),
        ErrorKind::ConstructionFailed
    );
    assert_eq!(filter.num_staged(), 0);

    let mut filter = RibbonFilterBuilder::with_expected_items(50)
        .seed(3)
        .build::<i32, u32>();
    filter.add_all(&keys).unwrap();
    filter.build().unwrap();
    assert!(keys.iter().all(|key| filter.might_contain(key)));
}

#[test]
fn test_bytes_key_hasher() {
    let words = ["alpha", "beta", "gamma", "delta", "epsilon"];
    let mut filter: RibbonFilter<str, u16, BytesKeyHasher> =
        RibbonFilter::with_hasher(10, BytesKeyHasher::new());
    for word in words {
        filter.add(&word.to_string()).unwrap();
    }
    filter.build().unwrap();

    for word in words {
        assert!(filter.might_contain(word));
    }
    assert!(!filter.might_contain("zeta"));
    assert!(!filter.might_contain(""));
}

#[test]
fn test_four_indices() {
    let mut filter: RibbonFilter<u64, u16, HashKeyHasher, 4> =
        RibbonFilter::with_hasher(600, HashKeyHasher::new());
    assert_eq!(filter.capacity_slots() % 4, 0);
    for i in 0..500u64 {
        filter.add(&i).unwrap();
    }
    filter.build().unwrap();

    assert!((0..500u64).all(|i| filter.might_contain(&i)));
    let positives = (500..10_500u64).filter(|i| filter.might_contain(i)).count();
    assert_that!(positives, eq(0));
}

#[test]
fn test_concurrent_queries() {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    let keys = keys("shared", 500);
    let mut filter = RibbonFilter::<str>::new(1000);
    for key in &keys {
        filter.add(key).unwrap();
    }
    filter.build().unwrap();
    assert_send_sync(&filter);

    let filter = &filter;
    std::thread::scope(|s| {
        for chunk in keys.chunks(125) {
            s.spawn(move || {
                for key in chunk {
                    assert!(filter.might_contain(key));
                }
            });
        }
    });
}
