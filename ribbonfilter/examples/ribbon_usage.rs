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

use ribbonfilter::ribbon::BytesKeyHasher;
use ribbonfilter::ribbon::RibbonFilter;
use ribbonfilter::ribbon::RibbonFilterBuilder;
use tracing::info;
use tracing::warn;

fn main() {
    // RUST_LOG is not consulted; debug shows the construction events
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Size for 1000 keys; the array is allocated for that many
    let mut filter = RibbonFilter::<str>::new(1000);
    for fruit in [
        "apple",
        "banana",
        "cherry",
        "date",
        "elderberry",
        "fig",
        "grapefruit",
    ] {
        filter.add(fruit).expect("filter is still collecting");
    }

    // Keys are only staged until build() compiles them
    if let Err(err) = filter.build() {
        warn!(%err, "filter construction failed");
        return;
    }
    info!(
        items = filter.size(),
        slots = filter.capacity_slots(),
        bits_per_key = format_args!("{:.1}", filter.bits_per_key().unwrap_or_default()),
        "string filter built"
    );

    for fruit in ["apple", "date", "grapefruit", "grape", "honeydew", "kiwi"] {
        info!(fruit, present = filter.might_contain(fruit), "query");
    }

    // Integers with 32-bit fingerprints
    let mut numbers = RibbonFilterBuilder::with_expected_items(500).build::<i32, u32>();
    for i in 0..500 {
        numbers.add(&(i * 10)).expect("filter is still collecting");
    }
    match numbers.build() {
        Ok(()) => {
            for n in [100, 4990, 101, 5000] {
                info!(n, present = numbers.might_contain(&n), "query");
            }
        }
        Err(err) => warn!(%err, "integer filter construction failed"),
    }

    // Overfilled on purpose: 100 keys into room for 10
    let mut tight = RibbonFilter::<u64>::new(10);
    for i in 0..100u64 {
        tight.add(&i).expect("filter is still collecting");
    }
    if let Err(err) = tight.build() {
        warn!(%err, state = ?tight.state(), "expected failure");
    }

    // Content hashing: String keys, &str queries
    let mut words: RibbonFilter<str, u16, BytesKeyHasher> =
        RibbonFilter::with_hasher(10, BytesKeyHasher::new());
    for word in ["hello".to_string(), "world".to_string()] {
        words.add(&word).expect("filter is still collecting");
    }
    if words.build().is_ok() {
        info!(
            hello = words.might_contain("hello"),
            test = words.might_contain("test"),
            "byte filter built"
        );
    }
}
