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

mod fnv;
mod murmurhash;

pub(crate) use self::fnv::Fnv1a64;
pub(crate) use self::murmurhash::MurmurHash3X64128;

/// The seed 9001 used by the default key hasher.
///
/// Two filters only agree on which keys map to which slots when they hash with the same seed.
pub(crate) const DEFAULT_UPDATE_SEED: u64 = 9001;

/// SplitMix64 finalizer: a bijective 64-bit avalanche mix.
#[inline]
pub(crate) fn mix64(mut h: u64) -> u64 {
    h ^= h >> 30;
    h = h.wrapping_mul(0xbf58476d1ce4e5b9);
    h ^= h >> 27;
    h = h.wrapping_mul(0x94d049bb133111eb);
    h ^ (h >> 31)
}
