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
use std::ops::BitXor;
use std::ops::BitXorAssign;

/// A fixed-width value stored in every slot of a [`RibbonFilter`](super::RibbonFilter).
///
/// A wider fingerprint lowers the false positive rate (about `2^-BITS`) at the cost of memory.
pub trait Fingerprint:
    Copy + Default + Eq + BitXor<Output = Self> + BitXorAssign + fmt::Debug + Send + Sync + 'static
{
    /// Width of the fingerprint in bits.
    const BITS: u32;

    /// Truncates a key seed to the fingerprint width.
    ///
    /// A truncated value of zero is remapped to one so that no key ever encodes as an
    /// all-zero row.
    fn from_seed(seed: u64) -> Self;
}

macro_rules! impl_fingerprint {
    ($($ty:ty),*) => {
        $(
            impl Fingerprint for $ty {
                const BITS: u32 = <$ty>::BITS;

                #[inline]
                fn from_seed(seed: u64) -> Self {
                    match seed as $ty {
                        0 => 1,
                        fp => fp,
                    }
                }
            }
        )*
    };
}

impl_fingerprint!(u8, u16, u32, u64);

#[cfg(test)]
mod tests {
    use super::Fingerprint;

    #[test]
    fn test_truncation() {
        let seed = 0x0123_4567_89ab_cdef_u64;
        assert_eq!(u8::from_seed(seed), 0xef);
        assert_eq!(u16::from_seed(seed), 0xcdef);
        assert_eq!(u32::from_seed(seed), 0x89ab_cdef);
        assert_eq!(u64::from_seed(seed), seed);
    }

    #[test]
    fn test_zero_is_remapped() {
        assert_eq!(u8::from_seed(0xff00), 1);
        assert_eq!(u16::from_seed(0xdead_0000), 1);
        assert_eq!(u32::from_seed(0xbeef_0000_0000), 1);
        assert_eq!(u64::from_seed(0), 1);
    }

    #[test]
    fn test_bits() {
        assert_eq!(<u8 as Fingerprint>::BITS, 8);
        assert_eq!(<u16 as Fingerprint>::BITS, 16);
        assert_eq!(<u32 as Fingerprint>::BITS, 32);
        assert_eq!(<u64 as Fingerprint>::BITS, 64);
    }
}
