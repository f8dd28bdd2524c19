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

//! Construction core: peel the key hypergraph, then solve it by back-substitution.
//!
//! Every key is a hyperedge over its `N` slots. A slot touched by exactly one live key pins that
//! key: whatever the other slots end up holding, the pinned slot can be chosen to make the key's
//! XOR come out right. Peeling repeatedly removes pinned keys; if every key is removed, walking
//! the removals backwards fills the array so that each key's equation holds.

use super::Fingerprint;

/// Peeling stopped before every key was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Unpeelable {
    pub(crate) peeled: usize,
}

/// Slot to key incidence, flattened into one arena.
///
/// The keys touching slot `s` live in `keys[start[s]..start[s] + live[s]]`. Removing a key swaps
/// it past the live range, so a slot's keys never move to another slot's range.
struct Incidence {
    start: Vec<usize>,
    live: Vec<usize>,
    keys: Vec<usize>,
}

impl Incidence {
    fn new<const N: usize>(edges: &[[usize; N]], num_slots: usize) -> Self {
        let mut live = vec![0usize; num_slots];
        for edge in edges {
            for &slot in edge {
                live[slot] += 1;
            }
        }

        let mut start = Vec::with_capacity(num_slots + 1);
        let mut offset = 0;
        start.push(offset);
        for &degree in &live {
            offset += degree;
            start.push(offset);
        }

        let mut cursor = start[..num_slots].to_vec();
        let mut keys = vec![0usize; offset];
        for (key, edge) in edges.iter().enumerate() {
            for &slot in edge {
                keys[cursor[slot]] = key;
                cursor[slot] += 1;
            }
        }

        Incidence { start, live, keys }
    }

    fn degree(&self, slot: usize) -> usize {
        self.live[slot]
    }

    fn sole_key(&self, slot: usize) -> Option<usize> {
        (self.live[slot] == 1).then(|| self.keys[self.start[slot]])
    }

    fn remove(&mut self, slot: usize, key: usize) {
        let begin = self.start[slot];
        let end = begin + self.live[slot];
        if let Some(pos) = self.keys[begin..end].iter().position(|&k| k == key) {
            self.keys.swap(begin + pos, end - 1);
            self.live[slot] -= 1;
        }
    }
}

/// Solves `XOR(array[i] for i in edges[k]) == fingerprints[k]` for every key `k`.
///
/// `edges` and `fingerprints` are indexed by key id, and every slot in `edges` must be below
/// `num_slots`. On success returns the filled array; otherwise reports how many keys were
/// peeled before the queue ran dry.
pub(crate) fn solve<F: Fingerprint, const N: usize>(
    edges: &[[usize; N]],
    fingerprints: &[F],
    num_slots: usize,
) -> Result<Vec<F>, Unpeelable> {
    debug_assert_eq!(edges.len(), fingerprints.len());

    let mut incidence = Incidence::new(edges, num_slots);
    let mut queue: Vec<usize> = (0..num_slots)
        .filter(|&slot| incidence.degree(slot) == 1)
        .collect();
    let mut order: Vec<(usize, usize)> = Vec::with_capacity(edges.len());

    let mut head = 0;
    while head < queue.len() {
        let slot = queue[head];
        head += 1;

        // the slot may have lost its last key since it was queued
        let Some(key) = incidence.sole_key(slot) else {
            continue;
        };
        order.push((key, slot));

        for &other in &edges[key] {
            incidence.remove(other, key);
            if other != slot && incidence.degree(other) == 1 {
                queue.push(other);
            }
        }
    }

    if order.len() < edges.len() {
        return Err(Unpeelable {
            peeled: order.len(),
        });
    }

    let mut array = vec![F::default(); num_slots];
    for &(key, slot) in order.iter().rev() {
        let mut value = fingerprints[key];
        for &other in edges[key].iter().filter(|&&other| other != slot) {
            value ^= array[other];
        }
        array[slot] = value;
    }
    Ok(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ribbon::BlockIndexer;

    fn assert_solved<const N: usize>(edges: &[[usize; N]], fingerprints: &[u16], array: &[u16]) {
        for (edge, &fp) in edges.iter().zip(fingerprints) {
            let xor = edge.iter().fold(0u16, |acc, &slot| acc ^ array[slot]);
            assert_eq!(xor, fp, "edge {edge:?}");
        }
    }

    #[test]
    fn test_single_key() {
        let edges = [[0, 1, 2]];
        let fingerprints = [0xbeef_u16];
        let array = solve(&edges, &fingerprints, 3).unwrap();
        assert_solved(&edges, &fingerprints, &array);
    }

    #[test]
    fn test_no_keys() {
        let edges: [[usize; 3]; 0] = [];
        let fingerprints: [u16; 0] = [];
        assert_eq!(solve(&edges, &fingerprints, 6).unwrap(), vec![0u16; 6]);
    }

    #[test]
    fn test_overlapping_keys() {
        let edges = [[0, 4, 2], [1, 4, 3], [1, 5, 6], [7, 5, 8]];
        let fingerprints = [11u16, 22, 33, 44];
        let array = solve(&edges, &fingerprints, 9).unwrap();
        assert_solved(&edges, &fingerprints, &array);
    }

    #[test]
    fn test_identical_edges_cannot_peel() {
        let edges = [[0, 1, 2], [0, 1, 2]];
        let fingerprints = [5u16, 5];
        assert_eq!(
            solve(&edges, &fingerprints, 3),
            Err(Unpeelable { peeled: 0 })
        );
    }

    #[test]
    fn test_two_core_blocks_peeling() {
        // the first four keys cover slots {0, 1, 3, 4, 6, 7} exactly twice each
        let edges = [
            [0, 3, 6],
            [0, 4, 7],
            [1, 3, 7],
            [1, 4, 6],
            [2, 5, 8],
        ];
        let fingerprints = [1u16, 2, 3, 4, 5];
        assert_eq!(
            solve(&edges, &fingerprints, 9),
            Err(Unpeelable { peeled: 1 })
        );
    }

    #[test]
    fn test_sparse_random_hypergraph() {
        let block_size = 700;
        let edges: Vec<[usize; 3]> = (0..1000u64)
            .map(|seed| BlockIndexer::<3>::indices(seed.wrapping_mul(0x9e3779b97f4a7c15), block_size))
            .collect();
        let fingerprints: Vec<u16> = (0..1000u16).map(|i| i.wrapping_mul(31) | 1).collect();
        let array = solve(&edges, &fingerprints, 3 * block_size).unwrap();
        assert_solved(&edges, &fingerprints, &array);
    }

    #[test]
    fn test_four_indices() {
        let block_size = 400;
        let edges: Vec<[usize; 4]> = (1..=800u64)
            .map(|seed| BlockIndexer::<4>::indices(seed, block_size))
            .collect();
        let fingerprints: Vec<u16> = (1..=800u16).collect();
        let array = solve(&edges, &fingerprints, 4 * block_size).unwrap();
        assert_solved(&edges, &fingerprints, &array);
    }
}
