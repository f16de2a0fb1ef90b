// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Destination rules for the synthetic traffic patterns.
//!
//! Each rule is available both per address (`*_address`) and as a whole
//! [`DestinationMap`] covering every source in `[0, num_nodes)`.
//!
//! The bit-based rules ([`transpose`] and [`bit_complement`]) view an address
//! as `log2(num_nodes)` bits and require `num_nodes` to be a power of two.
//! Callers are expected to have validated this (see
//! [`PatternRule::validate`](crate::pattern::PatternRule::validate)).

use rand::Rng;

use crate::types::{DestinationMap, NodeIndex};

/// Returns the number of address bits when `num_nodes` is a non-zero power of
/// two.
#[must_use]
pub fn address_bits(num_nodes: usize) -> Option<u32> {
    if num_nodes.is_power_of_two() {
        Some(num_nodes.trailing_zeros())
    } else {
        None
    }
}

fn mapping(num_nodes: usize, rule: impl Fn(NodeIndex) -> NodeIndex) -> DestinationMap {
    (0..num_nodes).map(|source| (source, rule(source))).collect()
}

/// Swap the row and column halves of the address.
///
/// The `b`-bit address is rotated left by `k = b / 2` bits. When `b` is even
/// this is `((source << k) | (source >> k)) mod num_nodes`. When `b` is odd
/// the rotation keeps the rule a bijection where a plain shift would not.
#[must_use]
pub fn transpose_address(source: NodeIndex, num_nodes: usize) -> NodeIndex {
    debug_assert!(num_nodes.is_power_of_two());
    debug_assert!(source < num_nodes);

    let bits = num_nodes.trailing_zeros();
    let k = bits / 2;
    if k == 0 {
        return source;
    }
    ((source << k) | (source >> (bits - k))) & (num_nodes - 1)
}

/// Send roughly half-way around the address ring: `(source + N/2 - 1) mod N`.
///
/// This is pure modular arithmetic so is defined for any `num_nodes > 0`.
#[must_use]
pub fn tornado_address(source: NodeIndex, num_nodes: usize) -> NodeIndex {
    debug_assert!(source < num_nodes);

    // Add `num_nodes` before subtracting one to stay unsigned.
    (source + num_nodes / 2 + num_nodes - 1) % num_nodes
}

/// Flip every address bit: `(!source) & (N - 1)`.
#[must_use]
pub fn bit_complement_address(source: NodeIndex, num_nodes: usize) -> NodeIndex {
    debug_assert!(num_nodes.is_power_of_two());
    debug_assert!(source < num_nodes);

    !source & (num_nodes - 1)
}

/// Draw a destination uniformly at random.
///
/// When `allow_self` is false the source is excluded from the draw.
///
/// # Panics
///
/// Panics if `allow_self` is false and `num_nodes < 2` as there is no other
/// node to send to. [`PatternRule::validate`](crate::pattern::PatternRule::validate)
/// rejects this configuration.
pub fn uniform_address<R: Rng>(
    source: NodeIndex,
    num_nodes: usize,
    allow_self: bool,
    rng: &mut R,
) -> NodeIndex {
    debug_assert!(source < num_nodes);

    if allow_self {
        rng.random_range(0..num_nodes)
    } else {
        assert!(
            num_nodes > 1,
            "Uniform traffic without self-destination needs at least two nodes"
        );
        // Draw from the other `num_nodes - 1` nodes and step over the source.
        let dest = rng.random_range(0..num_nodes - 1);
        if dest >= source { dest + 1 } else { dest }
    }
}

/// Independent uniform destination for every source.
///
/// # Panics
///
/// Panics under the same conditions as [`uniform_address`].
pub fn uniform<R: Rng>(num_nodes: usize, allow_self: bool, rng: &mut R) -> DestinationMap {
    (0..num_nodes)
        .map(|source| (source, uniform_address(source, num_nodes, allow_self, rng)))
        .collect()
}

/// Transpose destination for every source.
#[must_use]
pub fn transpose(num_nodes: usize) -> DestinationMap {
    mapping(num_nodes, |source| transpose_address(source, num_nodes))
}

/// Tornado destination for every source.
#[must_use]
pub fn tornado(num_nodes: usize) -> DestinationMap {
    mapping(num_nodes, |source| tornado_address(source, num_nodes))
}

/// Every source sends to `hotspot`.
///
/// If `include_hotspot` is false the hotspot node does not send at all and so
/// has no entry.
#[must_use]
pub fn hotspot(num_nodes: usize, hotspot: NodeIndex, include_hotspot: bool) -> DestinationMap {
    debug_assert!(hotspot < num_nodes);

    (0..num_nodes)
        .filter(|&source| include_hotspot || source != hotspot)
        .map(|source| (source, hotspot))
        .collect()
}

/// Bit complement destination for every source.
#[must_use]
pub fn bit_complement(num_nodes: usize) -> DestinationMap {
    mapping(num_nodes, |source| bit_complement_address(source, num_nodes))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    use super::*;

    const SIZES: [usize; 4] = [4, 8, 16, 64];

    fn assert_bijection(map: &DestinationMap, num_nodes: usize) {
        assert_eq!(map.len(), num_nodes);
        let mut dests: Vec<NodeIndex> = map.values().copied().collect();
        dests.sort_unstable();
        assert_eq!(dests, (0..num_nodes).collect::<Vec<_>>());
    }

    #[test]
    fn bits() {
        assert_eq!(address_bits(1), Some(0));
        assert_eq!(address_bits(64), Some(6));
        assert_eq!(address_bits(0), None);
        assert_eq!(address_bits(12), None);
    }

    #[test]
    fn tornado_offsets() {
        assert_eq!(tornado_address(0, 8), 3);
        assert_eq!(tornado_address(5, 8), 0);
        assert_eq!(tornado_address(7, 8), 2);
    }

    #[test]
    fn tornado_any_size() {
        assert_eq!(tornado_address(0, 1), 0);
        // N = 12: offset 5
        assert_eq!(tornado_address(0, 12), 5);
        assert_eq!(tornado_address(10, 12), 3);
        assert_bijection(&tornado(12), 12);
        assert_bijection(&tornado(7), 7);
    }

    #[test]
    fn transpose_swaps_halves() {
        // 16 nodes: a 4x4 grid with 2-bit row and column
        assert_eq!(transpose_address(0b0001, 16), 0b0100);
        assert_eq!(transpose_address(0b1110, 16), 0b1011);
        assert_eq!(transpose_address(0b0101, 16), 0b0101);
        // 8 nodes: rotate 3 bits left by one
        assert_eq!(transpose_address(0b001, 8), 0b010);
        assert_eq!(transpose_address(0b100, 8), 0b001);
        // Degenerate sizes
        assert_eq!(transpose_address(0, 1), 0);
        assert_eq!(transpose_address(1, 2), 1);
    }

    #[test]
    fn bijections() {
        for num_nodes in SIZES {
            assert_bijection(&transpose(num_nodes), num_nodes);
            assert_bijection(&tornado(num_nodes), num_nodes);
            assert_bijection(&bit_complement(num_nodes), num_nodes);
        }
    }

    #[test]
    fn bit_complement_is_involution() {
        for num_nodes in SIZES {
            for source in 0..num_nodes {
                let dest = bit_complement_address(source, num_nodes);
                assert_ne!(dest, source);
                assert_eq!(bit_complement_address(dest, num_nodes), source);
            }
        }
    }

    #[test]
    fn transpose_of_complement() {
        for num_nodes in [2usize, 4, 8, 16, 32, 64, 128] {
            let bits = num_nodes.trailing_zeros();
            let fixed_points = (0..num_nodes)
                .filter(|&s| transpose_address(bit_complement_address(s, num_nodes), num_nodes) == s)
                .count();

            // Only addresses whose low half is the complement of the high
            // half come back to themselves, which needs an even bit count.
            let expected = if bits % 2 == 0 { 1 << (bits / 2) } else { 0 };
            assert_eq!(fixed_points, expected, "{num_nodes} nodes");
        }
    }

    #[test]
    fn hotspot_targets() {
        let map = hotspot(8, 3, true);
        assert_eq!(map.len(), 8);
        assert!(map.values().all(|&dest| dest == 3));

        let map = hotspot(8, 3, false);
        assert_eq!(map.len(), 7);
        assert!(!map.contains_key(&3));
        assert!(map.values().all(|&dest| dest == 3));

        // Hotspot rule does not need a power of two
        assert_eq!(hotspot(6, 5, true).len(), 6);
    }

    #[test]
    fn uniform_excludes_self() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x5eed);
        for trial in 0..10_000 {
            let num_nodes = 2 + trial % 15;
            let source = trial % num_nodes;
            let dest = uniform_address(source, num_nodes, false, &mut rng);
            assert_ne!(dest, source);
            assert!(dest < num_nodes);
        }
    }

    #[test]
    fn uniform_with_self_reaches_self() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let num_nodes = 4;
        let mut seen = [false; 4];
        for _ in 0..10_000 {
            seen[uniform_address(2, num_nodes, true, &mut rng)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    #[should_panic(expected = "needs at least two nodes")]
    fn uniform_excluding_self_on_one_node() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let _ = uniform(1, false, &mut rng);
    }

    #[test]
    fn uniform_on_one_node_with_self() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let map = uniform(1, true, &mut rng);
        assert_eq!(map[&0], 0);
    }

    #[test]
    fn uniform_excluding_self_covers_others() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let mut counts = [0usize; 5];
        for _ in 0..10_000 {
            counts[uniform_address(4, 5, false, &mut rng)] += 1;
        }
        assert_eq!(counts[4], 0);
        assert!(counts[..4].iter().all(|&c| c > 2000));
    }
}
