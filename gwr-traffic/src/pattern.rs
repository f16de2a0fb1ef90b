// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Select and dispatch the generation rule for a traffic pattern.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::address;
use crate::config_error;
use crate::types::{DestinationMap, NodeIndex, TrafficError, TrafficResult};

/// The synthetic traffic patterns that can be generated.
#[derive(
    clap::ValueEnum, Clone, Copy, Default, Debug, Deserialize, Serialize, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "kebab-case")]
pub enum TrafficPattern {
    /// Every source sends to a random destination
    #[default]
    Uniform,

    /// Every source sends to the node with row and column address swapped
    Transpose,

    /// Every source sends half-way around the address ring
    Tornado,

    /// Every source sends to one hotspot node
    Hotspot,

    /// Every source sends to the node with all address bits flipped
    #[value(alias = "bitcomplement")]
    #[serde(alias = "bitcomplement")]
    BitComplement,
}

impl TrafficPattern {
    /// Whether the pattern is only defined when the node count is a power of
    /// two.
    #[must_use]
    pub fn requires_power_of_two(&self) -> bool {
        matches!(self, TrafficPattern::Transpose | TrafficPattern::BitComplement)
    }
}

impl fmt::Display for TrafficPattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TrafficPattern::Uniform => write!(f, "uniform"),
            TrafficPattern::Transpose => write!(f, "transpose"),
            TrafficPattern::Tornado => write!(f, "tornado"),
            TrafficPattern::Hotspot => write!(f, "hotspot"),
            TrafficPattern::BitComplement => write!(f, "bit-complement"),
        }
    }
}

impl FromStr for TrafficPattern {
    type Err = TrafficError;

    fn from_str(name: &str) -> TrafficResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(TrafficPattern::Uniform),
            "transpose" => Ok(TrafficPattern::Transpose),
            "tornado" => Ok(TrafficPattern::Tornado),
            "hotspot" => Ok(TrafficPattern::Hotspot),
            "bit-complement" | "bitcomplement" => Ok(TrafficPattern::BitComplement),
            _ => config_error!(format!("Unknown traffic pattern '{name}'")),
        }
    }
}

/// A generation rule together with the parameters it needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternRule {
    Uniform {
        /// Whether a source may draw itself as destination.
        allow_self: bool,
    },
    Transpose,
    Tornado,
    Hotspot {
        /// The node every source sends to.
        node: NodeIndex,

        /// Whether the hotspot node also sends (to itself).
        include_self: bool,
    },
    BitComplement,
}

impl PatternRule {
    /// Build the rule for `pattern`. The hotspot and self-destination settings
    /// are ignored by the patterns that do not use them.
    #[must_use]
    pub fn new(
        pattern: TrafficPattern,
        hotspot: NodeIndex,
        hotspot_sends_to_self: bool,
        allow_self: bool,
    ) -> Self {
        match pattern {
            TrafficPattern::Uniform => PatternRule::Uniform { allow_self },
            TrafficPattern::Transpose => PatternRule::Transpose,
            TrafficPattern::Tornado => PatternRule::Tornado,
            TrafficPattern::Hotspot => PatternRule::Hotspot {
                node: hotspot,
                include_self: hotspot_sends_to_self,
            },
            TrafficPattern::BitComplement => PatternRule::BitComplement,
        }
    }

    #[must_use]
    pub fn pattern(&self) -> TrafficPattern {
        match self {
            PatternRule::Uniform { .. } => TrafficPattern::Uniform,
            PatternRule::Transpose => TrafficPattern::Transpose,
            PatternRule::Tornado => TrafficPattern::Tornado,
            PatternRule::Hotspot { .. } => TrafficPattern::Hotspot,
            PatternRule::BitComplement => TrafficPattern::BitComplement,
        }
    }

    /// Check that this rule can generate a valid mapping for `num_nodes`.
    ///
    /// Non-power-of-two node counts are rejected for the bit-based rules
    /// rather than falling back to some other arithmetic.
    pub fn validate(&self, num_nodes: usize) -> TrafficResult<()> {
        if num_nodes == 0 {
            return config_error!("Number of nodes must be greater than zero");
        }

        if self.pattern().requires_power_of_two() && address::address_bits(num_nodes).is_none() {
            return config_error!(format!(
                "Pattern {} requires a power-of-two number of nodes, got {num_nodes}",
                self.pattern()
            ));
        }

        match *self {
            PatternRule::Uniform { allow_self: false } if num_nodes < 2 => config_error!(
                "Uniform traffic without self-destination needs at least two nodes"
            ),
            PatternRule::Hotspot { node, .. } if node >= num_nodes => config_error!(format!(
                "Hotspot node {node} out of range for {num_nodes} nodes"
            )),
            _ => Ok(()),
        }
    }

    /// Generate the destination mapping for one cycle.
    ///
    /// Only the uniform rule draws from `rng`. The rule must have been
    /// validated for `num_nodes`.
    pub fn generate<R: Rng>(&self, num_nodes: usize, rng: &mut R) -> DestinationMap {
        match *self {
            PatternRule::Uniform { allow_self } => address::uniform(num_nodes, allow_self, rng),
            PatternRule::Transpose => address::transpose(num_nodes),
            PatternRule::Tornado => address::tornado(num_nodes),
            PatternRule::Hotspot { node, include_self } => {
                address::hotspot(num_nodes, node, include_self)
            }
            PatternRule::BitComplement => address::bit_complement(num_nodes),
        }
    }

    /// Whether every cycle produces the same mapping.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, PatternRule::Uniform { .. })
    }
}

impl fmt::Display for PatternRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PatternRule::Uniform { allow_self } => write!(f, "uniform (allow_self={allow_self})"),
            PatternRule::Hotspot { node, include_self } => {
                write!(f, "hotspot {node} (include_self={include_self})")
            }
            _ => write!(f, "{}", self.pattern()),
        }
    }
}

/// Map a pattern name to its destinations for every source.
///
/// Uniform traffic excludes self-destination and the hotspot node sends to
/// itself. Use [`PatternRule`] directly to choose otherwise.
pub fn select_destinations<R: Rng>(
    name: &str,
    hotspot: NodeIndex,
    num_nodes: usize,
    rng: &mut R,
) -> TrafficResult<DestinationMap> {
    let pattern = TrafficPattern::from_str(name)?;
    let rule = PatternRule::new(pattern, hotspot, true, false);
    rule.validate(num_nodes)?;
    Ok(rule.generate(num_nodes, rng))
}
