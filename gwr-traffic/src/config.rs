// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Configuration of a synthetic traffic pool.
//!
//! Values are layered with [Figment](https://docs.rs/figment) in increasing
//! order of precedence:
//!  - the [`Default`] values,
//!  - an optional TOML configuration file,
//!  - environment variables prefixed with [`ENV_PREFIX`] (for example
//!    `GWR_TRAFFIC_NUM_NODES=64`).
//!
//! Applications can merge further providers (such as command-line overrides)
//! onto [`TrafficConfig::figment`] before extracting.
//!
//! An example configuration file:
//! ```toml
//! num_nodes = 64
//! pattern = "hotspot"
//! hotspot = 5
//! hotspot_sends_to_self = false
//! seed = 42
//! ```

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::config_error;
use crate::pattern::{PatternRule, TrafficPattern};
use crate::types::{NodeIndex, TrafficResult};

/// Prefix of the environment variables read by [`TrafficConfig::load`].
pub const ENV_PREFIX: &str = "GWR_TRAFFIC_";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TrafficConfig {
    /// Number of nodes in the network.
    pub num_nodes: usize,

    /// Name of the traffic pattern (see [`TrafficPattern`]).
    ///
    /// Kept as a string so that an unknown name is reported as a
    /// configuration error naming the pattern.
    pub pattern: String,

    /// Node that receives all traffic for the hotspot pattern.
    pub hotspot: NodeIndex,

    /// Whether the hotspot node also sends (to itself) for the hotspot
    /// pattern.
    pub hotspot_sends_to_self: bool,

    /// Whether uniform traffic may pick the source as destination.
    pub allow_self: bool,

    /// Seed for the random number generator.
    pub seed: u64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            num_nodes: 16,
            pattern: TrafficPattern::default().to_string(),
            hotspot: 0,
            hotspot_sends_to_self: true,
            allow_self: false,
            seed: 1,
        }
    }
}

impl TrafficConfig {
    /// Build the layered configuration without extracting it.
    ///
    /// Fails if `conf_file` is given but does not exist.
    pub fn figment(conf_file: Option<&Path>) -> TrafficResult<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(TrafficConfig::default()));
        if let Some(conf_file) = conf_file {
            if !conf_file.is_file() {
                return config_error!(format!(
                    "Configuration file {} not found",
                    conf_file.display()
                ));
            }
            figment = figment.merge(Toml::file(conf_file));
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn from_figment(figment: &Figment) -> TrafficResult<Self> {
        Ok(figment.extract()?)
    }

    /// Load the configuration from defaults, `conf_file` and the environment.
    pub fn load(conf_file: Option<&Path>) -> TrafficResult<Self> {
        Self::from_figment(&Self::figment(conf_file)?)
    }

    pub fn traffic_pattern(&self) -> TrafficResult<TrafficPattern> {
        self.pattern.parse()
    }

    /// The validated generation rule described by this configuration.
    pub fn rule(&self) -> TrafficResult<PatternRule> {
        let rule = PatternRule::new(
            self.traffic_pattern()?,
            self.hotspot,
            self.hotspot_sends_to_self,
            self.allow_self,
        );
        rule.validate(self.num_nodes)?;
        Ok(rule)
    }
}
