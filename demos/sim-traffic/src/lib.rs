// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Drive a synthetic traffic pool through a number of injection epochs.
//!
//! Each epoch the pool is restarted, every pending send is injected in a
//! random order and a configurable share of them complete before the next
//! epoch. Sends that do not complete in time report their completion after
//! the pool has been restarted, which the pool ignores.
//!
//! # Examples
//!
//! Running a tornado pattern on 64 nodes:
//! ```text
//! cargo run --bin sim-traffic --release -- --stdout --num-nodes 64 --traffic-pattern tornado
//! ```
//!
//! Loading the settings from a file and overriding the seed:
//! ```text
//! cargo run --bin sim-traffic --release -- --stdout --conf-file traffic.toml --seed 3
//! ```

pub mod driver;
