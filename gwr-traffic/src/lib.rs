// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Synthetic traffic generation for network simulations.
//!
//! Given a fixed number of nodes, a [traffic pattern](crate::pattern) decides
//! which destination each source node sends to. A
//! [`SyntheticPool`](crate::pool::SyntheticPool) turns the pattern into a set
//! of pending sends for each injection epoch, which the scheduler consumes
//! and clears as packets complete. When packets are injected is left to the
//! scheduler.
//!
//! The patterns are the standard synthetic benchmarks for network
//! evaluation:
//!  - **uniform**: random destination per source.
//!  - **transpose**: swap the row and column halves of the address.
//!  - **tornado**: send half-way around the address ring.
//!  - **hotspot**: every source sends to one node.
//!  - **bit-complement**: flip every address bit.
//!
//! # Example
//!
//! ```rust
//! use gwr_track::entity::toplevel;
//! use gwr_track::tracker::dev_null_tracker;
//! use gwr_traffic::config::TrafficConfig;
//! use gwr_traffic::pool::SyntheticPool;
//! use gwr_traffic::traits::TrafficPool;
//!
//! let tracker = dev_null_tracker();
//! let top = toplevel(&tracker, "top");
//! let config = TrafficConfig {
//!     num_nodes: 8,
//!     pattern: "tornado".to_string(),
//!     ..Default::default()
//! };
//!
//! let mut pool = SyntheticPool::new(&top, "pool", &config)?;
//! pool.start();
//! assert_eq!(pool.destination(0), Some(3));
//!
//! // The scheduler reports completion using the task handed out for source 0
//! let task = pool.pending_for(0).map(|send| send.task).unwrap();
//! pool.clear(task);
//! assert_eq!(pool.destination(0), None);
//! # Ok::<(), gwr_traffic::types::TrafficError>(())
//! ```

pub mod address;
pub mod config;
pub mod pattern;
pub mod pool;
pub mod traits;
pub mod types;
