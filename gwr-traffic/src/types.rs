// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use gwr_track::Id;

/// Index of a node in the simulated network, in the range `[0, num_nodes)`.
pub type NodeIndex = usize;

/// Mapping from each source node to the node it sends to during a cycle.
///
/// Kept ordered so that iteration (and therefore logging and injection
/// order) is reproducible.
pub type DestinationMap = BTreeMap<NodeIndex, NodeIndex>;

/// Identifies one pending send handed out by a pool.
///
/// Task IDs come from the [`Tracker`](gwr_track::Tracker) so they increase
/// monotonically and are never reused within a run.
pub type TaskId = Id;

#[macro_export]
/// Build a [TrafficError::Configuration] from a message that supports
/// `to_string`
macro_rules! config_error {
    ($msg:expr) => {
        Err($crate::types::TrafficError::Configuration($msg.to_string()))
    };
}

/// Errors raised by the traffic generators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrafficError {
    /// The configuration cannot produce a valid destination mapping. This is
    /// fatal and is reported when the pool is built.
    Configuration(String),

    /// A task was not found among the pending sends. Completion notifications
    /// can race with a new cycle so this is never fatal.
    LookupMiss(TaskId),
}

impl fmt::Display for TrafficError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TrafficError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            TrafficError::LookupMiss(task) => write!(f, "Task {task} not pending"),
        }
    }
}

impl Error for TrafficError {}

impl From<figment::Error> for TrafficError {
    fn from(e: figment::Error) -> Self {
        TrafficError::Configuration(e.to_string())
    }
}

/// The result type for most traffic functions
pub type TrafficResult<T> = Result<T, TrafficError>;

/// One send waiting to be injected by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingSend {
    /// Handle used by the scheduler to report completion.
    pub task: TaskId,

    /// Node that injects the packet.
    pub source: NodeIndex,

    /// Node the packet is addressed to.
    pub dest: NodeIndex,
}

impl fmt::Display for PendingSend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "task{} {}->{}", self.task, self.source, self.dest)
    }
}
