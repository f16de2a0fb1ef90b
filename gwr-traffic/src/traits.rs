// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Traits used by the scheduler to drive traffic pools.

use crate::types::{NodeIndex, TaskId};

/// A pool of pending sends that the scheduler draws packets from.
///
/// The scheduler calls [`start`](TrafficPool::start) at the beginning of each
/// injection epoch, reads destinations as sources get the opportunity to
/// inject, and reports completed sends with [`clear`](TrafficPool::clear).
pub trait TrafficPool {
    /// Begin a new generation cycle, replacing any sends still pending from
    /// the previous one.
    fn start(&mut self);

    /// Remove the pending send for a completed task. Unknown tasks are
    /// ignored.
    fn clear(&mut self, task: TaskId);

    /// The destination `source` should send to in the current cycle, if it
    /// still has a pending send.
    fn destination(&self, source: NodeIndex) -> Option<NodeIndex>;
}
