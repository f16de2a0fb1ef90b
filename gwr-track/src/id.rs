// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Id

/// IDs that should be unique across the simulation
///
/// IDs are handed out in increasing order by a [`Tracker`](crate::Tracker)
/// and are never reused within a run.
#[derive(Copy, Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Id(pub u64);

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Debug for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
