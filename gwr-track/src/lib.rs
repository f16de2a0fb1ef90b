// Copyright (c) 2020 Graphcore Ltd. All rights reserved.

//! This crate provides combined _track_ capabilities for the GWR traffic
//! generators.
//!
//! _Track_ means the combination of _log_ and _trace_ where:
//!
//!   - _log_ are text-based human-readable messages emitted at various levels
//!     of verbosity (from `Trace` through to `Error`).
//!   - _trace_ records the creation and destruction of simulation
//!     [`Entities`](crate::entity::Entity) and of the objects they hand out
//!     (for example the pending sends of a traffic pool).
//!
//! Every event is emitted on behalf of an [`Entity`](crate::entity::Entity)
//! so that output can be filtered per entity using regular expressions on
//! the entity's hierarchical name.

// Enable warnings for missing documentation
#![warn(missing_docs)]

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

pub use log;

pub mod builder;
pub mod entity;
pub mod id;
pub mod test_helpers;

/// Include the trackers.
pub mod tracker;
pub use tracker::{Track, Tracker};

/// A type alias for objects that receive _log_ / _trace_ events.
pub type Writer = Box<dyn std::io::Write>;
type SharedWriter = Rc<RefCell<Writer>>;

/// Take a level string (as given on the command-line or in a configuration
/// file) and convert it to a [`log::Level`].
pub fn str_to_level(lvl: &str) -> Result<log::Level, tracker::TrackConfigError> {
    log::Level::from_str(lvl)
        .map_err(|_| tracker::TrackConfigError(format!("Unable to parse level string '{lvl}'")))
}

/// Type used for unique IDs
///
/// Each _log_/_trace_ event within the application is given a unique ID to
/// identify it. There are two reserved ID values: [NO_ID](constant.NO_ID.html)
/// and [ROOT](constant.ROOT.html)
pub use id::Id;

/// ID value which indicates where there is no valid ID
pub const NO_ID: Id = id::Id(0);

/// The root ID from which all other IDs are derived
pub const ROOT: Id = id::Id(1);

/// Create a unique ID for an object handed out by an entity and track its
/// creation.
///
/// The creation event will be tracked if the entity has trace enabled.
#[macro_export]
macro_rules! create_and_track_id {
    ($entity:expr ; $name:expr) => {{
        let id = $entity.tracker.unique_id();
        if $entity
            .tracker
            .is_entity_enabled($entity.id, $crate::log::Level::Trace)
        {
            $entity.tracker.create($entity.id, id, $name);
        }
        id
    }};
}

/// Destroy an ID
///
/// Destroying an ID indicates to the tracking system that this ID is finished
/// with and should therefore not be used any more. This is not enforced at
/// runtime.
#[macro_export]
macro_rules! destroy_id {
    ($entity:expr ; $id:expr) => {{
        if $entity
            .tracker
            .is_entity_enabled($entity.id, $crate::log::Level::Trace)
        {
            $entity.tracker.destroy($entity.id, $id);
        }
    }};
}

/// Add an entity creation event
#[macro_export]
macro_rules! create {
    ($entity:expr) => {{
        if $entity
            .tracker
            .is_entity_enabled($entity.id, $crate::log::Level::Trace)
        {
            $entity
                .tracker
                .create($entity.parent_id(), $entity.id, $entity.full_name());
        }
    }};
}

/// Add an entity destroy event
#[macro_export]
macro_rules! destroy {
    ($entity:expr) => {{
        if $entity
            .tracker
            .is_entity_enabled($entity.id, $crate::log::Level::Trace)
        {
            $entity.tracker.destroy($entity.parent_id(), $entity.id);
        }
    }};
}

/// Base macro for log messages of all level.
///
/// The message is only formatted if the entity is enabled at the given level.
#[macro_export]
macro_rules! log_base {
    ($entity:expr ; $lvl:expr, $($arg:tt)+) => (
        if $entity.tracker.is_entity_enabled($entity.id, $lvl) {
            $entity.tracker.log($entity.id, $lvl, format_args!($($arg)+));
        }
    );
}

/// The `trace` macro provides a wrapper for [`log_base`] at level
/// `log::Level::Trace`
#[macro_export]
macro_rules! trace {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Trace, $($arg)+);
    );
}

/// The `debug` macro provides a wrapper for [`log_base`] at level
/// `log::Level::Debug`
#[macro_export]
macro_rules! debug {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Debug, $($arg)+);
    );
}

/// The `info` macro provides a wrapper for [`log_base`] at level
/// `log::Level::Info`
#[macro_export]
macro_rules! info {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Info, $($arg)+);
    );
}

/// The `warn` macro provides a wrapper for [`log_base`] at level
/// `log::Level::Warn`
#[macro_export]
macro_rules! warn {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Warn, $($arg)+);
    );
}

/// the `error` macro provides a wrapper for [`log_base`] at level
/// `log::Level::Error`
#[macro_export]
macro_rules! error {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Error, $($arg)+);
    );
}
