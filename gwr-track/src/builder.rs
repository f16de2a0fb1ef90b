// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Library functions to build trackers as defined by the user.

use std::fs;
use std::io::{self, BufWriter};
use std::rc::Rc;

use crate::tracker::{DevNullTracker, EntityManager, TextTracker, TrackConfigError};
use crate::{Tracker, Writer};

/// Name used for `file` in order to write to stdout.
pub const STDOUT_FILE: &str = "-";

/// Configuration options for the text tracker.
pub struct TrackerConfig<'a> {
    /// Enable this tracker.
    pub enable: bool,

    /// Set the level at which this tracker should be enabled.
    pub level: log::Level,

    /// A regular expression to match which entities should have this level
    /// applied. All other entities will only emit errors.
    pub filter_regex: &'a str,

    /// If required, the name of the file to which the tracker will write.
    /// `None` or [`STDOUT_FILE`] write to stdout.
    pub file: Option<&'a str>,
}

impl Default for TrackerConfig<'_> {
    fn default() -> Self {
        Self {
            enable: true,
            level: log::Level::Warn,
            filter_regex: "",
            file: None,
        }
    }
}

fn build_entity_manager(config: &TrackerConfig) -> Result<EntityManager, TrackConfigError> {
    let default_level = if config.filter_regex.is_empty() {
        config.level
    } else {
        log::Level::Error
    };

    let mut entity_manager = EntityManager::new(default_level);
    if !config.filter_regex.is_empty() {
        entity_manager.add_entity_level_filter(config.filter_regex, config.level)?;
    }
    Ok(entity_manager)
}

fn build_writer(file: Option<&str>) -> Result<Writer, TrackConfigError> {
    match file {
        None | Some(STDOUT_FILE) => Ok(Box::new(BufWriter::new(io::stdout()))),
        Some(file) => {
            let file = fs::File::create(file)
                .map_err(|e| TrackConfigError(format!("Failed to create {file}: {e}")))?;
            Ok(Box::new(BufWriter::new(file)))
        }
    }
}

/// Set up the tracker according to the user configuration.
///
/// A disabled tracker still hands out unique IDs but drops all events.
pub fn setup_tracker(config: &TrackerConfig) -> Result<Tracker, TrackConfigError> {
    if !config.enable {
        return Ok(Rc::new(DevNullTracker::default()));
    }

    let entity_manager = build_entity_manager(config)?;
    let writer = build_writer(config.file)?;
    Ok(Rc::new(TextTracker::new(entity_manager, writer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::toplevel;

    #[test]
    fn disabled_tracker_drops_events() {
        let config = TrackerConfig {
            enable: false,
            ..Default::default()
        };
        let tracker = setup_tracker(&config).unwrap();
        let top = toplevel(&tracker, "top");
        assert!(!tracker.is_entity_enabled(top.id, log::Level::Error));
    }

    #[test]
    fn filter_lowers_other_entities_to_error() {
        let config = TrackerConfig {
            level: log::Level::Debug,
            filter_regex: ".*pool",
            ..Default::default()
        };
        let tracker = setup_tracker(&config).unwrap();
        let top = toplevel(&tracker, "top");
        let pool = crate::entity::Entity::new(&top, "pool");

        assert!(!tracker.is_entity_enabled(top.id, log::Level::Warn));
        assert!(tracker.is_entity_enabled(pool.id, log::Level::Debug));
    }

    #[test]
    fn bad_filter_is_an_error() {
        let config = TrackerConfig {
            filter_regex: "[",
            ..Default::default()
        };
        assert!(setup_tracker(&config).is_err());
    }
}
