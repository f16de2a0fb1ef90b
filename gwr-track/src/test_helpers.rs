// Copyright (c) 2020 Graphcore Ltd. All rights reserved.

//! This module provides helper functions for testing tracking output
//!
//! The [`TestTracker`] keeps every event in memory as a formatted string so
//! that tests can check exactly what an entity emitted.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use std::rc::Rc;

use regex::Regex;

use crate::tracker::{EntityManager, TextTracker};
use crate::{Id, Track, Tracker};

/// A tracker that keeps track events.
pub struct TestTracker {
    events: RefCell<Vec<String>>,

    unique_id: Cell<u64>,
}

impl TestTracker {
    /// Create a new [`Tracker`](crate::Tracker) for the tests.
    ///
    /// This keeps the track events in memory for checking later.
    #[must_use]
    pub fn new(initial_id: u64) -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            unique_id: Cell::new(initial_id),
        }
    }

    fn add_event(&self, event: String) {
        println!("{event}");
        self.events.borrow_mut().push(event);
    }

    /// Return a copy of the events seen so far.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl Track for TestTracker {
    fn unique_id(&self) -> Id {
        let id = self.unique_id.get();
        self.unique_id.set(id + 1);
        Id(id)
    }

    fn is_entity_enabled(&self, _id: Id, _level: log::Level) -> bool {
        true
    }

    fn add_entity(&self, _id: Id, _entity_name: &str) {
        // Do nothing
    }

    fn create(&self, created_by: Id, id: Id, name: &str) {
        self.add_event(format!("{created_by}: created {id}, {name}"));
    }

    fn destroy(&self, destroyed_by: Id, id: Id) {
        self.add_event(format!("{destroyed_by}: destroyed {id}"));
    }

    fn log(&self, id: Id, level: log::Level, msg: std::fmt::Arguments) {
        self.add_event(format!("{id}:{level}: {msg}"));
    }

    fn shutdown(&self) {
        // Do nothing
    }
}

/// Create a [`TestTracker`] and the [`Tracker`](crate::Tracker) handle to it.
///
/// # Arguments
///
/// * `start_id` - The ID value to be set as the starting value
///
/// # Examples
///
/// ```
/// use gwr_track::test_helpers;
///
/// let (test_tracker, tracker) = gwr_track::test_init!(10);
/// let top = gwr_track::entity::toplevel(&tracker, "top");
/// test_helpers::check_and_clear(&test_tracker, &["0: created 10, top"]);
/// ```
#[macro_export]
macro_rules! test_init {
    ($start_id:expr) => {{
        let test_tracker = std::rc::Rc::new($crate::test_helpers::TestTracker::new($start_id));
        let tracker: $crate::Tracker = test_tracker.clone();
        (test_tracker, tracker)
    }};
}

/// Check and clear the _trace_ and _log_ output
///
/// This function asserts that the output lines seen since the start or the
/// last time this function was called match the `expected` regular
/// expressions, one per line. It then clears the recorded output.
pub fn check_and_clear(tracker: &TestTracker, expected: &[&str]) {
    let mut events = tracker.events.borrow_mut();

    println!("Checking {:?} matches {:?}", expected, *events);

    assert_eq!(expected.len(), events.len());

    for (i, (log_expect, actual)) in expected.iter().zip(events.iter()).enumerate() {
        let re = Regex::new(log_expect).unwrap();
        println!("Checking {i}: {log_expect:?} matches {actual:?}");
        assert!(re.is_match(actual), "{actual:?} does not match {log_expect:?}");
    }

    events.clear();
}

/// Create a tracker for a test which writes all events to a log file named
/// after the test source file in the system temporary directory.
///
/// Use as `create_tracker(file!())`.
#[must_use]
pub fn create_tracker(full_filepath: &str) -> Tracker {
    let stem = Path::new(full_filepath)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("test");
    let log_path = std::env::temp_dir().join(format!("gwr-{stem}.log"));
    let file = fs::File::create(&log_path)
        .unwrap_or_else(|e| panic!("Unable to create {}: {e}", log_path.display()));

    let entity_manager = EntityManager::new(log::Level::Trace);
    Rc::new(TextTracker::new(
        entity_manager,
        Box::new(BufWriter::new(file)),
    ))
}
