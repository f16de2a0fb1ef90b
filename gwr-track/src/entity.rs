// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Named entities that own log/trace output.
//!
//! Every traffic pool and driver owns an [`Entity`]. Entities form a tree
//! below a single [`toplevel`] and are named by joining the names along the
//! path from the root, for example `top::fabric::pool`. Level filters given
//! to the [`Tracker`] match against that full name.

use std::fmt;
use std::rc::Rc;

use crate::{Id, NO_ID, Tracker, create, destroy};

static JOIN: &str = "::";

/// A node in the entity tree.
///
/// Creation and destruction are reported to the tracker at `Trace` level,
/// attributed to the parent.
pub struct Entity {
    /// Name of this entity within its parent.
    pub name: String,

    /// Parent entity (only the top-level has none).
    pub parent: Option<Rc<Entity>>,

    /// Unique identifier emitted with every log/trace message.
    pub id: Id,

    /// [`Tracker`] used to handle trace/log events.
    pub tracker: Tracker,

    full_name: String,
}

impl Entity {
    /// Create a new entity below `parent`.
    ///
    /// The entity shares the parent's tracker.
    #[must_use]
    pub fn new(parent: &Rc<Entity>, name: &str) -> Self {
        let full_name = format!("{}{}{}", parent.full_name, JOIN, name);
        Self::register(
            Some(parent.clone()),
            parent.tracker.clone(),
            name,
            full_name,
        )
    }

    fn register(
        parent: Option<Rc<Entity>>,
        tracker: Tracker,
        name: &str,
        full_name: String,
    ) -> Self {
        let id = tracker.unique_id();
        tracker.add_entity(id, &full_name);

        let entity = Self {
            name: String::from(name),
            parent,
            id,
            tracker,
            full_name,
        };
        create!(entity);
        entity
    }

    /// Returns the full hierarchical name of this entity.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// ID of the parent, or [`NO_ID`] for the top-level.
    #[must_use]
    pub fn parent_id(&self) -> Id {
        self.parent.as_ref().map_or(NO_ID, |parent| parent.id)
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        destroy!(self);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("full_name", &self.full_name)
            .field("id", &self.id)
            .field("parent_id", &self.parent_id())
            .finish()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// Create the top-level entity. This should be the only entity without a
/// parent.
pub fn toplevel(tracker: &Tracker, name: &str) -> Rc<Entity> {
    Rc::new(Entity::register(
        None,
        tracker.clone(),
        name,
        String::from(name),
    ))
}
