// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A pool of synthetic sends.
//!
//! Each call to [`start`](TrafficPool::start) computes the destination of
//! every source under the configured [`PatternRule`] and creates one
//! [`PendingSend`] per source. The scheduler then injects packets and reports
//! completions with [`clear`](TrafficPool::clear).
//!
//! Task IDs are allocated by the entity's tracker so they are never reused.
//! A completion for a task from an earlier cycle therefore never removes a
//! send from the current cycle; it is simply ignored.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use gwr_track::entity::Entity;
use gwr_track::{create_and_track_id, debug, destroy_id, info, trace};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::TrafficConfig;
use crate::pattern::PatternRule;
use crate::traits::TrafficPool;
use crate::types::{NodeIndex, PendingSend, TaskId, TrafficError, TrafficResult};

pub struct SyntheticPool {
    pub entity: Rc<Entity>,
    rule: PatternRule,
    num_nodes: usize,
    rng: Xoshiro256PlusPlus,
    cycle: u64,

    /// Pending sends of the current cycle, at most one per source.
    pending: BTreeMap<NodeIndex, PendingSend>,
    task_to_source: HashMap<TaskId, NodeIndex>,

    num_cleared: usize,
    num_lookup_misses: usize,
}

impl SyntheticPool {
    /// Create a pool from a user configuration.
    ///
    /// Fails if the pattern name is unknown or cannot be generated for the
    /// configured number of nodes.
    pub fn new(parent: &Rc<Entity>, name: &str, config: &TrafficConfig) -> TrafficResult<Self> {
        let rule = config.rule()?;
        Self::new_with_rule(parent, name, rule, config.num_nodes, config.seed)
    }

    pub fn new_with_rule(
        parent: &Rc<Entity>,
        name: &str,
        rule: PatternRule,
        num_nodes: usize,
        seed: u64,
    ) -> TrafficResult<Self> {
        rule.validate(num_nodes)?;

        let entity = Rc::new(Entity::new(parent, name));
        if rule.is_deterministic() {
            info!(entity ; "{} nodes, pattern {}", num_nodes, rule);
        } else {
            info!(entity ; "{} nodes, pattern {}, seed {}", num_nodes, rule, seed);
        }

        Ok(Self {
            entity,
            rule,
            num_nodes,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            cycle: 0,
            pending: BTreeMap::new(),
            task_to_source: HashMap::with_capacity(num_nodes),
            num_cleared: 0,
            num_lookup_misses: 0,
        })
    }

    /// Restart the random sequence used by the uniform pattern.
    pub fn reseed(&mut self, seed: u64) {
        debug!(self.entity ; "reseed {}", seed);
        self.rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    }

    /// Remove the pending send for `task`, reporting whether it was found.
    pub fn try_clear(&mut self, task: TaskId) -> TrafficResult<PendingSend> {
        let send = self
            .task_to_source
            .remove(&task)
            .and_then(|source| self.pending.remove(&source));

        match send {
            Some(send) => {
                destroy_id!(self.entity ; task);
                self.num_cleared += 1;
                Ok(send)
            }
            None => {
                self.num_lookup_misses += 1;
                Err(TrafficError::LookupMiss(task))
            }
        }
    }

    fn discard_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        debug!(self.entity ;
            "cycle {}: discard {} unconsumed sends", self.cycle, self.pending.len());
        for send in self.pending.values() {
            destroy_id!(self.entity ; send.task);
        }
        self.pending.clear();
        self.task_to_source.clear();
    }

    #[must_use]
    pub fn pending_for(&self, source: NodeIndex) -> Option<&PendingSend> {
        self.pending.get(&source)
    }

    /// Iterate over the pending sends in source order.
    pub fn pending(&self) -> impl Iterator<Item = &PendingSend> {
        self.pending.values()
    }

    #[must_use]
    pub fn num_pending(&self) -> usize {
        self.pending.len()
    }

    /// The number of cycles started so far.
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[must_use]
    pub fn rule(&self) -> PatternRule {
        self.rule
    }

    /// Total sends cleared over all cycles.
    #[must_use]
    pub fn num_cleared(&self) -> usize {
        self.num_cleared
    }

    /// Total clears for tasks that were not pending.
    #[must_use]
    pub fn num_lookup_misses(&self) -> usize {
        self.num_lookup_misses
    }
}

impl TrafficPool for SyntheticPool {
    fn start(&mut self) {
        self.discard_pending();
        self.cycle += 1;

        let destinations = self.rule.generate(self.num_nodes, &mut self.rng);
        for (source, dest) in destinations {
            let task = create_and_track_id!(self.entity ; &format!("{source}->{dest}"));
            self.pending.insert(source, PendingSend { task, source, dest });
            self.task_to_source.insert(task, source);
        }

        debug!(self.entity ; "cycle {}: {} pending sends", self.cycle, self.pending.len());
        for send in self.pending.values() {
            trace!(self.entity ; "{}", send);
        }
    }

    fn clear(&mut self, task: TaskId) {
        match self.try_clear(task) {
            Ok(send) => {
                trace!(self.entity ; "cleared {}", send);
            }
            Err(e) => {
                debug!(self.entity ; "{}, ignored", e);
            }
        }
    }

    fn destination(&self, source: NodeIndex) -> Option<NodeIndex> {
        self.pending.get(&source).map(|send| send.dest)
    }
}
