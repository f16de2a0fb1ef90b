// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Emulate the scheduler side of a traffic pool.

use std::rc::Rc;

use gwr_track::entity::Entity;
use gwr_track::{debug, info};
use gwr_traffic::pool::SyntheticPool;
use gwr_traffic::traits::TrafficPool;
use gwr_traffic::types::{NodeIndex, PendingSend, TaskId};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Totals gathered while driving a pool.
#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub num_cycles: usize,
    pub num_injected: usize,
    pub num_completed: usize,
    pub num_late: usize,

    /// Packets received by each node over all cycles.
    pub ingress: Vec<usize>,
}

impl Summary {
    /// The node that received the most packets and how many it received.
    #[must_use]
    pub fn busiest(&self) -> Option<(NodeIndex, usize)> {
        self.ingress
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|&(node, count)| (count, std::cmp::Reverse(node)))
    }

    #[must_use]
    pub fn mean_ingress(&self) -> f64 {
        if self.ingress.is_empty() {
            0.0
        } else {
            self.num_injected as f64 / self.ingress.len() as f64
        }
    }
}

pub struct Driver {
    pub entity: Rc<Entity>,
    rng: Xoshiro256PlusPlus,
    completion_percent: usize,
}

impl Driver {
    /// `completion_percent` of the sends injected in a cycle complete within
    /// that cycle (values above 100 are treated as 100).
    #[must_use]
    pub fn new(parent: &Rc<Entity>, name: &str, completion_percent: usize, seed: u64) -> Self {
        Self {
            entity: Rc::new(Entity::new(parent, name)),
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            completion_percent: completion_percent.min(100),
        }
    }

    pub fn run(&mut self, pool: &mut SyntheticPool, num_cycles: usize) -> Summary {
        let mut summary = Summary {
            ingress: vec![0; pool.num_nodes()],
            ..Default::default()
        };
        let mut late: Vec<TaskId> = Vec::new();

        for _ in 0..num_cycles {
            pool.start();
            summary.num_cycles += 1;

            // Completions from the previous cycle arrive after the restart
            for task in late.drain(..) {
                pool.clear(task);
            }

            let mut sends: Vec<PendingSend> = pool.pending().copied().collect();
            sends.shuffle(&mut self.rng);

            for send in sends {
                summary.num_injected += 1;
                summary.ingress[send.dest] += 1;

                if self.rng.random_range(0..100) < self.completion_percent {
                    pool.clear(send.task);
                    summary.num_completed += 1;
                } else {
                    late.push(send.task);
                    summary.num_late += 1;
                }
            }
            debug!(self.entity ;
                "cycle {}: {} still pending", pool.cycle(), pool.num_pending());
        }

        info!(self.entity ;
            "{} cycles, {} injected, {} completed, {} late",
            summary.num_cycles, summary.num_injected, summary.num_completed, summary.num_late);
        summary
    }
}
