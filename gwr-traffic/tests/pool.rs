// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use std::collections::HashSet;
use std::rc::Rc;

use gwr_track::Id;
use gwr_track::entity::{Entity, toplevel};
use gwr_track::test_helpers::create_tracker;
use gwr_traffic::config::TrafficConfig;
use gwr_traffic::pattern::{PatternRule, TrafficPattern};
use gwr_traffic::pool::SyntheticPool;
use gwr_traffic::traits::TrafficPool;
use gwr_traffic::types::{NodeIndex, TaskId, TrafficError};

fn start_test(full_filepath: &str) -> Rc<Entity> {
    let tracker = create_tracker(full_filepath);
    toplevel(&tracker, "top")
}

fn build_pool(top: &Rc<Entity>, pattern: &str, num_nodes: usize, seed: u64) -> SyntheticPool {
    let config = TrafficConfig {
        num_nodes,
        pattern: pattern.to_string(),
        seed,
        ..Default::default()
    };
    SyntheticPool::new(top, "pool", &config).unwrap()
}

fn tasks(pool: &SyntheticPool) -> Vec<TaskId> {
    pool.pending().map(|send| send.task).collect()
}

fn destinations(pool: &SyntheticPool) -> Vec<NodeIndex> {
    (0..pool.num_nodes())
        .map(|source| pool.destination(source).unwrap())
        .collect()
}

#[test]
fn start_covers_every_source() {
    let top = start_test(file!());
    for pattern in ["uniform", "transpose", "tornado", "hotspot", "bitcomplement"] {
        let mut pool = build_pool(&top, pattern, 16, 1);
        assert_eq!(pool.num_pending(), 0);
        assert_eq!(pool.destination(0), None);

        pool.start();
        assert_eq!(pool.cycle(), 1);
        assert_eq!(pool.num_pending(), 16);
        for source in 0..16 {
            let send = pool.pending_for(source).unwrap();
            assert_eq!(send.source, source);
            assert_eq!(pool.destination(source), Some(send.dest));
            assert!(send.dest < 16);
        }
    }
}

#[test]
fn permutation_patterns_through_pool() {
    let top = start_test(file!());
    for pattern in ["transpose", "tornado", "bit-complement"] {
        for num_nodes in [4, 8, 16, 64] {
            let mut pool = build_pool(&top, pattern, num_nodes, 1);
            pool.start();
            let mut dests = destinations(&pool);
            dests.sort_unstable();
            assert_eq!(dests, (0..num_nodes).collect::<Vec<_>>(), "{pattern} {num_nodes}");
        }
    }
}

#[test]
fn restart_discards_previous_cycle() {
    let top = start_test(file!());
    let mut pool = build_pool(&top, "uniform", 8, 3);

    pool.start();
    let first_tasks = tasks(&pool);
    assert_eq!(first_tasks.len(), 8);

    pool.start();
    assert_eq!(pool.cycle(), 2);
    assert_eq!(pool.num_pending(), 8);

    let second_tasks: HashSet<TaskId> = tasks(&pool).into_iter().collect();
    for task in &first_tasks {
        assert!(!second_tasks.contains(task));
    }

    // Completions for the first cycle arriving late must not touch the second
    for task in first_tasks {
        assert_eq!(pool.try_clear(task), Err(TrafficError::LookupMiss(task)));
    }
    assert_eq!(pool.num_pending(), 8);
    assert_eq!(pool.num_lookup_misses(), 8);
}

#[test]
fn clear_unknown_task_is_a_noop() {
    let top = start_test(file!());
    let mut pool = build_pool(&top, "tornado", 8, 1);

    // Nothing pending yet
    pool.clear(Id(12345));
    assert_eq!(pool.num_lookup_misses(), 1);

    pool.start();
    let before = destinations(&pool);
    pool.clear(Id(u64::MAX));
    assert_eq!(destinations(&pool), before);
    assert_eq!(pool.num_pending(), 8);
    assert_eq!(pool.num_cleared(), 0);
}

#[test]
fn clear_removes_only_its_source() {
    let top = start_test(file!());
    let mut pool = build_pool(&top, "tornado", 8, 1);
    pool.start();

    let task = pool.pending_for(5).unwrap().task;
    pool.clear(task);

    assert_eq!(pool.destination(5), None);
    assert_eq!(pool.num_pending(), 7);
    assert_eq!(pool.destination(0), Some(3));
    assert_eq!(pool.destination(4), Some(7));

    // Clearing twice is harmless
    pool.clear(task);
    assert_eq!(pool.num_pending(), 7);
    assert_eq!(pool.num_cleared(), 1);
    assert_eq!(pool.num_lookup_misses(), 1);
}

#[test]
fn clear_in_any_order() {
    let top = start_test(file!());
    let mut pool = build_pool(&top, "bit-complement", 16, 1);
    pool.start();

    let mut all_tasks = tasks(&pool);
    all_tasks.reverse();
    all_tasks.swap(3, 11);
    for task in all_tasks {
        let send = pool.try_clear(task).unwrap();
        assert_eq!(send.dest, !send.source & 15);
    }
    assert_eq!(pool.num_pending(), 0);
    assert_eq!(pool.num_cleared(), 16);
}

#[test]
fn uniform_is_reproducible() {
    let top = start_test(file!());
    let mut pool_a = build_pool(&top, "uniform", 64, 0xabc);
    let mut pool_b = build_pool(&top, "uniform", 64, 0xabc);
    let mut pool_c = build_pool(&top, "uniform", 64, 0xdef);

    let mut all_same = true;
    for _ in 0..5 {
        pool_a.start();
        pool_b.start();
        pool_c.start();
        assert_eq!(destinations(&pool_a), destinations(&pool_b));
        all_same &= destinations(&pool_a) == destinations(&pool_c);
    }
    assert!(!all_same);

    // Reseeding restarts the sequence
    let mut fresh = build_pool(&top, "uniform", 64, 0xabc);
    fresh.start();
    let first = destinations(&fresh);
    fresh.start();
    fresh.reseed(0xabc);
    fresh.start();
    assert_eq!(destinations(&fresh), first);
}

#[test]
fn uniform_self_destination_setting() {
    let top = start_test(file!());

    let rule = PatternRule::new(TrafficPattern::Uniform, 0, true, false);
    let mut pool = SyntheticPool::new_with_rule(&top, "no_self", rule, 4, 9).unwrap();
    for _ in 0..2500 {
        pool.start();
        for source in 0..4 {
            assert_ne!(pool.destination(source), Some(source));
        }
    }

    let rule = PatternRule::new(TrafficPattern::Uniform, 0, true, true);
    let mut pool = SyntheticPool::new_with_rule(&top, "with_self", rule, 4, 9).unwrap();
    let mut self_sends = 0;
    for _ in 0..2500 {
        pool.start();
        self_sends += (0..4)
            .filter(|&source| pool.destination(source) == Some(source))
            .count();
    }
    assert!(self_sends > 0);
}

#[test]
fn hotspot_pool() {
    let top = start_test(file!());

    let config = TrafficConfig {
        num_nodes: 12,
        pattern: "hotspot".to_string(),
        hotspot: 7,
        ..Default::default()
    };
    let mut pool = SyntheticPool::new(&top, "hot", &config).unwrap();
    pool.start();
    assert_eq!(pool.num_pending(), 12);
    assert!(pool.pending().all(|send| send.dest == 7));

    let config = TrafficConfig {
        hotspot_sends_to_self: false,
        ..config
    };
    let mut pool = SyntheticPool::new(&top, "hot_excl", &config).unwrap();
    pool.start();
    assert_eq!(pool.num_pending(), 11);
    assert_eq!(pool.destination(7), None);
}

#[test]
fn invalid_configuration_is_rejected() {
    let top = start_test(file!());

    let cases = [
        ("transpose", 12, 0),
        ("bit-complement", 6, 0),
        ("tornado", 0, 0),
        ("hotspot", 8, 8),
        ("uniform", 1, 0),
        ("shuffle", 8, 0),
    ];
    for (pattern, num_nodes, hotspot) in cases {
        let config = TrafficConfig {
            num_nodes,
            pattern: pattern.to_string(),
            hotspot,
            ..Default::default()
        };
        let result = SyntheticPool::new(&top, "pool", &config);
        assert!(
            matches!(result, Err(TrafficError::Configuration(_))),
            "{pattern} with {num_nodes} nodes should be rejected"
        );
    }

    // Tornado is defined on any ring size
    let mut pool = build_pool(&top, "tornado", 12, 1);
    pool.start();
    assert_eq!(pool.destination(0), Some(5));
}

#[test]
fn driven_through_trait_object() {
    let top = start_test(file!());
    let mut pools: Vec<Box<dyn TrafficPool>> = vec![
        Box::new(build_pool(&top, "transpose", 16, 1)),
        Box::new(build_pool(&top, "tornado", 16, 1)),
    ];

    for pool in &mut pools {
        pool.start();
    }
    assert_eq!(pools[0].destination(1), Some(4));
    assert_eq!(pools[1].destination(1), Some(8));
}
