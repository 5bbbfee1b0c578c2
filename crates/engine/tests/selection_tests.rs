// Ooga Workbench - Debug visualization for ooga-lang programs
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use std::collections::HashSet;

use itertools::Itertools;

use ooga_common::types::{Address, HeapSnapshot, Relation};
use ooga_engine::{activate, HeapGraph, Highlight};
use tracing::info;

/// Small deterministic generator so failures reproduce
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn random_snapshot(seed: u64, size: u64, fanout: u64) -> HeapSnapshot {
    let mut rng = Lcg(seed);
    HeapSnapshot::from_children((0..size).map(|address| {
        let count = rng.next(fanout + 1);
        let children: Vec<u64> = (0..count).map(|_| rng.next(size)).unique().collect();
        (address, children)
    }))
}

fn reachable(graph: &HeapGraph, from: Address, relation: Relation) -> HashSet<Address> {
    let mut seen = HashSet::from([from]);
    let mut pending = vec![from];
    while let Some(address) = pending.pop() {
        for next in graph.neighbours(address, relation) {
            if seen.insert(next) {
                pending.push(next);
            }
        }
    }
    seen
}

#[test]
fn test_edges_have_both_endpoints() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");

    for seed in 0..20 {
        let graph = HeapGraph::build(&random_snapshot(seed, 30, 4));
        assert!(graph.issues().is_empty(), "seed {seed}: {:?}", graph.issues());
        for edge in graph.edges() {
            assert!(graph.contains(edge.source) && graph.contains(edge.target));
        }
    }
}

#[test]
fn test_activation_terminates_and_visits_once_per_pass() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");

    for seed in 0..20 {
        let mut graph = HeapGraph::build(&random_snapshot(seed, 25, 5));
        for address in 0..25u64 {
            let address = Address(address);
            let descendants = reachable(&graph, address, Relation::Child);
            let ancestors = reachable(&graph, address, Relation::Parent);

            // Move focus elsewhere first so the click always activates
            let outcome = loop {
                let outcome = activate(&mut graph, address).expect("address is present");
                if outcome.focus.is_some() {
                    break outcome;
                }
            };

            assert_eq!(outcome.descendants_visited, descendants.len(), "seed {seed}");
            assert_eq!(outcome.ancestors_visited, ancestors.len(), "seed {seed}");
            assert!(outcome.descendants_visited <= graph.len());
        }
    }
}

#[test]
fn test_highlight_classes_match_reachability() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");

    for seed in 0..10 {
        let mut graph = HeapGraph::build(&random_snapshot(seed, 20, 3));
        let focus = Address(seed % 20);
        let descendants = reachable(&graph, focus, Relation::Child);
        let ancestors = reachable(&graph, focus, Relation::Parent);

        activate(&mut graph, focus).expect("address is present");

        for node in graph.nodes() {
            let address = node.address();
            let expected = if address == focus {
                Highlight::Current
            } else if ancestors.contains(&address) {
                Highlight::Ancestor
            } else if descendants.contains(&address) {
                Highlight::Descendant
            } else {
                Highlight::Neutral
            };
            assert_eq!(node.highlight(), expected, "seed {seed}, node {address}");
        }
    }
}

#[test]
fn test_double_click_round_trips_to_reset() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");

    let mut graph = HeapGraph::build(&random_snapshot(7, 30, 4));
    for address in (0..30u64).map(Address) {
        activate(&mut graph, address);
        if graph.focus().is_none() {
            // Was already focused; this click cleared it
            activate(&mut graph, address);
        }
        activate(&mut graph, address);
        assert!(graph.nodes().iter().all(|node| node.highlight() == Highlight::Neutral));
    }
}

#[test]
fn test_exactly_one_current_after_moving_focus() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");

    let mut graph = HeapGraph::build(&random_snapshot(3, 15, 3));
    for (x, y) in (0..15u64).zip((1..15u64).chain([0])) {
        activate(&mut graph, Address(x));
        if graph.focus().is_none() {
            activate(&mut graph, Address(x));
        }
        activate(&mut graph, Address(y));

        let current = graph.with_highlight(Highlight::Current);
        assert_eq!(current, vec![Address(y)]);
    }
}

#[test]
fn test_layout_is_deterministic() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");

    let snapshot = random_snapshot(11, 40, 3);
    let first = HeapGraph::build(&snapshot);
    let second = HeapGraph::build(&snapshot);

    let positions = |graph: &HeapGraph| graph.nodes().iter().map(|n| n.position()).collect::<Vec<_>>();
    assert_eq!(positions(&first), positions(&second));

    let distinct: HashSet<_> = positions(&first).into_iter().collect();
    assert_eq!(distinct.len(), first.len());
}
