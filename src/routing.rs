//! Least-cost routes between towns
//!
//! Moving into a town costs a fifth of the Euclidean distance travelled plus
//! the toll charged by the destination's archetype. Routes are found with
//! Dijkstra's algorithm over the finished road graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::RoadGraph;
use crate::town::Town;

/// Divisor applied to distance when pricing a road
pub const DISTANCE_DIVISOR: f64 = 5.0;

/// An ordered path of town ids and its total cost
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Towns visited, starting at the origin and ending at the target
    pub towns: Vec<usize>,
    /// Sum of the step costs along the path
    pub cost: f64,
}

impl Route {
    /// Number of roads travelled
    #[inline]
    pub fn hops(&self) -> usize {
        self.towns.len().saturating_sub(1)
    }
}

/// Cost of moving from `from` into `to`
#[inline]
pub fn step_cost(from: &Town, to: &Town) -> f64 {
    from.distance_to(to) / DISTANCE_DIVISOR + to.archetype.toll()
}

/// Heap entry; ordered so the cheapest town pops first, lowest id on ties
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    town: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.town.cmp(&self.town))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cheapest route from `origin` to `target`
///
/// Returns `None` if either town is unknown or `target` is unreachable.
/// A route from a town to itself is just that town at zero cost.
pub fn find_route(towns: &[Town], graph: &RoadGraph, origin: usize, target: usize) -> Option<Route> {
    let n = towns.len();
    if origin >= n || target >= n || graph.len() != n {
        return None;
    }
    if origin == target {
        return Some(Route {
            towns: vec![origin],
            cost: 0.0,
        });
    }

    let mut best = vec![f64::INFINITY; n];
    let mut previous: Vec<Option<usize>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();

    best[origin] = 0.0;
    heap.push(Frontier {
        cost: 0.0,
        town: origin,
    });

    while let Some(Frontier { cost, town }) = heap.pop() {
        if settled[town] {
            continue;
        }
        settled[town] = true;
        if town == target {
            break;
        }

        for next in graph.neighbors(town) {
            if settled[next] {
                continue;
            }
            let candidate = cost + step_cost(&towns[town], &towns[next]);
            if candidate < best[next] {
                best[next] = candidate;
                previous[next] = Some(town);
                heap.push(Frontier {
                    cost: candidate,
                    town: next,
                });
            }
        }
    }

    if !settled[target] {
        return None;
    }

    let mut path = vec![target];
    let mut current = target;
    while let Some(prev) = previous[current] {
        path.push(prev);
        current = prev;
    }
    path.reverse();

    Some(Route {
        towns: path,
        cost: best[target],
    })
}
