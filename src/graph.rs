//! Road adjacency between towns
//!
//! [`RoadGraph`] is the single owner of road connectivity. Every mutation
//! goes through [`RoadGraph::add_road`], [`RoadGraph::remove_road`] or the
//! clear methods, which update both endpoints together, so a town's degree
//! can never drift from its adjacency set.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Undirected, simple road graph over town indices `0..len`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoadGraph {
    adjacency: Vec<BTreeSet<usize>>,
}

impl RoadGraph {
    /// Create a graph with `town_count` towns and no roads
    pub fn new(town_count: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); town_count],
        }
    }

    /// Number of towns (vertices)
    #[inline]
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether the graph has no towns
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Connect `a` and `b`
    ///
    /// Returns `false` without changing anything for self-loops, unknown
    /// towns, or roads that already exist.
    pub fn add_road(&mut self, a: usize, b: usize) -> bool {
        if a == b || a >= self.len() || b >= self.len() {
            return false;
        }
        if !self.adjacency[a].insert(b) {
            return false;
        }
        self.adjacency[b].insert(a);
        true
    }

    /// Disconnect `a` and `b`; returns whether a road was removed
    pub fn remove_road(&mut self, a: usize, b: usize) -> bool {
        if a >= self.len() || b >= self.len() {
            return false;
        }
        if !self.adjacency[a].remove(&b) {
            return false;
        }
        self.adjacency[b].remove(&a);
        true
    }

    /// Remove every road touching `town`
    pub fn clear_town(&mut self, town: usize) {
        let Some(neighbors) = self.adjacency.get_mut(town) else {
            return;
        };
        let neighbors = std::mem::take(neighbors);
        for other in neighbors {
            self.adjacency[other].remove(&town);
        }
    }

    /// Remove every road in the graph
    pub fn clear(&mut self) {
        for neighbors in &mut self.adjacency {
            neighbors.clear();
        }
    }

    /// Whether `a` and `b` are directly connected
    #[inline]
    pub fn has_road(&self, a: usize, b: usize) -> bool {
        self.adjacency.get(a).is_some_and(|n| n.contains(&b))
    }

    /// Towns directly connected to `town`, in ascending order
    pub fn neighbors(&self, town: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.get(town).into_iter().flatten().copied()
    }

    /// Number of roads touching `town`
    #[inline]
    pub fn road_count(&self, town: usize) -> usize {
        self.adjacency.get(town).map_or(0, BTreeSet::len)
    }

    /// Total number of roads
    pub fn road_total(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Every road once, as `(low, high)` pairs in ascending order
    pub fn roads(&self) -> Vec<(usize, usize)> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, neighbors)| {
                neighbors
                    .iter()
                    .copied()
                    .filter(move |&b| a < b)
                    .map(move |b| (a, b))
            })
            .collect()
    }

    /// Whether every town is reachable from `hub`
    ///
    /// Depth-first traversal with an explicit stack. An empty graph is
    /// trivially connected; an out-of-range hub is not.
    pub fn is_connected_from(&self, hub: usize) -> bool {
        if self.is_empty() {
            return true;
        }
        if hub >= self.len() {
            return false;
        }

        let mut visited = vec![false; self.len()];
        let mut stack = vec![hub];
        visited[hub] = true;
        let mut reached = 1;

        while let Some(town) = stack.pop() {
            for &next in &self.adjacency[town] {
                if !visited[next] {
                    visited[next] = true;
                    reached += 1;
                    stack.push(next);
                }
            }
        }

        reached == self.len()
    }
}
