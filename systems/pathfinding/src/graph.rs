use std::collections::HashMap;

use snack_attack_core::ScaledCoord;

/// Sparse skeleton of the walkable area.
///
/// Nodes are painted tile centres. Two nodes are linked when they share a
/// row or column and lie at most `threshold` units apart along it, which
/// approximates four-connectivity without a per-cell search. The graph is
/// rebuilt wholesale from layout data and never mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavGraph {
    nodes: Vec<ScaledCoord>,
    index: HashMap<ScaledCoord, usize>,
    adjacency: Vec<Vec<usize>>,
}

impl NavGraph {
    /// Links every pair of aligned coordinates within `threshold` of each other.
    ///
    /// Duplicate coordinates collapse into one node. Neighbour lists keep the
    /// order in which coordinates were first supplied.
    #[must_use]
    pub fn build(coords: &[ScaledCoord], threshold: u32) -> Self {
        let mut graph = Self::default();
        for &coord in coords {
            if graph.index.contains_key(&coord) {
                continue;
            }
            let _ = graph.index.insert(coord, graph.nodes.len());
            graph.nodes.push(coord);
        }
        graph.adjacency = vec![Vec::new(); graph.nodes.len()];

        for first in 0..graph.nodes.len() {
            for second in first + 1..graph.nodes.len() {
                if are_linked(graph.nodes[first], graph.nodes[second], threshold) {
                    graph.adjacency[first].push(second);
                    graph.adjacency[second].push(first);
                }
            }
        }

        graph
    }

    /// Number of distinct nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Reports whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[ScaledCoord] {
        &self.nodes
    }

    /// Reports whether `coord` is a node.
    #[must_use]
    pub fn contains(&self, coord: ScaledCoord) -> bool {
        self.index.contains_key(&coord)
    }

    /// Neighbours of `coord` in adjacency order; empty for non-nodes.
    pub fn neighbors(&self, coord: ScaledCoord) -> impl Iterator<Item = ScaledCoord> + '_ {
        self.index_of(coord)
            .map(|index| self.adjacency[index].as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&neighbor| self.nodes[neighbor])
    }

    pub(crate) fn index_of(&self, coord: ScaledCoord) -> Option<usize> {
        self.index.get(&coord).copied()
    }

    pub(crate) fn node(&self, index: usize) -> ScaledCoord {
        self.nodes[index]
    }

    pub(crate) fn adjacent(&self, index: usize) -> &[usize] {
        &self.adjacency[index]
    }
}

fn are_linked(first: ScaledCoord, second: ScaledCoord, threshold: u32) -> bool {
    let same_row = first.y() == second.y() && first.x().abs_diff(second.x()) <= threshold;
    let same_column = first.x() == second.x() && first.y().abs_diff(second.y()) <= threshold;
    same_row || same_column
}
