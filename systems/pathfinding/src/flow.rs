use std::collections::{HashMap, VecDeque};

use snack_attack_core::{Direction, ScaledCoord};

use crate::NavGraph;

/// Direction stored for a node of the flow field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowVector {
    /// The node is the goal itself.
    Goal,
    /// Travel this way to reach the next node closer to the goal.
    Toward(Direction),
    /// No path links the node to the goal.
    Unreachable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FlowEntry {
    integration: Option<u32>,
    vector: FlowVector,
    next: Option<ScaledCoord>,
}

/// Integration and flow fields computed for one goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowField {
    goal: ScaledCoord,
    entries: HashMap<ScaledCoord, FlowEntry>,
}

impl FlowField {
    /// Node the field leads to.
    #[must_use]
    pub const fn goal(&self) -> ScaledCoord {
        self.goal
    }

    /// Hop count from `node` to the goal; `None` for unreachable or unknown nodes.
    #[must_use]
    pub fn integration(&self, node: ScaledCoord) -> Option<u32> {
        self.entries.get(&node).and_then(|entry| entry.integration)
    }

    /// Flow vector stored for `node`; `None` when `node` is not part of the graph.
    #[must_use]
    pub fn vector(&self, node: ScaledCoord) -> Option<FlowVector> {
        self.entries.get(&node).map(|entry| entry.vector)
    }

    /// Nodes visited when following the field from `from`, excluding `from`.
    ///
    /// The iterator ends at the goal, or immediately for unreachable nodes.
    #[must_use]
    pub fn route(&self, from: ScaledCoord) -> Route<'_> {
        Route {
            field: self,
            current: from,
        }
    }

    /// Number of nodes with no path to the goal.
    #[must_use]
    pub fn unreachable_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.vector == FlowVector::Unreachable)
            .count()
    }
}

/// Iterator returned by [`FlowField::route`].
#[derive(Clone, Debug)]
pub struct Route<'a> {
    field: &'a FlowField,
    current: ScaledCoord,
}

impl Iterator for Route<'_> {
    type Item = ScaledCoord;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.field.entries.get(&self.current)?.next?;
        self.current = next;
        Some(next)
    }
}

/// Runs a breadth-first search outward from `goal` and derives flow vectors.
///
/// Every non-goal node points at the neighbour with the lowest integration
/// value; ties go to the neighbour listed first. Returns `None` when `goal`
/// is not a node of the graph.
#[must_use]
pub fn compute_flow_field(graph: &NavGraph, goal: ScaledCoord) -> Option<FlowField> {
    let goal_index = graph.index_of(goal)?;
    let mut integration: Vec<Option<u32>> = vec![None; graph.len()];
    integration[goal_index] = Some(0);

    let mut queue = VecDeque::from([goal_index]);
    while let Some(current) = queue.pop_front() {
        let Some(distance) = integration[current] else {
            continue;
        };
        let next_distance = distance + 1;

        for &neighbor in graph.adjacent(current) {
            if integration[neighbor].is_some_and(|known| known <= next_distance) {
                continue;
            }
            integration[neighbor] = Some(next_distance);
            queue.push_back(neighbor);
        }
    }

    let mut entries = HashMap::with_capacity(graph.len());
    for (index, distance) in integration.iter().enumerate() {
        let node = graph.node(index);
        let entry = if index == goal_index {
            FlowEntry {
                integration: Some(0),
                vector: FlowVector::Goal,
                next: None,
            }
        } else {
            match closest_neighbor(graph, &integration, index) {
                Some(best) => {
                    let target = graph.node(best);
                    FlowEntry {
                        integration: *distance,
                        vector: node
                            .direction_to(target)
                            .map_or(FlowVector::Unreachable, FlowVector::Toward),
                        next: Some(target),
                    }
                }
                None => FlowEntry {
                    integration: None,
                    vector: FlowVector::Unreachable,
                    next: None,
                },
            }
        };
        let _ = entries.insert(node, entry);
    }

    let field = FlowField { goal, entries };
    tracing::debug!(
        goal_x = goal.x(),
        goal_y = goal.y(),
        nodes = graph.len(),
        unreachable = field.unreachable_count(),
        "flow field computed"
    );
    Some(field)
}

fn closest_neighbor(graph: &NavGraph, integration: &[Option<u32>], index: usize) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for &neighbor in graph.adjacent(index) {
        let Some(distance) = integration[neighbor] else {
            continue;
        };
        if best.map_or(true, |(_, lowest)| distance < lowest) {
            best = Some((neighbor, distance));
        }
    }
    best.map(|(neighbor, _)| neighbor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(length: i32) -> NavGraph {
        let coords: Vec<_> = (0..length).map(|x| ScaledCoord::new(x, 0)).collect();
        NavGraph::build(&coords, 1)
    }

    #[test]
    fn goal_outside_graph_yields_nothing() {
        assert!(compute_flow_field(&line(3), ScaledCoord::new(7, 7)).is_none());
    }

    #[test]
    fn line_points_toward_goal() {
        let field = compute_flow_field(&line(4), ScaledCoord::new(3, 0)).expect("goal is a node");

        assert_eq!(field.vector(ScaledCoord::new(3, 0)), Some(FlowVector::Goal));
        assert_eq!(
            field.vector(ScaledCoord::new(0, 0)),
            Some(FlowVector::Toward(Direction::East))
        );
        assert_eq!(field.integration(ScaledCoord::new(0, 0)), Some(3));
    }

    #[test]
    fn ties_go_to_the_first_listed_neighbour() {
        // Square loop: (0,0) reaches the goal at (1,1) equally via (1,0) or (0,1).
        let graph = NavGraph::build(
            &[
                ScaledCoord::new(0, 0),
                ScaledCoord::new(1, 0),
                ScaledCoord::new(0, 1),
                ScaledCoord::new(1, 1),
            ],
            1,
        );
        let field = compute_flow_field(&graph, ScaledCoord::new(1, 1)).expect("goal is a node");

        assert_eq!(
            field.vector(ScaledCoord::new(0, 0)),
            Some(FlowVector::Toward(Direction::East))
        );
    }

    #[test]
    fn disconnected_nodes_are_marked_unreachable() {
        let graph = NavGraph::build(&[ScaledCoord::new(0, 0), ScaledCoord::new(5, 5)], 1);
        let field = compute_flow_field(&graph, ScaledCoord::new(0, 0)).expect("goal is a node");

        assert_eq!(
            field.vector(ScaledCoord::new(5, 5)),
            Some(FlowVector::Unreachable)
        );
        assert_eq!(field.integration(ScaledCoord::new(5, 5)), None);
        assert_eq!(field.route(ScaledCoord::new(5, 5)).count(), 0);
        assert_eq!(field.unreachable_count(), 1);
    }
}
