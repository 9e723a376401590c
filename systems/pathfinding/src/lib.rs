#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flow-field pathfinding over the painted path skeleton.
//!
//! [`NavGraph::build`] turns tile centres into a sparse graph and
//! [`compute_flow_field`] runs one breadth-first search from a goal so that
//! any number of entities can be routed toward it without searching per
//! entity per tick.

mod flow;
mod graph;

pub use flow::{compute_flow_field, FlowField, FlowVector, Route};
pub use graph::NavGraph;
