//! Eulerian circuit construction
//! =============================
//!
//! The circuit is built in two passes over a balanced multigraph:
//! 1. decomposition: greedily walk closed cycles, consuming edges, until the
//!    graph is empty
//! 2. joining: splice every cycle into the growing circuit at a vertex the
//!    two already share
//!
//! Both passes are destructive on their inputs and fully deterministic for a
//! given edge insertion order.

use crate::assembly::multigraph::Multigraph;
use crate::core::error::{AssemblyError, AssemblyResult};
use std::collections::VecDeque;
use std::iter;
use tracing::debug;

/// Closed walk of vertex ids; first and last entries are equal
pub type Cycle = Vec<usize>;

/// Walk from `start`, always consuming the first outgoing edge of the
/// current vertex, until the walk returns to `start`.
///
/// Every edge on the returned cycle is removed from `graph`. In a balanced
/// graph the walk can only get stuck at `start`; getting stuck anywhere else,
/// or at `start` before taking a single edge, is reported as
/// [`AssemblyError::StuckWalk`].
pub fn find_cycle(graph: &mut Multigraph, start: usize) -> AssemblyResult<Cycle> {
    let mut cycle = vec![start];
    let mut current = start;

    loop {
        let next = graph
            .first_successor(current)
            .ok_or(AssemblyError::StuckWalk {
                start,
                vertex: current,
            })?;
        graph.remove_edge(current, next)?;
        cycle.push(next);
        current = next;

        if current == start {
            return Ok(cycle);
        }
    }
}

/// Split every edge of `graph` into edge-disjoint cycles.
///
/// The first cycle starts at `start`; each following one starts at the
/// source of the first remaining edge. The graph is empty on success.
pub fn decompose_into_cycles(graph: &mut Multigraph, start: usize) -> AssemblyResult<Vec<Cycle>> {
    let mut cycles = vec![find_cycle(graph, start)?];

    loop {
        let next_edge = graph.edges().next();
        let Some((next_start, _)) = next_edge else {
            break;
        };
        let cycle = find_cycle(graph, next_start)?;
        debug!(
            "cycle {} from vertex {} covers {} edge(s)",
            cycles.len(),
            next_start,
            cycle.len() - 1
        );
        cycles.push(cycle);
    }

    Ok(cycles)
}

/// Merge edge-disjoint cycles into one closed walk.
///
/// Each cycle is spliced in at the first of its vertices that already occurs
/// in the circuit. A cycle that shares nothing with the circuit yet is retried
/// after the others; once a full round makes no progress the cycles cannot
/// belong to one connected graph.
pub fn join_cycles<I>(cycles: I) -> AssemblyResult<Cycle>
where
    I: IntoIterator<Item = Cycle>,
{
    let mut cycles = cycles.into_iter();
    let Some(mut joined) = cycles.next() else {
        return Ok(Vec::new());
    };

    let mut pending: VecDeque<Cycle> = cycles.collect();
    let mut failed_in_a_row = 0;

    while let Some(cycle) = pending.pop_front() {
        if splice_cycle(&mut joined, &cycle) {
            failed_in_a_row = 0;
            continue;
        }

        pending.push_back(cycle);
        failed_in_a_row += 1;
        if failed_in_a_row >= pending.len() {
            return Err(AssemblyError::UnjoinableCycles {
                remaining: pending.len(),
            });
        }
    }

    Ok(joined)
}

/// Replace the first occurrence of a shared vertex in `joined` with `cycle`
/// rotated to begin and end at that vertex. Returns false if no vertex is
/// shared.
fn splice_cycle(joined: &mut Cycle, cycle: &[usize]) -> bool {
    if cycle.len() < 2 {
        return true;
    }
    let body = &cycle[..cycle.len() - 1];

    for (offset, &vertex) in body.iter().enumerate() {
        if let Some(position) = joined.iter().position(|&v| v == vertex) {
            let rotated: Vec<usize> = body[offset..]
                .iter()
                .chain(&body[..offset])
                .copied()
                .chain(iter::once(vertex))
                .collect();
            joined.splice(position..=position, rotated);
            return true;
        }
    }

    false
}

/// Decompose `graph` from `start` and join the cycles into one circuit
pub fn eulerian_circuit(graph: &mut Multigraph, start: usize) -> AssemblyResult<Cycle> {
    let cycles = decompose_into_cycles(graph, start)?;
    join_cycles(cycles)
}
