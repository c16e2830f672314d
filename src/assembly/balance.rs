//! Near-Eulerian balance fixing
//!
//! A De Bruijn graph spelled by a linear sequence has exactly one vertex
//! with one extra incoming edge (where the sequence ends) and one with one
//! extra outgoing edge (where it starts). Joining the two with a synthetic
//! edge makes every vertex balanced.

use crate::assembly::multigraph::Multigraph;
use crate::core::data_structures::SyntheticEdge;
use crate::core::error::{AssemblyError, AssemblyResult};
use tracing::debug;

/// Scan the vertices in ascending order and, if the graph is near-Eulerian,
/// add the edge from the deficit vertex to the excess vertex.
///
/// Returns `Ok(None)` and leaves the graph untouched when it is already
/// balanced. Any other imbalance pattern is rejected.
pub fn create_fake_edge(graph: &mut Multigraph) -> AssemblyResult<Option<SyntheticEdge>> {
    let mut deficit = Vec::new();
    let mut excess = Vec::new();

    for vertex in 0..graph.num_vertices() {
        match graph.imbalance(vertex) {
            0 => {}
            1 => deficit.push(vertex),
            -1 => excess.push(vertex),
            _ => {
                return Err(AssemblyError::UnbalancedVertex {
                    vertex,
                    indegree: graph.indegree(vertex),
                    outdegree: graph.outdegree(vertex),
                })
            }
        }
    }

    match (deficit.len(), excess.len()) {
        (0, 0) => {
            debug!("graph already balanced, no synthetic edge needed");
            Ok(None)
        }
        (1, 1) => {
            let (source, target) = (deficit[0], excess[0]);
            graph.add_edge(source, target);
            debug!("added synthetic edge ({} -> {})", source, target);
            Ok(Some(SyntheticEdge { source, target }))
        }
        _ => Err(AssemblyError::MultipleImbalanceVertices { deficit, excess }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_graph_untouched() {
        let mut graph = Multigraph::new(3);
        graph.add_edges([(0, 1), (1, 2), (2, 0)]);

        assert_eq!(create_fake_edge(&mut graph), Ok(None));
        assert_eq!(graph.num_edges(), 3);
    }

    #[test]
    fn test_path_gets_closed() {
        // 0 -> 1 -> 2: vertex 2 needs an out-edge, vertex 0 an in-edge
        let mut graph = Multigraph::new(3);
        graph.add_edges([(0, 1), (1, 2)]);

        let edge = create_fake_edge(&mut graph).unwrap();
        assert_eq!(edge, Some(SyntheticEdge { source: 2, target: 0 }));
        assert!(graph.has_edge(2, 0));
        assert!(graph.is_balanced());
    }

    #[test]
    fn test_vertex_zero_can_be_deficit() {
        let mut graph = Multigraph::new(2);
        graph.add_edge(1, 0);

        let edge = create_fake_edge(&mut graph).unwrap();
        assert_eq!(edge, Some(SyntheticEdge { source: 0, target: 1 }));
        assert!(graph.is_balanced());
    }

    #[test]
    fn test_multiple_imbalances_rejected() {
        // Two disjoint paths: 0 -> 1 and 2 -> 3
        let mut graph = Multigraph::new(4);
        graph.add_edges([(0, 1), (2, 3)]);

        assert_eq!(
            create_fake_edge(&mut graph),
            Err(AssemblyError::MultipleImbalanceVertices {
                deficit: vec![1, 3],
                excess: vec![0, 2],
            })
        );
        assert_eq!(graph.num_edges(), 2);
    }

    #[test]
    fn test_large_imbalance_rejected() {
        let mut graph = Multigraph::new(2);
        graph.add_edges([(0, 1), (0, 1)]);

        assert!(matches!(
            create_fake_edge(&mut graph),
            Err(AssemblyError::UnbalancedVertex { vertex: 0, indegree: 0, outdegree: 2 })
        ));
    }
}
