//! Directed multigraph over integer vertices
//! =========================================
//!
//! Every vertex owns an ordered out-list and in-list. Parallel edges are
//! stored as repeated entries, so each k-mer occurrence is its own edge and
//! removal deletes exactly one occurrence.
//!
//! Out-lists keep insertion order. The cycle finder always takes the first
//! outgoing edge, so that order decides which cycles are discovered.

use crate::core::error::{AssemblyError, AssemblyResult};
use petgraph::unionfind::UnionFind;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multigraph {
    out_lists: Vec<Vec<usize>>,
    in_lists: Vec<Vec<usize>>,
    num_edges: usize,
}

impl Multigraph {
    /// Create a graph with `num_vertices` vertices and no edges
    pub fn new(num_vertices: usize) -> Self {
        Self {
            out_lists: vec![Vec::new(); num_vertices],
            in_lists: vec![Vec::new(); num_vertices],
            num_edges: 0,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.out_lists.len()
    }

    /// Total edge occurrences across all vertices
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn is_empty(&self) -> bool {
        self.num_edges == 0
    }

    /// Append the edge `(i, j)`. Parallel edges are allowed.
    ///
    /// # Panics
    /// If either vertex is out of range.
    pub fn add_edge(&mut self, i: usize, j: usize) {
        self.out_lists[i].push(j);
        self.in_lists[j].push(i);
        self.num_edges += 1;
    }

    /// Remove one occurrence of `(i, j)`
    pub fn remove_edge(&mut self, i: usize, j: usize) -> AssemblyResult<()> {
        let missing = || AssemblyError::InvalidEdgeRemoval { from: i, to: j };

        let out_pos = self
            .out_lists
            .get(i)
            .and_then(|targets| targets.iter().position(|&t| t == j))
            .ok_or_else(missing)?;
        let in_pos = self
            .in_lists
            .get(j)
            .and_then(|sources| sources.iter().position(|&s| s == i))
            .ok_or_else(missing)?;

        // `remove` rather than `swap_remove`: the out-list order is observable
        self.out_lists[i].remove(out_pos);
        self.in_lists[j].remove(in_pos);
        self.num_edges -= 1;
        Ok(())
    }

    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        self.out_lists
            .get(i)
            .map_or(false, |targets| targets.contains(&j))
    }

    pub fn add_edges<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        for (i, j) in edges {
            self.add_edge(i, j);
        }
    }

    /// Remove every listed edge, stopping at the first one that is missing
    pub fn remove_edges<I>(&mut self, edges: I) -> AssemblyResult<()>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        for (i, j) in edges {
            self.remove_edge(i, j)?;
        }
        Ok(())
    }

    /// Outgoing occurrences of `i` in insertion order; none for an unknown vertex
    pub fn out_edges(&self, i: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.out_lists.get(i).into_iter().flatten().map(move |&j| (i, j))
    }

    /// Incoming occurrences of `j` in insertion order; none for an unknown vertex
    pub fn in_edges(&self, j: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.in_lists.get(j).into_iter().flatten().map(move |&i| (i, j))
    }

    /// First outgoing neighbour of `i`, if any
    pub fn first_successor(&self, i: usize) -> Option<usize> {
        self.out_lists.get(i).and_then(|targets| targets.first().copied())
    }

    /// Zero for an unknown vertex
    pub fn outdegree(&self, i: usize) -> usize {
        self.out_lists.get(i).map_or(0, Vec::len)
    }

    pub fn indegree(&self, i: usize) -> usize {
        self.in_lists.get(i).map_or(0, Vec::len)
    }

    pub fn degree(&self, i: usize) -> usize {
        self.indegree(i) + self.outdegree(i)
    }

    /// `indegree - outdegree`: positive when the vertex lacks outgoing edges
    pub fn imbalance(&self, i: usize) -> isize {
        self.indegree(i) as isize - self.outdegree(i) as isize
    }

    /// All edge occurrences, vertex by vertex. Each call starts a fresh walk.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.num_vertices()).flat_map(move |i| self.out_edges(i))
    }

    /// True when every vertex has equal in- and outdegree
    pub fn is_balanced(&self) -> bool {
        (0..self.num_vertices()).all(|v| self.indegree(v) == self.outdegree(v))
    }

    /// Number of weakly connected components among vertices that carry edges
    pub fn weakly_connected_components(&self) -> usize {
        let mut components = UnionFind::<usize>::new(self.num_vertices());
        for (i, j) in self.edges() {
            components.union(i, j);
        }

        let mut roots: Vec<usize> = (0..self.num_vertices())
            .filter(|&v| self.degree(v) > 0)
            .map(|v| components.find(v))
            .collect();
        roots.sort_unstable();
        roots.dedup();
        roots.len()
    }
}

impl fmt::Display for Multigraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut edges: Vec<(usize, usize)> = self.edges().collect();
        edges.sort_unstable();
        write!(
            f,
            "Multigraph with {} vertices and {} edge(s):\n{:?}",
            self.num_vertices(),
            self.num_edges(),
            edges
        )
    }
}
