//! Undirected particle connectivity graph shared read-only by all enumeration workers.
//!
//! Nodes are stored densely in ascending particle-id order; that order is the fixed total
//! order used by the term enumerator. Adjacency lists hold dense node indices so path
//! searches never touch a hash map. Instances are created by
//! [`GraphBuilder`](crate::ops::GraphBuilder) and never mutated afterwards.

use super::particle::Particle;
use super::types::{ParticleId, TypeId};
use nalgebra::Vector3;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone)]
pub struct ParticleGraph {
    particles: Vec<Particle>,
    index: HashMap<ParticleId, usize>,
    adjacency: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
    box_edges: Vector3<f64>,
}

impl ParticleGraph {
    /// Assembles a graph from validated parts.
    ///
    /// `particles` must be sorted by id with unique ids, and every edge must be a canonical
    /// `(a, b)` pair of node indices with `a < b`, sorted and duplicate-free.
    pub(crate) fn from_parts(
        particles: Vec<Particle>,
        edges: Vec<(usize, usize)>,
        box_edges: Vector3<f64>,
    ) -> Self {
        debug_assert!(particles.windows(2).all(|w| w[0].id < w[1].id));
        debug_assert!(edges.iter().all(|&(a, b)| a < b && b < particles.len()));

        let index = particles
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.id, idx))
            .collect();

        let mut adjacency = vec![Vec::new(); particles.len()];
        for &(a, b) in &edges {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
        }

        Self {
            particles,
            index,
            adjacency,
            edges,
            box_edges,
        }
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// All particles in ascending id order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Node at a dense index.
    pub fn node(&self, idx: usize) -> &Particle {
        &self.particles[idx]
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.index.get(&id).map(|&idx| &self.particles[idx])
    }

    /// Dense node index of a particle id.
    pub fn index_of(&self, id: ParticleId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn contains(&self, id: ParticleId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn type_of(&self, idx: usize) -> TypeId {
        self.particles[idx].type_id
    }

    pub fn id_of(&self, idx: usize) -> ParticleId {
        self.particles[idx].id
    }

    /// Sorted neighbor indices of a node.
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.adjacency[idx]
    }

    /// Canonical edges as node-index pairs, smaller index first.
    pub fn edge_indices(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Canonical edges as particle-id pairs, smaller id first.
    pub fn edges(&self) -> impl Iterator<Item = (ParticleId, ParticleId)> + '_ {
        self.edges
            .iter()
            .map(|&(a, b)| (self.particles[a].id, self.particles[b].id))
    }

    pub fn has_edge(&self, a: ParticleId, b: ParticleId) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(ia), Some(ib)) => self.adjacency[ia].binary_search(&ib).is_ok(),
            _ => false,
        }
    }

    /// Simulation box edge lengths in nanometers.
    pub fn box_edges(&self) -> Vector3<f64> {
        self.box_edges
    }
}

impl fmt::Display for ParticleGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParticleGraph {{ particles: {}, edges: {} }}",
            self.particle_count(),
            self.edge_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_with_tail() -> ParticleGraph {
        let particles = [10, 20, 30, 40]
            .into_iter()
            .map(|id| Particle::new(id, (id / 10) as TypeId))
            .collect();
        ParticleGraph::from_parts(
            particles,
            vec![(0, 1), (0, 2), (1, 2), (2, 3)],
            Vector3::new(1.0, 2.0, 3.0),
        )
    }

    #[test]
    fn counts_and_lookup_by_id() {
        let graph = triangle_with_tail();

        assert_eq!(graph.particle_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.index_of(30), Some(2));
        assert_eq!(graph.particle(40).map(|p| p.type_id), Some(4));
        assert!(!graph.contains(50));
    }

    #[test]
    fn adjacency_is_symmetric_and_sorted() {
        let graph = triangle_with_tail();

        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.neighbors(2), &[0, 1, 3]);
        assert_eq!(graph.neighbors(3), &[2]);
        assert!(graph.has_edge(30, 40));
        assert!(graph.has_edge(40, 30));
        assert!(!graph.has_edge(10, 40));
    }

    #[test]
    fn edges_are_reported_by_particle_id() {
        let graph = triangle_with_tail();
        let edges: Vec<_> = graph.edges().collect();

        assert_eq!(edges, vec![(10, 20), (10, 30), (20, 30), (30, 40)]);
    }

    #[test]
    fn display_summarizes_graph() {
        let graph = triangle_with_tail();
        assert_eq!(graph.to_string(), "ParticleGraph { particles: 4, edges: 4 }");
        assert_eq!(graph.box_edges(), Vector3::new(1.0, 2.0, 3.0));
    }
}
