//! Graph construction from labeled particles and raw connectivity edge lists.
//!
//! The builder owns the single-writer phase of the pipeline: it validates every edge against
//! the particle set, drops sentinel edges left over from fixed-width storage, and freezes the
//! result into a [`ParticleGraph`] that workers can share by reference.

use crate::model::{
    graph::ParticleGraph,
    particle::Particle,
    settings::Settings,
    snapshot::Snapshot,
    types::{ParticleId, SENTINEL_ID},
};
use crate::ops::error::Error;
use crate::ops::labels::label_particles;
use nalgebra::Vector3;
use std::collections::HashMap;

/// Builder responsible for creating [`ParticleGraph`] objects.
///
/// Particles and edges can be supplied incrementally; nothing is validated until
/// [`GraphBuilder::build`] runs.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    particles: Vec<Particle>,
    edges: Vec<[i64; 2]>,
    box_edges: Vector3<f64>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels the snapshot's particles and collects all of its connectivity groups.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - Raw frame data, including padding rows and sentinel edges.
    /// * `settings` - Settings used to resolve types and names.
    ///
    /// # Errors
    ///
    /// Propagates labeling errors (see [`label_particles`]).
    pub fn from_snapshot(snapshot: &Snapshot, settings: &Settings) -> Result<Self, Error> {
        let particles = label_particles(snapshot, settings)?;
        Ok(Self::new()
            .particles(particles)
            .edges(snapshot.edges())
            .box_edges(Vector3::from(snapshot.box_edges)))
    }

    pub fn particles(mut self, particles: impl IntoIterator<Item = Particle>) -> Self {
        self.particles.extend(particles);
        self
    }

    pub fn add_particle(mut self, particle: Particle) -> Self {
        self.particles.push(particle);
        self
    }

    /// Appends raw edges; negative endpoints mark sentinel slots and are dropped on build.
    pub fn edges(mut self, edges: impl IntoIterator<Item = [i64; 2]>) -> Self {
        self.edges.extend(edges);
        self
    }

    pub fn add_edge(mut self, a: i64, b: i64) -> Self {
        self.edges.push([a, b]);
        self
    }

    pub fn box_edges(mut self, box_edges: Vector3<f64>) -> Self {
        self.box_edges = box_edges;
        self
    }

    /// Validates the collected data and freezes it into a graph.
    ///
    /// # Returns
    ///
    /// A [`ParticleGraph`] with one node per particle and one undirected edge per distinct
    /// non-sentinel bond.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateParticle`] when two particles share an id,
    /// [`Error::MissingEndpoint`] when an edge references an unknown id, and
    /// [`Error::SelfBond`] for edges that connect a particle to itself.
    pub fn build(self) -> Result<ParticleGraph, Error> {
        let mut particles = self.particles;
        particles.sort_by_key(|p| p.id);

        if let Some(dup) = particles.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(Error::DuplicateParticle { id: dup[0].id });
        }

        let index: HashMap<ParticleId, usize> = particles
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.id, idx))
            .collect();

        let mut sentinels = 0usize;
        let mut edges = Vec::with_capacity(self.edges.len());
        for [raw_a, raw_b] in self.edges {
            if raw_a <= SENTINEL_ID || raw_b <= SENTINEL_ID {
                sentinels += 1;
                continue;
            }

            let (a, b) = (raw_a as ParticleId, raw_b as ParticleId);
            let ia = *index.get(&a).ok_or(Error::missing_endpoint(a, b, a))?;
            let ib = *index.get(&b).ok_or(Error::missing_endpoint(a, b, b))?;

            if ia == ib {
                return Err(Error::SelfBond { id: a });
            }

            edges.push((ia.min(ib), ia.max(ib)));
        }

        edges.sort_unstable();
        edges.dedup();

        if sentinels > 0 {
            log::debug!("Dropped {} sentinel connectivity entries", sentinels);
        }

        let graph = ParticleGraph::from_parts(particles, edges, self.box_edges);
        log::info!("Built {}", graph);

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::TypeId;

    fn particles(ids: &[ParticleId]) -> Vec<Particle> {
        ids.iter().map(|&id| Particle::new(id, 0 as TypeId)).collect()
    }

    #[test]
    fn builds_one_node_per_particle_and_one_edge_per_bond() {
        let graph = GraphBuilder::new()
            .particles(particles(&[3, 1, 2, 4]))
            .edges([[1, 2], [2, 3], [3, 4]])
            .build()
            .unwrap();

        assert_eq!(graph.particle_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        let ids: Vec<_> = graph.particles().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn sentinel_edges_never_reach_the_graph() {
        let graph = GraphBuilder::new()
            .particles(particles(&[1, 2]))
            .edges([[1, 2], [-1, -1], [1, -1]])
            .build()
            .unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge(1, 2));
    }

    #[test]
    fn duplicate_and_reversed_edges_collapse() {
        let graph = GraphBuilder::new()
            .particles(particles(&[1, 2, 3]))
            .edges([[1, 2], [2, 1], [1, 2], [2, 3]])
            .build()
            .unwrap();

        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn errors_on_missing_endpoint() {
        let result = GraphBuilder::new()
            .particles(particles(&[4, 5]))
            .add_edge(4, 5)
            .add_edge(5, 6)
            .build();

        assert!(matches!(
            result,
            Err(Error::MissingEndpoint {
                a: 5,
                b: 6,
                missing: 6
            })
        ));
    }

    #[test]
    fn errors_on_duplicate_particle_ids() {
        let result = GraphBuilder::new()
            .particles(particles(&[1, 2, 2]))
            .build();

        assert!(matches!(result, Err(Error::DuplicateParticle { id: 2 })));
    }

    #[test]
    fn errors_on_self_bond() {
        let result = GraphBuilder::new()
            .particles(particles(&[1, 2]))
            .add_edge(2, 2)
            .build();

        assert!(matches!(result, Err(Error::SelfBond { id: 2 })));
    }

    #[test]
    fn from_snapshot_labels_particles_and_keeps_box() {
        use crate::model::settings::{MoleculeProperties, NameSequence};
        use crate::model::snapshot::{ConnectivityGroup, ParticleRecord};

        let mut settings = Settings::new();
        settings.add_type(0, "DIM", "A");
        settings.add_molecule(MoleculeProperties {
            name: "DIM".into(),
            size: 2,
            nrexcl: 1,
            nrmols: 1,
        });
        settings.add_name_sequence(
            "DIM",
            vec![0, 0],
            NameSequence {
                atom_names: vec!["A1".into(), "A2".into()],
                res_name: "DIM".into(),
            },
        );

        let snapshot = Snapshot {
            box_edges: [2.0, 3.0, 4.0],
            particles: vec![
                ParticleRecord {
                    id: 10,
                    species: 0,
                    mass: 1.0,
                    position: [0.0; 3],
                    charge: None,
                },
                ParticleRecord {
                    id: 11,
                    species: 0,
                    mass: 1.0,
                    position: [0.1, 0.0, 0.0],
                    charge: None,
                },
            ],
            connectivity: vec![ConnectivityGroup {
                name: "bonds".into(),
                edges: vec![[10, 11], [-1, -1]],
            }],
        };

        let graph = GraphBuilder::from_snapshot(&snapshot, &settings)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.box_edges(), Vector3::new(2.0, 3.0, 4.0));
        assert_eq!(graph.particle(11).unwrap().labels.name, "A2");
    }
}
