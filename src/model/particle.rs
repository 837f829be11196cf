//! Graph node payload: a particle's identity, type, physical attributes, and naming labels.
//!
//! Only `id` and `type_id` participate in term enumeration. Mass, charge, position, and the
//! naming labels ride along untouched so the topology assembler and the coordinate writer can
//! emit them without consulting the snapshot again.

use super::types::{ParticleId, Point, TypeId};
use smol_str::SmolStr;
use std::fmt;

/// Naming labels attached to a particle during molecule labeling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleLabels {
    /// Force-field type name resolved from the type id (e.g. `CH2`).
    pub type_name: SmolStr,
    /// Atom name taken from the molecule's name sequence.
    pub name: SmolStr,
    /// Residue name taken from the molecule's name sequence.
    pub res_name: SmolStr,
    /// Molecule-type (chain) name the particle belongs to.
    pub chain_name: SmolStr,
    /// 1-based index of the molecule instance within its molecule type.
    pub chain_idx: usize,
}

/// Immutable particle record stored on every graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Stable snapshot id; also the graph node key.
    pub id: ParticleId,
    /// Type id used for template matching.
    pub type_id: TypeId,
    /// Mass in atomic mass units.
    pub mass: f64,
    /// Partial charge when the snapshot provides one.
    pub charge: Option<f64>,
    /// Cartesian coordinates in nanometers.
    pub position: Point,
    /// Naming labels used by the serializers.
    pub labels: ParticleLabels,
}

impl Particle {
    /// Creates a particle with zero mass, origin position, and empty labels.
    ///
    /// # Arguments
    ///
    /// * `id` - Stable particle id from the snapshot.
    /// * `type_id` - Type id used for template lookups.
    pub fn new(id: ParticleId, type_id: TypeId) -> Self {
        Self {
            id,
            type_id,
            mass: 0.0,
            charge: None,
            position: Point::origin(),
            labels: ParticleLabels::default(),
        }
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_charge(mut self, charge: Option<f64>) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn with_labels(mut self, labels: ParticleLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Charge written to the topology; zero unless the snapshot specified one.
    pub fn charge_or_default(&self) -> f64 {
        self.charge.unwrap_or(0.0)
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Particle {{ id: {}, type: {}, name: '{}', residue: '{}' }}",
            self.id, self.type_id, self.labels.name, self.labels.res_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_particle_has_neutral_defaults() {
        let particle = Particle::new(7, 2);

        assert_eq!(particle.id, 7);
        assert_eq!(particle.type_id, 2);
        assert_eq!(particle.mass, 0.0);
        assert_eq!(particle.charge, None);
        assert_eq!(particle.position, Point::origin());
        assert!(particle.labels.name.is_empty());
    }

    #[test]
    fn charge_defaults_to_zero_unless_specified() {
        assert_eq!(Particle::new(1, 0).charge_or_default(), 0.0);
        assert_eq!(
            Particle::new(1, 0).with_charge(Some(-0.5)).charge_or_default(),
            -0.5
        );
    }

    #[test]
    fn builder_methods_set_attributes() {
        let labels = ParticleLabels {
            type_name: "C".into(),
            name: "C1".into(),
            res_name: "ETH".into(),
            chain_name: "ETH".into(),
            chain_idx: 3,
        };
        let particle = Particle::new(1, 0)
            .with_mass(12.011)
            .with_position(Point::new(0.1, 0.2, 0.3))
            .with_labels(labels.clone());

        assert_eq!(particle.mass, 12.011);
        assert_eq!(particle.position, Point::new(0.1, 0.2, 0.3));
        assert_eq!(particle.labels, labels);
    }

    #[test]
    fn display_includes_id_and_names() {
        let mut particle = Particle::new(4, 1);
        particle.labels.name = "O1".into();
        particle.labels.res_name = "WAT".into();

        assert_eq!(
            particle.to_string(),
            "Particle { id: 4, type: 1, name: 'O1', residue: 'WAT' }"
        );
    }
}
