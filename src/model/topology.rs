//! Emission-ready topology produced by the assembler.
//!
//! Unlike [`Terms`](super::term::Terms), which reference templates by id, a [`Topology`]
//! carries fully resolved parameter records and per-atom naming, so writers can serialize it
//! without access to the template index or the settings.

use super::types::{ParameterRecord, ParticleId, Point};
use nalgebra::Vector3;
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::fmt;

/// One `[ atoms ]` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyAtom {
    pub id: ParticleId,
    pub type_name: SmolStr,
    /// Residue number (the molecule instance index).
    pub chain_idx: usize,
    pub res_name: SmolStr,
    pub name: SmolStr,
    /// Charge group; one group per particle.
    pub cgnr: ParticleId,
    pub charge: f64,
    pub mass: f64,
    pub position: Point,
}

/// Molecule-type summary used for `[ moleculetype ]` and `[ molecules ]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoleculeSummary {
    pub name: String,
    pub size: usize,
    pub nrexcl: u32,
    pub nrmols: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    pub atoms: Vec<TopologyAtom>,
    pub bonds: BTreeMap<[ParticleId; 2], ParameterRecord>,
    pub angles: BTreeMap<[ParticleId; 3], ParameterRecord>,
    pub dihedrals: BTreeMap<[ParticleId; 4], ParameterRecord>,
    pub pairs: BTreeMap<[ParticleId; 2], ParameterRecord>,
    pub molecule_types: Vec<MoleculeSummary>,
    pub box_edges: Vector3<f64>,
}

impl Topology {
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// System name: the first declared molecule type, if any.
    pub fn system_name(&self) -> Option<&str> {
        self.molecule_types.first().map(|m| m.name.as_str())
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Topology {{ atoms: {}, bonds: {}, angles: {}, dihedrals: {}, pairs: {} }}",
            self.atoms.len(),
            self.bonds.len(),
            self.angles.len(),
            self.dihedrals.len(),
            self.pairs.len()
        )
    }
}
