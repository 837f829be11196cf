//! # TopoForge
//!
//! **TopoForge** derives the complete set of bonded force-field terms for a coarse-grained or atomistic system from a single simulation snapshot. It reads particle records and connectivity, matches them against a library of interaction templates keyed by particle-type tuples, and emits a GROMACS topology plus a matching coordinate file. The crate favors deterministic output and explicit error surfaces, so a conversion either yields a reproducible topology or fails before anything is written.
//!
//! ## Features
//!
//! - **Frozen connectivity graph** – `GraphBuilder` validates every edge against the particle set, drops sentinel edges from fixed-width storage, and freezes the result for concurrent reads.
//! - **Symmetric template lookup** – `TemplateIndex` stores every bond, angle, dihedral, and pair template under both orientations of its type tuple and rejects ambiguous definitions up front.
//! - **Parallel term enumeration** – `TermEnumerator` validates bonds and derives angles, dihedrals, and 1-4 pairs from short simple paths using a map/union-reduce that yields identical results for any partitioning, with a sequential fallback when the `parallel` feature is off.
//! - **Molecule-aware labeling** – particles are grouped into molecule instances and named from configured name sequences, so residue numbers and atom names survive into the output files.
//! - **GROMACS I/O** – readers for XML settings, interaction-type include files, and TOML or H5MD snapshots; writers for `.top` and `.gro` files.

mod model;
mod utils;

pub mod io;
pub mod ops;

pub use model::graph::ParticleGraph;
pub use model::particle::{Particle, ParticleLabels};
pub use model::settings::{H5mdLayout, MoleculeProperties, NameSequence, Settings, TypeInfo};
pub use model::snapshot::{ConnectivityGroup, ParticleRecord, Snapshot};
pub use model::template::{InteractionTypes, TypeDefinition};
pub use model::term::{AngleTerm, BondTerm, DihedralTerm, PairTerm, Terms};
pub use model::topology::{MoleculeSummary, Topology, TopologyAtom};
pub use model::types::{
    InteractionKind, ParameterRecord, ParticleId, Point, SENTINEL_ID, TemplateId, TypeId,
};
