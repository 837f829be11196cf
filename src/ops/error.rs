use crate::model::types::{InteractionKind, ParticleId, TemplateId, TypeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("connectivity edge {a}-{b} references particle {missing}, which is not in the snapshot")]
    MissingEndpoint {
        a: ParticleId,
        b: ParticleId,
        missing: ParticleId,
    },

    #[error("particle id {id} appears more than once in the snapshot")]
    DuplicateParticle { id: ParticleId },

    #[error("connectivity edge {id}-{id} bonds a particle to itself")]
    SelfBond { id: ParticleId },

    #[error("conflicting {kind} templates for type tuple '{types}'")]
    AmbiguousTemplate { kind: InteractionKind, types: String },

    #[error(
        "no bond template for bond {a}-{b} (types {type_a}-{type_b}); the template library does not cover this structure"
    )]
    UnparameterizedBond {
        a: ParticleId,
        b: ParticleId,
        type_a: TypeId,
        type_b: TypeId,
    },

    #[error("particle {id} has species {species}, which is not declared in the type table")]
    UnknownType { id: ParticleId, species: i64 },

    #[error("molecule type '{chain_name}' is not declared in the settings")]
    MissingMolecule { chain_name: String },

    #[error(
        "molecule '{chain_name}' starting at particle {start} needs {expected} particles but only {available} remain"
    )]
    IncompleteMolecule {
        chain_name: String,
        start: ParticleId,
        expected: usize,
        available: usize,
    },

    #[error("no name sequence for molecule '{chain_name}' with type sequence {types:?}")]
    MissingNameSequence {
        chain_name: String,
        types: Vec<TypeId>,
    },

    #[error("{kind} template #{template} is not present in the template index")]
    UnknownTemplate {
        kind: InteractionKind,
        template: TemplateId,
    },
}

impl Error {
    pub fn missing_endpoint(a: ParticleId, b: ParticleId, missing: ParticleId) -> Self {
        Self::MissingEndpoint { a, b, missing }
    }

    pub fn ambiguous_template(kind: InteractionKind, types: impl Into<String>) -> Self {
        Self::AmbiguousTemplate {
            kind,
            types: types.into(),
        }
    }

    pub fn unparameterized_bond(
        a: ParticleId,
        b: ParticleId,
        type_a: TypeId,
        type_b: TypeId,
    ) -> Self {
        Self::UnparameterizedBond {
            a,
            b,
            type_a,
            type_b,
        }
    }

    pub fn incomplete_molecule(
        chain_name: impl Into<String>,
        start: ParticleId,
        expected: usize,
        available: usize,
    ) -> Self {
        Self::IncompleteMolecule {
            chain_name: chain_name.into(),
            start,
            expected,
            available,
        }
    }

    pub fn missing_name_sequence(chain_name: impl Into<String>, types: Vec<TypeId>) -> Self {
        Self::MissingNameSequence {
            chain_name: chain_name.into(),
            types,
        }
    }
}
