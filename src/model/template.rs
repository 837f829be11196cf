//! Parsed interaction-type definitions keyed by force-field type names.
//!
//! An [`InteractionTypes`] value mirrors the `*types` sections of a GROMACS include file:
//! each definition names its particle types in order and carries the parameter record
//! verbatim. Mapping names to type ids and assigning template ids is the job of
//! [`TemplateIndex`](crate::ops::TemplateIndex).

use super::types::{InteractionKind, ParameterRecord};
use smol_str::SmolStr;

/// One interaction-type definition of arity `N`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition<const N: usize> {
    pub type_names: [SmolStr; N],
    pub params: ParameterRecord,
}

impl<const N: usize> TypeDefinition<N> {
    pub fn new(type_names: [SmolStr; N], params: ParameterRecord) -> Self {
        Self { type_names, params }
    }

    /// Type names joined with `-` for diagnostics.
    pub fn label(&self) -> String {
        self.type_names
            .iter()
            .map(|n| n.as_str())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// All interaction-type definitions, in file order, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionTypes {
    pub bonds: Vec<TypeDefinition<2>>,
    pub angles: Vec<TypeDefinition<3>>,
    pub dihedrals: Vec<TypeDefinition<4>>,
    pub pairs: Vec<TypeDefinition<2>>,
}

impl InteractionTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: InteractionKind) -> usize {
        match kind {
            InteractionKind::Bond => self.bonds.len(),
            InteractionKind::Angle => self.angles.len(),
            InteractionKind::Dihedral => self.dihedrals.len(),
            InteractionKind::Pair => self.pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        InteractionKind::ALL.iter().all(|k| self.count(*k) == 0)
    }
}
