//! Symmetric lookup tables from particle-type tuples to interaction templates.
//!
//! Every accepted definition is stored under its forward and its reversed type-id tuple, so a
//! single hash probe resolves a query in either orientation. Template ids are dense and
//! 1-based per interaction kind, in definition order.

use crate::model::{
    settings::Settings,
    template::{InteractionTypes, TypeDefinition},
    types::{InteractionKind, ParameterRecord, TemplateId, TypeId},
};
use crate::ops::error::Error;
use std::collections::HashMap;

/// Lookup table for one interaction kind of arity `N`.
#[derive(Debug, Clone)]
pub struct TemplateTable<const N: usize> {
    kind: InteractionKind,
    keys: HashMap<[TypeId; N], TemplateId>,
    records: Vec<ParameterRecord>,
}

impl<const N: usize> TemplateTable<N> {
    pub fn new(kind: InteractionKind) -> Self {
        debug_assert_eq!(kind.arity(), N);
        Self {
            kind,
            keys: HashMap::new(),
            records: Vec::new(),
        }
    }

    /// Registers a template under `types` and its reversal.
    ///
    /// # Arguments
    ///
    /// * `types` - Ordered type-id tuple the template applies to.
    /// * `record` - Parameter payload, stored verbatim.
    /// * `label` - Human-readable type names used in error messages.
    ///
    /// # Returns
    ///
    /// The template id now bound to `types`. Re-inserting an identical record under the same
    /// key returns the existing id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousTemplate`] if the key (in either orientation) is already
    /// bound to a different record.
    pub fn insert(
        &mut self,
        types: [TypeId; N],
        record: ParameterRecord,
        label: &str,
    ) -> Result<TemplateId, Error> {
        if let Some(existing) = self.lookup(&types) {
            if self.records[existing - 1] == record {
                return Ok(existing);
            }
            return Err(Error::ambiguous_template(self.kind, label));
        }

        self.records.push(record);
        let id = self.records.len();

        let mut reversed = types;
        reversed.reverse();
        self.keys.insert(types, id);
        self.keys.insert(reversed, id);

        Ok(id)
    }

    /// Resolves a type tuple in either orientation.
    pub fn lookup(&self, types: &[TypeId; N]) -> Option<TemplateId> {
        self.keys.get(types).copied()
    }

    /// Parameter record of a template id, if the id belongs to this table.
    pub fn record(&self, template: TemplateId) -> Option<&ParameterRecord> {
        template
            .checked_sub(1)
            .and_then(|idx| self.records.get(idx))
    }

    pub fn kind(&self) -> InteractionKind {
        self.kind
    }

    /// Number of distinct templates.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The four per-kind template tables used by the enumerator and the assembler.
#[derive(Debug, Clone)]
pub struct TemplateIndex {
    pub bonds: TemplateTable<2>,
    pub angles: TemplateTable<3>,
    pub dihedrals: TemplateTable<4>,
    pub pairs: TemplateTable<2>,
}

impl Default for TemplateIndex {
    fn default() -> Self {
        Self {
            bonds: TemplateTable::new(InteractionKind::Bond),
            angles: TemplateTable::new(InteractionKind::Angle),
            dihedrals: TemplateTable::new(InteractionKind::Dihedral),
            pairs: TemplateTable::new(InteractionKind::Pair),
        }
    }
}

impl TemplateIndex {
    /// Builds all tables, translating template type names to type ids via `settings`.
    ///
    /// Definitions naming a type that the settings do not declare can never match a
    /// particle and are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousTemplate`] when two definitions with different records
    /// share a type tuple (in either orientation).
    pub fn build(types: &InteractionTypes, settings: &Settings) -> Result<Self, Error> {
        let mut index = Self::default();

        fill_table(&mut index.bonds, &types.bonds, settings)?;
        fill_table(&mut index.angles, &types.angles, settings)?;
        fill_table(&mut index.dihedrals, &types.dihedrals, settings)?;
        fill_table(&mut index.pairs, &types.pairs, settings)?;

        log::debug!(
            "Template index: {} bond, {} angle, {} dihedral, {} pair templates",
            index.bonds.len(),
            index.angles.len(),
            index.dihedrals.len(),
            index.pairs.len()
        );

        Ok(index)
    }

    pub fn count(&self, kind: InteractionKind) -> usize {
        match kind {
            InteractionKind::Bond => self.bonds.len(),
            InteractionKind::Angle => self.angles.len(),
            InteractionKind::Dihedral => self.dihedrals.len(),
            InteractionKind::Pair => self.pairs.len(),
        }
    }
}

fn fill_table<const N: usize>(
    table: &mut TemplateTable<N>,
    definitions: &[TypeDefinition<N>],
    settings: &Settings,
) -> Result<(), Error> {
    for definition in definitions {
        let Some(types) = resolve_names(&definition.type_names, settings) else {
            log::debug!(
                "Skipping {} template {}: type not declared in settings",
                table.kind(),
                definition.label()
            );
            continue;
        };
        table.insert(types, definition.params.clone(), &definition.label())?;
    }
    Ok(())
}

fn resolve_names<const N: usize>(
    names: &[smol_str::SmolStr; N],
    settings: &Settings,
) -> Option<[TypeId; N]> {
    let mut types = [0; N];
    for (slot, name) in types.iter_mut().zip(names) {
        *slot = settings.type_id(name)?;
    }
    Some(types)
}
