//! Conversion settings: type naming, molecule layout, and snapshot group locations.
//!
//! A [`Settings`] value is produced by the settings reader and consulted by molecule
//! labeling (type names, name sequences), the template index (type name → type id), and the
//! topology assembler (molecule-type summaries).

use super::types::TypeId;
use smol_str::SmolStr;
use std::collections::HashMap;

/// Naming information for one particle type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// Molecule type the particle type belongs to.
    pub chain_name: SmolStr,
    /// Force-field type name as used in the interaction-type definitions.
    pub type_name: SmolStr,
}

/// Declared properties of a molecule type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoleculeProperties {
    pub name: String,
    /// Number of particles in one molecule instance.
    pub size: usize,
    /// Bonded-exclusion depth.
    pub nrexcl: u32,
    /// Number of molecule instances in the system.
    pub nrmols: usize,
}

/// Atom and residue names for a molecule whose particles carry a given type sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSequence {
    pub atom_names: Vec<SmolStr>,
    pub res_name: SmolStr,
}

/// Location of particle and connectivity data inside an H5MD container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct H5mdLayout {
    /// Particle group under `/particles`.
    pub atom_group: String,
    /// Group names under `/connectivity`.
    pub connection_groups: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    types: HashMap<TypeId, TypeInfo>,
    name_to_type: HashMap<SmolStr, TypeId>,
    molecules: Vec<MoleculeProperties>,
    name_sequences: HashMap<SmolStr, HashMap<Vec<TypeId>, NameSequence>>,
    pub h5md: H5mdLayout,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a particle type.
    ///
    /// # Returns
    ///
    /// `false` (and leaves the settings untouched) when the type name is already taken.
    pub fn add_type(
        &mut self,
        type_id: TypeId,
        chain_name: impl Into<SmolStr>,
        type_name: impl Into<SmolStr>,
    ) -> bool {
        let type_name = type_name.into();
        if self.name_to_type.contains_key(&type_name) {
            return false;
        }
        self.name_to_type.insert(type_name.clone(), type_id);
        self.types.insert(
            type_id,
            TypeInfo {
                chain_name: chain_name.into(),
                type_name,
            },
        );
        true
    }

    /// Registers a molecule type, replacing an earlier declaration with the same name.
    pub fn add_molecule(&mut self, properties: MoleculeProperties) {
        if let Some(existing) = self
            .molecules
            .iter_mut()
            .find(|m| m.name == properties.name)
        {
            *existing = properties;
        } else {
            self.molecules.push(properties);
        }
    }

    /// Registers a name sequence for a molecule type.
    ///
    /// # Returns
    ///
    /// `false` when the same type sequence was already registered for `chain_name`.
    pub fn add_name_sequence(
        &mut self,
        chain_name: impl Into<SmolStr>,
        type_seq: Vec<TypeId>,
        sequence: NameSequence,
    ) -> bool {
        let per_chain = self.name_sequences.entry(chain_name.into()).or_default();
        if per_chain.contains_key(&type_seq) {
            return false;
        }
        per_chain.insert(type_seq, sequence);
        true
    }

    pub fn type_info(&self, type_id: TypeId) -> Option<&TypeInfo> {
        self.types.get(&type_id)
    }

    pub fn type_id(&self, type_name: &str) -> Option<TypeId> {
        self.name_to_type.get(type_name).copied()
    }

    pub fn molecule(&self, name: &str) -> Option<&MoleculeProperties> {
        self.molecules.iter().find(|m| m.name == name)
    }

    /// Molecule types in declaration order.
    pub fn molecules(&self) -> &[MoleculeProperties] {
        &self.molecules
    }

    pub fn name_sequence(&self, chain_name: &str, type_seq: &[TypeId]) -> Option<&NameSequence> {
        self.name_sequences
            .get(chain_name)
            .and_then(|per_chain| per_chain.get(type_seq))
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_type_rejects_duplicate_names() {
        let mut settings = Settings::new();

        assert!(settings.add_type(0, "PE", "CH3"));
        assert!(!settings.add_type(1, "PE", "CH3"));
        assert_eq!(settings.type_id("CH3"), Some(0));
        assert!(settings.type_info(1).is_none());
    }

    #[test]
    fn type_lookup_works_both_directions() {
        let mut settings = Settings::new();
        settings.add_type(3, "WAT", "OW");

        let info = settings.type_info(3).unwrap();
        assert_eq!(info.chain_name, "WAT");
        assert_eq!(info.type_name, "OW");
        assert_eq!(settings.type_id("OW"), Some(3));
        assert_eq!(settings.type_id("HW"), None);
    }

    #[test]
    fn molecules_keep_declaration_order() {
        let mut settings = Settings::new();
        for name in ["PE", "WAT", "ION"] {
            settings.add_molecule(MoleculeProperties {
                name: name.into(),
                size: 1,
                nrexcl: 3,
                nrmols: 1,
            });
        }

        let names: Vec<_> = settings.molecules().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["PE", "WAT", "ION"]);
        assert_eq!(settings.molecule("WAT").unwrap().nrexcl, 3);
    }

    #[test]
    fn name_sequences_are_keyed_by_chain_and_types() {
        let mut settings = Settings::new();
        let seq = NameSequence {
            atom_names: vec!["C1".into(), "C2".into()],
            res_name: "ETH".into(),
        };

        assert!(settings.add_name_sequence("ETH", vec![0, 0], seq.clone()));
        assert!(!settings.add_name_sequence("ETH", vec![0, 0], seq.clone()));

        assert_eq!(settings.name_sequence("ETH", &[0, 0]), Some(&seq));
        assert!(settings.name_sequence("ETH", &[0, 1]).is_none());
        assert!(settings.name_sequence("PE", &[0, 0]).is_none());
    }
}
