//! Molecule labeling: turns raw snapshot records into named [`Particle`]s.
//!
//! Particles are walked in snapshot order in molecule-sized chunks. The molecule type of a
//! chunk is the chain of its first particle's type, its length is that molecule type's
//! declared size, and the chunk's ordered type sequence selects the atom and residue names.
//! Every molecule type keeps its own 1-based instance counter, which becomes the residue
//! number in the emitted topology.

use crate::model::{
    particle::{Particle, ParticleLabels},
    settings::Settings,
    snapshot::{ParticleRecord, Snapshot},
    types::{ParticleId, Point, TypeId},
};
use crate::ops::error::Error;
use smol_str::SmolStr;
use std::collections::HashMap;

/// Resolves types and names for every non-padding particle in `snapshot`.
///
/// # Arguments
///
/// * `snapshot` - Raw frame data; padding rows are skipped.
/// * `settings` - Type table, molecule declarations, and name sequences.
///
/// # Returns
///
/// Labeled particles in snapshot order.
///
/// # Errors
///
/// Returns [`Error::UnknownType`] for undeclared species, [`Error::MissingMolecule`] for
/// undeclared molecule types, [`Error::IncompleteMolecule`] when the snapshot ends inside a
/// molecule, and [`Error::MissingNameSequence`] when no name sequence matches a chunk.
pub fn label_particles(snapshot: &Snapshot, settings: &Settings) -> Result<Vec<Particle>, Error> {
    let typed = resolve_types(snapshot, settings)?;

    let mut instance_counters: HashMap<SmolStr, usize> = HashMap::new();
    let mut particles = Vec::with_capacity(typed.len());
    let mut start = 0;

    while start < typed.len() {
        let (_, first_id, first_type) = typed[start];
        let chain_name = chain_of(settings, first_type);

        let molecule = settings
            .molecule(&chain_name)
            .ok_or_else(|| Error::MissingMolecule {
                chain_name: chain_name.to_string(),
            })?;

        let available = typed.len() - start;
        if molecule.size == 0 || molecule.size > available {
            return Err(Error::incomplete_molecule(
                chain_name.as_str(),
                first_id,
                molecule.size,
                available,
            ));
        }
        let end = start + molecule.size;

        let type_seq: Vec<TypeId> = typed[start..end].iter().map(|t| t.2).collect();
        let names = settings
            .name_sequence(&chain_name, &type_seq)
            .ok_or_else(|| Error::missing_name_sequence(chain_name.as_str(), type_seq.clone()))?;

        let counter = instance_counters.entry(chain_name.clone()).or_insert(0);
        *counter += 1;

        for (offset, &(record, id, type_id)) in typed[start..end].iter().enumerate() {
            let (own_chain, type_name) = settings
                .type_info(type_id)
                .map(|info| (info.chain_name.clone(), info.type_name.clone()))
                .unwrap_or_default();

            let labels = ParticleLabels {
                name: names
                    .atom_names
                    .get(offset)
                    .cloned()
                    .unwrap_or_else(|| type_name.clone()),
                type_name,
                res_name: names.res_name.clone(),
                chain_name: own_chain,
                chain_idx: *counter,
            };

            particles.push(
                Particle::new(id, type_id)
                    .with_mass(record.mass)
                    .with_charge(record.charge)
                    .with_position(Point::from(record.position))
                    .with_labels(labels),
            );
        }

        start = end;
    }

    log::debug!(
        "Labeled {} particles in {} molecule instances",
        particles.len(),
        instance_counters.values().sum::<usize>()
    );

    Ok(particles)
}

fn resolve_types<'a>(
    snapshot: &'a Snapshot,
    settings: &Settings,
) -> Result<Vec<(&'a ParticleRecord, ParticleId, TypeId)>, Error> {
    snapshot
        .particles
        .iter()
        .filter(|r| !r.is_padding())
        .map(|record| {
            let id = record.id as ParticleId;
            let type_id = TypeId::try_from(record.species)
                .ok()
                .filter(|t| settings.type_info(*t).is_some())
                .ok_or(Error::UnknownType {
                    id,
                    species: record.species,
                })?;
            Ok((record, id, type_id))
        })
        .collect()
}

fn chain_of(settings: &Settings, type_id: TypeId) -> SmolStr {
    settings
        .type_info(type_id)
        .map(|info| info.chain_name.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::settings::{MoleculeProperties, NameSequence};
    use crate::model::snapshot::ParticleRecord;

    fn record(id: i64, species: i64) -> ParticleRecord {
        ParticleRecord {
            id,
            species,
            mass: 1.0 + species as f64,
            position: [0.1 * id as f64, 0.0, 0.0],
            charge: None,
        }
    }

    fn water_and_ethane_settings() -> Settings {
        let mut settings = Settings::new();
        settings.add_type(0, "ETH", "CT");
        settings.add_type(1, "WAT", "OW");
        settings.add_type(2, "WAT", "HW");
        settings.add_molecule(MoleculeProperties {
            name: "ETH".into(),
            size: 2,
            nrexcl: 3,
            nrmols: 1,
        });
        settings.add_molecule(MoleculeProperties {
            name: "WAT".into(),
            size: 3,
            nrexcl: 2,
            nrmols: 2,
        });
        settings.add_name_sequence(
            "ETH",
            vec![0, 0],
            NameSequence {
                atom_names: vec!["C1".into(), "C2".into()],
                res_name: "ETH".into(),
            },
        );
        settings.add_name_sequence(
            "WAT",
            vec![1, 2, 2],
            NameSequence {
                atom_names: vec!["OW".into(), "HW1".into(), "HW2".into()],
                res_name: "SOL".into(),
            },
        );
        settings
    }

    #[test]
    fn labels_molecules_in_chunks_with_per_type_counters() {
        let settings = water_and_ethane_settings();
        let mut snapshot = Snapshot::new();
        snapshot.particles = vec![
            record(1, 1),
            record(2, 2),
            record(3, 2),
            record(4, 0),
            record(5, 0),
            record(6, 1),
            record(7, 2),
            record(8, 2),
        ];

        let particles = label_particles(&snapshot, &settings).unwrap();
        assert_eq!(particles.len(), 8);

        let names: Vec<_> = particles.iter().map(|p| p.labels.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["OW", "HW1", "HW2", "C1", "C2", "OW", "HW1", "HW2"]
        );

        let chain_idx: Vec<_> = particles.iter().map(|p| p.labels.chain_idx).collect();
        assert_eq!(chain_idx, vec![1, 1, 1, 1, 1, 2, 2, 2]);

        assert_eq!(particles[3].labels.res_name, "ETH");
        assert_eq!(particles[3].labels.type_name, "CT");
        assert_eq!(particles[6].labels.res_name, "SOL");
        assert_eq!(particles[6].mass, 3.0);
    }

    #[test]
    fn padding_rows_are_skipped() {
        let settings = water_and_ethane_settings();
        let mut snapshot = Snapshot::new();
        snapshot.particles = vec![record(1, 0), record(2, 0), record(-1, -1), record(-1, -1)];

        let particles = label_particles(&snapshot, &settings).unwrap();
        let ids: Vec<_> = particles.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn errors_on_undeclared_species() {
        let settings = water_and_ethane_settings();
        let mut snapshot = Snapshot::new();
        snapshot.particles = vec![record(1, 9)];

        let result = label_particles(&snapshot, &settings);
        assert!(matches!(
            result,
            Err(Error::UnknownType { id: 1, species: 9 })
        ));
    }

    #[test]
    fn errors_when_snapshot_ends_inside_a_molecule() {
        let settings = water_and_ethane_settings();
        let mut snapshot = Snapshot::new();
        snapshot.particles = vec![record(1, 1), record(2, 2)];

        let result = label_particles(&snapshot, &settings);
        assert!(matches!(
            result,
            Err(Error::IncompleteMolecule {
                start: 1,
                expected: 3,
                available: 2,
                ..
            })
        ));
    }

    #[test]
    fn errors_when_type_sequence_has_no_names() {
        let settings = water_and_ethane_settings();
        let mut snapshot = Snapshot::new();
        snapshot.particles = vec![record(1, 1), record(2, 1), record(3, 2)];

        let result = label_particles(&snapshot, &settings);
        match result {
            Err(Error::MissingNameSequence { chain_name, types }) => {
                assert_eq!(chain_name, "WAT");
                assert_eq!(types, vec![1, 1, 2]);
            }
            other => panic!("expected MissingNameSequence, got {other:?}"),
        }
    }

    #[test]
    fn errors_when_molecule_type_is_undeclared() {
        let mut settings = Settings::new();
        settings.add_type(0, "PE", "CH2");
        let mut snapshot = Snapshot::new();
        snapshot.particles = vec![record(1, 0)];

        let result = label_particles(&snapshot, &settings);
        assert!(matches!(result, Err(Error::MissingMolecule { .. })));
    }
}
