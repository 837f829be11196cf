//! Turns enumerated terms into an emission-ready [`Topology`].

use crate::model::{
    graph::ParticleGraph,
    settings::Settings,
    term::Terms,
    topology::{MoleculeSummary, Topology, TopologyAtom},
    types::{InteractionKind, ParameterRecord, ParticleId, TemplateId},
};
use crate::ops::error::Error;
use crate::ops::index::{TemplateIndex, TemplateTable};
use std::collections::BTreeMap;

/// Resolves template ids to parameter records and attaches per-atom labels.
pub struct TopologyAssembler<'a> {
    graph: &'a ParticleGraph,
    index: &'a TemplateIndex,
    settings: &'a Settings,
}

impl<'a> TopologyAssembler<'a> {
    pub fn new(graph: &'a ParticleGraph, index: &'a TemplateIndex, settings: &'a Settings) -> Self {
        Self {
            graph,
            index,
            settings,
        }
    }

    /// Builds the topology for `terms`.
    ///
    /// # Arguments
    ///
    /// * `terms` - Output of [`TermEnumerator::enumerate`](crate::ops::TermEnumerator::enumerate)
    ///   for the same graph and index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTemplate`] if a term references a template id that the index
    /// does not hold, which only happens when terms and index come from different runs.
    pub fn assemble(&self, terms: &Terms) -> Result<Topology, Error> {
        let atoms = self
            .graph
            .particles()
            .iter()
            .map(|p| TopologyAtom {
                id: p.id,
                type_name: p.labels.type_name.clone(),
                chain_idx: p.labels.chain_idx,
                res_name: p.labels.res_name.clone(),
                name: p.labels.name.clone(),
                cgnr: p.id,
                charge: p.charge_or_default(),
                mass: p.mass,
                position: p.position,
            })
            .collect();

        let molecule_types = self
            .settings
            .molecules()
            .iter()
            .map(|m| MoleculeSummary {
                name: m.name.clone(),
                size: m.size,
                nrexcl: m.nrexcl,
                nrmols: m.nrmols,
            })
            .collect();

        Ok(Topology {
            atoms,
            bonds: resolve(&self.index.bonds, terms.bonds.iter().map(|t| (t.ids, t.template)))?,
            angles: resolve(
                &self.index.angles,
                terms.angles.iter().map(|t| (t.ids, t.template)),
            )?,
            dihedrals: resolve(
                &self.index.dihedrals,
                terms.dihedrals.iter().map(|t| (t.ids, t.template)),
            )?,
            pairs: resolve(&self.index.pairs, terms.pairs.iter().map(|t| (t.ids, t.template)))?,
            molecule_types,
            box_edges: self.graph.box_edges(),
        })
    }
}

fn resolve<const N: usize, const M: usize>(
    table: &TemplateTable<N>,
    terms: impl Iterator<Item = ([ParticleId; M], TemplateId)>,
) -> Result<BTreeMap<[ParticleId; M], ParameterRecord>, Error> {
    terms
        .map(|(ids, template)| {
            let record = table
                .record(template)
                .ok_or_else(|| unknown_template(table.kind(), template))?;
            Ok((ids, record.clone()))
        })
        .collect()
}

fn unknown_template(kind: InteractionKind, template: TemplateId) -> Error {
    Error::UnknownTemplate { kind, template }
}
