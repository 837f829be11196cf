use crate::io::error::Error;
use crate::model::{
    topology::Topology,
    types::{InteractionKind, ParameterRecord, ParticleId},
};
use std::collections::BTreeMap;
use std::io::Write;

/// Provenance and include directives written ahead of the topology sections.
#[derive(Debug, Clone, Default)]
pub struct TopologyHeader {
    /// `(name, value)` pairs echoed as comments, e.g. input file names and the frame.
    pub parameters: Vec<(String, String)>,
    /// Interaction-type file pulled in with `#include`.
    pub include: Option<String>,
}

const DEFAULTS: (u8, u8, &str, f64, f64) = (1, 1, "no", 0.0, 0.0);

/// Writes `topology` as a GROMACS `.top` file.
///
/// Sections are emitted in the order `defaults`, `moleculetype`, `atoms`, `bonds`, `pairs`,
/// `angles`, `dihedrals`, `system`, `molecules`; empty interaction sections are omitted.
/// Each interaction line lists its participant ids followed by the functional form and the
/// coefficients of its template.
pub fn write<W: Write>(
    writer: W,
    topology: &Topology,
    header: &TopologyHeader,
) -> Result<(), Error> {
    let mut ctx = WriterContext { writer };

    ctx.write_header(header)?;
    ctx.write_defaults()?;

    if let Some(include) = &header.include {
        ctx.line(format_args!("#include \"{}\"", include))?;
        ctx.line(format_args!(""))?;
    }

    ctx.write_molecule_types(topology)?;
    ctx.write_atoms(topology)?;

    ctx.write_terms(InteractionKind::Bond, &topology.bonds)?;
    ctx.write_terms(InteractionKind::Pair, &topology.pairs)?;
    ctx.write_terms(InteractionKind::Angle, &topology.angles)?;
    ctx.write_terms(InteractionKind::Dihedral, &topology.dihedrals)?;

    ctx.write_system(topology)?;

    ctx.writer.flush().map_err(|e| Error::from_io(e, None))
}

struct WriterContext<W> {
    writer: W,
}

impl<W: Write> WriterContext<W> {
    fn line(&mut self, args: std::fmt::Arguments<'_>) -> Result<(), Error> {
        writeln!(self.writer, "{}", args).map_err(|e| Error::from_io(e, None))
    }

    fn write_header(&mut self, header: &TopologyHeader) -> Result<(), Error> {
        self.line(format_args!("; GROMACS topology generated by topoforge"))?;
        if !header.parameters.is_empty() {
            self.line(format_args!("; parameters:"))?;
            for (name, value) in &header.parameters {
                self.line(format_args!(";    {}: {}", name, value))?;
            }
        }
        self.line(format_args!(""))
    }

    fn write_defaults(&mut self) -> Result<(), Error> {
        let (nbfunc, comb_rule, gen_pairs, fudge_lj, fudge_qq) = DEFAULTS;
        log::warn!(
            "[ defaults ] section is fixed to nbfunc={} comb-rule={} gen-pairs={} fudgeLJ={:.1} fudgeQQ={:.1}",
            nbfunc,
            comb_rule,
            gen_pairs,
            fudge_lj,
            fudge_qq
        );

        self.line(format_args!("[ defaults ]"))?;
        self.line(format_args!("; nbfunc  comb-rule  gen-pairs  fudgeLJ  fudgeQQ"))?;
        self.line(format_args!(
            "{:<8}{:<11}{:<11}{:<9.1}{:.1}",
            nbfunc, comb_rule, gen_pairs, fudge_lj, fudge_qq
        ))?;
        self.line(format_args!(""))
    }

    fn write_molecule_types(&mut self, topology: &Topology) -> Result<(), Error> {
        self.line(format_args!("[ moleculetype ]"))?;
        self.line(format_args!("; name  nrexcl"))?;
        for molecule in &topology.molecule_types {
            self.line(format_args!("{}  {}", molecule.name, molecule.nrexcl))?;
        }
        self.line(format_args!(""))
    }

    fn write_atoms(&mut self, topology: &Topology) -> Result<(), Error> {
        self.line(format_args!("[ atoms ]"))?;
        self.line(format_args!(
            ";{:>5} {:>8} {:>6} {:>6} {:>6} {:>6} {:>10} {:>10}",
            "id", "type", "resnr", "res", "atom", "cgnr", "charge", "mass"
        ))?;
        for atom in &topology.atoms {
            self.line(format_args!(
                "{:>6} {:>8} {:>6} {:>6} {:>6} {:>6} {:>10.4} {:>10.4}",
                atom.id,
                atom.type_name,
                atom.chain_idx,
                atom.res_name,
                atom.name,
                atom.cgnr,
                atom.charge,
                atom.mass
            ))?;
        }
        self.line(format_args!(""))
    }

    fn write_terms<const N: usize>(
        &mut self,
        kind: InteractionKind,
        terms: &BTreeMap<[ParticleId; N], ParameterRecord>,
    ) -> Result<(), Error> {
        if terms.is_empty() {
            return Ok(());
        }

        self.line(format_args!("[ {} ]", kind.section()))?;
        for (ids, record) in terms {
            let participants: Vec<String> = ids.iter().map(|id| format!("{:>6}", id)).collect();
            self.line(format_args!("{} {}", participants.join(" "), record))?;
        }
        self.line(format_args!(""))
    }

    fn write_system(&mut self, topology: &Topology) -> Result<(), Error> {
        self.line(format_args!("[ system ]"))?;
        self.line(format_args!("{}", topology.system_name().unwrap_or("system")))?;
        self.line(format_args!(""))?;

        self.line(format_args!("[ molecules ]"))?;
        self.line(format_args!("; name  count"))?;
        for molecule in &topology.molecule_types {
            self.line(format_args!("{}  {}", molecule.name, molecule.nrmols))?;
        }
        Ok(())
    }
}
