use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{Table, format, row};

use topo_forge::InteractionKind;

use crate::commands::{InputParameters, derive, load_inputs};

/// Report-only command that summarizes the inputs and the derived terms.
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Number of start particles scanned per parallel task.
    #[arg(long = "chunk-size", default_value_t = 100)]
    pub chunk_size: usize,
}

/// Loads the inputs, enumerates terms, and prints summary tables to stderr.
pub fn run(params: &InputParameters, args: &InfoArgs) -> Result<()> {
    let inputs = load_inputs(params)?;
    let derived = derive(&inputs, args.chunk_size)?;

    let stderr = io::stderr();
    let mut stderr = stderr.lock();

    print_boxed_label(&mut stderr, "TopoForge System Report")?;
    writeln!(&mut stderr)?;

    print_boxed_label(&mut stderr, "Molecule Types")?;
    let mut molecule_table = Table::new();
    molecule_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    molecule_table.set_titles(row!["Name", "Size", "nrexcl", "Instances"]);
    for molecule in inputs.settings.molecules() {
        molecule_table.add_row(row![
            molecule.name,
            molecule.size,
            molecule.nrexcl,
            molecule.nrmols
        ]);
    }
    molecule_table
        .print(&mut stderr)
        .context("Failed to render molecule summary")?;
    writeln!(&mut stderr)?;

    print_boxed_label(&mut stderr, "Interaction Terms")?;
    let mut term_table = Table::new();
    term_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    term_table.set_titles(row!["Kind", "Definitions", "Templates", "Terms"]);
    for kind in InteractionKind::ALL {
        term_table.add_row(row![
            kind.name(),
            inputs.types.count(kind),
            derived.index.count(kind),
            derived.terms.count(kind)
        ]);
    }
    term_table
        .print(&mut stderr)
        .context("Failed to render term summary")?;
    writeln!(&mut stderr)?;

    print_boxed_label(&mut stderr, "System Summary")?;
    let mut summary_table = Table::new();
    summary_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    summary_table.set_titles(row!["Metric", "Value"]);
    summary_table.add_row(row!["Snapshot Rows", inputs.snapshot.particle_count()]);
    summary_table.add_row(row!["Particles", derived.graph.particle_count()]);
    summary_table.add_row(row!["Edges", derived.graph.edge_count()]);
    summary_table.add_row(row!["Particle Types", inputs.settings.type_count()]);
    let b = derived.graph.box_edges();
    summary_table.add_row(row![
        "Box Edges",
        format!("{:.3} × {:.3} × {:.3}", b.x, b.y, b.z)
    ]);
    summary_table
        .print(&mut stderr)
        .context("Failed to render system summary")?;

    Ok(())
}

fn print_boxed_label<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    let inner = format!(" {title} ");
    let width = inner.chars().count();
    writeln!(writer, "╭{}╮", "─".repeat(width))?;
    writeln!(writer, "│{}│", inner)?;
    writeln!(writer, "╰{}╯", "─".repeat(width))?;
    Ok(())
}
