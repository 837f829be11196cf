use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use topo_forge::io::{TopologyHeader, write_coordinates, write_topology};
use topo_forge::ops::TopologyAssembler;

use crate::commands::{InputParameters, derive, load_inputs, run_with_spinner, write_file};

/// Writes a GROMACS topology and coordinate file for one snapshot frame.
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Destination of the `.top` topology.
    #[arg(long = "out", value_name = "FILE", default_value = "topol.top")]
    pub out: PathBuf,
    /// Destination of the `.gro` coordinate file.
    #[arg(long = "out-coordinate", value_name = "FILE", default_value = "conf.gro")]
    pub out_coordinate: PathBuf,
    /// Number of start particles scanned per parallel task.
    #[arg(long = "chunk-size", default_value_t = 100)]
    pub chunk_size: usize,
}

/// Runs the full conversion; nothing is written unless every stage succeeds.
pub fn run(params: &InputParameters, args: &ConvertArgs) -> Result<()> {
    let inputs = load_inputs(params)?;
    let derived = derive(&inputs, args.chunk_size)?;

    let topology = run_with_spinner("Assembling topology", || {
        TopologyAssembler::new(&derived.graph, &derived.index, &inputs.settings)
            .assemble(&derived.terms)
            .context("Failed to assemble topology")
    })?;

    let header = TopologyHeader {
        parameters: vec![
            ("snapshot".into(), params.snapshot.display().to_string()),
            ("itp_file".into(), params.itp.display().to_string()),
            ("settings_file".into(), params.settings.display().to_string()),
            ("frame".into(), params.frame.to_string()),
        ],
        include: Some(include_directive(&params.itp)),
    };

    write_file(&args.out, "topology", |writer| {
        write_topology(writer, &topology, &header).map_err(Into::into)
    })?;

    let title = format!(
        "{} generated by topoforge (frame {})",
        topology.system_name().unwrap_or("system"),
        params.frame
    );
    write_file(&args.out_coordinate, "coordinates", |writer| {
        write_coordinates(writer, &topology, &title).map_err(Into::into)
    })?;

    log::info!(
        "Wrote {} and {}",
        args.out.display(),
        args.out_coordinate.display()
    );
    Ok(())
}

/// The interaction-type file is expected next to the generated topology.
fn include_directive(itp: &Path) -> String {
    let name = itp
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| itp.display().to_string());
    format!("./{}", name)
}
