use std::fmt;
use std::fs::File;
use std::io::{self as stdio, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;

use topo_forge::io::{
    read_h5md_snapshot, read_interaction_types, read_settings, read_toml_snapshot,
};
use topo_forge::ops::{GraphBuilder, TemplateIndex, TermEnumerator};
use topo_forge::{InteractionTypes, ParticleGraph, Settings, Snapshot, Terms};

pub mod convert;
pub mod info;

/// Snapshot formats understood by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SnapshotFormat {
    /// Single-frame TOML snapshot.
    #[value(name = "toml")]
    Toml,
    /// H5MD trajectory container.
    #[value(name = "h5md")]
    H5md,
}

impl SnapshotFormat {
    /// Attempts to infer a format from a file path extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "h5" | "h5md" | "hdf5" => Some(Self::H5md),
            _ => None,
        }
    }
}

impl fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotFormat::Toml => write!(f, "TOML"),
            SnapshotFormat::H5md => write!(f, "H5MD"),
        }
    }
}

/// Input locations shared by every subcommand.
#[derive(Debug, Clone)]
pub struct InputParameters {
    pub snapshot: PathBuf,
    pub settings: PathBuf,
    pub itp: PathBuf,
    pub format: Option<SnapshotFormat>,
    pub frame: i64,
}

/// Parsed inputs of one conversion.
pub struct Inputs {
    pub settings: Settings,
    pub types: InteractionTypes,
    pub snapshot: Snapshot,
}

/// Everything derived from the inputs before serialization.
pub struct Derivation {
    pub graph: ParticleGraph,
    pub index: TemplateIndex,
    pub terms: Terms,
}

/// Reads settings, interaction types, and the requested snapshot frame.
pub fn load_inputs(params: &InputParameters) -> Result<Inputs> {
    let settings = read_settings(open(&params.settings)?).with_context(|| {
        format!(
            "Failed to parse settings from {}",
            params.settings.display()
        )
    })?;

    let types = read_interaction_types(open(&params.itp)?).with_context(|| {
        format!(
            "Failed to parse interaction types from {}",
            params.itp.display()
        )
    })?;

    let format = resolve_snapshot_format(params)?;
    let snapshot = match format {
        SnapshotFormat::Toml => read_toml_snapshot(open(&params.snapshot)?),
        SnapshotFormat::H5md => read_h5md_snapshot(&params.snapshot, &settings.h5md, params.frame),
    }
    .with_context(|| {
        format!(
            "Failed to read {} snapshot from {}",
            format,
            params.snapshot.display()
        )
    })?;

    Ok(Inputs {
        settings,
        types,
        snapshot,
    })
}

/// Builds the graph and template index, then enumerates all bonded terms.
pub fn derive(inputs: &Inputs, chunk_size: usize) -> Result<Derivation> {
    let graph = run_with_spinner("Building particle graph", || {
        GraphBuilder::from_snapshot(&inputs.snapshot, &inputs.settings)
            .and_then(GraphBuilder::build)
            .context("Failed to build particle graph")
    })?;

    let index = TemplateIndex::build(&inputs.types, &inputs.settings)
        .context("Failed to index interaction templates")?;

    let terms = run_with_spinner("Enumerating bonded terms", || {
        TermEnumerator::new(&graph, &index)
            .chunk_size(chunk_size)
            .enumerate()
            .context("Failed to enumerate bonded terms")
    })?;

    Ok(Derivation {
        graph,
        index,
        terms,
    })
}

fn resolve_snapshot_format(params: &InputParameters) -> Result<SnapshotFormat> {
    if let Some(explicit) = params.format {
        return Ok(explicit);
    }
    SnapshotFormat::from_path(&params.snapshot).ok_or_else(|| {
        anyhow!(
            "Unable to infer snapshot format from '{}'. Please specify --format.",
            params.snapshot.display()
        )
    })
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open input file {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Creates `path` and hands a buffered writer to `write`, flushing afterwards.
pub fn write_file<F>(path: &Path, what: &str, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).with_context(|| format!("Failed to write {} to {}", what, path.display()))?;
    writer.flush().context("Failed to flush output writer")?;
    Ok(())
}

/// Wraps long-running operations with a spinner rendered to stderr.
///
/// The spinner is skipped when stderr is not a terminal so redirected logs stay clean.
pub fn run_with_spinner<T, F>(message: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    if !stdio::stderr().is_terminal() {
        return work();
    }

    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    let result = work();

    match &result {
        Ok(_) => spinner.finish_with_message(format!("{} ✓", message)),
        Err(_) => spinner.abandon_with_message(format!("{} ✗", message)),
    }

    result
}
