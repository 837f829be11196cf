use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

mod commands;

use commands::{InputParameters, SnapshotFormat};
use commands::{convert, info};

#[derive(Parser, Debug)]
#[command(
    name = "topoforge",
    about = "Derives bonded force-field terms from a simulation snapshot and writes GROMACS topology and coordinate files.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// Snapshot holding particle records and connectivity (TOML or H5MD).
    #[arg(short = 'i', long = "snapshot", value_name = "FILE", global = true)]
    snapshot: Option<PathBuf>,
    /// Interaction-type include file with bond, angle, dihedral, and pair templates.
    #[arg(long = "itp", value_name = "FILE", global = true)]
    itp: Option<PathBuf>,
    /// XML settings describing particle types, molecules, and name sequences.
    #[arg(short = 's', long = "settings", value_name = "FILE", global = true)]
    settings: Option<PathBuf>,
    /// Force the snapshot format (toml or h5md).
    #[arg(long = "format", value_enum, global = true)]
    format: Option<SnapshotFormat>,
    /// Frame to read from a trajectory; negative values count from the end.
    #[arg(
        long = "frame",
        default_value_t = -1,
        allow_negative_numbers = true,
        global = true
    )]
    frame: i64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a .top topology and a .gro coordinate file.
    Convert(convert::ConvertArgs),
    /// Summarize inputs and derived terms without writing files.
    Info(info::InfoArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let params = InputParameters {
        snapshot: required(cli.snapshot, "--snapshot")?,
        settings: required(cli.settings, "--settings")?,
        itp: required(cli.itp, "--itp")?,
        format: cli.format,
        frame: cli.frame,
    };

    match cli.command {
        Command::Convert(args) => convert::run(&params, &args)?,
        Command::Info(args) => info::run(&params, &args)?,
    }

    Ok(())
}

fn required(value: Option<PathBuf>, flag: &str) -> Result<PathBuf> {
    value.ok_or_else(|| anyhow::anyhow!("Missing required argument {flag}"))
}
