use crate::io::error::Error;
use crate::model::topology::Topology;
use std::io::Write;

/// GRO numeric fields are five columns wide and wrap around.
const WRAP: u64 = 100_000;

/// Writes the atoms of `topology` with their positions as a GROMACS `.gro` file.
///
/// Residue and atom names longer than five characters are truncated; residue and atom
/// numbers wrap at 100000 as GROMACS tools expect.
pub fn write<W: Write>(mut writer: W, topology: &Topology, title: &str) -> Result<(), Error> {
    let io_err = |e| Error::from_io(e, None);

    writeln!(writer, "{}", title).map_err(io_err)?;
    writeln!(writer, "{:>5}", topology.atom_count()).map_err(io_err)?;

    for atom in &topology.atoms {
        writeln!(
            writer,
            "{:>5}{:<5}{:>5}{:>5}{:>8.3}{:>8.3}{:>8.3}",
            atom.chain_idx as u64 % WRAP,
            truncate(&atom.res_name),
            truncate(&atom.name),
            atom.id % WRAP,
            atom.position.x,
            atom.position.y,
            atom.position.z
        )
        .map_err(io_err)?;
    }

    let b = topology.box_edges;
    writeln!(writer, "{:>10.5}{:>10.5}{:>10.5}", b.x, b.y, b.z).map_err(io_err)?;

    writer.flush().map_err(io_err)
}

fn truncate(name: &str) -> &str {
    match name.char_indices().nth(5) {
        Some((pos, _)) => &name[..pos],
        None => name,
    }
}
