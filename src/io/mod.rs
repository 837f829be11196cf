//! Readers and writers for the files around the topology derivation core.
//!
//! Inputs are the XML conversion settings, GROMACS interaction-type include files, and
//! particle snapshots (TOML, or H5MD with the `h5md` feature). Outputs are GROMACS topology
//! (`.top`) and coordinate (`.gro`) files. All functions share one error type carrying the
//! offending path or line where known.

mod error;

mod settings {
    pub mod reader;
}

mod itp {
    pub mod reader;
}

mod snapshot {
    pub mod reader;
}

#[cfg(feature = "h5md")]
mod h5md {
    pub mod reader;
}

mod top {
    pub mod writer;
}

mod gro {
    pub mod writer;
}

pub use settings::reader::read as read_settings;

pub use itp::reader::read as read_interaction_types;

pub use snapshot::reader::read as read_toml_snapshot;

#[cfg(feature = "h5md")]
pub use h5md::reader::read as read_h5md_snapshot;

pub use top::writer::{TopologyHeader, write as write_topology};

pub use gro::writer::write as write_coordinates;

pub use error::Error;

/// Stand-in used when the crate is built without HDF5 support.
#[cfg(not(feature = "h5md"))]
pub fn read_h5md_snapshot(
    path: &std::path::Path,
    _layout: &crate::model::settings::H5mdLayout,
    _frame: i64,
) -> Result<crate::model::snapshot::Snapshot, Error> {
    Err(Error::unsupported_format(
        Some(path.to_path_buf()),
        "H5MD input requires building with the `h5md` feature",
    ))
}
