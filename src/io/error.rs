use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "I/O error for {path_desc}: {source}",
        path_desc = PathDisplay(path)
    )]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "failed to parse {format} {path_desc}: {details} (line {line_number})",
        path_desc = PathDisplay(path)
    )]
    Parse {
        format: &'static str,
        path: Option<PathBuf>,
        line_number: usize,
        details: String,
    },

    #[error(
        "inconsistent data in {format} {path_desc}: {details}",
        path_desc = PathDisplay(path)
    )]
    InconsistentData {
        format: &'static str,
        path: Option<PathBuf>,
        details: String,
    },

    #[error(
        "unsupported snapshot format for {path_desc}: {details}",
        path_desc = PathDisplay(path)
    )]
    UnsupportedFormat {
        path: Option<PathBuf>,
        details: String,
    },

    #[cfg(feature = "h5md")]
    #[error(
        "HDF5 error for {path_desc} at '{dataset}': {source}",
        path_desc = PathDisplay(path)
    )]
    Hdf5 {
        path: Option<PathBuf>,
        dataset: String,
        #[source]
        source: hdf5::Error,
    },
}

impl Error {
    pub fn from_io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { path, source }
    }

    pub fn parse(
        format: &'static str,
        path: Option<PathBuf>,
        line_number: usize,
        details: impl Into<String>,
    ) -> Self {
        Self::Parse {
            format,
            path,
            line_number,
            details: details.into(),
        }
    }

    pub fn inconsistent_data(
        format: &'static str,
        path: Option<PathBuf>,
        details: impl Into<String>,
    ) -> Self {
        Self::InconsistentData {
            format,
            path,
            details: details.into(),
        }
    }

    pub fn unsupported_format(path: Option<PathBuf>, details: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path,
            details: details.into(),
        }
    }

    #[cfg(feature = "h5md")]
    pub fn hdf5(source: hdf5::Error, path: Option<PathBuf>, dataset: impl Into<String>) -> Self {
        Self::Hdf5 {
            path,
            dataset: dataset.into(),
            source,
        }
    }
}

struct PathDisplay<'a>(&'a Option<PathBuf>);

impl<'a> fmt::Display for PathDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "file '{}'", p.display()),
            None => write!(f, "stream source"),
        }
    }
}
