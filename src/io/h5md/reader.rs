use crate::io::error::Error;
use crate::model::{
    settings::H5mdLayout,
    snapshot::{ConnectivityGroup, ParticleRecord, Snapshot},
};
use hdf5::{File, H5Type};
use ndarray::{ArrayD, Axis, Ix1, Ix2};
use std::path::{Path, PathBuf};

const FORMAT: &str = "H5MD";

/// Reads one time frame of an H5MD container.
///
/// Time-dependent elements are groups holding a `value` dataset whose first axis is time;
/// time-independent elements are plain datasets. Both forms are accepted for every element.
///
/// # Arguments
///
/// * `path` - Location of the H5MD file.
/// * `layout` - Particle group and connectivity group names.
/// * `frame` - Frame index; negative values count from the last frame (`-1` is the last).
///
/// # Errors
///
/// Returns [`Error::Hdf5`] for missing or unreadable datasets and
/// [`Error::InconsistentData`] for out-of-range frames or mismatched column lengths.
pub fn read(path: &Path, layout: &H5mdLayout, frame: i64) -> Result<Snapshot, Error> {
    let ctx = FrameReader {
        file: File::open(path).map_err(|e| Error::hdf5(e, Some(path.to_path_buf()), "/"))?,
        path: path.to_path_buf(),
        frame,
    };

    let group = format!("/particles/{}", layout.atom_group);

    let box_edges = ctx.read_vector::<f64>(&format!("{group}/box/edges"))?;
    let box_edges: [f64; 3] = box_edges
        .as_slice()
        .try_into()
        .map_err(|_| {
            ctx.inconsistent(format!(
                "box edges must have 3 entries, found {}",
                box_edges.len()
            ))
        })?;

    let ids = ctx.read_vector::<i64>(&format!("{group}/id"))?;
    let species = ctx.read_vector::<i64>(&format!("{group}/species"))?;
    let masses = ctx.read_vector::<f64>(&format!("{group}/mass"))?;
    let positions: Vec<[f64; 3]> = ctx.read_matrix(&format!("{group}/position"))?;
    let charges = ctx.read_optional_vector::<f64>(&format!("{group}/charge"))?;

    let n = ids.len();
    let lengths = [species.len(), masses.len(), positions.len()];
    if lengths.iter().any(|&len| len != n) || charges.as_ref().is_some_and(|c| c.len() != n) {
        return Err(ctx.inconsistent(format!(
            "particle columns differ in length (id: {}, species: {}, mass: {}, position: {})",
            n, lengths[0], lengths[1], lengths[2]
        )));
    }

    let particles = (0..n)
        .map(|i| ParticleRecord {
            id: ids[i],
            species: species[i],
            mass: masses[i],
            position: positions[i],
            charge: charges.as_ref().map(|c| c[i]),
        })
        .collect();

    let connectivity = layout
        .connection_groups
        .iter()
        .map(|name| {
            Ok(ConnectivityGroup {
                name: name.clone(),
                edges: ctx.read_matrix(&format!("/connectivity/{name}"))?,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    log::debug!(
        "Read frame {} of '{}': {} particle rows, {} connectivity groups",
        frame,
        path.display(),
        n,
        connectivity.len()
    );

    Ok(Snapshot {
        box_edges,
        particles,
        connectivity,
    })
}

struct FrameReader {
    file: File,
    path: PathBuf,
    frame: i64,
}

impl FrameReader {
    fn hdf5_error(&self, source: hdf5::Error, dataset: &str) -> Error {
        Error::hdf5(source, Some(self.path.clone()), dataset)
    }

    fn inconsistent(&self, details: impl Into<String>) -> Error {
        Error::inconsistent_data(FORMAT, Some(self.path.clone()), details)
    }

    /// Reads an element, selecting the frame when the element is time-dependent.
    fn read_element<T: H5Type>(&self, element: &str) -> Result<ArrayD<T>, Error> {
        match self.file.group(element) {
            Ok(group) => {
                let dataset_path = format!("{element}/value");
                let values = group
                    .dataset("value")
                    .and_then(|ds| ds.read_dyn::<T>())
                    .map_err(|e| self.hdf5_error(e, &dataset_path))?;

                let frames = values.shape().first().copied().unwrap_or(0);
                let idx = resolve_frame(self.frame, frames).ok_or_else(|| {
                    self.inconsistent(format!(
                        "frame {} is out of range for '{}' with {} frames",
                        self.frame, dataset_path, frames
                    ))
                })?;
                Ok(values.index_axis_move(Axis(0), idx))
            }
            Err(_) => self
                .file
                .dataset(element)
                .and_then(|ds| ds.read_dyn::<T>())
                .map_err(|e| self.hdf5_error(e, element)),
        }
    }

    fn read_vector<T: H5Type + Copy>(&self, element: &str) -> Result<Vec<T>, Error> {
        let values = self
            .read_element::<T>(element)?
            .into_dimensionality::<Ix1>()
            .map_err(|e| {
                self.inconsistent(format!("'{}' is not one-dimensional: {}", element, e))
            })?;
        Ok(values.to_vec())
    }

    fn read_optional_vector<T: H5Type + Copy>(
        &self,
        element: &str,
    ) -> Result<Option<Vec<T>>, Error> {
        if self.file.link_exists(element) {
            self.read_vector(element).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Reads an `(n, W)` element as `n` fixed-width rows.
    fn read_matrix<T: H5Type + Copy + Default, const W: usize>(
        &self,
        element: &str,
    ) -> Result<Vec<[T; W]>, Error> {
        let values = self
            .read_element::<T>(element)?
            .into_dimensionality::<Ix2>()
            .map_err(|e| {
                self.inconsistent(format!("'{}' is not two-dimensional: {}", element, e))
            })?;

        if values.ncols() != W {
            return Err(self.inconsistent(format!(
                "'{}' has {} columns, expected {}",
                element,
                values.ncols(),
                W
            )));
        }

        Ok(values
            .rows()
            .into_iter()
            .map(|row| {
                let mut out = [T::default(); W];
                for (slot, value) in out.iter_mut().zip(row.iter()) {
                    *slot = *value;
                }
                out
            })
            .collect())
    }
}

/// Maps a possibly negative frame index onto `0..frames`.
fn resolve_frame(frame: i64, frames: usize) -> Option<usize> {
    let frames = i64::try_from(frames).ok()?;
    let idx = if frame < 0 { frames + frame } else { frame };
    (0..frames).contains(&idx).then_some(idx as usize)
}
