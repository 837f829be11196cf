//! Raw per-frame particle data as delivered by a snapshot reader.
//!
//! Records keep the signed id/species columns exactly as stored, including padding rows and
//! sentinel edges. Filtering happens later, in labeling and graph construction, so readers
//! stay format-only.

use super::types::SENTINEL_ID;
use serde::Deserialize;

/// One row of the snapshot's particle columns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParticleRecord {
    pub id: i64,
    pub species: i64,
    #[serde(default)]
    pub mass: f64,
    #[serde(default)]
    pub position: [f64; 3],
    #[serde(default)]
    pub charge: Option<f64>,
}

impl ParticleRecord {
    /// Returns `true` for fixed-width padding rows that carry no particle.
    ///
    /// Padding is written as [`SENTINEL_ID`]; any other negative value is equally out of
    /// range and treated the same way.
    pub fn is_padding(&self) -> bool {
        self.id <= SENTINEL_ID || self.species <= SENTINEL_ID
    }
}

/// Named connectivity edge list (one H5MD `/connectivity/<name>` dataset).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectivityGroup {
    pub name: String,
    #[serde(default)]
    pub edges: Vec<[i64; 2]>,
}

/// Particle attributes and connectivity for a single time frame.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    /// Box edge lengths in nanometers.
    #[serde(default, rename = "box")]
    pub box_edges: [f64; 3],
    #[serde(default)]
    pub particles: Vec<ParticleRecord>,
    #[serde(default)]
    pub connectivity: Vec<ConnectivityGroup>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over all edges of all connectivity groups, sentinels included.
    pub fn edges(&self) -> impl Iterator<Item = [i64; 2]> + '_ {
        self.connectivity.iter().flat_map(|g| g.edges.iter().copied())
    }

    /// Counts non-padding particle records.
    pub fn particle_count(&self) -> usize {
        self.particles.iter().filter(|p| !p.is_padding()).count()
    }
}
