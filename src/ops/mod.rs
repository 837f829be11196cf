//! Topology derivation pipeline: labeling, graph construction, template indexing, term
//! enumeration, and assembly.
//!
//! Each stage exposes a small builder-style API and all of them share one error type, so a
//! caller can chain snapshot → [`GraphBuilder`] → [`TermEnumerator`] → [`TopologyAssembler`]
//! with `?`. Every fatal condition is raised before the parallel enumeration phase starts.

mod assemble;
mod enumerate;
mod error;
mod graph;
mod index;
mod labels;

pub use labels::label_particles;

pub use graph::GraphBuilder;

pub use index::{TemplateIndex, TemplateTable};

pub use enumerate::TermEnumerator;

pub use assemble::TopologyAssembler;

pub use error::Error;
