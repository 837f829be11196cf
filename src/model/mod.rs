//! Core data structures flowing through the topology derivation pipeline.
//!
//! Raw inputs ([`snapshot`], [`settings`], [`template`]) are turned into a read-only
//! [`graph`] of [`particle`]s, enumerated into [`term`]s, and finally assembled into an
//! emission-ready [`topology`]. These types carry no I/O and no algorithmic logic beyond
//! simple accessors.

pub mod graph;
pub mod particle;
pub mod settings;
pub mod snapshot;
pub mod template;
pub mod term;
pub mod topology;
pub mod types;
