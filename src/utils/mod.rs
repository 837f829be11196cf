//! Utility modules providing cross-cutting functionality.
//!
//! Currently this only hosts the conditional parallel-iteration layer, which lets the term
//! enumerator run on Rayon's pool or sequentially without duplicating code.

pub mod parallel;
