//! Pure domain logic for the benchstock placement core.
//!
//! This crate has zero internal deps so it can be shared by the stateful
//! client layer and any future tooling: identifiers, error taxonomy,
//! grid-layout math and labeling, wire payload types, the three-bucket
//! location diff, and color-wheel assignment for sibling subsamples.

pub mod color;
pub mod diff;
pub mod error;
pub mod grid;
pub mod types;
pub mod wire;
