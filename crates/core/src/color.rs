//! Color-wheel assignment for sibling-subsample groups.
//!
//! Subsamples of the same parent sample share a color so they can be spotted
//! across a grid. Hues are spaced evenly over the number of distinct groups
//! present; within one assignment generation the sample-id-to-color mapping
//! is a bijection.

use std::collections::HashMap;

use crate::types::DbId;

/// Color of locations with no subsample occupant.
pub const EMPTY_COLOR: &str = "white";

/// Builds a full color assignment for the given sample ids.
///
/// Duplicate ids are collapsed; ids are sorted before hue assignment so the
/// result is deterministic for a given group set.
pub fn assign_group_colors(sample_ids: &[DbId]) -> HashMap<DbId, String> {
    let mut distinct: Vec<DbId> = sample_ids.to_vec();
    distinct.sort_unstable();
    distinct.dedup();

    let count = distinct.len();
    distinct
        .into_iter()
        .enumerate()
        .map(|(i, id)| (id, hue_color(i, count)))
        .collect()
}

/// The `i`-th of `count` evenly spaced pastel hues.
fn hue_color(index: usize, count: usize) -> String {
    let hue = (index * 360) / count.max(1);
    format!("hsl({hue}, 70%, 80%)")
}
