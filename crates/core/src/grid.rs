//! Organizational schemes and grid-layout math.
//!
//! A container organizes its contents as a flat list, a bounded
//! rows-by-columns grid, free placement over a background image, or the
//! user's personal workbench. Grid dimensions are bounded to `[1, 24]` on
//! both axes; the bound is enforced here independently of any UI input
//! constraints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ValidationOutcome;

/// Smallest permitted grid dimension on either axis.
pub const MIN_GRID_DIMENSION: u32 = 1;

/// Largest permitted grid dimension on either axis.
pub const MAX_GRID_DIMENSION: u32 = 24;

/// Organizational scheme of a container.
///
/// `Workbench` is not a user-selectable target: it is an intrinsic property
/// of a user's personal container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerType {
    #[serde(rename = "LIST")]
    List,
    #[serde(rename = "GRID")]
    Grid,
    #[serde(rename = "IMAGE")]
    Image,
    #[serde(rename = "WORKBENCH")]
    Workbench,
}

impl ContainerType {
    /// Whether this scheme has no fixed capacity.
    pub fn is_unbounded(self) -> bool {
        matches!(self, Self::List | Self::Workbench)
    }
}

/// How an axis of a grid is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelType {
    /// Alphabetic labels: A, B, ..., Z, AA, AB, ...
    #[serde(rename = "ABC")]
    Abc,
    /// Numeric labels: 1, 2, 3, ...
    #[serde(rename = "N123")]
    N123,
}

/// Grid dimensions and axis labelling, meaningful only for `Grid` containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    #[validate(range(min = 1, max = 24))]
    pub columns_number: u32,

    #[validate(range(min = 1, max = 24))]
    pub rows_number: u32,

    pub columns_label_type: LabelType,

    pub rows_label_type: LabelType,
}

impl GridLayout {
    /// Default layout used when a container switches to the grid scheme.
    pub fn single_cell() -> Self {
        Self {
            columns_number: 1,
            rows_number: 1,
            columns_label_type: LabelType::N123,
            rows_label_type: LabelType::Abc,
        }
    }

    /// Total number of cells.
    pub fn capacity(&self) -> usize {
        self.columns_number as usize * self.rows_number as usize
    }

    /// The full cartesian product of 1-based `(column, row)` coordinates,
    /// row-major: all columns of row 1, then row 2, and so on.
    pub fn coordinates(&self) -> Vec<(u32, u32)> {
        let mut coords = Vec::with_capacity(self.capacity());
        for row in 1..=self.rows_number {
            for col in 1..=self.columns_number {
                coords.push((col, row));
            }
        }
        coords
    }

    /// Checks the dimension bounds, accumulating field-level messages.
    pub fn check(&self, outcome: &mut ValidationOutcome) {
        if Validate::validate(self).is_err() {
            if !(MIN_GRID_DIMENSION..=MAX_GRID_DIMENSION).contains(&self.rows_number) {
                outcome.push(
                    "gridLayout",
                    format!(
                        "rows must be between {MIN_GRID_DIMENSION} and {MAX_GRID_DIMENSION}"
                    ),
                );
            }
            if !(MIN_GRID_DIMENSION..=MAX_GRID_DIMENSION).contains(&self.columns_number) {
                outcome.push(
                    "gridLayout",
                    format!(
                        "columns must be between {MIN_GRID_DIMENSION} and {MAX_GRID_DIMENSION}"
                    ),
                );
            }
        }
    }
}

/// Label for the 1-based `index` of an axis using the given label type.
///
/// Alphabetic labels continue past Z with two letters: AA, AB, ...
pub fn axis_label(label_type: LabelType, index: u32) -> String {
    match label_type {
        LabelType::N123 => index.to_string(),
        LabelType::Abc => {
            let mut n = index;
            let mut label = String::new();
            while n > 0 {
                let rem = (n - 1) % 26;
                label.insert(0, (b'A' + rem as u8) as char);
                n = (n - 1) / 26;
            }
            label
        }
    }
}
