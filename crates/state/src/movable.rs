//! Movable capability: parent-container lineage and workbench queries.
//!
//! Shared by records and containers through their [`Lineage`] value rather
//! than by inheritance; each type forwards to the same query logic here.

use benchstock_core::grid::ContainerType;
use benchstock_core::types::{GlobalId, Timestamp};

use crate::record::{Lineage, Record};

/// Lineage queries shared by every movable record type.
pub trait Movable {
    fn lineage(&self) -> &Lineage;
    fn last_move_date(&self) -> Option<Timestamp>;
    fn created(&self) -> Option<Timestamp>;

    /// Whether any ancestor is a workbench, i.e. the record sits somewhere
    /// under a user's bench.
    fn is_in_workbench(&self) -> bool {
        self.lineage()
            .root_parent()
            .is_some_and(|root| root.c_type == ContainerType::Workbench)
    }

    /// Whether the workbench is the immediate parent, strictly one level
    /// deep; being further down a bench's hierarchy does not count.
    fn is_on_workbench(&self) -> bool {
        self.is_in_workbench() && self.lineage().all_parents().len() == 1
    }

    /// Whether the immediate parent organizes its contents as a grid.
    fn is_in_grid_container(&self) -> bool {
        self.lineage()
            .immediate_parent()
            .is_some_and(|p| p.c_type == ContainerType::Grid)
    }

    /// Time spent in the current location: `now` minus the last move date,
    /// falling back to creation time when the record has never been moved.
    /// `None` when neither timestamp is known.
    fn time_in_current_location(&self, now: Timestamp) -> Option<chrono::Duration> {
        let since = self.last_move_date().or_else(|| self.created())?;
        Some(now - since)
    }

    /// Whether this record's immediate parent is the given container.
    fn was_here_last(&self, other: GlobalId) -> bool {
        self.lineage()
            .immediate_parent()
            .is_some_and(|p| p.global_id == other)
    }
}

impl Movable for Record {
    fn lineage(&self) -> &Lineage {
        &self.lineage
    }

    fn last_move_date(&self) -> Option<Timestamp> {
        self.last_move_date
    }

    fn created(&self) -> Option<Timestamp> {
        self.created
    }
}
