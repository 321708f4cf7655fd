//! Cross-container move orchestration state.
//!
//! A move workflow selects N records anywhere in the app and drops them into
//! a target container's locations. Containers read this context to gate
//! capacity, record-type, and self-containment checks; the only write path
//! from a container's side is claiming a record into one of its locations.

use benchstock_core::types::{GlobalId, RecordKind};

use crate::record::RecordStore;

/// Globally tracked state of an in-progress move operation.
#[derive(Debug, Clone, Default)]
pub struct MoveContext {
    /// Whether a move workflow is in progress.
    pub moving: bool,

    /// The record whose contents page is being browsed as a drop target.
    pub active_result: Option<GlobalId>,

    /// Records selected for the move.
    pub selected: Vec<GlobalId>,
}

impl MoveContext {
    /// No move in progress.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Starts a move of the given records.
    pub fn begin(selected: Vec<GlobalId>) -> Self {
        Self {
            moving: true,
            active_result: None,
            selected,
        }
    }

    /// Whether the currently browsed result is a container (or bench), i.e.
    /// a valid drop target for location placement.
    pub fn active_result_is_container(&self) -> bool {
        self.active_result
            .is_some_and(|gid| gid.kind.is_container_like())
    }

    /// Whether any selected record is a container.
    pub fn includes_containers(&self, store: &RecordStore) -> bool {
        self.selected
            .iter()
            .any(|gid| store.get(*gid).is_some_and(|r| r.is_container()))
    }

    /// Whether any selected record is a subsample.
    pub fn includes_sub_samples(&self, store: &RecordStore) -> bool {
        self.selected
            .iter()
            .any(|gid| store.get(*gid).is_some_and(|r| r.kind == RecordKind::SubSample))
    }
}
