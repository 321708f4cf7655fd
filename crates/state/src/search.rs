//! Content-search collaborator: filter configuration and the cached result
//! set that alternate views (card/tree) of a container's contents render.

use std::collections::HashSet;

use benchstock_core::types::{GlobalId, RecordKind};

use crate::record::Record;

/// Which rendering of a result set is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchView {
    #[default]
    List,
    Grid,
    Image,
    Card,
    Tree,
}

/// Selection behavior knobs supplied by the hosting dialog or page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiConfig {
    /// Maximum number of locations that may be selected at once.
    pub selection_limit: Option<usize>,

    /// Restrict selection to empty locations, as move/placement workflows do.
    pub only_allow_selecting_empty_locations: bool,
}

/// A search scoped to one container's contents.
///
/// Created once per container and reused across re-populations; the cache
/// holds the global ids of the current result set.
#[derive(Debug, Clone, Default)]
pub struct ContentSearch {
    /// Global id of the container whose contents this search is scoped to.
    pub parent_global_id: Option<GlobalId>,

    /// Free-text name filter.
    pub query: Option<String>,

    /// Restrict results to one record kind.
    pub result_kind: Option<RecordKind>,

    /// Restrict results to one owner.
    pub owner: Option<String>,

    /// Result cache shared with alternate views of the same contents.
    pub cache: Vec<GlobalId>,

    pub ui: UiConfig,

    /// Records never eligible for selection in this search's context, e.g.
    /// the sources of an in-progress move.
    pub always_filter_out: HashSet<GlobalId>,

    pub view: SearchView,
}

impl ContentSearch {
    pub fn new(parent_global_id: Option<GlobalId>) -> Self {
        Self {
            parent_global_id,
            ..Self::default()
        }
    }

    /// Whether any filter is currently narrowing the result set.
    pub fn is_active(&self) -> bool {
        self.query.as_deref().is_some_and(|q| !q.is_empty())
            || self.result_kind.is_some()
            || self.owner.is_some()
    }

    /// Whether the record matches the current filters.
    pub fn is_in_results(&self, record: &Record) -> bool {
        if let Some(query) = self.query.as_deref() {
            if !query.is_empty()
                && !record.name.to_lowercase().contains(&query.to_lowercase())
            {
                return false;
            }
        }
        if let Some(kind) = self.result_kind {
            if record.kind != kind {
                return false;
            }
        }
        if let Some(owner) = self.owner.as_deref() {
            if record.owner.as_deref() != Some(owner) {
                return false;
            }
        }
        true
    }

    /// Whether the record is categorically excluded from selection.
    pub fn always_filtered_out(&self, record: &Record) -> bool {
        self.always_filter_out.contains(&record.global_id)
    }

    /// Replaces the cached result set.
    pub fn set_results(&mut self, results: Vec<GlobalId>) {
        self.cache = results;
    }

    pub fn set_view(&mut self, view: SearchView) {
        self.view = view;
    }
}
