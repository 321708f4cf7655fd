//! A single cell/slot within a container.
//!
//! A location owns its coordinate, transient selection flag, and a
//! non-owning reference to its occupant in the record store. Pixel geometry
//! is only meaningful in grid/image layouts, where it is tested against the
//! parent container's drag rectangle.

use benchstock_core::types::{DbId, GlobalId};
use benchstock_core::wire::LocationPayload;

use crate::record::RecordStore;
use crate::search::ContentSearch;
use crate::selection::{Rect, SelectionRect};

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// `None` until the location has been persisted.
    pub id: Option<DbId>,

    /// 1-based grid coordinates; positional only for list/image ordering.
    pub coord_x: Option<i32>,
    pub coord_y: Option<i32>,

    /// The occupant, referenced by global id. The location does not own the
    /// record's lifecycle.
    pub content: Option<GlobalId>,

    /// Transient UI selection flag.
    pub selected: bool,

    /// Pixel geometry for drag-rectangle intersection.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Location {
    /// An empty, unpersisted location at the given grid coordinate.
    pub fn empty_at(coord_x: i32, coord_y: i32) -> Self {
        Self {
            id: None,
            coord_x: Some(coord_x),
            coord_y: Some(coord_y),
            content: None,
            selected: false,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Wraps a server-provided location; the occupant (if any) must already
    /// have been ingested into the store under `content`.
    pub fn from_payload(payload: &LocationPayload, content: Option<GlobalId>) -> Self {
        Self {
            id: payload.id,
            coord_x: payload.coord_x,
            coord_y: payload.coord_y,
            content,
            selected: false,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn geometry(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// A location has content iff its occupant reference resolves to a
    /// live, undeleted record in the store.
    pub fn has_content(&self, store: &RecordStore) -> bool {
        self.content
            .and_then(|gid| store.get(gid))
            .is_some_and(|record| !record.deleted)
    }

    /// Whether this location is visually and logically excluded from
    /// selection: either the parent container's content search is narrowing
    /// the result set and the occupant falls outside it (or is categorically
    /// excluded by the hosting search), or no filter is active but the
    /// occupant is categorically excluded anyway (e.g. it is one of the
    /// sources of the move being placed).
    pub fn is_greyed_out(
        &self,
        parent_search: &ContentSearch,
        search: &ContentSearch,
        store: &RecordStore,
    ) -> bool {
        let Some(record) = self.content.and_then(|gid| store.get(gid)) else {
            return false;
        };
        if parent_search.is_active() {
            !parent_search.is_in_results(record) || search.always_filtered_out(record)
        } else {
            search.always_filtered_out(record)
        }
    }

    /// Whether an in-progress drag gesture would toggle this location when
    /// it completes: the rectangle covers it, it is not greyed out, and it
    /// is worth toggling (has content, is already selected, or the hosting
    /// search permits selecting empty locations).
    pub fn is_shallow(
        &self,
        rect: Option<&SelectionRect>,
        parent_search: &ContentSearch,
        search: &ContentSearch,
        store: &RecordStore,
    ) -> bool {
        let Some(rect) = rect else {
            return false;
        };
        rect.normalized().intersects(&self.geometry())
            && !self.is_greyed_out(parent_search, search, store)
            && (self.has_content(store)
                || self.selected
                || search.ui.only_allow_selecting_empty_locations)
    }

    /// Covered by the drag but not yet selected: shown as "about to select".
    pub fn is_shallow_selected(
        &self,
        rect: Option<&SelectionRect>,
        parent_search: &ContentSearch,
        search: &ContentSearch,
        store: &RecordStore,
    ) -> bool {
        self.is_shallow(rect, parent_search, search, store) && !self.selected
    }

    /// Covered by the drag and currently selected: "about to deselect".
    pub fn is_shallow_unselected(
        &self,
        rect: Option<&SelectionRect>,
        parent_search: &ContentSearch,
        search: &ContentSearch,
        store: &RecordStore,
    ) -> bool {
        self.is_shallow(rect, parent_search, search, store) && self.selected
    }

    /// Whether the location may be selected under the hosting search's
    /// configuration: move workflows restrict to empty locations, every
    /// other context excludes greyed-out occupants.
    pub fn is_selectable(
        &self,
        parent_search: &ContentSearch,
        search: &ContentSearch,
        store: &RecordStore,
    ) -> bool {
        if search.ui.only_allow_selecting_empty_locations {
            !self.has_content(store)
        } else {
            !self.is_greyed_out(parent_search, search, store)
        }
    }
}
