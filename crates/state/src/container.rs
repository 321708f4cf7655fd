//! The container aggregate: organizational-scheme state machine, location
//! ownership, drag-selection protocol, capacity/move gating, and the diff
//! that turns in-memory location state into the backend change-set.
//!
//! Re-population from a payload is re-entrant and atomic from the caller's
//! perspective: the new location set is staged in full before any field of
//! the container is touched, so a failed populate leaves no partial state.

use std::collections::{HashMap, HashSet};

use benchstock_core::color::{assign_group_colors, EMPTY_COLOR};
use benchstock_core::diff::{location_requests, LocationState};
use benchstock_core::error::{CoreError, ValidationOutcome};
use benchstock_core::grid::{ContainerType, GridLayout};
use benchstock_core::types::{DbId, GlobalId, Timestamp};
use benchstock_core::wire::{
    ContainerParams, ContainerPayload, ContentSummary, LocationPayload, LocationRequest,
};

use crate::location::Location;
use crate::movable::Movable;
use crate::moving::MoveContext;
use crate::record::{Lineage, Record, RecordStore};
use crate::search::ContentSearch;
use crate::selection::{Padding, PointerPosition, Rect, SelectionRect, Viewport};

/// Coalescing marker for the container's additional-info fetch: concurrent
/// callers piggyback on the in-flight request instead of issuing duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    NotFetched,
    InFlight,
    Fetched,
}

/// Which container fields the current lock/permission state allows editing.
/// Outbound params only include fields that are editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditableFields {
    pub can_store: bool,
    pub locations_image: bool,
    pub organization: bool,
}

impl Default for EditableFields {
    fn default() -> Self {
        Self {
            can_store: true,
            locations_image: true,
            organization: true,
        }
    }
}

#[derive(Debug)]
pub struct Container {
    /// `None` until persisted.
    pub id: Option<DbId>,
    pub global_id: Option<GlobalId>,
    pub name: String,

    pub c_type: ContainerType,
    pub can_store_containers: bool,
    pub can_store_samples: bool,

    /// Only meaningful when `c_type` is `Grid`.
    pub grid_layout: Option<GridLayout>,

    /// `None` means the contents have not been fetched yet.
    locations: Option<Vec<Location>>,

    /// Frozen snapshot of location ids as last received from the server;
    /// the baseline for the outbound diff.
    unchanged_location_ids: Vec<DbId>,

    /// `None` means unbounded (list/workbench schemes).
    pub locations_count: Option<u32>,

    /// `None` means the caller lacks permission to see the summary.
    pub content_summary: Option<ContentSummary>,

    /// Transient drag-rectangle state.
    pub selection_mode: bool,
    selection: Option<SelectionRect>,

    /// Search scoped to this container's contents; created once and reused
    /// across re-populations.
    pub content_search: ContentSearch,

    pub lineage: Lineage,
    pub last_move_date: Option<Timestamp>,
    pub created: Option<Timestamp>,
    pub deleted: bool,

    /// Background image of the image scheme, base64.
    pub locations_image: Option<String>,

    /// Preview image, base64.
    pub image: Option<String>,

    /// Newly uploaded locations image pending submission.
    new_base64_locations_image: Option<String>,

    pub editable: EditableFields,
    color_cache: HashMap<DbId, String>,
    locations_dirty: bool,
    pub fetch_state: FetchState,
}

impl Container {
    /// A blank, unsaved container using the given scheme.
    pub fn new(c_type: ContainerType) -> Self {
        Self {
            id: None,
            global_id: None,
            name: String::new(),
            c_type,
            can_store_containers: true,
            can_store_samples: true,
            grid_layout: (c_type == ContainerType::Grid).then(GridLayout::single_cell),
            locations: None,
            unchanged_location_ids: Vec::new(),
            locations_count: None,
            content_summary: None,
            selection_mode: false,
            selection: None,
            content_search: ContentSearch::new(None),
            lineage: Lineage::default(),
            last_move_date: None,
            created: None,
            deleted: false,
            locations_image: None,
            image: None,
            new_base64_locations_image: None,
            editable: EditableFields::default(),
            color_cache: HashMap::new(),
            locations_dirty: false,
            fetch_state: FetchState::default(),
        }
    }

    /// Deserializes a container from a server payload.
    pub fn from_payload(
        payload: &ContainerPayload,
        store: &mut RecordStore,
    ) -> Result<Self, CoreError> {
        let mut container = Self::new(payload.c_type);
        container.populate_from_payload(payload, store)?;
        Ok(container)
    }

    // -----------------------------------------------------------------------
    // Population
    // -----------------------------------------------------------------------

    /// Rebuilds this container from a payload. Re-entrant: every call fully
    /// replaces the location set according to the current scheme. Grid
    /// containers always end up with `rows x columns` locations, with empty
    /// cells synthesized where the server returned no content.
    pub fn populate_from_payload(
        &mut self,
        payload: &ContainerPayload,
        store: &mut RecordStore,
    ) -> Result<(), CoreError> {
        let staged = Self::stage_locations(payload)?;

        self.id = payload.id;
        self.global_id = payload.global_id;
        self.name = payload.name.clone();
        self.c_type = payload.c_type;
        if let Some(flag) = payload.can_store_containers {
            self.can_store_containers = flag;
        }
        if let Some(flag) = payload.can_store_samples {
            self.can_store_samples = flag;
        }
        self.grid_layout = payload.grid_layout;
        self.content_summary = payload.content_summary;
        self.lineage = Lineage::from_payload(&payload.parent_containers);
        self.last_move_date = payload.last_move_date;
        self.created = payload.created;
        self.deleted = payload.deleted;
        self.locations_image = payload.locations_image.clone();
        self.image = payload.image.clone();

        // The content search is reused across re-populations; only its scope
        // follows the container's identity.
        self.content_search.parent_global_id = self.global_id;

        match staged {
            Some(staged) => {
                let mut locations = Vec::with_capacity(staged.len());
                let mut cache = Vec::new();
                for (location, record) in staged {
                    if let Some(record) = record {
                        cache.push(store.ingest(record));
                    }
                    locations.push(location);
                }
                self.unchanged_location_ids =
                    locations.iter().filter_map(|l| l.id).collect();
                tracing::debug!(
                    container = %self.name,
                    locations = locations.len(),
                    occupied = cache.len(),
                    "populated container locations"
                );
                self.locations = Some(locations);
                self.content_search.set_results(cache);
            }
            None => {
                self.locations = None;
                self.unchanged_location_ids = Vec::new();
            }
        }

        self.locations_count = payload.locations_count.or(match self.c_type {
            ContainerType::Grid => self.grid_layout.map(|l| l.capacity() as u32),
            ContainerType::Image => self
                .locations
                .as_ref()
                .map(|locations| locations.len() as u32),
            ContainerType::List | ContainerType::Workbench => None,
        });
        self.locations_dirty = false;
        Ok(())
    }

    /// Builds the new location set without touching `self`, so population is
    /// all-or-nothing. Returns `None` when the payload carries no locations.
    #[allow(clippy::type_complexity)]
    fn stage_locations(
        payload: &ContainerPayload,
    ) -> Result<Option<Vec<(Location, Option<Record>)>>, CoreError> {
        let Some(payload_locations) = &payload.locations else {
            return Ok(None);
        };

        let stage_one = |lp: &LocationPayload| -> Result<(Location, Option<Record>), CoreError> {
            let record = lp.content.as_ref().map(Record::from_payload).transpose()?;
            let content = record.as_ref().map(|r| r.global_id);
            Ok((Location::from_payload(lp, content), record))
        };

        match payload.c_type {
            ContainerType::Grid => {
                let layout = payload.grid_layout.ok_or_else(|| {
                    CoreError::State("grid container is missing a grid layout".into())
                })?;

                let mut by_coord: HashMap<(i32, i32), &LocationPayload> = HashMap::new();
                for lp in payload_locations {
                    match (lp.coord_x, lp.coord_y) {
                        (Some(x), Some(y)) => {
                            by_coord.insert((x, y), lp);
                        }
                        _ => tracing::warn!(
                            container = %payload.name,
                            "ignoring grid location without coordinates"
                        ),
                    }
                }

                let mut staged = Vec::with_capacity(layout.capacity());
                for (col, row) in layout.coordinates() {
                    match by_coord.remove(&(col as i32, row as i32)) {
                        Some(lp) => staged.push(stage_one(lp)?),
                        None => staged.push((Location::empty_at(col as i32, row as i32), None)),
                    }
                }
                for (x, y) in by_coord.keys() {
                    tracing::warn!(
                        container = %payload.name,
                        coord_x = x,
                        coord_y = y,
                        "ignoring grid location outside the layout"
                    );
                }
                Ok(Some(staged))
            }
            ContainerType::List | ContainerType::Image | ContainerType::Workbench => Ok(Some(
                payload_locations
                    .iter()
                    .map(stage_one)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
        }
    }

    // -----------------------------------------------------------------------
    // Location access
    // -----------------------------------------------------------------------

    /// The location set. Errs until the container's contents have been
    /// fetched; callers must not default around this.
    pub fn locations(&self) -> Result<&[Location], CoreError> {
        self.locations.as_deref().ok_or(CoreError::LocationsUnknown)
    }

    fn locations_mut(&mut self) -> Result<&mut Vec<Location>, CoreError> {
        self.locations.as_mut().ok_or(CoreError::LocationsUnknown)
    }

    fn location(&self, index: usize) -> Result<&Location, CoreError> {
        self.locations()?.get(index).ok_or_else(|| {
            CoreError::State(format!("no location at index {index}"))
        })
    }

    /// Indexes of the currently selected locations.
    pub fn selected_locations(&self) -> Result<Vec<usize>, CoreError> {
        Ok(self
            .locations()?
            .iter()
            .enumerate()
            .filter(|(_, l)| l.selected)
            .map(|(i, _)| i)
            .collect())
    }

    pub fn selected_count(&self) -> Result<usize, CoreError> {
        Ok(self.selected_locations()?.len())
    }

    /// Indexes in display order for list-like views: persisted locations in
    /// ascending id order, then unpersisted ones in insertion order.
    pub fn sorted_locations(&self) -> Result<Vec<usize>, CoreError> {
        let locations = self.locations()?;
        let mut existing: Vec<usize> = (0..locations.len())
            .filter(|&i| locations[i].id.is_some())
            .collect();
        existing.sort_by_key(|&i| locations[i].id);
        let new: Vec<usize> = (0..locations.len())
            .filter(|&i| locations[i].id.is_none())
            .collect();
        existing.extend(new);
        Ok(existing)
    }

    /// Removes the location at the given index into `sorted_locations`.
    /// Indexing is positional rather than by id because unpersisted
    /// locations have no id yet.
    pub fn delete_sorted_location(&mut self, sorted_index: usize) -> Result<(), CoreError> {
        let order = self.sorted_locations()?;
        let index = *order.get(sorted_index).ok_or_else(|| {
            CoreError::State(format!("no location at sorted index {sorted_index}"))
        })?;
        self.locations_mut()?.remove(index);
        if let Some(count) = &mut self.locations_count {
            *count = count.saturating_sub(1);
        }
        self.locations_dirty = true;
        Ok(())
    }

    /// Appends a new, unpersisted location (list/image placement flows).
    pub fn add_location(&mut self, location: Location) -> Result<(), CoreError> {
        self.locations_mut()?.push(location);
        if let Some(count) = &mut self.locations_count {
            *count += 1;
        }
        self.locations_dirty = true;
        Ok(())
    }

    /// Updates the pixel geometry of a location, as measured by the view.
    pub fn set_location_geometry(&mut self, index: usize, rect: Rect) -> Result<(), CoreError> {
        self.location(index)?;
        let location = &mut self.locations_mut()?[index];
        location.x = rect.x;
        location.y = rect.y;
        location.width = rect.width;
        location.height = rect.height;
        Ok(())
    }

    pub fn has_unsaved_location_edits(&self) -> bool {
        self.locations_dirty
    }

    pub fn unchanged_location_ids(&self) -> &[DbId] {
        &self.unchanged_location_ids
    }

    // -----------------------------------------------------------------------
    // Backend diff and params
    // -----------------------------------------------------------------------

    /// The three-bucket location change-set: existing, then new, then
    /// deleted, diffed against the baseline snapshotted at populate time.
    pub fn locations_for_api(&self) -> Result<Vec<LocationRequest>, CoreError> {
        let current: Vec<LocationState> = self
            .locations()?
            .iter()
            .map(|l| LocationState {
                id: l.id,
                coord_x: l.coord_x,
                coord_y: l.coord_y,
            })
            .collect();
        let requests = location_requests(&current, &self.unchanged_location_ids);
        tracing::debug!(
            container = %self.name,
            entries = requests.len(),
            "computed location change-set"
        );
        Ok(requests)
    }

    /// Outbound create/update body: an explicit allow-list, gated on field
    /// editability. Locations are submitted only for the image scheme;
    /// `grid_layout` is always included.
    pub fn params_for_backend(&self) -> Result<ContainerParams, CoreError> {
        let locations = if self.c_type == ContainerType::Image
            && self.editable.locations_image
            && self.locations.is_some()
        {
            Some(self.locations_for_api()?)
        } else {
            None
        };
        Ok(ContainerParams {
            id: self.id,
            name: self.name.clone(),
            can_store_containers: self.editable.can_store.then_some(self.can_store_containers),
            can_store_samples: self.editable.can_store.then_some(self.can_store_samples),
            locations,
            new_base64_locations_image: self
                .editable
                .locations_image
                .then(|| self.new_base64_locations_image.clone())
                .flatten(),
            c_type: self.editable.organization.then_some(self.c_type),
            grid_layout: self.grid_layout,
        })
    }

    /// Stages a newly uploaded background image for the image scheme.
    pub fn set_locations_image(&mut self, base64: String) {
        self.locations_image = Some(base64.clone());
        self.new_base64_locations_image = Some(base64);
    }

    // -----------------------------------------------------------------------
    // Organizational scheme
    // -----------------------------------------------------------------------

    /// Switches the organizational scheme. Workbench is not a selectable
    /// target; it is intrinsic to a user's personal container.
    pub fn set_organization(&mut self, new_type: ContainerType) -> Result<(), CoreError> {
        match new_type {
            ContainerType::Workbench => {
                return Err(CoreError::Validation(
                    "workbench is not a selectable organization".into(),
                ));
            }
            ContainerType::Grid => {
                self.grid_layout = Some(GridLayout::single_cell());
            }
            ContainerType::Image => {
                self.grid_layout = None;
                // Seed the background with the preview image as a starting
                // point when one exists.
                if self.locations_image.is_none() {
                    self.locations_image = self.image.clone();
                }
            }
            ContainerType::List => {
                self.grid_layout = None;
            }
        }
        self.c_type = new_type;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Capacity and move gating
    // -----------------------------------------------------------------------

    /// Empty slots remaining, from the permissioned content summary.
    pub fn available_locations(&self) -> Option<u32> {
        match (self.locations_count, self.content_summary) {
            (Some(count), Some(summary)) => Some(count.saturating_sub(summary.total_count)),
            _ => None,
        }
    }

    /// Whether the container can absorb the records selected for the move.
    /// Unbounded schemes always can; otherwise empty slots are compared
    /// against the selected records not already claimed by one of this
    /// container's locations, so manual partial pre-placement is not
    /// double-counted.
    pub fn has_enough_space(
        &self,
        move_ctx: &MoveContext,
        store: &RecordStore,
    ) -> Result<bool, CoreError> {
        if self.c_type.is_unbounded() {
            return Ok(true);
        }
        let locations = self.locations()?;
        let empty = locations.iter().filter(|l| !l.has_content(store)).count();
        let already_placed: HashSet<GlobalId> =
            locations.iter().filter_map(|l| l.content).collect();
        let to_place = move_ctx
            .selected
            .iter()
            .filter(|gid| !already_placed.contains(gid))
            .count();
        Ok(empty >= to_place)
    }

    /// Whether committing the move would make this container contain itself
    /// or one of its ancestors. Must be false before a move may complete.
    pub fn moving_into_itself(&self, move_ctx: &MoveContext) -> bool {
        let mut forbidden: HashSet<GlobalId> = self
            .lineage
            .all_parents()
            .iter()
            .map(|p| p.global_id)
            .collect();
        if let Some(gid) = self.global_id {
            forbidden.insert(gid);
        }
        move_ctx.selected.iter().any(|gid| forbidden.contains(gid))
    }

    /// Whether the record kinds selected for the move are storable here.
    pub fn can_store_record_types(&self, move_ctx: &MoveContext, store: &RecordStore) -> bool {
        (!move_ctx.includes_containers(store) || self.can_store_containers)
            && (!move_ctx.includes_sub_samples(store) || self.can_store_samples)
    }

    /// Storability check usable before the container's contents have been
    /// fetched: kind capability and self-containment, without the space
    /// check (space cannot be known without content info).
    pub fn can_store_records_from_info_data(
        &self,
        move_ctx: &MoveContext,
        store: &RecordStore,
    ) -> bool {
        self.can_store_record_types(move_ctx, store) && !self.moving_into_itself(move_ctx)
    }

    /// Full storability check, including capacity.
    pub fn can_store_records(
        &self,
        move_ctx: &MoveContext,
        store: &RecordStore,
    ) -> Result<bool, CoreError> {
        Ok(self.can_store_records_from_info_data(move_ctx, store)
            && self.has_enough_space(move_ctx, store)?)
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn selection(&self) -> Option<&SelectionRect> {
        self.selection.as_ref()
    }

    /// Begins a drag rectangle at the pointer. Any prior rectangle is
    /// superseded; the initial rectangle is zero-size at the pointer.
    pub fn start_selection(
        &mut self,
        pointer: PointerPosition,
        viewport: &Viewport,
        padding: &Padding,
    ) {
        let local = viewport.localize(pointer);
        self.selection = Some(SelectionRect::new(local));
        self.selection_mode = true;
        self.move_selection(pointer, viewport, padding);
    }

    /// Recomputes the rectangle's far corner from the pointer, clamped to
    /// the viewport minus the dragger allowance and caller padding.
    pub fn move_selection(
        &mut self,
        pointer: PointerPosition,
        viewport: &Viewport,
        padding: &Padding,
    ) {
        if !self.selection_mode {
            return;
        }
        let local = viewport.localize(pointer);
        if let Some(rect) = &mut self.selection {
            rect.move_to(local, viewport, padding);
        }
    }

    /// Completes the gesture: toggles every covered, selectable location,
    /// then leaves selection mode.
    pub fn stop_selection(
        &mut self,
        search: &ContentSearch,
        store: &mut RecordStore,
        move_ctx: &MoveContext,
    ) -> Result<(), CoreError> {
        let candidates: Vec<usize> = {
            let rect = self.selection.as_ref();
            self.locations()?
                .iter()
                .enumerate()
                .filter(|(_, l)| {
                    l.is_shallow(rect, &self.content_search, search, store)
                        && l.is_selectable(&self.content_search, search, store)
                })
                .map(|(i, _)| i)
                .collect()
        };
        tracing::debug!(
            container = %self.name,
            toggled = candidates.len(),
            "completing drag selection"
        );
        for index in candidates {
            self.on_select(index, search, store, move_ctx)?;
        }
        self.selection_mode = false;
        self.selection = None;
        Ok(())
    }

    /// Selection policy for a single location at gesture completion:
    /// already-selected locations deselect; otherwise capacity-limited
    /// searches select up to the limit, empty-only searches select empty
    /// slots, and unrestricted browsing selects only occupied slots so
    /// decorative empty cells stay inert.
    pub fn on_select(
        &mut self,
        index: usize,
        search: &ContentSearch,
        store: &mut RecordStore,
        move_ctx: &MoveContext,
    ) -> Result<(), CoreError> {
        let (selected, has_content, selectable) = {
            let location = self.location(index)?;
            (
                location.selected,
                location.has_content(store),
                location.is_selectable(&self.content_search, search, store),
            )
        };

        if selected {
            return self.toggle_location_selected(index, Some(false), store, move_ctx);
        }

        let within_limit = match search.ui.selection_limit {
            Some(limit) => self.selected_count()? < limit,
            None => true,
        };

        if search.ui.only_allow_selecting_empty_locations || search.ui.selection_limit.is_some() {
            if selectable && within_limit {
                self.toggle_location_selected(index, Some(true), store, move_ctx)?;
            }
        } else if has_content {
            self.toggle_location_selected(index, Some(true), store, move_ctx)?;
        }
        Ok(())
    }

    /// Flips (or sets) a location's selection flag.
    ///
    /// During a move whose browsed target is a container, selecting an empty
    /// location claims the first moved record not already claimed by another
    /// selected location (first-fit); deselecting releases the claim.
    /// Outside list containers and outside moves, the new flag is propagated
    /// to the occupant's record in the content cache so selection stays in
    /// sync across alternate views; the propagation re-dispatches only on a
    /// differing flag, keeping it idempotent.
    pub fn toggle_location_selected(
        &mut self,
        index: usize,
        value: Option<bool>,
        store: &mut RecordStore,
        move_ctx: &MoveContext,
    ) -> Result<(), CoreError> {
        let current = self.location(index)?.selected;
        let value = value.unwrap_or(!current);

        if move_ctx.moving && move_ctx.active_result_is_container() {
            if value {
                if self.location(index)?.content.is_none() {
                    let claimed: HashSet<GlobalId> = self
                        .locations()?
                        .iter()
                        .enumerate()
                        .filter(|(i, l)| *i != index && l.selected)
                        .filter_map(|(_, l)| l.content)
                        .collect();
                    let first_fit = move_ctx
                        .selected
                        .iter()
                        .copied()
                        .find(|gid| !claimed.contains(gid));
                    self.locations_mut()?[index].content = first_fit;
                    self.locations_dirty = true;
                }
            } else {
                self.locations_mut()?[index].content = None;
                self.locations_dirty = true;
            }
        }

        self.locations_mut()?[index].selected = value;

        if self.c_type != ContainerType::List && !move_ctx.moving {
            if let Some(gid) = self.location(index)?.content {
                if self.content_search.cache.contains(&gid) {
                    if let Some(record) = store.get_mut(gid) {
                        if record.selected != value {
                            record.selected = value;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Clears every selection in this container, then selects the given
    /// location (single-target placement during creation flows).
    pub fn select_only_this(
        &mut self,
        index: usize,
        store: &mut RecordStore,
        move_ctx: &MoveContext,
    ) -> Result<(), CoreError> {
        let count = self.locations()?.len();
        for i in 0..count {
            if i != index {
                self.toggle_location_selected(i, Some(false), store, move_ctx)?;
            }
        }
        self.toggle_location_selected(index, Some(true), store, move_ctx)
    }

    // -----------------------------------------------------------------------
    // Sibling subsamples and coloring
    // -----------------------------------------------------------------------

    /// Other locations whose occupant is a subsample of the same parent
    /// sample as this location's occupant. Empty when the occupant is not a
    /// subsample or has no sample id yet.
    pub fn siblings(&self, index: usize, store: &RecordStore) -> Result<Vec<usize>, CoreError> {
        let locations = self.locations()?;
        let sample_id = self
            .location(index)?
            .content
            .and_then(|gid| store.get(gid))
            .filter(|r| r.is_sub_sample())
            .and_then(|r| r.sample_id);
        let Some(sample_id) = sample_id else {
            return Ok(Vec::new());
        };
        Ok(locations
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .filter(|(_, l)| {
                l.content
                    .and_then(|gid| store.get(gid))
                    .is_some_and(|r| r.is_sub_sample() && r.sample_id == Some(sample_id))
            })
            .map(|(i, _)| i)
            .collect())
    }

    /// Whether any sibling of this location is selected.
    pub fn is_sibling_selected(
        &self,
        index: usize,
        store: &RecordStore,
    ) -> Result<bool, CoreError> {
        let locations = self.locations()?;
        Ok(self
            .siblings(index, store)?
            .into_iter()
            .any(|i| locations[i].selected))
    }

    /// Color for the given sample's sibling group. The full assignment is
    /// rebuilt wholesale whenever a not-yet-cached sample id is requested,
    /// spacing hues evenly over the distinct groups present.
    pub fn get_color(
        &mut self,
        sample_id: DbId,
        store: &RecordStore,
    ) -> Result<String, CoreError> {
        if !self.color_cache.contains_key(&sample_id) {
            let mut ids: Vec<DbId> = self
                .locations()?
                .iter()
                .filter_map(|l| l.content)
                .filter_map(|gid| store.get(gid))
                .filter(|r| r.is_sub_sample())
                .filter_map(|r| r.sample_id)
                .collect();
            ids.push(sample_id);
            self.color_cache = assign_group_colors(&ids);
        }
        Ok(self
            .color_cache
            .get(&sample_id)
            .cloned()
            .unwrap_or_else(|| EMPTY_COLOR.to_string()))
    }

    /// Color of a location: its occupant's sibling-group color for
    /// subsamples, white otherwise.
    pub fn unique_color(
        &mut self,
        index: usize,
        store: &RecordStore,
    ) -> Result<String, CoreError> {
        let sample_id = self
            .location(index)?
            .content
            .and_then(|gid| store.get(gid))
            .filter(|r| r.is_sub_sample())
            .and_then(|r| r.sample_id);
        match sample_id {
            Some(sample_id) => self.get_color(sample_id, store),
            None => Ok(EMPTY_COLOR.to_string()),
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Field-level validation for create/update. Non-throwing: the outcome
    /// drives UI feedback.
    pub fn validate(&self) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::ok();
        if self.name.trim().is_empty() {
            outcome.push("name", "name must not be empty");
        }
        if !self.can_store_containers && !self.can_store_samples {
            outcome.push(
                "canStoreContainers",
                "must be able to store at least one of containers or samples",
            );
        }
        if let Some(layout) = &self.grid_layout {
            layout.check(&mut outcome);
        }
        outcome
    }

    // -----------------------------------------------------------------------
    // Additional-info fetch coalescing
    // -----------------------------------------------------------------------

    /// Returns true when the caller should issue the fetch; false when one
    /// is already in flight or done, in which case the caller awaits the
    /// shared result instead of duplicating the request.
    pub fn begin_additional_info_fetch(&mut self) -> bool {
        match self.fetch_state {
            FetchState::NotFetched => {
                self.fetch_state = FetchState::InFlight;
                true
            }
            FetchState::InFlight | FetchState::Fetched => false,
        }
    }

    pub fn complete_additional_info_fetch(&mut self) {
        self.fetch_state = FetchState::Fetched;
    }
}

impl Movable for Container {
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

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use benchstock_core::grid::LabelType;
    use benchstock_core::types::RecordKind;
    use benchstock_core::wire::{ParentContainerPayload, RecordPayload};

    fn layout(cols: u32, rows: u32) -> GridLayout {
        GridLayout {
            columns_number: cols,
            rows_number: rows,
            columns_label_type: LabelType::N123,
            rows_label_type: LabelType::Abc,
        }
    }

    fn subsample_payload(id: DbId, sample_id: DbId) -> RecordPayload {
        RecordPayload {
            id: Some(id),
            global_id: Some(GlobalId::new(RecordKind::SubSample, id)),
            kind: RecordKind::SubSample,
            name: format!("aliquot {id}"),
            deleted: false,
            owner: None,
            sample_id: Some(sample_id),
            can_store_containers: None,
            can_store_samples: None,
            c_type: None,
            last_move_date: None,
            created: None,
            parent_containers: vec![],
        }
    }

    fn occupied(id: DbId, x: i32, y: i32, content: RecordPayload) -> LocationPayload {
        LocationPayload {
            id: Some(id),
            coord_x: Some(x),
            coord_y: Some(y),
            content: Some(content),
        }
    }

    fn empty_slot(id: DbId, x: i32, y: i32) -> LocationPayload {
        LocationPayload {
            id: Some(id),
            coord_x: Some(x),
            coord_y: Some(y),
            content: None,
        }
    }

    fn grid_payload(cols: u32, rows: u32, locations: Vec<LocationPayload>) -> ContainerPayload {
        ContainerPayload {
            id: Some(5),
            global_id: Some(GlobalId::new(RecordKind::Container, 5)),
            name: "shelf".into(),
            c_type: ContainerType::Grid,
            can_store_containers: Some(true),
            can_store_samples: Some(true),
            grid_layout: Some(layout(cols, rows)),
            locations: Some(locations),
            locations_count: None,
            content_summary: None,
            parent_containers: vec![],
            last_move_date: None,
            created: None,
            deleted: false,
            locations_image: None,
            image: None,
        }
    }

    fn list_payload(locations: Vec<LocationPayload>) -> ContainerPayload {
        ContainerPayload {
            c_type: ContainerType::List,
            grid_layout: None,
            locations: Some(locations),
            ..grid_payload(1, 1, vec![])
        }
    }

    fn target_container(gid: GlobalId) -> MoveContext {
        let mut ctx = MoveContext::begin(vec![]);
        ctx.active_result = Some(gid);
        ctx
    }

    fn ss(id: DbId) -> GlobalId {
        GlobalId::new(RecordKind::SubSample, id)
    }

    // -- population -----------------------------------------------------------

    #[test]
    fn grid_population_synthesizes_full_cartesian() {
        let mut store = RecordStore::new();
        let payload = grid_payload(3, 2, vec![occupied(21, 2, 1, subsample_payload(3, 1))]);
        let container = Container::from_payload(&payload, &mut store).unwrap();

        let locations = container.locations().unwrap();
        assert_eq!(locations.len(), 6);
        let coords: Vec<_> = locations
            .iter()
            .map(|l| (l.coord_x.unwrap(), l.coord_y.unwrap()))
            .collect();
        assert_eq!(coords, vec![(1, 1), (2, 1), (3, 1), (1, 2), (2, 2), (3, 2)]);
        assert_eq!(locations[1].content, Some(ss(3)));
        assert!(locations[0].content.is_none());
        assert_eq!(container.locations_count, Some(6));
        assert!(store.contains(ss(3)));
    }

    #[test]
    fn grid_location_outside_layout_is_ignored() {
        let mut store = RecordStore::new();
        let payload = grid_payload(1, 1, vec![occupied(21, 5, 5, subsample_payload(3, 1))]);
        let container = Container::from_payload(&payload, &mut store).unwrap();
        let locations = container.locations().unwrap();
        assert_eq!(locations.len(), 1);
        assert!(locations[0].content.is_none());
    }

    #[test]
    fn grid_payload_without_layout_is_rejected() {
        let mut store = RecordStore::new();
        let mut payload = grid_payload(2, 2, vec![]);
        payload.grid_layout = None;
        assert_matches!(
            Container::from_payload(&payload, &mut store),
            Err(CoreError::State(_))
        );
    }

    #[test]
    fn repopulation_is_reentrant() {
        let mut store = RecordStore::new();
        let first = grid_payload(2, 1, vec![occupied(21, 1, 1, subsample_payload(3, 1))]);
        let mut container = Container::from_payload(&first, &mut store).unwrap();
        assert_eq!(container.unchanged_location_ids(), &[21]);
        assert_eq!(container.content_search.cache, vec![ss(3)]);

        let second = grid_payload(2, 1, vec![occupied(22, 2, 1, subsample_payload(4, 1))]);
        container.populate_from_payload(&second, &mut store).unwrap();

        let locations = container.locations().unwrap();
        assert_eq!(locations.len(), 2);
        assert!(locations[0].content.is_none());
        assert_eq!(locations[1].content, Some(ss(4)));
        assert_eq!(container.unchanged_location_ids(), &[22]);
        assert_eq!(container.content_search.cache, vec![ss(4)]);
        assert_eq!(
            container.content_search.parent_global_id,
            Some(GlobalId::new(RecordKind::Container, 5))
        );
    }

    #[test]
    fn list_population_wraps_locations_as_received() {
        let mut store = RecordStore::new();
        let payload = list_payload(vec![
            occupied(3, 0, 0, subsample_payload(1, 1)),
            occupied(1, 0, 0, subsample_payload(2, 1)),
        ]);
        let container = Container::from_payload(&payload, &mut store).unwrap();
        let locations = container.locations().unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].id, Some(3));
        assert_eq!(container.locations_count, None);
    }

    #[test]
    fn locations_unknown_until_fetched() {
        let container = Container::new(ContainerType::List);
        assert_matches!(container.locations(), Err(CoreError::LocationsUnknown));
        assert_matches!(
            container.locations_for_api(),
            Err(CoreError::LocationsUnknown)
        );
        assert_matches!(
            container.selected_locations(),
            Err(CoreError::LocationsUnknown)
        );
    }

    // -- sorted order and deletion --------------------------------------------

    #[test]
    fn sorted_locations_orders_persisted_by_id_then_new() {
        let mut store = RecordStore::new();
        let payload = list_payload(vec![empty_slot(3, 0, 0), empty_slot(1, 0, 0)]);
        let mut container = Container::from_payload(&payload, &mut store).unwrap();
        container
            .add_location(Location::empty_at(0, 0))
            .unwrap();
        let order = container.sorted_locations().unwrap();
        let ids: Vec<_> = order
            .iter()
            .map(|&i| container.locations().unwrap()[i].id)
            .collect();
        assert_eq!(ids, vec![Some(1), Some(3), None]);
    }

    #[test]
    fn delete_sorted_location_uses_display_order() {
        let mut store = RecordStore::new();
        let payload = list_payload(vec![empty_slot(3, 0, 0), empty_slot(1, 0, 0)]);
        let mut container = Container::from_payload(&payload, &mut store).unwrap();
        container.delete_sorted_location(0).unwrap();
        let locations = container.locations().unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].id, Some(3));
        assert!(container.has_unsaved_location_edits());
    }

    // -- location change-set --------------------------------------------------

    #[test]
    fn change_set_partitions_existing_new_and_deleted() {
        let mut store = RecordStore::new();
        let payload = list_payload(vec![
            empty_slot(1, 0, 0),
            empty_slot(2, 0, 0),
            empty_slot(3, 0, 0),
        ]);
        let mut container = Container::from_payload(&payload, &mut store).unwrap();
        container.delete_sorted_location(0).unwrap();
        container.add_location(Location::empty_at(0, 0)).unwrap();

        let requests = container.locations_for_api().unwrap();
        assert_eq!(requests.len(), 4);
        assert_matches!(requests[0], LocationRequest::Existing { id: 2, .. });
        assert_matches!(requests[1], LocationRequest::Existing { id: 3, .. });
        assert_matches!(requests[2], LocationRequest::New { .. });
        assert_matches!(requests[3], LocationRequest::Delete { id: 1, .. });

        let mut ids: Vec<_> = requests.iter().filter_map(|r| r.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn unedited_container_round_trips_without_changes() {
        let mut store = RecordStore::new();
        let mut payload = grid_payload(
            2,
            1,
            vec![
                occupied(21, 1, 1, subsample_payload(3, 1)),
                empty_slot(22, 2, 1),
            ],
        );
        payload.c_type = ContainerType::Image;
        payload.grid_layout = None;
        let container = Container::from_payload(&payload, &mut store).unwrap();

        let params = container.params_for_backend().unwrap();
        let requests = params.locations.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests
            .iter()
            .all(|r| matches!(r, LocationRequest::Existing { .. })));
        assert_eq!(
            requests.iter().filter_map(|r| r.id()).collect::<Vec<_>>(),
            vec![21, 22]
        );
    }

    #[test]
    fn echoed_change_set_rehydrates_identically() {
        let mut store = RecordStore::new();
        let mut payload = grid_payload(
            2,
            1,
            vec![
                occupied(21, 1, 1, subsample_payload(3, 1)),
                empty_slot(22, 2, 1),
            ],
        );
        payload.c_type = ContainerType::Image;
        payload.grid_layout = None;
        let container = Container::from_payload(&payload, &mut store).unwrap();

        // The server echoes the submitted locations back with their contents.
        let echoed: Vec<LocationPayload> = container
            .params_for_backend()
            .unwrap()
            .locations
            .unwrap()
            .into_iter()
            .map(|request| match request {
                LocationRequest::Existing {
                    id,
                    coord_x,
                    coord_y,
                } => LocationPayload {
                    id: Some(id),
                    coord_x,
                    coord_y,
                    content: payload
                        .locations
                        .as_ref()
                        .unwrap()
                        .iter()
                        .find(|l| l.id == Some(id))
                        .and_then(|l| l.content.clone()),
                },
                other => panic!("unedited container produced {other:?}"),
            })
            .collect();
        let mut echo = payload.clone();
        echo.locations = Some(echoed);

        let rehydrated = Container::from_payload(&echo, &mut store).unwrap();
        let snapshot = |c: &Container| {
            c.locations()
                .unwrap()
                .iter()
                .map(|l| (l.id, l.coord_x, l.coord_y, l.content))
                .collect::<Vec<_>>()
        };
        assert_eq!(snapshot(&rehydrated), snapshot(&container));
    }

    // -- params gating --------------------------------------------------------

    #[test]
    fn params_respect_field_editability() {
        let mut store = RecordStore::new();
        let mut payload = list_payload(vec![empty_slot(1, 0, 0)]);
        payload.c_type = ContainerType::Image;
        let mut container = Container::from_payload(&payload, &mut store).unwrap();
        container.set_locations_image("newimg".into());

        let params = container.params_for_backend().unwrap();
        assert!(params.locations.is_some());
        assert_eq!(params.new_base64_locations_image.as_deref(), Some("newimg"));
        assert_eq!(params.can_store_containers, Some(true));
        assert_eq!(params.c_type, Some(ContainerType::Image));

        container.editable = EditableFields {
            can_store: false,
            locations_image: false,
            organization: false,
        };
        let params = container.params_for_backend().unwrap();
        assert!(params.locations.is_none());
        assert!(params.new_base64_locations_image.is_none());
        assert!(params.can_store_containers.is_none());
        assert!(params.c_type.is_none());
    }

    #[test]
    fn grid_container_never_submits_locations() {
        let mut store = RecordStore::new();
        let payload = grid_payload(1, 1, vec![]);
        let container = Container::from_payload(&payload, &mut store).unwrap();
        let params = container.params_for_backend().unwrap();
        assert!(params.locations.is_none());
        assert_eq!(params.grid_layout, Some(layout(1, 1)));
    }

    // -- organizational scheme ------------------------------------------------

    #[test]
    fn set_organization_transitions() {
        let mut container = Container::new(ContainerType::List);

        container.set_organization(ContainerType::Grid).unwrap();
        assert_eq!(container.grid_layout, Some(GridLayout::single_cell()));

        container.image = Some("preview".into());
        container.set_organization(ContainerType::Image).unwrap();
        assert_eq!(container.grid_layout, None);
        assert_eq!(container.locations_image.as_deref(), Some("preview"));

        container.set_organization(ContainerType::List).unwrap();
        assert_eq!(container.c_type, ContainerType::List);

        assert_matches!(
            container.set_organization(ContainerType::Workbench),
            Err(CoreError::Validation(_))
        );
        assert_eq!(container.c_type, ContainerType::List);
    }

    // -- capacity and move gating ---------------------------------------------

    #[test]
    fn unbounded_schemes_always_have_space() {
        let container = Container::new(ContainerType::List);
        let store = RecordStore::new();
        let ctx = MoveContext::begin(vec![ss(1), ss(2)]);
        assert!(container.has_enough_space(&ctx, &store).unwrap());
    }

    #[test]
    fn space_check_ignores_records_already_placed_here() {
        let mut store = RecordStore::new();
        let payload = grid_payload(2, 2, vec![occupied(21, 1, 1, subsample_payload(9, 1))]);
        let container = Container::from_payload(&payload, &mut store).unwrap();

        // 3 empty slots, 2 of the 3 selected records still need a slot.
        let ctx = MoveContext::begin(vec![ss(1), ss(2), ss(9)]);
        assert!(container.has_enough_space(&ctx, &store).unwrap());

        let ctx = MoveContext::begin(vec![ss(1), ss(2), ss(3), ss(4), ss(9)]);
        assert!(!container.has_enough_space(&ctx, &store).unwrap());
    }

    #[test]
    fn moving_into_itself_covers_self_and_ancestors() {
        let mut store = RecordStore::new();
        let mut payload = grid_payload(1, 1, vec![]);
        payload.parent_containers = vec![
            ParentContainerPayload {
                id: Some(4),
                global_id: GlobalId::new(RecordKind::Container, 4),
                name: "rack".into(),
                c_type: ContainerType::Grid,
            },
            ParentContainerPayload {
                id: Some(2),
                global_id: GlobalId::new(RecordKind::Bench, 2),
                name: "bench".into(),
                c_type: ContainerType::Workbench,
            },
        ];
        let container = Container::from_payload(&payload, &mut store).unwrap();

        let itself = MoveContext::begin(vec![GlobalId::new(RecordKind::Container, 5)]);
        assert!(container.moving_into_itself(&itself));

        let ancestor = MoveContext::begin(vec![GlobalId::new(RecordKind::Container, 4)]);
        assert!(container.moving_into_itself(&ancestor));

        let unrelated = MoveContext::begin(vec![GlobalId::new(RecordKind::Container, 9)]);
        assert!(!container.moving_into_itself(&unrelated));
    }

    #[test]
    fn record_type_gating_follows_capability_flags() {
        let mut store = RecordStore::new();
        let container_gid = store.ingest(
            Record::from_payload(&RecordPayload {
                id: Some(1),
                global_id: Some(GlobalId::new(RecordKind::Container, 1)),
                kind: RecordKind::Container,
                name: "box".into(),
                deleted: false,
                owner: None,
                sample_id: None,
                can_store_containers: None,
                can_store_samples: None,
                c_type: None,
                last_move_date: None,
                created: None,
                parent_containers: vec![],
            })
            .unwrap(),
        );
        let sub_gid = store.ingest(Record::from_payload(&subsample_payload(2, 1)).unwrap());

        let mut target = Container::new(ContainerType::List);
        target.can_store_containers = false;
        let ctx = MoveContext::begin(vec![container_gid]);
        assert!(!target.can_store_record_types(&ctx, &store));

        let ctx = MoveContext::begin(vec![sub_gid]);
        assert!(target.can_store_record_types(&ctx, &store));

        target.can_store_samples = false;
        assert!(!target.can_store_record_types(&ctx, &store));
    }

    #[test]
    fn full_storability_includes_capacity() {
        let mut store = RecordStore::new();
        let payload = grid_payload(1, 1, vec![occupied(21, 1, 1, subsample_payload(9, 1))]);
        let container = Container::from_payload(&payload, &mut store).unwrap();
        let ctx = MoveContext::begin(vec![ss(1)]);
        assert!(container.can_store_records_from_info_data(&ctx, &store));
        assert!(!container.can_store_records(&ctx, &store).unwrap());
    }

    // -- selection ------------------------------------------------------------

    fn geometry_grid(store: &mut RecordStore) -> Container {
        let payload = grid_payload(
            2,
            1,
            vec![
                occupied(21, 1, 1, subsample_payload(1, 7)),
                occupied(22, 2, 1, subsample_payload(2, 8)),
            ],
        );
        let mut container = Container::from_payload(&payload, store).unwrap();
        container
            .set_location_geometry(
                0,
                Rect {
                    x: 0.0,
                    y: 0.0,
                    width: 10.0,
                    height: 10.0,
                },
            )
            .unwrap();
        container
            .set_location_geometry(
                1,
                Rect {
                    x: 20.0,
                    y: 0.0,
                    width: 10.0,
                    height: 10.0,
                },
            )
            .unwrap();
        container
    }

    fn drag(container: &mut Container, from: (f64, f64), to: (f64, f64)) {
        let viewport = Viewport {
            width: 400.0,
            height: 300.0,
            ..Viewport::default()
        };
        let padding = Padding::default();
        container.start_selection(
            PointerPosition {
                client_x: from.0,
                client_y: from.1,
            },
            &viewport,
            &padding,
        );
        container.move_selection(
            PointerPosition {
                client_x: to.0,
                client_y: to.1,
            },
            &viewport,
            &padding,
        );
    }

    #[test]
    fn stop_selection_toggles_covered_locations() {
        let mut store = RecordStore::new();
        let mut container = geometry_grid(&mut store);
        let search = ContentSearch::new(None);
        let ctx = MoveContext::idle();

        drag(&mut container, (1.0, 1.0), (25.0, 9.0));
        assert!(container.selection_mode);
        container.stop_selection(&search, &mut store, &ctx).unwrap();

        assert_eq!(container.selected_locations().unwrap(), vec![0, 1]);
        assert!(!container.selection_mode);
        assert!(container.selection().is_none());
    }

    #[test]
    fn stop_selection_respects_selection_limit() {
        let mut store = RecordStore::new();
        let mut container = geometry_grid(&mut store);
        let mut search = ContentSearch::new(None);
        search.ui.selection_limit = Some(1);
        let ctx = MoveContext::idle();

        drag(&mut container, (1.0, 1.0), (25.0, 9.0));
        container.stop_selection(&search, &mut store, &ctx).unwrap();
        assert_eq!(container.selected_count().unwrap(), 1);
    }

    #[test]
    fn empty_only_config_selects_only_empty_locations() {
        let mut store = RecordStore::new();
        let payload = grid_payload(2, 1, vec![occupied(21, 1, 1, subsample_payload(1, 7))]);
        let mut container = Container::from_payload(&payload, &mut store).unwrap();
        for i in 0..2 {
            container
                .set_location_geometry(
                    i,
                    Rect {
                        x: 15.0 * i as f64,
                        y: 0.0,
                        width: 10.0,
                        height: 10.0,
                    },
                )
                .unwrap();
        }
        let mut search = ContentSearch::new(None);
        search.ui.only_allow_selecting_empty_locations = true;
        let ctx = MoveContext::idle();

        drag(&mut container, (1.0, 1.0), (24.0, 9.0));
        container.stop_selection(&search, &mut store, &ctx).unwrap();
        assert_eq!(container.selected_locations().unwrap(), vec![1]);
    }

    #[test]
    fn on_select_ignores_empty_locations_without_config() {
        let mut store = RecordStore::new();
        let payload = grid_payload(1, 1, vec![]);
        let mut container = Container::from_payload(&payload, &mut store).unwrap();
        let search = ContentSearch::new(None);
        let ctx = MoveContext::idle();
        container.on_select(0, &search, &mut store, &ctx).unwrap();
        assert_eq!(container.selected_count().unwrap(), 0);
    }

    #[test]
    fn on_select_deselects_an_already_selected_location() {
        let mut store = RecordStore::new();
        let mut container = geometry_grid(&mut store);
        let search = ContentSearch::new(None);
        let ctx = MoveContext::idle();
        container
            .toggle_location_selected(0, Some(true), &mut store, &ctx)
            .unwrap();
        container.on_select(0, &search, &mut store, &ctx).unwrap();
        assert_eq!(container.selected_count().unwrap(), 0);
    }

    #[test]
    fn select_only_this_clears_other_selections() {
        let mut store = RecordStore::new();
        let mut container = geometry_grid(&mut store);
        let ctx = MoveContext::idle();
        container
            .toggle_location_selected(0, Some(true), &mut store, &ctx)
            .unwrap();
        container.select_only_this(1, &mut store, &ctx).unwrap();
        assert_eq!(container.selected_locations().unwrap(), vec![1]);
    }

    // -- placement claiming ---------------------------------------------------

    #[test]
    fn selecting_an_empty_location_claims_first_fit_once() {
        let mut store = RecordStore::new();
        let payload = grid_payload(2, 2, vec![]);
        let mut container = Container::from_payload(&payload, &mut store).unwrap();
        let mut ctx = target_container(GlobalId::new(RecordKind::Container, 5));
        ctx.selected = vec![ss(1), ss(2)];

        container
            .toggle_location_selected(0, Some(true), &mut store, &ctx)
            .unwrap();
        assert_eq!(container.locations().unwrap()[0].content, Some(ss(1)));

        // Selecting again must not reassign.
        container
            .toggle_location_selected(0, Some(true), &mut store, &ctx)
            .unwrap();
        assert_eq!(container.locations().unwrap()[0].content, Some(ss(1)));

        container
            .toggle_location_selected(1, Some(true), &mut store, &ctx)
            .unwrap();
        assert_eq!(container.locations().unwrap()[1].content, Some(ss(2)));
    }

    #[test]
    fn deselecting_releases_the_claim() {
        let mut store = RecordStore::new();
        let payload = grid_payload(2, 2, vec![]);
        let mut container = Container::from_payload(&payload, &mut store).unwrap();
        let mut ctx = target_container(GlobalId::new(RecordKind::Container, 5));
        ctx.selected = vec![ss(1)];

        container
            .toggle_location_selected(0, Some(true), &mut store, &ctx)
            .unwrap();
        container
            .toggle_location_selected(0, Some(false), &mut store, &ctx)
            .unwrap();
        assert!(container.locations().unwrap()[0].content.is_none());

        container
            .toggle_location_selected(2, Some(true), &mut store, &ctx)
            .unwrap();
        assert_eq!(container.locations().unwrap()[2].content, Some(ss(1)));
    }

    // -- cross-view selection sync --------------------------------------------

    #[test]
    fn selection_propagates_to_record_outside_list_scheme() {
        let mut store = RecordStore::new();
        let payload = grid_payload(2, 1, vec![occupied(21, 1, 1, subsample_payload(3, 1))]);
        let mut container = Container::from_payload(&payload, &mut store).unwrap();
        let ctx = MoveContext::idle();

        container
            .toggle_location_selected(0, Some(true), &mut store, &ctx)
            .unwrap();
        assert!(store.get(ss(3)).unwrap().selected);

        // Re-applying the same value is a no-op.
        container
            .toggle_location_selected(0, Some(true), &mut store, &ctx)
            .unwrap();
        assert!(store.get(ss(3)).unwrap().selected);

        container
            .toggle_location_selected(0, Some(false), &mut store, &ctx)
            .unwrap();
        assert!(!store.get(ss(3)).unwrap().selected);
    }

    #[test]
    fn selection_does_not_propagate_in_list_scheme_or_during_moves() {
        let mut store = RecordStore::new();
        let payload = list_payload(vec![occupied(21, 0, 0, subsample_payload(3, 1))]);
        let mut container = Container::from_payload(&payload, &mut store).unwrap();
        container
            .toggle_location_selected(0, Some(true), &mut store, &MoveContext::idle())
            .unwrap();
        assert!(!store.get(ss(3)).unwrap().selected);

        let payload = grid_payload(2, 1, vec![occupied(21, 1, 1, subsample_payload(4, 1))]);
        let mut container = Container::from_payload(&payload, &mut store).unwrap();
        let ctx = MoveContext::begin(vec![ss(9)]);
        container
            .toggle_location_selected(0, Some(true), &mut store, &ctx)
            .unwrap();
        assert!(!store.get(ss(4)).unwrap().selected);
    }

    // -- siblings and colors --------------------------------------------------

    fn sibling_grid(store: &mut RecordStore) -> Container {
        let payload = grid_payload(
            2,
            2,
            vec![
                occupied(21, 1, 1, subsample_payload(1, 7)),
                occupied(22, 2, 1, subsample_payload(2, 7)),
                occupied(23, 1, 2, subsample_payload(3, 8)),
            ],
        );
        Container::from_payload(&payload, store).unwrap()
    }

    #[test]
    fn siblings_share_a_parent_sample() {
        let mut store = RecordStore::new();
        let container = sibling_grid(&mut store);
        assert_eq!(container.siblings(0, &store).unwrap(), vec![1]);
        assert_eq!(container.siblings(2, &store).unwrap(), Vec::<usize>::new());
        assert_eq!(container.siblings(3, &store).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn sibling_selection_is_visible_from_either_side() {
        let mut store = RecordStore::new();
        let mut container = sibling_grid(&mut store);
        let ctx = MoveContext::idle();
        container
            .toggle_location_selected(1, Some(true), &mut store, &ctx)
            .unwrap();
        assert!(container.is_sibling_selected(0, &store).unwrap());
        assert!(!container.is_sibling_selected(2, &store).unwrap());
    }

    #[test]
    fn group_colors_are_stable_and_distinct() {
        let mut store = RecordStore::new();
        let mut container = sibling_grid(&mut store);
        let seven = container.get_color(7, &store).unwrap();
        assert_eq!(container.get_color(7, &store).unwrap(), seven);
        let eight = container.get_color(8, &store).unwrap();
        assert_ne!(seven, eight);
    }

    #[test]
    fn unplaced_sample_id_triggers_a_wholesale_rebuild() {
        let mut store = RecordStore::new();
        let mut container = sibling_grid(&mut store);
        // Warm the cache from the placed groups first.
        container.get_color(7, &store).unwrap();

        let nine = container.get_color(9, &store).unwrap();
        assert_ne!(nine, EMPTY_COLOR);
        assert_eq!(container.get_color(9, &store).unwrap(), nine);

        let seven = container.get_color(7, &store).unwrap();
        let eight = container.get_color(8, &store).unwrap();
        assert_ne!(nine, seven);
        assert_ne!(nine, eight);
        assert_ne!(seven, eight);
    }

    #[test]
    fn empty_location_colors_white() {
        let mut store = RecordStore::new();
        let mut container = sibling_grid(&mut store);
        assert_eq!(container.unique_color(3, &store).unwrap(), EMPTY_COLOR);
        assert_ne!(container.unique_color(0, &store).unwrap(), EMPTY_COLOR);
    }

    // -- validation -----------------------------------------------------------

    #[test]
    fn validation_rules() {
        let mut container = Container::new(ContainerType::Grid);
        container.name = "box".into();
        assert!(container.validate().is_valid());

        container.can_store_containers = false;
        container.can_store_samples = false;
        assert!(!container.validate().is_valid());
        container.can_store_samples = true;

        container.name = "   ".into();
        assert!(!container.validate().is_valid());
        container.name = "box".into();

        container.grid_layout = Some(layout(25, 1));
        let outcome = container.validate();
        assert!(!outcome.is_valid());
        assert!(!outcome.messages_for("gridLayout").is_empty());
    }

    // -- fetch coalescing and summary -----------------------------------------

    #[test]
    fn additional_info_fetch_coalesces() {
        let mut container = Container::new(ContainerType::Grid);
        assert!(container.begin_additional_info_fetch());
        assert!(!container.begin_additional_info_fetch());
        container.complete_additional_info_fetch();
        assert!(!container.begin_additional_info_fetch());
        assert_eq!(container.fetch_state, FetchState::Fetched);
    }

    #[test]
    fn available_locations_requires_permissioned_summary() {
        let mut container = Container::new(ContainerType::Grid);
        container.locations_count = Some(12);
        assert_eq!(container.available_locations(), None);
        container.content_summary = Some(ContentSummary { total_count: 5 });
        assert_eq!(container.available_locations(), Some(7));
    }

    // -- movable --------------------------------------------------------------

    #[test]
    fn container_on_a_bench_is_movable_state() {
        let mut store = RecordStore::new();
        let mut payload = grid_payload(1, 1, vec![]);
        payload.parent_containers = vec![ParentContainerPayload {
            id: Some(2),
            global_id: GlobalId::new(RecordKind::Bench, 2),
            name: "bench".into(),
            c_type: ContainerType::Workbench,
        }];
        let container = Container::from_payload(&payload, &mut store).unwrap();
        assert!(container.is_in_workbench());
        assert!(container.is_on_workbench());
    }
}
