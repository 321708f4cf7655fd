//! Record registry keyed by global id.
//!
//! Occupants of locations, move selections, and search result caches all
//! refer to records through their [`GlobalId`] rather than owning pointers,
//! so independently fetched result sets resolve to a single entry per
//! record and selection state stays consistent across views.

use std::collections::HashMap;

use benchstock_core::error::CoreError;
use benchstock_core::grid::ContainerType;
use benchstock_core::types::{DbId, GlobalId, RecordKind, Timestamp};
use benchstock_core::wire::{ParentContainerPayload, RecordPayload};

/// Lightweight summary of an ancestor container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentContainer {
    pub id: Option<DbId>,
    pub global_id: GlobalId,
    pub name: String,
    pub c_type: ContainerType,
}

impl From<&ParentContainerPayload> for ParentContainer {
    fn from(p: &ParentContainerPayload) -> Self {
        Self {
            id: p.id,
            global_id: p.global_id,
            name: p.name.clone(),
            c_type: p.c_type,
        }
    }
}

/// Parent-container lineage of a record, nearest ancestor first.
///
/// Parsed once from the payload's ancestor chain; the chain entries are
/// summaries, so no deep deserialization of ancestor contents happens here.
/// Empty in the public, unauthenticated view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lineage {
    chain: Vec<ParentContainer>,
}

impl Lineage {
    pub fn from_payload(parents: &[ParentContainerPayload]) -> Self {
        Self {
            chain: parents.iter().map(ParentContainer::from).collect(),
        }
    }

    /// All ancestors, nearest first.
    pub fn all_parents(&self) -> &[ParentContainer] {
        &self.chain
    }

    pub fn immediate_parent(&self) -> Option<&ParentContainer> {
        self.chain.first()
    }

    pub fn root_parent(&self) -> Option<&ParentContainer> {
        self.chain.last()
    }

    /// Deepest ancestor that is not a workbench, walking from the root.
    pub fn last_non_workbench_parent(&self) -> Option<&ParentContainer> {
        self.chain
            .iter()
            .rev()
            .find(|p| p.c_type != ContainerType::Workbench)
    }
}

/// An inventory record as seen by the placement layer: an occupant of a
/// location, a move-selection member, or a search result.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: Option<DbId>,
    pub global_id: GlobalId,
    pub kind: RecordKind,
    pub name: String,
    pub deleted: bool,
    pub owner: Option<String>,

    /// Selection flag of the card/tree view of this record, kept in sync
    /// with location selection of non-list containers.
    pub selected: bool,

    /// Parent sample id, present on subsamples.
    pub sample_id: Option<DbId>,

    /// Capability flags, meaningful on containers.
    pub can_store_containers: bool,
    pub can_store_samples: bool,

    pub lineage: Lineage,
    pub last_move_date: Option<Timestamp>,
    pub created: Option<Timestamp>,
}

impl Record {
    /// Builds a record from its payload. Records without a global id cannot
    /// enter the registry.
    pub fn from_payload(payload: &RecordPayload) -> Result<Self, CoreError> {
        let global_id = payload.global_id.ok_or_else(|| {
            CoreError::State(format!(
                "record '{}' has no global id and cannot be registered",
                payload.name
            ))
        })?;
        Ok(Self {
            id: payload.id,
            global_id,
            kind: payload.kind,
            name: payload.name.clone(),
            deleted: payload.deleted,
            owner: payload.owner.clone(),
            selected: false,
            sample_id: payload.sample_id,
            can_store_containers: payload.can_store_containers.unwrap_or(true),
            can_store_samples: payload.can_store_samples.unwrap_or(true),
            lineage: Lineage::from_payload(&payload.parent_containers),
            last_move_date: payload.last_move_date,
            created: payload.created,
        })
    }

    pub fn is_sub_sample(&self) -> bool {
        self.kind == RecordKind::SubSample
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container_like()
    }
}

/// Registry of all records known to the client session.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: HashMap<GlobalId, Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or refreshes a record, preserving the existing selection flag
    /// so a re-fetch does not clear UI state.
    pub fn ingest(&mut self, record: Record) -> GlobalId {
        let global_id = record.global_id;
        match self.records.get_mut(&global_id) {
            Some(existing) => {
                let selected = existing.selected;
                *existing = record;
                existing.selected = selected;
            }
            None => {
                self.records.insert(global_id, record);
            }
        }
        global_id
    }

    pub fn get(&self, global_id: GlobalId) -> Option<&Record> {
        self.records.get(&global_id)
    }

    pub fn get_mut(&mut self, global_id: GlobalId) -> Option<&mut Record> {
        self.records.get_mut(&global_id)
    }

    pub fn contains(&self, global_id: GlobalId) -> bool {
        self.records.contains_key(&global_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
