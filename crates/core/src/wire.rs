//! Wire payload types exchanged with the inventory REST backend.
//!
//! Inbound payloads mirror the server's camelCase JSON. The outbound
//! location change-set is a discriminated union of exactly three shapes
//! (existing/new/deleted); it is built field by field, never by reflection
//! over model state.

use serde::{Deserialize, Serialize};

use crate::grid::{ContainerType, GridLayout};
use crate::types::{DbId, GlobalId, RecordKind, Timestamp};

// ---------------------------------------------------------------------------
// Outbound location change-set
// ---------------------------------------------------------------------------

/// One entry of the location change-set sent to the server.
///
/// On the wire:
///
/// ```json
/// { "id": 7, "coordX": 1, "coordY": 2 }
/// { "newLocationRequest": true, "id": null, "coordX": 1, "coordY": 3 }
/// { "id": 9, "deleteLocationRequest": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationRequest {
    #[serde(rename_all = "camelCase")]
    Delete {
        id: DbId,
        delete_location_request: bool,
    },
    #[serde(rename_all = "camelCase")]
    New {
        new_location_request: bool,
        id: Option<DbId>,
        coord_x: Option<i32>,
        coord_y: Option<i32>,
    },
    #[serde(rename_all = "camelCase")]
    Existing {
        id: DbId,
        coord_x: Option<i32>,
        coord_y: Option<i32>,
    },
}

impl LocationRequest {
    pub fn existing(id: DbId, coord_x: Option<i32>, coord_y: Option<i32>) -> Self {
        Self::Existing {
            id,
            coord_x,
            coord_y,
        }
    }

    pub fn new_location(coord_x: Option<i32>, coord_y: Option<i32>) -> Self {
        Self::New {
            new_location_request: true,
            id: None,
            coord_x,
            coord_y,
        }
    }

    pub fn delete(id: DbId) -> Self {
        Self::Delete {
            id,
            delete_location_request: true,
        }
    }

    /// The persisted id this entry refers to, if any.
    pub fn id(&self) -> Option<DbId> {
        match self {
            Self::Delete { id, .. } | Self::Existing { id, .. } => Some(*id),
            Self::New { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound payloads
// ---------------------------------------------------------------------------

/// A record occupying a location or appearing in a search result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPayload {
    #[serde(default)]
    pub id: Option<DbId>,

    #[serde(default)]
    pub global_id: Option<GlobalId>,

    #[serde(rename = "type")]
    pub kind: RecordKind,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub deleted: bool,

    /// Owning user, used by owner-scoped search filters.
    #[serde(default)]
    pub owner: Option<String>,

    /// Parent sample id, present on subsamples.
    #[serde(default)]
    pub sample_id: Option<DbId>,

    /// Capability flags, present on containers.
    #[serde(default)]
    pub can_store_containers: Option<bool>,

    #[serde(default)]
    pub can_store_samples: Option<bool>,

    #[serde(default)]
    pub c_type: Option<ContainerType>,

    #[serde(default)]
    pub last_move_date: Option<Timestamp>,

    #[serde(default)]
    pub created: Option<Timestamp>,

    /// Ancestor chain, nearest first. Empty in the public view.
    #[serde(default)]
    pub parent_containers: Vec<ParentContainerPayload>,
}

/// Lightweight summary of an ancestor container in a parent chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentContainerPayload {
    #[serde(default)]
    pub id: Option<DbId>,

    pub global_id: GlobalId,

    #[serde(default)]
    pub name: String,

    pub c_type: ContainerType,
}

/// A single location slot as fetched from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPayload {
    #[serde(default)]
    pub id: Option<DbId>,

    #[serde(default)]
    pub coord_x: Option<i32>,

    #[serde(default)]
    pub coord_y: Option<i32>,

    #[serde(default)]
    pub content: Option<RecordPayload>,
}

/// Permissioned summary of a container's contents. Absent when the caller
/// lacks permission to see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub total_count: u32,
}

/// A container as fetched from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPayload {
    #[serde(default)]
    pub id: Option<DbId>,

    #[serde(default)]
    pub global_id: Option<GlobalId>,

    #[serde(default)]
    pub name: String,

    pub c_type: ContainerType,

    #[serde(default)]
    pub can_store_containers: Option<bool>,

    #[serde(default)]
    pub can_store_samples: Option<bool>,

    #[serde(default)]
    pub grid_layout: Option<GridLayout>,

    /// Absent when the container's contents have not been fetched.
    #[serde(default)]
    pub locations: Option<Vec<LocationPayload>>,

    #[serde(default)]
    pub locations_count: Option<u32>,

    #[serde(default)]
    pub content_summary: Option<ContentSummary>,

    /// Ancestor chain, nearest first.
    #[serde(default)]
    pub parent_containers: Vec<ParentContainerPayload>,

    #[serde(default)]
    pub last_move_date: Option<Timestamp>,

    #[serde(default)]
    pub created: Option<Timestamp>,

    #[serde(default)]
    pub deleted: bool,

    /// Background image for the image scheme, base64.
    #[serde(default)]
    pub locations_image: Option<String>,

    /// Preview image, base64.
    #[serde(default)]
    pub image: Option<String>,
}

// ---------------------------------------------------------------------------
// Outbound container params
// ---------------------------------------------------------------------------

/// Explicit allow-list of container fields submitted on create/update.
///
/// `grid_layout` is always included, even when `None`; every other optional
/// field is omitted from the JSON body when not being submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_store_containers: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_store_samples: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<LocationRequest>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_base64_locations_image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub c_type: Option<ContainerType>,

    pub grid_layout: Option<GridLayout>,
}
