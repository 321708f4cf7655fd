//! Three-bucket diff turning in-memory location state into the
//! backend-compatible change-set.
//!
//! Given the current locations and the frozen baseline of ids as last
//! fetched, partitions into updates (have an id), inserts (no id yet), and
//! deletes (baseline ids no longer present). Output order is stable:
//! existing, then new, then deleted; no id ever appears in two buckets.

use std::collections::HashSet;

use crate::types::DbId;
use crate::wire::LocationRequest;

/// The diff-relevant slice of a single location's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationState {
    pub id: Option<DbId>,
    pub coord_x: Option<i32>,
    pub coord_y: Option<i32>,
}

/// Computes the location change-set from `current` state against the
/// `baseline` ids snapshotted at fetch time.
pub fn location_requests(current: &[LocationState], baseline: &[DbId]) -> Vec<LocationRequest> {
    let existing_ids: HashSet<DbId> = current.iter().filter_map(|l| l.id).collect();

    let mut requests: Vec<LocationRequest> = current
        .iter()
        .filter_map(|l| {
            l.id.map(|id| LocationRequest::existing(id, l.coord_x, l.coord_y))
        })
        .collect();

    requests.extend(
        current
            .iter()
            .filter(|l| l.id.is_none())
            .map(|l| LocationRequest::new_location(l.coord_x, l.coord_y)),
    );

    requests.extend(
        baseline
            .iter()
            .filter(|id| !existing_ids.contains(id))
            .map(|id| LocationRequest::delete(*id)),
    );

    requests
}
