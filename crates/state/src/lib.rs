//! Stateful client layer for the benchstock placement core.
//!
//! Mediates between the REST backend's payloads and a reactive UI: records
//! live in a registry keyed by global id, containers own their location
//! slots and drag-selection state, and cross-container moves are coordinated
//! through a shared move context. All mutation is synchronous with respect
//! to a single user gesture; derived state is recomputed on read.

pub mod container;
pub mod location;
pub mod movable;
pub mod moving;
pub mod record;
pub mod search;
pub mod selection;

pub use container::Container;
pub use location::Location;
pub use movable::Movable;
pub use moving::MoveContext;
pub use record::{Record, RecordStore};
pub use search::ContentSearch;
