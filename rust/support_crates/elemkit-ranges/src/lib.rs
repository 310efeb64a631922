//! Splittable descriptions of element position sets and their traversal protocol.
//!
//! An [`ElementRange`] describes a subset of positions in an element universe together
//! with an iteration order. Ranges are cheap value types: list-backed kinds share their
//! [`SharedSeq`](elemkit_shared_seq::SharedSeq) storage when copied or split.
//!
//! # Key Types
//!
//! - [`ElementRange`] - The closed set of range kinds and the common query, split and
//!   iteration API.
//! - [`IterState`] - Caller-owned resumable cursor for the `rewind`/`next` protocol,
//!   which yields maximal contiguous runs that never cross a page boundary.
//! - [`MembershipSource`] / [`ElementGroup`] - Live membership collaborators backing
//!   group ranges.
//! - [`MembershipQuery`] - Precomputed containment checks for a range's positions.
//! - [`par`] - Fork-join traversal over page-aligned splits.

pub mod bit_set;
pub mod element_range;
pub mod iter_state;
pub mod kinds;
pub mod membership;
pub mod par;
pub mod query;
pub mod universe;

#[cfg(test)]
mod tests;

pub use element_range::{ElementRange, Positions, Runs};
pub use iter_state::IterState;
pub use kinds::{CacheOrder, PositionFilter};
pub use membership::{ElementGroup, MembershipSource};
pub use query::MembershipQuery;
pub use universe::{PositionUniverse, Universe};
