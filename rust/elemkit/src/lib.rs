//! # Elemkit: Shared Position Sequences and Splittable Element Ranges
//!
//! Elemkit provides the building blocks for describing and traversing subsets of an
//! element universe, where every element is identified by a dense integer position.
//!
//! ## Key Features
//!
//! * **Copy-on-write sequences**: [`SharedSeq`](support::shared_seq::SharedSeq) shares its
//!   buffer between clones and stores arithmetic runs without any buffer at all
//! * **Uniform range model**: intervals, position lists, live group membership, filtered,
//!   repeated and cached ranges behind a single [`ElementRange`](support::ranges::ElementRange)
//!   type
//! * **Run-based traversal**: a resumable `rewind`/`next` protocol that yields maximal
//!   contiguous runs, never crossing a page boundary
//! * **Page-aligned splitting**: ranges split at page boundaries for fork-join processing
//!   on the rayon thread pool
//!
//! ## Module Organization
//!
//! * [`common`] - Errors, results and page layout shared across components
//!
//! ### Support Modules
//!
//! The [`support`] module contains the data structures:
//!
//! * [`support::shared_seq`] - Copy-on-write sequences of integer values
//! * [`support::ranges`] - Element ranges, traversal state, membership sources and
//!   parallel drivers
//!
//! ## Configuration
//!
//! The page granularity defaults to 1024 positions and can be overridden through the
//! `ELEMKIT_PAGE_BITS` environment variable, see
//! [`PageLayout::from_env`](common::PageLayout::from_env).

pub use elemkit_common as common;

pub mod support {
    pub use elemkit_ranges as ranges;
    pub use elemkit_shared_seq as shared_seq;
}
