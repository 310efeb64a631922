//! Core definitions (error types, result helpers and page layout), relied upon by all
//! elemkit-* crates.

pub mod error;
pub mod page;
pub mod result;

pub use page::PageLayout;
pub use result::Result;
