//! Pagination module
//!
//! Page-number pagination with three ways to end a walk: an empty page, a
//! total page count declared by the server, or a fixed number of pages.
//!
//! # Overview
//!
//! A [`ResourceDescriptor`] says where a collection lives and how its pages
//! are addressed. The harvester walks it page by page, feeding each decoded
//! [`Page`] to [`check_stop_condition`] until the walk is complete.

mod descriptor;
mod types;

pub use descriptor::ResourceDescriptor;
pub use types::{check_stop_condition, Page, PaginationState, StopCondition, StopResult};
