//! Headless project drawer for the settle tracker.
//!
//! This crate wires an `AsyncStateTracker` to a project details drawer:
//! - `ProjectSource` for fetching project details
//! - `ProjectDrawer` for open/close state and rendering

pub mod drawer;
pub mod source;

pub use drawer::{DrawerView, ProjectDrawer};
pub use source::{InMemorySource, Project, ProjectId, ProjectSource, SourceError};
