//! Cadence Render Core
//!
//! Per-frame ordering of drawables: project each one into normalized device
//! space, sort by depth and partition off everything outside a cull volume.

pub mod config;
pub mod error;
pub mod render_list;
pub mod sortable;
pub mod sorter;
pub mod volume;

// Re-export common types for convenience
pub use config::RenderConfig;
pub use error::RenderError;
pub use render_list::{FrameTransforms, RenderList};
pub use sortable::{project_point, DepthItem, DepthSortable};
pub use sorter::{DepthSorter, SortOrder};
pub use volume::{Aabb, Volume};

/// Render result type
pub type Result<T> = core::result::Result<T, RenderError>;
