//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod goal_tree;
pub mod rows;
pub mod sort;
pub mod timeline;

pub use arena::{Forest, TreeNode};
pub use builder::{Hierarchical, HierarchyBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use goal_tree::{GoalTree, TreeOptions};
pub use rows::{GoalRow, ProjectRow, Row};
pub use sort::{compare, locale_compare, SortDirection, SortKey, SortableNode};
pub use timeline::{
    deadline_status, next_milestone, sort_by_deadline, DeadlineStatus, ProjectTimeline,
    TimelineBounds, TimelineScale,
};
