//! Goal and project hierarchies: forest construction from parent-linked
//! records, multi-key sibling ordering and project timelines.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
