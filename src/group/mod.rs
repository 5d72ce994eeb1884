//! Group Module
//!
//! Named cache namespaces, their loaders and the registry that holds them.

mod getter;
mod lookup;
mod registry;
mod stats;

pub use getter::{Getter, GetterFn};
pub use lookup::Group;
pub use registry::GroupRegistry;
pub use stats::{GroupStats, GroupStatsSnapshot};
