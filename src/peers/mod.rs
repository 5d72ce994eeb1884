//! Peers Module
//!
//! Routing of keys to owning peers and fetching values from them.

mod http_getter;
mod http_pool;
mod picker;

pub use http_getter::HttpGetter;
pub use http_pool::{normalize_base_path, HttpPool, DEFAULT_BASE_PATH};
pub use picker::{PeerGetter, PeerPicker};
