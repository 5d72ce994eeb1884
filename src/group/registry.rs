//! Group Registry Module
//!
//! Owns every group of a process (or of a test) by name.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::error::{CacheError, Result};
use crate::group::{Getter, Group};

// == Group Registry ==
/// Name -> group map. Lookups share a read lock; registration takes the write lock.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == New Group ==
    /// Creates and registers a group, replacing any group already registered
    /// under `name`.
    ///
    /// Peers address groups as the first path segment, so `name` must be
    /// non-empty and contain no `/`.
    pub fn new_group(
        &self,
        name: impl Into<String>,
        cache_bytes: usize,
        getter: Arc<dyn Getter>,
    ) -> Result<Arc<Group>> {
        let name = name.into();
        if name.is_empty() || name.contains('/') {
            return Err(CacheError::InvalidGroupName(name));
        }
        let group = Arc::new(Group::new(name.clone(), cache_bytes, getter));

        let previous = self.groups.write().insert(name.clone(), group.clone());
        if previous.is_some() {
            warn!(group = %name, "replaced existing group");
        } else {
            info!(group = %name, cache_bytes, "registered group");
        }
        Ok(group)
    }

    // == Get Group ==
    /// Returns the group registered under `name`, if any.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Names of all registered groups, sorted.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GetterFn;

    fn echo_getter() -> Arc<dyn Getter> {
        Arc::new(GetterFn(|key: &str| -> anyhow::Result<Vec<u8>> {
            Ok(key.as_bytes().to_vec())
        }))
    }

    #[test]
    fn test_registry_new_and_get() {
        let registry = GroupRegistry::new();
        let group = registry.new_group("scores", 1024, echo_getter()).unwrap();

        let found = registry.get_group("scores").unwrap();
        assert!(Arc::ptr_eq(&group, &found));
        assert!(registry.get_group("unknown").is_none());
    }

    #[test]
    fn test_registry_replaces_same_name() {
        let registry = GroupRegistry::new();
        let first = registry.new_group("scores", 1024, echo_getter()).unwrap();
        let second = registry.new_group("scores", 2048, echo_getter()).unwrap();

        let found = registry.get_group("scores").unwrap();
        assert!(Arc::ptr_eq(&second, &found));
        assert!(!Arc::ptr_eq(&first, &found));
        assert_eq!(registry.group_names(), vec!["scores"]);
    }

    #[test]
    fn test_registries_are_independent() {
        let a = GroupRegistry::new();
        let b = GroupRegistry::new();
        a.new_group("scores", 1024, echo_getter()).unwrap();

        assert!(a.get_group("scores").is_some());
        assert!(b.get_group("scores").is_none());
    }

    #[tokio::test]
    async fn test_registered_group_serves_gets() {
        let registry = GroupRegistry::new();
        registry.new_group("echo", 1024, echo_getter()).unwrap();
        registry.new_group("alpha", 1024, echo_getter()).unwrap();

        let group = registry.get_group("echo").unwrap();
        assert_eq!(group.get("hello").await.unwrap().to_string(), "hello");
        assert_eq!(registry.group_names(), vec!["alpha", "echo"]);
    }

    #[test]
    fn test_registry_rejects_unroutable_names() {
        let registry = GroupRegistry::new();

        for name in ["", "a/b", "scores/"] {
            let err = registry.new_group(name, 1024, echo_getter()).unwrap_err();
            assert!(matches!(err, CacheError::InvalidGroupName(ref n) if n == name));
        }
        assert!(registry.group_names().is_empty());
    }
}
