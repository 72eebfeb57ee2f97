// src/hooks/registry.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::ConfigFile;
use crate::hooks::Hook;

/// Read-only map from hook key to hook definition.
///
/// Built once at startup and shared between request handlers; there is no
/// reload path.
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    hooks: BTreeMap<String, Arc<Hook>>,
}

impl HookRegistry {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let hooks = cfg
            .hooks
            .iter()
            .map(|(key, hook)| (key.clone(), Arc::new(hook.clone())))
            .collect();
        Self { hooks }
    }

    pub fn lookup(&self, key: &str) -> Option<&Arc<Hook>> {
        self.hooks.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }

    pub fn hooks(&self) -> impl Iterator<Item = &Arc<Hook>> {
        self.hooks.values()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
