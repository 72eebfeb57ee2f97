// src/engine/locks.rs

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::hooks::{Hook, HookRegistry};
use crate::types::ConcurrencyMode;

/// One mutex per `serial` hook.
///
/// The set of hooks is fixed at startup, so the map itself is never written
/// after construction and needs no lock of its own.
#[derive(Debug, Default)]
pub struct HookLocks {
    locks: HashMap<String, Arc<Mutex<()>>>,
}

impl HookLocks {
    pub fn from_registry(registry: &HookRegistry) -> Self {
        let locks = registry
            .hooks()
            .filter(|hook| hook.concurrency == ConcurrencyMode::Serial)
            .map(|hook| (hook.key.clone(), Arc::new(Mutex::new(()))))
            .collect();
        Self { locks }
    }

    /// Wait for the hook's turn. `None` for `parallel` hooks.
    pub async fn acquire(&self, hook: &Hook) -> Option<OwnedMutexGuard<()>> {
        let lock = self.locks.get(&hook.key)?;
        Some(Arc::clone(lock).lock_owned().await)
    }
}
