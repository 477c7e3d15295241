use std::collections::HashMap;
use std::sync::RwLock;

use xpost_types::Capability;

use crate::traits::CapabilityKeeper;

/// Capabilities claimed by one module, keyed by path.
#[derive(Default)]
pub struct InMemoryCapabilityKeeper {
    claimed: RwLock<HashMap<String, Capability>>,
}

impl InMemoryCapabilityKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `capability` under its own path. Returns `false` if a
    /// capability was already claimed there (the existing one is kept).
    pub fn claim(&self, capability: Capability) -> bool {
        let Ok(mut claimed) = self.claimed.write() else {
            return false;
        };
        if claimed.contains_key(capability.path()) {
            return false;
        }
        claimed.insert(capability.path().to_string(), capability);
        true
    }

    /// Release the capability claimed under `path`.
    pub fn release(&self, path: &str) -> Option<Capability> {
        self.claimed.write().ok()?.remove(path)
    }

    pub fn len(&self) -> usize {
        self.claimed.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CapabilityKeeper for InMemoryCapabilityKeeper {
    fn get_capability(&self, path: &str) -> Option<Capability> {
        self.claimed.read().ok()?.get(path).cloned()
    }
}
