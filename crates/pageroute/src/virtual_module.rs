// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! In-memory modules served to a bundler under virtual identifiers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};

/// Destination for generated module text.
///
/// Each write replaces the whole module; readers never observe partial
/// content.
pub trait VirtualModuleStore: Send + Sync {
    /// Replace the content of module `id`.
    fn write_module(&self, id: &str, content: String) -> Result<()>;

    /// Current content of module `id`.
    fn read_module(&self, id: &str) -> Option<String>;
}

/// Shared in-memory store. Clones share the same modules.
#[derive(Debug, Clone, Default)]
pub struct MemoryModules {
    modules: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryModules {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifiers of all stored modules, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .modules
            .lock()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }
}

impl VirtualModuleStore for MemoryModules {
    fn write_module(&self, id: &str, content: String) -> Result<()> {
        let mut modules = self
            .modules
            .lock()
            .map_err(|_| Error::Cache("Failed to acquire virtual module lock".to_string()))?;
        modules.insert(id.to_string(), content);
        Ok(())
    }

    fn read_module(&self, id: &str) -> Option<String> {
        self.modules.lock().ok()?.get(id).cloned()
    }
}
