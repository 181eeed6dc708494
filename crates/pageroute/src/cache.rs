// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Page metadata change detection.
//!
//! Editing a page body does not change the route table; editing its
//! `definePageMeta` call does. [`PageMetaCache`] remembers a fingerprint of
//! each page's declared metadata so a watcher can skip regeneration for
//! body-only edits.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::page_meta::{extract_page_meta, PageMeta};

/// SHA-256 hex fingerprint of a page's metadata (`null` when absent).
pub fn fingerprint(meta: Option<&PageMeta>) -> String {
    let json = match meta {
        Some(meta) => meta.to_value().to_string(),
        None => "null".to_string(),
    };
    format!("{:x}", Sha256::digest(json.as_bytes()))
}

/// Fingerprints of page metadata, keyed by file path.
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct PageMetaCache {
    entries: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl PageMetaCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `fingerprint` for `path`; returns true if it differs from the
    /// stored one (or nothing was stored).
    pub fn update(&self, path: &Path, fingerprint: String) -> Result<bool> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::Cache("Failed to acquire page meta cache lock".to_string()))?;

        if entries.get(path) == Some(&fingerprint) {
            return Ok(false);
        }
        entries.insert(path.to_path_buf(), fingerprint);
        Ok(true)
    }

    /// Forget `path` and every entry below it, e.g. after deletion.
    pub fn remove(&self, path: &Path) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::Cache("Failed to acquire page meta cache lock".to_string()))?;
        entries.retain(|tracked, _| !tracked.starts_with(path));
        Ok(())
    }

    /// Drop every entry.
    pub fn clear(&self) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::Cache("Failed to acquire page meta cache lock".to_string()))?;
        entries.clear();
        Ok(())
    }

    /// Number of tracked files.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns true when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decide whether a change to `file` requires regenerating routes.
    ///
    /// Files that are not `.vue` pages always do. For pages, only a change
    /// in the declared metadata does; the first sighting of a file counts
    /// as a change. Read failures err on the side of regenerating.
    pub async fn has_page_meta_changed(&self, file: &Path) -> bool {
        if file.extension().and_then(|e| e.to_str()) != Some("vue") {
            return true;
        }

        let content = match tokio::fs::read_to_string(file).await {
            Ok(content) => content,
            Err(e) => {
                error!("Failed to check {} for metadata changes: {}", file.display(), e);
                return true;
            }
        };

        let meta = extract_page_meta(&content);
        match self.update(file, fingerprint(meta.as_ref())) {
            Ok(changed) => {
                debug!("Page meta of {} changed: {}", file.display(), changed);
                changed
            }
            Err(e) => {
                error!("{}", e);
                true
            }
        }
    }
}
