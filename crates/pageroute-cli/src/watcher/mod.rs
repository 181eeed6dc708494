// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! File system watching for route regeneration.
//!
//! This module provides `FileWatcher` for monitoring page and layout
//! directories.
//!
//! # Features
//!
//! - Coalesced file change events (100ms)
//! - Filters for page files and directory moves
//! - Recursive directory watching

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebouncedEvent, Debouncer, RecommendedCache};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const EVENT_WINDOW: Duration = Duration::from_millis(100);

/// Returns true if `path` ends with one of `extensions` (`.vue` or `vue`).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions.iter().any(|wanted| wanted.trim_start_matches('.') == ext)
}

/// Returns true if a change to `path` can affect the route table: a page
/// file, a directory, or a removed path without an extension (a deleted or
/// moved directory).
pub fn is_relevant(path: &Path, extensions: &[String]) -> bool {
    has_extension(path, extensions)
        || path.is_dir()
        || (path.extension().is_none() && !path.exists())
}

/// Watches directories for changes to page files.
///
/// Events are coalesced by notify-debouncer-full; the callback receives
/// the absolute paths accepted by [`is_relevant`]. Dropping
/// the watcher stops watching.
pub struct FileWatcher {
    #[allow(dead_code)]
    debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
}

impl FileWatcher {
    /// Creates a new file watcher for the given directories.
    ///
    /// # Arguments
    ///
    /// * `dirs` - Directories to watch recursively; missing ones are skipped
    /// * `extensions` - File extensions that trigger the callback
    /// * `on_change` - Callback invoked with changed file paths
    pub fn new<F>(dirs: &[PathBuf], extensions: Vec<String>, on_change: F) -> anyhow::Result<Self>
    where
        F: Fn(Vec<PathBuf>) + Send + 'static,
    {
        let mut debouncer = new_debouncer(
            EVENT_WINDOW,
            None,
            move |result: Result<Vec<DebouncedEvent>, Vec<notify::Error>>| match result {
                Ok(events) => {
                    let mut changed: Vec<PathBuf> = events
                        .iter()
                        .flat_map(|e| e.paths.iter())
                        .filter(|p| is_relevant(p, &extensions))
                        .cloned()
                        .collect();
                    changed.sort();
                    changed.dedup();

                    if !changed.is_empty() {
                        on_change(changed);
                    }
                }
                Err(errors) => {
                    for e in errors {
                        warn!("Watch error: {}", e);
                    }
                }
            },
        )?;

        for dir in dirs {
            if dir.exists() {
                debug!("Watching {}", dir.display());
                debouncer.watch(dir, RecursiveMode::Recursive)?;
            } else {
                warn!("Not watching missing directory {}", dir.display());
            }
        }

        Ok(Self { debouncer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_extension() {
        let extensions = vec![".vue".to_string(), "tsx".to_string()];
        assert!(has_extension(Path::new("/a/b/index.vue"), &extensions));
        assert!(has_extension(Path::new("page.tsx"), &extensions));
        assert!(!has_extension(Path::new("/a/b/readme.md"), &extensions));
        assert!(!has_extension(Path::new("/a/b/vue"), &extensions));
    }

    #[test]
    fn test_directory_moves_are_relevant() {
        let dir = tempfile::tempdir().unwrap();
        let extensions = vec![".vue".to_string()];
        let moved = dir.path().join("people");
        std::fs::create_dir(&moved).unwrap();
        std::fs::write(dir.path().join("notes.md"), "").unwrap();

        // rename user/ -> people/ reports both directory paths
        assert!(is_relevant(&dir.path().join("user"), &extensions));
        assert!(is_relevant(&moved, &extensions));
        assert!(is_relevant(&dir.path().join("gone.vue"), &extensions));

        assert!(!is_relevant(&dir.path().join("notes.md"), &extensions));
        assert!(!is_relevant(&dir.path().join(".index.vue.swp"), &extensions));
    }
}
