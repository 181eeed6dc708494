// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Directory scanning for page and layout files.
//!
//! Scans never fail outright: a directory that cannot be read is logged and
//! contributes no files, and scanning carries on with its siblings. A root
//! that does not exist yields an empty list.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::options::{Exclude, RouteOptions};

/// Compiled exclusion matcher.
#[derive(Clone)]
pub enum ExcludeMatcher {
    /// Compiled glob set.
    Globs(GlobSet),
    /// Caller predicate.
    Predicate(crate::options::ExcludePredicate),
}

impl ExcludeMatcher {
    /// Compile an [`Exclude`] rule.
    pub fn compile(exclude: &Exclude) -> Result<Self> {
        match exclude {
            Exclude::Patterns(patterns) => {
                let mut builder = GlobSetBuilder::new();
                for pattern in patterns {
                    builder.add(Glob::new(pattern)?);
                }
                Ok(ExcludeMatcher::Globs(builder.build()?))
            }
            Exclude::Predicate(predicate) => Ok(ExcludeMatcher::Predicate(predicate.clone())),
        }
    }

    /// Returns true if the `/`-separated relative path is excluded.
    pub fn is_excluded(&self, relative: &str) -> bool {
        match self {
            ExcludeMatcher::Globs(set) => set.is_match(relative),
            ExcludeMatcher::Predicate(predicate) => predicate(relative),
        }
    }

    /// Directory check: a directory is pruned when it or any file below it
    /// would be excluded by a `dir/**` style pattern.
    fn is_dir_excluded(&self, relative: &str) -> bool {
        self.is_excluded(relative) || self.is_excluded(&format!("{}/", relative))
    }
}

/// Options for [`scan_directory`].
#[derive(Clone)]
pub struct ScanOptions {
    /// Accepted extensions (with or without the leading dot).
    pub extensions: Vec<String>,
    /// Exclusion matcher.
    pub exclude: ExcludeMatcher,
}

impl ScanOptions {
    /// Build scan options from extensions and an exclusion rule.
    pub fn new(extensions: &[String], exclude: &Exclude) -> Result<Self> {
        Ok(Self {
            extensions: normalize_extensions(extensions),
            exclude: ExcludeMatcher::compile(exclude)?,
        })
    }

    fn accepts(&self, file_name: &str) -> bool {
        self.extensions.is_empty() || self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }
}

/// Ensure every extension starts with a dot.
pub fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|ext| {
            if ext.starts_with('.') {
                ext.clone()
            } else {
                format!(".{}", ext)
            }
        })
        .collect()
}

/// Read one directory, logging and swallowing failures.
async fn read_entries(dir: &Path) -> Vec<(String, PathBuf, bool)> {
    let result: Result<Vec<(String, PathBuf, bool)>> = async {
        let mut read_dir = tokio::fs::read_dir(dir).await.map_err(|e| Error::Scan {
            dir: dir.display().to_string(),
            message: e.to_string(),
        })?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                debug!("Skipping non UTF-8 entry in {}", dir.display());
                continue;
            };
            let path = entry.path();
            // Follow symlinks the way a plain stat does.
            let metadata = match tokio::fs::metadata(&path).await {
                Ok(m) => m,
                Err(e) => {
                    warn!("Cannot stat {}: {}", path.display(), e);
                    continue;
                }
            };
            if metadata.is_dir() {
                entries.push((name, path, true));
            } else if metadata.is_file() {
                entries.push((name, path, false));
            }
        }
        Ok(entries)
    }
    .await;

    match result {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Directory scan failed: {}", e);
            Vec::new()
        }
    }
}

/// Recursively scan `root` and return sorted `/`-separated relative paths.
pub async fn scan_directory(root: &Path, options: &ScanOptions) -> Vec<String> {
    let mut files = Vec::new();
    let mut pending: Vec<(PathBuf, String)> = vec![(root.to_path_buf(), String::new())];

    while let Some((dir, prefix)) = pending.pop() {
        for (name, path, is_dir) in read_entries(&dir).await {
            let relative = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };

            if is_dir {
                if options.exclude.is_dir_excluded(&relative) {
                    debug!("Excluded directory {}", relative);
                    continue;
                }
                pending.push((path, relative));
            } else if options.accepts(&name) && !options.exclude.is_excluded(&relative) {
                files.push(relative);
            }
        }
    }

    files.sort();
    files
}

/// Scan the pages directory configured in `options`.
pub async fn scan_pages(options: &RouteOptions) -> Result<Vec<String>> {
    let scan = ScanOptions::new(&options.extensions, &options.exclude)?;
    Ok(scan_directory(&options.pages_path(), &scan).await)
}
