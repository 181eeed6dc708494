// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Route generation options.
//!
//! [`RouteOptions`] is consumed by every stage of the pipeline. Defaults
//! follow the usual Vue project layout:
//!
//! | Option | Default |
//! |---|---|
//! | `pages_dir` | `src/pages` |
//! | `extensions` | `[".vue"]` |
//! | `exclude` | `node_modules`, `dist`, dot-directories, `components` |
//! | `import_mode` | `async` |
//! | `virtual_module` | `~virtual-routes` |
//! | `enable_layouts` | `false` |
//! | `layouts_dir` | `src/layouts` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::codegen::ModuleFormat;
use crate::parser::ParseOptions;
use crate::route::RouteNode;

/// Per-route transform; `None` removes the route and its subtree.
pub type ExtendRoute = Arc<dyn Fn(RouteNode) -> Option<RouteNode> + Send + Sync>;

/// Custom exclusion predicate over `/`-separated relative paths.
pub type ExcludePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// How route components are imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Static imports, one identifier per component.
    #[serde(alias = "eager")]
    Sync,
    /// Deferred loaders (code splitting).
    #[default]
    #[serde(alias = "lazy")]
    Async,
}

/// File exclusion rule for directory scans.
#[derive(Clone)]
pub enum Exclude {
    /// Glob patterns matched against relative paths.
    Patterns(Vec<String>),
    /// Arbitrary predicate.
    Predicate(ExcludePredicate),
}

impl Exclude {
    /// Exclude nothing.
    pub fn none() -> Self {
        Exclude::Patterns(Vec::new())
    }

    /// Build a predicate-based rule.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Exclude::Predicate(Arc::new(f))
    }
}

impl Default for Exclude {
    fn default() -> Self {
        Exclude::Patterns(default_exclude())
    }
}

impl fmt::Debug for Exclude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclude::Patterns(patterns) => f.debug_tuple("Patterns").field(patterns).finish(),
            Exclude::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Rewrites a leading directory of component paths into an import alias
/// (`src/pages/a.vue` → `@/pages/a.vue`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAlias {
    /// Prefix to replace, e.g. `src/`.
    pub from: String,
    /// Replacement, e.g. `@/`.
    pub to: String,
}

impl Default for SourceAlias {
    fn default() -> Self {
        Self {
            from: "src/".to_string(),
            to: "@/".to_string(),
        }
    }
}

impl SourceAlias {
    /// Apply the alias to a `/`-separated path.
    pub fn apply(&self, path: &str) -> String {
        match path.strip_prefix(&self.from) {
            Some(rest) => format!("{}{}", self.to, rest),
            None => path.to_string(),
        }
    }
}

/// Options for a route generation pass.
#[derive(Clone)]
pub struct RouteOptions {
    /// Project root; relative directories are resolved against it.
    pub root: PathBuf,
    /// Pages directory, relative to `root`.
    pub pages_dir: String,
    /// Files to skip.
    pub exclude: Exclude,
    /// Page file extensions.
    pub extensions: Vec<String>,
    /// Component import mode.
    pub import_mode: ImportMode,
    /// Path parsing options.
    pub parse: ParseOptions,
    /// Import alias for component paths.
    pub source_alias: Option<SourceAlias>,
    /// Enable the layout system.
    pub enable_layouts: bool,
    /// Layouts directory, relative to `root`.
    pub layouts_dir: String,
    /// Layout used when a route declares none.
    pub default_layout: String,
    /// Component name prefix for generated runtime components.
    pub namespace: Option<String>,
    /// Per-route transform applied after tree construction.
    pub extend_route: Option<ExtendRoute>,
    /// Identifier of the routes virtual module.
    pub virtual_module: String,
    /// Identifier of the layouts virtual module.
    pub layouts_virtual_module: String,
    /// Shape of the generated module.
    pub format: ModuleFormat,
    /// Directory for generated route files, relative to `root`.
    pub out_dir: String,
}

/// Default exclusion globs.
pub fn default_exclude() -> Vec<String> {
    vec![
        "**/node_modules/**".to_string(),
        "**/dist/**".to_string(),
        "**/.*/**".to_string(),
        "**/components/**".to_string(),
    ]
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            pages_dir: "src/pages".to_string(),
            exclude: Exclude::default(),
            extensions: vec![".vue".to_string()],
            import_mode: ImportMode::Async,
            parse: ParseOptions::default(),
            source_alias: Some(SourceAlias::default()),
            enable_layouts: false,
            layouts_dir: "src/layouts".to_string(),
            default_layout: "default".to_string(),
            namespace: None,
            extend_route: None,
            virtual_module: "~virtual-routes".to_string(),
            layouts_virtual_module: "~virtual-layouts".to_string(),
            format: ModuleFormat::Module,
            out_dir: ".x-build".to_string(),
        }
    }
}

impl fmt::Debug for RouteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteOptions")
            .field("root", &self.root)
            .field("pages_dir", &self.pages_dir)
            .field("exclude", &self.exclude)
            .field("extensions", &self.extensions)
            .field("import_mode", &self.import_mode)
            .field("parse", &self.parse)
            .field("source_alias", &self.source_alias)
            .field("enable_layouts", &self.enable_layouts)
            .field("layouts_dir", &self.layouts_dir)
            .field("default_layout", &self.default_layout)
            .field("namespace", &self.namespace)
            .field("extend_route", &self.extend_route.as_ref().map(|_| ".."))
            .field("virtual_module", &self.virtual_module)
            .field("layouts_virtual_module", &self.layouts_virtual_module)
            .field("format", &self.format)
            .field("out_dir", &self.out_dir)
            .finish()
    }
}

impl RouteOptions {
    /// Absolute (root-joined) pages directory.
    pub fn pages_path(&self) -> PathBuf {
        self.root.join(&self.pages_dir)
    }

    /// Absolute (root-joined) layouts directory.
    pub fn layouts_path(&self) -> PathBuf {
        self.root.join(&self.layouts_dir)
    }

    /// Absolute (root-joined) output directory.
    pub fn out_path(&self) -> PathBuf {
        self.root.join(&self.out_dir)
    }

    /// Module specifier for a page, e.g. `@/pages/user/[id].vue`.
    pub fn component_path(&self, dir: &str, relative: &str) -> String {
        let joined = format!("{}/{}", dir.trim_end_matches(['/', '\\']), relative)
            .replace('\\', "/");
        let joined = joined.trim_start_matches("./").to_string();
        match &self.source_alias {
            Some(alias) => alias.apply(&joined),
            None => joined,
        }
    }

    /// Set the extend-route callback.
    pub fn with_extend_route<F>(mut self, f: F) -> Self
    where
        F: Fn(RouteNode) -> Option<RouteNode> + Send + Sync + 'static,
    {
        self.extend_route = Some(Arc::new(f));
        self
    }
}
