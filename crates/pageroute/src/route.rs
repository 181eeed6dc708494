// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Route data types shared by the pipeline stages.

use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

use crate::options::ImportMode;

/// How a route component is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentImport {
    /// Deferred loader: `() => import('<path>')`.
    Lazy(String),
    /// Static import bound to a generated identifier.
    Eager(String),
}

impl ComponentImport {
    /// Creates an import for `path` in the given mode.
    pub fn new(path: impl Into<String>, mode: ImportMode) -> Self {
        match mode {
            ImportMode::Async => ComponentImport::Lazy(path.into()),
            ImportMode::Sync => ComponentImport::Eager(path.into()),
        }
    }

    /// The module specifier being imported.
    pub fn path(&self) -> &str {
        match self {
            ComponentImport::Lazy(path) | ComponentImport::Eager(path) => path,
        }
    }

    /// Returns true for deferred loaders.
    pub fn is_lazy(&self) -> bool {
        matches!(self, ComponentImport::Lazy(_))
    }
}

impl fmt::Display for ComponentImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentImport::Lazy(path) => write!(f, "() => import('{}')", path),
            ComponentImport::Eager(path) => write!(f, "'{}'", path),
        }
    }
}

/// A route derived from one page file, before nesting.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDescriptor {
    /// Path relative to the pages directory.
    pub relative_path: String,
    /// Absolute path of the page file.
    pub absolute_path: PathBuf,
    /// Full URL pattern.
    pub route_path: String,
    /// Route name.
    pub route_name: String,
    /// Component reference.
    pub component: ComponentImport,
    /// Any segment is a parameter.
    pub is_dynamic: bool,
    /// The file is an index file.
    pub is_index: bool,
    /// Any segment is a catch-all.
    pub is_catch_all: bool,
    /// Parameter names in path order.
    pub param_names: Vec<String>,
    /// Route meta (parser metadata merged with page metadata).
    pub meta: Map<String, Value>,
    /// Redirect declared by page metadata.
    pub redirect: Option<Value>,
    /// Alias declared by page metadata.
    pub alias: Option<Value>,
}

/// A route placed in the nested route tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteNode {
    /// Path pattern; relative to the parent for nested routes.
    pub path: String,
    /// Route name.
    pub name: Option<String>,
    /// Component reference.
    pub component: ComponentImport,
    /// Child routes.
    pub children: Vec<RouteNode>,
    /// Route meta.
    pub meta: Map<String, Value>,
    /// Redirect target.
    pub redirect: Option<Value>,
    /// Path alias(es).
    pub alias: Option<Value>,
}

impl From<RouteDescriptor> for RouteNode {
    fn from(descriptor: RouteDescriptor) -> Self {
        Self {
            path: descriptor.route_path,
            name: Some(descriptor.route_name),
            component: descriptor.component,
            children: Vec::new(),
            meta: descriptor.meta,
            redirect: descriptor.redirect,
            alias: descriptor.alias,
        }
    }
}

impl RouteNode {
    /// Total number of nodes in this subtree, including self.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(RouteNode::count).sum::<usize>()
    }

    /// Find a direct child by path.
    pub fn child(&self, path: &str) -> Option<&RouteNode> {
        self.children.iter().find(|c| c.path == path)
    }
}
