// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

// MetadataParse carries a source snippet for diagnostics.
#![allow(clippy::result_large_err)]

//! # pageroute
//!
//! File-system based route generation for Vue applications.
//!
//! pageroute scans a directory of page components, derives a nested route
//! table from file-path conventions and emits it as JavaScript for
//! `vue-router`, either as a file on disk or as an in-memory virtual module.
//!
//! ## Conventions
//!
//! | File | Route |
//! |---|---|
//! | `index.vue` | `/` |
//! | `about.vue` | `/about` |
//! | `user/[id].vue` | `/user/:id` |
//! | `docs/[...slug].vue` | `/docs/:slug(.*)` |
//!
//! A page named like a directory (`user.vue` next to `user/`) becomes the
//! parent of the pages in that directory. Pages may declare route metadata
//! with `definePageMeta({ ... })`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pageroute::{RouteGenerator, RouteOptions};
//!
//! let generator = RouteGenerator::new(RouteOptions::default());
//! let code = generator.generate().await?;
//! ```

/// Page-meta change detection.
pub mod cache;
/// Route module code generation.
pub mod codegen;
/// Trailing-edge debouncing of regeneration requests.
pub mod debounce;
/// Error types and reporting.
pub mod error;
/// User route transform hook.
pub mod extend;
/// The generation pipeline.
pub mod generator;
/// Layout scanning, module generation and runtime resolution.
pub mod layout;
/// Generation options.
pub mod options;
/// `definePageMeta` extraction and removal.
pub mod page_meta;
/// File path to route parsing.
pub mod parser;
/// Route data types.
pub mod route;
/// Directory scanning.
pub mod scanner;
/// Path segment classification.
pub mod segment;
/// Source map generation for code transforms.
pub mod sourcemap;
/// Nested route tree construction.
pub mod tree;
/// Virtual module storage.
pub mod virtual_module;

pub use cache::{fingerprint, PageMetaCache};
pub use codegen::{generate_routes_code, write_routes_file, CodegenOptions, ModuleFormat};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use error::{Error, Result, SourceContext};
pub use extend::apply_route_extension;
pub use generator::{RouteGenerator, EMPTY_ROUTES_MODULE};
pub use layout::{
    generate_layouts_export, generate_layouts_module, scan_layouts, LayoutFile, LayoutResolver, Namespace,
};
pub use options::{Exclude, ExtendRoute, ImportMode, RouteOptions, SourceAlias};
pub use page_meta::{
    extract_page_meta, inject_page_meta, strip_page_meta, LayoutSelection, PageMeta, StripOptions, TransformResult,
};
pub use parser::{parse_page_file_path, parse_path, ParseOptions, ParsedPath};
pub use route::{ComponentImport, RouteDescriptor, RouteNode};
pub use scanner::{scan_directory, scan_pages};
pub use segment::{classify, ProcessedSegment, SegmentKind};
pub use sourcemap::{SourceMap, SourceMapBuilder};
pub use tree::build_route_tree;
pub use virtual_module::{MemoryModules, VirtualModuleStore};
