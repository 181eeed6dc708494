// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! pageroute CLI library.
//!
//! Hosts the route generator outside a bundler: loads project
//! configuration, runs one-off generation and keeps the routes module up to
//! date while pages change.
//!
//! # Usage
//!
//! ```bash
//! pageroute generate            # Write .x-build/routes.js
//! pageroute generate -f ts      # Write .x-build/routes.ts
//! pageroute watch               # Regenerate on page changes
//! pageroute layouts             # Print the layout modules
//! ```
//!
//! # Configuration
//!
//! Projects are configured via `pageroute.toml` at the project root.

/// CLI commands (generate, watch, layouts).
pub mod commands;
/// Project configuration from `pageroute.toml`.
pub mod config;
/// File system watching for regeneration.
pub mod watcher;
