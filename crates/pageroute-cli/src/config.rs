// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! pageroute project configuration.
//!
//! Configuration is loaded from `pageroute.toml` at the project root.
//!
//! # Example Configuration
//!
//! ```toml
//! [routes]
//! pages_dir = "src/pages"
//! extensions = [".vue"]
//! import_mode = "async"
//! exclude = ["**/components/**"]
//!
//! [layouts]
//! enabled = true
//! dir = "src/layouts"
//! default_layout = "default"
//!
//! [output]
//! dir = ".x-build"
//! format = "ts"
//! ```

use pageroute::options::default_exclude;
use pageroute::{Exclude, ImportMode, ModuleFormat, ParseOptions, RouteOptions, SourceAlias};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "pageroute.toml";

/// Main configuration structure loaded from `pageroute.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Page scanning and route naming.
    #[serde(default)]
    pub routes: RoutesConfig,
    /// Layout system.
    #[serde(default)]
    pub layouts: LayoutsConfig,
    /// Generated file output.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Page scanning and route naming.
#[derive(Debug, Deserialize, Clone)]
pub struct RoutesConfig {
    /// Directory containing page files (default: "src/pages").
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    /// Page file extensions (default: [".vue"]).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns of files to skip.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Component import mode: "async" or "sync" (default: "async").
    #[serde(default)]
    pub import_mode: ImportMode,

    /// Identifier of the routes virtual module (default: "~virtual-routes").
    #[serde(default = "default_virtual_module")]
    pub virtual_module: String,

    /// Lowercase path segments (default: true).
    #[serde(default = "default_true")]
    pub lowercase: bool,

    /// Join parent segments into route names (default: true).
    #[serde(default = "default_true")]
    pub include_parent_in_name: bool,

    /// Separator between route name segments (default: "-").
    #[serde(default = "default_name_separator")]
    pub name_separator: String,

    /// Keep `index` in route paths (default: false).
    #[serde(default)]
    pub keep_index_in_path: bool,

    /// Import alias for component paths (default: "src/" → "@/").
    #[serde(default = "default_source_alias")]
    pub source_alias: Option<SourceAlias>,
}

/// Layout system configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LayoutsConfig {
    /// Enable layouts (default: false).
    #[serde(default)]
    pub enabled: bool,

    /// Directory containing layout files (default: "src/layouts").
    #[serde(default = "default_layouts_dir")]
    pub dir: String,

    /// Layout used when a page declares none (default: "default").
    #[serde(default = "default_layout")]
    pub default_layout: String,

    /// Prefix for generated component names.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Identifier of the layouts virtual module (default: "~virtual-layouts").
    #[serde(default = "default_layouts_virtual_module")]
    pub virtual_module: String,
}

/// Generated file output.
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Output directory (default: ".x-build").
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Module format: "module", "js" or "ts" (default: "js").
    #[serde(default = "default_format")]
    pub format: ModuleFormat,
}

fn default_pages_dir() -> String {
    "src/pages".to_string()
}

fn default_extensions() -> Vec<String> {
    vec![".vue".to_string()]
}

fn default_virtual_module() -> String {
    "~virtual-routes".to_string()
}

fn default_true() -> bool {
    true
}

fn default_name_separator() -> String {
    "-".to_string()
}

fn default_source_alias() -> Option<SourceAlias> {
    Some(SourceAlias::default())
}

fn default_layouts_dir() -> String {
    "src/layouts".to_string()
}

fn default_layout() -> String {
    "default".to_string()
}

fn default_layouts_virtual_module() -> String {
    "~virtual-layouts".to_string()
}

fn default_output_dir() -> String {
    ".x-build".to_string()
}

fn default_format() -> ModuleFormat {
    ModuleFormat::JavaScript
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            extensions: default_extensions(),
            exclude: default_exclude(),
            import_mode: ImportMode::default(),
            virtual_module: default_virtual_module(),
            lowercase: true,
            include_parent_in_name: true,
            name_separator: default_name_separator(),
            keep_index_in_path: false,
            source_alias: default_source_alias(),
        }
    }
}

impl Default for LayoutsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_layouts_dir(),
            default_layout: default_layout(),
            namespace: None,
            virtual_module: default_layouts_virtual_module(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: default_format(),
        }
    }
}

impl Config {
    /// Loads configuration from `pageroute.toml` in the current directory.
    ///
    /// If no configuration file exists, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Loads configuration from `path`, falling back to defaults when it
    /// does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Generator options for a project rooted at `root`.
    pub fn route_options(&self, root: PathBuf) -> RouteOptions {
        let routes = &self.routes;
        RouteOptions {
            root,
            pages_dir: routes.pages_dir.clone(),
            exclude: Exclude::Patterns(routes.exclude.clone()),
            extensions: routes.extensions.clone(),
            import_mode: routes.import_mode,
            parse: ParseOptions {
                keep_extension: false,
                lowercase: routes.lowercase,
                include_parent_in_name: routes.include_parent_in_name,
                name_separator: routes.name_separator.clone(),
                keep_index_in_path: routes.keep_index_in_path,
            },
            source_alias: routes.source_alias.clone(),
            enable_layouts: self.layouts.enabled,
            layouts_dir: self.layouts.dir.clone(),
            default_layout: self.layouts.default_layout.clone(),
            namespace: self.layouts.namespace.clone(),
            extend_route: None,
            virtual_module: routes.virtual_module.clone(),
            layouts_virtual_module: self.layouts.virtual_module.clone(),
            format: self.output.format,
            out_dir: self.output.dir.clone(),
        }
    }
}
