// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The generation pipeline.
//!
//! [`RouteGenerator`] runs scan → parse → metadata → tree → extend →
//! codegen and owns the state that persists between passes: the page
//! metadata cache and the last successfully generated module.
//!
//! # Example
//!
//! ```rust,ignore
//! use pageroute::{MemoryModules, RouteGenerator, RouteOptions};
//!
//! let generator = RouteGenerator::new(RouteOptions::default());
//! let modules = MemoryModules::new();
//! generator.regenerate(&modules).await?;
//! ```

use futures_util::future::join_all;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::cache::{fingerprint, PageMetaCache};
use crate::codegen::{generate_routes_code, CodegenOptions};
use crate::error::{Error, Result};
use crate::extend::apply_route_extension;
use crate::layout::{generate_layouts_module, scan_layouts};
use crate::options::RouteOptions;
use crate::page_meta::{extract_page_meta, PageMeta};
use crate::parser::parse_page_file_path;
use crate::route::{ComponentImport, RouteDescriptor, RouteNode};
use crate::scanner::scan_pages;
use crate::tree::build_route_tree;
use crate::virtual_module::VirtualModuleStore;

/// Module content used when generation fails.
pub const EMPTY_ROUTES_MODULE: &str = "export default [];";

/// Generation context.
#[derive(Debug)]
pub struct RouteGenerator {
    options: RouteOptions,
    meta_cache: PageMetaCache,
    last_output: Mutex<Option<String>>,
}

impl RouteGenerator {
    /// Creates a generator for `options`.
    pub fn new(options: RouteOptions) -> Self {
        Self {
            options,
            meta_cache: PageMetaCache::new(),
            last_output: Mutex::new(None),
        }
    }

    /// The options this generator runs with.
    pub fn options(&self) -> &RouteOptions {
        &self.options
    }

    /// The page metadata cache.
    pub fn meta_cache(&self) -> &PageMetaCache {
        &self.meta_cache
    }

    /// Last successfully generated routes module.
    pub fn last_output(&self) -> Option<String> {
        self.last_output.lock().ok().and_then(|last| last.clone())
    }

    fn remember(&self, code: &str) {
        if let Ok(mut last) = self.last_output.lock() {
            *last = Some(code.to_string());
        }
    }

    /// Build the descriptor for one page file.
    ///
    /// Page metadata overrides the derived path and name, merges its `meta`
    /// entries into the route meta, records `layout` and `middleware` there,
    /// and attaches `redirect`/`alias`.
    pub fn create_route_descriptor(&self, relative: &str, page_meta: Option<&PageMeta>) -> Result<RouteDescriptor> {
        let options = &self.options;
        let page = parse_page_file_path(relative, &options.pages_path(), &options.parse)?;
        let parsed = page.parsed;

        let mut meta = parsed.meta;
        meta.insert("isDynamic".to_string(), Value::Bool(parsed.is_dynamic));
        meta.insert("isIndex".to_string(), Value::Bool(parsed.is_index));
        meta.insert("isCatchAll".to_string(), Value::Bool(parsed.is_catch_all));

        if let Some(page_meta) = page_meta {
            for (key, value) in &page_meta.meta {
                meta.insert(key.clone(), value.clone());
            }
            if let Some(middleware) = &page_meta.middleware {
                meta.entry("middleware".to_string()).or_insert_with(|| middleware.clone());
            }
            if let Some(layout) = &page_meta.layout {
                meta.insert("layout".to_string(), layout.to_value());
            }
        }

        let route_path = page_meta
            .and_then(PageMeta::path_override)
            .map(str::to_string)
            .unwrap_or(parsed.route_path);
        let route_name = page_meta
            .and_then(PageMeta::name_override)
            .map(str::to_string)
            .unwrap_or(parsed.route_name);

        Ok(RouteDescriptor {
            relative_path: relative.to_string(),
            absolute_path: page.absolute_path,
            route_path,
            route_name,
            component: ComponentImport::new(
                options.component_path(&options.pages_dir, relative),
                options.import_mode,
            ),
            is_dynamic: parsed.is_dynamic,
            is_index: parsed.is_index,
            is_catch_all: parsed.is_catch_all,
            param_names: parsed.param_names,
            meta,
            redirect: page_meta.and_then(PageMeta::redirect_value).cloned(),
            alias: page_meta.and_then(PageMeta::alias_value).cloned(),
        })
    }

    /// Read and extract metadata for every page concurrently, in input order.
    async fn read_page_meta(&self, page_files: &[String]) -> Vec<Option<PageMeta>> {
        let pages_dir = self.options.pages_path();
        let reads = page_files.iter().map(|relative| {
            let path = pages_dir.join(relative);
            async move {
                match tokio::fs::read_to_string(&path).await {
                    Ok(content) => {
                        let meta = extract_page_meta(&content);
                        if let Err(e) = self.meta_cache.update(&path, fingerprint(meta.as_ref())) {
                            warn!("{}", e);
                        }
                        meta
                    }
                    Err(e) => {
                        warn!("Failed to read file {}: {}", path.display(), e);
                        None
                    }
                }
            }
        });
        join_all(reads).await
    }

    /// Turn scanned page files into the final route tree.
    pub async fn generate_routes(&self, page_files: &[String]) -> Result<Vec<RouteNode>> {
        let metas = self.read_page_meta(page_files).await;

        let descriptors = page_files
            .iter()
            .zip(metas.iter())
            .map(|(relative, meta)| self.create_route_descriptor(relative, meta.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let tree = build_route_tree(descriptors);
        Ok(apply_route_extension(tree, self.options.extend_route.as_ref()))
    }

    /// One full pass producing the routes module.
    pub async fn generate(&self) -> Result<String> {
        let page_files = scan_pages(&self.options).await?;
        debug!("Found {} page files", page_files.len());

        let routes = self.generate_routes(&page_files).await?;
        generate_routes_code(&routes, &CodegenOptions::from(&self.options))
    }

    /// Routes module for the virtual module; never fails.
    ///
    /// A failed pass is logged and yields [`EMPTY_ROUTES_MODULE`].
    pub async fn generate_virtual_module_content(&self) -> String {
        match self.generate().await {
            Ok(code) => {
                self.remember(&code);
                code
            }
            Err(e) => {
                error!("Failed to generate routes: {}", e);
                EMPTY_ROUTES_MODULE.to_string()
            }
        }
    }

    /// Layouts module for the configured layouts directory.
    pub async fn generate_layouts(&self) -> Result<String> {
        let layouts = scan_layouts(
            &self.options.layouts_path(),
            &self.options.extensions,
            &self.options.exclude,
        )
        .await?;
        Ok(generate_layouts_module(&layouts))
    }

    /// Regenerate and publish into `store`.
    ///
    /// On failure the store keeps the last good routes module; if there
    /// never was one, [`EMPTY_ROUTES_MODULE`] is published. Returns whether
    /// new routes were published.
    pub async fn regenerate(&self, store: &dyn VirtualModuleStore) -> Result<bool> {
        let published = match self.generate().await {
            Ok(code) => {
                self.remember(&code);
                store.write_module(&self.options.virtual_module, code)?;
                info!("Routes module {} updated", self.options.virtual_module);
                true
            }
            Err(e) => {
                error!("Failed to regenerate routes: {}", e);
                if self.last_output().is_none() {
                    store.write_module(&self.options.virtual_module, EMPTY_ROUTES_MODULE.to_string())?;
                }
                false
            }
        };

        if self.options.enable_layouts {
            match self.generate_layouts().await {
                Ok(code) => store.write_module(&self.options.layouts_virtual_module, code)?,
                Err(e) => error!("Failed to regenerate layouts: {}", e),
            }
        }

        Ok(published)
    }

    /// Returns true if `path` lies in the layouts directory.
    pub fn is_layout_file(&self, path: &Path) -> bool {
        self.options.enable_layouts && path.starts_with(self.options.layouts_path())
    }

    /// React to a batch of changed files.
    ///
    /// Layout changes regenerate the layouts module. Page changes
    /// regenerate routes only when some page's declared metadata changed,
    /// or a non-page file (or a deleted file) is involved.
    pub async fn handle_changes(&self, paths: &[PathBuf], store: &dyn VirtualModuleStore) -> Result<bool> {
        let (layout_paths, page_paths): (Vec<&PathBuf>, Vec<&PathBuf>) =
            paths.iter().partition(|p| self.is_layout_file(p));

        if !layout_paths.is_empty() {
            let code = self.generate_layouts().await?;
            store.write_module(&self.options.layouts_virtual_module, code)?;
            info!("Layouts module {} updated", self.options.layouts_virtual_module);
        }

        let mut needs_update = false;
        for path in page_paths {
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                self.meta_cache.remove(path)?;
                needs_update = true;
            } else if self.meta_cache.has_page_meta_changed(path).await {
                needs_update = true;
            }
        }

        if !needs_update {
            debug!("No route-relevant changes in {} file(s)", paths.len());
            return Ok(false);
        }

        self.regenerate(store).await
    }

    /// Fail fast on options that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.options.virtual_module.is_empty() {
            return Err(Error::Configuration("virtual module id must not be empty".to_string()));
        }
        if self.options.enable_layouts && self.options.layouts_virtual_module == self.options.virtual_module {
            return Err(Error::Configuration(
                "layouts virtual module id must differ from the routes module id".to_string(),
            ));
        }
        if self.options.extensions.is_empty() {
            return Err(Error::Configuration("at least one page extension is required".to_string()));
        }
        Ok(())
    }
}

impl From<RouteOptions> for RouteGenerator {
    fn from(options: RouteOptions) -> Self {
        Self::new(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ImportMode;
    use crate::virtual_module::MemoryModules;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn project(files: &[(&str, &str)]) -> (TempDir, RouteOptions) {
        let dir = tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        let options = RouteOptions {
            root: dir.path().to_path_buf(),
            ..Default::default()
        };
        (dir, options)
    }

    #[test]
    fn test_descriptor_merges_page_meta() {
        let options = RouteOptions {
            root: PathBuf::from("/app"),
            ..Default::default()
        };
        let generator = RouteGenerator::new(options);
        let page_meta = extract_page_meta(
            "definePageMeta({ layout: 'admin', path: '/people', meta: { title: 'People' }, redirect: '/x', middleware: 'auth' })",
        );

        let descriptor = generator
            .create_route_descriptor("users/index.vue", page_meta.as_ref())
            .unwrap();

        assert_eq!(descriptor.route_path, "/people");
        assert_eq!(descriptor.route_name, "users-index");
        assert_eq!(descriptor.component.path(), "@/pages/users/index.vue");
        assert_eq!(descriptor.absolute_path, PathBuf::from("/app/src/pages/users/index.vue"));
        assert_eq!(descriptor.meta["layout"], "admin");
        assert_eq!(descriptor.meta["title"], "People");
        assert_eq!(descriptor.meta["middleware"], "auth");
        assert_eq!(descriptor.meta["isIndex"], true);
        assert_eq!(descriptor.meta["filePath"], "users/index.vue");
        assert_eq!(descriptor.redirect, Some(Value::from("/x")));
        assert!(descriptor.alias.is_none());
    }

    #[tokio::test]
    async fn test_generate_full_pass() {
        let (_dir, options) = project(&[
            ("src/pages/index.vue", "<template/>"),
            ("src/pages/user.vue", "<template/>"),
            ("src/pages/user/[id].vue", "<script setup>definePageMeta({ layout: false })</script>"),
            ("src/pages/user/components/Avatar.vue", "<template/>"),
        ]);
        let generator = RouteGenerator::new(options);
        let code = generator.generate().await.unwrap();

        assert!(code.starts_with("export default ["));
        assert!(code.contains("\"path\": \"/user\""));
        assert!(code.contains("\"path\": \":id\""));
        assert!(code.contains("\"layout\": false"));
        assert!(!code.contains("Avatar"));
        // metadata of every page is now tracked
        assert_eq!(generator.meta_cache().len(), 3);
    }

    #[tokio::test]
    async fn test_eager_mode() {
        let (_dir, mut options) = project(&[("src/pages/index.vue", "")]);
        options.import_mode = ImportMode::Sync;
        let code = RouteGenerator::new(options).generate().await.unwrap();
        assert!(code.starts_with("import Component0 from '@/pages/index.vue';"));
        assert!(code.contains("\"component\": Component0"));
    }

    #[tokio::test]
    async fn test_extend_route_applies() {
        let (_dir, options) = project(&[("src/pages/index.vue", ""), ("src/pages/secret.vue", "")]);
        let options = options.with_extend_route(|route| (route.path != "/secret").then_some(route));
        let code = RouteGenerator::new(options).generate().await.unwrap();
        assert!(!code.contains("secret"));
    }

    #[tokio::test]
    async fn test_failure_yields_empty_module() {
        let (_dir, mut options) = project(&[("src/pages/index.vue", "")]);
        options.exclude = crate::options::Exclude::Patterns(vec!["[".to_string()]);
        let generator = RouteGenerator::new(options);

        assert_eq!(generator.generate_virtual_module_content().await, EMPTY_ROUTES_MODULE);

        let store = MemoryModules::new();
        assert!(!generator.regenerate(&store).await.unwrap());
        assert_eq!(store.read_module("~virtual-routes").as_deref(), Some(EMPTY_ROUTES_MODULE));
    }

    #[tokio::test]
    async fn test_regenerate_publishes_routes_and_layouts() {
        let (_dir, mut options) = project(&[
            ("src/pages/index.vue", ""),
            ("src/layouts/default.vue", ""),
        ]);
        options.enable_layouts = true;
        let generator = RouteGenerator::new(options);
        let store = MemoryModules::new();

        assert!(generator.regenerate(&store).await.unwrap());
        assert!(store.read_module("~virtual-routes").unwrap().contains("\"path\": \"/\""));
        assert!(store
            .read_module("~virtual-layouts")
            .unwrap()
            .contains("'default': layout0"));
        assert_eq!(generator.last_output(), store.read_module("~virtual-routes"));
    }

    #[tokio::test]
    async fn test_handle_changes_skips_body_edits() {
        let (dir, options) = project(&[("src/pages/about.vue", "<template>a</template>")]);
        let generator = RouteGenerator::new(options);
        let store = MemoryModules::new();
        generator.regenerate(&store).await.unwrap();

        let page = dir.path().join("src/pages/about.vue");
        fs::write(&page, "<template>b</template>").unwrap();
        assert!(!generator.handle_changes(&[page.clone()], &store).await.unwrap());

        fs::write(&page, "<script setup>definePageMeta({ name: 'info' })</script>").unwrap();
        assert!(generator.handle_changes(&[page.clone()], &store).await.unwrap());
        assert!(store.read_module("~virtual-routes").unwrap().contains("\"name\": \"info\""));

        fs::remove_file(&page).unwrap();
        assert!(generator.handle_changes(&[page], &store).await.unwrap());
        assert_eq!(store.read_module("~virtual-routes").as_deref(), Some(EMPTY_ROUTES_MODULE));
    }

    #[tokio::test]
    async fn test_handle_changes_on_directory_move() {
        let (dir, options) = project(&[
            ("src/pages/index.vue", ""),
            ("src/pages/user/[id].vue", ""),
        ]);
        let generator = RouteGenerator::new(options);
        let store = MemoryModules::new();
        generator.regenerate(&store).await.unwrap();
        assert_eq!(generator.meta_cache().len(), 2);

        let old = dir.path().join("src/pages/user");
        let new = dir.path().join("src/pages/people");
        fs::rename(&old, &new).unwrap();

        assert!(generator.handle_changes(&[old, new], &store).await.unwrap());
        let code = store.read_module("~virtual-routes").unwrap();
        assert!(code.contains("\"path\": \"/people/:id\""));
        assert!(!code.contains("/user/"));
    }

    #[test]
    fn test_validate() {
        assert!(RouteGenerator::new(RouteOptions::default()).validate().is_ok());

        let options = RouteOptions {
            extensions: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(
            RouteGenerator::new(options).validate(),
            Err(Error::Configuration(_))
        ));
    }
}
