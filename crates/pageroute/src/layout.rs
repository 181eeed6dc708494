// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Layout discovery, layout module generation and runtime resolution.
//!
//! Layout files live in their own directory (default `src/layouts`). Each
//! file becomes a named layout:
//!
//! | File | Layout name |
//! |---|---|
//! | `default.vue` | `default` |
//! | `admin.vue` | `admin` |
//! | `admin/wide.vue` | `admin-wide` |
//! | `nested/default.vue` | `default` |
//!
//! Pages pick a layout with `definePageMeta({ layout: 'admin' })` or opt
//! out with `layout: false`; the choice lands in the route's
//! `meta.layout`.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};

use crate::codegen::js_string;
use crate::error::Result;
use crate::options::{Exclude, RouteOptions};
use crate::page_meta::LayoutSelection;
use crate::scanner::{scan_directory, ScanOptions};

/// Module the generated layout export imports its runtime helpers from.
pub const LAYOUT_RUNTIME_MODULE: &str = "@pageroute/vue/layouts";

lazy_static! {
    static ref FILE_EXTENSION: Regex = Regex::new(r"\.\w+$").unwrap();
}

/// A discovered layout file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutFile {
    /// Layout name used by `meta.layout`.
    pub name: String,
    /// Absolute path of the file.
    pub filepath: String,
    /// Import specifier, e.g. `@/layouts/admin.vue`.
    pub component: String,
}

impl LayoutFile {
    /// Derive a layout from its path relative to `layouts_dir`.
    pub fn from_relative(relative: &str, layouts_dir: &Path) -> Self {
        let relative = relative.replace('\\', "/");
        let mut parts: Vec<&str> = relative.split('/').collect();
        let file_name = parts.pop().unwrap_or_default();
        let stem = FILE_EXTENSION.replace(file_name, "").into_owned();

        let name = if stem == "default" || parts.is_empty() {
            stem
        } else {
            format!("{}-{}", parts.join("-"), stem)
        };

        Self {
            name,
            filepath: layouts_dir.join(&relative).display().to_string(),
            component: format!("@/layouts/{}", relative),
        }
    }
}

/// Scan `layouts_dir` for layout files.
pub async fn scan_layouts(layouts_dir: &Path, extensions: &[String], exclude: &Exclude) -> Result<Vec<LayoutFile>> {
    let scan = ScanOptions::new(extensions, exclude)?;
    let layouts: Vec<LayoutFile> = scan_directory(layouts_dir, &scan)
        .await
        .iter()
        .map(|relative| LayoutFile::from_relative(relative, layouts_dir))
        .collect();

    debug!("Found {} layouts in {}", layouts.len(), layouts_dir.display());
    Ok(layouts)
}

/// Generate the layouts virtual module: one deferred loader per layout and a
/// default export mapping names to loaders.
///
/// ```js
/// const layout0 = () => import('@/layouts/default.vue')
/// export default {
///   'default': layout0
/// }
/// ```
pub fn generate_layouts_module(layouts: &[LayoutFile]) -> String {
    let imports: Vec<String> = layouts
        .iter()
        .enumerate()
        .map(|(i, layout)| format!("const layout{} = () => import({})", i, js_string(&layout.component)))
        .collect();
    let exports: Vec<String> = layouts
        .iter()
        .enumerate()
        .map(|(i, layout)| format!("  {}: layout{}", js_string(&layout.name), i))
        .collect();

    format!(
        "// Auto-generated layouts\n{}\n\nexport default {{\n{}\n}}\n",
        imports.join("\n"),
        exports.join(",\n")
    )
}

/// Component name prefixing for generated runtime components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    prefix: String,
}

impl Namespace {
    /// Namespace with the given prefix (may be empty).
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Prefixed component name: `prefix + base`.
    pub fn get_name(&self, base: &str) -> String {
        format!("{}{}", self.prefix, base)
    }
}

impl From<Option<&str>> for Namespace {
    fn from(prefix: Option<&str>) -> Self {
        Self::new(prefix.unwrap_or_default())
    }
}

/// Generate the runtime layout export module.
pub fn generate_layouts_export(options: &RouteOptions) -> Result<String> {
    let namespace = Namespace::from(options.namespace.as_deref());
    let layout_name = namespace.get_name("Layout");
    let runtime_options = serde_json::json!({
        "namespace": options.namespace,
        "defaultLayout": options.default_layout,
    });

    let mut code = String::new();
    code.push_str("// Auto-generated layout component\n");
    code.push_str(&format!(
        "import {{ createLayoutComponent, initLayouts, useLayouts, setPageLayout, getCurrentLayout }} from {}\n",
        js_string(LAYOUT_RUNTIME_MODULE)
    ));
    code.push_str(&format!(
        "import layouts from {}\n\n",
        js_string(&options.layouts_virtual_module)
    ));
    code.push_str(&format!(
        "const options = {};\ninitLayouts(layouts, options);\n\n",
        serde_json::to_string(&runtime_options)?
    ));
    code.push_str(&format!(
        "export const {name} = createLayoutComponent('Layout');\n",
        name = layout_name
    ));
    if layout_name != "Layout" {
        code.push_str(&format!("export const Layout = {};\n", layout_name));
    }
    code.push_str("\nexport { useLayouts, setPageLayout, getCurrentLayout };\n\n");
    code.push_str("// definePageMeta is a compile-time macro, not a runtime export\n");
    code.push_str("export function definePageMeta() {\n");
    code.push_str("  throw new Error('definePageMeta is a compile-time macro and should not be called at runtime');\n");
    code.push_str("}\n");

    Ok(code)
}

/// Deferred layout loader.
pub type LayoutLoader<C> = Arc<dyn Fn() -> BoxFuture<'static, std::result::Result<C, String>> + Send + Sync>;

/// Runtime layout resolution.
///
/// Holds one loader per layout name. Loaded layouts are cached for the
/// lifetime of the resolver; failed loads are not cached.
pub struct LayoutResolver<C> {
    loaders: HashMap<String, LayoutLoader<C>>,
    cache: Arc<Mutex<HashMap<String, C>>>,
    fallback: String,
}

impl<C> fmt::Debug for LayoutResolver<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.loaders.keys().collect();
        names.sort();
        f.debug_struct("LayoutResolver")
            .field("layouts", &names)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl<C: Clone + Send + 'static> LayoutResolver<C> {
    /// Empty resolver falling back to `fallback` (usually `default`).
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            loaders: HashMap::new(),
            cache: Arc::new(Mutex::new(HashMap::new())),
            fallback: fallback.into(),
        }
    }

    /// Register a loader for `name`.
    pub fn register<F, Fut, E>(&mut self, name: impl Into<String>, loader: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<C, E>> + Send + 'static,
        E: fmt::Display,
    {
        let loader: LayoutLoader<C> = Arc::new(move || {
            loader()
                .map(|result| result.map_err(|e| e.to_string()))
                .boxed()
        });
        self.loaders.insert(name.into(), loader);
    }

    /// Registered layout names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loaders.keys().cloned().collect();
        names.sort();
        names
    }

    /// Pick the effective layout: explicit choice, then the route's
    /// `meta.layout`, then the resolver fallback.
    pub fn layout_name(&self, explicit: Option<&str>, route_layout: Option<&LayoutSelection>) -> LayoutSelection {
        if let Some(name) = explicit.filter(|n| !n.is_empty()) {
            return LayoutSelection::Named(name.to_string());
        }
        if let Some(selection) = route_layout {
            return selection.clone();
        }
        LayoutSelection::Named(self.fallback.clone())
    }

    fn cached(&self, name: &str) -> Option<C> {
        self.cache.lock().ok().and_then(|cache| cache.get(name).cloned())
    }

    /// Load the selected layout.
    ///
    /// Returns `None` for a disabled or empty selection, an unknown name
    /// (logged as a warning) or a failed load (logged as an error).
    pub async fn resolve(&self, selection: &LayoutSelection) -> Option<C> {
        let name = match selection {
            LayoutSelection::Disabled => return None,
            LayoutSelection::Named(name) if name.is_empty() => return None,
            LayoutSelection::Named(name) => name,
        };

        if let Some(component) = self.cached(name) {
            return Some(component);
        }

        let Some(loader) = self.loaders.get(name) else {
            warn!("Layout \"{}\" not found", name);
            return None;
        };

        match loader().await {
            Ok(component) => {
                if let Ok(mut cache) = self.cache.lock() {
                    cache.insert(name.clone(), component.clone());
                }
                Some(component)
            }
            Err(e) => {
                error!("Failed to load layout \"{}\": {}", name, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[test]
    fn test_layout_names() {
        let dir = Path::new("/app/src/layouts");
        assert_eq!(LayoutFile::from_relative("default.vue", dir).name, "default");
        assert_eq!(LayoutFile::from_relative("admin.vue", dir).name, "admin");
        assert_eq!(LayoutFile::from_relative("admin/wide.vue", dir).name, "admin-wide");
        assert_eq!(LayoutFile::from_relative("a/b/c.vue", dir).name, "a-b-c");
        assert_eq!(LayoutFile::from_relative("nested/default.vue", dir).name, "default");

        let layout = LayoutFile::from_relative("admin/wide.vue", dir);
        assert_eq!(layout.component, "@/layouts/admin/wide.vue");
        assert_eq!(layout.filepath, "/app/src/layouts/admin/wide.vue");
    }

    #[tokio::test]
    async fn test_scan_layouts() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("admin")).unwrap();
        fs::write(dir.path().join("default.vue"), "").unwrap();
        fs::write(dir.path().join("admin/wide.vue"), "").unwrap();
        fs::write(dir.path().join("readme.md"), "").unwrap();

        let layouts = scan_layouts(dir.path(), &[".vue".to_string()], &Exclude::none())
            .await
            .unwrap();
        let names: Vec<&str> = layouts.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["admin-wide", "default"]);
    }

    #[test]
    fn test_generate_layouts_module() {
        let dir = Path::new("/l");
        let code = generate_layouts_module(&[
            LayoutFile::from_relative("default.vue", dir),
            LayoutFile::from_relative("admin.vue", dir),
        ]);
        assert!(code.contains("const layout0 = () => import('@/layouts/default.vue')"));
        assert!(code.contains("const layout1 = () => import('@/layouts/admin.vue')"));
        assert!(code.contains("export default {\n  'default': layout0,\n  'admin': layout1\n}"));
    }

    #[test]
    fn test_namespace() {
        assert_eq!(Namespace::from(None).get_name("Layout"), "Layout");
        assert_eq!(Namespace::new("X").get_name("Layout"), "XLayout");
    }

    #[test]
    fn test_generate_layouts_export() {
        let options = RouteOptions {
            namespace: Some("Acme".to_string()),
            ..Default::default()
        };
        let code = generate_layouts_export(&options).unwrap();
        assert!(code.contains("import layouts from '~virtual-layouts'"));
        assert!(code.contains("export const AcmeLayout = createLayoutComponent('Layout');"));
        assert!(code.contains("export const Layout = AcmeLayout;"));
        assert!(code.contains(r#"const options = {"namespace":"Acme","defaultLayout":"default"};"#));

        let plain = generate_layouts_export(&RouteOptions::default()).unwrap();
        assert!(plain.contains("export const Layout = createLayoutComponent('Layout');"));
        assert!(!plain.contains("export const Layout = Layout;"));
    }

    fn resolver(loads: Arc<AtomicUsize>) -> LayoutResolver<String> {
        let mut resolver = LayoutResolver::new("default");
        let counter = loads.clone();
        resolver.register("default", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, String>("DefaultLayout".to_string()) }
        });
        resolver.register("admin", || async { Ok::<_, String>("AdminLayout".to_string()) });
        resolver.register("broken", || async { Err::<String, _>("chunk load failed") });
        resolver
    }

    #[test]
    fn test_layout_name_precedence() {
        let resolver = resolver(Arc::new(AtomicUsize::new(0)));
        let admin = LayoutSelection::Named("admin".to_string());

        assert_eq!(
            resolver.layout_name(Some("wide"), Some(&admin)),
            LayoutSelection::Named("wide".to_string())
        );
        assert_eq!(resolver.layout_name(None, Some(&admin)), admin);
        assert_eq!(
            resolver.layout_name(None, Some(&LayoutSelection::Disabled)),
            LayoutSelection::Disabled
        );
        assert_eq!(
            resolver.layout_name(Some(""), None),
            LayoutSelection::Named("default".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_and_cache() {
        let loads = Arc::new(AtomicUsize::new(0));
        let resolver = resolver(loads.clone());
        let default = LayoutSelection::Named("default".to_string());

        assert_eq!(resolver.resolve(&default).await.as_deref(), Some("DefaultLayout"));
        assert_eq!(resolver.resolve(&default).await.as_deref(), Some("DefaultLayout"));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_absent_cases() {
        let resolver = resolver(Arc::new(AtomicUsize::new(0)));
        assert_eq!(resolver.resolve(&LayoutSelection::Disabled).await, None);
        assert_eq!(resolver.resolve(&LayoutSelection::Named(String::new())).await, None);
        assert_eq!(resolver.resolve(&LayoutSelection::Named("missing".to_string())).await, None);
        assert_eq!(resolver.resolve(&LayoutSelection::Named("broken".to_string())).await, None);
        assert_eq!(resolver.names(), vec!["admin", "broken", "default"]);
    }
}
