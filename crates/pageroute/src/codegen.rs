// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! JavaScript code generation from the route tree.
//!
//! Route data (paths, names, meta, redirects, aliases) is serialized with
//! `serde_json`; component references are written as raw expressions by the
//! same writer, so no placeholder text ever passes through the serializer.
//!
//! # Generated Code Structure
//!
//! Lazy imports (the default):
//!
//! ```js
//! export default [
//!   {
//!     "path": "/about",
//!     "name": "about",
//!     "component": () => import('@/pages/about.vue').then(module => {
//!       const component = module.default;
//!       if (component && !component.name) {
//!         component.name = 'about';
//!       }
//!       return component;
//!     }),
//!     "children": [],
//!     "meta": { ... }
//!   }
//! ];
//! ```
//!
//! Eager imports hoist one `import ComponentN from '...'` per distinct
//! component path and reference the identifier.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::options::RouteOptions;
use crate::route::{ComponentImport, RouteNode};

/// Display name for routes without a name.
pub const UNNAMED_COMPONENT: &str = "UnnamedComponent";

const HEADER: &str = "// Auto-generated route file\n// Do not edit: this file is overwritten on every generation\n";

/// Shape of the generated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModuleFormat {
    /// `export default [...];`, served as a virtual module.
    #[default]
    #[serde(rename = "module")]
    Module,
    /// JavaScript file with JSDoc types.
    #[serde(rename = "js", alias = "javascript")]
    JavaScript,
    /// TypeScript file typed with `RouteRecordRaw`.
    #[serde(rename = "ts", alias = "typescript")]
    TypeScript,
}

impl ModuleFormat {
    /// File extension used when writing the module to disk.
    pub fn extension(self) -> &'static str {
        match self {
            ModuleFormat::TypeScript => "ts",
            ModuleFormat::Module | ModuleFormat::JavaScript => "js",
        }
    }
}

/// Options for [`generate_routes_code`].
///
/// The import style is carried by each route's [`ComponentImport`], so a
/// route switched to an eager import by the extend hook is hoisted even
/// when the rest of the table is lazy.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodegenOptions {
    /// Output module shape.
    pub format: ModuleFormat,
}

impl From<&RouteOptions> for CodegenOptions {
    fn from(options: &RouteOptions) -> Self {
        Self {
            format: options.format,
        }
    }
}

/// Quote `s` as a single-quoted JS string literal.
pub(crate) fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn pad(level: usize) -> String {
    "  ".repeat(level)
}

/// Writes route literals and collects hoisted imports.
#[derive(Default)]
struct RoutesWriter {
    imports: Vec<String>,
    identifiers: HashMap<String, String>,
}

impl RoutesWriter {
    fn routes(&mut self, routes: &[RouteNode], level: usize) -> Result<String> {
        if routes.is_empty() {
            return Ok("[]".to_string());
        }

        let mut items = Vec::with_capacity(routes.len());
        for route in routes {
            items.push(format!("{}{}", pad(level + 1), self.route(route, level + 1)?));
        }
        Ok(format!("[\n{}\n{}]", items.join(",\n"), pad(level)))
    }

    fn route(&mut self, route: &RouteNode, level: usize) -> Result<String> {
        let inner = pad(level + 1);
        let mut fields = Vec::with_capacity(7);

        fields.push(format!("{}\"path\": {}", inner, serde_json::to_string(&route.path)?));
        if let Some(name) = &route.name {
            fields.push(format!("{}\"name\": {}", inner, serde_json::to_string(name)?));
        }
        fields.push(format!("{}\"component\": {}", inner, self.component(route, level + 1)));
        fields.push(format!("{}\"children\": {}", inner, self.routes(&route.children, level + 1)?));
        fields.push(format!(
            "{}\"meta\": {}",
            inner,
            data(&Value::Object(route.meta.clone()), level + 1)?
        ));
        if let Some(redirect) = &route.redirect {
            fields.push(format!("{}\"redirect\": {}", inner, data(redirect, level + 1)?));
        }
        if let Some(alias) = &route.alias {
            fields.push(format!("{}\"alias\": {}", inner, data(alias, level + 1)?));
        }

        Ok(format!("{{\n{}\n{}}}", fields.join(",\n"), pad(level)))
    }

    fn component(&mut self, route: &RouteNode, level: usize) -> String {
        let display_name = route.name.as_deref().unwrap_or(UNNAMED_COMPONENT);
        match &route.component {
            ComponentImport::Eager(path) => self.hoist(path, display_name),
            ComponentImport::Lazy(path) => lazy_loader(path, display_name, level),
        }
    }

    fn hoist(&mut self, path: &str, display_name: &str) -> String {
        if let Some(identifier) = self.identifiers.get(path) {
            return identifier.clone();
        }

        let identifier = format!("Component{}", self.identifiers.len());
        self.imports
            .push(format!("import {} from {};", identifier, js_string(path)));
        self.imports.push(format!(
            "if ({id} && !{id}.name) {{ {id}.name = {name}; }}",
            id = identifier,
            name = js_string(display_name)
        ));
        self.identifiers.insert(path.to_string(), identifier.clone());
        identifier
    }
}

fn lazy_loader(path: &str, display_name: &str, level: usize) -> String {
    let body = pad(level + 1);
    let nested = pad(level + 2);
    format!(
        "() => import({path}).then(module => {{\n\
         {body}const component = module.default;\n\
         {body}if (component && !component.name) {{\n\
         {nested}component.name = {name};\n\
         {body}}}\n\
         {body}return component;\n\
         {close}}})",
        path = js_string(path),
        name = js_string(display_name),
        body = body,
        nested = nested,
        close = pad(level),
    )
}

/// Pretty JSON re-indented to sit at `level`.
fn data(value: &Value, level: usize) -> Result<String> {
    let json = serde_json::to_string_pretty(value)?;
    Ok(json.replace('\n', &format!("\n{}", pad(level))))
}

/// `text` followed by `suffix`, or nothing when `text` is empty.
fn block(text: &str, suffix: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("{}{}", text, suffix)
    }
}

/// Generate the routes module for `routes`.
pub fn generate_routes_code(routes: &[RouteNode], options: &CodegenOptions) -> Result<String> {
    let mut writer = RoutesWriter::default();
    let table = writer.routes(routes, 0)?;
    let imports = writer.imports.join("\n");

    debug!(
        "Generated {} top-level routes with {} hoisted imports",
        routes.len(),
        writer.identifiers.len()
    );

    let code = match options.format {
        ModuleFormat::Module => {
            if imports.is_empty() {
                format!("export default {};", table)
            } else {
                format!("{}\n\nexport default {};", imports, table)
            }
        }
        ModuleFormat::JavaScript => format!(
            "{}\n/** @typedef {{import('vue-router').RouteRecordRaw}} RouteRecordRaw */\n\n{}/** @type {{RouteRecordRaw[]}} */\nexport const routes = {};\n\nexport default routes;\n",
            HEADER,
            block(&imports, "\n\n"),
            table
        ),
        ModuleFormat::TypeScript => format!(
            "{}\nimport type {{ RouteRecordRaw }} from 'vue-router';\n{}\nexport const routes: RouteRecordRaw[] = {};\n\nexport default routes;\n",
            HEADER,
            block(&imports, "\n"),
            table
        ),
    };

    Ok(code)
}

/// Write generated code to `dir/routes.<ext>`, creating `dir` as needed.
pub async fn write_routes_file(dir: &Path, code: &str, format: ModuleFormat) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("routes.{}", format.extension()));
    tokio::fs::write(&path, code).await?;
    debug!("Wrote {}", path.display());
    Ok(path)
}
