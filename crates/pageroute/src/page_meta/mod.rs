// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! `definePageMeta` extraction and removal.
//!
//! Page components declare route metadata with a compile-time macro call:
//!
//! ```text
//! <script setup>
//! definePageMeta({
//!   layout: 'admin',
//!   meta: { requiresAuth: true },
//! })
//! </script>
//! ```
//!
//! The argument must be a plain data literal (see [`literal`]). Extraction
//! never fails: a literal that cannot be parsed is logged and treated as
//! absent.

pub mod literal;
mod transform;

pub use literal::parse_literal;
pub use transform::{inject_page_meta, strip_page_meta, StripOptions, TransformResult, REMOVED_MARKER};

use lazy_static::lazy_static;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::ops::Range;
use tracing::{error, warn};

use crate::error::Error;

/// Name of the metadata macro.
pub const MACRO_NAME: &str = "definePageMeta";

lazy_static! {
    static ref MACRO_START: Regex = Regex::new(r"\bdefinePageMeta\s*\(\s*\{").unwrap();
}

/// Layout choice declared by a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutSelection {
    /// Use the named layout.
    Named(String),
    /// `layout: false`: render without a layout.
    Disabled,
}

impl LayoutSelection {
    /// JSON form: the name, or `false`.
    pub fn to_value(&self) -> Value {
        match self {
            LayoutSelection::Named(name) => Value::String(name.clone()),
            LayoutSelection::Disabled => Value::Bool(false),
        }
    }

    /// Read a selection from a JSON value.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(LayoutSelection::Named(name.clone())),
            Value::Bool(false) => Some(LayoutSelection::Disabled),
            _ => None,
        }
    }
}

/// Metadata declared by a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMeta {
    /// Layout override.
    pub layout: Option<LayoutSelection>,
    /// Route name override.
    pub name: Option<String>,
    /// Route path override.
    pub path: Option<String>,
    /// Alias (string or list of strings).
    pub alias: Option<Value>,
    /// Redirect (string or location object).
    pub redirect: Option<Value>,
    /// Entries merged into the route meta.
    pub meta: Map<String, Value>,
    /// Middleware (string or list of strings).
    pub middleware: Option<Value>,
    /// Any other declared keys.
    pub extra: Map<String, Value>,
}

impl PageMeta {
    /// Build from a parsed literal. Non-object values yield empty metadata.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };

        let mut meta = PageMeta::default();
        for (key, value) in map {
            match key.as_str() {
                "layout" => match LayoutSelection::from_value(&value) {
                    Some(layout) => meta.layout = Some(layout),
                    None => warn!("Ignoring layout {} (expected a name or false)", value),
                },
                "name" => meta.name = value.as_str().map(str::to_string),
                "path" => meta.path = value.as_str().map(str::to_string),
                "alias" => meta.alias = Some(value),
                "redirect" => meta.redirect = Some(value),
                "middleware" => meta.middleware = Some(value),
                "meta" => {
                    if let Value::Object(entries) = value {
                        meta.meta = entries;
                    }
                }
                _ => {
                    meta.extra.insert(key, value);
                }
            }
        }
        meta
    }

    /// Name override, when non-empty.
    pub fn name_override(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Path override, when non-empty.
    pub fn path_override(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }

    /// Redirect, when truthy.
    pub fn redirect_value(&self) -> Option<&Value> {
        self.redirect.as_ref().filter(|v| is_truthy(v))
    }

    /// Alias, when truthy.
    pub fn alias_value(&self) -> Option<&Value> {
        self.alias.as_ref().filter(|v| is_truthy(v))
    }

    /// JSON form of the declaration.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl Serialize for PageMeta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(layout) = &self.layout {
            map.serialize_entry("layout", &layout.to_value())?;
        }
        if let Some(name) = &self.name {
            map.serialize_entry("name", name)?;
        }
        if let Some(path) = &self.path {
            map.serialize_entry("path", path)?;
        }
        if let Some(alias) = &self.alias {
            map.serialize_entry("alias", alias)?;
        }
        if let Some(redirect) = &self.redirect {
            map.serialize_entry("redirect", redirect)?;
        }
        if !self.meta.is_empty() {
            map.serialize_entry("meta", &self.meta)?;
        }
        if let Some(middleware) = &self.middleware {
            map.serialize_entry("middleware", middleware)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One located macro call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MacroCall {
    /// Byte offset of `definePageMeta`.
    pub start: usize,
    /// Byte range of the object literal, braces included.
    pub literal: Range<usize>,
    /// Byte offset just past the closing `)`.
    pub close: usize,
    /// Byte offset past the call including an optional trailing `;`.
    pub end: usize,
}

/// Find every `definePageMeta({ ... })` call in `source`.
pub(crate) fn find_macro_calls(source: &str) -> Vec<MacroCall> {
    let mut calls = Vec::new();
    let mut resume = 0;

    for m in MACRO_START.find_iter(source) {
        if m.start() < resume {
            continue;
        }
        let open = m.end() - 1;
        let Some(close_brace) = find_closing_brace(source, open) else {
            continue;
        };
        let after = skip_whitespace(source, close_brace + 1);
        if !source[after..].starts_with(')') {
            continue;
        }
        let close = after + 1;
        let semicolon = skip_whitespace(source, close);
        let end = if source[semicolon..].starts_with(';') {
            semicolon + 1
        } else {
            close
        };

        calls.push(MacroCall {
            start: m.start(),
            literal: open..close_brace + 1,
            close,
            end,
        });
        resume = end;
    }

    calls
}

fn skip_whitespace(source: &str, from: usize) -> usize {
    source[from..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| from + i)
        .unwrap_or(source.len())
}

/// Index of the `}` matching the `{` at `open`, skipping strings and comments.
fn find_closing_brace(source: &str, open: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'[' | b'(' => depth += 1,
            b'}' | b']' | b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return (bytes[i] == b'}').then_some(i);
                }
            }
            quote @ (b'\'' | b'"' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    } else if bytes[i] == b'\n' && quote != b'`' {
                        return None;
                    }
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Parse the literal of one located call.
pub(crate) fn parse_call(source: &str, call: &MacroCall) -> Result<PageMeta, Error> {
    parse_literal(&source[call.literal.clone()]).map(PageMeta::from_value)
}

/// Extract the metadata declared by the first `definePageMeta` call.
///
/// Returns `None` when there is no call or its argument is not a plain data
/// literal; the latter is logged with its position.
pub fn extract_page_meta(source: &str) -> Option<PageMeta> {
    if !source.contains(MACRO_NAME) {
        return None;
    }
    let call = find_macro_calls(source).into_iter().next()?;

    match parse_call(source, &call) {
        Ok(meta) => Some(meta),
        Err(e) => {
            error!("Failed to extract page meta: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE: &str = r#"<template><div>Users</div></template>
<script setup>
definePageMeta({
  layout: 'admin',
  name: 'user-list',
  path: '/people',
  alias: ['/users'],
  redirect: { name: 'home' },
  meta: { requiresAuth: true, title: "Users" },
  middleware: 'auth',
  keepAlive: true,
});
</script>
"#;

    #[test]
    fn test_extract_all_fields() {
        let meta = extract_page_meta(PAGE).unwrap();
        assert_eq!(meta.layout, Some(LayoutSelection::Named("admin".to_string())));
        assert_eq!(meta.name_override(), Some("user-list"));
        assert_eq!(meta.path_override(), Some("/people"));
        assert_eq!(meta.alias, Some(json!(["/users"])));
        assert_eq!(meta.redirect, Some(json!({ "name": "home" })));
        assert_eq!(meta.meta["requiresAuth"], true);
        assert_eq!(meta.middleware, Some(json!("auth")));
        assert_eq!(meta.extra["keepAlive"], true);
    }

    #[test]
    fn test_layout_false_disables() {
        let meta = extract_page_meta("definePageMeta({ layout: false })").unwrap();
        assert_eq!(meta.layout, Some(LayoutSelection::Disabled));
        assert_eq!(meta.to_value(), json!({ "layout": false }));
    }

    #[test]
    fn test_no_macro() {
        assert_eq!(extract_page_meta("<template></template>"), None);
        assert_eq!(extract_page_meta("// definePageMeta is documented elsewhere"), None);
    }

    #[test]
    fn test_dynamic_literal_is_absent() {
        assert_eq!(extract_page_meta("definePageMeta({ layout: pick() })"), None);
    }

    #[test]
    fn test_nested_braces_and_strings() {
        let source = "definePageMeta({ meta: { a: { b: '}' } }, x: \"){\" }) // done";
        let calls = find_macro_calls(source);
        assert_eq!(calls.len(), 1);
        assert_eq!(&source[calls[0].close - 1..calls[0].close], ")");

        let meta = extract_page_meta(source).unwrap();
        assert_eq!(meta.meta["a"]["b"], "}");
        assert_eq!(meta.extra["x"], "){");
    }

    #[test]
    fn test_first_call_wins() {
        let source = "definePageMeta({ name: 'a' })\ndefinePageMeta({ name: 'b' })";
        assert_eq!(find_macro_calls(source).len(), 2);
        assert_eq!(extract_page_meta(source).unwrap().name_override(), Some("a"));
    }

    #[test]
    fn test_empty_overrides_fall_back() {
        let meta = extract_page_meta("definePageMeta({ name: '', path: '', redirect: '' })").unwrap();
        assert_eq!(meta.name_override(), None);
        assert_eq!(meta.path_override(), None);
        assert_eq!(meta.redirect_value(), None);
    }

    #[test]
    fn test_trailing_semicolon_in_call_range() {
        let source = "a;definePageMeta({}) ;\nb";
        let call = &find_macro_calls(source)[0];
        assert_eq!(&source[call.start..call.end], "definePageMeta({}) ;");
    }
}
