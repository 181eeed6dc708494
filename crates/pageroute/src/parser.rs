// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Page file path → route descriptor parsing.
//!
//! Parsing is pure: no filesystem access, and the same input always yields
//! the same [`ParsedPath`].
//!
//! ```text
//! index.vue              → /            name "index"
//! user/[id].vue          → /user/:id    name "user-id"
//! docs/[...slug].vue     → /docs/:slug(.*)
//! ```

use crate::error::Result;
use crate::segment::{classify, ProcessedSegment, SegmentKind};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

lazy_static! {
    static ref EXTENSION: Regex = Regex::new(r"\.[a-zA-Z0-9]+$").unwrap();
    static ref ROUTE_PARAM: Regex = Regex::new(r":([^/(]+)(?:\([^)]*\))?").unwrap();
}

/// Options controlling how a file path becomes a route.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Keep the file extension in the last segment.
    pub keep_extension: bool,
    /// Lowercase every segment.
    pub lowercase: bool,
    /// Join all name segments; when false only the last one is used.
    pub include_parent_in_name: bool,
    /// Separator between name segments.
    pub name_separator: String,
    /// Keep `index` segments in the route path.
    pub keep_index_in_path: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            keep_extension: false,
            lowercase: true,
            include_parent_in_name: true,
            name_separator: "-".to_string(),
            keep_index_in_path: false,
        }
    }
}

/// A parsed page path.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPath {
    /// URL pattern (e.g. `/users/:id`).
    pub route_path: String,
    /// Route name (e.g. `users-id`).
    pub route_name: String,
    /// The last segment was an index file.
    pub is_index: bool,
    /// At least one segment is a parameter.
    pub is_dynamic: bool,
    /// At least one segment is a catch-all.
    pub is_catch_all: bool,
    /// Parameter names in path order.
    pub param_names: Vec<String>,
    /// Normalized path without extension.
    pub raw_path: String,
    /// `{ params: { <name>: { position } }, filePath }`.
    pub meta: Map<String, Value>,
}

/// A parsed page path together with its location on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPageFile {
    /// Parse result.
    pub parsed: ParsedPath,
    /// `root` joined with the relative file path.
    pub absolute_path: PathBuf,
}

/// Split, strip the extension and lowercase according to `options`.
fn preprocess(file_path: &str, options: &ParseOptions) -> Vec<String> {
    let mut segments: Vec<String> = file_path.split(['/', '\\']).map(str::to_string).collect();

    if !options.keep_extension {
        if let Some(last) = segments.last_mut() {
            *last = EXTENSION.replace(last, "").into_owned();
        }
    }

    if options.lowercase {
        for segment in segments.iter_mut() {
            *segment = segment.to_lowercase();
        }
    }

    segments
}

fn build_route_path(segments: &[ProcessedSegment], keep_index_in_path: bool) -> String {
    let parts: Vec<&str> = segments
        .iter()
        .filter(|s| s.kind != SegmentKind::Index || keep_index_in_path)
        .map(|s| {
            if s.kind == SegmentKind::Index {
                s.name_segment.as_str()
            } else {
                s.path_segment.as_str()
            }
        })
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

fn build_route_name(segments: &[ProcessedSegment], options: &ParseOptions) -> String {
    let names: Vec<&str> = if !options.include_parent_in_name && segments.len() > 1 {
        segments
            .last()
            .map(|s| vec![s.name_segment.as_str()])
            .unwrap_or_default()
    } else {
        segments.iter().map(|s| s.name_segment.as_str()).collect()
    };

    names
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(&options.name_separator)
}

/// Parse a file path relative to the pages directory.
pub fn parse_path(file_path: &str, options: &ParseOptions) -> Result<ParsedPath> {
    let segments = preprocess(file_path, options);
    let count = segments.len();

    let mut processed = Vec::with_capacity(count);
    let mut is_index = false;
    let mut is_dynamic = false;
    let mut is_catch_all = false;
    let mut param_names = Vec::new();
    let mut params = Map::new();

    for (i, segment) in segments.iter().enumerate() {
        let seg = classify(segment, i + 1 == count, i)?;

        match seg.kind {
            SegmentKind::Index => is_index = true,
            SegmentKind::Dynamic | SegmentKind::CatchAll => {
                is_dynamic = true;
                is_catch_all |= seg.kind == SegmentKind::CatchAll;
                if let Some(name) = &seg.param_name {
                    param_names.push(name.clone());
                    params.insert(name.clone(), json!({ "position": seg.position }));
                }
            }
            SegmentKind::Normal => {}
        }

        processed.push(seg);
    }

    let mut meta = Map::new();
    meta.insert("params".to_string(), Value::Object(params));
    meta.insert("filePath".to_string(), Value::String(file_path.to_string()));

    Ok(ParsedPath {
        route_path: build_route_path(&processed, options.keep_index_in_path),
        route_name: build_route_name(&processed, options),
        is_index,
        is_dynamic,
        is_catch_all,
        param_names,
        raw_path: segments.join("/"),
        meta,
    })
}

/// Parse a page file and resolve its absolute location under `root`.
pub fn parse_page_file_path(
    file_path: &str,
    root: &Path,
    options: &ParseOptions,
) -> Result<ParsedPageFile> {
    Ok(ParsedPageFile {
        parsed: parse_path(file_path, options)?,
        absolute_path: root.join(file_path),
    })
}

/// Extract parameter names from a route pattern.
pub fn extract_route_params(route_path: &str) -> Vec<String> {
    ROUTE_PARAM
        .captures_iter(route_path)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Returns true if the route pattern contains a parameter.
pub fn has_params(route_path: &str) -> bool {
    ROUTE_PARAM.is_match(route_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(path: &str) -> ParsedPath {
        parse_path(path, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_root_index() {
        let parsed = parse("index.vue");
        assert_eq!(parsed.route_path, "/");
        assert_eq!(parsed.route_name, "index");
        assert!(parsed.is_index);
        assert!(!parsed.is_dynamic);
        assert_eq!(parsed.raw_path, "index");
    }

    #[test]
    fn test_nested_index_drops_segment() {
        let parsed = parse("users/index.vue");
        assert_eq!(parsed.route_path, "/users");
        assert_eq!(parsed.route_name, "users-index");
    }

    #[test]
    fn test_keep_index_in_path() {
        let options = ParseOptions {
            keep_index_in_path: true,
            ..Default::default()
        };
        let parsed = parse_path("users/index.vue", &options).unwrap();
        assert_eq!(parsed.route_path, "/users/index");
    }

    #[test]
    fn test_dynamic_segment() {
        let parsed = parse("user/[id].vue");
        assert_eq!(parsed.route_path, "/user/:id");
        assert_eq!(parsed.route_name, "user-id");
        assert_eq!(parsed.param_names, vec!["id"]);
        assert!(parsed.is_dynamic);
        assert!(!parsed.is_catch_all);
        assert_eq!(parsed.meta["params"]["id"]["position"], 1);
        assert_eq!(parsed.meta["filePath"], "user/[id].vue");
    }

    #[test]
    fn test_catch_all_segment() {
        let parsed = parse("[...slug].vue");
        assert_eq!(parsed.route_path, "/:slug(.*)");
        assert!(parsed.is_catch_all);
        assert!(parsed.is_dynamic);
        assert_eq!(parsed.param_names, vec!["slug"]);
    }

    #[test]
    fn test_windows_separators_and_case() {
        let parsed = parse("Blog\\Posts\\[Slug].vue");
        assert_eq!(parsed.route_path, "/blog/posts/:slug");
        assert_eq!(parsed.raw_path, "blog/posts/[slug]");
    }

    #[test]
    fn test_short_names() {
        let options = ParseOptions {
            include_parent_in_name: false,
            name_separator: "_".to_string(),
            ..Default::default()
        };
        let parsed = parse_path("settings/profile/edit.vue", &options).unwrap();
        assert_eq!(parsed.route_name, "edit");
        assert_eq!(parsed.route_path, "/settings/profile/edit");
    }

    #[test]
    fn test_keep_extension_and_case() {
        let options = ParseOptions {
            keep_extension: true,
            lowercase: false,
            ..Default::default()
        };
        let parsed = parse_path("About.vue", &options).unwrap();
        assert_eq!(parsed.route_path, "/About.vue");
    }

    #[test]
    fn test_parse_is_deterministic() {
        for path in ["index.vue", "a/[b]/[...c].vue", "x/:y/index.vue"] {
            assert_eq!(parse(path), parse(path));
        }
    }

    #[test]
    fn test_page_file_absolute_path() {
        let page = parse_page_file_path("user/[id].vue", Path::new("/app/src/pages"), &ParseOptions::default())
            .unwrap();
        assert_eq!(page.absolute_path, PathBuf::from("/app/src/pages/user/[id].vue"));
        assert_eq!(page.parsed.route_path, "/user/:id");
    }

    #[test]
    fn test_extract_route_params() {
        assert_eq!(extract_route_params("/user/:id/posts/:slug(.*)"), vec!["id", "slug"]);
        assert!(extract_route_params("/about").is_empty());
        assert!(has_params("/user/:id"));
        assert!(!has_params("/user"));
    }
}
