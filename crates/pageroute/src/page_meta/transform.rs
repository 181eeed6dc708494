// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Source transforms for `definePageMeta` calls.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, error};

use super::{find_macro_calls, parse_literal, MACRO_NAME};
use crate::sourcemap::{SourceMap, SourceMapBuilder};

/// Text left in place of a removed call.
pub const REMOVED_MARKER: &str = "/* definePageMeta removed by compiler */";

lazy_static! {
    static ref SCRIPT_SETUP: Regex = Regex::new(r"<script\s+setup[^>]*>").unwrap();
    static ref EXPORT_DEFAULT: Regex = Regex::new(r"export\s+default\s+\{").unwrap();
    static ref TEMPLATE_OPEN: Regex = Regex::new(r"<template>").unwrap();
}

/// Options for [`strip_page_meta`].
#[derive(Debug, Clone, Copy)]
pub struct StripOptions {
    /// Produce a source map.
    pub source_map: bool,
    /// Embed the original source in the map.
    pub include_content: bool,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            source_map: true,
            include_content: false,
        }
    }
}

/// Transformed code plus its optional source map.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    /// Rewritten source.
    pub code: String,
    /// Mapping from rewritten to original positions.
    pub map: Option<SourceMap>,
}

/// Replace `source[start..end]` with `text`. Insertions have `start == end`.
#[derive(Debug, Clone)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    line: usize,
    column: usize,
}

impl Cursor {
    fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += c.len_utf16();
        }
    }

    fn advance_str(&mut self, s: &str) {
        s.chars().for_each(|c| self.advance(c));
    }
}

fn copy_text(
    text: &str,
    code: &mut String,
    builder: &mut Option<SourceMapBuilder>,
    original: &mut Cursor,
    generated: &mut Cursor,
) {
    for c in text.chars() {
        if let Some(b) = builder.as_mut() {
            b.add_mapping(generated.line, generated.column, original.line, original.column);
        }
        code.push(c);
        generated.advance(c);
        original.advance(c);
    }
}

/// Apply sorted edits, mapping every copied character to its origin.
fn apply_edits(source: &str, id: &str, mut edits: Vec<Edit>, options: &StripOptions) -> TransformResult {
    edits.sort_by_key(|e| (e.start, e.end));

    let mut code = String::with_capacity(source.len());
    let mut builder = options.source_map.then(SourceMapBuilder::new);
    let mut original = Cursor::default();
    let mut generated = Cursor::default();
    let mut pos = 0;

    for edit in edits {
        let start = edit.start.max(pos);
        let end = edit.end.max(start);

        copy_text(&source[pos..start], &mut code, &mut builder, &mut original, &mut generated);

        if !edit.text.is_empty() {
            if let Some(b) = builder.as_mut() {
                b.add_mapping(generated.line, generated.column, original.line, original.column);
            }
            code.push_str(&edit.text);
            generated.advance_str(&edit.text);
        }
        original.advance_str(&source[start..end]);
        pos = end;
    }
    copy_text(&source[pos..], &mut code, &mut builder, &mut original, &mut generated);

    let map = builder.map(|b| {
        b.build(
            Some(id),
            id,
            options.include_content.then_some(source),
        )
    });

    TransformResult { code, map }
}

/// Remove every `definePageMeta` call from a `.vue` source.
///
/// Each call, with an optional trailing `;`, becomes [`REMOVED_MARKER`].
/// All other text is preserved. Returns `None` when `id` is not a `.vue`
/// file or contains no call.
pub fn strip_page_meta(source: &str, id: &str, options: &StripOptions) -> Option<TransformResult> {
    if !id.ends_with(".vue") || !source.contains(MACRO_NAME) {
        return None;
    }

    let calls = find_macro_calls(source);
    if calls.is_empty() {
        return None;
    }

    debug!("Stripping {} definePageMeta call(s) from {}", calls.len(), id);
    let edits = calls
        .into_iter()
        .map(|call| Edit {
            start: call.start,
            end: call.end,
            text: REMOVED_MARKER.to_string(),
        })
        .collect();

    Some(apply_edits(source, id, edits, options))
}

/// Remove `definePageMeta` calls and inject the declared metadata into the
/// component as `__pageMeta`.
///
/// The last call that parses wins. Calls that fail to parse are logged and
/// left in place. Returns `None` when nothing was extracted.
pub fn inject_page_meta(source: &str, id: &str) -> Option<TransformResult> {
    if !id.ends_with(".vue") || !source.contains(MACRO_NAME) {
        return None;
    }

    let mut edits = Vec::new();
    let mut page_meta: Option<Value> = None;

    for call in find_macro_calls(source) {
        match parse_literal(&source[call.literal.clone()]) {
            Ok(value) => {
                edits.push(Edit {
                    start: call.start,
                    end: call.close,
                    text: String::new(),
                });
                page_meta = Some(value);
            }
            Err(e) => error!("Failed to parse definePageMeta in {}: {}", id, e),
        }
    }

    let json = serde_json::to_string(&page_meta?).ok()?;

    if let Some(m) = SCRIPT_SETUP.find(source) {
        edits.push(Edit {
            start: m.end(),
            end: m.end(),
            text: format!(
                "\n// Injected by definePageMeta transform\nconst __pageMeta = {};\n",
                json
            ),
        });
    }

    if let Some(m) = EXPORT_DEFAULT.find(source) {
        edits.push(Edit {
            start: m.end(),
            end: m.end(),
            text: format!("\n  __pageMeta: {},", json),
        });
    } else if source.contains("<script setup>") {
        if let Some(m) = TEMPLATE_OPEN.find(source) {
            edits.push(Edit {
                start: m.start(),
                end: m.start(),
                text: format!("\n<!-- __pageMeta: {} -->\n", json),
            });
        }
    }

    Some(apply_edits(source, id, edits, &StripOptions::default()))
}
