// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Classification of a single file-path segment.
//!
//! Page file names map onto route patterns:
//! - `index` (last segment) → contributes nothing to the path
//! - `[...rest]` → catch-all `:rest(.*)`
//! - `[id]` or `:id` → dynamic `:id`
//! - anything else → literal segment
//!
//! Rules are tried in order and the first match wins. The catch-all rule
//! must run before the bracket rule since both use brackets.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BRACKET_PARAM: Regex = Regex::new(r"^\[([^\]]+)\]$").unwrap();
    static ref COLON_PARAM: Regex = Regex::new(r"^:([a-zA-Z0-9_-]+)$").unwrap();
}

const CATCH_ALL_PREFIX: &str = "[...";

/// Kind of a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal segment (e.g. `about`).
    Normal,
    /// Trailing `index` file.
    Index,
    /// Dynamic parameter (`[id]` or `:id`).
    Dynamic,
    /// Catch-all parameter (`[...slug]`).
    CatchAll,
}

/// Result of classifying one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedSegment {
    /// The segment kind.
    pub kind: SegmentKind,
    /// Contribution to the URL pattern (empty for index segments).
    pub path_segment: String,
    /// Contribution to the route name.
    pub name_segment: String,
    /// Parameter name for dynamic and catch-all segments.
    pub param_name: Option<String>,
    /// Position of the parameter in the file path.
    pub position: Option<usize>,
}

impl ProcessedSegment {
    fn literal(kind: SegmentKind, path_segment: &str, name_segment: &str) -> Self {
        Self {
            kind,
            path_segment: path_segment.to_string(),
            name_segment: name_segment.to_string(),
            param_name: None,
            position: None,
        }
    }

    fn param(kind: SegmentKind, path_segment: String, name: &str, position: usize) -> Self {
        Self {
            kind,
            path_segment,
            name_segment: name.to_string(),
            param_name: Some(name.to_string()),
            position: Some(position),
        }
    }

    /// Returns true for dynamic and catch-all segments.
    pub fn is_param(&self) -> bool {
        matches!(self.kind, SegmentKind::Dynamic | SegmentKind::CatchAll)
    }
}

struct SegmentRule {
    matches: fn(&str, bool) -> bool,
    process: fn(&str, usize) -> ProcessedSegment,
}

const RULES: &[SegmentRule] = &[
    // index
    SegmentRule {
        matches: |segment, is_last| segment == "index" && is_last,
        process: |_, _| ProcessedSegment::literal(SegmentKind::Index, "", "index"),
    },
    // [...name]
    SegmentRule {
        matches: |segment, _| segment.starts_with(CATCH_ALL_PREFIX) && segment.ends_with(']'),
        process: |segment, position| {
            let name = &segment[CATCH_ALL_PREFIX.len()..segment.len() - 1];
            ProcessedSegment::param(
                SegmentKind::CatchAll,
                format!(":{}(.*)", name),
                name,
                position,
            )
        },
    },
    // [name]
    SegmentRule {
        matches: |segment, _| BRACKET_PARAM.is_match(segment),
        process: |segment, position| {
            let name = &segment[1..segment.len() - 1];
            ProcessedSegment::param(SegmentKind::Dynamic, format!(":{}", name), name, position)
        },
    },
    // :name
    SegmentRule {
        matches: |segment, _| COLON_PARAM.is_match(segment),
        process: |segment, position| {
            let name = &segment[1..];
            ProcessedSegment::param(SegmentKind::Dynamic, format!(":{}", name), name, position)
        },
    },
    // literal, always matches
    SegmentRule {
        matches: |_, _| true,
        process: |segment, _| ProcessedSegment::literal(SegmentKind::Normal, segment, segment),
    },
];

/// Classify a path segment.
///
/// `position` is the zero-based index of the segment in the file path and
/// is recorded for parameters.
pub fn classify(segment: &str, is_last: bool, position: usize) -> Result<ProcessedSegment> {
    RULES
        .iter()
        .find(|rule| (rule.matches)(segment, is_last))
        .map(|rule| (rule.process)(segment, position))
        .ok_or_else(|| Error::NoSegmentRule(segment.to_string()))
}
