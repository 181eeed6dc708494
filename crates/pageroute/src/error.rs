// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for route generation.
//!
//! This module defines [`Error`], the main error enum, and helper types
//! for rich error reporting with source context.
//!
//! # Error Categories
//!
//! - **Scan errors**: a pages or layouts directory could not be read
//! - **Metadata parse errors**: a `definePageMeta` literal is not plain data
//! - **Generation errors**: any failure in scan → parse → build → serialize
//! - **Configuration errors**: invalid or contradictory options
//!
//! Most of these are recoverable by design of the pipeline: scanners log and
//! return empty results, and [`crate::generator::RouteGenerator`] turns a
//! failed pass into an empty route table. Only the library-level functions
//! surface them to callers.

use std::fmt;
use thiserror::Error;

/// Source context for enhanced error messages.
///
/// Captures a snippet of source code around an error location,
/// enabling rich error messages with line numbers and visual indicators.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// All lines from the source text.
    pub lines: Vec<String>,
    /// The line number where the error occurred (1-indexed).
    pub error_line: usize,
    /// The column number where the error occurred (1-indexed).
    pub error_column: usize,
    /// First line number of the snippet (1-indexed).
    pub snippet_start: usize,
    /// Last line number of the snippet (1-indexed).
    pub snippet_end: usize,
}

impl SourceContext {
    /// Creates a source context from source code and error location.
    ///
    /// Captures 2 lines before and after the error line.
    pub fn from_source(source: &str, line: usize, column: usize) -> Self {
        let lines: Vec<String> = source.lines().map(|l| l.to_string()).collect();
        let snippet_start = line.saturating_sub(2).max(1);
        let snippet_end = (line + 2).min(lines.len());

        Self {
            lines,
            error_line: line,
            error_column: column,
            snippet_start,
            snippet_end,
        }
    }

    /// Formats the source snippet with line numbers and error indicator.
    ///
    /// ```text
    ///    1 | {
    ///    2 |   layout: resolveLayout(),
    ///      |           ^
    ///    3 | }
    /// ```
    pub fn format_snippet(&self) -> String {
        let mut result = String::new();

        for line_num in self.snippet_start..=self.snippet_end {
            if line_num == 0 || line_num > self.lines.len() {
                break;
            }

            let line = &self.lines[line_num - 1];
            result.push_str(&format!("{:4} | {}\n", line_num, line));

            if line_num == self.error_line {
                result.push_str(&format!(
                    "     | {}^\n",
                    " ".repeat(self.error_column.saturating_sub(1))
                ));
            }
        }

        result
    }
}

impl fmt::Display for SourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_snippet())
    }
}

/// Helper struct for displaying optional source context.
pub struct OptSourceContextDisplay<'a>(pub &'a Option<SourceContext>);

impl fmt::Display for OptSourceContextDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ctx) => write!(f, "{}", ctx),
            None => Ok(()),
        }
    }
}

/// Helper trait for formatting optional source context.
pub trait AsDisplay<'a> {
    /// Wraps self for Display formatting.
    fn as_display(&'a self) -> OptSourceContextDisplay<'a>;
}

impl<'a> AsDisplay<'a> for Option<SourceContext> {
    fn as_display(&'a self) -> OptSourceContextDisplay<'a> {
        OptSourceContextDisplay(self)
    }
}

/// The main error type for route generation.
#[derive(Error, Debug)]
pub enum Error {
    /// A directory could not be scanned.
    #[error("Scan error in {dir}: {message}")]
    Scan {
        /// Directory being scanned.
        dir: String,
        /// Description of the failure.
        message: String,
    },

    /// A page metadata declaration is not a plain data literal.
    #[error("Metadata parse error: {message} at line {line}, column {column}\n{}", source_context.as_display())]
    MetadataParse {
        /// Description of the parse error.
        message: String,
        /// Line number inside the literal (1-indexed).
        line: usize,
        /// Column number inside the literal (1-indexed).
        column: usize,
        /// Source context for rich error display.
        source_context: Option<SourceContext>,
    },

    /// A generation pass failed.
    #[error("Generation error: {0}")]
    Generation(String),

    /// Options are invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No segment rule accepted a path segment.
    ///
    /// The last rule accepts everything, so this signals a defect in the
    /// classifier table rather than bad input.
    #[error("No segment rule matched {0:?}")]
    NoSegmentRule(String),

    /// A shared cache could not be accessed.
    #[error("Cache error: {0}")]
    Cache(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid exclude glob.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),
}

/// Convenience type alias for Results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_context_snippet_points_at_column() {
        let source = "{\n  layout: admin(),\n}";
        let ctx = SourceContext::from_source(source, 2, 11);
        let snippet = ctx.format_snippet();

        assert!(snippet.contains("   2 |   layout: admin(),"));
        assert!(snippet.contains("     |           ^"));
        assert!(snippet.contains("   3 | }"));
    }

    #[test]
    fn test_metadata_error_display_includes_snippet() {
        let source = "{ a: b }";
        let err = Error::MetadataParse {
            message: "expected value".to_string(),
            line: 1,
            column: 6,
            source_context: Some(SourceContext::from_source(source, 1, 6)),
        };
        let rendered = err.to_string();
        assert!(rendered.starts_with("Metadata parse error: expected value at line 1, column 6"));
        assert!(rendered.contains("{ a: b }"));
    }
}
