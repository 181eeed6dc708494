// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Source Map v3 generation for source transforms.
//!
//! Lines and columns are zero-based, columns count UTF-16 code units as the
//! format requires.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// A serialized Source Map v3 document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    /// Always 3.
    pub version: u8,
    /// Generated file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Original sources.
    pub sources: Vec<String>,
    /// Original contents, parallel to `sources`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<String>>,
    /// Symbol names (unused, always empty).
    pub names: Vec<String>,
    /// Base64 VLQ mappings.
    pub mappings: String,
}

impl SourceMap {
    /// Serialize to JSON.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Finds the original position for a generated position.
    ///
    /// Uses the closest preceding segment on the same generated line.
    pub fn lookup(&self, line: usize, column: usize) -> Option<(usize, usize)> {
        let lines = decode_mappings(&self.mappings)?;
        let segments = lines.get(line)?;
        segments
            .range(..=column)
            .next_back()
            .map(|(_, &original)| original)
    }
}

/// Collects mappings and encodes them.
#[derive(Debug, Clone, Default)]
pub struct SourceMapBuilder {
    /// generated line -> generated column -> (original line, original column)
    lines: BTreeMap<usize, BTreeMap<usize, (usize, usize)>>,
}

impl SourceMapBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a mapping from a generated position to an original position.
    pub fn add_mapping(&mut self, gen_line: usize, gen_column: usize, src_line: usize, src_column: usize) {
        self.lines
            .entry(gen_line)
            .or_default()
            .insert(gen_column, (src_line, src_column));
    }

    /// Number of recorded segments.
    pub fn len(&self) -> usize {
        self.lines.values().map(BTreeMap::len).sum()
    }

    /// Returns true when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Encode the `mappings` field.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        let last_line = self.lines.keys().next_back().copied().unwrap_or(0);
        let mut prev_src_line: i64 = 0;
        let mut prev_src_col: i64 = 0;

        for line in 0..=last_line {
            if line > 0 {
                out.push(';');
            }
            let Some(segments) = self.lines.get(&line) else {
                continue;
            };
            let mut prev_gen_col: i64 = 0;
            for (i, (&gen_col, &(src_line, src_col))) in segments.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                encode_vlq(&mut out, gen_col as i64 - prev_gen_col);
                encode_vlq(&mut out, 0);
                encode_vlq(&mut out, src_line as i64 - prev_src_line);
                encode_vlq(&mut out, src_col as i64 - prev_src_col);
                prev_gen_col = gen_col as i64;
                prev_src_line = src_line as i64;
                prev_src_col = src_col as i64;
            }
        }

        out
    }

    /// Finish into a [`SourceMap`] for a single source.
    pub fn build(&self, file: Option<&str>, source: &str, content: Option<&str>) -> SourceMap {
        SourceMap {
            version: 3,
            file: file.map(str::to_string),
            sources: vec![source.to_string()],
            sources_content: content.map(|c| vec![c.to_string()]),
            names: Vec::new(),
            mappings: self.encode(),
        }
    }
}

/// Append one base64 VLQ value.
pub fn encode_vlq(out: &mut String, value: i64) {
    let mut vlq = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    } as u64;

    loop {
        let mut digit = (vlq & 0b11111) as u8;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0b100000;
        }
        out.push(BASE64[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

fn decode_base64(c: u8) -> Option<u64> {
    BASE64.iter().position(|&b| b == c).map(|p| p as u64)
}

/// Decode a `mappings` string into absolute positions per generated line.
pub fn decode_mappings(mappings: &str) -> Option<Vec<BTreeMap<usize, (usize, usize)>>> {
    let mut lines = Vec::new();
    let mut src_line: i64 = 0;
    let mut src_col: i64 = 0;

    for line in mappings.split(';') {
        let mut segments = BTreeMap::new();
        let mut gen_col: i64 = 0;
        for segment in line.split(',').filter(|s| !s.is_empty()) {
            let values = decode_segment(segment)?;
            if values.len() < 4 {
                gen_col += *values.first()?;
                continue;
            }
            gen_col += values[0];
            src_line += values[2];
            src_col += values[3];
            segments.insert(gen_col as usize, (src_line as usize, src_col as usize));
        }
        lines.push(segments);
    }

    Some(lines)
}

fn decode_segment(segment: &str) -> Option<Vec<i64>> {
    let mut values = Vec::new();
    let mut value: u64 = 0;
    let mut shift = 0;

    for &byte in segment.as_bytes() {
        let digit = decode_base64(byte)?;
        value |= (digit & 0b11111) << shift;
        if digit & 0b100000 != 0 {
            shift += 5;
            continue;
        }
        let negative = value & 1 == 1;
        let magnitude = (value >> 1) as i64;
        values.push(if negative { -magnitude } else { magnitude });
        value = 0;
        shift = 0;
    }

    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlq(value: i64) -> String {
        let mut s = String::new();
        encode_vlq(&mut s, value);
        s
    }

    #[test]
    fn test_vlq_known_values() {
        assert_eq!(vlq(0), "A");
        assert_eq!(vlq(1), "C");
        assert_eq!(vlq(-1), "D");
        assert_eq!(vlq(15), "e");
        assert_eq!(vlq(16), "gB");
        assert_eq!(vlq(-17), "jB");
    }

    #[test]
    fn test_encode_and_lookup() {
        let mut builder = SourceMapBuilder::new();
        builder.add_mapping(0, 0, 0, 0);
        builder.add_mapping(0, 10, 0, 40);
        builder.add_mapping(2, 0, 3, 0);

        let map = builder.build(Some("page.vue"), "page.vue", None);
        assert_eq!(map.version, 3);
        assert_eq!(map.mappings.matches(';').count(), 2);

        assert_eq!(map.lookup(0, 0), Some((0, 0)));
        assert_eq!(map.lookup(0, 12), Some((0, 40)));
        assert_eq!(map.lookup(2, 5), Some((3, 0)));
        assert_eq!(map.lookup(1, 0), None);
    }

    #[test]
    fn test_json_shape() {
        let mut builder = SourceMapBuilder::new();
        builder.add_mapping(0, 0, 0, 0);
        let json = builder.build(None, "a.vue", Some("x")).to_json().unwrap();
        assert!(json.contains(r#""version":3"#));
        assert!(json.contains(r#""sourcesContent":["x"]"#));
        assert!(!json.contains(r#""file""#));
    }
}
