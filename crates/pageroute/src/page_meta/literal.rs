// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Data-literal parsing for page metadata.
//!
//! Accepts the static subset of object literal syntax: objects, arrays,
//! quoted strings, numbers, `true`/`false`/`null`/`undefined`, identifier or
//! quoted keys, trailing commas and comments. Calls, spreads, bare
//! identifiers as values and template interpolation are rejected.

use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result, SourceContext};

#[derive(Parser)]
#[grammar = "page_meta/literal.pest"]
pub(crate) struct LiteralParser;

/// Parse a data literal into JSON.
///
/// `undefined` members are dropped from objects and become `null` inside
/// arrays.
pub fn parse_literal(text: &str) -> Result<Value> {
    let mut pairs = LiteralParser::parse(Rule::literal, text).map_err(|e| {
        let (line, column) = match e.line_col {
            LineColLocation::Pos(pos) => pos,
            LineColLocation::Span(start, _) => start,
        };
        Error::MetadataParse {
            message: e.variant.message().into_owned(),
            line,
            column,
            source_context: Some(SourceContext::from_source(text, line, column)),
        }
    })?;

    let value = pairs
        .next()
        .and_then(|literal| literal.into_inner().next())
        .ok_or_else(|| malformed("empty literal"))?;

    Ok(convert(value)?.unwrap_or(Value::Null))
}

fn malformed(what: &str) -> Error {
    Error::MetadataParse {
        message: format!("malformed literal: {}", what),
        line: 1,
        column: 1,
        source_context: None,
    }
}

fn convert(pair: Pair<'_, Rule>) -> Result<Option<Value>> {
    let value = match pair.as_rule() {
        Rule::object => {
            let mut map = Map::new();
            for member in pair.into_inner() {
                let mut inner = member.into_inner();
                let key = inner.next().ok_or_else(|| malformed("missing key"))?;
                let value = inner.next().ok_or_else(|| malformed("missing value"))?;
                let key = key_text(key)?;
                if let Some(value) = convert(value)? {
                    map.insert(key, value);
                }
            }
            Value::Object(map)
        }
        Rule::array => {
            let mut items = Vec::new();
            for item in pair.into_inner() {
                items.push(convert(item)?.unwrap_or(Value::Null));
            }
            Value::Array(items)
        }
        Rule::string => Value::String(string_text(pair)?),
        Rule::number => Value::Number(parse_number(pair.as_str())?),
        Rule::boolean => Value::Bool(pair.as_str() == "true"),
        Rule::null_lit => Value::Null,
        Rule::undefined_lit => return Ok(None),
        other => return Err(malformed(&format!("unexpected {:?}", other))),
    };
    Ok(Some(value))
}

fn key_text(pair: Pair<'_, Rule>) -> Result<String> {
    match pair.as_rule() {
        Rule::string => string_text(pair),
        Rule::identifier => Ok(pair.as_str().to_string()),
        Rule::number => Ok(parse_number(pair.as_str())?.to_string()),
        other => Err(malformed(&format!("unexpected key {:?}", other))),
    }
}

fn string_text(pair: Pair<'_, Rule>) -> Result<String> {
    let raw = pair
        .into_inner()
        .next()
        .map(|inner| inner.as_str())
        .unwrap_or_default();
    Ok(unescape(raw))
}

fn parse_number(text: &str) -> Result<Number> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        let value = i64::from_str_radix(hex, 16)
            .map_err(|e| malformed(&format!("hex literal {}: {}", text, e)))?;
        return Ok(Number::from(if negative { -value } else { value }));
    }

    let value: f64 = text
        .parse()
        .map_err(|e| malformed(&format!("number {}: {}", text, e)))?;

    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        return Ok(Number::from(value as i64));
    }

    Number::from_f64(value).ok_or_else(|| malformed(&format!("number {}", text)))
}

/// Resolve backslash escapes the way a string literal would.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            // line continuation
            Some('\n') => {}
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => out.push_str(&hex),
                }
            }
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|&c| c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => out.push_str(&hex),
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_object() {
        let value = parse_literal(
            r#"{
                layout: 'admin',
                "title": "Users",
                `count`: 3,
                ratio: 0.5,
                hex: 0x1F,
                tags: ['a', "b", `c`,],
                nested: { ok: true, nothing: null, gone: undefined },
            }"#,
        )
        .unwrap();

        assert_eq!(
            value,
            json!({
                "layout": "admin",
                "title": "Users",
                "count": 3,
                "ratio": 0.5,
                "hex": 31,
                "tags": ["a", "b", "c"],
                "nested": { "ok": true, "nothing": null }
            })
        );
    }

    #[test]
    fn test_comments_and_escapes() {
        let value = parse_literal(
            "{\n  // page title\n  title: 'It\\'s \\u0041', /* inline */ n: -2e3\n}",
        )
        .unwrap();
        assert_eq!(value["title"], "It's A");
        assert_eq!(value["n"], -2000);
    }

    #[test]
    fn test_undefined_in_array_is_null() {
        let value = parse_literal("{ list: [1, undefined] }").unwrap();
        assert_eq!(value["list"], json!([1, null]));
    }

    #[test]
    fn test_rejects_calls_and_identifiers() {
        for source in [
            "{ layout: resolveLayout() }",
            "{ layout: someVariable }",
            "{ ...base }",
            "{ title: `Hello ${name}` }",
        ] {
            assert!(
                matches!(parse_literal(source), Err(Error::MetadataParse { .. })),
                "expected rejection of {}",
                source
            );
        }
    }

    #[test]
    fn test_error_position() {
        let err = parse_literal("{\n  layout: admin\n}").unwrap_err();
        match err {
            Error::MetadataParse { line, source_context, .. } => {
                assert_eq!(line, 2);
                assert!(source_context.is_some());
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
