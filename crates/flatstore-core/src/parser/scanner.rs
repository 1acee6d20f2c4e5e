//! Byte-level scanner splitting a JSON array into top-level objects
//!
//! The scanner keeps a nesting depth over `{`/`[` and `}`/`]`, but only for
//! bytes outside string literals: it tracks whether it is inside a string and
//! whether the previous byte was an escape, so values such as `"a}b"` or
//! `"say \"{\""` leave the depth untouched.
//!
//! Bytes at depth zero must form the array skeleton
//! `ws [ ws obj ws (, ws obj ws)* ] ws`. Anything else is a syntax error, so a
//! damaged store is reported instead of silently yielding fewer documents.

use std::ops::Range;

use super::ParseError;
use crate::{config::ScanLimits, document::Document};

/// Position within the outer array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ArrayState {
    #[default]
    BeforeOpen,
    /// After `[`
    ExpectFirst,
    /// After an element
    ExpectSeparator,
    /// After `,`
    ExpectElement,
    /// After `]`
    Closed,
}

/// Per-scan mutable state, owned by exactly one scanner
#[derive(Debug, Default)]
struct ParseState {
    depth: usize,
    buffer: Vec<u8>,
    in_string: bool,
    escaped: bool,
    array: ArrayState,
    position: u64,
    element_start: u64,
    pending_separator: Option<u64>,
    emitted: usize,
    closing_bracket: Option<u64>,
    finished: bool,
}

/// One complete top-level object
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedObject {
    /// Parsed object
    pub document: Document,
    /// Byte range of the object text, from `{` to one past `}`
    pub span: Range<u64>,
    /// Zero-based element index
    pub index: usize,
    /// Offset of the `,` preceding this element
    pub separator: Option<u64>,
}

impl ScannedObject {
    /// Whether this is the first element of the array
    pub fn is_first(&self) -> bool {
        self.index == 0
    }
}

/// Result of feeding one chunk to the scanner
#[derive(Debug)]
pub struct Feed {
    /// Bytes of the chunk that were processed
    pub consumed: usize,
    /// Object completed by the last processed byte
    pub object: Option<ScannedObject>,
}

/// Totals available once the input is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    /// Total bytes scanned
    pub length: u64,
    /// Number of objects emitted
    pub elements: usize,
    /// Offset of the closing `]`, `None` for an empty source
    pub closing_bracket: Option<u64>,
}

/// Incremental object scanner
#[derive(Debug, Default)]
pub struct ObjectScanner {
    state: ParseState,
    limits: ScanLimits,
}

impl ObjectScanner {
    /// Create scanner with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create scanner with custom limits
    pub fn with_limits(limits: ScanLimits) -> Self {
        Self {
            state: ParseState::default(),
            limits,
        }
    }

    /// Bytes processed so far
    pub fn position(&self) -> u64 {
        self.state.position
    }

    /// Objects emitted so far
    pub fn elements(&self) -> usize {
        self.state.emitted
    }

    /// Whether [`finish`](Self::finish) has been called
    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    /// Process bytes until an object completes or the chunk is exhausted
    ///
    /// Processing stops right after the byte that closes an object, so
    /// `consumed` may be shorter than `input`. The caller feeds the
    /// remainder on the next call.
    pub fn feed(&mut self, input: &[u8]) -> Result<Feed, ParseError> {
        if self.state.finished {
            return Err(ParseError::syntax(
                self.state.position,
                "input after end of scan",
            ));
        }

        for (offset, &byte) in input.iter().enumerate() {
            let position = self.state.position;
            self.state.position += 1;

            if self.state.depth == 0 {
                self.skip(byte, position)?;
                continue;
            }

            if self.accumulate(byte)? {
                let object = self.complete(position)?;
                return Ok(Feed {
                    consumed: offset + 1,
                    object: Some(object),
                });
            }
        }

        Ok(Feed {
            consumed: input.len(),
            object: None,
        })
    }

    /// Mark end of input and validate that the array was closed
    pub fn finish(&mut self) -> Result<ScanSummary, ParseError> {
        let state = &mut self.state;
        state.finished = true;

        if state.depth > 0 {
            return Err(ParseError::syntax(
                state.element_start,
                "unterminated object at end of input",
            ));
        }

        match state.array {
            ArrayState::BeforeOpen | ArrayState::Closed => Ok(ScanSummary {
                length: state.position,
                elements: state.emitted,
                closing_bracket: state.closing_bracket,
            }),
            _ => Err(ParseError::syntax(state.position, "missing closing ']'")),
        }
    }

    /// Scan a complete in-memory store
    pub fn scan_all(
        mut self,
        input: &[u8],
    ) -> Result<(Vec<ScannedObject>, ScanSummary), ParseError> {
        let mut objects = Vec::new();
        let mut rest = input;

        while !rest.is_empty() {
            let feed = self.feed(rest)?;
            rest = &rest[feed.consumed..];
            objects.extend(feed.object);
        }

        let summary = self.finish()?;
        Ok((objects, summary))
    }

    fn skip(&mut self, byte: u8, position: u64) -> Result<(), ParseError> {
        if is_whitespace(byte) {
            return Ok(());
        }

        let state = &mut self.state;
        match (state.array, byte) {
            (ArrayState::BeforeOpen, b'[') => state.array = ArrayState::ExpectFirst,
            (ArrayState::ExpectFirst | ArrayState::ExpectElement, b'{') => {
                state.depth = 1;
                state.in_string = false;
                state.escaped = false;
                state.element_start = position;
                state.buffer.clear();
                state.buffer.push(byte);
            }
            (ArrayState::ExpectFirst | ArrayState::ExpectSeparator, b']') => {
                state.array = ArrayState::Closed;
                state.closing_bracket = Some(position);
            }
            (ArrayState::ExpectSeparator, b',') => {
                state.array = ArrayState::ExpectElement;
                state.pending_separator = Some(position);
            }
            (ArrayState::BeforeOpen, other) => {
                return Err(ParseError::syntax(
                    position,
                    format!("expected '[' at start of store, found {}", describe(other)),
                ));
            }
            (ArrayState::ExpectElement, b']') => {
                return Err(ParseError::syntax(position, "trailing ',' before ']'"));
            }
            (ArrayState::Closed, other) => {
                return Err(ParseError::syntax(
                    position,
                    format!("unexpected {} after closing ']'", describe(other)),
                ));
            }
            (ArrayState::ExpectSeparator, other) => {
                return Err(ParseError::syntax(
                    position,
                    format!("expected ',' or ']', found {}", describe(other)),
                ));
            }
            (ArrayState::ExpectFirst | ArrayState::ExpectElement, other) => {
                return Err(ParseError::syntax(
                    position,
                    format!("expected object, found {}", describe(other)),
                ));
            }
        }

        Ok(())
    }

    /// Append one byte of the current object; returns true when it closes it
    fn accumulate(&mut self, byte: u8) -> Result<bool, ParseError> {
        let state = &mut self.state;

        if state.buffer.len() >= self.limits.max_document_size {
            return Err(ParseError::syntax(
                state.element_start,
                format!(
                    "document exceeds {} bytes",
                    self.limits.max_document_size
                ),
            ));
        }
        state.buffer.push(byte);

        if state.in_string {
            if state.escaped {
                state.escaped = false;
            } else if byte == b'\\' {
                state.escaped = true;
            } else if byte == b'"' {
                state.in_string = false;
            }
            return Ok(false);
        }

        match byte {
            b'"' => state.in_string = true,
            b'{' | b'[' => {
                state.depth += 1;
                if state.depth > self.limits.max_depth {
                    return Err(ParseError::syntax(
                        state.element_start,
                        format!("nesting deeper than {}", self.limits.max_depth),
                    ));
                }
            }
            b'}' | b']' => {
                state.depth -= 1;
                return Ok(state.depth == 0);
            }
            _ => {}
        }

        Ok(false)
    }

    fn complete(&mut self, position: u64) -> Result<ScannedObject, ParseError> {
        let state = &mut self.state;
        let document: Document = serde_json::from_slice(&state.buffer).map_err(|e| {
            ParseError::syntax(state.element_start, format!("invalid object: {e}"))
        })?;

        state.buffer.clear();
        state.array = ArrayState::ExpectSeparator;

        let object = ScannedObject {
            document,
            span: state.element_start..position + 1,
            index: state.emitted,
            separator: state.pending_separator.take(),
        };
        state.emitted += 1;

        Ok(object)
    }
}

pub(crate) fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

fn describe(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", byte as char)
    } else {
        format!("byte 0x{byte:02x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scan(input: &str) -> Result<(Vec<ScannedObject>, ScanSummary), ParseError> {
        ObjectScanner::new().scan_all(input.as_bytes())
    }

    fn syntax_message(err: ParseError) -> String {
        match err {
            ParseError::Syntax { message, .. } => message,
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_source_is_empty_store() {
        let (objects, summary) = scan("").unwrap();
        assert!(objects.is_empty());
        assert_eq!(summary.elements, 0);
        assert_eq!(summary.closing_bracket, None);

        let (objects, _) = scan("  \n\t ").unwrap();
        assert!(objects.is_empty());
    }

    #[test]
    fn test_empty_array() {
        let (objects, summary) = scan("[ ]").unwrap();
        assert!(objects.is_empty());
        assert_eq!(summary.closing_bracket, Some(2));
        assert_eq!(summary.length, 3);
    }

    #[test]
    fn test_spans_and_separators() {
        let input = r#"[{"a":1},{"b":2}]"#;
        let (objects, summary) = scan(input).unwrap();

        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].span, 1..8);
        assert_eq!(objects[0].separator, None);
        assert!(objects[0].is_first());
        assert_eq!(objects[1].span, 9..16);
        assert_eq!(objects[1].separator, Some(8));
        assert!(!objects[1].is_first());
        assert_eq!(summary.closing_bracket, Some(16));

        let first = &input[objects[0].span.start as usize..objects[0].span.end as usize];
        assert_eq!(first, r#"{"a":1}"#);
    }

    #[test]
    fn test_nested_values() {
        let input = r#"[{"a":{"b":[1,{"c":[]}]},"d":[{"e":null}]}]"#;
        let (objects, _) = scan(input).unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(
            serde_json::Value::Object(objects[0].document.clone()),
            json!({"a": {"b": [1, {"c": []}]}, "d": [{"e": null}]})
        );
    }

    #[test]
    fn test_braces_inside_strings_do_not_change_depth() {
        let input = r#"[{"title":"a}b{c","x":"]["},{"id":"2"}]"#;
        let (objects, _) = scan(input).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].document["title"], json!("a}b{c"));
        assert_eq!(objects[1].document["id"], json!("2"));
    }

    #[test]
    fn test_escaped_quotes_inside_strings() {
        let input = r#"[{"t":"say \"}\" now","u":"back\\"},{"id":"x{"}]"#;
        let (objects, _) = scan(input).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].document["t"], json!("say \"}\" now"));
        assert_eq!(objects[0].document["u"], json!("back\\"));
        assert_eq!(objects[1].document["id"], json!("x{"));
    }

    #[test]
    fn test_byte_by_byte_feeding_matches_bulk() {
        let input = br#" [ {"id":"1","n":{"k":"}"}} ,
            {"id":"2"} ] "#;
        let (bulk, bulk_summary) = ObjectScanner::new().scan_all(input).unwrap();

        let mut scanner = ObjectScanner::new();
        let mut incremental = Vec::new();
        for byte in input.iter() {
            let feed = scanner.feed(std::slice::from_ref(byte)).unwrap();
            assert_eq!(feed.consumed, 1);
            incremental.extend(feed.object);
        }
        let summary = scanner.finish().unwrap();

        assert_eq!(bulk, incremental);
        assert_eq!(bulk_summary, summary);
    }

    #[test]
    fn test_feed_stops_at_object_boundary() {
        let input = br#"[{"a":1},{"b":2}]"#;
        let mut scanner = ObjectScanner::new();

        let feed = scanner.feed(input).unwrap();
        assert_eq!(feed.consumed, 8);
        assert!(feed.object.is_some());
        assert_eq!(scanner.position(), 8);

        let feed = scanner.feed(&input[8..]).unwrap();
        assert_eq!(feed.consumed, 8);
        assert_eq!(scanner.elements(), 2);
    }

    #[test]
    fn test_missing_open_bracket() {
        let err = scan(r#"{"a":1}"#).unwrap_err();
        assert!(syntax_message(err).contains("expected '['"));

        let err = scan("not json").unwrap_err();
        assert_eq!(err.position(), Some(0));
    }

    #[test]
    fn test_trailing_comma() {
        let err = scan(r#"[{"a":1},]"#).unwrap_err();
        assert!(syntax_message(err).contains("trailing ','"));
    }

    #[test]
    fn test_non_object_elements() {
        let err = scan("[1,2]").unwrap_err();
        assert!(syntax_message(err).contains("expected object"));

        let err = scan(r#"[{"a":1} {"b":2}]"#).unwrap_err();
        assert!(syntax_message(err).contains("expected ',' or ']'"));
    }

    #[test]
    fn test_data_after_closing_bracket() {
        let err = scan(r#"[{"a":1}] x"#).unwrap_err();
        assert!(syntax_message(err).contains("after closing ']'"));
    }

    #[test]
    fn test_unterminated_input() {
        let err = scan(r#"[{"a":1},{"b":"#).unwrap_err();
        assert!(syntax_message(err).contains("unterminated object"));
        assert_eq!(err_position(r#"[{"a":1},{"b":"#), Some(9));

        let err = scan(r#"[{"a":1}"#).unwrap_err();
        assert!(syntax_message(err).contains("missing closing ']'"));
    }

    fn err_position(input: &str) -> Option<u64> {
        scan(input).unwrap_err().position()
    }

    #[test]
    fn test_balanced_but_invalid_object() {
        let err = scan(r#"[{"a":}]"#).unwrap_err();
        let position = err.position();
        assert!(syntax_message(err).contains("invalid object"));
        assert_eq!(position, Some(1));
    }

    #[test]
    fn test_mismatched_bracket_is_invalid_object() {
        let err = scan(r#"[{"a":1]]"#).unwrap_err();
        assert!(syntax_message(err).contains("invalid object"));
    }

    #[test]
    fn test_document_size_limit() {
        let limits = ScanLimits {
            max_document_size: 8,
            max_depth: 16,
        };
        let err = ObjectScanner::with_limits(limits)
            .scan_all(br#"[{"long":"value"}]"#)
            .unwrap_err();
        assert!(syntax_message(err).contains("exceeds 8 bytes"));

        let ok = ObjectScanner::with_limits(limits).scan_all(br#"[{"a":1}]"#);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let limits = ScanLimits {
            max_document_size: 1024,
            max_depth: 2,
        };
        let err = ObjectScanner::with_limits(limits)
            .scan_all(br#"[{"a":{"b":{"c":1}}}]"#)
            .unwrap_err();
        assert!(syntax_message(err).contains("nesting deeper than 2"));
    }

    #[test]
    fn test_feed_after_finish_is_rejected() {
        let mut scanner = ObjectScanner::new();
        scanner.feed(b"[]").unwrap();
        scanner.finish().unwrap();
        assert!(scanner.is_finished());
        assert!(scanner.feed(b" ").is_err());
    }

    #[test]
    fn test_multibyte_utf8_content() {
        let input = r#"[{"name":"Ärger {ü}"},{"name":"日本"}]"#;
        let (objects, summary) = scan(input).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].document["name"], json!("Ärger {ü}"));
        assert_eq!(summary.length, input.len() as u64);
    }
}
