//! Placeholder Scanner
//!
//! Splits free text into literal runs and `{{ namespace.field }}` expressions.
//!
//! Grammar:
//!
//! ```text
//! placeholder := '{{' ws* namespace '.' field ws* '}}'
//! namespace   := '#'? word+
//! field       := word+
//! word        := ASCII letter | ASCII digit | '_'
//! ws          := ' ' | '\t'
//! ```
//!
//! Anything that starts with `{{` but does not complete the grammar stays in
//! the literal text; scanning resumes one character after the opening brace,
//! so `{{{{to.name}}` still finds the inner placeholder.

use std::ops::Range;

/// A parsed `{{ namespace.field }}` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub namespace: &'a str,
    pub field: &'a str,
    /// Byte range of the whole expression, braces included
    pub span: Range<usize>,
}

impl Placeholder<'_> {
    /// Case-insensitive namespace comparison
    pub fn is_namespace(&self, namespace: &str) -> bool {
        self.namespace.eq_ignore_ascii_case(namespace)
    }
}

/// One piece of scanned text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Placeholder(Placeholder<'a>),
}

/// Scan `text` into literal and placeholder segments, in order
pub fn scan(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;

    for placeholder in placeholders(text) {
        if placeholder.span.start > literal_start {
            segments.push(Segment::Text(&text[literal_start..placeholder.span.start]));
        }
        literal_start = placeholder.span.end;
        segments.push(Segment::Placeholder(placeholder));
    }

    if literal_start < text.len() {
        segments.push(Segment::Text(&text[literal_start..]));
    }

    segments
}

/// Iterate the non-overlapping placeholders in `text`
pub fn placeholders(text: &str) -> Placeholders<'_> {
    Placeholders { text, pos: 0 }
}

/// Iterator returned by [`placeholders`]
pub struct Placeholders<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Placeholders<'a> {
    type Item = Placeholder<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(offset) = self.text[self.pos..].find("{{") {
            let start = self.pos + offset;
            match parse_at(self.text, start) {
                Some(placeholder) => {
                    self.pos = placeholder.span.end;
                    return Some(placeholder);
                }
                // '{' is one byte, so start + 1 is a char boundary
                None => self.pos = start + 1,
            }
        }
        self.pos = self.text.len();
        None
    }
}

/// Try to parse a placeholder whose `{{` begins at byte `start`
fn parse_at(text: &str, start: usize) -> Option<Placeholder<'_>> {
    let bytes = text.as_bytes();
    let mut i = start + 2;

    i = skip_ws(bytes, i);

    let ns_start = i;
    if bytes.get(i) == Some(&b'#') {
        i += 1;
    }
    let ns_word_start = i;
    i = skip_word(bytes, i);
    if i == ns_word_start {
        return None;
    }
    let ns_end = i;

    if bytes.get(i) != Some(&b'.') {
        return None;
    }
    i += 1;

    let field_start = i;
    i = skip_word(bytes, i);
    if i == field_start {
        return None;
    }
    let field_end = i;

    i = skip_ws(bytes, i);
    if bytes.get(i..i + 2) != Some(b"}}".as_slice()) {
        return None;
    }
    i += 2;

    // All delimiters are ASCII, so every index above is a char boundary
    Some(Placeholder {
        namespace: &text[ns_start..ns_end],
        field: &text[field_start..field_end],
        span: start..i,
    })
}

fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while matches!(bytes.get(i), Some(b' ' | b'\t')) {
        i += 1;
    }
    i
}

fn skip_word(bytes: &[u8], mut i: usize) -> usize {
    while bytes
        .get(i)
        .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
    {
        i += 1;
    }
    i
}
