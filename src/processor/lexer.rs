//! Line-level lexing for the pseudo-code dialect.
//!
//! Source text is first cut into `SourceLine`s (blank lines and `//`
//! comments dropped, indentation measured). Each line's content is then
//! walked with a `Scanner`, which knows just enough to pick out keywords,
//! identifiers and the free-form tail of a line. Nothing here decides what
//! a line *means*; that is the job of `rules`.
//
//  Lexical items:
//
//      Ident    ::= [A-Za-z0-9_]+
//      Keyword  ::= Ident compared case-insensitively
//      Indent   ::= leading spaces (1 column) and tabs (to next stop of 4)
//      Comment  ::= '//' .* (whole line only)

/// Tab stops used when measuring indentation.
pub const TAB_WIDTH: usize = 4;

pub const COMMENT_MARKER: &str = "//";

/// One meaningful line of source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Width of the leading whitespace in columns.
    pub indent: usize,
    /// Line content with surrounding whitespace trimmed.
    pub text: &'a str,
}

/// Iterator over the non-blank, non-comment lines of a document.
pub fn source_lines(src: &str) -> impl Iterator<Item = SourceLine<'_>> {
    src.lines().enumerate().filter_map(|(idx, raw)| {
        let text = raw.trim();
        if text.is_empty() || text.starts_with(COMMENT_MARKER) {
            return None;
        }
        Some(SourceLine {
            number: idx + 1,
            indent: indent_width(raw),
            text,
        })
    })
}

pub fn indent_width(raw: &str) -> usize {
    let mut width = 0;
    for c in raw.chars() {
        match c {
            '\t' => width += TAB_WIDTH - (width % TAB_WIDTH),
            c if c.is_whitespace() => width += 1,
            _ => break,
        }
    }
    width
}

/// Removes one pair of matching single or double quotes.
pub fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Splits a comma-separated argument list, stripping quotes and dropping
/// empty entries.
pub fn split_args(list: &str) -> Vec<String> {
    list.split(',')
        .map(strip_quotes)
        .filter(|arg| !arg.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Cursor over a single trimmed line.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn consume_while<F: Fn(char) -> bool>(&mut self, pred: F) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if pred(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        &self.src[start..self.pos]
    }

    /// Skips whitespace, returning whether any was present.
    pub fn skip_ws(&mut self) -> bool {
        !self.consume_while(char::is_whitespace).is_empty()
    }

    pub fn identifier(&mut self) -> Option<&'a str> {
        let ident = self.consume_while(is_ident_char);
        (!ident.is_empty()).then_some(ident)
    }

    /// Consumes `kw` (any case) when it appears as a whole word.
    pub fn keyword(&mut self, kw: &str) -> bool {
        let rest = &self.src[self.pos..];
        let Some(head) = rest.get(..kw.len()) else {
            return false;
        };
        if !head.eq_ignore_ascii_case(kw) {
            return false;
        }
        if rest[kw.len()..].chars().next().is_some_and(is_ident_char) {
            return false;
        }
        self.pos += kw.len();
        true
    }

    /// A keyword followed by mandatory whitespace.
    pub fn keyword_ws(&mut self, kw: &str) -> bool {
        let save = self.pos;
        if self.keyword(kw) && self.skip_ws() {
            return true;
        }
        self.pos = save;
        false
    }

    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Everything not consumed yet.
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }
}

/// Strips a trailing whole-word keyword (`then`, `do`) that is separated
/// from the preceding text by whitespace. Returns the trimmed head, which
/// must not be empty.
pub fn strip_trailing_keyword<'a>(text: &'a str, kw: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(kw.len())?;
    if !text.is_char_boundary(split) || !text[split..].eq_ignore_ascii_case(kw) {
        return None;
    }
    let head = &text[..split];
    if !head.ends_with(char::is_whitespace) {
        return None;
    }
    let head = head.trim();
    (!head.is_empty()).then_some(head)
}
