//! Pull tokenizer producing element and text events

use indexmap::IndexMap;

use super::cursor::{is_whitespace, Cursor};
use crate::error::{Error, ErrorKind, Result, Span};

/// Parser limits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseConfig {
    /// Deepest allowed element nesting (0 = unlimited)
    pub max_depth: u16,
    /// Largest accepted document in bytes (0 = unlimited)
    pub max_size: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_size: 64 * 1024 * 1024,
        }
    }
}

impl ParseConfig {
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// One step of a document
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseEvent {
    StartElement {
        name: String,
        attributes: IndexMap<String, String>,
    },
    /// Decoded character data, possibly whitespace only
    Text(String),
    EndElement {
        name: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Prolog,
    Content,
    Epilog,
    Done,
}

/// Streaming reader over a complete byte buffer.
///
/// Comments, processing instructions, the XML declaration and a DOCTYPE
/// (including its internal subset) are consumed silently. Self-closing
/// tags produce a start and an end event.
#[derive(Debug)]
pub struct Reader<'a> {
    cursor: Cursor<'a>,
    config: ParseConfig,
    open: Vec<String>,
    pending_end: Option<String>,
    state: State,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, ParseConfig::default())
    }

    pub fn with_config(input: &'a [u8], config: ParseConfig) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            open: Vec::new(),
            pending_end: None,
            state: State::Prolog,
        }
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn position(&self) -> crate::error::Pos {
        self.cursor.position()
    }

    /// Next event, or `None` once the root has closed and only trailing
    /// markup remains
    pub fn next_event(&mut self) -> Result<Option<ParseEvent>> {
        if self.state == State::Prolog && self.cursor.pos() == 0 {
            self.check_size()?;
            self.cursor.consume_bytes(b"\xEF\xBB\xBF");
        }

        if let Some(name) = self.pending_end.take() {
            return Ok(Some(self.close(name)));
        }

        match self.state {
            State::Prolog => {
                self.skip_misc()?;
                if self.cursor.is_eof() {
                    return Err(self.error_here(ErrorKind::Syntax, "no root element"));
                }
                self.state = State::Content;
                self.read_markup()
            }
            State::Content => {
                if self.cursor.current() == Some(b'<') {
                    self.read_markup()
                } else if self.cursor.is_eof() {
                    Err(self.error_here(ErrorKind::Syntax, "unexpected end of input"))
                } else {
                    self.read_text().map(|text| Some(ParseEvent::Text(text)))
                }
            }
            State::Epilog => {
                self.skip_misc()?;
                if self.cursor.is_eof() {
                    self.state = State::Done;
                    Ok(None)
                } else {
                    Err(self.error_here(ErrorKind::Syntax, "content after root element"))
                }
            }
            State::Done => Ok(None),
        }
    }

    fn check_size(&self) -> Result<()> {
        let max = self.config.max_size;
        if max > 0 && self.cursor.remaining().len() > max {
            return Err(Error::new(
                ErrorKind::MaxSizeExceeded { max },
                Span::at(self.cursor.position()),
            ));
        }
        Ok(())
    }

    /// Skip whitespace, comments, PIs and doctype outside the root element
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
            } else if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
            } else if self.cursor.starts_with(b"<!DOCTYPE") {
                if self.state != State::Prolog {
                    return Err(self.error_here(ErrorKind::Syntax, "misplaced DOCTYPE"));
                }
                self.skip_doctype()?;
            } else if self.cursor.is_eof() || self.cursor.current() == Some(b'<') {
                return Ok(());
            } else {
                return Err(self.error_here(ErrorKind::Syntax, "text outside root element"));
            }
        }
    }

    fn skip_doctype(&mut self) -> Result<()> {
        let mut brackets = 0usize;
        let mut quote = None;
        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => brackets += 1,
                (None, b']') => brackets = brackets.saturating_sub(1),
                (None, b'>') if brackets == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error_here(ErrorKind::Syntax, "unterminated DOCTYPE"))
    }

    /// At `<` inside or starting the root element
    fn read_markup(&mut self) -> Result<Option<ParseEvent>> {
        loop {
            if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
            } else if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
            } else if self.cursor.starts_with(b"<![CDATA[") {
                if self.open.is_empty() {
                    return Err(self.error_here(ErrorKind::Syntax, "CDATA outside root element"));
                }
                self.cursor.advance_by(9);
                let start = self.cursor.pos();
                self.skip_until(b"]]>")?;
                let raw = self.cursor.slice_from(start);
                let raw = raw.get(..raw.len().saturating_sub(3)).unwrap_or_default();
                return Ok(Some(ParseEvent::Text(normalize_newlines(&to_utf8(raw, self)?))));
            } else if self.cursor.starts_with(b"</") {
                return self.read_end_tag().map(Some);
            } else if self.cursor.current() == Some(b'<') {
                return self.read_start_tag().map(Some);
            } else {
                // a comment or PI between text runs; hand back to the caller
                return self.next_event();
            }
        }
    }

    fn read_start_tag(&mut self) -> Result<ParseEvent> {
        self.cursor.advance();
        let max = self.config.max_depth;
        if max > 0 && self.open.len() >= usize::from(max) {
            return Err(Error::new(
                ErrorKind::MaxDepthExceeded { max },
                Span::at(self.cursor.position()),
            ));
        }

        let name = self.read_name()?;
        let attributes = self.read_attributes()?;

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            self.pending_end = Some(name.clone());
        } else {
            self.expect_byte(b'>')?;
        }
        self.open.push(name.clone());
        Ok(ParseEvent::StartElement { name, attributes })
    }

    fn read_end_tag(&mut self) -> Result<ParseEvent> {
        let at = self.cursor.position();
        self.cursor.advance_by(2);
        let name = self.read_name()?;
        self.cursor.skip_whitespace();
        self.expect_byte(b'>')?;

        match self.open.last() {
            Some(open) if *open == name => Ok(self.close(name)),
            Some(open) => Err(Error::new(
                ErrorKind::MismatchedTag {
                    expected: open.clone(),
                    found: name,
                },
                Span::new(at, self.cursor.position()),
            )),
            None => Err(Error::with_message(
                ErrorKind::Syntax,
                Span::at(at),
                "closing tag without an open element",
            )),
        }
    }

    fn close(&mut self, name: String) -> ParseEvent {
        self.open.pop();
        if self.open.is_empty() {
            self.state = State::Epilog;
        }
        ParseEvent::EndElement { name }
    }

    fn read_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            let had_space = self.cursor.current().is_some_and(is_whitespace);
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) if !had_space => {
                    return Err(self.error_here(ErrorKind::Syntax, "expected whitespace"));
                }
                Some(_) => {}
                None => return Err(self.error_here(ErrorKind::Syntax, "unexpected end of input")),
            }

            let name = self.read_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.read_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(self.error_here(ErrorKind::Syntax, "duplicate attribute"));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn read_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(self.error_here(ErrorKind::Syntax, "expected quoted attribute value"));
            }
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                let at = self.cursor.position();
                self.cursor.advance();
                let text = normalize_newlines(&to_utf8(raw, self)?);
                let text: String = text
                    .chars()
                    .map(|c| if matches!(c, '\t' | '\n') { ' ' } else { c })
                    .collect();
                return decode_entities(&text).map_err(|err| relocate(err, at));
            }
            if b == b'<' {
                return Err(self.error_here(ErrorKind::Syntax, "'<' in attribute value"));
            }
            self.cursor.advance();
        }

        Err(self.error_here(ErrorKind::Syntax, "unterminated attribute value"))
    }

    fn read_text(&mut self) -> Result<String> {
        let start = self.cursor.pos();
        let at = self.cursor.position();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = normalize_newlines(&to_utf8(raw, self)?);
        decode_entities(&text).map_err(|err| relocate(err, at))
    }

    fn read_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(first) if is_name_start(first) => self.cursor.advance(),
            _ => return Err(self.error_here(ErrorKind::Syntax, "expected name")),
        }
        while self.cursor.current().is_some_and(is_name_char) {
            self.cursor.advance();
        }

        to_utf8(self.cursor.slice_from(start), self)
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while !self.cursor.is_eof() {
            if self.cursor.consume_bytes(pattern) {
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::Syntax, "unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            let message = format!("expected '{}'", char::from(expected));
            Err(self.error_here(ErrorKind::Syntax, &message))
        }
    }

    fn error_here(&self, kind: ErrorKind, message: &str) -> Error {
        Error::with_message(kind, Span::at(self.cursor.position()), message)
    }
}

fn relocate(err: Error, at: crate::error::Pos) -> Error {
    Error::with_message(err.kind().clone(), Span::at(at), err.message())
}

fn to_utf8(bytes: &[u8], reader: &Reader<'_>) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| reader.error_here(ErrorKind::InvalidUtf8, "invalid utf-8"))
}

fn normalize_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        result.push_str(rest.get(..amp).unwrap_or_default());
        let after = rest.get(amp + 1..).unwrap_or_default();
        let Some(semi) = after.find(';') else {
            return Err(invalid_entity("unterminated entity reference"));
        };
        let entity = after.get(..semi).unwrap_or_default();
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(entity),
        };
        match decoded {
            Some(ch) => result.push(ch),
            None => return Err(invalid_entity(&format!("unknown entity '&{entity};'"))),
        }
        rest = after.get(semi + 1..).unwrap_or_default();
    }
    result.push_str(rest);

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return None;
    };
    char::from_u32(code).filter(|&c| c != '\0')
}

fn invalid_entity(message: &str) -> Error {
    Error::with_message(ErrorKind::InvalidEntity, Span::empty(), message)
}
