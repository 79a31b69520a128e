//! Serialization of a tree back to markup

use std::io::Write;

use tracing::instrument;

use super::node::{ElementNode, Node};
use crate::error::Result;

/// Output options
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// One level of indentation
    pub indent: String,
    /// Emit `<?xml version="1.0" encoding="utf-8"?>` first
    pub declaration: bool,
    /// Internal DTD subset written into a `<!DOCTYPE>` before the root
    pub dtd: Option<String>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            declaration: true,
            dtd: None,
        }
    }
}

impl WriteOptions {
    /// Bare element markup: no declaration, no doctype
    pub fn fragment() -> Self {
        Self {
            declaration: false,
            ..Self::default()
        }
    }

    pub fn with_dtd(mut self, dtd: impl Into<String>) -> Self {
        self.dtd = Some(dtd.into());
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }
}

/// Where a node sits relative to formatting
#[derive(Clone, Copy, Debug)]
struct FormatContext {
    depth: usize,
    /// Inside an element that has text children; whitespace there is data
    in_mixed: bool,
}

/// Serialize `root` as a complete document
#[instrument(skip_all, fields(root = root.name()))]
pub fn write_tree<W: Write>(root: &ElementNode, out: &mut W, options: &WriteOptions) -> Result<()> {
    let text = to_string(root, options);
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Serialize `root` into a string
pub fn to_string(root: &ElementNode, options: &WriteOptions) -> String {
    let mut out = String::new();
    if options.declaration {
        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    }
    if let Some(dtd) = &options.dtd {
        out.push_str("<!DOCTYPE ");
        out.push_str(root.name());
        out.push_str(" [\n");
        out.push_str(dtd.trim_end());
        out.push_str("\n]>\n");
    }
    write_element(
        &mut out,
        root,
        options,
        FormatContext {
            depth: 0,
            in_mixed: false,
        },
    );
    out.push('\n');
    out
}

fn write_element(out: &mut String, element: &ElementNode, options: &WriteOptions, ctx: FormatContext) {
    out.push('<');
    out.push_str(element.name());
    for (name, value) in element.attributes() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attribute(out, value);
        out.push('"');
    }

    if element.child_count() == 0 {
        out.push_str("/>");
        return;
    }
    out.push('>');

    let in_mixed = ctx.in_mixed || element.has_text_nodes();
    let child_ctx = FormatContext {
        depth: ctx.depth + 1,
        in_mixed,
    };
    for child in element.children() {
        if !in_mixed {
            newline(out, options, child_ctx.depth);
        }
        match child {
            Node::Element(child) => write_element(out, child, options, child_ctx),
            Node::Text(text) => escape_text(out, text.value()),
        }
    }
    if !in_mixed {
        newline(out, options, ctx.depth);
    }

    out.push_str("</");
    out.push_str(element.name());
    out.push('>');
}

fn newline(out: &mut String, options: &WriteOptions, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(&options.indent);
    }
}

/// Characters allowed by XML 1.0
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push(' '),
        }
    }
}

fn escape_attribute(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push(' '),
        }
    }
}
