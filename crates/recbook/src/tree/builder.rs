//! Tree construction from parse events
//!
//! Two interchangeable strategies produce identical trees:
//! [`PushBuilder`] feeds reader events one at a time into a [`TreeAssembler`],
//! while [`DomBuilder`] tokenizes the whole document first and then walks
//! the event list recursively.

use indexmap::IndexMap;
use tracing::{debug, instrument};

use super::node::ElementNode;
use super::reader::{ParseConfig, ParseEvent, Reader};
use crate::diagnostics::{Diagnostics, Severity};
use crate::error::{Error, ErrorKind, Result};
use crate::input::Input;

/// Callbacks raised while a document is read
pub trait ParseHandler {
    fn start_element(&mut self, name: String, attributes: IndexMap<String, String>);
    fn characters(&mut self, text: &str);
    fn end_element(&mut self, name: &str);

    /// The document is unusable; no further callbacks follow
    fn fatal_error(&mut self, _err: &Error) {}
}

/// Feed every event of `reader` to `handler`
pub fn drive<H: ParseHandler + ?Sized>(reader: &mut Reader<'_>, handler: &mut H) -> Result<()> {
    loop {
        match reader.next_event() {
            Ok(Some(ParseEvent::StartElement { name, attributes })) => {
                handler.start_element(name, attributes);
            }
            Ok(Some(ParseEvent::Text(text))) => handler.characters(&text),
            Ok(Some(ParseEvent::EndElement { name })) => handler.end_element(&name),
            Ok(None) => return Ok(()),
            Err(err) => {
                handler.fatal_error(&err);
                return Err(err);
            }
        }
    }
}

/// Builds a tree from streamed callbacks.
///
/// A started element waits in a pending slot until the next callback shows
/// whether it has content, and character data is buffered until the next
/// element boundary so split runs become one text node.
#[derive(Debug, Default)]
pub struct TreeAssembler {
    open: Vec<ElementNode>,
    pending: Option<ElementNode>,
    text: String,
    root: Option<ElementNode>,
    failed: bool,
}

impl TreeAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The finished root, if the document closed cleanly
    pub fn finish(self) -> Option<ElementNode> {
        if self.failed || !self.open.is_empty() || self.pending.is_some() {
            return None;
        }
        self.root
    }

    fn flush_pending(&mut self) {
        if let Some(element) = self.pending.take() {
            self.open.push(element);
        }
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        if let Some(top) = self.open.last_mut() {
            top.add_text_node(text);
        }
    }
}

impl ParseHandler for TreeAssembler {
    fn start_element(&mut self, name: String, attributes: IndexMap<String, String>) {
        self.flush_pending();
        self.flush_text();
        self.pending = Some(ElementNode::from_parts(name, attributes, Vec::new()));
    }

    fn characters(&mut self, text: &str) {
        self.flush_pending();
        self.text.push_str(text);
    }

    fn end_element(&mut self, _name: &str) {
        self.flush_pending();
        self.flush_text();
        let Some(mut element) = self.open.pop() else {
            return;
        };
        element.strip_formatting_text();
        match self.open.last_mut() {
            Some(parent) => parent.push_element(element),
            None => self.root = Some(element),
        }
    }

    fn fatal_error(&mut self, _err: &Error) {
        self.failed = true;
        self.open.clear();
        self.pending = None;
        self.root = None;
    }
}

/// A strategy for turning bytes into a tree
pub trait TreeBuilder {
    /// Build the tree, recording any failure in `diagnostics` as well as
    /// returning it. No partial tree survives a failure.
    fn build(&self, input: &Input<'_>, diagnostics: &mut Diagnostics) -> Result<ElementNode>;
}

/// Event-at-a-time builder over [`TreeAssembler`]
#[derive(Clone, Copy, Debug, Default)]
pub struct PushBuilder {
    pub config: ParseConfig,
}

impl PushBuilder {
    pub const fn new(config: ParseConfig) -> Self {
        Self { config }
    }
}

impl TreeBuilder for PushBuilder {
    #[instrument(skip_all, fields(bytes = input.len()))]
    fn build(&self, input: &Input<'_>, diagnostics: &mut Diagnostics) -> Result<ElementNode> {
        let mut reader = Reader::with_config(input.as_bytes(), self.config);
        let mut assembler = TreeAssembler::new();
        if let Err(err) = drive(&mut reader, &mut assembler) {
            diagnostics.push_error(Severity::Fatal, &err);
            return Err(err);
        }
        let root = assembler
            .finish()
            .ok_or_else(|| Error::with_message(ErrorKind::Syntax, crate::Span::empty(), "no root element"))?;
        debug!(root = root.name(), "tree built");
        Ok(root)
    }
}

/// Whole-document builder: tokenize everything, then assemble recursively
#[derive(Clone, Copy, Debug, Default)]
pub struct DomBuilder {
    pub config: ParseConfig,
}

impl DomBuilder {
    pub const fn new(config: ParseConfig) -> Self {
        Self { config }
    }
}

impl TreeBuilder for DomBuilder {
    #[instrument(skip_all, fields(bytes = input.len()))]
    fn build(&self, input: &Input<'_>, diagnostics: &mut Diagnostics) -> Result<ElementNode> {
        let mut reader = Reader::with_config(input.as_bytes(), self.config);
        let mut events = Vec::new();
        loop {
            match reader.next_event() {
                Ok(Some(event)) => events.push(event),
                Ok(None) => break,
                Err(err) => {
                    diagnostics.push_error(Severity::Fatal, &err);
                    return Err(err);
                }
            }
        }

        let mut events = events.into_iter();
        match events.next() {
            Some(ParseEvent::StartElement { name, attributes }) => {
                let root = assemble(&mut events, name, attributes);
                debug!(root = root.name(), "tree built");
                Ok(root)
            }
            _ => Err(Error::with_message(
                ErrorKind::Syntax,
                crate::Span::empty(),
                "no root element",
            )),
        }
    }
}

fn assemble(
    events: &mut std::vec::IntoIter<ParseEvent>,
    name: String,
    attributes: IndexMap<String, String>,
) -> ElementNode {
    let mut element = ElementNode::from_parts(name, attributes, Vec::new());
    let mut text = String::new();
    while let Some(event) = events.next() {
        match event {
            ParseEvent::Text(run) => text.push_str(&run),
            ParseEvent::StartElement { name, attributes } => {
                if !text.is_empty() {
                    element.add_text_node(std::mem::take(&mut text));
                }
                let child = assemble(events, name, attributes);
                element.push_element(child);
            }
            ParseEvent::EndElement { .. } => break,
        }
    }
    if !text.is_empty() {
        element.add_text_node(text);
    }
    element.strip_formatting_text();
    element
}
