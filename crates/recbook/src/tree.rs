//! Generic document tree: parse, navigate, edit and write markup
//!
//! ```
//! use recbook::tree::{self, WriteOptions};
//! # fn main() -> recbook::Result<()> {
//! let mut root = tree::parse_str("<Venue Name=\"USDAA\"><Desc>Dogs</Desc></Venue>")?;
//! root.add_element_node("Division").add_attrib("Name", "Standard");
//! let text = tree::to_string(&root, &WriteOptions::fragment());
//! assert!(text.contains("<Division Name=\"Standard\"/>"));
//! # Ok(())
//! # }
//! ```

pub mod attrib;
pub mod builder;
pub mod cursor;
pub mod date;
pub mod node;
pub mod reader;
pub mod version;
pub mod writer;

use std::path::Path;

use tracing::instrument;

pub use attrib::{format_f64, parse_f64, AttribLookup, AttribValue, DEFAULT_PRECISION};
pub use builder::{DomBuilder, ParseHandler, PushBuilder, TreeAssembler, TreeBuilder};
pub use date::{DateFormat, IsoDate};
pub use node::{ElementNode, Node, NodeKind, TextNode};
pub use reader::{ParseConfig, ParseEvent, Reader};
pub use version::Version;
pub use writer::{to_string, write_tree, WriteOptions};

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::input::Input;

/// Parse a document held in a string
pub fn parse_str(s: &str) -> Result<ElementNode> {
    load(&Input::from_str(s), &mut Diagnostics::new())
}

/// Parse with the default streaming builder, recording failures in
/// `diagnostics`
pub fn load(input: &Input<'_>, diagnostics: &mut Diagnostics) -> Result<ElementNode> {
    PushBuilder::default().build(input, diagnostics)
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_file(path: impl AsRef<Path>, diagnostics: &mut Diagnostics) -> Result<ElementNode> {
    let input = Input::from_path(path.as_ref())?;
    load(&input, diagnostics)
}

/// Write `root` to a file, replacing it
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn save_file(root: &ElementNode, path: impl AsRef<Path>, options: &WriteOptions) -> Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path.as_ref())?);
    write_tree(root, &mut file, options)
}
