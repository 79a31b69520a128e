//! recbook - record-book documents and their versioned configuration
//!
//! A book is an XML-like document whose `Configuration` section describes
//! the venues, divisions, levels, titles and scoring rules runs are
//! recorded against. This crate parses and writes the generic document
//! tree, reads and writes typed attributes, maps the configuration onto
//! entity types, and merges a newer reference configuration into a live
//! one without losing user data.
//!
//! # Quick Start
//!
//! ```
//! use recbook::{load_book_str, Diagnostics, EnglishMessages};
//! # fn main() -> recbook::Result<()> {
//! let live = r#"<AgilityBook Book="15.3"><Configuration version="1">
//!   <Venue Name="USDAA"><Division Name="Standard"><Level Name="Novice"/></Division></Venue>
//! </Configuration></AgilityBook>"#;
//! let incoming = r#"<AgilityBook Book="15.3"><Configuration version="2">
//!   <Venue Name="USDAA"><Division Name="Standard"><Level Name="Advanced"/></Division></Venue>
//! </Configuration></AgilityBook>"#;
//!
//! let mut diagnostics = Diagnostics::new();
//! let mut book = load_book_str(live, &mut diagnostics)?;
//! let reference = load_book_str(incoming, &mut diagnostics)?;
//! let outcome = book.config.update(&reference.config, &EnglishMessages);
//! assert!(outcome.changed);
//! assert_eq!(book.config.version, 2);
//! assert!(outcome.report.contains("+Advanced"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod diagnostics;
pub use diagnostics::{Diagnostic, Diagnostics, ErrorSink, Severity};

pub mod input;
pub use input::Input;

pub mod tree;
pub use tree::{
    AttribLookup, AttribValue, DateFormat, ElementNode, IsoDate, Node, Version, WriteOptions,
};

pub mod config;
pub use config::{Configuration, UpdateOutcome};

pub mod merge;
pub use merge::{EnglishMessages, Messages, Tally};

pub mod book;
pub use book::{
    load_book, load_book_file, load_book_str, save_book_file, Book, CURRENT_DOC_VERSION,
};
