//! Book documents: the versioned root that carries a configuration

use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::config::names::{ATTRIB_BOOK_VERSION, TREE_BOOK, TREE_CONFIG, TREE_DEFAULT_CONFIG};
use crate::config::{Configuration, LoadContext};
use crate::diagnostics::{Diagnostics, ErrorSink, Severity};
use crate::error::{Error, ErrorKind, Result};
use crate::input::Input;
use crate::tree::{self, AttribLookup, DateFormat, ElementNode, IsoDate, Version, WriteOptions};

/// Version written into every saved book
pub const CURRENT_DOC_VERSION: Version = Version::new(15, 3);

/// Oldest version still readable
const OLDEST_DOC_VERSION: Version = Version::new(1, 0);

/// A loaded book. Only the configuration section is modeled.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Book {
    /// Version the document was written with
    pub version: Version,
    pub config: Configuration,
}

impl Book {
    pub fn new(config: Configuration) -> Self {
        Self {
            version: CURRENT_DOC_VERSION,
            config,
        }
    }

    /// Build a book from a parsed document. The root may be a book or a
    /// default configuration file; both carry the same structure.
    pub fn load(
        root: &ElementNode,
        dates: &dyn DateFormat,
        errors: &mut dyn ErrorSink,
    ) -> Result<Self> {
        if root.name() != TREE_BOOK && root.name() != TREE_DEFAULT_CONFIG {
            return Err(Error::semantic(ErrorKind::InvalidRoot {
                expected: TREE_BOOK.to_string(),
                found: root.name().to_string(),
            }));
        }

        let version = match root.get_attrib::<Version>(ATTRIB_BOOK_VERSION) {
            AttribLookup::Found(version) => version,
            AttribLookup::NotFound => {
                return Err(Error::missing_attribute(root.name(), ATTRIB_BOOK_VERSION));
            }
            AttribLookup::Invalid => {
                let text = root.attrib(ATTRIB_BOOK_VERSION).unwrap_or_default();
                return Err(Error::invalid_attribute(
                    root.name(),
                    ATTRIB_BOOK_VERSION,
                    format!("'{text}'"),
                ));
            }
        };
        check_version(version, errors)?;

        let mut configs = root.elements().filter(|c| c.name() == TREE_CONFIG);
        let node = configs
            .next()
            .ok_or_else(|| Error::semantic(ErrorKind::MissingConfiguration))?;
        if configs.next().is_some() {
            return Err(Error::semantic(ErrorKind::DuplicateConfiguration));
        }

        let mut ctx = LoadContext::new(version, dates, errors);
        let config = Configuration::load(node, &mut ctx)?;
        debug!(%version, "loaded book");
        Ok(Self { version, config })
    }

    /// Tree form of the book, stamped with the current version
    pub fn to_tree(&self, dates: &dyn DateFormat) -> ElementNode {
        let mut root = ElementNode::new(TREE_BOOK);
        root.add_attrib_value(ATTRIB_BOOK_VERSION, &CURRENT_DOC_VERSION);
        self.config.save(&mut root, dates);
        root
    }

    pub fn to_xml(&self, options: &WriteOptions) -> String {
        tree::to_string(&self.to_tree(&IsoDate), options)
    }
}

fn check_version(version: Version, errors: &mut dyn ErrorSink) -> Result<()> {
    if (OLDEST_DOC_VERSION..=CURRENT_DOC_VERSION).contains(&version) {
        return Ok(());
    }
    if version.major() != CURRENT_DOC_VERSION.major() {
        return Err(Error::semantic(ErrorKind::UnsupportedVersion {
            version: version.to_string(),
        }));
    }
    let message = format!(
        "Document version {version} is newer than {CURRENT_DOC_VERSION}; saving may lose data"
    );
    if errors.on_error(&message) {
        warn!(%version, "reading newer document");
        Ok(())
    } else {
        Err(Error::semantic(ErrorKind::NewerVersionRejected {
            version: version.to_string(),
        }))
    }
}

/// Parse a book from `input`. Tree and load failures are also recorded in
/// `diagnostics`.
pub fn load_book(input: &Input<'_>, diagnostics: &mut Diagnostics) -> Result<Book> {
    let root = tree::load(input, diagnostics)?;
    Book::load(&root, &IsoDate, diagnostics).inspect_err(|err| {
        diagnostics.push_error(Severity::Fatal, err);
    })
}

pub fn load_book_str(text: &str, diagnostics: &mut Diagnostics) -> Result<Book> {
    load_book(&Input::from_str(text), diagnostics)
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_book_file(path: impl AsRef<Path>, diagnostics: &mut Diagnostics) -> Result<Book> {
    let input = Input::from_path(path.as_ref())?;
    load_book(&input, diagnostics)
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn save_book_file(book: &Book, path: impl AsRef<Path>, options: &WriteOptions) -> Result<()> {
    tree::save_file(&book.to_tree(&IsoDate), path, options)
}
