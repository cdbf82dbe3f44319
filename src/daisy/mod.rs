//! DAISY 2.02 fileset handling.
//!
//! A DAISY 2.02 book is a directory holding an NCC (`ncc.html`) with the
//! Dublin Core metadata, one SMIL file per section, and the audio those SMIL
//! files point at.

mod locator;
mod ncc;
mod smil;

pub use locator::{BookFiles, MASTER_SMIL, NCC_NAMES, locate_book};
pub use ncc::{extract_metadata, parse_metadata};
pub use smil::{parse_section, parse_section_markup};

use std::path::Path;

use encoding_rs::Encoding;

use crate::dom::{self, Dom};
use crate::error::{Error, Result};
use crate::util::decode_text;

/// Read a whole document, decode it and parse it leniently.
///
/// The file is closed before this returns.
fn load_document(path: &Path, encoding: &'static Encoding) -> Result<Dom> {
    let bytes = std::fs::read(path).map_err(|e| Error::fs(path, e))?;
    let text = decode_text(&bytes, encoding);
    Ok(dom::parse_markup(&text))
}
