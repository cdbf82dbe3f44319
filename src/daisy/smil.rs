//! Section title and audio references from a SMIL timing document.

use std::collections::HashSet;
use std::path::Path;

use encoding_rs::Encoding;
use tracing::debug;

use crate::book::Section;
use crate::dom::Dom;
use crate::error::{Error, Result};

use super::load_document;

/// Read the SMIL file at `path` into a [`Section`].
pub fn parse_section(path: &Path, encoding: &'static Encoding) -> Result<Section> {
    let dom = load_document(path, encoding)?;
    let section = parse_section_markup(&dom).map_err(|e| match e {
        Error::MetadataMissing(reason) => {
            Error::MetadataMissing(format!("{reason} in {}", path.display()))
        }
        other => other,
    })?;
    debug!(
        file = %path.display(),
        title = %section.title,
        audio_files = section.audio_files.len(),
        "parsed section"
    );
    Ok(section)
}

/// Extract a [`Section`] from an already parsed SMIL document.
///
/// The title comes from the first `<meta name="title">`. Audio `src` values
/// keep the order in which each first appears; repeats are dropped.
pub fn parse_section_markup(dom: &Dom) -> Result<Section> {
    let title = match dom.meta_contents("title").first() {
        None => return Err(Error::MetadataMissing("no title meta element".into())),
        Some(None) | Some(Some("")) => {
            return Err(Error::MetadataMissing("title meta has empty content".into()));
        }
        Some(Some(title)) => title.to_string(),
    };

    let mut seen = HashSet::new();
    let audio_files = dom
        .elements_by_tag("audio")
        .into_iter()
        .filter_map(|id| dom.get_attr(id, "src"))
        .filter(|src| seen.insert(*src))
        .map(str::to_string)
        .collect();

    Ok(Section { title, audio_files })
}
