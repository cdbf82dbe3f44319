//! Finding the NCC and the section SMIL files inside a book directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::util::natural_cmp;

/// NCC file names tried, in order, before falling back to a directory scan.
pub const NCC_NAMES: [&str; 2] = ["NCC.HTML", "ncc.html"];

/// Master SMIL acting as a table of contents; never treated as a section.
pub const MASTER_SMIL: &str = "MASTER.SMIL";

const SMIL_EXTENSION: &str = "smil";

/// The files that make up a DAISY book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFiles {
    pub ncc: PathBuf,
    /// Section SMIL files in natural order, master SMIL excluded.
    pub timing_docs: Vec<PathBuf>,
}

/// Locate and validate the NCC and the SMIL timing documents in `input_dir`.
///
/// Fails with [`Error::NotADaisyBook`] when there is no NCC or no SMIL file
/// other than the master.
pub fn locate_book(input_dir: &Path) -> Result<BookFiles> {
    let entries = list_files(input_dir)?;

    let ncc = find_ncc(input_dir, &entries).ok_or_else(|| {
        Error::NotADaisyBook(format!(
            "no NCC.HTML or ncc.html in {}",
            input_dir.display()
        ))
    })?;
    debug!(ncc = %ncc.display(), "found navigation file");

    let mut timing_docs: Vec<(String, PathBuf)> = entries
        .into_iter()
        .filter(|(name, _)| is_section_smil(name))
        .collect();
    timing_docs.sort_by(|(a, _), (b, _)| natural_cmp(a, b));

    if timing_docs.is_empty() {
        return Err(Error::NotADaisyBook(format!(
            "no SMIL timing documents in {}",
            input_dir.display()
        )));
    }
    debug!(count = timing_docs.len(), "found timing documents");

    Ok(BookFiles {
        ncc,
        timing_docs: timing_docs.into_iter().map(|(_, path)| path).collect(),
    })
}

/// Regular files directly inside `dir`, with their names.
fn list_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::fs(dir, e))? {
        let entry = entry.map_err(|e| Error::fs(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push((entry.file_name().to_string_lossy().into_owned(), path));
        }
    }
    Ok(files)
}

fn find_ncc(input_dir: &Path, entries: &[(String, PathBuf)]) -> Option<PathBuf> {
    for name in NCC_NAMES {
        let candidate = input_dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    // Mixed-case names such as `Ncc.html` on case-sensitive filesystems.
    entries
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case(NCC_NAMES[1]))
        .min_by(|(a, _), (b, _)| natural_cmp(a, b))
        .map(|(_, path)| path.clone())
}

fn is_section_smil(name: &str) -> bool {
    // Hidden files (e.g. macOS `._01.smil` forks) are skipped like a shell glob would.
    if name.starts_with('.') || name.eq_ignore_ascii_case(MASTER_SMIL) {
        return false;
    }
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SMIL_EXTENSION))
}
