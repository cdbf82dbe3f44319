//! Data model shared by the extractors and the orchestrator.

use std::path::PathBuf;

/// Bibliographic metadata read from the NCC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMetadata {
    pub title: String,
    /// Creators in declaration order.
    pub authors: Vec<String>,
}

impl BookMetadata {
    /// Authors joined for display and for the author directory name.
    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }
}

/// One SMIL timing document: its heading and the audio files it plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// Unique `src` values in order of first appearance.
    pub audio_files: Vec<String>,
}

/// An audio reference flattened out of its section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFileEntry {
    pub section_title: String,
    pub source: PathBuf,
}

/// A planned output track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// 1-based, contiguous across the whole book.
    pub number: usize,
    pub source: PathBuf,
    /// Bare file name inside the book's output directory.
    pub file_name: String,
}
