//! End-to-end extraction of a DAISY book into numbered tracks and a playlist.
//!
//! Extraction runs in two phases. [`plan`] validates the input, reads every
//! document and works out each destination file name without touching the
//! output root. [`ExtractionPlan::execute`] then creates the directory tree,
//! copies the audio and writes the playlist. [`extract`] does both.
//!
//! Nothing is rolled back on failure: tracks copied before an error stay on
//! disk, and re-running overwrites them.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use tracing::{Span, debug, info, info_span};

use crate::book::{AudioFileEntry, BookMetadata, Track};
use crate::daisy::{extract_metadata, locate_book, parse_section};
use crate::error::{Error, Result};
use crate::sanitize::sanitize;
use crate::util::{extended_length_path, lowercase_extension};

/// Where to read a book from, where to put it, and how its documents are encoded.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub input_dir: PathBuf,
    pub output_root: PathBuf,
    /// Used for the NCC and every SMIL file alike.
    pub encoding: &'static Encoding,
}

impl ExtractOptions {
    /// Options with UTF-8 documents.
    pub fn new(input_dir: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_root: output_root.into(),
            encoding: encoding_rs::UTF_8,
        }
    }

    /// Use the encoding named by a WHATWG label such as `utf-8` or `iso-8859-1`.
    pub fn with_encoding(mut self, label: &str) -> Result<Self> {
        self.encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?;
        Ok(self)
    }
}

/// Position of a run in the extraction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Validated,
    Located,
    MetadataExtracted,
    SectionsParsed,
    DirectoryCreated,
    FilesCopied,
    PlaylistWritten,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Validated => "validated",
            Stage::Located => "located",
            Stage::MetadataExtracted => "metadata extracted",
            Stage::SectionsParsed => "sections parsed",
            Stage::DirectoryCreated => "directory created",
            Stage::FilesCopied => "files copied",
            Stage::PlaylistWritten => "playlist written",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the current [`Stage`] and moves to `Failed` on the first error.
struct Pipeline {
    stage: Stage,
}

impl Pipeline {
    fn starting_at(stage: Stage) -> Self {
        Self { stage }
    }

    /// Run one step; on success advance to `next`, on error stop at `Failed`.
    fn step<T>(&mut self, next: Stage, f: impl FnOnce() -> Result<T>) -> Result<T> {
        debug_assert_ne!(self.stage, Stage::Failed, "pipeline resumed after failure");
        match f() {
            Ok(value) => {
                debug!(from = %self.stage, to = %next, "pipeline advanced");
                self.stage = next;
                Ok(value)
            }
            Err(err) => {
                debug!(at = %self.stage, error = %err, "pipeline failed");
                self.stage = Stage::Failed;
                Err(err)
            }
        }
    }
}

/// Everything needed to write a book, computed without side effects.
#[derive(Debug)]
pub struct ExtractionPlan {
    pub metadata: BookMetadata,
    /// `output_root / sanitize(authors) / sanitize(title)`, absolute.
    pub output_dir: PathBuf,
    /// Audio references in section order, then in-section order.
    pub entries: Vec<AudioFileEntry>,
    /// One track per entry, numbered from 1.
    pub tracks: Vec<Track>,
    pub playlist_name: String,
    span: Span,
}

/// What a completed run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub output_dir: PathBuf,
    pub tracks: Vec<Track>,
    pub playlist: PathBuf,
}

/// Validate, locate and parse a book, and lay out its tracks.
///
/// Reads the input directory only; the output root is not touched.
pub fn plan(options: &ExtractOptions) -> Result<ExtractionPlan> {
    let span = info_span!("extract", input = %options.input_dir.display());
    let entered = span.enter();
    let mut pipeline = Pipeline::starting_at(Stage::Start);

    let (input_dir, output_root) = pipeline.step(Stage::Validated, || {
        let input_dir = absolute(&options.input_dir)?;
        validate_input_dir(&input_dir)?;
        Ok((input_dir, absolute(&options.output_root)?))
    })?;

    let files = pipeline.step(Stage::Located, || locate_book(&input_dir))?;
    info!(
        ncc = %files.ncc.display(),
        sections = files.timing_docs.len(),
        "located DAISY book"
    );

    let metadata = pipeline.step(Stage::MetadataExtracted, || {
        extract_metadata(&files.ncc, options.encoding)
    })?;
    info!(title = %metadata.title, authors = %metadata.authors_display(), "read metadata");

    let output_dir = output_root
        .join(sanitize(&metadata.authors_display()))
        .join(sanitize(&metadata.title));

    let entries = pipeline.step(Stage::SectionsParsed, || {
        collect_audio_entries(&input_dir, &files.timing_docs, options.encoding)
    })?;

    let tracks = number_tracks(&entries);
    let playlist_name = format!("{}.m3u", sanitize(&metadata.title));
    drop(entered);

    Ok(ExtractionPlan {
        metadata,
        output_dir,
        entries,
        tracks,
        playlist_name,
        span,
    })
}

/// Plan and execute in one go.
pub fn extract(options: &ExtractOptions) -> Result<ExtractionReport> {
    plan(options)?.execute()
}

impl ExtractionPlan {
    /// Create the output directory, copy every track and write the playlist.
    ///
    /// An existing output directory is reused and same-named files are overwritten.
    pub fn execute(&self) -> Result<ExtractionReport> {
        let _enter = self.span.enter();
        let mut pipeline = Pipeline::starting_at(Stage::SectionsParsed);

        pipeline.step(Stage::DirectoryCreated, || {
            fs::create_dir_all(extended_length_path(&self.output_dir))
                .map_err(|e| Error::fs(&self.output_dir, e))
        })?;
        debug!(dir = %self.output_dir.display(), "output directory ready");

        pipeline.step(Stage::FilesCopied, || {
            self.tracks.iter().try_for_each(|track| self.copy_track(track))
        })?;

        let playlist = self.output_dir.join(&self.playlist_name);
        pipeline.step(Stage::PlaylistWritten, || {
            fs::write(extended_length_path(&playlist), self.playlist_contents())
                .map_err(|e| Error::fs(&playlist, e))
        })?;
        info!(playlist = %playlist.display(), tracks = self.tracks.len(), "wrote playlist");

        pipeline.step(Stage::Done, || Ok(()))?;

        Ok(ExtractionReport {
            output_dir: self.output_dir.clone(),
            tracks: self.tracks.clone(),
            playlist,
        })
    }

    /// Track file names, one per line, without a trailing newline.
    pub fn playlist_contents(&self) -> String {
        self.tracks
            .iter()
            .map(|t| t.file_name.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn copy_track(&self, track: &Track) -> Result<()> {
        if !track.source.is_file() {
            return Err(Error::fs(
                &track.source,
                io::Error::new(io::ErrorKind::NotFound, "referenced audio file is missing"),
            ));
        }

        let dest = self.output_dir.join(&track.file_name);
        if is_same_file(&track.source, &dest) {
            // Copying a file onto itself truncates it before reading.
            debug!(file = %dest.display(), "track already in place");
            return Ok(());
        }
        fs::copy(
            extended_length_path(&track.source),
            extended_length_path(&dest),
        )
        .map_err(|e| Error::fs(&dest, e))?;
        info!(number = track.number, file = %track.file_name, "copied track");
        Ok(())
    }
}

/// Destination name for track `number`: `"NN - <section title>.<ext>"`.
///
/// The number is zero-padded to two digits and grows past 99 as needed; the
/// extension is the source's, lowercased.
pub fn track_file_name(number: usize, section_title: &str, source: &Path) -> String {
    let stem = format!("{number:02} - {}", sanitize(section_title));
    match lowercase_extension(source) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

/// Whether both paths resolve to the same existing file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| Error::fs(path, e))
}

fn validate_input_dir(input_dir: &Path) -> Result<()> {
    if !input_dir.exists() {
        return Err(Error::InvalidInput(format!(
            "input directory {} does not exist",
            input_dir.display()
        )));
    }
    if !input_dir.is_dir() {
        return Err(Error::InvalidInput(format!(
            "{} is not a directory",
            input_dir.display()
        )));
    }
    Ok(())
}

fn collect_audio_entries(
    input_dir: &Path,
    timing_docs: &[PathBuf],
    encoding: &'static Encoding,
) -> Result<Vec<AudioFileEntry>> {
    let mut entries = Vec::new();
    for doc in timing_docs {
        let section = parse_section(doc, encoding)?;
        entries.extend(section.audio_files.iter().map(|src| AudioFileEntry {
            section_title: section.title.clone(),
            source: input_dir.join(src),
        }));
    }
    Ok(entries)
}

fn number_tracks(entries: &[AudioFileEntry]) -> Vec<Track> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let number = index + 1;
            Track {
                number,
                source: entry.source.clone(),
                file_name: track_file_name(number, &entry.section_title, &entry.source),
            }
        })
        .collect()
}
