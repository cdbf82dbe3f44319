//! # daisy-extract
//!
//! Turn a DAISY 2.02 talking book into a plain audio album: numbered tracks
//! plus an M3U playlist, filed under `<authors>/<title>/`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use daisy_extract::{ExtractOptions, extract};
//!
//! let options = ExtractOptions::new("/media/cdrom", "/home/me/Audiobooks")
//!     .with_encoding("iso-8859-1")
//!     .unwrap();
//! let report = extract(&options).unwrap();
//! println!("{} tracks in {}", report.tracks.len(), report.output_dir.display());
//! ```
//!
//! ## Pipeline
//!
//! 1. [`daisy::locate_book`] finds the NCC and the section SMIL files,
//!    naturally ordered, with `MASTER.SMIL` left out.
//! 2. [`daisy::extract_metadata`] reads `dc:title` and `dc:creator` from the NCC.
//! 3. [`daisy::parse_section`] reads each SMIL file's title and audio `src`s.
//! 4. [`extract::plan`] numbers the tracks; [`ExtractionPlan::execute`] copies
//!    them and writes the playlist.
//!
//! All markup goes through a lenient HTML parser (see [`dom`]), because real
//! DAISY filesets are often not well-formed XML.

pub mod book;
pub mod daisy;
pub mod dom;
pub mod error;
pub mod extract;
pub mod sanitize;
pub mod util;

pub use book::{AudioFileEntry, BookMetadata, Section, Track};
pub use error::{Error, Result};
pub use extract::{ExtractOptions, ExtractionPlan, ExtractionReport, Stage, extract, plan};
pub use sanitize::sanitize;
