//! Small helpers shared by the locator and the orchestrator.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;

use encoding_rs::Encoding;

/// Compare two names the way a person would sort them.
///
/// Runs of ASCII digits compare by numeric value, everything else compares
/// case-insensitively. Names that only differ in case or zero padding fall
/// back to a plain byte comparison so the ordering stays total.
///
/// # Examples
///
/// ```
/// use daisy_extract::util::natural_cmp;
/// use std::cmp::Ordering;
///
/// assert_eq!(natural_cmp("2.smil", "10.smil"), Ordering::Less);
/// assert_eq!(natural_cmp("Part B", "part a"), Ordering::Greater);
/// ```
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        let ordering = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let l = take_digits(&mut left);
                let r = take_digits(&mut right);
                compare_numeric(&l, &r)
            }
            (Some(x), Some(y)) => {
                left.next();
                right.next();
                x.to_lowercase().cmp(y.to_lowercase())
            }
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}

/// Compare two digit runs by value without parsing, so any length works.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Decode a document with the run's single configured encoding.
///
/// A leading byte-order mark is dropped only when it belongs to `encoding`.
/// Malformed sequences become U+FFFD instead of failing.
pub fn decode_text<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> Cow<'a, str> {
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        tracing::warn!(
            encoding = encoding.name(),
            "document contains malformed sequences; replaced with U+FFFD"
        );
    }
    text
}

/// Lowercased extension of `path`, if it has one.
pub fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Make a path usable past `MAX_PATH` on Windows.
///
/// Absolute paths get the `\\?\` (or `\\?\UNC\`) prefix; anything else is
/// returned unchanged.
#[cfg(windows)]
pub fn extended_length_path(path: &Path) -> PathBuf {
    use std::ffi::OsString;

    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };
    if raw.starts_with(r"\\?\") || !path.is_absolute() {
        return path.to_path_buf();
    }

    let mut prefixed = OsString::new();
    if let Some(share) = raw.strip_prefix(r"\\") {
        prefixed.push(r"\\?\UNC\");
        prefixed.push(share);
    } else {
        prefixed.push(r"\\?\");
        prefixed.push(raw);
    }
    PathBuf::from(prefixed)
}

#[cfg(not(windows))]
pub fn extended_length_path(path: &Path) -> PathBuf {
    path.to_path_buf()
}
