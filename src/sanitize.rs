//! Filesystem-safe names for authors, titles and section headings.

/// Characters that are never allowed in a generated path component.
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*', '^'];

/// Map arbitrary text to a name usable as a single path component.
///
/// A `": "` separator becomes `" - "` so subtitles read naturally, control
/// characters and reserved punctuation become `_`, and trailing periods and
/// spaces are stripped because Windows refuses path components ending in them.
///
/// The result may be empty.
///
/// # Examples
///
/// ```
/// use daisy_extract::sanitize;
///
/// assert_eq!(sanitize("Dune: Messiah"), "Dune - Messiah");
/// assert_eq!(sanitize("AC/DC?"), "AC_DC_");
/// assert_eq!(sanitize("The End. "), "The End");
/// ```
pub fn sanitize(text: &str) -> String {
    let replaced: String = text
        .replace(": ", " - ")
        .chars()
        .map(|c| {
            if (c as u32) < 32 || RESERVED_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    replaced.trim_end_matches(['.', ' ']).to_string()
}
