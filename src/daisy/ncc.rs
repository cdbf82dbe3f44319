//! Title and author extraction from the NCC.

use std::path::Path;

use encoding_rs::Encoding;
use tracing::debug;

use crate::book::BookMetadata;
use crate::dom::Dom;
use crate::error::{Error, Result};

use super::load_document;

const DC_TITLE: &str = "dc:title";
const DC_CREATOR: &str = "dc:creator";

/// Read the NCC at `path` and pull out its Dublin Core title and creators.
pub fn extract_metadata(path: &Path, encoding: &'static Encoding) -> Result<BookMetadata> {
    let dom = load_document(path, encoding)?;
    let metadata = parse_metadata(&dom).map_err(|e| match e {
        Error::MetadataMissing(reason) => {
            Error::MetadataMissing(format!("{reason} in {}", path.display()))
        }
        other => other,
    })?;
    debug!(title = %metadata.title, authors = %metadata.authors_display(), "read book metadata");
    Ok(metadata)
}

/// Extract metadata from an already parsed NCC.
///
/// The first `dc:title` meta wins. Every `dc:creator` meta with non-blank
/// content is an author, in document order.
pub fn parse_metadata(dom: &Dom) -> Result<BookMetadata> {
    let title = match dom.meta_contents(DC_TITLE).first() {
        None => return Err(Error::MetadataMissing("no dc:title meta element".into())),
        Some(None) | Some(Some("")) => {
            return Err(Error::MetadataMissing("dc:title meta has empty content".into()));
        }
        Some(Some(title)) => title.to_string(),
    };

    let creators = dom.meta_contents(DC_CREATOR);
    if creators.is_empty() {
        return Err(Error::MetadataMissing("no dc:creator meta elements".into()));
    }

    let authors: Vec<String> = creators
        .into_iter()
        .flatten()
        .filter(|author| !author.is_empty())
        .map(str::to_string)
        .collect();
    if authors.is_empty() {
        return Err(Error::MetadataMissing(
            "every dc:creator meta has empty content".into(),
        ));
    }

    Ok(BookMetadata { title, authors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_markup;

    fn ncc(head: &str) -> Dom {
        parse_markup(&format!(
            "<html><head><title>ncc</title>{head}</head><body><h1>x</h1></body></html>"
        ))
    }

    fn reason(result: Result<BookMetadata>) -> String {
        match result {
            Err(Error::MetadataMissing(reason)) => reason,
            other => panic!("expected MetadataMissing, got {other:?}"),
        }
    }

    #[test]
    fn test_title_and_authors_in_order() {
        let dom = ncc(
            r#"<meta name="dc:creator" content="Jane Doe">
               <meta name="dc:title" content="My Book">
               <meta name="dc:title" content="Ignored Second Title">
               <meta name="dc:creator" content="John Smith">"#,
        );
        let meta = parse_metadata(&dom).unwrap();
        assert_eq!(meta.title, "My Book");
        assert_eq!(meta.authors, vec!["Jane Doe", "John Smith"]);
        assert_eq!(meta.authors_display(), "Jane Doe, John Smith");
    }

    #[test]
    fn test_missing_title_tag() {
        let dom = ncc(r#"<meta name="dc:creator" content="Jane Doe">"#);
        assert!(reason(parse_metadata(&dom)).contains("no dc:title"));
    }

    #[test]
    fn test_empty_title_is_distinct_from_missing() {
        let dom = ncc(r#"<meta name="dc:title" content="   "><meta name="dc:creator" content="A">"#);
        let msg = reason(parse_metadata(&dom));
        assert!(msg.contains("empty"));
        assert!(!msg.contains("no dc:title"));

        let dom = ncc(r#"<meta name="dc:title"><meta name="dc:creator" content="A">"#);
        assert!(reason(parse_metadata(&dom)).contains("empty"));
    }

    #[test]
    fn test_missing_creators() {
        let dom = ncc(r#"<meta name="dc:title" content="T">"#);
        assert!(reason(parse_metadata(&dom)).contains("no dc:creator"));
    }

    #[test]
    fn test_blank_creators_are_skipped() {
        let dom = ncc(
            r#"<meta name="dc:title" content="T">
               <meta name="dc:creator" content="">
               <meta name="dc:creator" content="Real Author">"#,
        );
        assert_eq!(parse_metadata(&dom).unwrap().authors, vec!["Real Author"]);

        let dom = ncc(r#"<meta name="dc:title" content="T"><meta name="dc:creator" content=" ">"#);
        assert!(reason(parse_metadata(&dom)).contains("every dc:creator"));
    }

    #[test]
    fn test_entities_are_decoded() {
        let dom = ncc(
            r#"<meta name="dc:title" content="Pride &amp; Prejudice">
               <meta name="dc:creator" content="Jane Austen">"#,
        );
        assert_eq!(parse_metadata(&dom).unwrap().title, "Pride & Prejudice");
    }
}
