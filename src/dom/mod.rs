//! Fault-tolerant markup parsing for NCC and SMIL documents.
//!
//! DAISY 2.02 filesets are frequently not well-formed XML, so documents go
//! through html5ever's HTML tree builder, which recovers from anything.
//! Unknown SMIL elements (`seq`, `par`, `text`) are kept as ordinary elements
//! and `<meta>` is honoured wherever it appears.

mod arena;
mod tree_sink;

pub use arena::{Dom, NodeId};

use tree_sink::DomSink;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

/// Parse a decoded document into a [`Dom`].
///
/// Never fails; malformed input produces whatever tree a browser would build.
pub fn parse_markup(text: &str) -> Dom {
    let sink = parse_document(DomSink::new(), ParseOpts::default())
        .from_utf8()
        .one(text.as_bytes());
    if sink.error_count() > 0 {
        tracing::trace!(errors = sink.error_count(), "recovered from markup errors");
    }
    sink.into_dom()
}

impl Dom {
    /// `<meta>` elements whose `name` attribute equals `name`, ignoring ASCII case.
    pub fn meta_elements(&self, name: &str) -> Vec<NodeId> {
        self.elements_by_tag("meta")
            .into_iter()
            .filter(|&id| {
                self.get_attr(id, "name")
                    .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
            })
            .collect()
    }

    /// Trimmed `content` of every matching `<meta>`, in document order.
    ///
    /// Metas without a `content` attribute yield `None`.
    pub fn meta_contents(&self, name: &str) -> Vec<Option<&str>> {
        self.meta_elements(name)
            .into_iter()
            .map(|id| self.get_attr(id, "content").map(str::trim))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_ncc_head() {
        let dom = parse_markup(
            r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<meta name="dc:title" content="My Book" />
<meta name="dc:creator" content="Jane Doe" />
</head>
<body><h1 class="title" id="h1"><a href="01.smil#t1">My Book</a></h1></body>
</html>"#,
        );

        assert_eq!(dom.meta_contents("dc:title"), vec![Some("My Book")]);
        assert_eq!(dom.meta_contents("dc:creator"), vec![Some("Jane Doe")]);
        assert_eq!(dom.elements_by_tag("h1").len(), 1);
    }

    #[test]
    fn test_parse_smil_keeps_meta_and_audio() {
        let dom = parse_markup(
            r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE smil PUBLIC "-//W3C//DTD SMIL 1.0//EN" "http://www.w3.org/TR/REC-smil/SMIL10.dtd">
<smil>
<head>
<meta name="title" content="Chapter 1"/>
<layout><region id="txtView"/></layout>
</head>
<body>
<seq dur="12.5s">
<par endsync="last">
<text src="ncc.html#t1" id="t1"/>
<seq><audio src="ch1.mp3" clip-begin="npt=0.000s" clip-end="npt=6.000s" id="a1"/>
<audio src="ch1.mp3" clip-begin="npt=6.000s" clip-end="npt=12.500s" id="a2"/></seq>
</par>
</seq>
</body>
</smil>"#,
        );

        assert_eq!(dom.meta_contents("title"), vec![Some("Chapter 1")]);
        let srcs: Vec<_> = dom
            .elements_by_tag("audio")
            .into_iter()
            .filter_map(|id| dom.get_attr(id, "src"))
            .collect();
        assert_eq!(srcs, vec!["ch1.mp3", "ch1.mp3"]);
    }

    #[test]
    fn test_parse_recovers_from_broken_markup() {
        let dom = parse_markup(
            "<html><head><meta name=dc:title content='Broken & Unclosed'></head>\
             <body><p><b>unterminated <meta name=\"dc:creator\" content=\"Someone\"><i>",
        );

        assert_eq!(dom.meta_contents("dc:title"), vec![Some("Broken & Unclosed")]);
        assert_eq!(dom.meta_contents("dc:creator"), vec![Some("Someone")]);
    }

    #[test]
    fn test_meta_name_ignores_ascii_case() {
        let dom = parse_markup(r#"<META NAME="DC:Title" CONTENT="  Shouting  ">"#);
        assert_eq!(dom.meta_contents("dc:title"), vec![Some("Shouting")]);
    }

    #[test]
    fn test_meta_without_content() {
        let dom = parse_markup(r#"<meta name="dc:title">"#);
        assert_eq!(dom.meta_contents("dc:title"), vec![None]);
    }

    #[test]
    fn test_parse_large_misnested_document() {
        // Enough nodes to grow the arena many times while the tree builder
        // is reparenting misnested formatting and foster-parenting table text.
        let mut markup = String::from("<html><body><table>");
        for i in 0..2000 {
            markup.push_str(&format!(
                "stray<tr><td><b><i>{i}</b></i><audio src=\"t{i}.mp3\"></td></tr>"
            ));
        }
        markup.push_str("</table></body></html>");

        let dom = parse_markup(&markup);

        let srcs: Vec<_> = dom
            .elements_by_tag("audio")
            .into_iter()
            .filter_map(|id| dom.get_attr(id, "src"))
            .collect();
        assert_eq!(srcs.len(), 2000);
        assert_eq!(srcs[0], "t0.mp3");
        assert_eq!(srcs[1999], "t1999.mp3");
    }
}
