use std::io::{Cursor, Read};

use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use zip::ZipArchive;

use super::BoxedError;

const DOCUMENT_PART: &str = "word/document.xml";

const WORDPROCESSING_NS: &[u8] =
    b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const MARKUP_COMPATIBILITY_NS: &[u8] =
    b"http://schemas.openxmlformats.org/markup-compatibility/2006";

/// Extracts the text of every paragraph in the main document part, each
/// one followed by a line feed.
pub(super) fn extract_text(bytes: &[u8]) -> Result<String, BoxedError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;
    paragraphs_text(&xml)
}

/// The elements that carry text, recognized by namespace and local name
/// so that any prefix binding works.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tag {
    Paragraph,
    Run,
    Text,
    Tab,
    Break,
    /// `mc:Fallback` repeats the content of the `mc:Choice` next to it.
    Fallback,
    Other,
}

impl Tag {
    fn resolve(ns: &ResolveResult<'_>, local_name: &[u8]) -> Self {
        let ResolveResult::Bound(Namespace(ns)) = ns else {
            return Tag::Other;
        };
        if *ns == MARKUP_COMPATIBILITY_NS {
            return match local_name {
                b"Fallback" => Tag::Fallback,
                _ => Tag::Other,
            };
        }
        if *ns != WORDPROCESSING_NS {
            return Tag::Other;
        }
        match local_name {
            b"p" => Tag::Paragraph,
            b"r" => Tag::Run,
            b"t" => Tag::Text,
            b"tab" => Tag::Tab,
            b"br" | b"cr" => Tag::Break,
            _ => Tag::Other,
        }
    }
}

fn paragraphs_text(xml: &str) -> Result<String, BoxedError> {
    let mut reader = NsReader::from_str(xml);

    let mut text = String::new();
    // Open paragraphs, innermost last. Text box paragraphs are nested in a
    // run of the paragraph they are anchored to.
    let mut paragraphs: Vec<String> = Vec::new();
    let mut run_depth = 0usize;
    let mut text_depth = 0usize;
    let mut fallback_depth = 0usize;

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        let tag = match &event {
            Event::Start(e) | Event::Empty(e) => {
                Tag::resolve(&ns, e.local_name().as_ref())
            }
            Event::End(e) => Tag::resolve(&ns, e.local_name().as_ref()),
            _ => Tag::Other,
        };

        match event {
            Event::Start(_) => match tag {
                Tag::Fallback => fallback_depth += 1,
                _ if fallback_depth > 0 => {}
                Tag::Paragraph => paragraphs.push(String::new()),
                Tag::Run => run_depth += 1,
                Tag::Text => text_depth += 1,
                _ => {}
            },
            Event::End(_) => match tag {
                Tag::Fallback => fallback_depth -= 1,
                _ if fallback_depth > 0 => {}
                Tag::Paragraph => {
                    let paragraph = paragraphs.pop().unwrap_or_default();
                    close_paragraph(&mut paragraphs, &mut text, &paragraph);
                }
                Tag::Run => run_depth -= 1,
                Tag::Text => text_depth -= 1,
                _ => {}
            },
            Event::Empty(_) => match tag {
                _ if fallback_depth > 0 => {}
                Tag::Paragraph => {
                    close_paragraph(&mut paragraphs, &mut text, "");
                }
                // `w:tab` also shows up in paragraph properties as a tab
                // stop, only the ones inside a run are characters.
                Tag::Tab if run_depth > 0 => push_str(&mut paragraphs, "\t"),
                Tag::Break if run_depth > 0 => {
                    push_str(&mut paragraphs, "\n");
                }
                _ => {}
            },
            Event::Text(e) if text_depth > 0 && fallback_depth == 0 => {
                push_str(&mut paragraphs, &e.unescape()?);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(text)
}

/// Emits a finished paragraph into the enclosing one, or into the output
/// when it sits at body level.
fn close_paragraph(open: &mut [String], text: &mut String, paragraph: &str) {
    let target = match open.last_mut() {
        Some(outer) => outer,
        None => text,
    };
    target.push_str(paragraph);
    target.push('\n');
}

#[inline]
fn push_str(open: &mut [String], s: &str) {
    if let Some(paragraph) = open.last_mut() {
        paragraph.push_str(s);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    use super::*;

    const NAMESPACE: &str =
        "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    /// Wraps body XML into a minimal DOCX archive.
    pub(crate) fn make_docx_from_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{NAMESPACE}"><w:body>{body}</w:body></w:document>"#
        );
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated);
        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(b"<Types/>").unwrap();
        writer.start_file(DOCUMENT_PART, options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    /// Builds a DOCX with one single-run paragraph per item.
    pub(crate) fn make_docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
            .collect();
        make_docx_from_body(&body)
    }

    #[test]
    fn test_paragraphs_end_with_newline() {
        let bytes = make_docx(&["A", "B"]);
        assert_eq!(extract_text(&bytes).unwrap(), "A\nB\n");
    }

    #[test]
    fn test_runs_tabs_and_breaks() {
        let bytes = make_docx_from_body(concat!(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>"#,
            r#"<w:r><w:t>Party</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve"> A &amp; B</w:t></w:r>"#,
            r#"<w:r><w:br/><w:t>Signed</w:t></w:r></w:p>"#,
            r#"<w:p/>"#,
            r#"<w:p><w:r><w:t>End</w:t></w:r></w:p>"#,
            r#"<w:sectPr/>"#,
        ));
        assert_eq!(
            extract_text(&bytes).unwrap(),
            "Party\t A & B\nSigned\n\nEnd\n"
        );
    }

    #[test]
    fn test_text_box_keeps_anchor_paragraph() {
        let bytes = make_docx_from_body(concat!(
            r#"<w:p><w:r><w:t xml:space="preserve">Before </w:t></w:r>"#,
            r#"<w:r><w:drawing><w:txbxContent>"#,
            r#"<w:p><w:r><w:t>Box</w:t></w:r></w:p>"#,
            r#"</w:txbxContent></w:drawing></w:r>"#,
            r#"<w:r><w:t>After</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Next</w:t></w:r></w:p>"#,
        ));
        assert_eq!(
            extract_text(&bytes).unwrap(),
            "Before Box\nAfter\nNext\n"
        );
    }

    #[test]
    fn test_alternate_content_fallback_is_skipped() {
        let xml = format!(
            concat!(
                r#"<w:document xmlns:w="{ns}" xmlns:mc="{mc}"><w:body>"#,
                r#"<w:p><w:r><w:t>Clause</w:t></w:r><w:r><mc:AlternateContent>"#,
                r#"<mc:Choice Requires="wps"><w:txbxContent><w:p><w:r><w:t>Note</w:t></w:r></w:p></w:txbxContent></mc:Choice>"#,
                r#"<mc:Fallback><w:txbxContent><w:p><w:r><w:t>Note</w:t></w:r></w:p></w:txbxContent></mc:Fallback>"#,
                r#"</mc:AlternateContent></w:r></w:p>"#,
                r#"</w:body></w:document>"#,
            ),
            ns = NAMESPACE,
            mc = "http://schemas.openxmlformats.org/markup-compatibility/2006",
        );
        assert_eq!(paragraphs_text(&xml).unwrap(), "ClauseNote\n\n");
    }

    #[test]
    fn test_any_prefix_for_the_main_namespace() {
        let prefixed = format!(
            r#"<ns0:document xmlns:ns0="{NAMESPACE}"><ns0:body><ns0:p><ns0:r><ns0:t>A</ns0:t></ns0:r></ns0:p></ns0:body></ns0:document>"#
        );
        assert_eq!(paragraphs_text(&prefixed).unwrap(), "A\n");

        let default_ns = format!(
            r#"<document xmlns="{NAMESPACE}"><body><p><r><t>B</t><tab/></r></p></body></document>"#
        );
        assert_eq!(paragraphs_text(&default_ns).unwrap(), "B\t\n");
    }

    #[test]
    fn test_foreign_namespace_is_not_text() {
        let xml = format!(
            r#"<w:document xmlns:w="{NAMESPACE}" xmlns:x="urn:other"><w:body><x:p><x:r><x:t>hidden</x:t></x:r></x:p><w:p><w:r><w:t>shown</w:t></w:r></w:p></w:body></w:document>"#
        );
        assert_eq!(paragraphs_text(&xml).unwrap(), "shown\n");
    }

    #[test]
    fn test_no_paragraphs() {
        let bytes = make_docx(&[]);
        assert_eq!(extract_text(&bytes).unwrap(), "");
    }

    #[test]
    fn test_not_a_zip() {
        assert!(extract_text(b"plain bytes").is_err());
    }

    #[test]
    fn test_missing_document_part() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<w:styles/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        assert!(extract_text(&bytes).is_err());
    }

    #[test]
    fn test_malformed_xml() {
        let bytes = make_docx_from_body("<w:p><w:r><w:t>open</w:r></w:p>");
        assert!(extract_text(&bytes).is_err());
    }
}
