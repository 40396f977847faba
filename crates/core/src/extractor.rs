use crate::error::IngestError;
use crate::models::MediaType;
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use lopdf::Document;
use tracing::{debug, warn};

pub trait TextExtractor {
    fn extract_text(&self, content: &[u8]) -> Result<String, IngestError>;
}

#[derive(Default)]
pub struct LopdfExtractor;

impl TextExtractor for LopdfExtractor {
    fn extract_text(&self, content: &[u8]) -> Result<String, IngestError> {
        let document =
            Document::load_mem(content).map_err(|error| IngestError::PdfParse(error.to_string()))?;

        let mut text = String::new();
        for (page_no, _page_id) in document.get_pages() {
            // An unreadable page contributes nothing; the rest of the document still counts.
            match document.extract_text(&[page_no]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(error) => warn!(page = page_no, %error, "pdf page yielded no text"),
            }
        }

        Ok(text)
    }
}

#[derive(Default)]
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract_text(&self, content: &[u8]) -> Result<String, IngestError> {
        let docx = read_docx(content).map_err(|error| IngestError::DocxParse(error.to_string()))?;

        let mut text = String::new();
        for child in docx.document.children {
            if let DocumentChild::Paragraph(paragraph) = child {
                push_paragraph_text(paragraph.children, &mut text);
                text.push('\n');
            }
        }

        Ok(text)
    }
}

/// Run text, tabs and breaks in document order, descending into hyperlinks.
fn push_paragraph_text(children: Vec<ParagraphChild>, text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in run.children {
                    match run_child {
                        RunChild::Text(run_text) => text.push_str(&run_text.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(hyperlink) => push_paragraph_text(hyperlink.children, text),
            _ => {}
        }
    }
}

/// Extracts plain text from a document according to its declared media type.
pub fn extract_document_text(media_type: &str, content: &[u8]) -> Result<String, IngestError> {
    let resolved = MediaType::from_mime(media_type)
        .ok_or_else(|| IngestError::UnsupportedMediaType(media_type.to_string()))?;

    let text = match resolved {
        MediaType::Pdf => LopdfExtractor.extract_text(content)?,
        MediaType::Docx => DocxExtractor.extract_text(content)?,
    };

    debug!(media_type = resolved.as_mime(), chars = text.len(), "extracted document text");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DOCX_MIME, PDF_MIME};
    use docx_rs::{Docx, Hyperlink, HyperlinkType, Paragraph, Run};
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use std::io::Cursor;

    fn sample_docx(paragraphs: &[&str]) -> Vec<u8> {
        let docx = paragraphs.iter().fold(Docx::new(), |docx, line| {
            docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*line)))
        });

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .expect("docx should be packed");
        buffer.into_inner()
    }

    fn text_operations(line: &str) -> Vec<u8> {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 48.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(line)]),
                Operation::new("ET", vec![]),
            ],
        };
        content.encode().expect("content should encode")
    }

    /// One page per entry; `None` leaves the page without a content stream.
    fn sample_pdf_pages(pages: Vec<Option<Vec<u8>>>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page_content in pages {
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
            };
            if let Some(bytes) = page_content {
                let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
                page.set("Contents", content_id);
            }
            kids.push(doc.add_object(page).into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).expect("pdf should be written");
        buffer
    }

    fn sample_pdf(line: &str) -> Vec<u8> {
        sample_pdf_pages(vec![Some(text_operations(line))])
    }

    #[test]
    fn docx_paragraphs_are_newline_terminated() {
        let content = sample_docx(&["Jane Doe", "Rust engineer"]);
        let text = extract_document_text(DOCX_MIME, &content).expect("docx should be extracted");
        assert_eq!(text, "Jane Doe\nRust engineer\n");
    }

    #[test]
    fn docx_tabs_breaks_and_hyperlinks_keep_their_text() {
        let contact = Paragraph::new()
            .add_run(Run::new().add_text("Email:").add_tab().add_text("x"))
            .add_hyperlink(
                Hyperlink::new("mailto:jane@example.com", HyperlinkType::External)
                    .add_run(Run::new().add_text("jane@example.com")),
            );
        let history = Paragraph::new().add_run(
            Run::new()
                .add_text("Acme")
                .add_break(docx_rs::BreakType::TextWrapping)
                .add_text("Globex"),
        );

        let mut buffer = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(contact)
            .add_paragraph(history)
            .build()
            .pack(&mut buffer)
            .expect("docx should be packed");

        let text = extract_document_text(DOCX_MIME, &buffer.into_inner())
            .expect("docx should be extracted");
        assert_eq!(text, "Email:\txjane@example.com\nAcme\nGlobex\n");
    }

    #[test]
    fn pdf_text_is_extracted_from_pages() {
        let content = sample_pdf("Hello World!");
        let text = extract_document_text(PDF_MIME, &content).expect("pdf should be extracted");
        assert!(text.contains("Hello World!"));
    }

    #[test]
    fn pdf_pages_without_text_contribute_nothing() {
        let content = sample_pdf_pages(vec![
            None,
            Some(text_operations("Senior Rust Engineer")),
            Some(b"\x00\xff((( not an operator stream".to_vec()),
        ]);

        let text = extract_document_text(PDF_MIME, &content)
            .expect("empty and unreadable pages should not fail the document");
        assert!(text.contains("Senior Rust Engineer"));
    }

    #[test]
    fn malformed_pdf_is_a_parse_error() {
        let result = extract_document_text(PDF_MIME, b"%PDF-1.4\n%broken");
        assert!(matches!(result, Err(IngestError::PdfParse(_))));
    }

    #[test]
    fn malformed_docx_is_a_parse_error() {
        let result = extract_document_text(DOCX_MIME, b"not a zip container");
        assert!(matches!(result, Err(IngestError::DocxParse(_))));
    }

    #[test]
    fn unsupported_media_type_is_rejected_before_extraction() {
        let result = extract_document_text("text/plain", b"plain resume");
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedMediaType(mime)) if mime == "text/plain"
        ));
    }
}
