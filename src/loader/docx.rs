//! DOCX document reading.
//!
//! Reads the main document part out of the zip container and collects the
//! text runs, one line per paragraph. The whole file becomes a single
//! [`Document`] since DOCX has no page structure at rest.

use std::io::Read;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::instrument;

use crate::loader::Document;
use crate::loader::error::LoadError;

/// Load a DOCX file as a single document.
#[instrument]
pub async fn load_docx(path: &Path) -> Result<Vec<Document>, LoadError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || load_docx_sync(&path))
        .await
        .map_err(|e| LoadError::Task(e.to_string()))?
}

fn load_docx_sync(path: &PathBuf) -> Result<Vec<Document>, LoadError> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| LoadError::Docx {
        path: path.clone(),
        message: e.to_string(),
    })?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| LoadError::Docx {
            path: path.clone(),
            message: e.to_string(),
        })?
        .read_to_string(&mut xml)?;

    let text = document_text(&xml).map_err(|message| LoadError::Docx {
        path: path.clone(),
        message,
    })?;

    Ok(vec![Document {
        text,
        source: path.clone(),
        page: None,
    }])
}

/// Collect the visible text of a WordprocessingML document body, one line
/// per paragraph.
fn document_text(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) if e.name().as_ref() == b"w:t" => in_text_run = false,
            Event::End(e) if e.name().as_ref() == b"w:p" => {
                paragraphs.push(std::mem::take(&mut current));
            }
            Event::Text(e) if in_text_run => {
                current.push_str(&e.unescape().map_err(|e| e.to_string())?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::scrape::docx_bytes;

    #[test]
    fn test_document_text_joins_paragraphs() {
        let xml = r#"<?xml version="1.0"?>
            <w:document xmlns:w="http://example.invalid/w">
              <w:body>
                <w:p><w:r><w:t>First paragraph</w:t></w:r></w:p>
                <w:p><w:r><w:t>Second</w:t></w:r><w:r><w:t> paragraph</w:t></w:r></w:p>
              </w:body>
            </w:document>"#;

        assert_eq!(
            document_text(xml).unwrap(),
            "First paragraph\nSecond paragraph"
        );
    }

    #[test]
    fn test_document_text_ignores_non_text_content() {
        let xml = r#"<w:document xmlns:w="http://example.invalid/w">
            <w:body><w:p><w:pPr><w:jc/></w:pPr><w:r><w:t>Kept</w:t></w:r></w:p></w:body>
        </w:document>"#;

        assert_eq!(document_text(xml).unwrap(), "Kept");
    }

    #[tokio::test]
    async fn test_load_docx_round_trips_written_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.docx");
        let bytes = docx_bytes("Scholarship deadlines\nContact the registrar").unwrap();
        std::fs::write(&path, bytes).unwrap();

        let documents = load_docx(&path).await.unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].page, None);
        assert_eq!(
            documents[0].text,
            "Scholarship deadlines\nContact the registrar"
        );
    }

    #[tokio::test]
    async fn test_load_docx_rejects_non_zip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.docx");
        std::fs::write(&path, b"plain text").unwrap();

        let err = load_docx(&path).await.unwrap_err();
        assert!(matches!(err, LoadError::Docx { .. }));
    }
}
