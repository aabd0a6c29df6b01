//! PDF document reading.
//!
//! Each page of a PDF becomes one [`Document`] so page numbers survive into
//! the index and can be cited back to the reader. Parsing runs on a
//! blocking thread since lopdf is synchronous.

use std::path::{Path, PathBuf};

use lopdf::Document as PdfDocument;
use tracing::{debug, instrument};

use crate::loader::Document;
use crate::loader::error::LoadError;

/// Load a PDF file as one document per page.
///
/// A page whose text cannot be decoded yields a document with empty text
/// rather than failing the whole file.
#[instrument]
pub async fn load_pdf(path: &Path) -> Result<Vec<Document>, LoadError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || load_pdf_sync(&path))
        .await
        .map_err(|e| LoadError::Task(e.to_string()))?
}

fn load_pdf_sync(path: &PathBuf) -> Result<Vec<Document>, LoadError> {
    let pdf = PdfDocument::load(path).map_err(|e| LoadError::Pdf {
        path: path.clone(),
        message: e.to_string(),
    })?;

    let mut documents = Vec::new();
    for (page_number, _object_id) in pdf.get_pages() {
        let text = pdf.extract_text(&[page_number]).unwrap_or_default();
        debug!(
            "Loaded page {} of {} ({} chars)",
            page_number,
            path.display(),
            text.len()
        );
        documents.push(Document {
            text,
            source: path.clone(),
            page: Some(page_number),
        });
    }

    Ok(documents)
}

#[cfg(test)]
pub(super) mod testing {
    use super::*;

    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    pub(in crate::loader) fn build_pdf(path: &Path, page_texts: &[&str]) {
        let mut doc = PdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut page_ids = Vec::new();
        for text in page_texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 36.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().unwrap(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            page_ids.push(page_id.into());
        }

        let page_count = page_texts.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }
}
