//! DOCX document writing for scraped pages.
//!
//! Scraped text is stored as minimal WordprocessingML: a zip container with
//! the package parts Word requires and one `w:p` paragraph per text line.

use std::io::{Cursor, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use quick_xml::escape::escape;
use tokio::fs;
use url::Url;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::scrape::error::ScrapeError;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Derive the document file name for a scraped URL:
/// `{domain-label}_{YYYYMMDD_HHMMSS}.docx`, where the domain label is the
/// first label of the host name.
pub fn document_filename(url: &Url, timestamp: DateTime<Local>) -> String {
    let label = url
        .host_str()
        .and_then(|host| host.split('.').next())
        .unwrap_or("page");
    format!("{}_{}.docx", label, timestamp.format("%Y%m%d_%H%M%S"))
}

/// Build the bytes of a DOCX file holding the given text, one paragraph per
/// line.
pub fn docx_bytes(text: &str) -> Result<Vec<u8>, ScrapeError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    writer.start_file("[Content_Types].xml", options)?;
    writer.write_all(CONTENT_TYPES_XML.as_bytes())?;

    writer.start_file("_rels/.rels", options)?;
    writer.write_all(RELS_XML.as_bytes())?;

    writer.start_file("word/document.xml", options)?;
    writer.write_all(document_xml(text).as_bytes())?;

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Write the text as a DOCX file at the given path.
pub async fn write_document(text: &str, path: &Path) -> Result<(), ScrapeError> {
    let bytes = docx_bytes(text)?;
    fs::write(path, bytes).await?;
    Ok(())
}

fn document_xml(text: &str) -> String {
    let mut body = String::new();
    for line in text.lines() {
        body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
        body.push_str(&escape(line));
        body.push_str("</w:t></w:r></w:p>");
    }
    if text.lines().next().is_none() {
        body.push_str("<w:p/>");
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    #[test]
    fn test_document_filename_uses_domain_label_and_timestamp() {
        let url = Url::parse("https://example.edu/dept/cse").unwrap();
        let timestamp = Local.with_ymd_and_hms(2024, 3, 15, 9, 30, 5).unwrap();

        assert_eq!(document_filename(&url, timestamp), "example_20240315_093005.docx");
    }

    #[test]
    fn test_document_xml_escapes_markup() {
        let xml = document_xml("Fees < 500 & rising");
        assert!(xml.contains("Fees &lt; 500 &amp; rising"));
    }

    #[test]
    fn test_docx_bytes_is_a_zip_with_document_part() {
        let bytes = docx_bytes("Line one\nLine two").unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert!(archive.by_name("word/document.xml").is_ok());
        assert!(archive.by_name("[Content_Types].xml").is_ok());
        assert!(archive.by_name("_rels/.rels").is_ok());
    }
}
