//! Document loading: turn a folder of files into in-memory documents.
//!
//! The loader walks a folder in sorted order, dispatches each file by
//! extension, and skips anything it does not understand with a notice. PDFs
//! load as one document per page; DOCX files load whole.

mod docx;
mod error;
mod pdf;

pub use docx::load_docx;
pub use error::LoadError;
pub use pdf::load_pdf;

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

/// A loaded unit of source text
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The document text
    pub text: String,

    /// Path of the file the text came from
    pub source: PathBuf,

    /// Page number within the source, for paginated formats
    pub page: Option<u32>,
}

/// File formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Portable Document Format, loaded page by page
    Pdf,
    /// Office Open XML word processing document
    Docx,
}

impl SourceFormat {
    /// Detect the format of a file from its extension, case-insensitively.
    pub fn detect(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        match extension.as_deref() {
            Some("pdf") => Ok(SourceFormat::Pdf),
            Some("docx") => Ok(SourceFormat::Docx),
            _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Load a single file in its detected format.
///
/// Files in an unsupported format are a [`LoadError::UnsupportedFormat`].
#[instrument]
pub async fn load_file(path: &Path) -> Result<Vec<Document>, LoadError> {
    match SourceFormat::detect(path)? {
        SourceFormat::Pdf => load_pdf(path).await,
        SourceFormat::Docx => load_docx(path).await,
    }
}

/// Load every supported file in a folder.
///
/// Files are visited in sorted path order so repeated runs over the same
/// folder produce documents in the same order. Unsupported files are
/// skipped with a notice; subdirectories are ignored.
#[instrument]
pub async fn load_folder(dir: &Path) -> Result<Vec<Document>, LoadError> {
    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        match load_file(&path).await {
            Ok(loaded) => {
                info!("Loaded {} ({} documents)", path.display(), loaded.len());
                documents.extend(loaded);
            }
            Err(e @ LoadError::UnsupportedFormat(_)) => warn!("{}", e),
            Err(e) => return Err(e),
        }
    }

    Ok(documents)
}
