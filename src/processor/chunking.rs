//! Fixed-stride text chunking.
//!
//! Text is split into windows of `chunk_size` characters that advance by
//! `chunk_size - overlap`, so consecutive chunks share exactly `overlap`
//! characters and every character of the input appears in at least one
//! chunk. Offsets are measured in characters, not bytes, so multi-byte
//! input never splits mid-character.

use tracing::debug;

use crate::processor::ChunkOptions;
use crate::processor::error::ProcessError;

/// A chunk of document text
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// The chunk text
    pub text: String,

    /// Character offset of the chunk within the source text
    pub start: usize,

    /// Zero-based position of the chunk within the source text
    pub position: usize,
}

/// Split text into overlapping fixed-stride chunks.
///
/// Returns no chunks for empty input. The final chunk may be shorter than
/// `chunk_size`; it always ends at the end of the text.
pub fn chunk_text(text: &str, options: &ChunkOptions) -> Result<Vec<Chunk>, ProcessError> {
    options.validate()?;

    if text.is_empty() {
        return Ok(Vec::new());
    }

    // Byte offset of each character, plus the end of the text, so windows
    // measured in characters can slice the source directly.
    let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    boundaries.push(text.len());
    let total = boundaries.len() - 1;

    let stride = options.chunk_size - options.overlap;
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + options.chunk_size).min(total);
        chunks.push(Chunk {
            text: text[boundaries[start]..boundaries[end]].to_string(),
            start,
            position: chunks.len(),
        });

        if end == total {
            break;
        }
        start += stride;
    }

    debug!("Chunked {} chars into {} chunks", total, chunks.len());
    Ok(chunks)
}
