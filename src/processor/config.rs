//! Chunking options for the processor

use crate::processor::error::ProcessError;

/// Options controlling how document text is split into chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkOptions {
    /// Maximum chunk length in characters
    pub chunk_size: usize,

    /// Number of characters shared between consecutive chunks
    pub overlap: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

impl ChunkOptions {
    /// Create options with the given size and overlap
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Check that the options describe a terminating chunker.
    ///
    /// The overlap must be strictly smaller than the chunk size so each
    /// window advances, and the chunk size must be non-zero.
    pub fn validate(&self) -> Result<(), ProcessError> {
        if self.chunk_size == 0 {
            return Err(ProcessError::InvalidOptions(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(ProcessError::InvalidOptions(format!(
                "overlap ({}) must be smaller than chunk size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ChunkOptions::default();
        assert_eq!(options.chunk_size, 1000);
        assert_eq!(options.overlap, 200);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_size() {
        let options = ChunkOptions::new(0, 0);
        assert!(matches!(
            options.validate(),
            Err(ProcessError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_validate_rejects_overlap_at_least_size() {
        assert!(ChunkOptions::new(100, 100).validate().is_err());
        assert!(ChunkOptions::new(100, 150).validate().is_err());
        assert!(ChunkOptions::new(100, 99).validate().is_ok());
    }
}
