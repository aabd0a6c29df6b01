//! # Prospectus - University Website RAG Pipeline
//!
//! This crate turns a university website into a question-answering knowledge
//! base. It crawls a seed page for links, scrapes the linked pages into
//! portable document files, ingests those documents into a persistent vector
//! index, and answers ad hoc questions over the index with a hosted language
//! model (Retrieval-Augmented Generation).
//!
//! ## Pipeline stages
//!
//! - [`crawler`] - fetch a seed page, extract and filter its links
//! - [`scrape`] - render each URL and write its visible text as a document
//! - [`loader`] - read documents from a folder by format (PDF, DOCX)
//! - [`processor`] - split documents into overlapping chunks and embed them
//! - [`index`] - persist chunks and embeddings in a LibSQL vector index
//! - [`search`] - retrieve the nearest chunks and compose an answer
//! - [`pipeline`] - run the ingestion stages end to end from one config
//!
//! ## Example
//!
//! ```rust,no_run
//! use prospectus::model::Client;
//! use prospectus::pipeline::{run_ingest, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new_gemini_from_env();
//!
//!     let config = PipelineConfig::builder("https://example.edu/dept/cse", "example.edu")
//!         .collection("cse")
//!         .build();
//!
//!     let report = run_ingest(&client, &config).await?;
//!     println!(
//!         "indexed {} chunks from {} documents",
//!         report.chunks_indexed, report.documents_loaded
//!     );
//!     Ok(())
//! }
//! ```

mod error;

pub mod crawler;
pub mod index;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod processor;
pub mod scrape;
pub mod search;

pub use error::{Error, ErrorPolicy};

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::ErrorPolicy;
    pub use crate::error::Result;
}
