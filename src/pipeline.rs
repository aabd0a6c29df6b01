//! End-to-end ingestion pipeline.
//!
//! Wires the stages together: crawl the seed page for links, scrape the
//! linked pages into documents, load and chunk the documents, embed the
//! chunks, and store them in the vector index. Each stage reports through
//! the crate error type so a failed run says which stage gave up.

use std::path::PathBuf;

use rig::{completion::CompletionModel, embeddings::EmbeddingModel};
use tracing::{info, instrument};

use crate::crawler::{self, CrawlerConfig};
use crate::error::{ErrorPolicy, Result};
use crate::index::Database;
use crate::loader;
use crate::model::Client;
use crate::processor::{self, ChunkOptions};
use crate::scrape::{self, ScrapeConfig};

/// Configuration for an ingestion run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Page whose links seed the run
    pub seed_url: String,

    /// Substring a link must contain to be kept
    pub domain_filter: String,

    /// Directory scraped documents are written to and loaded from
    pub document_dir: PathBuf,

    /// Where to save the collected links as JSON, when set
    pub link_file: Option<PathBuf>,

    /// Chunking options for the processor
    pub chunk_options: ChunkOptions,

    /// Collection the chunks are indexed into
    pub collection: String,

    /// Directory holding the index database
    pub index_dir: PathBuf,

    /// Embedding dimensionality of the index
    pub embedding_dimensions: usize,

    /// What to do when a single page fails
    pub error_policy: ErrorPolicy,
}

/// Builder for [`PipelineConfig`]
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Create a builder with the required seed URL and domain filter
    pub fn new(seed_url: impl Into<String>, domain_filter: impl Into<String>) -> Self {
        Self {
            config: PipelineConfig {
                seed_url: seed_url.into(),
                domain_filter: domain_filter.into(),
                document_dir: PathBuf::from("documents"),
                link_file: None,
                chunk_options: ChunkOptions::default(),
                collection: "prospectus".to_string(),
                index_dir: PathBuf::from("index"),
                embedding_dimensions: 768,
                error_policy: ErrorPolicy::Continue,
            },
        }
    }

    /// Set the directory documents are written to and loaded from
    pub fn document_dir(mut self, document_dir: impl Into<PathBuf>) -> Self {
        self.config.document_dir = document_dir.into();
        self
    }

    /// Save the collected links as JSON at the given path
    pub fn link_file(mut self, link_file: impl Into<PathBuf>) -> Self {
        self.config.link_file = Some(link_file.into());
        self
    }

    /// Set the chunking options
    pub fn chunk_options(mut self, chunk_options: ChunkOptions) -> Self {
        self.config.chunk_options = chunk_options;
        self
    }

    /// Set the collection name
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.config.collection = collection.into();
        self
    }

    /// Set the index directory
    pub fn index_dir(mut self, index_dir: impl Into<PathBuf>) -> Self {
        self.config.index_dir = index_dir.into();
        self
    }

    /// Set the embedding dimensionality
    pub fn embedding_dimensions(mut self, embedding_dimensions: usize) -> Self {
        self.config.embedding_dimensions = embedding_dimensions;
        self
    }

    /// Set the per-page failure policy
    pub fn error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.config.error_policy = error_policy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

impl PipelineConfig {
    /// Create a builder with the required seed URL and domain filter
    pub fn builder(
        seed_url: impl Into<String>,
        domain_filter: impl Into<String>,
    ) -> PipelineConfigBuilder {
        PipelineConfigBuilder::new(seed_url, domain_filter)
    }
}

/// Counts from a completed ingestion run
#[derive(Debug, Default, Clone)]
pub struct IngestReport {
    /// Links collected from the seed page
    pub links_found: usize,

    /// Pages scraped into documents
    pub pages_scraped: usize,

    /// Pages that failed to scrape
    pub scrape_failures: usize,

    /// Documents loaded from the document directory
    pub documents_loaded: usize,

    /// Chunks embedded and stored in the index
    pub chunks_indexed: usize,
}

/// Run the full ingestion pipeline
#[instrument(skip(client, config), fields(seed_url = %config.seed_url))]
pub async fn run_ingest<C, E>(
    client: &Client<C, E>,
    config: &PipelineConfig,
) -> Result<IngestReport>
where
    C: CompletionModel + Clone + Send + Sync + 'static,
    E: EmbeddingModel + Clone + Send + Sync + 'static,
{
    let mut report = IngestReport::default();

    let crawler_config = CrawlerConfig::builder(&config.seed_url, &config.domain_filter)
        .error_policy(config.error_policy)
        .build();
    let links = crawler::fetch_links(&crawler_config).await?;
    report.links_found = links.len();
    info!("Collected {} links from {}", links.len(), config.seed_url);

    if let Some(link_file) = &config.link_file {
        crawler::write_link_file(&links, link_file).await?;
    }

    let scrape_config = ScrapeConfig::builder()
        .output_dir(&config.document_dir)
        .error_policy(config.error_policy)
        .build();
    let scrape_report = scrape::scrape_urls(&links, &scrape_config).await?;
    report.pages_scraped = scrape_report.succeeded();
    report.scrape_failures = scrape_report.failed();

    let documents = loader::load_folder(&config.document_dir).await?;
    report.documents_loaded = documents.len();
    info!("Loaded {} documents", documents.len());

    let chunks = processor::process_documents(client, documents, &config.chunk_options).await?;

    let db = Database::open(&config.index_dir, config.embedding_dimensions).await?;
    let collection = db.get_or_create_collection(&config.collection).await?;
    report.chunks_indexed = db.add_chunks(&collection, &chunks).await?;
    info!(
        "Indexed {} chunks into {}",
        report.chunks_indexed, collection.name
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = PipelineConfig::builder("https://example.edu", "example.edu").build();

        assert_eq!(config.seed_url, "https://example.edu");
        assert_eq!(config.domain_filter, "example.edu");
        assert_eq!(config.document_dir, PathBuf::from("documents"));
        assert!(config.link_file.is_none());
        assert_eq!(config.collection, "prospectus");
        assert_eq!(config.embedding_dimensions, 768);
        assert_eq!(config.error_policy, ErrorPolicy::Continue);
    }

    #[test]
    fn test_builder_overrides() {
        let config = PipelineConfig::builder("https://example.edu", "example.edu")
            .document_dir("/tmp/docs")
            .link_file("/tmp/links.json")
            .chunk_options(ChunkOptions::new(500, 50))
            .collection("cse")
            .index_dir("/tmp/index")
            .embedding_dimensions(384)
            .error_policy(ErrorPolicy::Abort)
            .build();

        assert_eq!(config.document_dir, PathBuf::from("/tmp/docs"));
        assert_eq!(config.link_file, Some(PathBuf::from("/tmp/links.json")));
        assert_eq!(config.chunk_options, ChunkOptions::new(500, 50));
        assert_eq!(config.collection, "cse");
        assert_eq!(config.index_dir, PathBuf::from("/tmp/index"));
        assert_eq!(config.embedding_dimensions, 384);
        assert_eq!(config.error_policy, ErrorPolicy::Abort);
    }
}
