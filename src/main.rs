//! # Prospectus CLI
//!
//! Command-line interface for the university-website RAG pipeline. Each
//! pipeline stage is a subcommand so runs can be resumed stage by stage:
//!
//! - `links`: collect links from a seed page into a JSON file
//! - `scrape`: turn URLs into DOCX documents
//! - `ingest`: load, chunk, embed, and index a document folder
//! - `search`: vector retrieval over the index
//! - `ask`: retrieval plus a grounded answer
//! - `list`: show the collections in the index
//! - `run`: the whole pipeline end to end

mod telemetry;

use std::io::Write as _;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::instrument;

use prospectus::ErrorPolicy;
use prospectus::crawler::{self, CrawlerConfig};
use prospectus::index::Database;
use prospectus::loader;
use prospectus::model::Client;
use prospectus::pipeline::{self, PipelineConfig};
use prospectus::processor::{self, ChunkOptions};
use prospectus::scrape::{self, ScrapeConfig, ScrapeReport};
use prospectus::search::{self, SearchOptions};

#[derive(Parser)]
#[command(author, version, about = "Turn a university website into a question-answering knowledge base", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Collect the links of a seed page into a JSON file
    Links(LinksArgs),

    /// Scrape URLs into DOCX documents
    Scrape(ScrapeArgs),

    /// Load, chunk, embed, and index a document folder
    Ingest(IngestArgs),

    /// Search the index by vector similarity
    Search(SearchArgs),

    /// Ask a question and get an answer grounded in the index
    Ask(AskArgs),

    /// List the collections in the index
    List(ListArgs),

    /// Run the full pipeline from seed page to index
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct LinksArgs {
    /// Seed page to collect links from
    #[arg(required = true)]
    url: String,

    /// Substring a link must contain to be kept
    #[arg(short, long, required = true)]
    domain: String,

    /// Where to write the JSON link file
    #[arg(short, long, default_value = "links.json")]
    output: PathBuf,

    /// Fail the command on the first error instead of continuing
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    /// URLs to scrape
    urls: Vec<String>,

    /// Read URLs from a JSON link file instead
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory the documents are written into
    #[arg(short, long, default_value = "documents")]
    output_dir: PathBuf,

    /// Keywords whose lines are dropped from the text (comma-separated)
    #[arg(short, long, default_value = "advertisement")]
    blocklist: String,

    /// Ignore robots.txt when rendering pages
    #[arg(long)]
    no_robots: bool,

    /// Fail the command on the first error instead of continuing
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct IngestArgs {
    /// Folder of documents to ingest
    #[arg(short, long, default_value = "documents")]
    documents: PathBuf,

    /// Directory holding the index database
    #[arg(long, default_value = "index")]
    index: PathBuf,

    /// Collection to index into
    #[arg(short, long, default_value = "prospectus")]
    collection: String,

    /// Chunk size in characters
    #[arg(long, default_value = "1000")]
    chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    #[arg(long, default_value = "200")]
    overlap: usize,

    /// Embedding dimensionality of the index
    #[arg(long, default_value = "768")]
    dimensions: usize,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Search query
    #[arg(required = true)]
    query: String,

    /// Restrict the search to one collection
    #[arg(short, long)]
    collection: Option<String>,

    /// Maximum number of results
    #[arg(short, long, default_value = "4")]
    limit: usize,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Directory holding the index database
    #[arg(long, default_value = "index")]
    index: PathBuf,

    /// Embedding dimensionality of the index
    #[arg(long, default_value = "768")]
    dimensions: usize,
}

#[derive(Args, Debug)]
struct AskArgs {
    /// Question to answer from the index
    #[arg(required = true)]
    question: String,

    /// Restrict retrieval to one collection
    #[arg(short, long)]
    collection: Option<String>,

    /// Number of chunks to retrieve as context
    #[arg(short, long, default_value = "4")]
    limit: usize,

    /// Directory holding the index database
    #[arg(long, default_value = "index")]
    index: PathBuf,

    /// Embedding dimensionality of the index
    #[arg(long, default_value = "768")]
    dimensions: usize,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Show chunk counts per collection
    #[arg(short, long)]
    details: bool,

    /// Directory holding the index database
    #[arg(long, default_value = "index")]
    index: PathBuf,

    /// Embedding dimensionality of the index
    #[arg(long, default_value = "768")]
    dimensions: usize,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Seed page to collect links from
    #[arg(required = true)]
    url: String,

    /// Substring a link must contain to be kept
    #[arg(short, long, required = true)]
    domain: String,

    /// Directory documents are written to and loaded from
    #[arg(long, default_value = "documents")]
    documents: PathBuf,

    /// Directory holding the index database
    #[arg(long, default_value = "index")]
    index: PathBuf,

    /// Collection to index into
    #[arg(short, long, default_value = "prospectus")]
    collection: String,

    /// Also save the collected links as JSON at this path
    #[arg(long)]
    links: Option<PathBuf>,

    /// Chunk size in characters
    #[arg(long, default_value = "1000")]
    chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    #[arg(long, default_value = "200")]
    overlap: usize,

    /// Embedding dimensionality of the index
    #[arg(long, default_value = "768")]
    dimensions: usize,

    /// Fail the run on the first error instead of continuing
    #[arg(long)]
    strict: bool,
}

fn policy(strict: bool) -> ErrorPolicy {
    if strict {
        ErrorPolicy::Abort
    } else {
        ErrorPolicy::Continue
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing_subscriber();

    match cli.command {
        Some(Commands::Links(args)) => links_command(args).await?,
        Some(Commands::Scrape(args)) => scrape_command(args).await?,
        Some(Commands::Ingest(args)) => ingest_command(args).await?,
        Some(Commands::Search(args)) => search_command(args).await?,
        Some(Commands::Ask(args)) => ask_command(args).await?,
        Some(Commands::List(args)) => list_command(args).await?,
        Some(Commands::Run(args)) => run_command(args).await?,
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

#[instrument]
async fn links_command(args: LinksArgs) -> anyhow::Result<()> {
    println!("Collecting links from {}...", args.url);

    let config = CrawlerConfig::builder(&args.url, &args.domain)
        .error_policy(policy(args.strict))
        .build();

    let links = crawler::fetch_links(&config).await?;
    crawler::write_link_file(&links, &args.output).await?;

    println!("Saved {} links to {}", links.len(), args.output.display());
    Ok(())
}

#[instrument]
async fn scrape_command(args: ScrapeArgs) -> anyhow::Result<()> {
    let urls = if let Some(input) = &args.input {
        let content = tokio::fs::read_to_string(input).await?;
        serde_json::from_str::<Vec<String>>(&content)?
    } else {
        args.urls.clone()
    };

    if urls.is_empty() {
        anyhow::bail!("no URLs given; pass them as arguments or with --input");
    }

    println!("Scraping {} URLs into {}...", urls.len(), args.output_dir.display());

    let config = ScrapeConfig::builder()
        .output_dir(&args.output_dir)
        .blocklist(
            args.blocklist
                .split(',')
                .filter(|word| !word.is_empty())
                .map(String::from)
                .collect(),
        )
        .respect_robots_txt(!args.no_robots)
        .error_policy(policy(args.strict))
        .build();

    let report = scrape::scrape_urls(&urls, &config).await?;
    print_scrape_summary(&report);
    Ok(())
}

fn print_scrape_summary(report: &ScrapeReport) {
    println!("{}", "-".repeat(50));
    for outcome in &report.outcomes {
        match (&outcome.path, &outcome.error) {
            (Some(path), _) => println!("\u{2713} {} -> {}", outcome.url, path.display()),
            (None, Some(error)) => println!("\u{2717} {}: {}", outcome.url, error),
            (None, None) => {}
        }
    }
    println!("{}", "-".repeat(50));
    println!(
        "Scraped {} pages, {} failed",
        report.succeeded(),
        report.failed()
    );
}

#[instrument]
async fn ingest_command(args: IngestArgs) -> anyhow::Result<()> {
    let client = Client::new_gemini_from_env();

    let db = Database::open(&args.index, args.dimensions).await?;
    let collection = db.get_or_create_collection(&args.collection).await?;

    println!("Loading documents from {}...", args.documents.display());
    let documents = loader::load_folder(&args.documents).await?;
    println!("Loaded {} documents", documents.len());

    let options = ChunkOptions::new(args.chunk_size, args.overlap);

    let progress_bar = ProgressBar::new(documents.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")?
            .progress_chars("##-"),
    );

    let mut total_chunks = 0;
    for document in documents {
        let source = document.source.clone();
        progress_bar.set_message(format!("Embedding {}", source.display()));

        let chunks = processor::process_documents(&client, vec![document], &options).await?;
        total_chunks += db.add_chunks(&collection, &chunks).await?;
        progress_bar.inc(1);
    }
    progress_bar.finish_with_message("Ingestion completed");

    println!(
        "Indexed {} chunks into collection {}",
        total_chunks, collection.name
    );
    Ok(())
}

#[instrument]
async fn search_command(args: SearchArgs) -> anyhow::Result<()> {
    let client = Client::new_gemini_free_from_env();
    let db = Database::open(&args.index, args.dimensions).await?;

    println!("Searching for: {}", args.query);

    let options = SearchOptions {
        limit: args.limit,
        collection: args.collection,
    };

    let results = search::search_index(&db, &client, &args.query, &options).await?;

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        _ => {
            println!("Found {} results", results.len());
            for result in &results {
                println!("{}. {}", result.rank, result.text);
                match result.page {
                    Some(page) => println!("   Source: {} (page {})", result.source, page),
                    None => println!("   Source: {}", result.source),
                }
                println!("   Score: {:.4}", result.score);
                println!();
            }
        }
    }

    Ok(())
}

#[instrument]
async fn ask_command(args: AskArgs) -> anyhow::Result<()> {
    let client = Client::new_gemini_free_from_env();
    let db = Database::open(&args.index, args.dimensions).await?;

    let options = SearchOptions {
        limit: args.limit,
        collection: args.collection,
    };

    let results = search::search_index(&db, &client, &args.question, &options).await?;
    let answer = search::generate_answer(&client, &args.question, &results).await?;

    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(stdout, "Q: ")?;
    stdout.reset()?;
    writeln!(stdout, "{}", args.question)?;

    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    write!(stdout, "A: ")?;
    stdout.reset()?;
    writeln!(stdout, "{}", answer)?;

    if !results.is_empty() {
        writeln!(stdout, "\nSources:")?;
        for result in &results {
            match result.page {
                Some(page) => writeln!(stdout, "{}. {} (page {})", result.rank, result.source, page)?,
                None => writeln!(stdout, "{}. {}", result.rank, result.source)?,
            }
        }
    }

    Ok(())
}

#[instrument]
async fn list_command(args: ListArgs) -> anyhow::Result<()> {
    let db = Database::open(&args.index, args.dimensions).await?;
    let collections = db.list_collections().await?;

    println!("Collections: {}", collections.len());

    let format_timestamp = |ts: i64| -> String {
        use chrono::{DateTime, TimeZone, Utc};
        let dt: DateTime<Utc> = Utc.timestamp_opt(ts, 0).single().unwrap_or_default();
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    };

    for collection in collections {
        if args.details {
            let chunks = db.count_chunks(&collection).await?;
            println!(
                "{} - {} chunks, {} dimensions (created {})",
                collection.name,
                chunks,
                collection.dimensions,
                format_timestamp(collection.created_at)
            );
        } else {
            println!("{}", collection.name);
        }
    }

    Ok(())
}

#[instrument]
async fn run_command(args: RunArgs) -> anyhow::Result<()> {
    let client = Client::new_gemini_from_env();

    let mut builder = PipelineConfig::builder(&args.url, &args.domain)
        .document_dir(&args.documents)
        .index_dir(&args.index)
        .collection(&args.collection)
        .chunk_options(ChunkOptions::new(args.chunk_size, args.overlap))
        .embedding_dimensions(args.dimensions)
        .error_policy(policy(args.strict));
    if let Some(links) = &args.links {
        builder = builder.link_file(links);
    }
    let config = builder.build();

    println!("Running pipeline for {}...", args.url);
    let report = pipeline::run_ingest(&client, &config).await?;

    println!("Links found:      {}", report.links_found);
    println!("Pages scraped:    {}", report.pages_scraped);
    println!("Scrape failures:  {}", report.scrape_failures);
    println!("Documents loaded: {}", report.documents_loaded);
    println!("Chunks indexed:   {}", report.chunks_indexed);

    Ok(())
}
