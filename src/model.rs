//! LLM client module.
//!
//! Wraps a completion model and an embedding model behind one [`Client`] so
//! the rest of the pipeline stays generic over providers. The Gemini
//! constructors apply per-minute rate limits sized to the standard and free
//! API tiers; [`Client::from_models`] accepts any pair of models, which is
//! how tests plug in mocks.

use std::num::NonZeroU32;

use governor::{Quota, RateLimiter};
use rig::{completion::CompletionModel, embeddings::EmbeddingModel, providers::gemini};

pub mod embedding;
pub mod mock_model;
pub mod ratelimited;

pub use embedding::EmbeddingConversion;
pub use ratelimited::{RateLimitedCompletionModel, RateLimitedEmbeddingModel};

/// A paired completion and embedding client
#[derive(Debug, Clone)]
pub struct Client<C, E>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    completion_model: C,
    embedding_model: E,
}

/// Raw response wrapper carried through the rate-limited completion model
pub struct RateLimitResponse<T> {
    #[allow(dead_code)]
    response: T,
}

impl
    Client<
        RateLimitedCompletionModel<gemini::completion::CompletionModel>,
        RateLimitedEmbeddingModel<gemini::embedding::EmbeddingModel>,
    >
{
    /// Create a standard-tier Gemini client from the `GEMINI_API_KEY`
    /// environment variable.
    pub fn new_gemini_from_env() -> Self {
        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .expect("GEMINI_API_KEY environment variable must be set");
        let gemini_client = gemini::Client::new(&gemini_api_key);
        Self::new_gemini(gemini_client)
    }

    /// Create a free-tier Gemini client from the `GEMINI_FREE_API_KEY`
    /// environment variable.
    pub fn new_gemini_free_from_env() -> Self {
        let gemini_api_key = std::env::var("GEMINI_FREE_API_KEY")
            .expect("GEMINI_FREE_API_KEY environment variable must be set");
        let gemini_client = gemini::Client::new(&gemini_api_key);
        Self::new_gemini_free(gemini_client)
    }

    /// Create a standard-tier Gemini client with rate limits for the paid
    /// quota.
    pub fn new_gemini(gemini_client: gemini::Client) -> Self {
        let completion_limiter = RateLimiter::direct(Quota::per_minute(
            NonZeroU32::new(2000).expect("must create rate limit"),
        ));
        let embedding_limiter = RateLimiter::direct(Quota::per_minute(
            NonZeroU32::new(1000).expect("must create rate limit"),
        ));
        let completion_model = RateLimitedCompletionModel::new(
            gemini_client.completion_model("gemini-2.0-flash"),
            completion_limiter,
        );
        let embedding_model = RateLimitedEmbeddingModel::new(
            gemini_client.embedding_model(gemini::embedding::EMBEDDING_004),
            embedding_limiter,
        );
        Self {
            completion_model,
            embedding_model,
        }
    }

    /// Create a free-tier Gemini client with rate limits for the free quota.
    pub fn new_gemini_free(gemini_client: gemini::Client) -> Self {
        let completion_limiter = RateLimiter::direct(Quota::per_minute(
            NonZeroU32::new(30).expect("must create rate limit"),
        ));
        let embedding_limiter = RateLimiter::direct(Quota::per_minute(
            NonZeroU32::new(1000).expect("must create rate limit"),
        ));
        let completion_model = RateLimitedCompletionModel::new(
            gemini_client.completion_model("gemini-2.0-flash-lite"),
            completion_limiter,
        );
        let embedding_model = RateLimitedEmbeddingModel::new(
            gemini_client.embedding_model(gemini::embedding::EMBEDDING_004),
            embedding_limiter,
        );
        Self {
            completion_model,
            embedding_model,
        }
    }
}

impl<C, E> Client<C, E>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    /// Pair arbitrary completion and embedding models
    pub fn from_models(completion_model: C, embedding_model: E) -> Self {
        Self {
            completion_model,
            embedding_model,
        }
    }

    /// The completion model
    pub fn completion(&self) -> &C {
        &self.completion_model
    }

    /// The embedding model
    pub fn embedding(&self) -> &E {
        &self.embedding_model
    }
}
