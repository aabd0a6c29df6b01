//! Mock models for testing.
//!
//! `MockCompletionModel` returns a predefined response and
//! `MockEmbeddingModel` produces deterministic vectors from the input text,
//! so pipeline behavior can be tested without API calls.

use rig::{
    completion::{
        AssistantContent, CompletionError, CompletionModel, CompletionRequest, CompletionResponse,
    },
    embeddings::{Embedding, EmbeddingError, EmbeddingModel},
    one_or_many::OneOrMany,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A completion model that returns a predefined response
#[derive(Debug, Clone)]
pub struct MockCompletionModel {
    response: Arc<Mutex<Option<OneOrMany<AssistantContent>>>>,
}

impl MockCompletionModel {
    /// Create a mock that returns an empty text response until one is set
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(None)),
        }
    }

    /// Set the response the mock should return
    pub async fn set_response(&self, response: OneOrMany<AssistantContent>) {
        let mut guard = self.response.lock().await;
        *guard = Some(response);
    }

    /// Set a simple text response
    pub async fn set_text_response(&self, text: &str) {
        let response = OneOrMany::one(AssistantContent::text(text));
        self.set_response(response).await;
    }
}

impl Default for MockCompletionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionModel for MockCompletionModel {
    type Response = String;

    async fn completion(
        &self,
        _completion_request: CompletionRequest,
    ) -> Result<CompletionResponse<Self::Response>, CompletionError> {
        let response = {
            let guard = self.response.lock().await;
            guard.clone()
        };
        match response {
            Some(result) => Ok(CompletionResponse {
                choice: result,
                raw_response: "".to_string(),
            }),
            None => Ok(CompletionResponse {
                choice: OneOrMany::one(AssistantContent::text("")),
                raw_response: "".to_string(),
            }),
        }
    }
}

/// An embedding model that derives each vector from the bytes of its input
///
/// The same text always embeds to the same vector, and different texts
/// usually differ, which is enough for retrieval tests.
#[derive(Debug, Clone)]
pub struct MockEmbeddingModel {
    dimensions: usize,
}

impl MockEmbeddingModel {
    /// Create a mock producing vectors of the given dimensionality
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_one(&self, text: &str) -> Embedding {
        let mut vec = vec![0.0f64; self.dimensions];
        for (i, byte) in text.bytes().enumerate() {
            vec[i % self.dimensions] += byte as f64 / 255.0;
        }
        Embedding {
            document: text.to_string(),
            vec,
        }
    }
}

impl EmbeddingModel for MockEmbeddingModel {
    const MAX_DOCUMENTS: usize = 1024;

    fn ndims(&self) -> usize {
        self.dimensions
    }

    async fn embed_texts(
        &self,
        texts: impl IntoIterator<Item = String> + Send,
    ) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(texts
            .into_iter()
            .map(|text| self.embed_one(&text))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_embedding_is_deterministic() {
        let model = MockEmbeddingModel::new(4);

        let first = model.embed_texts(vec!["tuition".to_string()]).await.unwrap();
        let second = model.embed_texts(vec!["tuition".to_string()]).await.unwrap();

        assert_eq!(first[0].vec, second[0].vec);
        assert_eq!(first[0].vec.len(), 4);
        assert_eq!(model.ndims(), 4);
    }

    #[tokio::test]
    async fn test_mock_completion_returns_set_text() {
        use rig::agent::AgentBuilder;
        use rig::completion::Prompt;

        let model = MockCompletionModel::new();
        model.set_text_response("The deadline is June 1.").await;

        let agent = AgentBuilder::new(model).build();
        let answer = agent.prompt("When is the deadline?").await.unwrap();
        assert_eq!(answer, "The deadline is June 1.");
    }
}
