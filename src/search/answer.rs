//! Grounded answer generation.
//!
//! Retrieved chunks become the context block of a prompt and the
//! completion model is instructed to answer only from that context,
//! admitting when it cannot.

use rig::agent::AgentBuilder;
use rig::completion::{CompletionModel, Prompt};
use rig::embeddings::EmbeddingModel;
use tracing::instrument;

use crate::model::Client;
use crate::search::error::SearchError;
use crate::search::retrieve::SearchResult;

const ANSWER_PREAMBLE: &str = "You are an assistant answering questions about a university \
using only the provided context. Base your answer strictly on the context. If the context \
does not contain the information needed to answer, reply exactly: I don't know.";

/// Join the retrieved chunk texts into a context block
pub fn prepare_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|result| result.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Generate an answer to a question grounded in the retrieved chunks
#[instrument(skip(client, results))]
pub async fn generate_answer<C, E>(
    client: &Client<C, E>,
    question: &str,
    results: &[SearchResult],
) -> Result<String, SearchError>
where
    C: CompletionModel + Clone,
    E: EmbeddingModel,
{
    let context = prepare_context(results);
    let prompt = format!("Context:\n{}\n\nQuestion: {}", context, question);

    let agent = AgentBuilder::new(client.completion().clone())
        .preamble(ANSWER_PREAMBLE)
        .build();

    agent
        .prompt(prompt)
        .await
        .map_err(|e| SearchError::Llm(format!("Failed to generate answer: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::mock_model::{MockCompletionModel, MockEmbeddingModel};

    fn result(text: &str, rank: usize) -> SearchResult {
        SearchResult {
            chunk_id: rank as i64,
            text: text.to_string(),
            source: "handbook.pdf".to_string(),
            page: Some(1),
            score: 0.9,
            rank,
        }
    }

    #[test]
    fn test_prepare_context_joins_chunks() {
        let results = vec![result("Tuition is 500.", 1), result("Fees are due June 1.", 2)];
        assert_eq!(
            prepare_context(&results),
            "Tuition is 500.\n\nFees are due June 1."
        );
    }

    #[test]
    fn test_prepare_context_empty_results() {
        assert_eq!(prepare_context(&[]), "");
    }

    #[tokio::test]
    async fn test_generate_answer_uses_completion_model() {
        let completion = MockCompletionModel::new();
        completion.set_text_response("Tuition is 500 per term.").await;
        let client = Client::from_models(completion, MockEmbeddingModel::new(4));

        let results = vec![result("Tuition is 500 per term.", 1)];
        let answer = generate_answer(&client, "How much is tuition?", &results)
            .await
            .unwrap();

        assert_eq!(answer, "Tuition is 500 per term.");
    }
}
