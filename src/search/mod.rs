//! Search module
//!
//! This module retrieves indexed chunks by vector similarity and generates
//! answers grounded in what was retrieved.

mod answer;
mod error;
mod retrieve;

pub use answer::{generate_answer, prepare_context};
pub use error::SearchError;
pub use retrieve::{SearchOptions, SearchResult, search_index};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_options_default() {
        let options = SearchOptions::default();

        assert_eq!(options.limit, 4);
        assert!(options.collection.is_none());
    }

    #[test]
    fn test_search_options_with_collection() {
        let options = SearchOptions {
            limit: 10,
            collection: Some("prospectus".to_string()),
        };

        assert_eq!(options.limit, 10);
        assert_eq!(options.collection.as_deref().unwrap(), "prospectus");
    }
}
