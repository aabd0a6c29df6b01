//! Vector index module
//!
//! This module manages the persistent store for embedded chunks: a local
//! libsql database with a vector index over the embedding column. Chunks
//! are grouped into named collections so one database can hold material
//! for several sites.

mod database;
pub mod error;
mod schema;

pub use database::Database;
pub use error::DbError;

/// A named group of indexed chunks
#[derive(Debug, Clone)]
pub struct Collection {
    /// ID of the collection
    pub id: i64,

    /// Name of the collection
    pub name: String,

    /// Embedding dimensionality the collection was created with
    pub dimensions: i64,

    /// Creation time as a unix timestamp
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_struct() {
        let collection = Collection {
            id: 1,
            name: "prospectus".to_string(),
            dimensions: 768,
            created_at: 1718000000,
        };

        assert_eq!(collection.id, 1);
        assert_eq!(collection.name, "prospectus");
        assert_eq!(collection.dimensions, 768);
        assert_eq!(collection.created_at, 1718000000);
    }
}
