pub mod pgvector;

pub use pgvector::PgVectorStore;
