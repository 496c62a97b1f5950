// Database module
// Postgres with the pgvector extension stores chunk rows and their embeddings

pub mod postgres;

pub use postgres::*;
