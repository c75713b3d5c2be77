//! Evidence store implementations

mod pgvector;

pub use pgvector::{connect_pool, DistanceMetric, PgvectorCollection, PgvectorEvidenceStore};
