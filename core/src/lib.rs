pub mod analyzer;
pub mod error;
pub mod index;
pub mod ingest;
pub mod persist;
pub mod query;

pub use error::{IndexError, Result};
pub use index::{DocId, Document, IndexStats, InvertedIndex};
pub use ingest::{IngestConfig, IngestPipeline, IngestReport};
pub use query::intersection;
