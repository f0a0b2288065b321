pub mod catalog;
pub mod history;
pub mod recommendation;
pub mod similarity;

pub use catalog::{Catalog, CatalogEntry};
pub use history::HistoryEntry;
pub use recommendation::{Recommendation, RecommendationResult};
pub use similarity::{MatrixError, SimilarityMatrix};
