//! tastematch-store
//!
//! `RecommendationStore` implementations: a LanceDB table whose replace is a
//! single merge-insert commit, and an in-process map for tests and dry runs.

pub mod lance;
pub mod memory;
pub mod schema;
pub mod table;

pub use lance::LanceRecommendationStore;
pub use memory::MemoryRecommendationStore;
