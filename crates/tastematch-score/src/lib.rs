//! tastematch-score
//!
//! Dense user×restaurant cosine similarity and per-user ranking.

pub mod similarity;
pub mod topk;

pub use similarity::{SimilarityEngine, SimilarityMatrix};
pub use topk::TopKSelector;
