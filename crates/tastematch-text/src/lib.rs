pub mod tokenize;
pub mod vectorize;

pub use tokenize::Tokenizer;
pub use vectorize::{FeatureSpace, SparseVector, TfidfVectorizer, VectorSet};
