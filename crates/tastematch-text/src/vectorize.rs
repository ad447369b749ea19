//! TF-IDF feature space shared by users and restaurants.
//!
//! The space is fitted once over the union of both corpora and is read-only
//! afterwards; vectors from the same fit are directly comparable and their
//! dot product is the cosine similarity.

use std::collections::{BTreeMap, BTreeSet};
use std::hash::Hasher;

use tastematch_core::error::{Error, Result};
use tastematch_core::types::{EntityId, EntityProfile};
use twox_hash::XxHash64;

use crate::tokenize::Tokenizer;

/// Fewer distinct terms than this cannot separate any two entities.
pub const MIN_VOCABULARY: usize = 2;

/// L2-normalized term weights keyed by feature index, ascending, no zeros.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Normalize raw weights to unit length. All-zero input gives the zero vector.
    pub fn normalized(weights: BTreeMap<usize, f64>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Self::default();
        }
        let entries = weights.into_iter().filter(|(_, w)| *w != 0.0).map(|(i, w)| (i, w / norm)).collect();
        Self { entries }
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Merge-join over the two sorted index lists.
    pub fn dot(&self, other: &Self) -> f64 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    tokenizer: Tokenizer,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit a feature space over every characteristic text of the run.
    ///
    /// Vocabulary indices follow sorted term order, so the fitted space does
    /// not depend on corpus order. IDF is smoothed:
    /// `ln((1 + n) / (1 + df)) + 1`.
    pub fn fit<S: AsRef<str>>(&self, corpus: &[S]) -> Result<FeatureSpace> {
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for text in corpus {
            let unique: BTreeSet<String> = self.tokenizer.tokenize(text.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }
        if doc_freq.len() < MIN_VOCABULARY {
            return Err(Error::InsufficientVocabulary { terms: doc_freq.len() });
        }

        let n = corpus.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        let mut hasher = XxHash64::with_seed(0);
        for (index, (term, df)) in doc_freq.into_iter().enumerate() {
            let weight = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
            hasher.write(term.as_bytes());
            hasher.write_u8(0xff);
            hasher.write_u64(weight.to_bits());
            idf.push(weight);
            vocabulary.insert(term, index);
        }
        tracing::debug!(documents = corpus.len(), terms = vocabulary.len(), "fitted tf-idf feature space");
        Ok(FeatureSpace { vocabulary, idf, documents: corpus.len(), fingerprint: hasher.finish(), tokenizer: self.tokenizer.clone() })
    }
}

/// An immutable fitted vocabulary with per-term IDF weights.
#[derive(Debug, Clone)]
pub struct FeatureSpace {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    documents: usize,
    fingerprint: u64,
    tokenizer: Tokenizer,
}

impl FeatureSpace {
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    /// Number of texts the space was fitted on.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Hash of the vocabulary and weights; equal for identical fits.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.index_of(term).map(|i| self.idf[i])
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }

    /// Raw term counts times IDF, L2-normalized. Text with no in-vocabulary
    /// term maps to the zero vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
        for token in self.tokenizer.tokenize(text) {
            if let Some(index) = self.index_of(&token) {
                *weights.entry(index).or_insert(0.0) += 1.0;
            }
        }
        for (index, w) in &mut weights {
            *w *= self.idf[*index];
        }
        SparseVector::normalized(weights)
    }

    pub fn project(&self, profiles: &[EntityProfile]) -> VectorSet {
        VectorSet {
            ids: profiles.iter().map(|p| p.entity_id.clone()).collect(),
            vectors: profiles.iter().map(|p| self.transform(&p.characteristic_text)).collect(),
            space: self.fingerprint,
        }
    }
}

/// Entity vectors in profile order, tagged with the space they came from.
#[derive(Debug, Clone)]
pub struct VectorSet {
    ids: Vec<EntityId>,
    vectors: Vec<SparseVector>,
    space: u64,
}

impl VectorSet {
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    pub fn space(&self) -> u64 {
        self.space
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &SparseVector)> {
        self.ids.iter().zip(self.vectors.iter())
    }
}
