//! Okapi BM25 scoring.
//!
//! Tokens are the whitespace-separated words of the lower-cased text. There
//! is no stemming and no stop-word list.

use std::cmp::Reverse;
use std::collections::HashMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f64,

    /// Length normalization, 0 (none) to 1 (full).
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

/// A scored document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Position of the document in the corpus.
    pub index: usize,
    pub score: f64,
}

/// Precomputed term statistics over an ordered corpus.
#[derive(Debug, Clone)]
pub struct Bm25Index {
    params: Bm25Params,
    term_freqs: Vec<HashMap<String, usize>>,
    doc_lengths: Vec<usize>,
    avg_doc_length: f64,
    doc_freqs: HashMap<String, usize>,
    idf: HashMap<String, f64>,
}

impl Bm25Index {
    /// Index `documents` with the default parameters.
    pub fn new<S: AsRef<str>>(documents: &[S]) -> Self {
        Self::with_params(documents, Bm25Params::default())
    }

    pub fn with_params<S: AsRef<str>>(documents: &[S], params: Bm25Params) -> Self {
        let mut term_freqs = Vec::with_capacity(documents.len());
        let mut doc_lengths = Vec::with_capacity(documents.len());
        let mut doc_freqs: HashMap<String, usize> = HashMap::new();

        for document in documents {
            let tokens = tokenize(document.as_ref());
            doc_lengths.push(tokens.len());

            let mut counts: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *counts.entry(token).or_default() += 1;
            }
            for term in counts.keys() {
                *doc_freqs.entry(term.clone()).or_default() += 1;
            }
            term_freqs.push(counts);
        }

        let n = documents.len() as f64;
        let avg_doc_length = if documents.is_empty() {
            0.0
        } else {
            doc_lengths.iter().sum::<usize>() as f64 / n
        };

        let idf = doc_freqs
            .iter()
            .map(|(term, df)| {
                let df = *df as f64;
                (term.clone(), ((n - df + 0.5) / (df + 0.5) + 1.0).ln())
            })
            .collect();

        debug!(
            "Built BM25 index over {} documents ({} terms)",
            documents.len(),
            doc_freqs.len()
        );

        Self {
            params,
            term_freqs,
            doc_lengths,
            avg_doc_length,
            doc_freqs,
            idf,
        }
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.doc_lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_lengths.is_empty()
    }

    /// Inverse document frequency of `term`, if it occurs in the corpus.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(&term.to_lowercase()).copied()
    }

    /// Number of documents containing `term`.
    pub fn doc_frequency(&self, term: &str) -> usize {
        self.doc_freqs
            .get(&term.to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    /// Score one document. Out-of-range positions score zero.
    pub fn score(&self, query: &str, index: usize) -> f64 {
        let (Some(freqs), Some(length)) = (self.term_freqs.get(index), self.doc_lengths.get(index))
        else {
            return 0.0;
        };
        // Only a corpus of empty documents has no average length.
        if self.avg_doc_length == 0.0 {
            return 0.0;
        }
        let Bm25Params { k1, b } = self.params;
        let norm = k1 * (1.0 - b + b * (*length as f64) / self.avg_doc_length);

        tokenize(query)
            .iter()
            .filter_map(|term| {
                let idf = self.idf.get(term)?;
                let tf = freqs.get(term).copied().unwrap_or(0) as f64;
                let denominator = tf + norm;
                (denominator != 0.0).then(|| idf * tf * (k1 + 1.0) / denominator)
            })
            .sum()
    }

    /// The `top_k` best-scoring documents with a positive score, best first.
    /// Equal scores keep corpus order.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = (0..self.len())
            .map(|index| SearchHit {
                index,
                score: self.score(query, index),
            })
            .filter(|hit| hit.score > 0.0)
            .collect();

        hits.sort_by_key(|hit| Reverse(OrderedFloat(hit.score)));
        hits.truncate(top_k);
        hits
    }
}

/// Split lower-cased `text` on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
