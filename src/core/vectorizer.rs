//! Unigram/bigram TF-IDF vectorizer with smoothed idf and L2-normalised rows.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::CoreError;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// Sparse row: (feature index, value), sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub max_features: usize,
    pub ngram_range: (usize, usize),
    pub min_df: usize,
    /// Proportion of documents above which a term is dropped.
    pub max_df: f64,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: 1000,
            ngram_range: (1, 2),
            min_df: 1,
            max_df: 0.95,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learns vocabulary and idf from `documents`, returning the fitted
    /// vectorizer and the transformed training rows.
    pub fn fit_transform(
        config: VectorizerConfig,
        documents: &[String],
    ) -> Result<(Self, Vec<SparseVector>), CoreError> {
        let analyzed: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| analyze(doc, config.ngram_range))
            .collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        let mut corpus_frequency: HashMap<&str, usize> = HashMap::new();
        for terms in &analyzed {
            let mut seen: Vec<&str> = Vec::with_capacity(terms.len());
            for term in terms {
                *corpus_frequency.entry(term.as_str()).or_insert(0) += 1;
                if !seen.contains(&term.as_str()) {
                    seen.push(term.as_str());
                    *document_frequency.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }

        let max_doc_count = config.max_df * documents.len() as f64;
        let mut kept: Vec<&str> = document_frequency
            .iter()
            .filter(|(_, &df)| df >= config.min_df && (df as f64) <= max_doc_count)
            .map(|(term, _)| *term)
            .collect();

        if kept.is_empty() {
            return Err(CoreError::EmptyVocabulary);
        }

        if kept.len() > config.max_features {
            // Most frequent terms across the corpus win; ties go alphabetically.
            kept.sort_by(|a, b| corpus_frequency[b].cmp(&corpus_frequency[a]).then(a.cmp(b)));
            kept.truncate(config.max_features);
            kept.sort_unstable();
        }

        let n_docs = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(kept.len());
        for (index, term) in kept.iter().enumerate() {
            let df = document_frequency[term] as f64;
            vocabulary.insert((*term).to_string(), index);
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
        }

        let vectorizer = Self {
            config,
            vocabulary,
            idf,
        };
        let rows = analyzed
            .iter()
            .map(|terms| vectorizer.weigh(terms))
            .collect();

        Ok((vectorizer, rows))
    }

    pub fn transform(&self, document: &str) -> SparseVector {
        self.weigh(&analyze(document, self.config.ngram_range))
    }

    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// Rejects payloads whose vocabulary and idf table disagree.
    pub fn is_consistent(&self) -> bool {
        self.vocabulary.len() == self.idf.len()
            && self.vocabulary.values().all(|&index| index < self.idf.len())
            && self.idf.iter().all(|value| value.is_finite())
    }

    fn weigh(&self, terms: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in terms {
            if let Some(&index) = self.vocabulary.get(term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut row: SparseVector = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();

        let norm = row.iter().map(|(_, value)| value * value).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, value) in &mut row {
                *value /= norm;
            }
        }

        row
    }
}

fn analyze(document: &str, (min_n, max_n): (usize, usize)) -> Vec<String> {
    let lowered = document.to_lowercase();
    let tokens: Vec<&str> = TOKEN_RE.find_iter(&lowered).map(|m| m.as_str()).collect();

    let mut terms = Vec::new();
    for n in min_n.max(1)..=max_n {
        if n > tokens.len() {
            break;
        }
        terms.extend(tokens.windows(n).map(|window| window.join(" ")));
    }
    terms
}
