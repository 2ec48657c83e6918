//! Multinomial naive Bayes over TF-IDF rows.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::errors::CoreError;
use super::vectorizer::SparseVector;

pub const DEFAULT_ALPHA: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    alpha: f64,
    /// Sorted class labels; every per-class table follows this order.
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    pub fn fit(
        alpha: f64,
        rows: &[SparseVector],
        labels: &[&str],
        n_features: usize,
    ) -> Result<Self, CoreError> {
        if rows.len() != labels.len() || rows.is_empty() {
            return Err(CoreError::TrainingData(format!(
                "cannot fit classifier on {} rows and {} labels",
                rows.len(),
                labels.len()
            )));
        }

        let classes: Vec<String> = labels
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut class_count = vec![0.0; classes.len()];
        let mut feature_count = vec![vec![0.0; n_features]; classes.len()];
        for (row, label) in rows.iter().zip(labels) {
            let class = classes
                .iter()
                .position(|c| c.as_str() == *label)
                .unwrap_or_default();
            class_count[class] += 1.0;
            for &(index, value) in row {
                if index < n_features {
                    feature_count[class][index] += value;
                }
            }
        }

        let n_samples = rows.len() as f64;
        let class_log_prior = class_count
            .iter()
            .map(|count| (count / n_samples).ln())
            .collect();

        let feature_log_prob = feature_count
            .iter()
            .map(|counts| {
                let smoothed_total = counts.iter().sum::<f64>() + alpha * n_features as f64;
                counts
                    .iter()
                    .map(|count| ((count + alpha) / smoothed_total).ln())
                    .collect()
            })
            .collect();

        Ok(Self {
            alpha,
            classes,
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Posterior probability per class, in `classes()` order.
    pub fn predict_proba(&self, row: &SparseVector) -> Vec<f64> {
        let joint: Vec<f64> = self
            .class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_probs)| {
                prior
                    + row
                        .iter()
                        .filter_map(|&(index, value)| log_probs.get(index).map(|lp| lp * value))
                        .sum::<f64>()
            })
            .collect();

        let max = joint.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = joint.iter().map(|jll| (jll - max).exp()).collect();
        let total: f64 = exp.iter().sum();
        exp.into_iter().map(|value| value / total).collect()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.feature_log_prob.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_consistent(&self) -> bool {
        let n_features = self.n_features();
        !self.classes.is_empty()
            && self.class_log_prior.len() == self.classes.len()
            && self.feature_log_prob.len() == self.classes.len()
            && self
                .feature_log_prob
                .iter()
                .all(|row| row.len() == n_features && row.iter().all(|v| v.is_finite()))
    }
}
