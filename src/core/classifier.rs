use chrono::{DateTime, Utc};

use super::errors::CoreError;
use super::knowledge_base::{self, canonical_label, labels_match};
use super::models::DomainProbability;
use super::naive_bayes::{MultinomialNb, DEFAULT_ALPHA};
use super::normalize::normalize_text;
use super::vectorizer::{TfidfVectorizer, VectorizerConfig};

pub const FALLBACK_DOMAIN_SCORE: f64 = 0.3;
const MIN_DOMAIN_SCORE: f64 = 0.1;
const MAX_DOMAIN_SCORE: f64 = 1.0;

/// Fitted vectorizer and model, treated as one immutable unit.
#[derive(Debug, Clone)]
pub struct DomainClassifier {
    vectorizer: TfidfVectorizer,
    model: MultinomialNb,
    trained_at: DateTime<Utc>,
}

impl DomainClassifier {
    /// Fits on the static training corpus. Deterministic for a given corpus.
    pub fn train() -> Result<Self, CoreError> {
        let (labels, documents): (Vec<&str>, Vec<String>) = knowledge_base::training_examples()
            .map(|(label, example)| (label, normalize_text(example)))
            .unzip();

        let (vectorizer, rows) =
            TfidfVectorizer::fit_transform(VectorizerConfig::default(), &documents)?;
        let model = MultinomialNb::fit(DEFAULT_ALPHA, &rows, &labels, vectorizer.n_features())?;

        tracing::debug!(
            features = vectorizer.n_features(),
            classes = model.classes().len(),
            "trained domain classifier"
        );

        Ok(Self {
            vectorizer,
            model,
            trained_at: Utc::now(),
        })
    }

    pub fn from_parts(
        vectorizer: TfidfVectorizer,
        model: MultinomialNb,
        trained_at: DateTime<Utc>,
    ) -> Result<Self, String> {
        if !vectorizer.is_consistent() {
            return Err("vectorizer vocabulary and idf table disagree".to_string());
        }
        if !model.is_consistent() {
            return Err("classifier tables are malformed".to_string());
        }
        if vectorizer.n_features() != model.n_features() {
            return Err(format!(
                "vectorizer has {} features but classifier expects {}",
                vectorizer.n_features(),
                model.n_features()
            ));
        }

        Ok(Self {
            vectorizer,
            model,
            trained_at,
        })
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &MultinomialNb {
        &self.model
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    /// Probability of every known class for already-normalised text.
    pub fn distribution(&self, normalized_text: &str) -> Vec<DomainProbability> {
        let row = self.vectorizer.transform(normalized_text);
        self.model
            .classes()
            .iter()
            .zip(self.model.predict_proba(&row))
            .map(|(domain, probability)| DomainProbability {
                domain: domain.clone(),
                probability,
            })
            .collect()
    }

    /// Probability that `raw_text` belongs to `domain`, clamped to [0.1, 1.0].
    /// Empty text, unknown domains and non-finite outputs score 0.3.
    pub fn domain_score(&self, raw_text: &str, domain: &str) -> f64 {
        if raw_text.is_empty() {
            return FALLBACK_DOMAIN_SCORE;
        }

        let target = canonical_label(domain);
        let score = self
            .distribution(&normalize_text(raw_text))
            .into_iter()
            .find(|entry| labels_match(&entry.domain, &target))
            .map(|entry| entry.probability)
            .unwrap_or(FALLBACK_DOMAIN_SCORE);

        if !score.is_finite() {
            tracing::error!(domain, "domain probability is not finite");
            return FALLBACK_DOMAIN_SCORE;
        }

        score.clamp(MIN_DOMAIN_SCORE, MAX_DOMAIN_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> DomainClassifier {
        DomainClassifier::train().unwrap()
    }

    #[test]
    fn train_covers_every_domain_in_sorted_order() {
        let classifier = classifier();
        let classes = classifier.model().classes();

        assert_eq!(classes.len(), knowledge_base::DOMAINS.len());
        let mut sorted = classes.to_vec();
        sorted.sort();
        assert_eq!(classes, sorted.as_slice());
        assert_eq!(classes[0], "gestion");
        assert_eq!(classes[5], "électricité et électromécanique");
    }

    #[test]
    fn domain_score_is_fallback_for_empty_text() {
        assert_eq!(classifier().domain_score("", "informatique"), 0.3);
    }

    #[test]
    fn domain_score_is_fallback_for_unknown_domain() {
        let score = classifier().domain_score("Développeur Python Docker", "astrophysique");
        assert_eq!(score, 0.3);
    }

    #[test]
    fn domain_score_stays_in_range() {
        let classifier = classifier();
        let texts = [
            "Développeur Python, Docker, Kubernetes, AWS, Linux, DevOps et CI/CD, React, Node.js",
            "Ingénieur structure béton armé fondations voirie assainissement",
            "x",
            "   ",
        ];

        for text in texts {
            for domain in knowledge_base::DOMAINS {
                let score = classifier.domain_score(text, domain.name);
                assert!((0.1..=1.0).contains(&score), "{text} / {}: {score}", domain.name);
            }
        }
    }

    #[test]
    fn distribution_ranks_the_obvious_domain_first() {
        let classifier = classifier();
        let text = normalize_text(
            "Développeur Python et JavaScript. Docker, Kubernetes, AWS. DevOps, CI/CD, Linux.",
        );
        let distribution = classifier.distribution(&text);

        let best = distribution
            .iter()
            .max_by(|a, b| a.probability.total_cmp(&b.probability))
            .unwrap();
        assert_eq!(best.domain, "informatique");
        assert!((distribution.iter().map(|d| d.probability).sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn blank_text_scores_the_uniform_prior() {
        let score = classifier().domain_score("   ", "gestion");
        assert!((score - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn from_parts_rejects_mismatched_feature_counts() {
        let trained = classifier();
        let other = DomainClassifier::train().unwrap();
        let rows = vec![vec![(0, 1.0)]];
        let tiny = MultinomialNb::fit(DEFAULT_ALPHA, &rows, &["gestion"], 1).unwrap();

        assert!(DomainClassifier::from_parts(
            trained.vectorizer().clone(),
            other.model().clone(),
            Utc::now()
        )
        .is_ok());
        assert!(
            DomainClassifier::from_parts(trained.vectorizer().clone(), tiny, Utc::now()).is_err()
        );
    }
}
