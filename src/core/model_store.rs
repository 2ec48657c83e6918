use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::classifier::DomainClassifier;
use super::errors::CoreError;
use super::knowledge_base;
use super::naive_bayes::MultinomialNb;
use super::settings::ScorerSettings;
use super::vectorizer::TfidfVectorizer;

pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
pub const CLASSIFIER_FILE: &str = "domain_classifier.json";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ArtifactEnvelope<T> {
    format_version: u32,
    corpus_digest: String,
    trained_at: DateTime<Utc>,
    payload: T,
}

/// On-disk cache of the trained classifier. Reads and writes are unlocked;
/// writes are atomic renames so a concurrent reader sees an old or new file,
/// never a torn one.
pub struct ModelStore {
    model_dir: PathBuf,
}

impl ModelStore {
    pub fn new(model_dir: PathBuf) -> Self {
        Self { model_dir }
    }

    pub fn from_settings(settings: &ScorerSettings) -> Self {
        Self::new(settings.model_dir.clone())
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.model_dir.join(VECTORIZER_FILE)
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.model_dir.join(CLASSIFIER_FILE)
    }

    /// Cached classifier if one is usable, otherwise a freshly trained one.
    /// Cache problems are never surfaced; only training itself can fail.
    pub fn load_or_train(&self) -> Result<DomainClassifier, CoreError> {
        if let Some(classifier) = self.load_cached() {
            return Ok(classifier);
        }
        self.train_and_store()
    }

    pub fn load_cached(&self) -> Option<DomainClassifier> {
        match self.load() {
            Ok(Some(classifier)) => {
                tracing::debug!(dir = %self.model_dir.display(), "loaded cached classifier");
                Some(classifier)
            }
            Ok(None) => {
                tracing::debug!(dir = %self.model_dir.display(), "no cached classifier");
                None
            }
            Err(err) => {
                tracing::debug!(error = %format!("{err:#}"), "discarding unusable classifier cache");
                None
            }
        }
    }

    pub fn train_and_store(&self) -> Result<DomainClassifier, CoreError> {
        let classifier = DomainClassifier::train()?;
        if let Err(err) = self.save(&classifier) {
            tracing::warn!("Impossible de sauvegarder le modèle: {err:#}");
        }
        Ok(classifier)
    }

    pub fn load(&self) -> anyhow::Result<Option<DomainClassifier>> {
        let vectorizer_path = self.vectorizer_path();
        let classifier_path = self.classifier_path();
        if !vectorizer_path.exists() || !classifier_path.exists() {
            return Ok(None);
        }

        let digest = corpus_digest();
        let vectorizer: ArtifactEnvelope<TfidfVectorizer> = read_envelope(&vectorizer_path)?;
        let model: ArtifactEnvelope<MultinomialNb> = read_envelope(&classifier_path)?;

        for (path, version, corpus) in [
            (&vectorizer_path, vectorizer.format_version, &vectorizer.corpus_digest),
            (&classifier_path, model.format_version, &model.corpus_digest),
        ] {
            if version != FORMAT_VERSION {
                return Err(CoreError::incompatible_cache(
                    path,
                    format!("format version {version}, expected {FORMAT_VERSION}"),
                )
                .into());
            }
            if *corpus != digest {
                return Err(
                    CoreError::incompatible_cache(path, "trained on a different corpus").into(),
                );
            }
        }

        let classifier =
            DomainClassifier::from_parts(vectorizer.payload, model.payload, model.trained_at)
                .map_err(|reason| CoreError::incompatible_cache(&classifier_path, reason))?;

        Ok(Some(classifier))
    }

    pub fn save(&self, classifier: &DomainClassifier) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.model_dir).with_context(|| {
            format!("failed to create model dir {}", self.model_dir.display())
        })?;

        let digest = corpus_digest();
        write_envelope(
            &self.vectorizer_path(),
            &ArtifactEnvelope {
                format_version: FORMAT_VERSION,
                corpus_digest: digest.clone(),
                trained_at: classifier.trained_at(),
                payload: classifier.vectorizer(),
            },
        )?;
        write_envelope(
            &self.classifier_path(),
            &ArtifactEnvelope {
                format_version: FORMAT_VERSION,
                corpus_digest: digest,
                trained_at: classifier.trained_at(),
                payload: classifier.model(),
            },
        )?;

        Ok(())
    }
}

/// SHA-256 over the labelled training corpus.
pub fn corpus_digest() -> String {
    let mut hasher = Sha256::new();
    for (label, example) in knowledge_base::training_examples() {
        hasher.update(label.as_bytes());
        hasher.update([0x1f_u8]);
        hasher.update(example.as_bytes());
        hasher.update([0x1e_u8]);
    }
    format!("{:x}", hasher.finalize())
}

fn read_envelope<T: DeserializeOwned>(path: &Path) -> anyhow::Result<ArtifactEnvelope<T>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    let envelope = serde_json::from_str::<ArtifactEnvelope<T>>(&json)
        .with_context(|| format!("invalid JSON in {}", path.display()))?;
    Ok(envelope)
}

fn write_envelope<T: Serialize>(path: &Path, envelope: &ArtifactEnvelope<T>) -> anyhow::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;

    serde_json::to_writer(&mut file, envelope)?;
    file.flush()?;
    file.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
