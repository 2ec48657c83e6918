use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Arguments manquants")]
    MissingArguments,
    #[error("Erreur JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Erreur générale: {0}")]
    MalformedRequest(String),
    #[error("Domaine ou chemin CV manquant")]
    IncompleteRequest,
    #[error("Invalid training data: {0}")]
    TrainingData(String),
    #[error("Empty vocabulary: the training corpus produced no features")]
    EmptyVocabulary,
    #[error("Model cache at {path} is incompatible: {reason}")]
    IncompatibleCache { path: String, reason: String },
    #[error("Cannot read PDF {path}: {message}")]
    PdfExtraction { path: String, message: String },
}

impl CoreError {
    pub fn incompatible_cache(path: &std::path::Path, reason: impl Into<String>) -> Self {
        CoreError::IncompatibleCache {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }
}
