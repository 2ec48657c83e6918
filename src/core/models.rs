use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNREADABLE_CV_SCORE: f64 = 0.2;
pub const INVALID_INPUT_SCORE: f64 = 0.2;
pub const PIPELINE_ERROR_SCORE: f64 = 0.3;
pub const UNREADABLE_CV_MESSAGE: &str = "Impossible de lire le CV";

/// Single invocation payload, as passed in argv[1].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub domaine: String,
    #[serde(default)]
    pub cv_path: String,
}

impl ScoreRequest {
    pub fn sanitized(&self) -> Self {
        Self {
            domaine: self.domaine.trim().to_string(),
            cv_path: self.cv_path.trim().to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.domaine.trim().is_empty() && !self.cv_path.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: f64,
    pub skills: Vec<String>,
    pub experience: u32,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    pub fn degraded(domain: &str, score: f64, error: impl Into<String>) -> Self {
        Self {
            score,
            skills: Vec::new(),
            experience: 0,
            domain: domain.to_string(),
            domain_score: None,
            skill_score: None,
            exp_score: None,
            error: Some(error.into()),
        }
    }

    pub fn unreadable_cv(domain: &str) -> Self {
        Self::degraded(domain, UNREADABLE_CV_SCORE, UNREADABLE_CV_MESSAGE)
    }

    pub fn pipeline_error(domain: &str, error: impl Into<String>) -> Self {
        Self::degraded(domain, PIPELINE_ERROR_SCORE, error)
    }
}

/// Diagnostic written to stderr when the invocation itself is unusable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationError {
    pub score: f64,
    pub skills: Vec<String>,
    pub experience: u32,
    pub error: String,
}

impl InvocationError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            score: INVALID_INPUT_SCORE,
            skills: Vec::new(),
            experience: 0,
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainProbability {
    pub domain: String,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainReport {
    pub source_file: String,
    pub extracted_chars: usize,
    pub normalized_tokens: usize,
    pub distribution: Vec<DomainProbability>,
    pub analysis: Option<AnalysisResult>,
    pub model_trained_at: DateTime<Utc>,
    #[serde(default)]
    pub warnings: Vec<String>,
}
