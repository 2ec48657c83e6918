use std::path::Path;

use serde::Serialize;

use super::errors::CoreError;
use super::models::{InvocationError, ScoreRequest};
use super::service::ScoringService;
use super::settings::ScorerSettings;

pub const EXIT_OK: u8 = 0;
pub const EXIT_INVALID_INPUT: u8 = 1;

/// What the process should print and return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub exit_code: u8,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl CommandOutcome {
    fn success(body: String) -> Self {
        Self {
            exit_code: EXIT_OK,
            stdout: Some(body),
            stderr: None,
        }
    }

    fn failure(err: &CoreError) -> Self {
        let envelope = InvocationError::new(err.to_string());
        Self {
            exit_code: EXIT_INVALID_INPUT,
            stdout: None,
            stderr: Some(to_json(&envelope)),
        }
    }
}

/// Parses argv[1]: a JSON object with non-blank `domaine` and `cv_path`.
pub fn parse_request(raw: &str) -> Result<ScoreRequest, CoreError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(CoreError::MalformedRequest(
            "l'argument doit être un objet JSON".to_string(),
        ));
    }

    let request: ScoreRequest = serde_json::from_value(value)
        .map_err(|err| CoreError::MalformedRequest(err.to_string()))?;
    if !request.is_complete() {
        return Err(CoreError::IncompleteRequest);
    }

    Ok(request.sanitized())
}

/// Runs one invocation. `args` is the full argv, program name included.
pub fn run(args: &[String], settings: &ScorerSettings) -> CommandOutcome {
    let request = match args.get(1) {
        Some(raw) => parse_request(raw),
        None => Err(CoreError::MissingArguments),
    };

    match request {
        Ok(request) => {
            let service = ScoringService::new(settings);
            let result = service.score_cv(&request.domaine, Path::new(&request.cv_path));
            CommandOutcome::success(to_json(&result))
        }
        Err(err) => {
            tracing::debug!(error = %err, "rejected invocation");
            CommandOutcome::failure(&err)
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        tracing::error!("failed to serialize output: {err}");
        serde_json::json!({
            "score": 0.3,
            "skills": [],
            "experience": 0,
            "error": err.to_string(),
        })
        .to_string()
    })
}
