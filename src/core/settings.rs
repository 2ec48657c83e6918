use std::path::PathBuf;

pub const MODEL_DIR_ENV: &str = "CV_SCORER_MODEL_DIR";
pub const LOG_FILTER_ENV: &str = "CV_SCORER_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Runtime settings, read once per process.
#[derive(Debug, Clone)]
pub struct ScorerSettings {
    pub model_dir: PathBuf,
    pub log_filter: String,
}

impl Default for ScorerSettings {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ScorerSettings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let model_dir = std::env::var_os(MODEL_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_model_dir);

        let log_filter = std::env::var(LOG_FILTER_ENV)
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            model_dir,
            log_filter,
        }
    }

    pub fn with_model_dir(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Self::default()
        }
    }
}

/// The classifier cache sits next to the executable; fall back to the user data dir.
pub fn default_model_dir() -> PathBuf {
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|parent| parent.to_path_buf()))
    {
        return dir;
    }

    if let Some(path) = dirs::data_local_dir() {
        return path.join("cv-scorer");
    }

    PathBuf::from(".").join("cv-scorer")
}
