use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use super::errors::CoreError;

const MIN_MEANINGFUL_CHARS: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct ExtractedText {
    pub text: String,
    pub warnings: Vec<String>,
}

impl ExtractedText {
    fn failed(message: String) -> Self {
        Self {
            text: String::new(),
            warnings: vec![message],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Never fails: an unreadable document yields an empty string.
    pub fn extract_text(&self, path: &Path) -> String {
        self.extract(path).text
    }

    pub fn extract(&self, path: &Path) -> ExtractedText {
        if !path.exists() {
            let message = format!("Fichier {} introuvable", path.display());
            tracing::error!(path = %path.display(), "{message}");
            return ExtractedText::failed(message);
        }

        match self.extract_pdf_text(path) {
            Ok(text) => {
                let mut warnings = Vec::new();
                if text.trim().chars().count() < MIN_MEANINGFUL_CHARS {
                    let message = format!(
                        "Texte extrait très court ({} caractères)",
                        text.chars().count()
                    );
                    tracing::warn!(path = %path.display(), "{message}");
                    warnings.push(message);
                }
                ExtractedText { text, warnings }
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "PDF extraction failed");
                ExtractedText::failed(err.to_string())
            }
        }
    }

    fn extract_pdf_text(&self, path: &Path) -> Result<String, CoreError> {
        let data = std::fs::read(path).map_err(|err| pdf_error(path, err.to_string()))?;

        // pdf-extract panics on some malformed documents.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&data)
        }));

        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(err)) => Err(pdf_error(path, err.to_string())),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "parser panicked".to_string());
                Err(pdf_error(path, message))
            }
        }
    }
}

fn pdf_error(path: &Path, message: String) -> CoreError {
    CoreError::PdfExtraction {
        path: path.display().to_string(),
        message,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::minimal_pdf;
    use super::*;

    #[test]
    fn short_text_is_returned_with_a_warning() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("short.pdf");
        std::fs::write(&path, minimal_pdf("Python Docker Git")).unwrap();

        let extracted = PdfTextExtractor::new().extract(&path);

        assert!(extracted.text.contains("Python Docker Git"));
        assert_eq!(extracted.warnings.len(), 1);
        assert!(extracted.warnings[0].contains("très court"));
    }

    #[test]
    fn long_text_is_returned_without_warnings() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("long.pdf");
        let line = "Chef de projet informatique, gestion des equipes et des budgets annuels";
        std::fs::write(&path, minimal_pdf(line)).unwrap();

        let extracted = PdfTextExtractor::new().extract(&path);

        assert!(extracted.text.contains(line));
        assert!(extracted.warnings.is_empty());
    }

    #[test]
    fn missing_file_yields_empty_text() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("absent.pdf");

        let extracted = PdfTextExtractor::new().extract(&path);

        assert!(extracted.text.is_empty());
        assert_eq!(extracted.warnings.len(), 1);
        assert!(extracted.warnings[0].contains("introuvable"));
    }

    #[test]
    fn garbage_bytes_yield_empty_text() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf at all").unwrap();

        let text = PdfTextExtractor::new().extract_text(&path);

        assert!(text.is_empty());
    }
}
