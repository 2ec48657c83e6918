use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use once_cell::unsync::OnceCell;

use super::classifier::DomainClassifier;
use super::errors::CoreError;
use super::experience::extract_experience_years;
use super::knowledge_base::resolve_domain;
use super::model_store::ModelStore;
use super::models::{AnalysisResult, DomainReport};
use super::normalize::normalize_text;
use super::pdf::PdfTextExtractor;
use super::scoring::score_candidate;
use super::settings::ScorerSettings;
use super::skills::extract_skills;

pub const MAX_REPORTED_SKILLS: usize = 10;

/// One scoring pipeline per process. The classifier is loaded or trained on
/// first use and reused afterwards.
pub struct ScoringService {
    model_store: ModelStore,
    pdf_text_extractor: PdfTextExtractor,
    classifier: OnceCell<DomainClassifier>,
}

impl ScoringService {
    pub fn new(settings: &ScorerSettings) -> Self {
        Self {
            model_store: ModelStore::from_settings(settings),
            pdf_text_extractor: PdfTextExtractor::new(),
            classifier: OnceCell::new(),
        }
    }

    pub fn classifier(&self) -> Result<&DomainClassifier, CoreError> {
        self.classifier.get_or_try_init(|| self.model_store.load_or_train())
    }

    /// Scores the PDF at `cv_path` against `domain`. Never fails: unreadable
    /// documents and internal errors degrade to low fallback scores.
    pub fn score_cv(&self, domain: &str, cv_path: &Path) -> AnalysisResult {
        self.guarded(domain, || {
            let classifier = self.classifier()?;
            let cv_text = self.pdf_text_extractor.extract_text(cv_path);
            Ok(score_extracted_text(classifier, domain, &cv_text))
        })
    }

    /// Same pipeline as `score_cv`, starting from already-extracted text.
    pub fn score_text(&self, domain: &str, cv_text: &str) -> AnalysisResult {
        self.guarded(domain, || {
            let classifier = self.classifier()?;
            Ok(score_extracted_text(classifier, domain, cv_text))
        })
    }

    pub fn report(&self, cv_path: &Path, domain: Option<&str>) -> Result<DomainReport, CoreError> {
        let classifier = self.classifier()?;
        let extracted = self.pdf_text_extractor.extract(cv_path);
        let normalized = normalize_text(&extracted.text);

        let mut distribution = classifier.distribution(&normalized);
        distribution.sort_by(|a, b| b.probability.total_cmp(&a.probability));

        let analysis =
            domain.map(|domain| score_extracted_text(classifier, domain, &extracted.text));

        Ok(DomainReport {
            source_file: cv_path.display().to_string(),
            extracted_chars: extracted.text.chars().count(),
            normalized_tokens: normalized.split_whitespace().count(),
            distribution,
            analysis,
            model_trained_at: classifier.trained_at(),
            warnings: extracted.warnings,
        })
    }

    fn guarded<F>(&self, domain: &str, pipeline: F) -> AnalysisResult
    where
        F: FnOnce() -> anyhow::Result<AnalysisResult>,
    {
        match panic::catch_unwind(AssertUnwindSafe(pipeline)) {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                tracing::error!("Erreur dans le calcul du score: {err:#}");
                AnalysisResult::pipeline_error(domain, format!("{err:#}"))
            }
            Err(_) => {
                tracing::error!("scoring pipeline panicked");
                AnalysisResult::pipeline_error(domain, "scoring pipeline panicked")
            }
        }
    }
}

fn score_extracted_text(
    classifier: &DomainClassifier,
    domain: &str,
    cv_text: &str,
) -> AnalysisResult {
    if cv_text.is_empty() {
        return AnalysisResult::unreadable_cv(domain);
    }

    let experience = extract_experience_years(cv_text);
    let skills = extract_skills(cv_text, domain);
    let domain_score = classifier.domain_score(cv_text, domain);
    let breakdown =
        score_candidate(domain_score, skills.len(), experience, resolve_domain(domain)).rounded();

    AnalysisResult {
        score: breakdown.final_score,
        skills: skills.into_iter().take(MAX_REPORTED_SKILLS).collect(),
        experience,
        domain: domain.to_string(),
        domain_score: Some(breakdown.domain_score),
        skill_score: Some(breakdown.skill_score),
        exp_score: Some(breakdown.exp_score),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{DomainProbability, UNREADABLE_CV_MESSAGE, UNREADABLE_CV_SCORE};
    use crate::core::pdf::fixtures::minimal_pdf;

    fn service(dir: &Path) -> ScoringService {
        ScoringService::new(&ScorerSettings::with_model_dir(dir))
    }

    #[test]
    fn score_text_reports_experience_skills_and_bounded_score() {
        let temp = tempfile::tempdir().unwrap();
        let result = service(temp.path()).score_text(
            "informatique",
            "Jean Dupont\nDéveloppeur junior, 3 ans d'expérience.\nOutils: Python, Docker, Git.",
        );

        assert_eq!(result.experience, 3);
        let mut skills = result.skills.clone();
        skills.sort();
        assert_eq!(skills, vec!["docker", "git", "python"]);
        assert!((0.15..=0.95).contains(&result.score));
        assert_eq!(result.domain, "informatique");
        assert!(result.error.is_none());
        assert_eq!(result.exp_score, Some(0.6));

        let domain_score = result.domain_score.unwrap();
        assert!((0.1..=1.0).contains(&domain_score));
    }

    #[test]
    fn score_text_caps_reported_skills_at_ten() {
        let temp = tempfile::tempdir().unwrap();
        let text = "python java javascript sql html css react angular vue node php ruby rust \
                    swift kotlin scala docker kubernetes";
        let result = service(temp.path()).score_text("informatique", text);

        assert_eq!(result.skills.len(), MAX_REPORTED_SKILLS);
        assert_eq!(result.skill_score, Some(0.833));
    }

    #[test]
    fn score_text_with_unknown_domain_has_no_skills() {
        let temp = tempfile::tempdir().unwrap();
        let result = service(temp.path()).score_text("astrophysique", "Python Docker Git, 2 jobs");

        assert!(result.skills.is_empty());
        assert_eq!(result.skill_score, Some(0.0));
        assert_eq!(result.domain_score, Some(0.3));
        assert!((0.15..=0.95).contains(&result.score));
    }

    #[test]
    fn score_cv_degrades_when_the_file_is_missing() {
        let temp = tempfile::tempdir().unwrap();
        let result = service(temp.path()).score_cv("gestion", &temp.path().join("missing.pdf"));

        assert_eq!(result.score, UNREADABLE_CV_SCORE);
        assert!(result.skills.is_empty());
        assert_eq!(result.experience, 0);
        assert_eq!(result.domain, "gestion");
        assert_eq!(result.error.as_deref(), Some(UNREADABLE_CV_MESSAGE));
        assert!(result.domain_score.is_none());
    }

    fn is_non_increasing(distribution: &[DomainProbability]) -> bool {
        distribution
            .windows(2)
            .all(|pair| pair[0].probability >= pair[1].probability)
    }

    #[test]
    fn score_cv_runs_the_pipeline_on_an_extracted_pdf() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cv.pdf");
        std::fs::write(
            &path,
            minimal_pdf("Developpeur 3 ans d'experience Python Docker Git"),
        )
        .unwrap();

        let result = service(temp.path()).score_cv("informatique", &path);

        assert!(result.error.is_none());
        assert_eq!(result.experience, 3);
        let mut skills = result.skills.clone();
        skills.sort();
        assert_eq!(skills, vec!["docker", "git", "python"]);
        assert!((0.15..=0.95).contains(&result.score));
        assert_eq!(result.exp_score, Some(0.6));
    }

    #[test]
    fn report_on_missing_file_keeps_the_warning_and_skips_analysis() {
        let temp = tempfile::tempdir().unwrap();
        let report = service(temp.path())
            .report(&temp.path().join("missing.pdf"), None)
            .unwrap();

        assert_eq!(report.distribution.len(), 6);
        assert!(is_non_increasing(&report.distribution));
        assert!(report.analysis.is_none());
        assert_eq!(report.extracted_chars, 0);
        assert_eq!(report.normalized_tokens, 0);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("introuvable"));
    }

    #[test]
    fn report_on_missing_file_with_domain_carries_the_unreadable_result() {
        let temp = tempfile::tempdir().unwrap();
        let report = service(temp.path())
            .report(&temp.path().join("missing.pdf"), Some("gestion"))
            .unwrap();

        let analysis = report.analysis.unwrap();
        assert_eq!(analysis.score, UNREADABLE_CV_SCORE);
        assert_eq!(analysis.error.as_deref(), Some(UNREADABLE_CV_MESSAGE));
    }

    #[test]
    fn report_on_pdf_ranks_domains_and_scores_the_requested_one() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cv.pdf");
        std::fs::write(
            &path,
            minimal_pdf("Developpeur 3 ans d'experience Python Docker Git"),
        )
        .unwrap();
        let service = service(temp.path());

        let report = service.report(&path, Some("informatique")).unwrap();

        assert_eq!(report.distribution.len(), 6);
        assert!(is_non_increasing(&report.distribution));
        assert_eq!(report.distribution[0].domain, "informatique");
        let total: f64 = report.distribution.iter().map(|p| p.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);

        assert!(report.extracted_chars > 0);
        assert!(report.normalized_tokens > 0);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("très court"));
        assert_eq!(report.source_file, path.display().to_string());

        let analysis = report.analysis.unwrap();
        assert_eq!(analysis.domain, "informatique");
        assert_eq!(analysis.experience, 3);
        assert!(analysis.error.is_none());

        let without_domain = service.report(&path, None).unwrap();
        assert!(without_domain.analysis.is_none());
        assert_eq!(without_domain.warnings, report.warnings);
    }

    #[test]
    fn classifier_is_trained_once_and_cached_on_disk() {
        let temp = tempfile::tempdir().unwrap();
        let service = service(temp.path());

        let first = service.classifier().unwrap().trained_at();
        let second = service.classifier().unwrap().trained_at();
        assert_eq!(first, second);

        let reloaded = ModelStore::new(temp.path().to_path_buf()).load().unwrap().unwrap();
        assert_eq!(reloaded.trained_at(), first);
    }

    #[test]
    fn guarded_turns_errors_into_fallback_results() {
        let temp = tempfile::tempdir().unwrap();
        let service = service(temp.path());

        let result = service.guarded("gestion", || Err(anyhow::anyhow!("boom")));
        assert_eq!(result.score, 0.3);
        assert_eq!(result.error.as_deref(), Some("boom"));

        let result = service.guarded("gestion", || panic!("unexpected"));
        assert_eq!(result.score, 0.3);
        assert!(result.error.is_some());
    }
}
