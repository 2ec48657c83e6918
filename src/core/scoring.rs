//! Weighted fusion of the domain, skill and experience sub-scores.

use super::knowledge_base::DomainProfile;

pub const DOMAIN_WEIGHT: f64 = 0.4;
pub const SKILL_WEIGHT: f64 = 0.35;
pub const EXPERIENCE_WEIGHT: f64 = 0.25;

pub const MIN_FINAL_SCORE: f64 = 0.15;
pub const MAX_FINAL_SCORE: f64 = 0.95;

/// Share of a domain's catalog that earns a perfect skill score.
const SKILL_COVERAGE_TARGET: f64 = 0.3;
const GENERIC_SKILL_TARGET: f64 = 10.0;
const EXPERIENCE_TARGET_YEARS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub domain_score: f64,
    pub skill_score: f64,
    pub exp_score: f64,
    pub final_score: f64,
}

impl ScoreBreakdown {
    /// Every component rounded to three decimals, as reported.
    pub fn rounded(&self) -> Self {
        Self {
            domain_score: round3(self.domain_score),
            skill_score: round3(self.skill_score),
            exp_score: round3(self.exp_score),
            final_score: round3(self.final_score),
        }
    }
}

pub fn experience_score(experience_years: u32) -> f64 {
    (experience_years as f64 / EXPERIENCE_TARGET_YEARS).min(1.0)
}

pub fn skill_score(skill_count: usize, domain: Option<&DomainProfile>) -> f64 {
    let target = match domain {
        Some(profile) => (SKILL_COVERAGE_TARGET * profile.keywords.len() as f64).max(1.0),
        None => GENERIC_SKILL_TARGET,
    };
    (skill_count as f64 / target).min(1.0)
}

pub fn fuse(domain_score: f64, skill_score: f64, exp_score: f64) -> f64 {
    let raw = DOMAIN_WEIGHT * domain_score
        + SKILL_WEIGHT * skill_score
        + EXPERIENCE_WEIGHT * exp_score;
    raw.clamp(MIN_FINAL_SCORE, MAX_FINAL_SCORE)
}

pub fn score_candidate(
    domain_score: f64,
    skill_count: usize,
    experience_years: u32,
    domain: Option<&DomainProfile>,
) -> ScoreBreakdown {
    let skill_score = skill_score(skill_count, domain);
    let exp_score = experience_score(experience_years);

    ScoreBreakdown {
        domain_score,
        skill_score,
        exp_score,
        final_score: fuse(domain_score, skill_score, exp_score),
    }
}

/// Rounds the exact binary value to three decimals, so `1.0005` (stored just
/// below the half) gives `1.0` rather than the `1.001` of scaling by 1000.
pub fn round3(value: f64) -> f64 {
    format!("{value:.3}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge_base::resolve_domain;

    #[test]
    fn fuse_clamps_perfect_inputs_to_ceiling() {
        assert_eq!(fuse(1.0, 1.0, 1.0), 0.95);
    }

    #[test]
    fn fuse_clamps_poor_inputs_to_floor() {
        assert_eq!(fuse(0.1, 0.0, 0.0), 0.15);
        assert_eq!(fuse(0.0, 0.0, 0.0), 0.15);
    }

    #[test]
    fn fuse_weights_components() {
        let score = fuse(0.5, 0.4, 0.6);
        assert!((score - (0.2 + 0.14 + 0.15)).abs() < 1e-12);
    }

    #[test]
    fn experience_score_saturates_at_five_years() {
        assert_eq!(experience_score(0), 0.0);
        assert!((experience_score(3) - 0.6).abs() < 1e-12);
        assert_eq!(experience_score(5), 1.0);
        assert_eq!(experience_score(20), 1.0);
    }

    #[test]
    fn skill_score_uses_thirty_percent_of_catalog() {
        let profile = resolve_domain("ressources humaines").unwrap();
        assert_eq!(profile.keywords.len(), 21);

        // 21 keywords → 6.3 skills for a perfect score.
        assert!((skill_score(3, Some(profile)) - 3.0 / 6.3).abs() < 1e-12);
        assert_eq!(skill_score(7, Some(profile)), 1.0);
    }

    #[test]
    fn skill_score_falls_back_to_generic_target() {
        assert!((skill_score(4, None) - 0.4).abs() < 1e-12);
        assert_eq!(skill_score(12, None), 1.0);
    }

    #[test]
    fn score_candidate_stays_in_reporting_range() {
        let profile = resolve_domain("informatique");
        for domain_score in [0.1, 0.3, 0.55, 1.0] {
            for skills in [0, 3, 15] {
                for years in [0, 2, 20] {
                    let breakdown = score_candidate(domain_score, skills, years, profile);
                    assert!((0.15..=0.95).contains(&breakdown.final_score));
                }
            }
        }
    }

    #[test]
    fn rounded_keeps_three_decimals() {
        let breakdown = score_candidate(0.123456, 1, 1, None).rounded();
        assert_eq!(breakdown.domain_score, 0.123);
        assert_eq!(breakdown.skill_score, 0.1);
        assert_eq!(breakdown.exp_score, 0.2);
    }

    #[test]
    fn round3_follows_the_stored_binary_value() {
        assert_eq!(round3(1.0005), 1.0);
        assert_eq!(round3(0.1235), 0.123);
        assert_eq!(round3(0.5555), 0.555);
        assert_eq!(round3(2.0005), 2.001);
        assert_eq!(round3(0.0015), 0.002);
        assert_eq!(round3(0.95), 0.95);
    }
}
