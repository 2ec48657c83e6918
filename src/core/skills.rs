use regex::{Regex, RegexBuilder};

use super::knowledge_base::{resolve_domain, DomainProfile};
use super::normalize::normalize_text;

pub const MAX_EXTRACTED_SKILLS: usize = 15;

/// Catalog keywords of `domain` present in `text`. An unrecognised domain
/// yields no skills.
pub fn extract_skills(text: &str, domain: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    match resolve_domain(domain) {
        Some(profile) => find_domain_keywords(&normalize_text(text), profile),
        None => {
            tracing::debug!(domain, "domain not in catalog, no skills extracted");
            Vec::new()
        }
    }
}

/// Whole-word matches against already-normalised text, in catalog order,
/// deduplicated and capped.
pub fn find_domain_keywords(normalized_text: &str, profile: &DomainProfile) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for keyword in profile.keywords {
        if found.len() >= MAX_EXTRACTED_SKILLS {
            break;
        }
        if found.iter().any(|existing| existing == keyword) {
            continue;
        }
        if keyword_patterns(keyword)
            .iter()
            .any(|pattern| pattern.is_match(normalized_text))
        {
            found.push((*keyword).to_string());
        }
    }
    found
}

/// The keyword as written, without spaces, and without hyphens.
fn keyword_patterns(keyword: &str) -> Vec<Regex> {
    let mut variants = vec![
        keyword.to_string(),
        keyword.replace(' ', ""),
        keyword.replace('-', ""),
    ];
    variants.dedup();

    variants
        .iter()
        .filter_map(|variant| {
            RegexBuilder::new(&format!(r"\b{}\b", regex::escape(variant)))
                .case_insensitive(true)
                .build()
                .ok()
        })
        .collect()
}
