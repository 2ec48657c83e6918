use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_EXPERIENCE_YEARS: u32 = 20;
const MAX_JOB_MENTION_YEARS: u32 = 5;

/// French and English "N years of experience" phrasings, in both orders.
static EXPERIENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(\d+)\s*(?:ans?|années?)\s*(?:d['’e]|de)?\s*(?:expérience|experience)")
            .unwrap(),
        Regex::new(r"(?:expérience|experience)\s*(?:de|d['’e])?\s*(\d+)\s*(?:ans?|années?)")
            .unwrap(),
        Regex::new(r"(\d+)\s*(?:years?)\s*(?:of)?\s*(?:experience|exp)").unwrap(),
        Regex::new(r"(?:experience|exp)\s*(?:of)?\s*(\d+)\s*(?:years?)").unwrap(),
    ]
});

static DECIMAL_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d$").unwrap());

const JOB_KEYWORDS: [&str; 7] = ["stage", "emploi", "poste", "position", "job", "work", "travail"];

static JOB_KEYWORD_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    JOB_KEYWORDS
        .iter()
        .map(|keyword| Regex::new(&format!(r"\b{keyword}\b")).unwrap())
        .collect()
});

/// Years of experience stated in `text`, or a job-mention proxy when none is
/// stated. Always within [0, 20].
pub fn extract_experience_years(text: &str) -> u32 {
    if text.is_empty() {
        return 0;
    }

    let lowered = text.to_lowercase();
    let years = stated_years(&lowered).unwrap_or_else(|| job_mentions(&lowered));
    years.min(MAX_EXPERIENCE_YEARS as u64) as u32
}

/// Largest number captured by any pattern. A stated zero counts as no statement.
fn stated_years(lowered: &str) -> Option<u64> {
    EXPERIENCE_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.captures_iter(lowered))
        .filter_map(|captures| captures.get(1))
        .map(|digits| parse_decimal(digits.as_str()))
        .max()
        .filter(|years| *years > 0)
}

/// Value of a run of `\d` characters from any script. Saturates instead of
/// overflowing.
fn parse_decimal(digits: &str) -> u64 {
    digits
        .chars()
        .filter_map(digit_value)
        .fold(0u64, |acc, digit| acc.saturating_mul(10).saturating_add(digit))
}

/// Unicode lays every decimal digit set out as ten consecutive code points
/// from zero to nine, so the value is the offset from the start of the run.
fn digit_value(c: char) -> Option<u64> {
    if let Some(digit) = c.to_digit(10) {
        return Some(u64::from(digit));
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut start = u32::from(c);
    while let Some(previous) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(previous) {
            break;
        }
        start -= 1;
    }
    Some(u64::from((u32::from(c) - start) % 10))
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT_RE.is_match(c.encode_utf8(&mut buf))
}

fn job_mentions(lowered: &str) -> u64 {
    let count: usize = JOB_KEYWORD_RES
        .iter()
        .map(|pattern| pattern.find_iter(lowered).count())
        .sum();
    (count as u64).min(MAX_JOB_MENTION_YEARS as u64)
}
