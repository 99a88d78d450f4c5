//! Locally computed scoring signals.

use std::collections::HashSet;

use super::OrgDirection;
use crate::domain::{CompanyRecord, Incentive};
use crate::location::LocationRecord;

const STOP_WORDS: &[&str] = &[
    "de", "da", "do", "e", "a", "o", "para", "com", "em", "por", "the", "and", "or", "of", "to",
    "in",
];

const SOCIAL_FORMS: &[&str] = &[
    "COOPERATIVA",
    "ASSOCIAÇÃO",
    "FUNDAÇÃO",
    "MISERICÓRDIA",
    "CENTRO SOCIAL",
];

const SOCIAL_VOCABULARY: &[&str] = &[
    "associação",
    "cooperativa",
    "social",
    "nonprofit",
    "terceiro setor",
    "ipss",
];
const SMALL_BUSINESS_VOCABULARY: &[&str] = &["pme", "pequena", "micro", "startup", "empreendedor"];
const LARGE_ENTERPRISE_VOCABULARY: &[&str] =
    &["grande empresa", "multinacional", "corporação", "s.a."];
const PUBLIC_ADMINISTRATION_VOCABULARY: &[&str] = &["administração pública", "governo"];

/// Min–max normalization. Empty, single-element and constant inputs map to 1.0.
pub fn normalize_semantic(scores: &[f64]) -> Vec<f64> {
    let (min, max) = scores
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
            (lo.min(s), hi.max(s))
        });

    let range = max - min;
    if scores.len() < 2 || !range.is_finite() || range <= 0.0 {
        return vec![1.0; scores.len()];
    }

    scores.iter().map(|s| (s - min) / range).collect()
}

/// Lowercase whitespace tokens with stop words removed.
pub fn keywords(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// M: Jaccard overlap of incentive sector/actions against company category/activity.
pub fn category_match(incentive: &Incentive, company: &CompanyRecord) -> f64 {
    let incentive_words = keywords(&format!(
        "{} {}",
        incentive.sector_text(),
        incentive.actions_text()
    ));
    let company_words = keywords(&format!(
        "{} {}",
        company.category_label.as_deref().unwrap_or_default(),
        company.activity.as_deref().unwrap_or_default()
    ));

    if incentive_words.is_empty() || company_words.is_empty() {
        return 0.0;
    }

    let intersection = incentive_words.intersection(&company_words).count();
    let union = incentive_words.union(&company_words).count();
    intersection as f64 / union as f64
}

/// G: 1 when eligible, 0 when the location is trusted but ineligible, 0.5 when unresolved.
pub fn geographic_fit(eligible: bool, location: &LocationRecord) -> f64 {
    if eligible {
        1.0
    } else if location.is_trusted() {
        0.0
    } else {
        0.5
    }
}

/// O: organisational capacity inferred from the legal form in the company name.
pub fn org_fit(company_name: &str) -> f64 {
    let name = company_name.to_uppercase();

    if name.contains("S.A.") || name.contains("SA ") {
        1.0
    } else if SOCIAL_FORMS.iter().any(|form| name.contains(form)) {
        1.0
    } else if name.contains("SGPS") {
        0.6
    } else if name.contains("UNIPESSOAL") {
        0.4
    } else if name.contains("LDA") || name.contains("LTD") {
        0.7
    } else {
        0.5
    }
}

/// Preferred organisation size, read from the incentive title, sector and actions.
pub fn org_direction(incentive: &Incentive) -> OrgDirection {
    let text = format!(
        "{} {} {}",
        incentive.title,
        incentive.sector_text(),
        incentive.actions_text()
    )
    .to_lowercase();

    let mentions = |vocabulary: &[&str]| vocabulary.iter().any(|term| text.contains(term));

    if mentions(SOCIAL_VOCABULARY) {
        OrgDirection::Neutral
    } else if mentions(SMALL_BUSINESS_VOCABULARY) {
        OrgDirection::Smaller
    } else if mentions(LARGE_ENTERPRISE_VOCABULARY) || mentions(PUBLIC_ADMINISTRATION_VOCABULARY) {
        OrgDirection::Larger
    } else {
        OrgDirection::Neutral
    }
}

/// W: 1 when a usable website is recorded.
pub fn website_presence(website: Option<&str>) -> f64 {
    match website.map(str::trim) {
        Some(url) if !url.is_empty() && url != "N/A" => 1.0,
        _ => 0.0,
    }
}
