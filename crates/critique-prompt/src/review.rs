//! Advisory compliance review of generated critiques.
//!
//! The prompt is the only enforcement mechanism for the assistant's
//! behavioural constraints. This module reports where a generated critique
//! drifted from the requested structure or used evaluative words, so the
//! caller can log it. It never rejects, filters, or regenerates output.

use critique_core::CritiqueFormat;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema;

static EVALUATIVE_TERMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(good|bad|better|worse)\b").expect("evaluative term pattern is valid")
});

/// What the review found. Empty lists mean nothing was flagged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplianceReport {
    /// Required headings that never appear as a `##` line.
    pub missing_headings: Vec<&'static str>,
    /// Required headings that appear more than once.
    pub repeated_headings: Vec<&'static str>,
    /// Distinct evaluative words found, lowercased, in first-seen order.
    pub evaluative_terms: Vec<String>,
}

impl ComplianceReport {
    pub fn is_compliant(&self) -> bool {
        self.missing_headings.is_empty()
            && self.repeated_headings.is_empty()
            && self.evaluative_terms.is_empty()
    }
}

/// Models often swap the typographic apostrophe for a plain one.
fn normalize_heading(text: &str) -> String {
    text.trim().replace('’', "'").to_lowercase()
}

/// Review a structured critique against its required sections.
pub fn review_output(format: CritiqueFormat, text: &str) -> ComplianceReport {
    let heading_lines: Vec<String> = text
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("## "))
        .map(normalize_heading)
        .collect();

    let mut report = ComplianceReport {
        evaluative_terms: find_evaluative_terms(text),
        ..Default::default()
    };

    for section in schema::sections(format) {
        let wanted = normalize_heading(section.heading);
        match heading_lines.iter().filter(|line| **line == wanted).count() {
            0 => report.missing_headings.push(section.heading),
            1 => {}
            _ => report.repeated_headings.push(section.heading),
        }
    }

    report
}

/// Distinct evaluative words in `text`, lowercased, in first-seen order.
pub fn find_evaluative_terms(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in EVALUATIVE_TERMS.find_iter(text) {
        let term = m.as_str().to_lowercase();
        if !found.contains(&term) {
            found.push(term);
        }
    }
    found
}
