//! Identity document loading and parsing.
//!
//! The identity document is plain text carrying case-insensitive, XML-like
//! section tags (`<Role>…</Role>`, `<Goal>…</Goal>`, ...). It is read once per
//! process and shared read-only by every prompt build. Parsing never fails:
//! a missing or unterminated tag yields an empty section.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;

use crate::error::{CoreError, Result};

/// Shown wherever a developer name is needed but the role text names nobody.
pub const DEVELOPER_NAME_PLACEHOLDER: &str = "Not specified in identity.txt";

/// A named section of the identity document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Role,
    Goal,
    Rules,
    Knowledge,
    SpecializedActions,
    Guidelines,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Role,
        Section::Goal,
        Section::Rules,
        Section::Knowledge,
        Section::SpecializedActions,
        Section::Guidelines,
    ];

    /// The tag name as written in the source document.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Role => "Role",
            Self::Goal => "Goal",
            Self::Rules => "Rules",
            Self::Knowledge => "Knowledge",
            Self::SpecializedActions => "SpecializedActions",
            Self::Guidelines => "Guidelines",
        }
    }
}

/// One compiled non-greedy `<Tag>…</Tag>` matcher per section.
static SECTION_PATTERNS: Lazy<Vec<(Section, Regex)>> = Lazy::new(|| {
    Section::ALL
        .iter()
        .map(|section| {
            let tag = section.tag();
            let pattern = Regex::new(&format!(r"(?is)<{tag}>(.*?)</{tag}>"))
                .expect("section tag pattern is valid");
            (*section, pattern)
        })
        .collect()
});

/// A single attribution heuristic tried against the role text.
struct AttributionMatcher {
    pattern: Regex,
}

impl AttributionMatcher {
    fn new(pattern: &str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("attribution pattern is valid"),
        }
    }

    fn try_match(&self, role: &str) -> Option<String> {
        let captured = self.pattern.captures(role)?.get(1)?;
        let name = captured.as_str().trim().trim_matches('.');
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

/// Ordered attribution heuristics. The first match wins.
static ATTRIBUTION_MATCHERS: Lazy<Vec<AttributionMatcher>> = Lazy::new(|| {
    vec![
        AttributionMatcher::new(r"(?i)created by\s+([A-Za-z][A-Za-z .,'-]{1,60})"),
        AttributionMatcher::new(r"(?i)developed by\s+([A-Za-z][A-Za-z .,'-]{1,60})"),
        AttributionMatcher::new(r"(?i)\bby\s+([A-Za-z][A-Za-z .,'-]{1,60})\b"),
    ]
});

fn extract_section(text: &str, section: Section) -> String {
    SECTION_PATTERNS
        .iter()
        .find(|(candidate, _)| *candidate == section)
        .and_then(|(_, pattern)| pattern.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|inner| inner.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Extract the developer or creator name from the `<Role>` section of an
/// identity text.
///
/// Returns `None` when the text has no role section or no heuristic matches;
/// callers that need display text fall back to [`DEVELOPER_NAME_PLACEHOLDER`].
pub fn extract_developer_name(identity_text: &str) -> Option<String> {
    let role = extract_section(identity_text, Section::Role);
    developer_name_from_role(&role)
}

fn developer_name_from_role(role: &str) -> Option<String> {
    ATTRIBUTION_MATCHERS
        .iter()
        .find_map(|matcher| matcher.try_match(role))
}

/// The parsed behavioural contract of the assistant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityDocument {
    /// The full source text, trimmed.
    pub raw: String,
    pub role: String,
    pub goal: String,
    pub rules: String,
    pub knowledge: String,
    pub specialized_actions: String,
    pub guidelines: String,
}

impl IdentityDocument {
    /// Parse tagged sections out of identity text.
    pub fn parse(text: &str) -> Self {
        Self {
            raw: text.trim().to_string(),
            role: extract_section(text, Section::Role),
            goal: extract_section(text, Section::Goal),
            rules: extract_section(text, Section::Rules),
            knowledge: extract_section(text, Section::Knowledge),
            specialized_actions: extract_section(text, Section::SpecializedActions),
            guidelines: extract_section(text, Section::Guidelines),
        }
    }

    /// Read and parse the identity document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| CoreError::ResourceNotFound {
            path: path.display().to_string(),
            source,
        })?;

        let identity = Self::parse(&text);
        tracing::debug!(
            path = %path.display(),
            role_chars = identity.role.len(),
            rules_chars = identity.rules.len(),
            "Identity document loaded"
        );
        Ok(identity)
    }

    /// Text of one section; empty if the tag was absent.
    pub fn section(&self, section: Section) -> &str {
        match section {
            Section::Role => &self.role,
            Section::Goal => &self.goal,
            Section::Rules => &self.rules,
            Section::Knowledge => &self.knowledge,
            Section::SpecializedActions => &self.specialized_actions,
            Section::Guidelines => &self.guidelines,
        }
    }

    pub fn developer_name(&self) -> Option<String> {
        developer_name_from_role(&self.role)
    }

    pub fn developer_name_or_placeholder(&self) -> String {
        self.developer_name()
            .unwrap_or_else(|| DEVELOPER_NAME_PLACEHOLDER.to_string())
    }

    /// The behavioural preamble placed at the top of every prompt.
    ///
    /// Role, goal, rules and guidelines under labels, skipping empty ones.
    /// A document without any of those four falls back to its raw text.
    pub fn behavioural_preamble(&self) -> String {
        let parts: Vec<String> = [
            Section::Role,
            Section::Goal,
            Section::Rules,
            Section::Guidelines,
        ]
        .iter()
        .filter(|section| !self.section(**section).is_empty())
        .map(|section| format!("{}:\n{}", section.tag(), self.section(*section)))
        .collect();

        if parts.is_empty() {
            self.raw.clone()
        } else {
            parts.join("\n\n")
        }
    }

    /// Render the non-empty sections back into tagged form.
    pub fn to_tagged_text(&self) -> String {
        Section::ALL
            .iter()
            .filter(|section| !self.section(**section).is_empty())
            .map(|section| {
                let tag = section.tag();
                format!("<{tag}>\n{}\n</{tag}>", self.section(*section))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Process-lifetime cache for the identity document.
///
/// The document is read on first access and shared afterwards; it is only
/// re-read when the process restarts.
pub struct IdentityStore {
    path: PathBuf,
    cached: OnceCell<Arc<IdentityDocument>>,
}

impl IdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached document, loading it on first call.
    pub fn get(&self) -> Result<Arc<IdentityDocument>> {
        self.cached
            .get_or_try_init(|| IdentityDocument::load(&self.path).map(Arc::new))
            .cloned()
    }
}
