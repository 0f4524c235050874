//! Required output structures for structured critiques.

use critique_core::CritiqueFormat;

/// One literal heading the model must reproduce, with a short note on what goes under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaSection {
    pub heading: &'static str,
    pub guidance: &'static str,
}

const REFLECTIVE: [SchemaSection; 6] = [
    SchemaSection {
        heading: "Intent check",
        guidance: "2–4 bullets: what you think the user is aiming for, framed as hypotheses",
    },
    SchemaSection {
        heading: "Reflective questions",
        guidance: "8–12 questions, grouped if helpful",
    },
    SchemaSection {
        heading: "Lenses to apply",
        guidance: "3–5 lenses: heuristics, accessibility, UX principles, ethics/emotion; frame each as a lens",
    },
    SchemaSection {
        heading: "Tradeoffs worth naming",
        guidance: "3–6 tradeoffs, neutral framing",
    },
    SchemaSection {
        heading: "Next iteration directions",
        guidance: "3–5 directions framed as experiments, not fixes",
    },
    SchemaSection {
        heading: "What I’d ask you next",
        guidance: "3–5 short questions to continue the critique dialogue",
    },
];

const OBSERVATIONAL: [SchemaSection; 5] = [
    SchemaSection {
        heading: "Observations",
        guidance: "what is present in the work as described, stated without judgment",
    },
    SchemaSection {
        heading: "Interpretations",
        guidance: "how different users might read those observations, framed as possibilities",
    },
    SchemaSection {
        heading: "Questions for the designer",
        guidance: "6–10 questions that test the interpretations against the stated intent",
    },
    SchemaSection {
        heading: "Tradeoffs in play",
        guidance: "3–5 tradeoffs, neutral framing",
    },
    SchemaSection {
        heading: "Experiments to try",
        guidance: "3–5 small experiments for the next iteration",
    },
];

/// The ordered sections for an output format.
pub fn sections(format: CritiqueFormat) -> &'static [SchemaSection] {
    match format {
        CritiqueFormat::Reflective => &REFLECTIVE,
        CritiqueFormat::Observational => &OBSERVATIONAL,
    }
}

/// Render the output-format block: every heading as a `##` line followed by its guidance.
pub(crate) fn render(format: CritiqueFormat) -> String {
    sections(format)
        .iter()
        .map(|section| format!("## {}\n({})", section.heading, section.guidance))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflective_has_six_sections_in_order() {
        let headings: Vec<&str> = sections(CritiqueFormat::Reflective)
            .iter()
            .map(|s| s.heading)
            .collect();
        assert_eq!(
            headings,
            vec![
                "Intent check",
                "Reflective questions",
                "Lenses to apply",
                "Tradeoffs worth naming",
                "Next iteration directions",
                "What I’d ask you next",
            ]
        );
    }

    #[test]
    fn observational_has_five_sections() {
        let observational = sections(CritiqueFormat::Observational);
        assert_eq!(observational.len(), 5);
        assert_eq!(observational[0].heading, "Observations");
    }

    #[test]
    fn render_emits_markdown_headings() {
        let block = render(CritiqueFormat::Reflective);
        assert!(block.starts_with("## Intent check\n(2–4 bullets"));
        assert_eq!(block.matches("\n## ").count(), 5);
    }
}
