//! Intake loading from files and command-line flags.

use std::path::{Path, PathBuf};

use clap::Args;
use critique_core::error::Result;
use critique_core::types::{ARTIFACT_TYPES, DESIGN_STAGES};
use critique_core::{FocusAreas, IntakeRecord};

/// Read an intake record from a TOML, YAML, or JSON file.
///
/// Missing fields are left empty. `focus` may be a string or a list.
pub fn load_intake_file(path: &Path) -> Result<IntakeRecord> {
    let record: IntakeRecord = config::Config::builder()
        .add_source(config::File::from(path))
        .build()?
        .try_deserialize()?;

    tracing::debug!(path = %path.display(), stage = %record.stage, "Intake loaded");
    Ok(record)
}

/// Intake fields accepted on the command line.
///
/// Flags override whatever `--intake` or `--example` supplied.
#[derive(Debug, Clone, Default, Args)]
pub struct IntakeArgs {
    /// Read the intake from a file (TOML, YAML, or JSON).
    #[arg(long, value_name = "FILE")]
    pub intake: Option<PathBuf>,

    /// Start from the built-in example intake.
    #[arg(long, conflicts_with = "intake")]
    pub example: bool,

    /// Design stage, e.g. "Early ideation".
    #[arg(long)]
    pub stage: Option<String>,

    /// Artifact type, e.g. "Wireframe / layout".
    #[arg(long)]
    pub artifact: Option<String>,

    #[arg(long)]
    pub audience: Option<String>,

    /// Primary goal of the work.
    #[arg(long)]
    pub goal: Option<String>,

    #[arg(long)]
    pub constraints: Option<String>,

    /// What to get critique on. Repeat for several areas.
    #[arg(long)]
    pub focus: Vec<String>,

    /// Description of the work so far.
    #[arg(long)]
    pub work: Option<String>,
}

impl IntakeArgs {
    fn has_fields(&self) -> bool {
        self.stage.is_some()
            || self.artifact.is_some()
            || self.audience.is_some()
            || self.goal.is_some()
            || self.constraints.is_some()
            || !self.focus.is_empty()
            || self.work.is_some()
    }

    /// The intake these flags describe, or `None` if none were given.
    pub fn resolve(&self) -> Result<Option<IntakeRecord>> {
        let mut record = match (&self.intake, self.example) {
            (Some(path), _) => load_intake_file(path)?,
            (None, true) => IntakeRecord::example(),
            (None, false) if self.has_fields() => IntakeRecord::default(),
            (None, false) => return Ok(None),
        };

        let overrides = [
            (&mut record.stage, &self.stage),
            (&mut record.artifact, &self.artifact),
            (&mut record.audience, &self.audience),
            (&mut record.goal, &self.goal),
            (&mut record.constraints, &self.constraints),
            (&mut record.work, &self.work),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value.clone();
            }
        }

        match self.focus.as_slice() {
            [] => {}
            [single] => record.focus = FocusAreas::Text(single.clone()),
            many => record.focus = FocusAreas::List(many.to_vec()),
        }

        for unlisted in unlisted_choices(&record) {
            tracing::debug!(value = %unlisted, "Intake value is not one of the listed choices");
        }

        Ok(Some(record))
    }
}

/// Stage and artifact values outside the lists the front end offers.
///
/// Any value is accepted; this only reports the unusual ones.
pub fn unlisted_choices(record: &IntakeRecord) -> Vec<&str> {
    [
        (record.stage.as_str(), &DESIGN_STAGES[..]),
        (record.artifact.as_str(), &ARTIFACT_TYPES[..]),
    ]
    .into_iter()
    .filter(|(value, list)| !value.is_empty() && !list.contains(value))
    .map(|(value, _)| value)
    .collect()
}
