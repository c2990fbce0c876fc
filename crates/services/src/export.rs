use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use swipematch_core::{CandidateCard, MatchLine, SurveyAnswers, UserProfile};
use thiserror::Error;

pub const CSV_HEADER: [&str; 16] = [
    "timestamp",
    "name",
    "program",
    "passion_1",
    "passion_2",
    "strength",
    "happiness",
    "matches",
    "archetypes",
    "new_titles",
    "persona_accuracy",
    "takeaway",
    "experience",
    "verdict",
    "next_feature",
    "comments",
];

const LIST_SEPARATOR: &str = "; ";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One completed session with its survey answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub timestamp: DateTime<Utc>,
    pub profile: UserProfile,
    pub matches: Vec<MatchLine>,
    pub answers: SurveyAnswers,
}

impl SurveyRecord {
    pub fn new(profile: UserProfile, matches: &[CandidateCard], answers: SurveyAnswers) -> Self {
        Self::at(Utc::now(), profile, matches, answers)
    }

    pub fn at(
        timestamp: DateTime<Utc>,
        profile: UserProfile,
        matches: &[CandidateCard],
        answers: SurveyAnswers,
    ) -> Self {
        Self {
            timestamp,
            profile,
            matches: matches
                .iter()
                .map(|card| MatchLine {
                    title: card.title.clone(),
                    archetype: card.archetype,
                })
                .collect(),
            answers,
        }
    }

    /// Column values in `CSV_HEADER` order, unescaped.
    pub fn fields(&self) -> Vec<String> {
        let titles: Vec<&str> = self.matches.iter().map(|line| line.title.as_str()).collect();
        let archetypes: Vec<&str> = self
            .matches
            .iter()
            .map(|line| line.archetype.label())
            .collect();
        let answers = &self.answers;
        vec![
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.profile.name.clone(),
            self.profile.program.label().to_string(),
            self.profile.passions[0].clone(),
            self.profile.passions[1].clone(),
            self.profile.strength.clone(),
            self.profile.happiness.clone(),
            titles.join(LIST_SEPARATOR),
            archetypes.join(LIST_SEPARATOR),
            answers.new_titles.label().to_string(),
            answers.persona_accuracy.label().to_string(),
            answers.takeaway_text().to_string(),
            answers.experience.label().to_string(),
            answers.verdict.label().to_string(),
            answers.next_feature_text().to_string(),
            answers.comments.clone().unwrap_or_default(),
        ]
    }
}

/// Quotes a field when it holds a delimiter, a quote or a line break;
/// embedded quotes are doubled.
pub fn escape_csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\r', '\n'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Survey records accumulated during this process, exported on demand.
#[derive(Debug, Clone, Default)]
pub struct SurveyLog {
    records: Vec<SurveyRecord>,
}

impl SurveyLog {
    pub fn push(&mut self, record: SurveyRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[SurveyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_csv(&self) -> String {
        let mut out = CSV_HEADER.join(",");
        out.push('\n');
        out.push_str(&self.rows());
        out
    }

    fn rows(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            let row: Vec<String> = record
                .fields()
                .iter()
                .map(|field| escape_csv_field(field))
                .collect();
            out.push_str(&row.join(","));
            out.push('\n');
        }
        out
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), ExportError> {
        fs::write(path, self.to_csv()).map_err(|source| io_error(path, source))
    }

    /// Adds these records to an existing export. The header is written only
    /// when the file is new or empty.
    pub fn append_csv(&self, path: &Path) -> Result<(), ExportError> {
        let has_content = fs::metadata(path)
            .map(|meta| meta.len() > 0)
            .unwrap_or(false);
        let body = if has_content {
            self.rows()
        } else {
            self.to_csv()
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| io_error(path, source))?;
        file.write_all(body.as_bytes())
            .map_err(|source| io_error(path, source))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.display().to_string(),
        source,
    }
}
