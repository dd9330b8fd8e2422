//! Candidate rewrites linked to a todo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{InterviewError, InterviewResult};

/// One labelled candidate text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeVersion {
    /// `Version A`, `Version B`, ...
    pub label: String,
    /// The candidate text.
    pub text: String,
}

/// A set of candidate rewrites for one todo. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    /// `{todoId}-alt{n}`.
    pub id: String,
    /// The todo these rewrites address.
    pub todo_id: String,
    /// Labelled versions in the order given.
    pub versions: Vec<AlternativeVersion>,
    /// When the set was created.
    pub created_at: DateTime<Utc>,
}

impl Alternative {
    /// Build the `sequence`-th alternative for a todo, labelling the texts in order.
    pub fn new(
        todo_id: impl Into<String>,
        sequence: u32,
        texts: impl IntoIterator<Item = String>,
    ) -> InterviewResult<Self> {
        let todo_id = todo_id.into();
        let versions: Vec<AlternativeVersion> = texts
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .enumerate()
            .map(|(i, text)| AlternativeVersion {
                label: format!("Version {}", version_letter(i)),
                text,
            })
            .collect();

        if versions.is_empty() {
            return Err(InterviewError::InvalidInput(
                "alternatives need at least one version".to_string(),
            ));
        }

        Ok(Self {
            id: format!("{todo_id}-alt{sequence}"),
            todo_id,
            versions,
            created_at: Utc::now(),
        })
    }

    /// Render as a markdown comparison table section.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("## {} ({})\n\n", self.id, self.created_at.to_rfc3339());
        out.push_str("| Version | Text |\n|---|---|\n");
        for version in &self.versions {
            out.push_str(&format!(
                "| {} | {} |\n",
                version.label,
                escape_cell(&version.text)
            ));
        }
        out.push('\n');
        out
    }
}

/// `A`..`Z`, then `AA`, `AB`, ...
fn version_letter(index: usize) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br>")
}
