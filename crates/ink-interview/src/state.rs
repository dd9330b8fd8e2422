//! Per-session progress: answers, cursor and lifecycle status.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Waiting for the import question to be answered.
    Init,
    /// Normal question flow.
    Active,
    /// Paused by `breakpoint`; input is taken as focus notes.
    Paused,
    /// Exported or abandoned. No further input is accepted.
    Ended,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "INIT",
            Self::Active => "ACTIVE",
            Self::Paused => "PAUSED",
            Self::Ended => "ENDED",
        };
        write!(f, "{s}")
    }
}

/// Where the session is within its script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    /// Asking one question.
    Question {
        /// Category index.
        category: usize,
        /// Question index within the category.
        question: usize,
    },
    /// Waiting for a category to be chosen.
    Menu,
    /// Every category is exhausted.
    Complete,
}

impl Cursor {
    /// The first question of the first category.
    pub const START: Self = Self::Question {
        category: 0,
        question: 0,
    };

    /// Build a question cursor from a position.
    pub fn at((category, question): (usize, usize)) -> Self {
        Self::Question { category, question }
    }

    /// The position, if the cursor is on a question.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::Question { category, question } => Some((*category, *question)),
            _ => None,
        }
    }
}

/// One recorded answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// The question answered.
    pub question_id: String,
    /// The prompt as it was asked.
    pub prompt: String,
    /// Key used in the copyable summary.
    pub key: String,
    /// The answer text.
    pub text: String,
    /// When the answer was last recorded.
    pub answered_at: DateTime<Utc>,
}

/// Mutable state of one interview run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Unique session id.
    pub session_id: Uuid,
    /// The script being run.
    pub script_id: String,
    /// When the session started. Drives the `{ts}` placeholder.
    pub started_at: DateTime<Utc>,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Current position.
    pub cursor: Cursor,
    /// Notes pasted in at the import question.
    pub imported_text: Option<String>,
    /// Number of bundles committed so far.
    pub bundle_version: u32,
    /// Focus notes taken while paused.
    pub focus_notes: Vec<String>,
    answers: Vec<Answer>,
}

impl SessionState {
    /// Fresh state for a script.
    pub fn new(script_id: impl Into<String>, status: SessionStatus) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            script_id: script_id.into(),
            started_at: Utc::now(),
            status,
            cursor: Cursor::START,
            imported_text: None,
            bundle_version: 0,
            focus_notes: Vec::new(),
            answers: Vec::new(),
        }
    }

    /// Answers in elicitation order.
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// The answer to a question, if recorded.
    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    /// Whether a question has been answered.
    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answer_for(question_id).is_some()
    }

    /// The most recently recorded answer.
    pub fn last_answer(&self) -> Option<&Answer> {
        self.answers.iter().max_by_key(|a| a.answered_at)
    }

    /// Record an answer. A repeated question overwrites its entry in place,
    /// keeping its original position.
    pub fn record_answer(&mut self, answer: Answer) {
        match self
            .answers
            .iter_mut()
            .find(|a| a.question_id == answer.question_id)
        {
            Some(existing) => *existing = answer,
            None => self.answers.push(answer),
        }
    }

    /// Clear every answer and note and rewind to the first question.
    ///
    /// Session id, script id, imported text and the bundle counter survive.
    pub fn reset(&mut self) {
        self.answers.clear();
        self.focus_notes.clear();
        self.cursor = Cursor::START;
    }

    /// `{ts}` value for artifact paths.
    pub fn timestamp_slug(&self) -> String {
        self.started_at.format("%Y%m%d-%H%M%S").to_string()
    }

    /// First eight characters of the session id.
    pub fn short_id(&self) -> String {
        self.session_id.simple().to_string()[..8].to_string()
    }

    /// Render the answer log as markdown sections.
    pub fn transcript_markdown(&self) -> String {
        let mut out = String::new();
        if let Some(imported) = &self.imported_text {
            out.push_str("## Imported notes\n\n");
            out.push_str(imported.trim_end());
            out.push_str("\n\n");
        }
        for answer in &self.answers {
            out.push_str(&format!("**{}** {}\n\n", answer.key, answer.prompt));
            out.push_str(answer.text.trim_end());
            out.push_str("\n\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(id: &str, text: &str) -> Answer {
        Answer {
            question_id: id.to_string(),
            prompt: format!("{id}?"),
            key: id.to_string(),
            text: text.to_string(),
            answered_at: Utc::now(),
        }
    }

    #[test]
    fn new_state_starts_at_zero() {
        let state = SessionState::new("scene", SessionStatus::Active);
        assert_eq!(state.bundle_version, 0);
        assert_eq!(state.cursor, Cursor::START);
        assert!(state.answers().is_empty());
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut state = SessionState::new("scene", SessionStatus::Active);
        state.record_answer(answer("pov", "Mara"));
        state.record_answer(answer("goal", "Escape"));
        state.record_answer(answer("pov", "Jonah"));

        let ids: Vec<_> = state.answers().iter().map(|a| a.question_id.as_str()).collect();
        assert_eq!(ids, vec!["pov", "goal"]);
        assert_eq!(state.answer_for("pov").unwrap().text, "Jonah");
    }

    #[test]
    fn reset_preserves_identity() {
        let mut state = SessionState::new("scene", SessionStatus::Active);
        state.imported_text = Some("old notes".to_string());
        state.bundle_version = 3;
        state.record_answer(answer("pov", "Mara"));
        state.cursor = Cursor::Question {
            category: 0,
            question: 2,
        };
        let id = state.session_id;

        state.reset();
        assert!(state.answers().is_empty());
        assert_eq!(state.cursor, Cursor::START);
        assert_eq!(state.script_id, "scene");
        assert_eq!(state.imported_text.as_deref(), Some("old notes"));
        assert_eq!(state.bundle_version, 3);
        assert_eq!(state.session_id, id);
    }

    #[test]
    fn timestamp_and_short_id_formats() {
        let state = SessionState::new("scene", SessionStatus::Active);
        let ts = state.timestamp_slug();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "-");
        assert_eq!(state.short_id().len(), 8);
    }

    #[test]
    fn transcript_includes_import_and_answers() {
        let mut state = SessionState::new("scene", SessionStatus::Active);
        state.imported_text = Some("Mara is a smuggler".to_string());
        state.record_answer(answer("pov", "Mara"));
        let md = state.transcript_markdown();
        assert!(md.contains("## Imported notes"));
        assert!(md.contains("Mara is a smuggler"));
        assert!(md.contains("**pov** pov?"));
    }

    #[test]
    fn status_display() {
        assert_eq!(SessionStatus::Paused.to_string(), "PAUSED");
    }

    #[test]
    fn serde_roundtrip() {
        let mut state = SessionState::new("scene", SessionStatus::Paused);
        state.record_answer(answer("pov", "Mara"));
        let json = serde_json::to_string(&state).unwrap();
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
