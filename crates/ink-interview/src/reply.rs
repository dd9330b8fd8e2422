//! What the engine says back after each utterance.

use std::fmt;
use std::path::PathBuf;

use ink_core::CommandKind;

/// The kind of a [`Reply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyKind {
    /// The next question, or the category menu.
    Prompt,
    /// A clarifying question about candidate commands, best first.
    Clarify(Vec<CommandKind>),
    /// Confirmation that artifacts were written.
    Saved,
    /// Informational output that does not move the interview.
    Info,
    /// The session is over.
    Ended,
}

/// One engine response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// What sort of response this is.
    pub kind: ReplyKind,
    /// Text shown to the user.
    pub text: String,
    /// Files written while handling the utterance.
    pub paths: Vec<PathBuf>,
}

impl Reply {
    fn new(kind: ReplyKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            paths: Vec::new(),
        }
    }

    /// A question prompt.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self::new(ReplyKind::Prompt, text)
    }

    /// A clarifying question.
    pub fn clarify(candidates: Vec<CommandKind>, text: impl Into<String>) -> Self {
        Self::new(ReplyKind::Clarify(candidates), text)
    }

    /// A write confirmation.
    pub fn saved(text: impl Into<String>, paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            ..Self::new(ReplyKind::Saved, text)
        }
    }

    /// Informational text.
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(ReplyKind::Info, text)
    }

    /// End of session.
    pub fn ended(text: impl Into<String>) -> Self {
        Self::new(ReplyKind::Ended, text)
    }

    /// Mark the reply as ending the session, keeping text and paths.
    pub(crate) fn ending(mut self) -> Self {
        self.kind = ReplyKind::Ended;
        self
    }

    /// Put a snapshot confirmation in front of this reply.
    pub(crate) fn after_snapshot(mut self, version: u32, path: PathBuf) -> Self {
        self.text = format!("Saved bundle v{version}.\n{}", self.text);
        self.paths.insert(0, path);
        self
    }

    /// Whether the session ended with this reply.
    pub fn is_ended(&self) -> bool {
        self.kind == ReplyKind::Ended
    }

    /// Whether this reply asks the user to confirm a command.
    pub fn is_clarification(&self) -> bool {
        matches!(self.kind, ReplyKind::Clarify(_))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text.trim_end())?;
        for path in &self.paths {
            write!(f, "\n  wrote {}", path.display())?;
        }
        Ok(())
    }
}
