//! Versioned transcript snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::{Answer, SessionState};

/// An immutable snapshot of a session's transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    /// Session the snapshot belongs to.
    pub session_id: Uuid,
    /// Script being run.
    pub script_id: String,
    /// Version number, 1-based.
    pub version: u32,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
    /// Imported notes at snapshot time.
    pub imported_text: Option<String>,
    /// Answers at snapshot time, in elicitation order.
    pub transcript: Vec<Answer>,
    /// Rendered transcript at snapshot time.
    markdown_body: String,
}

impl Bundle {
    /// Snapshot `state` as the next version. The state itself is not touched.
    pub fn next_for(state: &SessionState) -> Self {
        Self {
            session_id: state.session_id,
            script_id: state.script_id.clone(),
            version: state.bundle_version + 1,
            timestamp: Utc::now(),
            imported_text: state.imported_text.clone(),
            transcript: state.answers().to_vec(),
            markdown_body: state.transcript_markdown(),
        }
    }

    /// Render the bundle as a markdown document.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("# {} v{}\n\n", self.script_id, self.version);
        out.push_str(&format!("- Session: {}\n", self.session_id));
        out.push_str(&format!("- Saved: {}\n\n", self.timestamp.to_rfc3339()));
        if self.transcript.is_empty() && self.imported_text.is_none() {
            out.push_str("_No answers yet._\n");
        } else {
            out.push_str(&self.markdown_body);
        }
        out
    }
}

/// Append-only list of a session's bundles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleHistory {
    bundles: Vec<Bundle>,
}

impl BundleHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, bundle: Bundle) {
        self.bundles.push(bundle);
    }

    /// All bundles, oldest first.
    pub fn all(&self) -> &[Bundle] {
        &self.bundles
    }

    /// The newest bundle.
    pub fn latest(&self) -> Option<&Bundle> {
        self.bundles.last()
    }

    /// Number of bundles.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Whether no bundle has been taken.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SessionStatus;

    #[test]
    fn next_version_does_not_mutate_state() {
        let state = SessionState::new("style", SessionStatus::Active);
        let bundle = Bundle::next_for(&state);
        assert_eq!(bundle.version, 1);
        assert_eq!(state.bundle_version, 0);
        assert_eq!(bundle.session_id, state.session_id);
    }

    #[test]
    fn empty_bundle_markdown() {
        let state = SessionState::new("style", SessionStatus::Active);
        let md = Bundle::next_for(&state).to_markdown();
        assert!(md.starts_with("# style v1"));
        assert!(md.contains("_No answers yet._"));
    }

    #[test]
    fn history_is_ordered() {
        let mut state = SessionState::new("style", SessionStatus::Active);
        let mut history = BundleHistory::new();
        for _ in 0..3 {
            let bundle = Bundle::next_for(&state);
            state.bundle_version = bundle.version;
            history.push(bundle);
        }
        let versions: Vec<u32> = history.all().iter().map(|b| b.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
        assert_eq!(history.latest().unwrap().version, 3);
    }
}
