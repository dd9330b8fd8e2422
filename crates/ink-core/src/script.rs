use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::command::{CommandSpec, CommandTable};
use crate::error::{CoreError, CoreResult};
use crate::paths::PathTemplates;

/// A single question in a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within the script.
    pub id: String,
    /// Text shown to the user.
    pub prompt: String,
    /// Key used for this answer in the copyable summary.
    #[serde(default)]
    pub label: Option<String>,
}

impl Question {
    /// Create a question without a summary label.
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            label: None,
        }
    }

    /// The summary key: the label if set, otherwise the id.
    pub fn summary_key(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// An ordered group of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Questions in elicitation order.
    pub questions: Vec<Question>,
}

impl Category {
    /// Create a category.
    pub fn new(id: impl Into<String>, title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            questions,
        }
    }
}

/// An immutable interview definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewScript {
    /// Script identifier, e.g. `character_development`.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Whether sessions start by offering to import existing notes.
    pub supports_import: bool,
    /// Whether `export` ends the session or questioning may continue.
    pub export_ends_session: bool,
    /// Whether `reset` snapshots the transcript before clearing it.
    pub reset_bundles: bool,
    /// Whether the editing commands (todos, alternatives, compare) apply.
    pub editing: bool,
    /// Ordered categories.
    pub categories: Vec<Category>,
    /// Command vocabulary.
    pub commands: CommandTable,
    /// Output path templates.
    pub paths: PathTemplates,
}

/// On-disk shape of a script file.
#[derive(Debug, Deserialize)]
struct ScriptFile {
    id: String,
    title: String,
    #[serde(default)]
    supports_import: bool,
    #[serde(default)]
    export_ends_session: bool,
    #[serde(default)]
    reset_bundles: bool,
    #[serde(default)]
    editing: bool,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    commands: Option<Vec<CommandSpec>>,
    #[serde(default)]
    paths: PathTemplates,
}

impl InterviewScript {
    /// Parse and validate a script from TOML text.
    ///
    /// `origin` names the source in error messages. Without a `commands`
    /// table the script gets [`CommandTable::standard`], or
    /// [`CommandTable::editing`] when `editing = true`.
    pub fn from_toml(text: &str, origin: &str) -> CoreResult<Self> {
        let file: ScriptFile = toml::from_str(text).map_err(|e| CoreError::ScriptParse {
            origin: origin.to_string(),
            message: e.message().to_string(),
        })?;

        let commands = match file.commands {
            Some(specs) => CommandTable::new(specs),
            None if file.editing => CommandTable::editing(),
            None => CommandTable::standard(),
        };

        let script = Self {
            id: file.id,
            title: file.title,
            supports_import: file.supports_import,
            export_ends_session: file.export_ends_session,
            reset_bundles: file.reset_bundles,
            editing: file.editing,
            categories: file.categories,
            commands,
            paths: file.paths,
        };
        script.validate()?;
        Ok(script)
    }

    /// Check the structural rules every script must satisfy.
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |reason: String| CoreError::InvalidScript {
            script: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("script id is empty".to_string()));
        }
        if self.categories.is_empty() {
            return Err(invalid("no categories".to_string()));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.questions.is_empty() {
                return Err(invalid(format!("category \"{}\" has no questions", category.id)));
            }
            for question in &category.questions {
                if !seen.insert(question.id.as_str()) {
                    return Err(invalid(format!("duplicate question id \"{}\"", question.id)));
                }
            }
        }
        Ok(())
    }

    /// The question at a category/question position.
    pub fn question(&self, category: usize, question: usize) -> Option<&Question> {
        self.categories.get(category)?.questions.get(question)
    }

    /// Find the position of a question by id.
    pub fn find_question(&self, id: &str) -> Option<(usize, usize)> {
        self.categories.iter().enumerate().find_map(|(ci, c)| {
            c.questions
                .iter()
                .position(|q| q.id == id)
                .map(|qi| (ci, qi))
        })
    }

    /// Look up a question by id.
    pub fn question_by_id(&self, id: &str) -> Option<&Question> {
        self.find_question(id)
            .and_then(|(ci, qi)| self.question(ci, qi))
    }

    /// The position after `(category, question)`, wrapping into the next
    /// category. `None` once every category is exhausted.
    pub fn next_position(&self, category: usize, question: usize) -> Option<(usize, usize)> {
        let current = self.categories.get(category)?;
        if question + 1 < current.questions.len() {
            return Some((category, question + 1));
        }
        (category + 1 < self.categories.len()).then_some((category + 1, 0))
    }

    /// Iterate over every question with its position.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize, &Question)> {
        self.categories.iter().enumerate().flat_map(|(ci, c)| {
            c.questions
                .iter()
                .enumerate()
                .map(move |(qi, q)| (ci, qi, q))
        })
    }

    /// Total number of questions.
    pub fn question_count(&self) -> usize {
        self.categories.iter().map(|c| c.questions.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandKind;

    const SAMPLE: &str = r#"
id = "sample"
title = "Sample"
supports_import = true

[[categories]]
id = "basics"
title = "Basics"

[[categories.questions]]
id = "name"
label = "Name"
prompt = "What is the name?"

[[categories.questions]]
id = "age"
prompt = "How old?"

[[categories]]
id = "depth"
title = "Depth"

[[categories.questions]]
id = "fear"
prompt = "What do they fear?"
"#;

    #[test]
    fn parse_sample() {
        let script = InterviewScript::from_toml(SAMPLE, "test").unwrap();
        assert_eq!(script.id, "sample");
        assert!(script.supports_import);
        assert!(!script.export_ends_session);
        assert_eq!(script.categories.len(), 2);
        assert_eq!(script.question_count(), 3);
        assert_eq!(script.question(0, 0).unwrap().summary_key(), "Name");
        assert_eq!(script.question(0, 1).unwrap().summary_key(), "age");
    }

    #[test]
    fn default_command_table() {
        let script = InterviewScript::from_toml(SAMPLE, "test").unwrap();
        assert!(script.commands.contains(CommandKind::Bundle));
        assert!(!script.commands.contains(CommandKind::Todo));
    }

    #[test]
    fn editing_scripts_get_editing_commands() {
        let text = SAMPLE.replace("supports_import = true", "editing = true");
        let script = InterviewScript::from_toml(&text, "test").unwrap();
        assert!(script.commands.contains(CommandKind::Alternatives));
    }

    #[test]
    fn explicit_commands_replace_defaults() {
        let text = format!(
            "{SAMPLE}\n[[commands]]\ncommand = \"bundle\"\ntriggers = [\"stash\"]\n"
        );
        let script = InterviewScript::from_toml(&text, "test").unwrap();
        assert_eq!(script.commands.len(), 1);
        assert_eq!(
            script.commands.get(CommandKind::Bundle).unwrap().triggers,
            vec!["stash".to_string()]
        );
    }

    #[test]
    fn next_position_wraps_categories() {
        let script = InterviewScript::from_toml(SAMPLE, "test").unwrap();
        assert_eq!(script.next_position(0, 0), Some((0, 1)));
        assert_eq!(script.next_position(0, 1), Some((1, 0)));
        assert_eq!(script.next_position(1, 0), None);
    }

    #[test]
    fn find_question_by_id() {
        let script = InterviewScript::from_toml(SAMPLE, "test").unwrap();
        assert_eq!(script.find_question("fear"), Some((1, 0)));
        assert_eq!(script.find_question("missing"), None);
        assert_eq!(script.question_by_id("age").unwrap().prompt, "How old?");
    }

    #[test]
    fn rejects_empty_category() {
        let text = "id = \"x\"\ntitle = \"X\"\n[[categories]]\nid = \"c\"\ntitle = \"C\"\nquestions = []\n";
        let err = InterviewScript::from_toml(text, "test").unwrap_err();
        assert!(err.to_string().contains("has no questions"));
    }

    #[test]
    fn rejects_duplicate_question_ids() {
        let text = SAMPLE.replace("id = \"fear\"", "id = \"name\"");
        let err = InterviewScript::from_toml(&text, "test").unwrap_err();
        assert!(err.to_string().contains("duplicate question id"));
    }

    #[test]
    fn rejects_missing_categories() {
        let err = InterviewScript::from_toml("id = \"x\"\ntitle = \"X\"\n", "test").unwrap_err();
        assert!(matches!(err, CoreError::InvalidScript { .. }));
    }

    #[test]
    fn parse_error_names_origin() {
        let err = InterviewScript::from_toml("not = [valid", "scripts/bad.toml").unwrap_err();
        assert!(err.to_string().contains("scripts/bad.toml"));
    }
}
