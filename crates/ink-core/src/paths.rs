use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Output path templates, relative to the story project root.
///
/// Recognized placeholders: `{script}`, `{ts}`, `{chapter}`, `{tag}`,
/// `{todoId}`, and `{#}` (bundle version).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathTemplates {
    /// Continuous save of the whole session.
    pub continuous: String,
    /// Versioned bundle snapshot.
    pub bundle: String,
    /// Tagged excerpt.
    pub excerpt: String,
    /// Copyable summary.
    pub summary: String,
    /// Shared per-chapter todo list.
    pub todos: String,
    /// Alternatives for one todo.
    pub alternatives: String,
    /// Shared append-only progress log.
    pub progress: String,
    /// Directory holding a chapter's drafts.
    pub drafts: String,
}

impl Default for PathTemplates {
    fn default() -> Self {
        Self {
            continuous: "Intake/{script}/{ts}.md".to_string(),
            bundle: "Versions/{script}_v{#}.md".to_string(),
            excerpt: "Intake/snippets/{tag}.md".to_string(),
            summary: "Intake/{script}/{ts}_summary.md".to_string(),
            todos: "book-memory-bank/Chapter_Todos/{chapter}.md".to_string(),
            alternatives: "book-memory-bank/Chapter_Alternatives/{todoId}.md".to_string(),
            progress: "book-memory-bank/Core/progress.md".to_string(),
            drafts: "book-memory-bank/Chapter_Drafts/{chapter}".to_string(),
        }
    }
}

/// Values substituted into a [`PathTemplates`] entry.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    script: Option<String>,
    ts: Option<String>,
    chapter: Option<String>,
    tag: Option<String>,
    todo_id: Option<String>,
    version: Option<u32>,
}

impl TemplateVars {
    /// Vars for a script id and session timestamp.
    pub fn new(script: impl Into<String>, ts: impl Into<String>) -> Self {
        Self {
            script: Some(script.into()),
            ts: Some(ts.into()),
            ..Self::default()
        }
    }

    /// Set `{chapter}`.
    pub fn chapter(mut self, chapter: impl Into<String>) -> Self {
        self.chapter = Some(chapter.into());
        self
    }

    /// Set `{tag}`.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set `{todoId}`.
    pub fn todo_id(mut self, todo_id: impl Into<String>) -> Self {
        self.todo_id = Some(todo_id.into());
        self
    }

    /// Set `{#}`.
    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    fn lookup(&self, placeholder: &str) -> Option<String> {
        match placeholder {
            "script" => self.script.clone(),
            "ts" => self.ts.clone(),
            "chapter" => self.chapter.clone(),
            "tag" => self.tag.clone(),
            "todoId" => self.todo_id.clone(),
            "#" => self.version.map(|v| v.to_string()),
            _ => None,
        }
    }

    /// Substitute every placeholder in `template`.
    ///
    /// Each value is reduced to a single safe path component with
    /// [`path_component`]. An unclosed `{` is copied literally.
    pub fn render(&self, template: &str) -> CoreResult<String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                return Ok(out);
            };
            let name = &after[..close];
            let value = self
                .lookup(name)
                .ok_or_else(|| CoreError::MissingPlaceholder {
                    template: template.to_string(),
                    placeholder: name.to_string(),
                })?;
            out.push_str(&path_component(&value));
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Reduce arbitrary text to one path component.
///
/// Keeps ASCII letters, digits, `-`, `_` and `.`; anything else becomes `_`.
/// Leading dots are dropped so the result can never be `..` or hidden.
pub fn path_component(value: &str) -> String {
    let mapped: String = value
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = mapped.trim_start_matches('.');
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_templates_match_layout() {
        let t = PathTemplates::default();
        assert_eq!(t.continuous, "Intake/{script}/{ts}.md");
        assert_eq!(t.bundle, "Versions/{script}_v{#}.md");
        assert_eq!(t.progress, "book-memory-bank/Core/progress.md");
    }

    #[test]
    fn render_continuous() {
        let vars = TemplateVars::new("character_development", "20261014-101500");
        let path = vars.render("Intake/{script}/{ts}.md").unwrap();
        assert_eq!(path, "Intake/character_development/20261014-101500.md");
    }

    #[test]
    fn render_bundle_version() {
        let vars = TemplateVars::new("dialogue", "x").version(3);
        assert_eq!(
            vars.render("Versions/{script}_v{#}.md").unwrap(),
            "Versions/dialogue_v3.md"
        );
    }

    #[test]
    fn render_todo_id_keeps_dot() {
        let vars = TemplateVars::default().todo_id("3.1");
        assert_eq!(
            vars.render("Chapter_Alternatives/{todoId}.md").unwrap(),
            "Chapter_Alternatives/3.1.md"
        );
    }

    #[test]
    fn missing_placeholder_is_an_error() {
        let vars = TemplateVars::new("scene", "x");
        let err = vars.render("Intake/snippets/{tag}.md").unwrap_err();
        assert!(matches!(
            err,
            CoreError::MissingPlaceholder { ref placeholder, .. } if placeholder == "tag"
        ));
    }

    #[test]
    fn unclosed_brace_is_literal() {
        let vars = TemplateVars::new("scene", "x");
        assert_eq!(vars.render("odd/{script").unwrap(), "odd/{script");
    }

    #[test]
    fn values_cannot_escape_directory() {
        let vars = TemplateVars::default().tag("../../etc/passwd");
        let path = vars.render("Intake/snippets/{tag}.md").unwrap();
        assert_eq!(path, "Intake/snippets/_.._etc_passwd.md");
        assert_eq!(path_component(".."), "_");
        assert_eq!(path_component("opening line"), "opening_line");
    }
}
