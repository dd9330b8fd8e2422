use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::builtin::BUILTIN_SCRIPTS;
use crate::error::{CoreError, CoreResult};
use crate::script::InterviewScript;

/// Where a registered script was read from, so it can be read again.
#[derive(Debug, Clone)]
enum ScriptSource {
    Builtin(&'static str),
    File(PathBuf),
    Memory,
}

#[derive(Debug, Clone)]
struct Entry {
    script: InterviewScript,
    source: ScriptSource,
}

/// Read-only lookup table of interview scripts, populated at startup.
#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
    entries: BTreeMap<String, Entry>,
}

impl ScriptRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in script.
    pub fn builtin() -> CoreResult<Self> {
        let mut entries = BTreeMap::new();
        for (id, text) in BUILTIN_SCRIPTS {
            let script = InterviewScript::from_toml(text, &format!("builtin:{id}"))?;
            entries.insert(
                script.id.clone(),
                Entry {
                    script,
                    source: ScriptSource::Builtin(*text),
                },
            );
        }
        Ok(Self { entries })
    }

    /// The built-ins plus every `*.toml` script in `dir`.
    ///
    /// A file script replaces a built-in with the same id.
    pub fn from_dir(dir: &Path) -> CoreResult<Self> {
        let mut registry = Self::builtin()?;

        let read_dir = std::fs::read_dir(dir).map_err(|source| CoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut files: Vec<PathBuf> = read_dir
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        files.sort();

        for path in files {
            let script = read_script_file(&path)?;
            debug!(script = %script.id, path = %path.display(), "registered script file");
            registry.entries.insert(
                script.id.clone(),
                Entry {
                    script,
                    source: ScriptSource::File(path),
                },
            );
        }
        Ok(registry)
    }

    /// Add an in-memory script, replacing any script with the same id.
    pub fn with_script(mut self, script: InterviewScript) -> Self {
        self.entries.insert(
            script.id.clone(),
            Entry {
                script,
                source: ScriptSource::Memory,
            },
        );
        self
    }

    /// A copy of the definition for `id`.
    pub fn load(&self, id: &str) -> CoreResult<InterviewScript> {
        self.get(id)
            .cloned()
            .ok_or_else(|| CoreError::UnknownScript(id.to_string()))
    }

    /// Borrow the definition for `id`.
    pub fn get(&self, id: &str) -> Option<&InterviewScript> {
        self.entries.get(id).map(|e| &e.script)
    }

    /// Re-read `id` from its source, picking up external edits.
    ///
    /// The registry itself is left untouched; the fresh definition is
    /// returned to the caller.
    pub fn reload(&self, id: &str) -> CoreResult<InterviewScript> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| CoreError::UnknownScript(id.to_string()))?;

        let script = match &entry.source {
            ScriptSource::Builtin(text) => {
                InterviewScript::from_toml(text, &format!("builtin:{id}"))?
            }
            ScriptSource::File(path) => read_script_file(path)?,
            ScriptSource::Memory => entry.script.clone(),
        };

        if script.id != id {
            return Err(CoreError::InvalidScript {
                script: id.to_string(),
                reason: format!("reloaded definition now has id \"{}\"", script.id),
            });
        }
        Ok(script)
    }

    /// Ids of every registered script, sorted.
    pub fn list(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Iterate over every script, sorted by id.
    pub fn scripts(&self) -> impl Iterator<Item = &InterviewScript> {
        self.entries.values().map(|e| &e.script)
    }

    /// Number of registered scripts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_script_file(path: &Path) -> CoreResult<InterviewScript> {
    let text = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    InterviewScript::from_toml(&text, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{Category, Question};
    use crate::{CommandTable, PathTemplates};

    const CUSTOM: &str = r#"
id = "poetry"
title = "Poetry"

[[categories]]
id = "form"
title = "Form"

[[categories.questions]]
id = "meter"
prompt = "What meter?"
"#;

    fn tiny(id: &str) -> InterviewScript {
        InterviewScript {
            id: id.to_string(),
            title: id.to_string(),
            supports_import: false,
            export_ends_session: false,
            reset_bundles: false,
            editing: false,
            categories: vec![Category::new("c", "C", vec![Question::new("q", "Q?")])],
            commands: CommandTable::standard(),
            paths: PathTemplates::default(),
        }
    }

    #[test]
    fn builtin_lists_all_scripts() {
        let registry = ScriptRegistry::builtin().unwrap();
        assert_eq!(registry.len(), BUILTIN_SCRIPTS.len());
        assert!(registry.list().contains(&"character_development"));
        assert!(registry.list().contains(&"editing"));
    }

    #[test]
    fn list_is_sorted() {
        let registry = ScriptRegistry::builtin().unwrap();
        let ids = registry.list();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn unknown_script_error() {
        let registry = ScriptRegistry::builtin().unwrap();
        let err = registry.load("sonnet").unwrap_err();
        assert!(matches!(err, CoreError::UnknownScript(ref id) if id == "sonnet"));
    }

    #[test]
    fn from_dir_adds_and_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("poetry.toml"), CUSTOM).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = ScriptRegistry::from_dir(dir.path()).unwrap();
        assert_eq!(registry.len(), BUILTIN_SCRIPTS.len() + 1);
        assert_eq!(registry.load("poetry").unwrap().title, "Poetry");
    }

    #[test]
    fn from_missing_dir_fails() {
        let err = ScriptRegistry::from_dir(Path::new("/nonexistent/ink/scripts")).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }

    #[test]
    fn reload_picks_up_file_edits() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("poetry.toml");
        std::fs::write(&path, CUSTOM).unwrap();
        let registry = ScriptRegistry::from_dir(dir.path()).unwrap();

        std::fs::write(&path, CUSTOM.replace("What meter?", "Which meter?")).unwrap();
        let fresh = registry.reload("poetry").unwrap();
        assert_eq!(fresh.question(0, 0).unwrap().prompt, "Which meter?");
        assert_eq!(
            registry.get("poetry").unwrap().question(0, 0).unwrap().prompt,
            "What meter?"
        );
    }

    #[test]
    fn reload_rejects_changed_id() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("poetry.toml");
        std::fs::write(&path, CUSTOM).unwrap();
        let registry = ScriptRegistry::from_dir(dir.path()).unwrap();

        std::fs::write(&path, CUSTOM.replace("id = \"poetry\"", "id = \"verse\"")).unwrap();
        assert!(registry.reload("poetry").is_err());
    }

    #[test]
    fn in_memory_scripts() {
        let registry = ScriptRegistry::new().with_script(tiny("mini"));
        assert_eq!(registry.list(), vec!["mini"]);
        assert_eq!(registry.reload("mini").unwrap(), tiny("mini"));
    }
}
