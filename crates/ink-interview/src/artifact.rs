//! Persists session artifacts under the story project root.
//!
//! Every path comes from the script's [`ink_core::PathTemplates`] rendered
//! with the session's metadata. Private artifacts (continuous saves and
//! summaries) are rewritten whole. Files other sessions may also write to
//! are only ever appended to, under an exclusive file lock.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use ink_core::{InterviewScript, TemplateVars};
use tracing::{debug, warn};

use crate::bundle::Bundle;
use crate::error::{InterviewError, InterviewResult};
use crate::state::SessionState;
use crate::tracker::Alternative;
use crate::tracker::todos::{Todo, ordinal_in_line};

/// A rendered summary and where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// The written file.
    pub path: PathBuf,
    /// Copyable `Key: value` text block.
    pub text: String,
}

/// One draft file read for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// File name within the drafts directory.
    pub name: String,
    /// File contents.
    pub text: String,
}

/// Writes artifacts relative to a root directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    /// Create a writer rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, template: &str, vars: &TemplateVars) -> InterviewResult<PathBuf> {
        Ok(self.root.join(vars.render(template)?))
    }

    fn vars(state: &SessionState) -> TemplateVars {
        TemplateVars::new(&state.script_id, state.timestamp_slug())
    }

    /// Write the whole session to its continuous-save file.
    pub fn write_continuous(
        &self,
        script: &InterviewScript,
        state: &SessionState,
    ) -> InterviewResult<PathBuf> {
        let path = self.resolve(&script.paths.continuous, &Self::vars(state))?;

        let mut text = format!("# {}\n\n", script.title);
        text.push_str(&format!("- Session: {}\n", state.session_id));
        text.push_str(&format!("- Started: {}\n\n", state.started_at.to_rfc3339()));
        text.push_str(&state.transcript_markdown());
        if !state.focus_notes.is_empty() {
            text.push_str("## Focus notes\n\n");
            for note in &state.focus_notes {
                text.push_str(&format!("- {note}\n"));
            }
            text.push('\n');
        }

        write_file(&path, &text)?;
        debug!(path = %path.display(), "continuous save written");
        Ok(path)
    }

    /// Write a bundle to a fresh file. An existing file is never replaced;
    /// on collision the session's short id is appended to the file stem.
    pub fn write_bundle(
        &self,
        script: &InterviewScript,
        state: &SessionState,
        bundle: &Bundle,
    ) -> InterviewResult<PathBuf> {
        let vars = Self::vars(state).version(bundle.version);
        let path = self.resolve(&script.paths.bundle, &vars)?;
        let text = bundle.to_markdown();
        ensure_parent(&path)?;

        match create_new(&path, &text) {
            Ok(()) => Ok(path),
            Err(InterviewError::Persistence { source, .. })
                if source.kind() == io::ErrorKind::AlreadyExists =>
            {
                let alt = with_suffix(&path, &state.short_id());
                warn!(
                    taken = %path.display(),
                    path = %alt.display(),
                    "bundle file exists, writing with session suffix"
                );
                create_new(&alt, &text)?;
                Ok(alt)
            }
            Err(e) => Err(e),
        }
    }

    /// Append a tagged excerpt under its tag's file.
    pub fn write_tagged_excerpt(
        &self,
        script: &InterviewScript,
        state: &SessionState,
        tag: &str,
        text: &str,
    ) -> InterviewResult<PathBuf> {
        let path = self.resolve(&script.paths.excerpt, &Self::vars(state).tag(tag))?;
        let entry = format!(
            "## {} ({})\n\n{}\n\n",
            script.id,
            state.timestamp_slug(),
            text.trim_end()
        );
        append_locked(&path, &entry)?;
        Ok(path)
    }

    /// Render the copyable summary and write it to the summary file.
    pub fn write_summary(
        &self,
        script: &InterviewScript,
        state: &SessionState,
    ) -> InterviewResult<Summary> {
        let text = render_summary(state);
        let path = self.resolve(&script.paths.summary, &Self::vars(state))?;
        write_file(&path, &format!("# {} summary\n\n{text}", script.title))?;
        Ok(Summary { path, text })
    }

    /// Append one line to a chapter's shared todo file.
    pub fn append_todo_line(
        &self,
        script: &InterviewScript,
        state: &SessionState,
        chapter: &str,
        line: &str,
    ) -> InterviewResult<PathBuf> {
        let path = self.resolve(&script.paths.todos, &Self::vars(state).chapter(chapter))?;
        append_locked(&path, &format!("{line}\n"))?;
        Ok(path)
    }

    /// Append a new open todo to the chapter's shared todo file.
    ///
    /// The ordinal is at least `first_free` and past every id already in
    /// the file, so sessions sharing a chapter never reuse an id. Reading
    /// the file and appending happen under the same lock.
    pub fn append_new_todo(
        &self,
        script: &InterviewScript,
        state: &SessionState,
        chapter: &str,
        first_free: u32,
        description: &str,
    ) -> InterviewResult<(Todo, PathBuf)> {
        let path = self.resolve(&script.paths.todos, &Self::vars(state).chapter(chapter))?;
        ensure_parent(&path)?;
        let mut lock =
            AppendLock::acquire(&path).map_err(|e| InterviewError::persistence(&path, e))?;

        let mut existing = String::new();
        lock.file
            .read_to_string(&mut existing)
            .map_err(|e| InterviewError::persistence(&path, e))?;
        let ordinal = existing
            .lines()
            .filter_map(|line| ordinal_in_line(line, chapter))
            .max()
            .map_or(first_free, |taken| first_free.max(taken + 1));

        let todo = Todo::new(chapter, ordinal, description);
        lock.append(&format!("{}\n", todo.to_markdown_line()))
            .map_err(|e| InterviewError::persistence(&path, e))?;
        Ok((todo, path))
    }

    /// Append an alternative table section to its todo's file.
    pub fn append_alternative(
        &self,
        script: &InterviewScript,
        state: &SessionState,
        alternative: &Alternative,
    ) -> InterviewResult<PathBuf> {
        let vars = Self::vars(state).todo_id(&alternative.todo_id);
        let path = self.resolve(&script.paths.alternatives, &vars)?;
        append_locked(&path, &alternative.to_markdown())?;
        Ok(path)
    }

    /// Append a line to the shared progress log.
    pub fn append_progress(
        &self,
        script: &InterviewScript,
        state: &SessionState,
        line: &str,
    ) -> InterviewResult<PathBuf> {
        let path = self.resolve(&script.paths.progress, &Self::vars(state))?;
        let stamp = chrono::Utc::now().format("%Y-%m-%d %H:%M");
        append_locked(&path, &format!("- {stamp} [{}] {line}\n", script.id))?;
        Ok(path)
    }

    /// Every `*.md` draft of a chapter, sorted by file name.
    pub fn read_drafts(
        &self,
        script: &InterviewScript,
        state: &SessionState,
        chapter: &str,
    ) -> InterviewResult<Vec<Draft>> {
        let dir = self.resolve(&script.paths.drafts, &Self::vars(state).chapter(chapter))?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| InterviewError::persistence(&dir, e))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
            .collect();
        paths.sort();

        paths
            .into_iter()
            .map(|path| {
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| InterviewError::persistence(&path, e))?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Ok(Draft { name, text })
            })
            .collect()
    }
}

/// `Key: value` lines drawn from the answers, in elicitation order.
pub fn render_summary(state: &SessionState) -> String {
    let mut out = String::new();
    for answer in state.answers() {
        let value = answer.text.lines().collect::<Vec<_>>().join(" / ");
        out.push_str(&format!("{}: {}\n", answer.key, value.trim()));
    }
    out
}

fn ensure_parent(path: &Path) -> InterviewResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| InterviewError::persistence(parent, e))?;
    }
    Ok(())
}

fn write_file(path: &Path, text: &str) -> InterviewResult<()> {
    ensure_parent(path)?;
    std::fs::write(path, text).map_err(|e| InterviewError::persistence(path, e))
}

fn create_new(path: &Path, text: &str) -> InterviewResult<()> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| InterviewError::persistence(path, e))?;
    fill_new(file, path, text)
}

/// Write `text` into the freshly created `path`, removing it again if the
/// write fails so no partial file is left behind.
fn fill_new(mut out: impl Write, path: &Path, text: &str) -> InterviewResult<()> {
    match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        Ok(()) => Ok(()),
        Err(e) => {
            drop(out);
            if let Err(cleanup) = std::fs::remove_file(path) {
                warn!(path = %path.display(), error = %cleanup, "partial file not removed");
            }
            Err(InterviewError::persistence(path, e))
        }
    }
}

/// `dir/name_v1.md` with suffix `ab12` becomes `dir/name_v1-ab12.md`.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}-{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{suffix}"),
    };
    path.with_file_name(name)
}

/// Exclusive lock on a shared file, released when dropped.
struct AppendLock {
    file: File,
}

impl AppendLock {
    fn acquire(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(path)?;
        FileExt::lock_exclusive(&file)?;
        Ok(Self { file })
    }

    fn append(&mut self, text: &str) -> io::Result<()> {
        self.file.write_all(text.as_bytes())?;
        self.file.flush()
    }
}

impl Drop for AppendLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn append_locked(path: &Path, text: &str) -> InterviewResult<()> {
    ensure_parent(path)?;
    let mut lock = AppendLock::acquire(path).map_err(|e| InterviewError::persistence(path, e))?;
    lock.append(text)
        .map_err(|e| InterviewError::persistence(path, e))
}
