//! Interview session management.
//!
//! `InterviewSession` drives one script: every utterance is matched against
//! the script's command table, and anything that is not a command becomes
//! an answer, a focus note or a menu choice depending on where the session
//! is. Commands that discard the current position (`menu`, `reload`, and
//! `reset` for scripts that ask for it) run behind a snapshot guard that
//! persists a bundle first and aborts untouched if that write fails.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use strsim::jaro_winkler;
use tracing::{debug, info, warn};

use ink_core::{
    Candidate, CommandKind, CommandMatcher, InterviewScript, MatchResult, ScriptRegistry,
};

use crate::artifact::ArtifactWriter;
use crate::bundle::{Bundle, BundleHistory};
use crate::collaborator::{Collaborator, OfflineCollaborator};
use crate::config::EngineConfig;
use crate::error::{InterviewError, InterviewResult};
use crate::import::parse_import;
use crate::reply::Reply;
use crate::state::{Answer, Cursor, SessionState, SessionStatus};
use crate::tracker::compare::side_by_side;
use crate::tracker::{Alternative, TodoList, TodoStatus};

const IMPORT_PROMPT: &str =
    "Do you have existing notes to import? Paste them here, or type `skip` to start fresh.";
const COMPLETE_PROMPT: &str =
    "That's every question. Type `export` to save, or `menu` to revisit a category.";
const SKIP_WORDS: &[&str] = &["skip", "no", "none", "nope", "n"];
const YES_WORDS: &[&str] = &["yes", "y", "yep", "yeah", "sure"];
const NO_WORDS: &[&str] = &["no", "n", "nope"];

/// Similarity at which a typed name counts as a category title.
const CATEGORY_SIMILARITY: f64 = 0.8;

/// A command waiting for a yes or no.
#[derive(Debug, Clone)]
struct PendingConfirmation {
    command: CommandKind,
    /// The fuzzy-matched utterance, taken as ordinary input on a no.
    utterance: Option<String>,
}

/// One running interview over a single script.
pub struct InterviewSession {
    script: InterviewScript,
    registry: Arc<ScriptRegistry>,
    writer: ArtifactWriter,
    matcher: CommandMatcher,
    collaborator: Box<dyn Collaborator>,
    state: SessionState,
    history: BundleHistory,
    todos: TodoList,
    alternatives: Vec<Alternative>,
    pending: Option<PendingConfirmation>,
}

impl InterviewSession {
    /// Start a session on `script_id`.
    ///
    /// Scripts that support import begin in [`SessionStatus::Init`]; all
    /// others start on their first question.
    pub fn new(
        registry: Arc<ScriptRegistry>,
        script_id: &str,
        config: &EngineConfig,
    ) -> InterviewResult<Self> {
        let script = registry.load(script_id)?;
        let status = if script.supports_import {
            SessionStatus::Init
        } else {
            SessionStatus::Active
        };
        let state = SessionState::new(&script.id, status);
        info!(script = %script.id, session = %state.session_id, "session started");

        Ok(Self {
            script,
            registry,
            writer: ArtifactWriter::new(config.root.clone()),
            matcher: CommandMatcher::new(config.matcher),
            collaborator: Box::new(OfflineCollaborator),
            state,
            history: BundleHistory::new(),
            todos: TodoList::new(),
            alternatives: Vec::new(),
            pending: None,
        })
    }

    /// Replace the collaborator used by `suggest` and `analyze`.
    pub fn with_collaborator(mut self, collaborator: impl Collaborator + 'static) -> Self {
        self.collaborator = Box::new(collaborator);
        self
    }

    /// Get the script being run.
    pub fn script(&self) -> &InterviewScript {
        &self.script
    }

    /// Get the session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Get the bundle history.
    pub fn history(&self) -> &BundleHistory {
        &self.history
    }

    /// Get the todo list.
    pub fn todos(&self) -> &TodoList {
        &self.todos
    }

    /// Alternatives written this session, oldest first.
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// The command awaiting confirmation, if any.
    pub fn pending_command(&self) -> Option<CommandKind> {
        self.pending.as_ref().map(|p| p.command)
    }

    /// Whether the session has ended.
    pub fn is_ended(&self) -> bool {
        self.state.status == SessionStatus::Ended
    }

    /// The greeting and first prompt.
    pub fn opening(&self) -> Reply {
        Reply::prompt(format!("{}\n\n{}", self.script.title, self.prompt_text()))
    }

    /// Process one utterance and return the engine's response.
    pub fn process(&mut self, input: &str) -> InterviewResult<Reply> {
        if self.is_ended() {
            return Err(InterviewError::SessionEnded);
        }
        let input = input.trim();
        if input.is_empty() {
            return Ok(Reply::prompt(self.prompt_text()));
        }

        if let Some(pending) = self.pending.take() {
            match confirmation(input) {
                Some(true) => {
                    debug!(command = %pending.command, "confirmed");
                    if pending.command == CommandKind::Abandon {
                        return Ok(self.end_session());
                    }
                    return self.execute(pending.command, "");
                }
                Some(false) => {
                    debug!(command = %pending.command, "declined");
                    return match pending.utterance {
                        Some(utterance) => self.accept_text(&utterance),
                        None => Ok(Reply::prompt(format!(
                            "Staying in the session.\n\n{}",
                            self.prompt_text()
                        ))),
                    };
                }
                None => {}
            }
        }

        if self.state.status == SessionStatus::Init {
            return self.handle_import(input);
        }

        if let Some(MatchResult::Matched { command, args, .. }) =
            self.matcher.resolve_exact(input, &self.script.commands)
        {
            return self.execute(command, &args);
        }

        if self.state.status == SessionStatus::Active && self.state.cursor == Cursor::Menu {
            if let Some(index) = self.find_category(input) {
                return Ok(self.enter_category(index));
            }
        }

        match self.matcher.resolve(input, &self.script.commands) {
            MatchResult::Matched { command, args, .. } => self.execute(command, &args),
            MatchResult::Ambiguous { candidates } => Ok(self.clarify(input, &candidates)),
            MatchResult::NoMatch => self.accept_text(input),
        }
    }

    fn execute(&mut self, command: CommandKind, args: &str) -> InterviewResult<Reply> {
        debug!(%command, args, "executing command");
        match command {
            CommandKind::Breakpoint => self.do_breakpoint(),
            CommandKind::Resume => Ok(self.do_resume()),
            CommandKind::Bundle => self.do_bundle(),
            CommandKind::Export => self.do_export(),
            CommandKind::Excerpt => self.do_excerpt(args),
            CommandKind::Menu => self.with_snapshot(|s| Ok(s.do_menu())),
            CommandKind::Reload => self.with_snapshot(Self::do_reload),
            CommandKind::Reset if self.script.reset_bundles => {
                self.with_snapshot(|s| Ok(s.do_reset()))
            }
            CommandKind::Reset => Ok(self.do_reset()),
            CommandKind::Status => Ok(self.do_status()),
            CommandKind::Help => Ok(self.do_help()),
            CommandKind::Suggest => self.do_suggest(),
            CommandKind::Analyze => self.do_analyze(),
            CommandKind::Abandon => Ok(self.do_abandon()),
            CommandKind::Todo => self.do_todo(args),
            CommandKind::Resolve => self.do_resolve(args),
            CommandKind::Compare => self.do_compare(args),
            CommandKind::Alternatives => self.do_alternatives(args),
            CommandKind::Todos => Ok(self.do_todos()),
        }
    }

    /// Persist a bundle, then run `action`. Nothing changes if the bundle
    /// cannot be written.
    fn with_snapshot(
        &mut self,
        action: impl FnOnce(&mut Self) -> InterviewResult<Reply>,
    ) -> InterviewResult<Reply> {
        let (version, path) = self.snapshot()?;
        Ok(action(self)?.after_snapshot(version, path))
    }

    fn snapshot(&mut self) -> InterviewResult<(u32, PathBuf)> {
        let bundle = Bundle::next_for(&self.state);
        let path = self
            .writer
            .write_bundle(&self.script, &self.state, &bundle)
            .inspect_err(|e| warn!(error = %e, version = bundle.version, "bundle not saved"))?;

        let version = bundle.version;
        self.state.bundle_version = version;
        self.history.push(bundle);
        info!(version, path = %path.display(), "bundle saved");
        Ok((version, path))
    }

    fn clarify(&mut self, input: &str, candidates: &[Candidate]) -> Reply {
        let kinds: Vec<CommandKind> = candidates.iter().map(|c| c.command).collect();
        let Some(top) = kinds.first().copied() else {
            return Reply::prompt(self.prompt_text());
        };
        self.pending = Some(PendingConfirmation {
            command: top,
            utterance: Some(input.to_string()),
        });

        let mut text = format!("Would you like to use the `{top}` command?");
        if let Some(second) = kinds.get(1) {
            text.push_str(&format!(" (Or did you mean `{second}`?)"));
        }
        text.push_str(" Answer yes or no.");
        Reply::clarify(kinds, text)
    }

    /// Handle input that is not a command.
    fn accept_text(&mut self, input: &str) -> InterviewResult<Reply> {
        match self.state.status {
            SessionStatus::Init => self.handle_import(input),
            SessionStatus::Paused => {
                self.state.focus_notes.push(input.to_string());
                Ok(Reply::info("Noted. Say `resume` when you're ready to continue."))
            }
            SessionStatus::Ended => Err(InterviewError::SessionEnded),
            SessionStatus::Active => match self.state.cursor {
                Cursor::Question { category, question } => {
                    self.record_answer(category, question, input)
                }
                Cursor::Menu => self
                    .find_category(input)
                    .map(|index| self.enter_category(index))
                    .ok_or_else(|| {
                        InterviewError::InvalidInput(format!("no category matches \"{input}\""))
                    }),
                Cursor::Complete => Err(InterviewError::UnknownCommand(input.to_string())),
            },
        }
    }

    fn record_answer(
        &mut self,
        category: usize,
        question: usize,
        text: &str,
    ) -> InterviewResult<Reply> {
        let q = self.script.question(category, question).ok_or_else(|| {
            InterviewError::InvalidInput("the cursor is outside the script".to_string())
        })?;
        self.state.record_answer(Answer {
            question_id: q.id.clone(),
            prompt: q.prompt.clone(),
            key: q.summary_key().to_string(),
            text: text.to_string(),
            answered_at: Utc::now(),
        });
        debug!(question = %q.id, "answer recorded");

        let next = self.script.next_position(category, question);
        self.state.cursor = next.map_or(Cursor::Complete, Cursor::at);

        let finished_category = next.is_none_or(|(c, _)| c != category);
        let mut text = String::new();
        if finished_category {
            if let Some(done) = self.script.categories.get(category) {
                text.push_str(&format!("{} complete.\n\n", done.title));
            }
        }
        text.push_str(&self.prompt_text());
        Ok(Reply::prompt(text))
    }

    fn handle_import(&mut self, input: &str) -> InterviewResult<Reply> {
        if let Some(MatchResult::Matched { command, args, .. }) =
            self.matcher.resolve_exact(input, &self.script.commands)
        {
            let before = self.state.status;
            if !matches!(
                command,
                CommandKind::Help | CommandKind::Status | CommandKind::Abandon
            ) {
                self.state.status = SessionStatus::Active;
            }
            let result = self.execute(command, &args);
            if result.is_err() {
                self.state.status = before;
            }
            return result;
        }

        let word = input.trim_end_matches(['.', '!']).to_lowercase();
        let preface = if SKIP_WORDS.contains(&word.as_str()) {
            "Starting fresh.".to_string()
        } else {
            self.import(input)
        };

        self.state.status = SessionStatus::Active;
        self.state.cursor = self.first_unanswered();
        info!(script = %self.script.id, "interview started");
        Ok(Reply::prompt(format!("{preface}\n\n{}", self.prompt_text())))
    }

    fn import(&mut self, text: &str) -> String {
        self.state.imported_text = Some(text.to_string());
        match parse_import(&self.script, text) {
            Ok(prefills) => {
                let mut count = 0;
                for prefill in prefills {
                    let Some(q) = self.script.question_by_id(&prefill.question_id) else {
                        continue;
                    };
                    self.state.record_answer(Answer {
                        question_id: q.id.clone(),
                        prompt: q.prompt.clone(),
                        key: q.summary_key().to_string(),
                        text: prefill.text,
                        answered_at: Utc::now(),
                    });
                    count += 1;
                }
                info!(count, "answers prefilled from import");
                format!("Imported your notes and prefilled {count} answer(s).")
            }
            Err(e) => {
                warn!(error = %e, "import kept as raw text");
                "I couldn't match your notes to any question, so I kept them as-is for reference."
                    .to_string()
            }
        }
    }

    fn first_unanswered(&self) -> Cursor {
        self.script
            .positions()
            .find(|(_, _, q)| !self.state.is_answered(&q.id))
            .map_or(Cursor::Complete, |(category, question, _)| Cursor::Question {
                category,
                question,
            })
    }

    fn find_category(&self, input: &str) -> Option<usize> {
        let key = input.trim().trim_end_matches('.').to_lowercase();
        let categories = &self.script.categories;

        if let Ok(n) = key.parse::<usize>() {
            return (1..=categories.len()).contains(&n).then(|| n - 1);
        }
        if let Some(i) = categories
            .iter()
            .position(|c| c.title.to_lowercase() == key || c.id.to_lowercase() == key)
        {
            return Some(i);
        }

        categories
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let title = jaro_winkler(&c.title.to_lowercase(), &key);
                let id = jaro_winkler(&c.id.to_lowercase(), &key);
                (i, title.max(id))
            })
            .filter(|(_, score)| *score >= CATEGORY_SIMILARITY)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    fn enter_category(&mut self, index: usize) -> Reply {
        let question = self.script.categories.get(index).map_or(0, |c| {
            c.questions
                .iter()
                .position(|q| !self.state.is_answered(&q.id))
                .unwrap_or(0)
        });
        self.state.cursor = Cursor::Question {
            category: index,
            question,
        };
        Reply::prompt(self.prompt_text())
    }

    // --- prompts ---

    fn prompt_text(&self) -> String {
        match self.state.status {
            SessionStatus::Init => IMPORT_PROMPT.to_string(),
            SessionStatus::Paused => {
                "Paused. Tell me what to focus on, or say `resume`.".to_string()
            }
            SessionStatus::Ended => "The session has ended.".to_string(),
            SessionStatus::Active => match self.state.cursor {
                Cursor::Question { category, question } => {
                    self.question_prompt(category, question)
                }
                Cursor::Menu => self.menu_text(),
                Cursor::Complete => COMPLETE_PROMPT.to_string(),
            },
        }
    }

    fn question_prompt(&self, category: usize, question: usize) -> String {
        let (Some(c), Some(q)) = (
            self.script.categories.get(category),
            self.script.question(category, question),
        ) else {
            return COMPLETE_PROMPT.to_string();
        };
        let mut text = format!(
            "[{} {}/{}] {}",
            c.title,
            question + 1,
            c.questions.len(),
            q.prompt
        );
        if let Some(answer) = self.state.answer_for(&q.id) {
            text.push_str(&format!("\n(current answer: {})", answer.text));
        }
        text
    }

    fn menu_text(&self) -> String {
        let mut text = String::from("Categories:\n");
        for (i, c) in self.script.categories.iter().enumerate() {
            let answered = c
                .questions
                .iter()
                .filter(|q| self.state.is_answered(&q.id))
                .count();
            text.push_str(&format!(
                "  {}. {} ({answered}/{} answered)\n",
                i + 1,
                c.title,
                c.questions.len()
            ));
        }
        text.push_str("Pick a category by number or name.");
        text
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(self.writer.root())
            .unwrap_or(path)
            .display()
            .to_string()
    }

    // --- command handlers ---

    fn do_breakpoint(&mut self) -> InterviewResult<Reply> {
        match self.state.status {
            SessionStatus::Active => {
                self.state.status = SessionStatus::Paused;
                info!("session paused");
                Ok(Reply::info(
                    "Paused. Tell me what you'd like to focus on, then say `resume`.",
                ))
            }
            SessionStatus::Paused => Ok(Reply::info("Already paused. Say `resume` to continue.")),
            _ => Err(InterviewError::InvalidInput(
                "there is nothing to pause".to_string(),
            )),
        }
    }

    fn do_resume(&mut self) -> Reply {
        if self.state.status != SessionStatus::Paused {
            return Reply::prompt(format!("Not paused.\n\n{}", self.prompt_text()));
        }
        self.state.status = SessionStatus::Active;
        info!(notes = self.state.focus_notes.len(), "session resumed");
        Reply::prompt(format!(
            "Resuming with {} focus note(s).\n\n{}",
            self.state.focus_notes.len(),
            self.prompt_text()
        ))
    }

    fn do_bundle(&mut self) -> InterviewResult<Reply> {
        let (version, path) = self.snapshot()?;
        Ok(Reply::saved(format!("Saved bundle v{version}."), vec![path]))
    }

    fn do_export(&mut self) -> InterviewResult<Reply> {
        let continuous = self.writer.write_continuous(&self.script, &self.state)?;
        let summary = self.writer.write_summary(&self.script, &self.state)?;
        let line = format!(
            "exported {} ({} answers)",
            self.relative(&continuous),
            self.state.answers().len()
        );
        self.writer
            .append_progress(&self.script, &self.state, &line)?;
        info!(script = %self.script.id, path = %continuous.display(), "session exported");

        let mut text = String::from("Exported.\n\n");
        if summary.text.is_empty() {
            text.push_str("(no answers yet)\n");
        } else {
            text.push_str(&summary.text);
        }
        let reply = Reply::saved(text, vec![continuous, summary.path]);

        if self.script.export_ends_session {
            self.state.status = SessionStatus::Ended;
            info!("session ended after export");
            return Ok(reply.ending());
        }
        Ok(reply)
    }

    fn do_excerpt(&mut self, args: &str) -> InterviewResult<Reply> {
        let (tag, text) = args.split_once(':').unwrap_or((args, ""));
        let (tag, text) = (tag.trim(), text.trim());
        if tag.is_empty() {
            return Err(InterviewError::InvalidInput(
                "usage: excerpt <tag>[: text]".to_string(),
            ));
        }
        let text = if text.is_empty() {
            self.state
                .last_answer()
                .map(|a| a.text.clone())
                .ok_or_else(|| {
                    InterviewError::InvalidInput("there is no answer to excerpt yet".to_string())
                })?
        } else {
            text.to_string()
        };

        let path = self
            .writer
            .write_tagged_excerpt(&self.script, &self.state, tag, &text)?;
        Ok(Reply::saved(format!("Excerpt saved under `{tag}`."), vec![path]))
    }

    fn do_menu(&mut self) -> Reply {
        self.state.cursor = Cursor::Menu;
        if self.state.status == SessionStatus::Paused {
            self.state.status = SessionStatus::Active;
        }
        Reply::prompt(self.menu_text())
    }

    fn do_reload(&mut self) -> InterviewResult<Reply> {
        let fresh = self.registry.reload(&self.script.id)?;
        let current = self
            .state
            .cursor
            .position()
            .and_then(|(c, q)| self.script.question(c, q))
            .map(|q| q.id.clone());
        let was_menu = self.state.cursor == Cursor::Menu;

        self.script = fresh;
        self.state.cursor = match current.and_then(|id| self.script.find_question(&id)) {
            Some(position) => Cursor::at(position),
            None if was_menu => Cursor::Menu,
            None => self.first_unanswered(),
        };
        info!(script = %self.script.id, "script reloaded");
        Ok(Reply::prompt(format!("Script reloaded.\n\n{}", self.prompt_text())))
    }

    fn do_reset(&mut self) -> Reply {
        self.state.reset();
        self.state.status = SessionStatus::Active;
        info!(script = %self.script.id, "answers reset");
        Reply::prompt(format!("Answers cleared.\n\n{}", self.prompt_text()))
    }

    fn do_status(&self) -> Reply {
        let position = match self.state.cursor {
            Cursor::Question { category, question } => {
                let title = self
                    .script
                    .categories
                    .get(category)
                    .map_or("?", |c| c.title.as_str());
                format!("{title}, question {}", question + 1)
            }
            Cursor::Menu => "category menu".to_string(),
            Cursor::Complete => "all questions asked".to_string(),
        };

        let mut text = format!("Script: {} ({})\n", self.script.title, self.script.id);
        text.push_str(&format!("State: {}\n", self.state.status));
        text.push_str(&format!("Position: {position}\n"));
        text.push_str(&format!(
            "Answered: {} of {}\n",
            self.state.answers().len(),
            self.script.question_count()
        ));
        text.push_str(&format!("Bundles: {}\n", self.state.bundle_version));
        if self.script.editing {
            text.push_str(&format!(
                "Todos: {} open of {}\n",
                self.todos.open_count(),
                self.todos.len()
            ));
        }
        Reply::info(text)
    }

    fn do_help(&self) -> Reply {
        let mut text = String::from("Commands:\n");
        for spec in self.script.commands.iter() {
            text.push_str(&format!(
                "  {:<34} {}  [{}]\n",
                argument_syntax(spec.command),
                spec.command.usage(),
                spec.triggers.join(", ")
            ));
        }
        text.push_str("Anything else is taken as your answer.");
        Reply::info(text)
    }

    fn do_suggest(&mut self) -> InterviewResult<Reply> {
        let q = self
            .state
            .cursor
            .position()
            .and_then(|(c, q)| self.script.question(c, q))
            .ok_or_else(|| {
                InterviewError::InvalidInput("there is no current question".to_string())
            })?;
        let transcript = self.state.transcript_markdown();
        let suggestion = self
            .collaborator
            .answer(&q.prompt, &transcript)
            .map_err(InterviewError::Collaborator)?;
        Ok(Reply::info(suggestion))
    }

    fn do_analyze(&mut self) -> InterviewResult<Reply> {
        let transcript = self.state.transcript_markdown();
        let analysis = self
            .collaborator
            .analyze(&transcript)
            .map_err(InterviewError::Collaborator)?;
        Ok(Reply::info(analysis))
    }

    fn do_abandon(&mut self) -> Reply {
        let answered = self.state.answers().len();
        if answered == 0 {
            return self.end_session();
        }
        self.pending = Some(PendingConfirmation {
            command: CommandKind::Abandon,
            utterance: None,
        });
        Reply::clarify(
            vec![CommandKind::Abandon],
            format!(
                "Abandon the session? Nothing more will be written for your {answered} \
                 answer(s); `export` or `bundle` first to keep them. Answer yes or no."
            ),
        )
    }

    fn end_session(&mut self) -> Reply {
        self.state.status = SessionStatus::Ended;
        info!(script = %self.script.id, "session abandoned");
        Reply::ended("Session abandoned. Nothing more will be written.")
    }

    fn do_todo(&mut self, args: &str) -> InterviewResult<Reply> {
        let (chapter, description) = split_first_word(args);
        if chapter.is_empty() || description.is_empty() {
            return Err(InterviewError::InvalidInput(
                "usage: todo <chapter> <description>".to_string(),
            ));
        }

        let first_free = self.todos.next_ordinal(chapter);
        let (todo, path) = self.writer.append_new_todo(
            &self.script,
            &self.state,
            chapter,
            first_free,
            description,
        )?;
        info!(todo = %todo.id, "todo created");
        let text = format!("Todo {} added for chapter {}.", todo.id, todo.chapter_id);
        self.todos.add(todo);
        Ok(Reply::saved(text, vec![path]))
    }

    fn do_resolve(&mut self, args: &str) -> InterviewResult<Reply> {
        let id = args.trim();
        if id.is_empty() {
            return Err(InterviewError::InvalidInput(
                "usage: resolve <todo id>".to_string(),
            ));
        }
        self.todos.check_resolvable(id)?;

        let mut done = self.todos.require(id)?.clone();
        done.status = TodoStatus::Done;
        let todo_path = self.writer.append_todo_line(
            &self.script,
            &self.state,
            &done.chapter_id,
            &format!("{} (resolved)", done.to_markdown_line()),
        )?;
        let progress_path = self.writer.append_progress(
            &self.script,
            &self.state,
            &format!("resolved todo {}: {}", done.id, done.description),
        )?;
        self.todos.resolve(id)?;

        info!(todo = %done.id, "todo resolved");
        Ok(Reply::saved(
            format!("Todo {} resolved.", done.id),
            vec![todo_path, progress_path],
        ))
    }

    fn do_compare(&mut self, args: &str) -> InterviewResult<Reply> {
        let chapter = args.trim();
        if chapter.is_empty() {
            return Err(InterviewError::InvalidInput(
                "usage: compare <chapter>".to_string(),
            ));
        }
        let drafts = self.writer.read_drafts(&self.script, &self.state, chapter)?;
        let [.., before, after] = drafts.as_slice() else {
            return Err(InterviewError::NotEnoughDrafts {
                chapter: chapter.to_string(),
                found: drafts.len(),
            });
        };
        Ok(Reply::info(format!(
            "Chapter {chapter}: {} -> {}\n\n{}",
            before.name,
            after.name,
            side_by_side(before, after)
        )))
    }

    fn do_alternatives(&mut self, args: &str) -> InterviewResult<Reply> {
        let mut parts = args.split('|');
        let todo_id = parts.next().unwrap_or("").trim().to_string();
        let texts: Vec<String> = parts.map(str::to_string).collect();
        if todo_id.is_empty() || texts.is_empty() {
            return Err(InterviewError::InvalidInput(
                "usage: alternatives <todo id> | <version A> | <version B> ...".to_string(),
            ));
        }
        self.todos.require(&todo_id)?;

        let sequence = self
            .alternatives
            .iter()
            .filter(|a| a.todo_id == todo_id)
            .count() as u32
            + 1;
        let alternative = Alternative::new(&todo_id, sequence, texts)?;
        let path = self
            .writer
            .append_alternative(&self.script, &self.state, &alternative)?;
        self.todos.link_alternative(&todo_id, &alternative.id)?;

        info!(alternative = %alternative.id, "alternatives recorded");
        let reply = Reply::saved(
            format!(
                "Recorded {} version(s) for todo {todo_id} as {}.",
                alternative.versions.len(),
                alternative.id
            ),
            vec![path],
        );
        self.alternatives.push(alternative);
        Ok(reply)
    }

    fn do_todos(&self) -> Reply {
        if self.todos.is_empty() {
            return Reply::info("No todos yet. Add one with `todo <chapter> <description>`.");
        }
        let mut text = String::from("Todos:\n");
        for todo in self.todos.all() {
            text.push_str(&format!(
                "  {} [{}] {}",
                todo.id, todo.status, todo.description
            ));
            if let Some(alt) = &todo.linked_alternative_id {
                text.push_str(&format!(" (alternatives: {alt})"));
            }
            text.push('\n');
        }
        Reply::info(text)
    }
}

/// `Some(true)` for yes, `Some(false)` for no, `None` for anything else.
fn confirmation(input: &str) -> Option<bool> {
    let word = input.trim_end_matches(['.', '!']).to_lowercase();
    if YES_WORDS.contains(&word.as_str()) {
        Some(true)
    } else if NO_WORDS.contains(&word.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn split_first_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (s, ""),
    }
}

fn argument_syntax(command: CommandKind) -> String {
    match command {
        CommandKind::Excerpt => "excerpt <tag>[: text]".to_string(),
        CommandKind::Todo => "todo <chapter> <description>".to_string(),
        CommandKind::Resolve => "resolve <todo id>".to_string(),
        CommandKind::Compare => "compare <chapter>".to_string(),
        CommandKind::Alternatives => "alternatives <todo id> | <A> | <B>".to_string(),
        other => other.name().to_string(),
    }
}
