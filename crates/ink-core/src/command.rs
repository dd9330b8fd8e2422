use serde::{Deserialize, Serialize};

/// A canonical command symbol, independent of how the user phrased it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Pause the question flow.
    Breakpoint,
    /// Leave a breakpoint and continue.
    Resume,
    /// Snapshot the transcript to a versioned bundle.
    Bundle,
    /// Write the continuous save and the copyable summary.
    Export,
    /// Save a tagged excerpt.
    Excerpt,
    /// Return to category selection.
    Menu,
    /// Re-read the script definition.
    Reload,
    /// Clear all answers and start from the first question.
    Reset,
    /// Report session progress.
    Status,
    /// List the available commands.
    Help,
    /// Ask the collaborator to suggest an answer.
    Suggest,
    /// Ask the collaborator to analyze the transcript.
    Analyze,
    /// End the session without writing anything.
    Abandon,
    /// Record a chapter todo.
    Todo,
    /// Mark a todo as done.
    Resolve,
    /// Show two chapter drafts side by side.
    Compare,
    /// Record alternative versions for a todo.
    Alternatives,
    /// List recorded todos.
    Todos,
}

impl CommandKind {
    /// Every command, in default declaration order.
    pub const ALL: [CommandKind; 18] = [
        Self::Breakpoint,
        Self::Resume,
        Self::Bundle,
        Self::Export,
        Self::Excerpt,
        Self::Menu,
        Self::Reload,
        Self::Reset,
        Self::Status,
        Self::Help,
        Self::Suggest,
        Self::Analyze,
        Self::Abandon,
        Self::Todo,
        Self::Resolve,
        Self::Compare,
        Self::Alternatives,
        Self::Todos,
    ];

    /// Parse a command from its canonical name.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.name() == lower)
    }

    /// The canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Breakpoint => "breakpoint",
            Self::Resume => "resume",
            Self::Bundle => "bundle",
            Self::Export => "export",
            Self::Excerpt => "excerpt",
            Self::Menu => "menu",
            Self::Reload => "reload",
            Self::Reset => "reset",
            Self::Status => "status",
            Self::Help => "help",
            Self::Suggest => "suggest",
            Self::Analyze => "analyze",
            Self::Abandon => "abandon",
            Self::Todo => "todo",
            Self::Resolve => "resolve",
            Self::Compare => "compare",
            Self::Alternatives => "alternatives",
            Self::Todos => "todos",
        }
    }

    /// Commands that discard or move away from the current position.
    ///
    /// These are never executed on a fuzzy match.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Reset | Self::Menu | Self::Reload | Self::Abandon)
    }

    /// Commands whose trigger keyword is followed by an argument string.
    pub fn takes_args(&self) -> bool {
        matches!(
            self,
            Self::Excerpt | Self::Todo | Self::Resolve | Self::Compare | Self::Alternatives
        )
    }

    /// Whether `args` has the shape this command expects.
    ///
    /// A keyword followed by text of the wrong shape is ordinary prose, not
    /// a command. Bare keywords are accepted so the handler can show usage.
    pub fn accepts_args(&self, args: &str) -> bool {
        let args = args.trim();
        if args.is_empty() {
            return true;
        }
        match self {
            Self::Excerpt => {
                let tag = args.split_once(':').map_or(args, |(tag, _)| tag).trim();
                is_single_token(tag)
            }
            Self::Todo => args
                .split_once(char::is_whitespace)
                .is_some_and(|(_, text)| !text.trim().is_empty()),
            Self::Resolve | Self::Compare => is_single_token(args),
            Self::Alternatives => args
                .split_once('|')
                .is_some_and(|(id, _)| is_single_token(id.trim())),
            _ => true,
        }
    }

    /// Commands only offered by editing scripts.
    pub fn is_editing(&self) -> bool {
        matches!(
            self,
            Self::Todo | Self::Resolve | Self::Compare | Self::Alternatives | Self::Todos
        )
    }

    /// One-line usage text for help output.
    pub fn usage(&self) -> &'static str {
        match self {
            Self::Breakpoint => "pause the interview to adjust focus",
            Self::Resume => "continue after a breakpoint",
            Self::Bundle => "save a versioned snapshot of the transcript",
            Self::Export => "write the continuous save and a copyable summary",
            Self::Excerpt => "excerpt <tag>[: text]: save a tagged snippet",
            Self::Menu => "snapshot, then choose a category",
            Self::Reload => "snapshot, then re-read the script",
            Self::Reset => "clear all answers and start over",
            Self::Status => "show progress",
            Self::Help => "list commands",
            Self::Suggest => "ask for a suggested answer",
            Self::Analyze => "ask for an analysis of the answers so far",
            Self::Abandon => "end the session without saving",
            Self::Todo => "todo <chapter> <description>: record a change",
            Self::Resolve => "resolve <todo id>: mark a todo done",
            Self::Compare => "compare <chapter>: show the last two drafts",
            Self::Alternatives => "alternatives <todo id> | <text> | <text>: record versions",
            Self::Todos => "list todos",
        }
    }

    fn default_triggers(&self) -> &'static [&'static str] {
        match self {
            Self::Breakpoint => &["breakpoint", "pause", "hold on", "wait"],
            Self::Resume => &["resume", "continue", "carry on", "go on"],
            Self::Bundle => &["bundle", "save", "save this", "copy", "snapshot"],
            Self::Export => &["export", "finish", "wrap up", "summary"],
            Self::Excerpt => &["excerpt", "snippet"],
            Self::Menu => &["menu", "main menu", "categories"],
            Self::Reload => &["reload", "refresh script"],
            Self::Reset => &["reset", "start over"],
            Self::Status => &["status", "progress", "where am i"],
            Self::Help => &["help", "commands", "?"],
            Self::Suggest => &["suggest", "help me answer", "ideas"],
            Self::Analyze => &["analyze", "analysis", "review my answers"],
            Self::Abandon => &["abandon", "quit", "exit"],
            Self::Todo => &["todo"],
            Self::Resolve => &["resolve"],
            Self::Compare => &["compare"],
            Self::Alternatives => &["alternatives", "alts"],
            Self::Todos => &["todos", "list todos"],
        }
    }
}

fn is_single_token(s: &str) -> bool {
    !s.is_empty() && !s.contains(char::is_whitespace)
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A canonical command and the phrases that trigger it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// The canonical command.
    pub command: CommandKind,
    /// Trigger phrases and synonyms, compared case-insensitively.
    pub triggers: Vec<String>,
}

impl CommandSpec {
    /// Create a spec from a command and its triggers.
    pub fn new<I, S>(command: CommandKind, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command,
            triggers: triggers.into_iter().map(Into::into).collect(),
        }
    }

    /// A spec using the built-in synonyms for `command`.
    pub fn with_default_triggers(command: CommandKind) -> Self {
        Self::new(command, command.default_triggers().iter().copied())
    }
}

/// The ordered command vocabulary of one script.
///
/// Declaration order breaks ties during fuzzy matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandTable {
    specs: Vec<CommandSpec>,
}

impl CommandTable {
    /// Build a table from explicit specs.
    pub fn new(specs: Vec<CommandSpec>) -> Self {
        Self { specs }
    }

    /// The vocabulary shared by every interview script.
    pub fn standard() -> Self {
        Self::new(
            CommandKind::ALL
                .into_iter()
                .filter(|kind| !kind.is_editing())
                .map(CommandSpec::with_default_triggers)
                .collect(),
        )
    }

    /// The standard vocabulary plus the editing commands.
    pub fn editing() -> Self {
        Self::new(
            CommandKind::ALL
                .into_iter()
                .map(CommandSpec::with_default_triggers)
                .collect(),
        )
    }

    /// A table with only the given commands, using default triggers.
    pub fn of(kinds: &[CommandKind]) -> Self {
        Self::new(
            kinds
                .iter()
                .copied()
                .map(CommandSpec::with_default_triggers)
                .collect(),
        )
    }

    /// Iterate over the specs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.specs.iter()
    }

    /// Look up the spec for a command.
    pub fn get(&self, command: CommandKind) -> Option<&CommandSpec> {
        self.specs.iter().find(|s| s.command == command)
    }

    /// Whether the table offers a command.
    pub fn contains(&self, command: CommandKind) -> bool {
        self.get(command).is_some()
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
