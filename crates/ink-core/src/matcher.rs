//! Maps freeform utterances to canonical commands.
//!
//! Resolution runs in two stages. An exact, case-insensitive trigger match
//! always wins with confidence 1.0. Otherwise every trigger is scored by
//! token overlap and the best command above the threshold is returned,
//! unless it is destructive, in which case the caller must confirm.

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use tracing::debug;

use crate::command::{CommandKind, CommandTable};

/// Tunables for fuzzy matching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum score for a fuzzy match to resolve without confirmation.
    pub threshold: f64,
    /// Scores below this are not offered as candidates at all.
    pub candidate_floor: f64,
    /// Jaro-Winkler similarity at which two tokens count as the same word.
    pub typo_similarity: f64,
    /// How many candidates an ambiguous result carries.
    pub max_candidates: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            candidate_floor: 0.25,
            typo_similarity: 0.9,
            max_candidates: 2,
        }
    }
}

impl MatcherConfig {
    /// Set the resolve threshold (clamped to 0.0-1.0).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the candidate floor (clamped to 0.0-1.0).
    pub fn with_candidate_floor(mut self, floor: f64) -> Self {
        self.candidate_floor = floor.clamp(0.0, 1.0);
        self
    }

    /// Set the typo similarity (clamped to 0.0-1.0).
    pub fn with_typo_similarity(mut self, similarity: f64) -> Self {
        self.typo_similarity = similarity.clamp(0.0, 1.0);
        self
    }

    /// Clamp every field into its valid range.
    pub fn clamped(self) -> Self {
        Self {
            threshold: self.threshold.clamp(0.0, 1.0),
            candidate_floor: self.candidate_floor.clamp(0.0, 1.0),
            typo_similarity: self.typo_similarity.clamp(0.0, 1.0),
            max_candidates: self.max_candidates.max(1),
        }
    }
}

/// A possible command for an ambiguous utterance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// The command.
    pub command: CommandKind,
    /// Token-overlap score (0.0-1.0).
    pub score: f64,
}

/// Outcome of matching one utterance.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    /// The utterance resolves to a command.
    Matched {
        /// The resolved command.
        command: CommandKind,
        /// Text after the trigger keyword, for argument commands.
        args: String,
        /// 1.0 for exact matches, the overlap score otherwise.
        confidence: f64,
        /// Whether a trigger phrase matched exactly.
        exact: bool,
    },
    /// The utterance looks like a command but needs confirmation.
    Ambiguous {
        /// Best candidates, highest score first.
        candidates: Vec<Candidate>,
    },
    /// The utterance is not a command.
    NoMatch,
}

impl MatchResult {
    fn exact(command: CommandKind, args: &str) -> Self {
        Self::Matched {
            command,
            args: args.to_string(),
            confidence: 1.0,
            exact: true,
        }
    }

    /// The resolved command, if matched.
    pub fn command(&self) -> Option<CommandKind> {
        match self {
            Self::Matched { command, .. } => Some(*command),
            _ => None,
        }
    }

    /// The top candidate, if ambiguous.
    pub fn top_candidate(&self) -> Option<&Candidate> {
        match self {
            Self::Ambiguous { candidates } => candidates.first(),
            _ => None,
        }
    }

    /// Whether the result needs a clarifying question.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous { .. })
    }
}

/// Resolves utterances against a [`CommandTable`].
#[derive(Debug, Clone, Default)]
pub struct CommandMatcher {
    config: MatcherConfig,
}

impl CommandMatcher {
    /// Create a matcher.
    pub fn new(config: MatcherConfig) -> Self {
        Self {
            config: config.clamped(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Resolve an utterance, trying exact triggers first, then token overlap.
    pub fn resolve(&self, utterance: &str, table: &CommandTable) -> MatchResult {
        if let Some(result) = self.resolve_exact(utterance, table) {
            return result;
        }
        let result = self.resolve_fuzzy(utterance, table);
        debug!(utterance, ?result, "fuzzy command match");
        result
    }

    /// Resolve an utterance against exact triggers only.
    pub fn resolve_exact(&self, utterance: &str, table: &CommandTable) -> Option<MatchResult> {
        let text = utterance.trim().trim_start_matches('/').trim_start();
        if text.is_empty() {
            return None;
        }
        let lower = text.to_lowercase();
        let bare = lower.trim_end_matches(['.', '!', '?']).trim_end();

        for spec in table.iter() {
            for trigger in &spec.triggers {
                let trigger = trigger.trim().to_lowercase();
                if trigger.is_empty() {
                    continue;
                }
                if spec.command.takes_args() {
                    if let Some(args) = strip_keyword(text, &trigger)
                        .filter(|args| spec.command.accepts_args(args))
                    {
                        return Some(MatchResult::exact(spec.command, args));
                    }
                } else if lower == trigger || bare == trigger {
                    return Some(MatchResult::exact(spec.command, ""));
                }
            }
        }
        None
    }

    fn resolve_fuzzy(&self, utterance: &str, table: &CommandTable) -> MatchResult {
        let words = tokenize(utterance);
        if words.is_empty() {
            return MatchResult::NoMatch;
        }

        let mut candidates: Vec<Candidate> = table
            .iter()
            .filter(|spec| !spec.command.takes_args())
            .filter_map(|spec| {
                let score = spec
                    .triggers
                    .iter()
                    .map(|trigger| self.overlap(&words, &tokenize(trigger)))
                    .fold(0.0_f64, f64::max);
                (score > 0.0 && score >= self.config.candidate_floor).then_some(Candidate {
                    command: spec.command,
                    score,
                })
            })
            .collect();

        // Stable sort keeps declaration order for equal scores.
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.truncate(self.config.max_candidates);

        let Some(best) = candidates.first().copied() else {
            return MatchResult::NoMatch;
        };
        if best.score >= self.config.threshold && !best.command.is_destructive() {
            return MatchResult::Matched {
                command: best.command,
                args: String::new(),
                confidence: best.score,
                exact: false,
            };
        }
        MatchResult::Ambiguous { candidates }
    }

    /// The lesser of the two coverage fractions between utterance and trigger.
    fn overlap(&self, words: &[String], trigger: &[String]) -> f64 {
        if words.is_empty() || trigger.is_empty() {
            return 0.0;
        }
        let trigger_found = trigger.iter().filter(|t| self.contains(words, t)).count();
        let words_found = words.iter().filter(|w| self.contains(trigger, w)).count();
        let trigger_coverage = trigger_found as f64 / trigger.len() as f64;
        let word_coverage = words_found as f64 / words.len() as f64;
        trigger_coverage.min(word_coverage)
    }

    fn contains(&self, haystack: &[String], needle: &str) -> bool {
        haystack.iter().any(|token| {
            token == needle
                || (token.chars().count() >= 4
                    && needle.chars().count() >= 4
                    && jaro_winkler(token, needle) >= self.config.typo_similarity)
        })
    }
}

/// Lowercased words with surrounding punctuation removed.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// If `text` starts with the words of `keyword`, return the remainder.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let mut rest = text;
    for word in keyword.split_whitespace() {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if rest[..end].to_lowercase() != word {
            return None;
        }
        rest = &rest[end..];
    }
    Some(rest.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn matcher() -> CommandMatcher {
        CommandMatcher::new(MatcherConfig::default())
    }

    fn small_table() -> CommandTable {
        CommandTable::of(&[
            CommandKind::Bundle,
            CommandKind::Breakpoint,
            CommandKind::Reset,
        ])
    }

    #[test]
    fn exact_trigger_resolves() {
        let result = matcher().resolve("breakpoint", &CommandTable::standard());
        assert_eq!(
            result,
            MatchResult::Matched {
                command: CommandKind::Breakpoint,
                args: String::new(),
                confidence: 1.0,
                exact: true,
            }
        );
    }

    #[test]
    fn exact_is_case_insensitive_and_ignores_punctuation() {
        let m = matcher();
        let table = CommandTable::standard();
        assert_eq!(m.resolve("BUNDLE", &table).command(), Some(CommandKind::Bundle));
        assert_eq!(m.resolve("Save this!", &table).command(), Some(CommandKind::Bundle));
        assert_eq!(m.resolve("/menu", &table).command(), Some(CommandKind::Menu));
        assert_eq!(m.resolve("?", &table).command(), Some(CommandKind::Help));
    }

    #[test]
    fn exact_destructive_resolves_without_confirmation() {
        let result = matcher().resolve("reset", &CommandTable::standard());
        assert_eq!(result.command(), Some(CommandKind::Reset));
    }

    #[test]
    fn save_for_later_is_ambiguous_bundle() {
        let result = matcher().resolve("Let's save this for later", &small_table());
        assert!(result.is_ambiguous());
        assert_eq!(result.top_candidate().unwrap().command, CommandKind::Bundle);
    }

    #[test]
    fn overlap_above_threshold_resolves() {
        let result = matcher().resolve("please pause", &CommandTable::standard());
        assert_eq!(
            result,
            MatchResult::Matched {
                command: CommandKind::Breakpoint,
                args: String::new(),
                confidence: 0.5,
                exact: false,
            }
        );
    }

    #[test]
    fn typo_resolves_fuzzily() {
        let result = matcher().resolve("bundel", &CommandTable::standard());
        match result {
            MatchResult::Matched { command, exact, .. } => {
                assert_eq!(command, CommandKind::Bundle);
                assert!(!exact);
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn destructive_typo_needs_confirmation() {
        let result = matcher().resolve("reest", &CommandTable::standard());
        assert!(result.is_ambiguous());
        assert_eq!(result.top_candidate().unwrap().command, CommandKind::Reset);
    }

    #[test]
    fn fuzzy_menu_never_auto_executes() {
        let result = matcher().resolve("go back to the main menu", &CommandTable::standard());
        assert!(result.command().is_none());
    }

    #[test]
    fn plain_answer_is_no_match() {
        let m = matcher();
        let table = CommandTable::standard();
        assert_eq!(m.resolve("Elena Vasquez", &table), MatchResult::NoMatch);
        assert_eq!(
            m.resolve("She wants to save her brother", &table),
            MatchResult::NoMatch
        );
    }

    #[test]
    fn argument_commands_need_leading_keyword() {
        let m = matcher();
        let table = CommandTable::editing();
        assert_eq!(
            m.resolve("todo 3 Use stronger delivery", &table),
            MatchResult::Matched {
                command: CommandKind::Todo,
                args: "3 Use stronger delivery".to_string(),
                confidence: 1.0,
                exact: true,
            }
        );
        assert_eq!(m.resolve("I have a todo for you", &table), MatchResult::NoMatch);
    }

    #[test]
    fn prose_after_argument_keyword_is_not_a_command() {
        let m = matcher();
        let table = CommandTable::editing();
        for answer in [
            "Excerpt from a letter she wrote",
            "Compare the opening to chapter two, it drags",
            "Resolve the fight before the wedding",
            "Alternatives are worse than the draft",
        ] {
            assert_eq!(m.resolve(answer, &table), MatchResult::NoMatch, "{answer}");
        }
    }

    #[test]
    fn argument_shapes_that_resolve() {
        let m = matcher();
        let table = CommandTable::editing();
        for (utterance, command) in [
            ("excerpt hooks", CommandKind::Excerpt),
            ("excerpt hooks: A line to keep", CommandKind::Excerpt),
            ("compare 3", CommandKind::Compare),
            ("resolve 3.1", CommandKind::Resolve),
            ("alternatives 3.1 | She left. | She fled.", CommandKind::Alternatives),
            ("todo 3 Use stronger delivery", CommandKind::Todo),
        ] {
            assert_eq!(m.resolve(utterance, &table).command(), Some(command), "{utterance}");
        }
    }

    #[test]
    fn argument_keyword_must_be_whole_word() {
        let m = matcher();
        let table = CommandTable::editing();
        assert_eq!(m.resolve("todos", &table).command(), Some(CommandKind::Todos));
        assert!(m.resolve_exact("todolist", &table).is_none());
    }

    #[test]
    fn ties_follow_declaration_order() {
        let m = matcher();
        let table = CommandTable::new(vec![
            crate::CommandSpec::new(CommandKind::Status, ["show notes"]),
            crate::CommandSpec::new(CommandKind::Help, ["show commands"]),
        ]);
        let result = m.resolve("show", &table);
        let MatchResult::Matched { command, .. } = result else {
            panic!("expected match");
        };
        assert_eq!(command, CommandKind::Status);
    }

    #[test]
    fn candidates_are_capped() {
        let m = CommandMatcher::new(MatcherConfig {
            max_candidates: 1,
            candidate_floor: 0.1,
            ..MatcherConfig::default()
        });
        let result = m.resolve("Let's save this and wait for later", &small_table());
        let MatchResult::Ambiguous { candidates } = result else {
            panic!("expected ambiguous");
        };
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn config_clamps() {
        let cfg = MatcherConfig::default()
            .with_threshold(7.0)
            .with_candidate_floor(-1.0)
            .with_typo_similarity(2.0);
        assert_eq!(cfg.threshold, 1.0);
        assert_eq!(cfg.candidate_floor, 0.0);
        assert_eq!(cfg.typo_similarity, 1.0);
    }

    #[test]
    fn strip_keyword_preserves_case() {
        assert_eq!(
            strip_keyword("Excerpt Opening  The rain", "excerpt"),
            Some("Opening  The rain")
        );
        assert_eq!(strip_keyword("list todos", "list todos"), Some(""));
        assert_eq!(strip_keyword("list", "list todos"), None);
    }

    proptest! {
        #[test]
        fn exact_triggers_ignore_threshold(threshold in 0.0f64..=1.0, idx in 0usize..13) {
            let table = CommandTable::standard();
            let spec = table.iter().nth(idx).unwrap();
            let m = CommandMatcher::new(MatcherConfig::default().with_threshold(threshold));
            for trigger in &spec.triggers {
                prop_assert_eq!(m.resolve(trigger, &table).command(), Some(spec.command));
            }
        }
    }
}
