//! Chapter todo tracking.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InterviewError, InterviewResult};

/// Whether a todo still needs work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    /// Still to do.
    Open,
    /// Resolved.
    Done,
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Done => write!(f, "DONE"),
        }
    }
}

/// An actionable revision item for one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// `{chapter}.{ordinal}`, e.g. `3.1`.
    pub id: String,
    /// Chapter the todo belongs to.
    pub chapter_id: String,
    /// What needs doing.
    pub description: String,
    /// Open or done.
    pub status: TodoStatus,
    /// Newest alternative written for this todo.
    pub linked_alternative_id: Option<String>,
}

impl Todo {
    /// An open todo numbered `ordinal` within its chapter.
    pub fn new(
        chapter_id: impl Into<String>,
        ordinal: u32,
        description: impl Into<String>,
    ) -> Self {
        let chapter_id = chapter_id.into();
        Self {
            id: format!("{chapter_id}.{ordinal}"),
            chapter_id,
            description: description.into(),
            status: TodoStatus::Open,
            linked_alternative_id: None,
        }
    }

    /// One-line markdown rendering for the chapter todo file.
    pub fn to_markdown_line(&self) -> String {
        let mark = match self.status {
            TodoStatus::Open => ' ',
            TodoStatus::Done => 'x',
        };
        format!("- [{mark}] {}: {}", self.id, self.description)
    }
}

/// The chapter ordinal of a todo-file line such as `- [ ] 3.2: Cut it`.
pub(crate) fn ordinal_in_line(line: &str, chapter_id: &str) -> Option<u32> {
    let rest = line.trim_start().strip_prefix("- [")?;
    let (_, rest) = rest.split_once("] ")?;
    let (id, _) = rest.split_once(':')?;
    ordinal_of(id, chapter_id)
}

fn ordinal_of(id: &str, chapter_id: &str) -> Option<u32> {
    id.strip_prefix(chapter_id)?.strip_prefix('.')?.parse().ok()
}

/// The session's todos, in creation order. Todos are never removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoList {
    todos: Vec<Todo>,
}

impl TodoList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The lowest ordinal not yet used by this list for `chapter_id`.
    pub fn next_ordinal(&self, chapter_id: &str) -> u32 {
        self.todos
            .iter()
            .filter(|t| t.chapter_id == chapter_id)
            .filter_map(|t| ordinal_of(&t.id, chapter_id))
            .max()
            .map_or(1, |n| n + 1)
    }

    /// Add a todo whose line has been written.
    pub fn add(&mut self, todo: Todo) -> &Todo {
        let index = self.todos.len();
        self.todos.push(todo);
        &self.todos[index]
    }

    /// Look up a todo by id.
    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Look up a todo or fail with [`InterviewError::UnknownTodo`].
    pub fn require(&self, id: &str) -> InterviewResult<&Todo> {
        self.get(id)
            .ok_or_else(|| InterviewError::UnknownTodo(id.to_string()))
    }

    /// Check that `id` exists and is open, without changing it.
    pub fn check_resolvable(&self, id: &str) -> InterviewResult<()> {
        match self.require(id)?.status {
            TodoStatus::Open => Ok(()),
            TodoStatus::Done => Err(InterviewError::AlreadyResolved(id.to_string())),
        }
    }

    /// Mark an open todo done.
    pub fn resolve(&mut self, id: &str) -> InterviewResult<&Todo> {
        self.check_resolvable(id)?;
        let todo = self.find_mut(id)?;
        todo.status = TodoStatus::Done;
        Ok(todo)
    }

    /// Record the newest alternative for a todo.
    pub fn link_alternative(
        &mut self,
        id: &str,
        alternative_id: impl Into<String>,
    ) -> InterviewResult<()> {
        self.find_mut(id)?.linked_alternative_id = Some(alternative_id.into());
        Ok(())
    }

    fn find_mut(&mut self, id: &str) -> InterviewResult<&mut Todo> {
        self.todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| InterviewError::UnknownTodo(id.to_string()))
    }

    /// Every todo, in creation order.
    pub fn all(&self) -> &[Todo] {
        &self.todos
    }

    /// Number of open todos.
    pub fn open_count(&self) -> usize {
        self.todos
            .iter()
            .filter(|t| t.status == TodoStatus::Open)
            .count()
    }

    /// Number of todos.
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    /// Whether there are no todos.
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}
