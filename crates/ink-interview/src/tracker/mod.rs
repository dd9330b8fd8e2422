//! Todo and alternative tracking for editing sessions.

pub mod alternatives;
pub mod compare;
pub mod todos;

pub use alternatives::{Alternative, AlternativeVersion};
pub use todos::{Todo, TodoList, TodoStatus};
