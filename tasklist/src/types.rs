//! Domain types for the task list.
//!
//! A task list is an ordered collection of tasks plus the draft text that
//! has been typed but not yet submitted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use tasklist_macros::Action;
use thiserror::Error;

/// Unique identifier for a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a `TaskId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one, if any
    #[must_use]
    const fn successor(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A single task
///
/// The title is fixed at creation; only the completion flag changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    done: bool,
}

impl Task {
    /// Creates a pending task
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
        }
    }

    /// Creates a task that is already done
    #[must_use]
    pub fn completed(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            done: true,
            ..Self::new(id, title)
        }
    }

    /// Unique identifier
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Title as submitted
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the task is done
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    pub(crate) const fn toggle(&mut self) {
        self.done = !self.done;
    }
}

/// Errors building a [`TaskState`] from existing tasks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Two tasks share an id
    #[error("duplicate task id {0}")]
    DuplicateId(TaskId),

    /// The highest id has no successor, so no further id could be allocated
    #[error("task id {0} leaves no id for the next task")]
    IdSpaceExhausted(TaskId),
}

/// State of the task list
///
/// Invariants:
/// - task ids are unique
/// - `next_id` is greater than every task id, so ids are never reused even
///   after the task holding the highest id is deleted
/// - `next_id` itself is only handed out while it has a successor, so once
///   it reaches `u64::MAX` adds are refused rather than repeating an id
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskState {
    pub(crate) tasks: Vec<Task>,
    pub(crate) draft: String,
    pub(crate) next_id: TaskId,
}

impl Default for TaskState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            draft: String::new(),
            next_id: TaskId::new(1),
        }
    }
}

impl TaskState {
    /// Creates an empty task list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The state a session starts from: five example tasks, empty draft
    #[must_use]
    pub fn seeded() -> Self {
        let tasks = vec![
            Task::new(TaskId::new(1), "Buy groceries"),
            Task::completed(TaskId::new(2), "Walk the dog"),
            Task::new(TaskId::new(3), "Complete homework"),
            Task::completed(TaskId::new(4), "Read a book"),
            Task::new(TaskId::new(5), "Exercise"),
        ];

        Self {
            tasks,
            draft: String::new(),
            next_id: TaskId::new(6),
        }
    }

    /// Builds a state from existing tasks, keeping their order
    ///
    /// # Errors
    ///
    /// Returns [`StateError::DuplicateId`] if two tasks share an id, and
    /// [`StateError::IdSpaceExhausted`] if a task holds id `u64::MAX`.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, StateError> {
        let mut seen = std::collections::HashSet::with_capacity(tasks.len());
        for task in &tasks {
            if !seen.insert(task.id) {
                return Err(StateError::DuplicateId(task.id));
            }
        }

        let next_id = match tasks.iter().map(|task| task.id).max() {
            Some(highest) => highest
                .successor()
                .ok_or(StateError::IdSpaceExhausted(highest))?,
            None => TaskId::new(1),
        };

        Ok(Self {
            tasks,
            draft: String::new(),
            next_id,
        })
    }

    /// Replaces the draft
    #[must_use]
    pub fn with_draft(mut self, draft: impl Into<String>) -> Self {
        self.draft = draft.into();
        self
    }

    /// All tasks in insertion order
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Text typed but not yet submitted
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Id the next added task receives
    #[must_use]
    pub const fn next_id(&self) -> TaskId {
        self.next_id
    }

    /// Number of tasks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True if there are no tasks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns a task by id
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Checks if a task exists
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Number of tasks not yet done
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.done).count()
    }

    /// Number of tasks done
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.done).count()
    }

    pub(crate) fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Hands out `next_id`, or `None` once the id space is used up
    pub(crate) const fn allocate_id(&mut self) -> Option<TaskId> {
        let id = self.next_id;
        match id.successor() {
            Some(next) => {
                self.next_id = next;
                Some(id)
            },
            None => None,
        }
    }
}

/// Everything a user can do to the task list
///
/// Serialized with a `type` tag matching [`TaskAction::kind`], e.g.
/// `{"type":"TOGGLE","id":2}`.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskAction {
    /// Append a pending task and clear the draft
    Add {
        /// Title of the new task, used verbatim
        title: String,
    },

    /// Remove a task; unknown ids are ignored
    Delete {
        /// Task to remove
        id: TaskId,
    },

    /// Flip a task between pending and done; unknown ids are ignored
    Toggle {
        /// Task to flip
        id: TaskId,
    },

    /// Replace the draft text
    SetDraft {
        /// New draft, used verbatim
        text: String,
    },
}
