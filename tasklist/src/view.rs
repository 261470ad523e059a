//! Pending/done projection of the task list.
//!
//! Derived from the tasks on every read and never cached, so it cannot drift
//! from the state it was built from.

use crate::types::{Task, TaskState};
use serde::Serialize;

/// The task list split by completion, each half in insertion order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskView<'a> {
    /// Tasks not yet done
    pub pending: Vec<&'a Task>,
    /// Tasks done
    pub completed: Vec<&'a Task>,
}

/// Stable partition of `tasks` on the done flag.
#[must_use]
pub fn project(tasks: &[Task]) -> TaskView<'_> {
    let (completed, pending): (Vec<&Task>, Vec<&Task>) = tasks.iter().partition(|task| task.is_done());
    TaskView { pending, completed }
}

impl TaskView<'_> {
    /// Number of tasks in the view
    #[must_use]
    pub fn total(&self) -> usize {
        self.pending.len() + self.completed.len()
    }

    /// Number of pending tasks
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of completed tasks
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Owned copy of the view together with the draft, for serialization
    #[must_use]
    pub fn to_snapshot(&self, draft: &str) -> TaskViewSnapshot {
        TaskViewSnapshot {
            pending: self.pending.iter().map(|task| (*task).clone()).collect(),
            completed: self.completed.iter().map(|task| (*task).clone()).collect(),
            draft: draft.to_string(),
        }
    }
}

impl TaskState {
    /// Projects the current tasks into pending and completed lists
    #[must_use]
    pub fn view(&self) -> TaskView<'_> {
        project(self.tasks())
    }
}

/// Owned, serializable form of a [`TaskView`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskViewSnapshot {
    /// Tasks not yet done
    pub pending: Vec<Task>,
    /// Tasks done
    pub completed: Vec<Task>,
    /// Draft text at the time of the snapshot
    pub draft: String,
}
