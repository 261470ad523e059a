//! Reducer logic for the task list.
//!
//! Every action is accepted: unknown ids make `Delete` and `Toggle` no-ops,
//! and the title of an `Add` is taken verbatim. An `Add` arriving after the
//! id space is used up changes nothing. Rejecting blank titles is
//! the job of whoever builds the action (see [`crate::shell`]).

use crate::types::{Task, TaskAction, TaskState};
use tasklist_core::{effect::Effect, reducer, reducer::Reducer, SmallVec};

/// Reducer for the task list
#[derive(Clone, Copy, Debug, Default)]
pub struct TaskReducer;

impl TaskReducer {
    /// Creates a new `TaskReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TaskReducer {
    type State = TaskState;
    type Action = TaskAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TaskAction::Add { title } => match state.allocate_id() {
                Some(id) => {
                    tracing::debug!(%id, "Task added");
                    state.tasks.push(Task::new(id, title));
                    state.draft.clear();
                },
                None => tracing::warn!(next_id = %state.next_id, "Add ignored: task ids exhausted"),
            },

            TaskAction::Delete { id } => match state.position(id) {
                Some(index) => {
                    state.tasks.remove(index);
                    tracing::debug!(%id, "Task deleted");
                },
                None => tracing::debug!(%id, "Delete ignored: no such task"),
            },

            TaskAction::Toggle { id } => match state.position(id) {
                Some(index) => {
                    let task = &mut state.tasks[index];
                    task.toggle();
                    tracing::debug!(%id, done = task.is_done(), "Task toggled");
                },
                None => tracing::debug!(%id, "Toggle ignored: no such task"),
            },

            TaskAction::SetDraft { text } => {
                state.draft = text;
            },
        }

        SmallVec::new()
    }
}

/// Applies one action to `state` and returns the resulting state.
///
/// `state` itself is not modified.
///
/// ```
/// use tasklist::{transition, TaskAction, TaskState};
///
/// let before = TaskState::seeded();
/// let after = transition(&before, TaskAction::Add { title: "Buy milk".into() });
///
/// assert_eq!(before.len(), 5);
/// assert_eq!(after.len(), 6);
/// assert_eq!(after.tasks()[5].title(), "Buy milk");
/// ```
#[must_use]
pub fn transition(state: &TaskState, action: TaskAction) -> TaskState {
    reducer::apply(&TaskReducer, state, action, &())
}
