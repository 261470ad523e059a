//! Rendering of the pending/done lists.

use crate::types::{Task, TaskState};
use crate::view::TaskView;
use std::fmt::Write;

/// Text rendering of the lists, one task per line.
///
/// A zero count is replaced by `empty_label`. The draft is shown last when
/// something has been typed.
///
/// ```text
/// Tasks to do - 1
///   [1] Buy groceries
/// Done - Bo'sh
/// ```
#[must_use]
pub fn render_text(state: &TaskState, empty_label: &str) -> String {
    let view = state.view();
    let mut out = String::new();

    section(&mut out, "Tasks to do", &view.pending, empty_label);
    section(&mut out, "Done", &view.completed, empty_label);

    if !state.draft().is_empty() {
        let _ = writeln!(out, "Draft: {:?}", state.draft());
    }

    out
}

/// JSON rendering: the view and the draft as one line.
///
/// # Errors
///
/// Returns the serializer error if encoding fails.
pub fn render_json(state: &TaskState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&state.view().to_snapshot(state.draft()))
}

fn section(out: &mut String, heading: &str, tasks: &[&Task], empty_label: &str) {
    if tasks.is_empty() {
        let _ = writeln!(out, "{heading} - {empty_label}");
        return;
    }

    let _ = writeln!(out, "{heading} - {}", tasks.len());
    for task in tasks {
        let _ = writeln!(out, "  [{}] {}", task.id(), task.title());
    }
}

/// Counts in the form used by headings, e.g. for log lines
#[must_use]
pub fn summary(view: &TaskView<'_>) -> String {
    format!("{} to do, {} done", view.pending_count(), view.completed_count())
}
