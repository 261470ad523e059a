//! In-memory task list built on the tasklist reducer architecture.
//!
//! Tasks are added from a draft, toggled between "to do" and "done", and
//! deleted. Nothing outlives the process.
//!
//! - [`types`]: tasks, the list state and the actions that change it
//! - [`reducer`]: the transition function
//! - [`view`]: the pending/done projection
//! - [`shell`]: the line shell that turns input into actions
//!
//! # Quick Start
//!
//! ```no_run
//! use tasklist::{TaskAction, TaskId, TaskReducer, TaskState};
//! use tasklist_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Store::new(TaskState::seeded(), TaskReducer::new(), ());
//!
//! store.send(TaskAction::Add { title: "Buy milk".to_string() }).await?;
//! store.send(TaskAction::Toggle { id: TaskId::new(2) }).await?;
//!
//! let (pending, done) = store
//!     .state(|s| (s.view().pending_count(), s.view().completed_count()))
//!     .await;
//! println!("{pending} to do, {done} done");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod reducer;
pub mod render;
pub mod shell;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::{Config, ConfigError, OutputFormat};
pub use reducer::{transition, TaskReducer};
pub use shell::{Shell, ShellError, TaskStore};
pub use types::{StateError, Task, TaskAction, TaskId, TaskState};
pub use view::{project, TaskView, TaskViewSnapshot};
