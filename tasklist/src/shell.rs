//! Line-oriented shell around a task store.
//!
//! Every line read from the input is one user interaction:
//!
//! | Line | Effect |
//! |---|---|
//! | any text | becomes the draft, verbatim |
//! | empty line | re-render only |
//! | `/add [text]` | optionally sets the draft, then adds the trimmed draft |
//! | `/toggle <id>`, `/done <id>` | toggles a task |
//! | `/delete <id>`, `/rm <id>` | deletes a task |
//! | `/clear` | empties the draft |
//! | `/list`, `/ls` | re-render only |
//! | `/help` | usage |
//! | `/quit`, `/exit` | stops |
//! | `{"type": ...}` | a raw [`TaskAction`] as JSON |
//!
//! Blank titles never reach the store: the shell trims the draft and only
//! submits an add when something is left.

use crate::config::{Config, OutputFormat};
use crate::reducer::TaskReducer;
use crate::render;
use crate::types::{Task, TaskAction, TaskId, TaskState};
use std::num::ParseIntError;
use tasklist_runtime::{Store, StoreError};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Store hosting the task list
pub type TaskStore = Store<TaskState, TaskAction, (), TaskReducer>;

/// Usage text for `/help`
pub const HELP: &str = "\
Type text to fill the draft, then /add to turn it into a task.
  /add [text]      add the draft (or text) as a new task
  /toggle <id>     move a task between to do and done (alias /done)
  /delete <id>     delete a task (alias /rm)
  /clear           empty the draft
  /list            show the lists again (alias /ls)
  /quit            leave (alias /exit)
Lines starting with '{' are read as JSON actions, e.g. {\"type\":\"TOGGLE\",\"id\":2}";

/// Errors raised while handling shell input
#[derive(Error, Debug)]
pub enum ShellError {
    /// A `/word` that is not a command
    #[error("unknown command /{0} (try /help)")]
    UnknownCommand(String),

    /// A command that needs a task id got none
    #[error("/{command} needs a task id")]
    MissingArgument {
        /// Canonical command name
        command: &'static str,
    },

    /// A task id that is not a non-negative integer
    #[error("invalid task id {value:?}")]
    InvalidId {
        /// Text given as the id
        value: String,
        /// Parse failure
        #[source]
        source: ParseIntError,
    },

    /// A JSON line that is not a valid action
    #[error("invalid action: {0}")]
    InvalidAction(#[source] serde_json::Error),

    /// The view could not be encoded as JSON
    #[error("failed to encode view: {0}")]
    Encode(#[source] serde_json::Error),

    /// The store refused the action
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Reading input or writing output failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// True if the shell cannot keep going after this error
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Io(_) | Self::Encode(_))
    }
}

/// One parsed line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the draft with this text
    Draft(String),
    /// Add the draft, after optionally replacing it
    Add(Option<String>),
    /// Toggle a task
    Toggle(TaskId),
    /// Delete a task
    Delete(TaskId),
    /// Empty the draft
    Clear,
    /// Re-render
    List,
    /// Show usage
    Help,
    /// Stop the shell
    Quit,
    /// A raw action given as JSON
    Action(TaskAction),
}

/// Parses one line of input.
///
/// # Errors
///
/// Returns a [`ShellError`] for unknown commands, missing or invalid ids,
/// and malformed JSON actions.
pub fn parse_line(line: &str) -> Result<Command, ShellError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();

    if trimmed.is_empty() {
        return Ok(Command::List);
    }

    if trimmed.starts_with('{') {
        return serde_json::from_str(trimmed)
            .map(Command::Action)
            .map_err(ShellError::InvalidAction);
    }

    let Some(command_line) = trimmed.strip_prefix('/') else {
        return Ok(Command::Draft(line.to_string()));
    };

    let (word, rest) = match command_line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, Some(rest)),
        None => (command_line, None),
    };

    match word.to_ascii_lowercase().as_str() {
        "add" => Ok(Command::Add(rest.map(str::to_string))),
        "toggle" | "done" => parse_id("toggle", rest).map(Command::Toggle),
        "delete" | "rm" => parse_id("delete", rest).map(Command::Delete),
        "clear" => Ok(Command::Clear),
        "list" | "ls" => Ok(Command::List),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(ShellError::UnknownCommand(word.to_string())),
    }
}

fn parse_id(command: &'static str, rest: Option<&str>) -> Result<TaskId, ShellError> {
    let value = rest.map(str::trim).filter(|value| !value.is_empty());
    let Some(value) = value else {
        return Err(ShellError::MissingArgument { command });
    };

    value.parse().map_err(|source| ShellError::InvalidId {
        value: value.to_string(),
        source,
    })
}

/// Result of pressing "add"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A task was added with this id
    Added(TaskId),
    /// The draft is empty, so add is disabled
    Disabled,
    /// The draft is only whitespace; nothing was added
    Blank,
    /// The store has no task id left to hand out; nothing was added
    IdsExhausted,
}

/// What the shell does after handling a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Render the lists, after an optional notice
    Render {
        /// Message for the user
        notice: Option<String>,
    },
    /// Print a message without rendering
    Message(String),
    /// Stop reading input
    Quit,
}

impl Step {
    const fn render() -> Self {
        Self::Render { notice: None }
    }

    fn notice(message: impl Into<String>) -> Self {
        Self::Render {
            notice: Some(message.into()),
        }
    }
}

/// Interactive shell driving a [`TaskStore`]
pub struct Shell {
    store: TaskStore,
    config: Config,
}

impl Shell {
    /// Creates a shell with a fresh store, seeded according to `config`
    #[must_use]
    pub fn new(config: Config) -> Self {
        let initial = if config.seed {
            TaskState::seeded()
        } else {
            TaskState::new()
        };

        Self::with_store(Store::new(initial, TaskReducer::new(), ()), config)
    }

    /// Creates a shell around an existing store
    #[must_use]
    pub const fn with_store(store: TaskStore, config: Config) -> Self {
        Self { store, config }
    }

    /// The store this shell drives
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// The shell configuration
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Sends one action to the store
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Store`] if the store rejects the action.
    pub async fn dispatch(&self, action: TaskAction) -> Result<(), ShellError> {
        tracing::debug!(kind = action.kind(), "Dispatching action");
        self.store.send(action).await?;
        Ok(())
    }

    /// Replaces the draft, as typing into the input field does
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Store`] if the store rejects the action.
    pub async fn type_text(&self, text: impl Into<String>) -> Result<(), ShellError> {
        self.dispatch(TaskAction::SetDraft { text: text.into() }).await
    }

    /// Adds the current draft as a task, trimmed
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Store`] if the store rejects the action.
    pub async fn submit_draft(&self) -> Result<AddOutcome, ShellError> {
        let draft = self.store.state(|s| s.draft().to_string()).await;
        self.add(&draft).await
    }

    /// Adds `text` as a task, trimmed, unless it is empty or blank
    ///
    /// The reported id is read from the transition itself, so it is the
    /// id this add received even when other senders share the store.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Store`] if the store rejects the action.
    pub async fn add(&self, text: &str) -> Result<AddOutcome, ShellError> {
        if text.is_empty() {
            return Ok(AddOutcome::Disabled);
        }

        let title = text.trim();
        if title.is_empty() {
            return Ok(AddOutcome::Blank);
        }

        let action = TaskAction::Add {
            title: title.to_string(),
        };
        tracing::debug!(kind = action.kind(), "Dispatching action");

        let (_, added) = self
            .store
            .send_and_inspect(action, |before, after| {
                after
                    .tasks()
                    .last()
                    .map(Task::id)
                    .filter(|id| !before.contains(*id))
            })
            .await?;

        match added {
            Some(id) => {
                tracing::info!(%id, title, "Task added");
                Ok(AddOutcome::Added(id))
            },
            None => {
                tracing::warn!(title, "Task not added: ids exhausted");
                Ok(AddOutcome::IdsExhausted)
            },
        }
    }

    /// Runs one parsed command
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Store`] if the store rejects an action.
    pub async fn execute(&self, command: Command) -> Result<Step, ShellError> {
        match command {
            Command::Draft(text) => {
                self.type_text(text).await?;
                Ok(Step::render())
            },
            Command::Add(text) => {
                if let Some(text) = text {
                    self.type_text(text).await?;
                }
                Ok(add_step(self.submit_draft().await?))
            },
            Command::Toggle(id) => {
                self.dispatch(TaskAction::Toggle { id }).await?;
                Ok(Step::render())
            },
            Command::Delete(id) => {
                self.dispatch(TaskAction::Delete { id }).await?;
                Ok(Step::render())
            },
            Command::Clear => {
                self.type_text(String::new()).await?;
                Ok(Step::render())
            },
            Command::List => Ok(Step::render()),
            Command::Help => Ok(Step::Message(HELP.to_string())),
            Command::Quit => Ok(Step::Quit),
            Command::Action(TaskAction::Add { title }) => Ok(add_step(self.add(&title).await?)),
            Command::Action(action) => {
                self.dispatch(action).await?;
                Ok(Step::render())
            },
        }
    }

    /// Parses and runs one line of input
    ///
    /// # Errors
    ///
    /// See [`parse_line`] and [`Shell::execute`].
    pub async fn handle_line(&self, line: &str) -> Result<Step, ShellError> {
        let command = parse_line(line)?;
        self.execute(command).await
    }

    /// Renders the current lists in the configured format
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Encode`] if JSON encoding fails.
    pub async fn render(&self) -> Result<String, ShellError> {
        let output = self.config.output;
        let empty_label = self.config.empty_label.as_str();

        self.store
            .state(|state| {
                tracing::trace!(summary = %render::summary(&state.view()), "Rendering");
                match output {
                    OutputFormat::Text => Ok(render::render_text(state, empty_label)),
                    OutputFormat::Json => render::render_json(state)
                        .map(|mut line| {
                            line.push('\n');
                            line
                        })
                        .map_err(ShellError::Encode),
                }
            })
            .await
    }

    /// Reads lines from `input` until `/quit` or end of input, rendering to
    /// `out` after each one. Notices and user errors go to `out` in text
    /// mode and to `err` in JSON mode, so JSON output stays one object per
    /// line. The store is shut down on return.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`ShellError`]: I/O failures, encoding
    /// failures or a store that stopped accepting actions.
    pub async fn run<I, O, E>(&self, input: I, mut out: O, mut err: E) -> Result<(), ShellError>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
        E: AsyncWrite + Unpin,
    {
        let result = self.run_loop(input, &mut out, &mut err).await;
        self.store.shutdown();
        out.flush().await?;
        err.flush().await?;
        result
    }

    async fn run_loop<I, O, E>(&self, input: I, out: &mut O, err: &mut E) -> Result<(), ShellError>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
        E: AsyncWrite + Unpin,
    {
        let text_mode = self.config.output == OutputFormat::Text;
        let mut lines = input.lines();

        out.write_all(self.render().await?.as_bytes()).await?;

        loop {
            if text_mode && !self.config.prompt.is_empty() {
                out.write_all(self.config.prompt.as_bytes()).await?;
                out.flush().await?;
            }

            let Some(line) = lines.next_line().await? else {
                tracing::debug!("End of input");
                break;
            };

            match self.handle_line(&line).await {
                Ok(Step::Quit) => break,
                Ok(Step::Message(message)) => {
                    self.notify(&message, out, err).await?;
                },
                Ok(Step::Render { notice }) => {
                    if let Some(notice) = notice {
                        self.notify(&notice, out, err).await?;
                    }
                    out.write_all(self.render().await?.as_bytes()).await?;
                },
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    tracing::warn!(%error, "Rejected input");
                    write_line(&mut *err, &format!("error: {error}")).await?;
                },
            }
        }

        Ok(())
    }

    async fn notify<O, E>(&self, message: &str, out: &mut O, err: &mut E) -> std::io::Result<()>
    where
        O: AsyncWrite + Unpin,
        E: AsyncWrite + Unpin,
    {
        match self.config.output {
            OutputFormat::Text => write_line(out, message).await,
            OutputFormat::Json => write_line(err, message).await,
        }
    }
}

fn add_step(outcome: AddOutcome) -> Step {
    match outcome {
        AddOutcome::Added(id) => Step::notice(format!("Added task {id}")),
        AddOutcome::Disabled => Step::notice("Add is disabled while the draft is empty"),
        AddOutcome::Blank => Step::notice("Nothing to add"),
        AddOutcome::IdsExhausted => Step::notice("No task ids left; nothing added"),
    }
}

async fn write_line<W>(writer: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(text.as_bytes()).await?;
    writer.write_all(b"\n").await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can unwrap
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_draft_verbatim() {
        assert_eq!(
            parse_line("  Buy milk ").unwrap(),
            Command::Draft("  Buy milk ".to_string())
        );
        assert_eq!(
            parse_line("Buy milk\r\n").unwrap(),
            Command::Draft("Buy milk".to_string())
        );
    }

    #[test]
    fn empty_line_lists() {
        assert_eq!(parse_line("").unwrap(), Command::List);
        assert_eq!(parse_line("   ").unwrap(), Command::List);
    }

    #[test]
    fn add_with_and_without_text() {
        assert_eq!(parse_line("/add").unwrap(), Command::Add(None));
        assert_eq!(
            parse_line("/add Buy  milk").unwrap(),
            Command::Add(Some("Buy  milk".to_string()))
        );
        assert_eq!(parse_line("/ADD").unwrap(), Command::Add(None));
    }

    #[test]
    fn id_commands_and_aliases() {
        assert_eq!(parse_line("/toggle 2").unwrap(), Command::Toggle(TaskId::new(2)));
        assert_eq!(parse_line("/done  4 ").unwrap(), Command::Toggle(TaskId::new(4)));
        assert_eq!(parse_line("/delete 3").unwrap(), Command::Delete(TaskId::new(3)));
        assert_eq!(parse_line("/rm 999").unwrap(), Command::Delete(TaskId::new(999)));
    }

    #[test]
    fn missing_id() {
        assert!(matches!(
            parse_line("/toggle"),
            Err(ShellError::MissingArgument { command: "toggle" })
        ));
        assert!(matches!(
            parse_line("/rm   "),
            Err(ShellError::MissingArgument { command: "delete" })
        ));
    }

    #[test]
    fn invalid_id() {
        let err = parse_line("/toggle two").unwrap_err();
        assert!(matches!(err, ShellError::InvalidId { ref value, .. } if value == "two"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn unknown_command() {
        let err = parse_line("/frobnicate 1").unwrap_err();
        assert_eq!(err.to_string(), "unknown command /frobnicate (try /help)");
    }

    #[test]
    fn other_commands() {
        assert_eq!(parse_line("/clear").unwrap(), Command::Clear);
        assert_eq!(parse_line("/ls").unwrap(), Command::List);
        assert_eq!(parse_line("/help").unwrap(), Command::Help);
        assert_eq!(parse_line("/exit").unwrap(), Command::Quit);
    }

    #[test]
    fn json_action() {
        assert_eq!(
            parse_line(r#"{"type":"DELETE","id":5}"#).unwrap(),
            Command::Action(TaskAction::Delete { id: TaskId::new(5) })
        );
        assert!(matches!(
            parse_line(r#"{"type":"RENAME","id":5}"#),
            Err(ShellError::InvalidAction(_))
        ));
    }

    #[test]
    fn store_errors_are_fatal() {
        assert!(ShellError::Store(StoreError::ShutdownInProgress).is_fatal());
        assert!(!ShellError::UnknownCommand("x".to_string()).is_fatal());
    }
}
