//! Shell tests: scripted input, captured output

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use tasklist::shell::{AddOutcome, Step};
use tasklist::{
    Config, OutputFormat, Shell, ShellError, Task, TaskId, TaskReducer, TaskState, TaskStore,
};
use tasklist_runtime::Store;
use tokio::io::BufReader;

fn text_config() -> Config {
    Config {
        prompt: String::new(),
        ..Config::default()
    }
}

/// Runs `script` through a fresh shell and returns (stdout, stderr)
async fn run_script(config: Config, script: &str) -> (String, String) {
    tasklist_testing::init_test_tracing();
    let shell = Shell::new(config);
    let mut out = Vec::new();
    let mut err = Vec::new();

    shell
        .run(BufReader::new(script.as_bytes()), &mut out, &mut err)
        .await
        .unwrap();

    assert!(shell.store().is_shut_down());
    (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
}

#[tokio::test]
async fn initial_render_shows_seed() {
    let (out, err) = run_script(text_config(), "").await;

    assert!(out.starts_with("Tasks to do - 3\n  [1] Buy groceries\n"));
    assert!(out.contains("Done - 2\n  [2] Walk the dog\n  [4] Read a book\n"));
    assert!(err.is_empty());
}

#[tokio::test]
async fn type_then_add() {
    let (out, _) = run_script(text_config(), "Buy milk\n/add\n").await;

    assert!(out.contains("Draft: \"Buy milk\"\n"));
    assert!(out.contains("Added task 6\n"));
    assert!(out.ends_with(
        "Tasks to do - 4\n  [1] Buy groceries\n  [3] Complete homework\n  [5] Exercise\n  [6] Buy milk\n\
         Done - 2\n  [2] Walk the dog\n  [4] Read a book\n"
    ));
}

#[tokio::test]
async fn add_trims_the_draft() {
    let (out, _) = run_script(text_config(), "/add   Buy milk  \n").await;
    assert!(out.contains("  [6] Buy milk\n"));
}

#[tokio::test]
async fn add_with_empty_or_blank_draft() {
    let (out, _) = run_script(text_config(), "/add\n/add   \t\n").await;

    assert!(out.contains("Add is disabled while the draft is empty\n"));
    assert!(out.contains("Nothing to add\n"));
    assert!(!out.contains("Added task"));
}

#[tokio::test]
async fn toggle_and_delete() {
    let (out, _) = run_script(text_config(), "/toggle 2\n/rm 5\n/quit\n/toggle 1\n").await;

    let last = out.rsplit("Tasks to do").next().unwrap();
    assert_eq!(
        last,
        " - 3\n  [1] Buy groceries\n  [2] Walk the dog\n  [3] Complete homework\nDone - 1\n  [4] Read a book\n"
    );
}

#[tokio::test]
async fn empty_lists_show_label() {
    let config = Config {
        seed: false,
        ..text_config()
    };
    let (out, _) = run_script(config, "").await;

    assert_eq!(out, "Tasks to do - Bo'sh\nDone - Bo'sh\n");
}

#[tokio::test]
async fn user_errors_go_to_stderr_and_do_not_stop_the_shell() {
    let (out, err) = run_script(text_config(), "/toggle x\n/bogus\n/rm\n/toggle 1\n").await;

    assert!(err.contains("error: invalid task id \"x\"\n"));
    assert!(err.contains("error: unknown command /bogus (try /help)\n"));
    assert!(err.contains("error: /delete needs a task id\n"));
    assert!(out.ends_with("Done - 3\n  [1] Buy groceries\n  [2] Walk the dog\n  [4] Read a book\n"));
}

#[tokio::test]
async fn help_prints_usage_without_render() {
    let (out, _) = run_script(text_config(), "/help\n").await;

    assert!(out.contains("/toggle <id>"));
    assert_eq!(out.matches("Tasks to do").count(), 1);
}

#[tokio::test]
async fn prompt_is_printed_in_text_mode() {
    let (out, _) = run_script(Config::default(), "/ls\n").await;
    assert_eq!(out.matches("> ").count(), 2);
}

#[tokio::test]
async fn json_mode_emits_one_object_per_render() {
    let config = Config {
        output: OutputFormat::Json,
        ..Config::default()
    };
    let (out, err) = run_script(
        config,
        "{\"type\":\"TOGGLE\",\"id\":2}\n{\"type\":\"ADD\",\"title\":\"  \"}\n/help\n",
    )
    .await;

    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1]["pending"].as_array().map(Vec::len), Some(4));
    assert_eq!(lines[2]["pending"].as_array().map(Vec::len), Some(4));
    assert!(!out.contains("> "));
    assert!(err.contains("Nothing to add"));
    assert!(err.contains("/toggle <id>"));
}

#[tokio::test]
async fn submit_draft_outcomes() {
    let shell = Shell::new(text_config());

    assert_eq!(shell.submit_draft().await.unwrap(), AddOutcome::Disabled);

    shell.type_text("  ").await.unwrap();
    assert_eq!(shell.submit_draft().await.unwrap(), AddOutcome::Blank);
    assert_eq!(shell.store().state(|s| s.len()).await, 5);

    shell.type_text(" Read ").await.unwrap();
    assert_eq!(
        shell.submit_draft().await.unwrap(),
        AddOutcome::Added(TaskId::new(6))
    );
    let title = shell
        .store()
        .state(|s| s.tasks().last().map(|t| t.title().to_string()))
        .await;
    assert_eq!(title.as_deref(), Some("Read"));
}

#[tokio::test]
async fn handle_line_steps() {
    let shell = Shell::new(text_config());

    assert_eq!(
        shell.handle_line("/quit").await.unwrap(),
        Step::Quit
    );
    assert!(matches!(
        shell.handle_line("/add x").await.unwrap(),
        Step::Render { notice: Some(_) }
    ));
}

#[tokio::test]
async fn store_shutdown_is_fatal() {
    let shell = Shell::new(text_config());
    shell.store().shutdown();

    let err = shell.handle_line("/toggle 1").await.unwrap_err();
    assert!(matches!(err, ShellError::Store(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn concurrent_adds_report_their_own_ids() {
    let store: TaskStore = Store::new(TaskState::seeded(), TaskReducer::new(), ());

    let handles: Vec<_> = (0..20)
        .map(|n| {
            let shell = Shell::with_store(store.clone(), text_config());
            tokio::spawn(async move {
                let title = format!("task {n}");
                let outcome = shell.add(&title).await.unwrap();
                (title, outcome)
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        let (title, outcome) = handle.await.unwrap();
        let AddOutcome::Added(id) = outcome else {
            panic!("{title} was not added: {outcome:?}");
        };
        let stored = store.state(|s| s.get(id).map(|t| t.title().to_string())).await;
        assert_eq!(stored.as_deref(), Some(title.as_str()));
        ids.push(id);
    }

    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn add_with_no_ids_left_reports_it() {
    let state = TaskState::from_tasks(vec![Task::new(TaskId::new(u64::MAX - 1), "almost")]).unwrap();
    let shell = Shell::with_store(Store::new(state, TaskReducer::new(), ()), text_config());

    assert_eq!(shell.add("one more").await.unwrap(), AddOutcome::IdsExhausted);
    assert_eq!(shell.store().state(|s| s.len()).await, 1);

    let step = shell.handle_line("/add again").await.unwrap();
    assert_eq!(
        step,
        Step::Render {
            notice: Some("No task ids left; nothing added".to_string())
        }
    );
}
