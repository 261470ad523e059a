//! Interactive task list.
//!
//! Reads one interaction per line from stdin and prints the lists to
//! stdout after each one. Logs go to stderr.

use anyhow::Context;
use tasklist::{Config, Shell};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasklist=info,tasklist_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    tracing::info!(output = %config.output, seed = config.seed, "Starting task list");

    let shell = Shell::new(config);
    shell
        .run(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            tokio::io::stderr(),
        )
        .await
        .context("shell stopped")?;

    Ok(())
}
