use crate::console::Console;
use crate::docker::{command_line, Engine};
use anyhow::Result;
use chrono::Local;
use std::io::Write;
use tokio::io::AsyncBufRead;

/// The compose operations offered to the operator. Each maps to one or more
/// fixed engine invocations run strictly in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    Build,
    Up { build: bool },
    Restart,
    CleanReboot,
    /// Tears down containers and volumes, then rebuilds and starts.
    NuclearRebuild,
    Down,
}

impl ComposeAction {
    pub fn invocations(self) -> Vec<Vec<&'static str>> {
        match self {
            ComposeAction::Build => vec![vec!["compose", "build"]],
            ComposeAction::Up { build } => {
                let mut args = vec!["compose", "up", "-d"];
                if build {
                    args.push("--build");
                }
                vec![args]
            }
            ComposeAction::Restart => vec![vec!["compose", "restart"]],
            ComposeAction::CleanReboot => {
                vec![vec!["compose", "up", "-d", "--build", "--force-recreate"]]
            }
            ComposeAction::NuclearRebuild => vec![
                vec!["compose", "down", "-v"],
                vec!["compose", "up", "-d", "--build"],
            ],
            ComposeAction::Down => vec![vec!["compose", "down"]],
        }
    }
}

/// Run every invocation of `action`, echoing each first. A failing step is
/// reported but never stops the following ones.
pub async fn run_action<E, R, W>(
    engine: &mut E,
    console: &mut Console<R, W>,
    action: ComposeAction,
) -> Result<()>
where
    E: Engine,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    for args in action.invocations() {
        let line = command_line(engine.program(), &args);
        console.command(&line)?;

        let stamp = || Local::now().format("%H:%M:%S");
        match engine.stream(&args).await {
            Ok(0) => console.say(format!("[{}] finished: {line}", stamp()))?,
            Ok(code) => {
                tracing::warn!("`{line}` exited with status {code}");
                console.warn(format!("[{}] exited with status {code}: {line}", stamp()))?;
            }
            Err(e) => {
                tracing::warn!("{e:#}");
                console.warn(format!("[{}] {e}", stamp()))?;
            }
        }
    }
    Ok(())
}
