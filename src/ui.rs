use crate::compose::{self, ComposeAction};
use crate::config::Config;
use crate::console::Console;
use crate::docker::Engine;
use crate::env;
use crate::preflight;
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::AsyncBufRead;

const MENU: &str = "
Select an action:
1) Start containers
2) Respring APIs
3) Reboot APIs with clean build
4) Rebuild all APIs and restart Postgres (destructive)
5) Stop containers
6) Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Start,
    Restart,
    CleanReboot,
    NuclearRebuild,
    Stop,
    Exit,
}

impl MenuChoice {
    /// Only the exact labels "1".."6" are choices.
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "1" => Some(MenuChoice::Start),
            "2" => Some(MenuChoice::Restart),
            "3" => Some(MenuChoice::CleanReboot),
            "4" => Some(MenuChoice::NuclearRebuild),
            "5" => Some(MenuChoice::Stop),
            "6" => Some(MenuChoice::Exit),
            _ => None,
        }
    }

    /// `None` for [`MenuChoice::Exit`].
    pub fn action(self) -> Option<ComposeAction> {
        match self {
            MenuChoice::Start => Some(ComposeAction::Up { build: false }),
            MenuChoice::Restart => Some(ComposeAction::Restart),
            MenuChoice::CleanReboot => Some(ComposeAction::CleanReboot),
            MenuChoice::NuclearRebuild => Some(ComposeAction::NuclearRebuild),
            MenuChoice::Stop => Some(ComposeAction::Down),
            MenuChoice::Exit => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuState {
    AwaitingChoice,
    Executing(ComposeAction),
    Terminated,
}

/// Menu loop. Unknown input re-shows the menu; exit or end of input stops it.
pub async fn run_menu<E, R, W>(engine: &mut E, console: &mut Console<R, W>) -> Result<()>
where
    E: Engine,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut state = MenuState::AwaitingChoice;
    loop {
        state = match state {
            MenuState::AwaitingChoice => {
                console.say(MENU)?;
                match console.prompt("Choice: ").await? {
                    None => MenuState::Terminated,
                    Some(input) => match MenuChoice::parse(&input) {
                        Some(choice) => match choice.action() {
                            Some(action) => MenuState::Executing(action),
                            None => MenuState::Terminated,
                        },
                        None => {
                            tracing::debug!("ignoring menu input {input:?}");
                            MenuState::AwaitingChoice
                        }
                    },
                }
            }
            MenuState::Executing(action) => {
                compose::run_action(engine, console, action).await?;
                MenuState::AwaitingChoice
            }
            MenuState::Terminated => break,
        };
    }
    Ok(())
}

async fn choose_env_file<R, W>(cfg: &Config, console: &mut Console<R, W>) -> Result<PathBuf>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.step(1, "Specify environment file")?;
    let path = match &cfg.env_file_override {
        Some(p) => p.clone(),
        None => {
            console.say(format!(
                "Default location: {}",
                cfg.display_relative(&cfg.default_env_file)
            ))?;
            let answer = console
                .prompt("Press Enter to accept or provide custom path relative to repo: ")
                .await?
                .unwrap_or_default();
            cfg.resolve_env_path(&answer)
        }
    };

    if path.exists() {
        console.say(format!("Using {} for environment configuration.\n", path.display()))?;
    } else {
        console.warn(format!("Warning: {} does not exist.\n", path.display()))?;
    }
    Ok(path)
}

/// The whole session: preflight, optional build, then the menu.
pub async fn run<E, R, W>(cfg: &Config, engine: &mut E, console: &mut Console<R, W>) -> Result<()>
where
    E: Engine,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if !preflight::check_engine(engine, console).await? {
        return Ok(());
    }

    let env_path = choose_env_file(cfg, console).await?;
    let exported = env::export_to_process(&env::load_env_file(&env_path)?);
    tracing::info!("exported {exported} variables from {}", env_path.display());

    preflight::check_images(engine, console).await?;
    preflight::check_env(cfg, console, &env_path)?;
    preflight::detect_platform(engine, console).await?;

    let build = console
        .prompt("Build images now? [y/N] ")
        .await?
        .is_some_and(|a| a.eq_ignore_ascii_case("y"));
    if build {
        console.step(5, "Building images...")?;
        compose::run_action(engine, console, ComposeAction::Build).await?;
    }

    console.step(6, "Manage running containers")?;
    run_menu(engine, console).await?;
    console.flush()?;
    Ok(())
}
