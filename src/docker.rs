use crate::error::EngineError;
use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

/// Something that can run container-engine commands.
///
/// `capture` is for queries whose stdout we parse; `stream` hands the terminal
/// to the child and only reports how it ended.
#[allow(async_fn_in_trait)]
pub trait Engine {
    /// Binary name used when echoing commands.
    fn program(&self) -> &str;

    /// Run and collect stdout (trailing whitespace trimmed). Launch failures and
    /// non-zero exits are errors.
    async fn capture(&mut self, args: &[&str]) -> Result<String>;

    /// Run with inherited stdio and wait. Returns the exit code; only launch
    /// failures are errors.
    async fn stream(&mut self, args: &[&str]) -> Result<i32>;
}

/// The real engine: a CLI binary run from the project root.
#[derive(Debug, Clone)]
pub struct DockerCli {
    bin: String,
    cwd: PathBuf,
}

impl DockerCli {
    pub fn new(bin: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        DockerCli {
            bin: bin.into(),
            cwd: cwd.into(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut c = Command::new(&self.bin);
        c.current_dir(&self.cwd).args(args);
        c
    }
}

impl Engine for DockerCli {
    fn program(&self) -> &str {
        &self.bin
    }

    async fn capture(&mut self, args: &[&str]) -> Result<String> {
        let cmd = command_line(&self.bin, args);
        tracing::debug!("capturing `{cmd}`");

        let out = self
            .command(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| EngineError::Spawn {
                cmd: cmd.clone(),
                source,
            })?;
        if !out.status.success() {
            return Err(EngineError::Exit {
                cmd,
                code: exit_code(out.status),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim_end().to_string())
    }

    async fn stream(&mut self, args: &[&str]) -> Result<i32> {
        let cmd = command_line(&self.bin, args);
        tracing::debug!("running `{cmd}`");

        let status = self
            .command(args)
            .status()
            .await
            .map_err(|source| EngineError::Spawn { cmd, source })?;
        Ok(exit_code(status))
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(if status.success() { 0 } else { 1 })
}

pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Active engine context, as reported by `context show` / `context inspect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineContext {
    pub name: String,
    pub host: String,
    pub backend: String,
}

#[derive(Debug, Deserialize)]
struct ContextInspect {
    #[serde(rename = "Endpoints", default)]
    endpoints: HashMap<String, Endpoint>,
}

#[derive(Debug, Deserialize)]
struct Endpoint {
    #[serde(rename = "Host", default)]
    host: String,
}

/// Best effort; `None` when the engine has no notion of contexts or the query fails.
pub async fn detect_context<E: Engine>(engine: &mut E) -> Option<EngineContext> {
    let name = match engine.capture(&["context", "show"]).await {
        Ok(out) if !out.trim().is_empty() => out.trim().to_string(),
        Ok(_) => return None,
        Err(e) => {
            tracing::debug!("context show failed: {e:#}");
            return None;
        }
    };

    let host = match engine.capture(&["context", "inspect", name.as_str()]).await {
        Ok(info) => parse_context_host(&info).unwrap_or_default(),
        Err(e) => {
            tracing::debug!("context inspect failed: {e:#}");
            String::new()
        }
    };

    Some(EngineContext {
        backend: classify(&name, &host),
        name,
        host,
    })
}

fn parse_context_host(info: &str) -> Option<String> {
    let parsed: Vec<ContextInspect> = serde_json::from_str(info).ok()?;
    parsed
        .into_iter()
        .next()?
        .endpoints
        .remove("docker")
        .map(|e| e.host)
}

fn classify(context_name: &str, host: &str) -> String {
    let s = format!("{context_name} {host}").to_lowercase();
    if s.contains("colima") {
        "colima".to_string()
    } else {
        "docker".to_string()
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockEngine;
    use super::*;

    #[test]
    fn classify_backend() {
        assert_eq!(classify("colima", "unix:///Users/me/.colima/default/docker.sock"), "colima");
        assert_eq!(classify("default", "unix:///var/run/docker.sock"), "docker");
    }

    #[test]
    fn parses_inspect_host() {
        let info = r#"[{"Name":"colima","Endpoints":{"docker":{"Host":"unix:///tmp/colima.sock","SkipTLSVerify":false}}}]"#;
        assert_eq!(parse_context_host(info).as_deref(), Some("unix:///tmp/colima.sock"));
        assert_eq!(parse_context_host("not json"), None);
        assert_eq!(parse_context_host("[]"), None);
    }

    #[tokio::test]
    async fn detects_context() {
        let mut engine = MockEngine::default()
            .with_output("context show", "colima\n")
            .with_output(
                "context inspect colima",
                r#"[{"Endpoints":{"docker":{"Host":"unix:///c.sock"}}}]"#,
            );

        let ctx = detect_context(&mut engine).await.unwrap();
        assert_eq!(ctx.name, "colima");
        assert_eq!(ctx.host, "unix:///c.sock");
        assert_eq!(ctx.backend, "colima");
    }

    #[tokio::test]
    async fn context_absent_when_show_fails() {
        let mut engine = MockEngine::default();
        assert_eq!(detect_context(&mut engine).await, None);
        assert_eq!(engine.calls, vec!["context show"]);
    }

    #[tokio::test]
    async fn missing_binary_is_spawn_error() {
        let mut engine = DockerCli::new("/nonexistent/stackctl-engine", ".");
        let err = engine.capture(&["version"]).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::Spawn { .. })
        ));
        assert!(engine.stream(&["version"]).await.is_err());
    }

    #[test]
    fn echoes_command_line() {
        assert_eq!(
            command_line("docker", &["compose", "up", "-d"]),
            "docker compose up -d"
        );
    }
}
