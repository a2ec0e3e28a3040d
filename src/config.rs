use std::path::{Path, PathBuf};

/// Variables the stack cannot start without.
pub const REQUIRED_VARS: &[&str] = &[
    "POSTGRES_PASSWORD",
    "GITHUB_LOGIN_APP_ID",
    "GITHUB_LOGIN_APP_INSTALLATION_ID",
    "GITHUB_LOGIN_KEY",
    "GITHUB_LOGIN_SYSTEM_USER_NAME",
    "GITHUB_LOGIN_SYSTEM_USER_PERSONALACCESSTOKEN",
];

const COMPOSE_FILES: &[&str] = &[
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yml",
    "compose.yaml",
];

const DEFAULT_ENV_FILE: &str = ".env.local";

/// Settings resolved once at startup and shared read-only by every step.
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub docker_bin: String,
    pub default_env_file: PathBuf,
    /// Set from `--env-file`; skips the interactive prompt.
    pub env_file_override: Option<PathBuf>,
    pub required_vars: Vec<String>,
    pub readme: PathBuf,
}

impl Config {
    pub fn new(root: PathBuf, docker_bin: String, env_file_override: Option<PathBuf>) -> Self {
        Config {
            default_env_file: root.join(DEFAULT_ENV_FILE),
            readme: root.join("README.md"),
            env_file_override: env_file_override.map(|p| root.join(p)),
            required_vars: REQUIRED_VARS.iter().map(|v| v.to_string()).collect(),
            docker_bin,
            root,
        }
    }

    /// Resolve what the user typed at the env-file prompt. Empty input picks the default.
    pub fn resolve_env_path(&self, input: &str) -> PathBuf {
        let input = input.trim();
        if input.is_empty() {
            self.default_env_file.clone()
        } else {
            self.root.join(input)
        }
    }

    /// `path` shown relative to the project root when it lives under it.
    pub fn display_relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

pub fn resolve_docker_binary() -> String {
    std::env::var("DOCKER_BIN")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "docker".to_string())
}

pub fn find_project_root(start_dir: &Path) -> PathBuf {
    // Walk up until a compose file shows up; the stack is driven from there.
    let mut dir = start_dir.to_path_buf();

    for _ in 0..12 {
        if COMPOSE_FILES.iter().any(|f| dir.join(f).exists()) {
            return dir;
        }

        match dir.parent() {
            Some(parent) if parent != dir => dir = parent.to_path_buf(),
            _ => break,
        }
    }

    start_dir.to_path_buf()
}
