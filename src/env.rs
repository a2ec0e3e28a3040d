use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Parse `KEY=VALUE` lines. Blank lines, `#` comments and lines without `=` are
/// skipped; the split happens at the first `=` and the value is kept as written.
pub fn parse_env(text: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) => {
                vars.insert(key.trim().to_string(), value.to_string());
            }
            None => tracing::warn!("env line {} has no `=`, skipped", idx + 1),
        }
    }
    vars
}

/// Read an env file. A missing file yields an empty map; any other I/O failure is fatal.
pub fn load_env_file(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read env file {}", path.display()))?;
    Ok(parse_env(&text))
}

/// Required names whose value is absent or empty, in declaration order.
pub fn missing_vars<S: AsRef<str>>(required: &[S], env: &HashMap<String, String>) -> Vec<String> {
    required
        .iter()
        .map(|v| v.as_ref())
        .filter(|v| env.get(*v).map_or(true, |val| val.is_empty()))
        .map(|v| v.to_string())
        .collect()
}

/// Copy parsed variables into the process environment so compose interpolation
/// in child processes sees the same values the env check saw. Variables already
/// set win. Returns how many were exported.
pub fn export_to_process(vars: &HashMap<String, String>) -> usize {
    let mut exported = 0;
    for (key, value) in vars {
        if key.is_empty() || key.contains('\0') || value.contains('\0') {
            tracing::warn!("env variable {key:?} cannot be exported, skipped");
            continue;
        }
        if std::env::var_os(key).is_some() {
            continue;
        }
        std::env::set_var(key, value);
        exported += 1;
    }
    exported
}
