//! Read-only diagnostics run before handing control to the menu.
//!
//! Only [`check_engine`] can stop the session; everything else reports and
//! moves on.

use crate::config::Config;
use crate::console::Console;
use crate::docker::{self, Engine};
use crate::env;
use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tokio::io::AsyncBufRead;

const PLATFORM_FORMAT: &str = "{{.Server.Os}}/{{.Server.Arch}}";

pub async fn check_engine<E, R, W>(engine: &mut E, console: &mut Console<R, W>) -> Result<bool>
where
    E: Engine,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    match engine.capture(&["version"]).await {
        Ok(_) => Ok(true),
        Err(e) => {
            tracing::debug!("engine check failed: {e:#}");
            console.warn("Docker is not installed or not running.\n")?;
            Ok(false)
        }
    }
}

/// Image names declared by the compose file, in declaration order.
pub async fn declared_images<E: Engine>(engine: &mut E) -> Vec<String> {
    match engine.capture(&["compose", "config", "--images"]).await {
        Ok(out) => out
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect(),
        Err(e) => {
            tracing::warn!("could not list compose images: {e:#}");
            Vec::new()
        }
    }
}

/// Subset of `images` with no local copy.
pub async fn missing_images<E: Engine>(engine: &mut E, images: &[String]) -> Vec<String> {
    let mut missing = Vec::new();
    for img in images {
        let present = match engine.capture(&["images", "-q", img.as_str()]).await {
            Ok(out) => !out.trim().is_empty(),
            Err(e) => {
                tracing::debug!("image lookup for {img} failed: {e:#}");
                false
            }
        };
        if !present {
            missing.push(img.clone());
        }
    }
    missing
}

pub async fn check_images<E, R, W>(engine: &mut E, console: &mut Console<R, W>) -> Result<Vec<String>>
where
    E: Engine,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.step(2, "Checking required images...")?;
    let images = declared_images(engine).await;
    let missing = missing_images(engine, &images).await;
    if missing.is_empty() {
        console.success("All service images are available.")?;
    } else {
        console.warn(format!("Images missing and need build: {}", missing.join(", ")))?;
    }
    Ok(missing)
}

/// Report required variables that are unset or empty in `env_path`.
pub fn check_env<R, W>(cfg: &Config, console: &mut Console<R, W>, env_path: &Path) -> Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.step(3, "Checking environment configuration...")?;
    let vars = env::load_env_file(env_path)?;
    let missing = env::missing_vars(cfg.required_vars.as_slice(), &vars);
    if missing.is_empty() {
        console.success("All required environment variables are set.")?;
    } else {
        console.warn(format!("Missing variables: {}", missing.join(", ")))?;
        console.say(format!(
            "See README for setup instructions: {}\n",
            cfg.readme.display()
        ))?;
    }
    Ok(missing)
}

pub async fn detect_platform<E, R, W>(engine: &mut E, console: &mut Console<R, W>) -> Result<String>
where
    E: Engine,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.step(4, "Detecting Docker build platform...")?;
    let platform = match engine.capture(&["version", "--format", PLATFORM_FORMAT]).await {
        Ok(out) if !out.trim().is_empty() => out.trim().to_string(),
        Ok(_) => "unknown".to_string(),
        Err(e) => {
            tracing::debug!("platform query failed: {e:#}");
            "unknown".to_string()
        }
    };

    if let Some(ctx) = docker::detect_context(engine).await {
        if ctx.host.is_empty() {
            console.say(format!("Docker context: {} ({})", ctx.name, ctx.backend))?;
        } else {
            console.say(format!(
                "Docker context: {} ({}, {})",
                ctx.name, ctx.backend, ctx.host
            ))?;
        }
    }
    console.say(format!("Docker build platform detected: {platform}\n"))?;
    Ok(platform)
}
