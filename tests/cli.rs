use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn stackctl() -> Command {
    Command::cargo_bin("stackctl").expect("stackctl binary should be built for tests")
}

#[test]
fn help_lists_flags() {
    stackctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--env-file"))
        .stdout(predicate::str::contains("--project-dir"));
}

#[test]
fn version_flag() {
    stackctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_engine_ends_session_cleanly() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("docker-compose.yml"), "services: {}\n").unwrap();

    stackctl()
        .current_dir(tmp.path())
        .env("DOCKER_BIN", tmp.path().join("no-such-docker"))
        .write_stdin("\n\n6\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Docker is not installed or not running."))
        .stdout(predicate::str::contains("Step 1").not());
}

#[cfg(unix)]
const FAKE_DOCKER: &str = r#"#!/bin/sh
case "$*" in
  "version") echo "Client: fake" ;;
  "version --format {{.Server.Os}}/{{.Server.Arch}}") echo "linux/amd64" ;;
  "compose config --images") printf 'api:dev\npostgres:16\n' ;;
  "images -q api:dev") echo "3f2a9c" ;;
  "images -q postgres:16") ;;
  "context show") exit 1 ;;
  "compose down -v") echo "fake teardown"; exit 2 ;;
  *) echo "fake $* app=$GITHUB_LOGIN_APP_ID" ;;
esac
"#;

#[cfg(unix)]
#[test]
fn scripted_session_against_fake_engine() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    fs::write(root.join("docker-compose.yml"), "services: {}\n").unwrap();
    fs::write(
        root.join(".env.local"),
        "# local settings\nPOSTGRES_PASSWORD=pw\nnot a setting\nGITHUB_LOGIN_APP_ID=42\nGITHUB_LOGIN_KEY=\n",
    )
    .unwrap();
    let nested = root.join("scripts");
    fs::create_dir_all(&nested).unwrap();

    let bin = root.join("fake-docker");
    fs::write(&bin, FAKE_DOCKER).unwrap();
    fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();

    // Accept default env file, build, restart, destructive rebuild, junk, exit.
    stackctl()
        .current_dir(&nested)
        .env("DOCKER_BIN", &bin)
        .env_remove("GITHUB_LOGIN_APP_ID")
        .write_stdin("\ny\n2\n4\nnope\n6\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Default location: .env.local"))
        .stdout(predicate::str::contains("Images missing and need build: postgres:16"))
        .stdout(predicate::str::contains("Missing variables: GITHUB_LOGIN_APP_INSTALLATION_ID"))
        .stdout(predicate::str::contains("GITHUB_LOGIN_KEY"))
        .stdout(predicate::str::contains("Docker build platform detected: linux/amd64"))
        .stdout(predicate::str::contains("fake compose build"))
        .stdout(predicate::str::contains("fake compose restart app=42"))
        .stdout(predicate::str::contains("fake teardown"))
        .stdout(predicate::str::contains("exited with status 2"))
        .stdout(predicate::str::contains("fake compose up -d --build"));
}

#[cfg(unix)]
#[test]
fn env_file_flag_skips_prompt() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    fs::write(root.join("docker-compose.yml"), "services: {}\n").unwrap();

    stackctl()
        .current_dir(root)
        .env("DOCKER_BIN", "true")
        .args(["--env-file", "missing.env"])
        .write_stdin("n\n6\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Default location").not())
        .stdout(predicate::str::contains("missing.env does not exist."))
        .stdout(predicate::str::contains("Missing variables: POSTGRES_PASSWORD"));
}
