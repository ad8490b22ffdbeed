// tests/cli_test.rs
use auto_tag::cli::Args;
use auto_tag::config::HostKind;
use clap::Parser;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::process::Command;

const RUN_ENV: &[&str] = &[
    "GITHUB_WORKSPACE",
    "GITHUB_TOKEN",
    "INPUT_GITHUB_TOKEN",
    "GITHUB_SHA",
    "GITHUB_REPOSITORY",
    "INPUT_DRY_RUN",
    "INPUT_PACKAGE_ROOT",
    "INPUT_PREFIX",
    "AUTO_TAG_HOST",
    "GITHUB_OUTPUT",
];

fn clear_run_env() {
    for key in RUN_ENV {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_run_inputs_from_environment() {
    clear_run_env();
    env::set_var("GITHUB_WORKSPACE", "/github/workspace");
    env::set_var("GITHUB_TOKEN", "ghp_env");
    env::set_var("GITHUB_SHA", "ffff0000");
    env::set_var("GITHUB_REPOSITORY", "octo-org/demo");
    env::set_var("INPUT_DRY_RUN", "true");

    let run = Args::try_parse_from(["auto-tag"]).unwrap().run_config();
    clear_run_env();

    assert_eq!(run.workspace, Some(PathBuf::from("/github/workspace")));
    assert_eq!(run.token.as_deref(), Some("ghp_env"));
    assert_eq!(run.commit_sha.as_deref(), Some("ffff0000"));
    assert_eq!(run.repository.as_deref(), Some("octo-org/demo"));
    assert_eq!(run.host, HostKind::Github);
    assert!(run.dry_run);
}

#[test]
#[serial]
fn test_input_token_fallback() {
    clear_run_env();
    env::set_var("INPUT_GITHUB_TOKEN", "ghp_input");

    let run = Args::try_parse_from(["auto-tag"]).unwrap().run_config();
    clear_run_env();

    assert_eq!(run.token.as_deref(), Some("ghp_input"));
}

#[test]
#[serial]
fn test_dry_run_false_from_environment() {
    clear_run_env();
    env::set_var("INPUT_DRY_RUN", "false");

    let args = Args::try_parse_from(["auto-tag"]).unwrap();
    clear_run_env();

    assert!(!args.dry_run);
}

#[test]
#[serial]
fn test_flags_override_environment() {
    clear_run_env();
    env::set_var("GITHUB_SHA", "from-env");
    env::set_var("AUTO_TAG_HOST", "local");

    let args = Args::try_parse_from(["auto-tag", "--sha", "from-flag"]).unwrap();
    clear_run_env();

    let run = args.run_config();
    assert_eq!(run.commit_sha.as_deref(), Some("from-flag"));
    assert_eq!(run.host, HostKind::Local);
}

#[test]
fn test_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_auto-tag"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("auto-tag"));
    assert!(stdout.contains("--dry-run"));
}

#[test]
fn test_missing_workspace_fails_without_outputs() {
    let mut command = Command::new(env!("CARGO_BIN_EXE_auto-tag"));
    for key in RUN_ENV {
        command.env_remove(key);
    }
    let output = command
        .args(["--token", "ghp_x", "--sha", "abc"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("No GITHUB_WORKSPACE provided"));
}
