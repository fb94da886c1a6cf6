#![cfg(unix)]

use solver_bench::config::InputMode;
use solver_bench::infra::command::{spawn_and_capture, DriverCommand};
use solver_bench::models::TestCase;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn case_at(path: PathBuf) -> TestCase {
    TestCase::from_path(&path).unwrap()
}

#[test]
fn test_parse_simple_command() {
    let driver = DriverCommand::parse("python3 cs412_mingraphcolor_exact.py").unwrap();
    assert_eq!(driver.program, "python3");
    assert_eq!(driver.args, vec!["cs412_mingraphcolor_exact.py"]);
}

#[test]
fn test_parse_respects_quotes() {
    let driver = DriverCommand::parse(r#"sh -c 'exit 3' "two words""#).unwrap();
    assert_eq!(driver.program, "sh");
    assert_eq!(driver.args, vec!["-c", "exit 3", "two words"]);
}

#[test]
fn test_parse_errors() {
    assert!(DriverCommand::parse("").is_err());
    assert!(DriverCommand::parse("   ").is_err());
    assert!(DriverCommand::parse("sh -c 'unterminated").is_err());
}

#[test]
fn test_display_for_modes() {
    let driver = DriverCommand::parse("python3 solver.py").unwrap();
    let case = TestCase {
        name: "a.txt".to_string(),
        path: PathBuf::from("/cases/a.txt"),
    };

    assert_eq!(
        driver.display_for(&case, InputMode::Stdin),
        "python3 solver.py < /cases/a.txt"
    );
    assert_eq!(
        driver.display_for(&case, InputMode::Argument),
        "python3 solver.py /cases/a.txt"
    );
}

#[tokio::test]
async fn test_stdin_mode_feeds_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "hello from the case\n").unwrap();

    let driver = DriverCommand::parse("cat").unwrap();
    let cmd = driver
        .build(&case_at(path), InputMode::Stdin, dir.path())
        .unwrap();
    let output = spawn_and_capture(cmd, false).await.unwrap();

    assert!(output.status.success());
    assert_eq!(output.output, "hello from the case\n");
}

#[tokio::test]
async fn test_argument_mode_appends_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "x").unwrap();

    let driver = DriverCommand::parse("echo arg").unwrap();
    let cmd = driver
        .build(&case_at(path.clone()), InputMode::Argument, dir.path())
        .unwrap();
    let output = spawn_and_capture(cmd, false).await.unwrap();

    assert!(output.status.success());
    assert_eq!(output.output, format!("arg {}\n", path.display()));
}

#[tokio::test]
async fn test_driver_runs_in_work_dir() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "").unwrap();
    fs::write(dir.path().join("marker"), "").unwrap();

    let driver = DriverCommand::parse("ls").unwrap();
    let cmd = driver
        .build(&case_at(path), InputMode::Stdin, dir.path())
        .unwrap();
    let output = spawn_and_capture(cmd, false).await.unwrap();

    assert!(output.output.lines().any(|l| l == "marker"));
}

#[tokio::test]
async fn test_captures_both_streams_and_exit_code() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "").unwrap();

    let driver = DriverCommand::parse("sh -c 'echo out; echo err >&2; exit 4'").unwrap();
    let cmd = driver
        .build(&case_at(path), InputMode::Stdin, dir.path())
        .unwrap();
    let output = spawn_and_capture(cmd, false).await.unwrap();

    assert_eq!(output.status.code(), Some(4));
    assert!(output.output.contains("out\n"));
    assert!(output.output.contains("err\n"));
}

#[tokio::test]
async fn test_exit_is_seen_while_grandchild_holds_pipes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "").unwrap();

    let driver = DriverCommand::parse("sh -c '(sleep 3 &); echo x'").unwrap();
    let cmd = driver
        .build(&case_at(path), InputMode::Stdin, dir.path())
        .unwrap();

    let started = Instant::now();
    let output = spawn_and_capture(cmd, false).await.unwrap();

    assert!(output.status.success());
    assert_eq!(output.output, "x\n");
    assert!(output.exited_at.duration_since(started) < Duration::from_secs(1));
    assert!(started.elapsed() < Duration::from_millis(2_500));
}

#[tokio::test]
async fn test_large_output_does_not_block_child() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("big.txt");
    let line = "0123456789".repeat(10);
    let content: String = (0..5_000).map(|_| format!("{line}\n")).collect();
    fs::write(&path, &content).unwrap();

    let driver = DriverCommand::parse("cat").unwrap();
    let cmd = driver
        .build(&case_at(path), InputMode::Stdin, dir.path())
        .unwrap();
    let output = spawn_and_capture(cmd, false).await.unwrap();

    assert!(output.status.success());
    assert_eq!(output.output.len(), content.len());
}

#[tokio::test]
async fn test_invalid_utf8_is_replaced() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.bin");
    fs::write(&path, b"ok \xff\xfe\n").unwrap();

    let driver = DriverCommand::parse("cat").unwrap();
    let cmd = driver
        .build(&case_at(path), InputMode::Stdin, dir.path())
        .unwrap();
    let output = spawn_and_capture(cmd, false).await.unwrap();

    assert!(output.output.starts_with("ok "));
    assert!(output.output.contains('\u{FFFD}'));
}

#[tokio::test]
async fn test_missing_program_is_spawn_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "").unwrap();

    let driver = DriverCommand::parse("this_command_definitely_does_not_exist_12345").unwrap();
    let cmd = driver
        .build(&case_at(path), InputMode::Stdin, dir.path())
        .unwrap();

    let err = spawn_and_capture(cmd, false).await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn test_build_fails_for_missing_case_file_in_stdin_mode() {
    let dir = tempdir().unwrap();
    let driver = DriverCommand::parse("cat").unwrap();
    let case = TestCase {
        name: "gone.txt".to_string(),
        path: dir.path().join("gone.txt"),
    };

    assert!(driver.build(&case, InputMode::Stdin, dir.path()).is_err());
    assert!(driver.build(&case, InputMode::Argument, dir.path()).is_ok());
}
