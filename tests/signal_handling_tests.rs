// Signal handling integration tests
//
// A first SIGINT/SIGTERM stops decoding at the next record boundary and the
// process exits with 128 + signal number without writing a report.

#![cfg(unix)]

mod common;
use common::*;

use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

fn spawn_on_stdin(args: &[&str]) -> Child {
    Command::new(binary_path())
        .args(["-f", "-"])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn recipe-stats")
}

fn send_signal(child: &Child, signal: &str) {
    Command::new("kill")
        .args([signal, &child.id().to_string()])
        .output()
        .expect("Failed to send signal");
}

/// Feed a partial array, signal, then feed one more record so the decoder
/// wakes up and observes the cancellation.
fn interrupt_mid_stream(signal: &str, args: &[&str]) -> (String, String, i32) {
    let mut child = spawn_on_stdin(args);
    let mut stdin = child.stdin.take().expect("stdin is piped");

    let head = format!(
        "[{},",
        fixture_record("10120", "Mushroom Pie", "Wednesday 9AM - 11AM")
    );
    stdin.write_all(head.as_bytes()).unwrap();
    stdin.flush().unwrap();

    thread::sleep(Duration::from_millis(200));
    send_signal(&child, signal);
    thread::sleep(Duration::from_millis(100));

    // The process may already be gone; a broken pipe here is fine.
    let tail = format!(
        "{},",
        fixture_record("10224", "Creamy Dill Chicken", "Thursday 7AM - 5PM")
    );
    let _ = stdin.write_all(tail.as_bytes());
    let _ = stdin.flush();
    drop(stdin);

    let output = child.wait_with_output().expect("Failed to read output");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

#[test]
fn test_sigint_cancels_and_exits_130() {
    let (stdout, stderr, exit_code) = interrupt_mid_stream("-INT", &["--no-output-file"]);
    assert_eq!(exit_code, 130, "stderr: {}", stderr);
    assert!(stdout.is_empty(), "no report on cancellation");
    assert!(stderr.contains("Cancelled"), "stderr: {}", stderr);
}

#[test]
fn test_sigterm_cancels_and_exits_143() {
    let (stdout, stderr, exit_code) = interrupt_mid_stream("-TERM", &["--no-output-file"]);
    assert_eq!(exit_code, 143, "stderr: {}", stderr);
    assert!(stdout.is_empty());
}

#[test]
fn test_cancelled_run_writes_no_report_file() {
    let dir = tempdir().unwrap();
    let output_path = dir.path().join("result.json");
    let output_arg = output_path.to_string_lossy().to_string();

    let (_, stderr, exit_code) = interrupt_mid_stream("-INT", &["-o", &output_arg]);
    assert_eq!(exit_code, 130, "stderr: {}", stderr);
    assert!(!output_path.exists());
}

#[test]
fn test_double_sigint_immediate_exit() {
    let mut child = spawn_on_stdin(&["--no-output-file"]);
    let mut stdin = child.stdin.take().expect("stdin is piped");
    stdin.write_all(b"[").unwrap();
    stdin.flush().unwrap();

    thread::sleep(Duration::from_millis(200));
    send_signal(&child, "-INT");
    thread::sleep(Duration::from_millis(50));
    send_signal(&child, "-INT");

    // stdin stays open: only the second signal can end the process
    let status = child.wait().expect("Failed to wait for child");
    drop(stdin);
    assert_eq!(status.code(), Some(130));
}

#[test]
fn test_broken_pipe_exit_code() {
    let input = generated_fixture(50);
    let mut child = Command::new(binary_path())
        .args(["-f", "-", "--no-output-file"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn recipe-stats");

    // Close the read end of stdout before the report is printed
    drop(child.stdout.take());
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes()).unwrap();
    }

    let status = child.wait().expect("Failed to wait for child");
    assert_eq!(status.code(), Some(141));
}
