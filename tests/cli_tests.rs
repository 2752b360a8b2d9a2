//! End-to-end tests sending a real SIGINT to the cancel-bus binary

#![cfg(unix)]

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

/// Start a long `run` with debug logging so the trap installation is visible
fn spawn_run(global_args: &[&str]) -> (Child, Receiver<String>) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cancel-bus"))
        .arg("-v")
        .args(global_args)
        .args(["run", "-n", "2000", "--step-ms", "5", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start cancel-bus");

    // Drain stderr so per-step logging never blocks the child
    let stderr = child.stderr.take().expect("stderr is piped");
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in BufReader::new(stderr).lines().map_while(Result::ok) {
            let _ = tx.send(line);
        }
    });

    (child, rx)
}

/// Block until the child has registered its Ctrl+C handler
fn wait_for_trap(rx: &Receiver<String>) {
    loop {
        let line = rx
            .recv_timeout(Duration::from_secs(10))
            .expect("Interrupt handler was never installed");
        if line.contains("Interrupt handler installed") {
            return;
        }
    }
}

/// Send SIGINT, optionally answering the menu first, and collect the result
fn interrupt(mut child: Child, answer: Option<&str>) -> Output {
    if let Some(answer) = answer {
        let mut stdin = child.stdin.take().expect("stdin is piped");
        stdin
            .write_all(answer.as_bytes())
            .expect("Failed to write answer");
        stdin.flush().expect("Failed to flush answer");
    }

    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("Failed to run kill");
    assert!(status.success());

    child.wait_with_output().expect("Failed to wait for cancel-bus")
}

#[test]
fn test_interrupt_with_handler_disabled_exits_nonzero() {
    let (child, rx) = spawn_run(&["--no-handler"]);
    wait_for_trap(&rx);

    let output = interrupt(child, None);

    assert_eq!(output.status.code(), Some(255));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("(I/C/P/D)"), "menu must not be shown");
}

#[test]
fn test_interrupt_answer_i_exits_zero() {
    let (child, rx) = spawn_run(&[]);
    wait_for_trap(&rx);

    let output = interrupt(child, Some("I\n"));

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Killing the application..."));
    assert!(!stdout.contains("\"status\""), "no report after immediate exit");
}

#[test]
fn test_interrupt_answer_c_returns_partial_report() {
    let (child, rx) = spawn_run(&[]);
    wait_for_trap(&rx);

    let output = interrupt(child, Some("C\n"));

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"status\": \"cancelled\""));
    assert!(!stdout.contains("\"completed_steps\": 2000"));
}
