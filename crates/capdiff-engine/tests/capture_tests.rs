#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use capdiff_core::errors::ExErrorKind;
use capdiff_core::exec::{CommandError, ConnectError};
use capdiff_core::outcome::{FailureReason, FailureScope};
use capdiff_engine::exec::scripted::ConnectErrorKind;
use capdiff_engine::exec::ScriptedExecutor;
use capdiff_engine::{run_capture, CancelFlag, CaptureOptions};
use common::{device, file_names};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_scenario_single_router_capture() {
    let dir = TempDir::new().unwrap();
    let window = dir.path().join("pre-change");
    let executor = ScriptedExecutor::new().with_output(
        "R1",
        "show ip interface brief",
        "Interface  Status\nGi0/0 up\n",
    );

    let outcome = run_capture(
        &window,
        &[device("R1", &["show ip interface brief"])],
        &executor,
        &CaptureOptions::default(),
    )
    .unwrap();

    assert!(!outcome.had_errors());
    assert_eq!(outcome.artifacts_written, 1);
    let content = fs::read_to_string(window.join("R1_show_ip_interface_brief.txt")).unwrap();
    assert!(content.contains("Gi0/0 up"));
}

#[test]
fn test_existing_window_fails_before_contacting_devices() {
    let dir = TempDir::new().unwrap();
    let window = dir.path().join("pre-change");
    fs::create_dir(&window).unwrap();
    fs::write(window.join("keep.txt"), "untouched").unwrap();
    let executor = ScriptedExecutor::new().with_output("R1", "show clock", "12:00\n");

    let err = run_capture(
        &window,
        &[device("R1", &["show clock"])],
        &executor,
        &CaptureOptions::default(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
    assert!(executor.calls().is_empty());
    assert_eq!(file_names(&window), vec!["keep.txt"]);
    assert_eq!(fs::read_to_string(window.join("keep.txt")).unwrap(), "untouched");
}

#[test]
fn test_session_failure_skips_only_that_device() {
    let dir = TempDir::new().unwrap();
    let window = dir.path().join("w");
    let executor = ScriptedExecutor::new()
        .with_connect_error("R1", ConnectErrorKind::AuthFailure, "bad password")
        .with_output("R2", "show clock", "12:00\n");

    let outcome = run_capture(
        &window,
        &[device("R1", &["show clock"]), device("R2", &["show clock"])],
        &executor,
        &CaptureOptions::default(),
    )
    .unwrap();

    assert!(outcome.had_errors());
    assert_eq!(outcome.artifacts_written, 1);
    assert_eq!(file_names(&window), vec!["R2_show_clock.txt"]);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(
        outcome.failures[0].scope,
        FailureScope::Device {
            hostname: "R1".to_string()
        }
    );
    assert_eq!(
        outcome.failures[0].reason,
        FailureReason::Connect(ConnectError::AuthFailure("bad password".to_string()))
    );
}

#[test]
fn test_every_connect_error_kind_is_isolated() {
    let dir = TempDir::new().unwrap();
    let executor = ScriptedExecutor::new()
        .with_connect_error("A", ConnectErrorKind::AuthFailure, "auth")
        .with_connect_error("B", ConnectErrorKind::Timeout, "slow")
        .with_connect_error("C", ConnectErrorKind::ProtocolError, "kex")
        .with_connect_error("D", ConnectErrorKind::Unclassified, "eof")
        .with_output("E", "show clock", "12:00\n");
    let inventory: Vec<_> = ["A", "B", "C", "D", "E"]
        .iter()
        .map(|h| device(h, &["show clock"]))
        .collect();

    let outcome = run_capture(
        &dir.path().join("w"),
        &inventory,
        &executor,
        &CaptureOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.failures.len(), 4);
    assert_eq!(outcome.artifacts_written, 1);
    assert!(matches!(
        outcome.failures[1].reason,
        FailureReason::Connect(ConnectError::Timeout(_))
    ));
    assert!(matches!(
        outcome.failures[2].reason,
        FailureReason::Connect(ConnectError::ProtocolError(_))
    ));
}

#[test]
fn test_command_error_and_rejection_leave_siblings_running() {
    let dir = TempDir::new().unwrap();
    let window = dir.path().join("w");
    let executor = ScriptedExecutor::new()
        .with_output("R1", "show version", "Cisco IOS 15.2\n")
        .with_command_error("R1", "show bgp", "channel closed")
        .with_output("R1", "show ip bgp", "% Incomplete command.\n")
        .with_output("R1", "show clock", "12:00\n");

    let outcome = run_capture(
        &window,
        &[device(
            "R1",
            &["show version", "show bgp", "show ip bgp", "show clock"],
        )],
        &executor,
        &CaptureOptions::default(),
    )
    .unwrap();

    assert_eq!(
        file_names(&window),
        vec!["R1_show_clock.txt", "R1_show_version.txt"]
    );
    assert_eq!(outcome.failures.len(), 2);
    assert_eq!(
        outcome.failures[0].reason,
        FailureReason::Command(CommandError::Transport("channel closed".to_string()))
    );
    assert_eq!(
        outcome.failures[1].reason,
        FailureReason::Rejected {
            marker: "Incomplete command".to_string()
        }
    );
    assert_eq!(
        outcome.failures[1].scope,
        FailureScope::Command {
            hostname: "R1".to_string(),
            command: "show ip bgp".to_string()
        }
    );
}

#[test]
fn test_commands_sent_in_declared_order() {
    let dir = TempDir::new().unwrap();
    let executor = ScriptedExecutor::new()
        .with_output("R1", "terminal length 0", "")
        .with_output("R1", "show run", "hostname R1\n")
        .with_output("R1", "show clock", "12:00\n");

    run_capture(
        &dir.path().join("w"),
        &[device("R1", &["terminal length 0", "show run", "show clock"])],
        &executor,
        &CaptureOptions::default(),
    )
    .unwrap();

    let sent: Vec<String> = executor.calls().into_iter().map(|(_, c)| c).collect();
    assert_eq!(sent, vec!["terminal length 0", "show run", "show clock"]);
}

#[test]
fn test_custom_rejection_markers() {
    let dir = TempDir::new().unwrap();
    let window = dir.path().join("w");
    let executor = ScriptedExecutor::new()
        .with_output("J1", "show route", "syntax error, expecting <command>.\n")
        .with_output("J1", "show version", "% Invalid input detected at '^' marker.\n");
    let options = CaptureOptions {
        rejection_markers: vec!["syntax error".to_string()],
        ..CaptureOptions::default()
    };

    let outcome = run_capture(
        &window,
        &[device("J1", &["show route", "show version"])],
        &executor,
        &options,
    )
    .unwrap();

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(file_names(&window), vec!["J1_show_version.txt"]);
}

#[test]
fn test_colliding_commands_later_output_wins() {
    let dir = TempDir::new().unwrap();
    let window = dir.path().join("w");
    let executor = ScriptedExecutor::new()
        .with_output("R1", "show ip route", "first\n")
        .with_output("R1", "show:ip route", "second\n");

    let outcome = run_capture(
        &window,
        &[device("R1", &["show ip route", "show:ip route"])],
        &executor,
        &CaptureOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.artifacts_written, 2);
    assert_eq!(file_names(&window), vec!["R1_show_ip_route.txt"]);
    assert_eq!(
        fs::read_to_string(window.join("R1_show_ip_route.txt")).unwrap(),
        "second\n"
    );
}

#[test]
fn test_parallel_capture_matches_sequential() {
    let dir = TempDir::new().unwrap();
    let mut executor = ScriptedExecutor::new();
    let mut inventory = Vec::new();
    for i in 0..12 {
        let host = format!("SW{}", i);
        executor = executor
            .with_output(&host, "show vlan", format!("vlan {} active\n", i))
            .with_output(&host, "show clock", "12:00\n");
        inventory.push(device(&host, &["show vlan", "show clock"]));
    }

    let sequential = dir.path().join("sequential");
    let parallel = dir.path().join("parallel");
    let seq_outcome = run_capture(
        &sequential,
        &inventory,
        &executor,
        &CaptureOptions {
            workers: 1,
            ..CaptureOptions::default()
        },
    )
    .unwrap();
    let par_outcome = run_capture(
        &parallel,
        &inventory,
        &executor,
        &CaptureOptions {
            workers: 8,
            ..CaptureOptions::default()
        },
    )
    .unwrap();

    assert_eq!(seq_outcome, par_outcome);
    assert_eq!(file_names(&sequential), file_names(&parallel));
    assert_eq!(file_names(&parallel).len(), 24);
    for name in file_names(&sequential) {
        assert_eq!(
            fs::read(sequential.join(&name)).unwrap(),
            fs::read(parallel.join(&name)).unwrap()
        );
    }
}

#[test]
fn test_same_responses_give_byte_identical_windows() {
    let dir = TempDir::new().unwrap();
    let executor = ScriptedExecutor::new()
        .with_output("R1", "show run", "hostname R1\r\ninterface Gi0/0\r\n")
        .with_output("R2", "show run", "hostname R2\n");
    let inventory = vec![device("R1", &["show run"]), device("R2", &["show run"])];

    for window in ["first", "second"] {
        run_capture(
            &dir.path().join(window),
            &inventory,
            &executor,
            &CaptureOptions::default(),
        )
        .unwrap();
    }

    for name in file_names(&dir.path().join("first")) {
        assert_eq!(
            fs::read(dir.path().join("first").join(&name)).unwrap(),
            fs::read(dir.path().join("second").join(&name)).unwrap()
        );
    }
}

#[test]
fn test_cancelled_before_start_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let window = dir.path().join("w");
    let executor = ScriptedExecutor::new()
        .with_output("R1", "show clock", "12:00\n")
        .with_output("R2", "show clock", "12:00\n");
    let cancel = CancelFlag::new();
    cancel.cancel();

    let outcome = run_capture(
        &window,
        &[device("R1", &["show clock"]), device("R2", &["show clock"])],
        &executor,
        &CaptureOptions {
            cancel,
            ..CaptureOptions::default()
        },
    )
    .unwrap();

    assert_eq!(outcome.artifacts_written, 0);
    assert_eq!(outcome.failures.len(), 2);
    assert!(outcome
        .failures
        .iter()
        .all(|f| f.reason == FailureReason::Cancelled));
    assert!(executor.calls().is_empty());
    assert!(file_names(&window).is_empty());
}

#[test]
fn test_empty_inventory_creates_empty_window() {
    let dir = TempDir::new().unwrap();
    let window = dir.path().join("w");

    let outcome = run_capture(
        &window,
        &[],
        &ScriptedExecutor::new(),
        &CaptureOptions::default(),
    )
    .unwrap();

    assert!(!outcome.had_errors());
    assert!(window.is_dir());
}
