// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::program::{ProgramFn, ProgramResult, Settled};
use rigging_capture::Fail;
use rstest::rstest;
use serde_json::json;

fn argv(args: &[&str]) -> Vec<String> {
    std::iter::once("/usr/local/bin/tool")
        .chain(args.iter().copied())
        .map(str::to_string)
        .collect()
}

async fn prompt_value(mut terminal: Terminal) -> ProgramResult {
    let value = terminal.prompt("Enter value: ").await.unwrap_or_default();
    terminal.println(&format!("Got {}", value));
    Ok(Settled::Ran)
}

async fn exits_with_three(terminal: Terminal) -> ProgramResult {
    terminal.print("bye");
    terminal.exit(3);
    Ok(Settled::Ran)
}

async fn fails(terminal: Terminal) -> ProgramResult {
    terminal.println("checking");
    Err(Fail::new("bad input").into())
}

async fn fails_with_code(terminal: Terminal) -> ProgramResult {
    terminal.exit(2);
    Err(Fail::new("usage").into())
}

async fn times_out(terminal: Terminal) -> ProgramResult {
    terminal.print("waiting");
    tokio::time::timeout(Duration::from_millis(10), std::future::pending::<()>()).await?;
    Ok(Settled::Ran)
}

async fn faults(_terminal: Terminal) -> ProgramResult {
    Err(Fault::msg("segfault").into())
}

async fn writes_both(terminal: Terminal) -> ProgramResult {
    terminal.print("out ");
    terminal.eprint("err");
    Ok(Settled::Ran)
}

async fn reports_environment(terminal: Terminal) -> ProgramResult {
    let report = json!({
        "argv": terminal.argv(),
        "color": terminal.var("FORCE_COLOR"),
        "hyperlink": terminal.var("FORCE_HYPERLINK"),
        "home": terminal.var("HOME"),
        "tty": terminal.is_tty(),
        "settings": terminal.settings(),
    });
    terminal.print(&report.to_string());
    Ok(Settled::Ran)
}

#[tokio::test(start_paused = true)]
async fn test_prompt_answered_after_quiescence() {
    let driver = TerminalDriver::new();
    let capture = driver
        .run(
            &ProgramFn::new(prompt_value),
            argv(&[]),
            InputScript::new(["42"]),
            &DriverOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(capture.exit_code, 0);
    assert_eq!(capture.output_text(), "Enter value: Got 42\n");
    assert_eq!(capture.injections.len(), 1);
    assert_eq!(capture.injections[0].line, "42");
    assert!(capture.injections[0].at_ms >= 100);
    assert_eq!(capture.fail, None);
}

async fn echoes_chunk(mut terminal: Terminal) -> ProgramResult {
    let chunk = terminal.stdin().read_chunk().await.unwrap_or_default();
    terminal.print(&chunk);
    Ok(Settled::Ran)
}

#[rstest]
#[case::plain(false, false, "x\n")]
#[case::raw_script(true, false, "x")]
#[case::raw_option(false, true, "x")]
#[case::both(true, true, "x")]
#[tokio::test(start_paused = true)]
async fn test_raw_input_from_script_or_options(
    #[case] script_raw: bool,
    #[case] option_raw: bool,
    #[case] expected: &str,
) {
    let capture = TerminalDriver::new()
        .run(
            &ProgramFn::new(echoes_chunk),
            argv(&[]),
            InputScript::new(["x"]).raw(script_raw),
            &DriverOptions::default().with_raw_input(option_raw),
        )
        .await
        .unwrap();

    assert_eq!(capture.output_text(), expected);
}

#[tokio::test(start_paused = true)]
async fn test_exit_code_recorded() {
    let capture = TerminalDriver::new()
        .run(
            &ProgramFn::new(exits_with_three),
            argv(&[]),
            InputScript::default(),
            &DriverOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(capture.exit_code, 3);
    assert_eq!(capture.output_text(), "bye");
}

#[tokio::test(start_paused = true)]
async fn test_fail_recorded_with_exit_one() {
    let capture = TerminalDriver::new()
        .run(
            &ProgramFn::new(fails),
            argv(&[]),
            InputScript::default(),
            &DriverOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(capture.exit_code, 1);
    assert_eq!(capture.fail, Some(Fail::new("bad input")));
    assert_eq!(capture.output_text(), "checking\n");
}

#[tokio::test(start_paused = true)]
async fn test_fail_keeps_explicit_exit_code() {
    let capture = TerminalDriver::new()
        .run(
            &ProgramFn::new(fails_with_code),
            argv(&[]),
            InputScript::default(),
            &DriverOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(capture.exit_code, 2);
    assert_eq!(capture.fail, Some(Fail::new("usage")));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_becomes_exit_one() {
    let capture = TerminalDriver::new()
        .run(
            &ProgramFn::new(times_out),
            argv(&[]),
            InputScript::default(),
            &DriverOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(capture.exit_code, 1);
    assert_eq!(capture.output_text(), "waiting");
    assert_eq!(capture.fail, None);
}

#[tokio::test(start_paused = true)]
async fn test_other_faults_propagate() {
    let err = TerminalDriver::new()
        .run(
            &ProgramFn::new(faults),
            argv(&[]),
            InputScript::default(),
            &DriverOptions::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "program fault: segfault");
}

#[tokio::test(start_paused = true)]
async fn test_stderr_captured_only_when_requested() {
    let driver = TerminalDriver::new();
    let program = ProgramFn::new(writes_both);

    let captured = driver
        .run(
            &program,
            argv(&[]),
            InputScript::default(),
            &DriverOptions::default().with_stderr(true),
        )
        .await
        .unwrap();
    assert_eq!(captured.output_text(), "out err");

    let passthrough = driver
        .run(&program, argv(&[]), InputScript::default(), &DriverOptions::default())
        .await
        .unwrap();
    assert_eq!(passthrough.output_text(), "out ");
}

#[tokio::test(start_paused = true)]
async fn test_environment_seen_by_program_and_base_untouched() {
    let driver = TerminalDriver::new()
        .with_var("HOME", "/home/test")
        .with_var("FORCE_COLOR", "0");
    let before = driver.base_vars().clone();

    let capture = driver
        .run(
            &ProgramFn::new(reports_environment),
            argv(&["render", "docs"]),
            InputScript::default(),
            &DriverOptions::default().with_settings(json!({"theme": "dark"})),
        )
        .await
        .unwrap();

    let report: serde_json::Value = serde_json::from_str(&capture.output_text()).unwrap();
    assert_eq!(
        report,
        json!({
            "argv": ["/usr/local/bin/tool", "render", "docs"],
            "color": "1",
            "hyperlink": "1",
            "home": "/home/test",
            "tty": true,
            "settings": {"theme": "dark"},
        })
    );
    assert_eq!(driver.base_vars(), &before);
    assert_eq!(driver.base_vars().get("FORCE_COLOR").map(String::as_str), Some("0"));
}

#[tokio::test(start_paused = true)]
async fn test_runs_are_repeatable() {
    let driver = TerminalDriver::new();
    let program = ProgramFn::new(prompt_value);
    let options = DriverOptions::default();

    let first = driver
        .run(&program, argv(&[]), InputScript::new(["7"]), &options)
        .await
        .unwrap();
    let second = driver
        .run(&program, argv(&[]), InputScript::new(["7"]), &options)
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_session_drop_closes_input_and_stops_injector() {
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let mut stdin = Stdin::new(rx);
    let injector = tokio::spawn(std::future::pending::<()>());
    let abort = injector.abort_handle();

    let session = Session {
        injector,
        stdin: Some(tx),
    };
    drop(session);

    assert_eq!(stdin.read_line().await, None);
    for _ in 0..10 {
        if abort.is_finished() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(abort.is_finished());
}

#[test]
fn test_options_builders() {
    let options = DriverOptions::new()
        .with_quiescence(Duration::from_millis(50))
        .with_tick(Duration::from_millis(5))
        .with_raw_input(true);

    assert_eq!(options.quiescence, Duration::from_millis(50));
    assert_eq!(options.tick, Duration::from_millis(5));
    assert!(options.raw_input);
    assert!(!options.stderr);
    assert_eq!(DriverOptions::default().quiescence, DEFAULT_QUIESCENCE);
    assert_eq!(DriverOptions::default().tick, DEFAULT_TICK);
}

#[test]
#[serial_test::serial]
fn test_options_from_env() {
    std::env::set_var(crate::env::RIGGING_QUIESCENCE_MS, "40");
    std::env::set_var(crate::env::RIGGING_TICK_MS, "4");
    let options = DriverOptions::from_env();
    std::env::remove_var(crate::env::RIGGING_QUIESCENCE_MS);
    std::env::remove_var(crate::env::RIGGING_TICK_MS);

    assert_eq!(options.quiescence, Duration::from_millis(40));
    assert_eq!(options.tick, Duration::from_millis(4));
}
