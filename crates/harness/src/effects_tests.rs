// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_emit_alternates_with_response() {
    let (mut effects, mut suspension) = channel();

    let handler = tokio::spawn(async move {
        let first = effects.emit("ask-name").await;
        let second = effects.emit("ask-age").await;
        (first, second)
    });

    assert_eq!(suspension.effect_rx.recv().await, Some(Effect::from("ask-name")));
    suspension
        .response_tx
        .send(Some(Response::from("Ada")))
        .await
        .unwrap();
    assert_eq!(suspension.effect_rx.recv().await, Some(Effect::from("ask-age")));
    suspension.response_tx.send(None).await.unwrap();

    let (first, second) = handler.await.unwrap();
    assert_eq!(first, Some(Response::from("Ada")));
    assert_eq!(second, None);
}

#[tokio::test]
async fn test_ask_turns_fail_into_error() {
    let (mut effects, mut suspension) = channel();

    let handler = tokio::spawn(async move { effects.ask(json!({ "kind": "confirm" })).await });

    assert_eq!(
        suspension.effect_rx.recv().await,
        Some(Effect::request(json!({ "kind": "confirm" })))
    );
    suspension
        .response_tx
        .send(Some(Response::Fail(Fail::new("denied"))))
        .await
        .unwrap();

    assert_eq!(handler.await.unwrap(), Err(Fail::new("denied")));
}

#[tokio::test]
async fn test_emit_returns_none_when_scheduler_gone() {
    let (mut effects, suspension) = channel();
    drop(suspension);

    assert_eq!(effects.emit("orphan").await, None);
    assert_eq!(effects.trigger_fail().await, Fail::new(TRIGGERED_FAIL_MESSAGE));
}

async fn greet(mut effects: Effects, inputs: Inputs) -> HandlerResult {
    let name = effects.ask("ask-name").await?;
    Ok(Some(
        json!({ "name": name, "greeting": inputs.value("greeting") }),
    ))
}

#[tokio::test]
async fn test_handler_invoke_is_lazy() {
    let handler = Handler::new(greet);

    let (effects, mut suspension) = channel();
    let future = handler.invoke(effects, Inputs::new().with_value("greeting", "hi"));

    // Nothing is emitted until the computation is polled
    let idle = tokio::time::timeout(Duration::from_millis(20), suspension.effect_rx.recv()).await;
    assert!(idle.is_err());

    let running = tokio::spawn(future);
    assert_eq!(suspension.effect_rx.recv().await, Some(Effect::from("ask-name")));
    suspension
        .response_tx
        .send(Some(Response::from("Ada")))
        .await
        .unwrap();

    let summary = running.await.unwrap().unwrap();
    assert_eq!(summary, Some(json!({ "name": "Ada", "greeting": "hi" })));
}

#[test]
fn test_fault_timeout_class() {
    assert!(Fault::Timeout("slow".into()).is_timeout());
    assert!(!Fault::msg("boom").is_timeout());
    assert!(!Fault::from(std::io::Error::other("io")).is_timeout());
}

#[test]
fn test_raised_keeps_fail_and_fault_apart() {
    let fail: Raised = Fail::new("bad input").into();
    assert!(matches!(fail, Raised::Fail(_)));

    let fault: Raised = Fault::msg("boom").into();
    assert!(matches!(fault, Raised::Fault(_)));
    assert_eq!(fault.to_string(), "boom");
}

#[test]
fn test_inputs_builders() {
    let inputs = Inputs::new()
        .with_value("name", "Ada")
        .with_setting("color", true);

    assert_eq!(inputs.value("name"), Some(&json!("Ada")));
    assert_eq!(inputs.setting("color"), Some(&json!(true)));
    assert_eq!(inputs.value("missing"), None);
}
