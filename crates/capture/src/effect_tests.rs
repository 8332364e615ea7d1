// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use serde_json::json;

#[test]
fn test_fail_displays_message() {
    let fail = Fail::new("bad input");
    assert_eq!(fail.to_string(), "bad input");
    assert_eq!(fail.data, None);
}

#[test]
fn test_fail_with_data() {
    let fail = Fail::new("bad input").with_data(json!({ "field": "name" }));
    assert_eq!(fail.data, Some(json!({ "field": "name" })));
}

#[test]
fn test_effect_from_str_is_request() {
    assert_eq!(Effect::from("ask-name"), Effect::Request(json!("ask-name")));
    assert_eq!(
        Effect::from("ask-name").as_request(),
        Some(&json!("ask-name"))
    );
}

#[test]
fn test_effect_fail_has_no_request() {
    let effect = Effect::from(Fail::new("nope"));
    assert!(effect.is_fail());
    assert!(effect.as_request().is_none());
    assert!(Effect::TriggerFail.as_request().is_none());
}

#[test]
fn test_response_into_value() {
    assert_eq!(Response::Start.into_value(), Ok(None));
    assert_eq!(Response::from("Ada").into_value(), Ok(Some(json!("Ada"))));
    assert_eq!(Response::from(true).into_value(), Ok(Some(json!(true))));
    assert_eq!(
        Response::from(Fail::new("stop")).into_value(),
        Err(Fail::new("stop"))
    );
}

#[test]
fn test_effect_serializes_snake_case() {
    let json = serde_json::to_value(vec![
        Effect::request(json!({ "kind": "confirm" })),
        Effect::TriggerFail,
        Effect::Fail(Fail::new("bad input")),
    ])
    .unwrap();

    assert_eq!(
        json,
        json!([
            { "request": { "kind": "confirm" } },
            "trigger_fail",
            { "fail": { "message": "bad input" } }
        ])
    );
}
