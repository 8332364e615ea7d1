// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Shared fixtures: a small interactive tool, as a command tree of handlers
//! and as a whole program.

#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;

use rigging::{
    CommandNode, CommandTree, Effects, Fail, FlagSpec, Handler, HandlerResult, Inputs, Loader,
    Program, ProgramFn, Settled, StaticLoader, Terminal,
};
use rigging::program::ProgramResult;
use serde_json::json;
use tempfile::NamedTempFile;

pub const TOOL: &str = "bin/tool";

async fn greet(mut effects: Effects, _inputs: Inputs) -> HandlerResult {
    let name = effects.ask("ask-name").await?;
    let name = name.and_then(|n| n.as_str().map(str::to_string)).unwrap_or_default();
    effects.emit(json!({ "kind": "print", "text": format!("Hello, {}!", name) })).await;
    Ok(Some(json!({ "name": name })))
}

async fn confirm(mut effects: Effects, inputs: Inputs) -> HandlerResult {
    if inputs.args.is_set("yes") {
        return Ok(Some(json!(true)));
    }
    let answer = effects
        .ask(json!({ "kind": "confirm", "message": "Delete everything?" }))
        .await?;
    Ok(answer)
}

async fn validate(mut effects: Effects, _inputs: Inputs) -> HandlerResult {
    let value = effects.ask(json!({ "kind": "input", "name": "value" })).await?;
    match value.as_ref().and_then(|v| v.as_str()) {
        Some(v) if v.parse::<i64>().is_ok() => Ok(Some(json!({ "value": v }))),
        _ => Err(Fail::new("bad input").into()),
    }
}

async fn steps(mut effects: Effects, inputs: Inputs) -> HandlerResult {
    let count = inputs
        .value("count")
        .and_then(|c| c.as_u64())
        .unwrap_or(3);
    let mut answers = Vec::new();
    for step in 0..count {
        answers.push(effects.ask(json!({ "kind": "step", "index": step })).await?);
    }
    Ok(Some(json!(answers)))
}

pub fn tool_tree() -> CommandTree {
    let root = CommandNode::group("tool", "An interactive example tool")
        .child(CommandNode::command("greet", "Greet someone", Handler::new(greet)))
        .child(
            CommandNode::command("confirm", "Ask before acting", Handler::new(confirm))
                .flag(FlagSpec::boolean("yes", &["y"])),
        )
        .child(CommandNode::command("validate", "Read a number", Handler::new(validate)))
        .child(
            CommandNode::group("run", "Multi-step commands")
                .child(CommandNode::command("steps", "Answer several steps", Handler::new(steps))),
        );
    CommandTree::new(root).unwrap()
}

/// Entry point of the tool as a program
async fn tool_main(mut terminal: Terminal) -> ProgramResult {
    if terminal.meta_mode() {
        return Ok(Settled::Described(tool_tree().describe()));
    }
    match terminal.args().first().map(String::as_str) {
        Some("value") => {
            let value = terminal.prompt("Enter value: ").await.unwrap_or_default();
            if value.parse::<i64>().is_err() {
                writeln!(terminal.stderr(), "not a number: {}", value)?;
                return Err(Fail::new("bad input").into());
            }
            terminal.println(&format!("You entered {}", value));
        }
        Some("survey") => {
            for question in ["First? ", "Second? ", "Third? "] {
                let answer = terminal.prompt(question).await.unwrap_or_default();
                terminal.println(&answer);
            }
        }
        Some("env") => {
            let color = terminal.var("FORCE_COLOR").unwrap_or("unset").to_string();
            terminal.println(&format!("color={} tty={}", color, terminal.is_tty()));
        }
        Some("slow") => {
            tokio::time::timeout(
                std::time::Duration::from_millis(50),
                terminal.stdin().read_line(),
            )
            .await?;
        }
        _ => {
            terminal.eprintln("usage: tool <value|survey|env|slow>");
            terminal.exit(2);
        }
    }
    Ok(Settled::Ran)
}

pub fn tool_program() -> Arc<dyn Program> {
    Arc::new(ProgramFn::new(tool_main))
}

pub fn tool_loader() -> Arc<dyn Loader> {
    Arc::new(StaticLoader::new().with(TOOL, |_| Ok(tool_program())))
}

/// Write an interaction table file with the given extension
pub fn write_table(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
