// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Shared fixtures for unit tests.

use serde_json::json;

use crate::effects::{Effects, Handler, HandlerResult, Inputs};
use crate::tree::{CommandNode, CommandTree, FlagSpec};

async fn noop(_effects: Effects, _inputs: Inputs) -> HandlerResult {
    Ok(None)
}

/// Echo the parsed arguments back as the summary
async fn echo_args(_effects: Effects, inputs: Inputs) -> HandlerResult {
    Ok(Some(json!({
        "flags": inputs.args.flags,
        "positionals": inputs.args.positionals,
    })))
}

/// A tree shaped like a small developer tool:
///
/// ```text
/// dev
/// ├── patterns [--json|-j] [--dir|-d <dir>]
/// ├── render
/// │   ├── docs
/// │   └── tests [--force|-f]
/// └── diff
/// ```
pub fn sample_root() -> CommandNode {
    CommandNode::group("dev", "developer tool")
        .child(
            CommandNode::command("patterns", "Output available patterns", Handler::new(echo_args))
                .flag(FlagSpec::boolean("json", &["j"]))
                .flag(FlagSpec::string("dir", &["d", "directory"])),
        )
        .child(
            CommandNode::group("render", "Generate artifacts")
                .child(CommandNode::command("docs", "Generate markdown docs", Handler::new(noop)))
                .child(
                    CommandNode::command(
                        "tests",
                        "Generate command test skeletons",
                        Handler::new(echo_args),
                    )
                    .flag(FlagSpec::boolean("force", &["f"])),
                ),
        )
        .child(CommandNode::command(
            "diff",
            "View a snapshot diff as terminal output",
            Handler::new(noop),
        ))
}

pub fn sample_tree() -> CommandTree {
    CommandTree::new(sample_root()).unwrap()
}

pub fn strings(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}
