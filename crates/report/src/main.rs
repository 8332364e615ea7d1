// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rigging developer tool entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use rigging_report::commands;
use rigging_report::output_diagnostic::{print_error, print_warning};

/// rigging developer tool
#[derive(Parser, Debug)]
#[command(name = "rigging", version, about = "Command handler test harness developer tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// View failed snapshot assertions as a terminal diff
    Diff {
        /// JSON lines of assertion records; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Output available patterns of an interaction table
    Patterns {
        /// Table file, or a directory of table files
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

fn init_logging() {
    let filter = rigging::env::rust_log()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn read_input(file: Option<PathBuf>) -> std::io::Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path).await,
        None => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            Ok(input)
        }
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Diff { file } => {
            let input = match read_input(file).await {
                Ok(input) => input,
                Err(e) => {
                    print_error(e);
                    std::process::exit(1);
                }
            };
            match commands::diff(&input, &mut stdout) {
                Ok(0) => {}
                Ok(_) => std::process::exit(1),
                Err(e) => {
                    print_error(e);
                    std::process::exit(1);
                }
            }
        }
        Command::Patterns { path } => match commands::patterns(&path, &mut stdout) {
            Ok(0) => print_warning(format_args!("no patterns found in {}", path.display())),
            Ok(_) => {}
            Err(e) => {
                print_error(e);
                std::process::exit(1);
            }
        },
    }
}
