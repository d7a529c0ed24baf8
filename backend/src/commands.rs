//! Operator commands read from stdin, one per line:
//!
//! - `merge <externalStore> [<remoteEndpoint>]` runs a merge. With an endpoint
//!   the images are posted there, otherwise saved locally.
//! - `initialize <externalStore>` seeds the cache's titles from that store.
//!
//! Each command prints a human-readable status line.

use crate::store::titles::initialize_titles;
use crate::sync::{run_merge, SyncContext};
use common::model::merge::DeliveryMode;
use log::{error, info};
use std::io::{self, BufRead};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Merge {
        external_store: String,
        remote_endpoint: Option<String>,
    },
    Initialize {
        external_store: String,
    },
}

pub fn parse(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or_default();
    match name {
        "merge" | "initialize" => {
            let external_store = parts
                .next()
                .ok_or_else(|| "No destination db provided".to_string())?
                .to_string();
            if name == "merge" {
                Ok(Command::Merge {
                    external_store,
                    remote_endpoint: parts.next().map(str::to_string),
                })
            } else {
                Ok(Command::Initialize { external_store })
            }
        }
        _ => Err("Command not recognized".to_string()),
    }
}

/// Parses and runs one command line, returning its status message.
pub fn handle_command(line: &str, ctx: &SyncContext) -> String {
    let command = match parse(line) {
        Ok(command) => command,
        Err(msg) => return msg,
    };
    info!("Running command: {:?}", command);

    match command {
        Command::Merge {
            external_store,
            remote_endpoint,
        } => {
            let mode = DeliveryMode::from_endpoint(remote_endpoint);
            match run_merge(ctx, &external_store, &mode, |_| {}) {
                Ok(summary) => summary.to_string(),
                Err(e) => format!("Failed to merge: {}", e),
            }
        }
        Command::Initialize { external_store } => {
            match initialize_titles(&external_store, &ctx.cache) {
                Ok(_) => "Done".to_string(),
                Err(e) => format!("Failed to initialize titles: {}", e),
            }
        }
    }
}

/// Serves commands from stdin until it closes. Blocking; run on its own thread.
pub fn listen_for_commands(ctx: SyncContext) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => println!("{}", handle_command(&line, &ctx)),
            Err(e) => {
                error!("Failed to read command: {}", e);
                break;
            }
        }
    }
    info!("Command input closed");
}
