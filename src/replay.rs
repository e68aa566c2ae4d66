//! JSON-lines command protocol for the `star-ledger` binary.
//!
//! One command object per line, tagged by `op`; one JSON result per line.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::rating::engine::RatingEngine;
use crate::rating::types::FeedbackRequest;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Feedback(FeedbackRequest),
    Bulk { feedbacks: Vec<FeedbackRequest> },
    Decay,
    Appeal { user: String, reason: String },
    Rating { user: String },
    Report {
        user: String,
        #[serde(default)]
        full: bool,
    },
    Appeals {
        #[serde(default)]
        user: Option<String>,
    },
    Stats,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<anyhow::Result<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line).map_err(|e| anyhow::anyhow!("Malformed command: {}", e)))
}

/// Run a command against the engine and build its JSON result
pub fn dispatch(engine: &RatingEngine, command: Command) -> anyhow::Result<Value> {
    let value = match command {
        Command::Feedback(request) => {
            let rating = engine.process_request(&request)?;
            json!({ "user": request.target, "rating": rating })
        }
        Command::Bulk { feedbacks } => {
            let ratings = engine.bulk_process(&feedbacks)?;
            json!({ "ratings": ratings })
        }
        Command::Decay => {
            let relaxed = engine.apply_decay();
            json!({ "relaxed": relaxed })
        }
        Command::Appeal { user, reason } => {
            engine.file_appeal(&user, &reason);
            json!({ "user": user, "appealed": true })
        }
        Command::Rating { user } => {
            let rating = engine.get_rating(&user);
            json!({ "user": user, "rating": rating })
        }
        Command::Report { user, full } => {
            if full {
                serde_json::to_value(engine.full_report(&user))?
            } else {
                serde_json::to_value(engine.anonymized_report(&user))?
            }
        }
        Command::Appeals { user } => match user {
            Some(user) => serde_json::to_value(engine.appeals_for(&user))?,
            None => serde_json::to_value(engine.appeals())?,
        },
        Command::Stats => engine.get_stats(),
    };
    Ok(value)
}

/// Parse and dispatch one line; failures become `{"error": ...}`
pub fn handle_line(engine: &RatingEngine, line: &str) -> Option<Value> {
    let result = parse_line(line)?.and_then(|command| dispatch(engine, command));
    Some(match result {
        Ok(value) => value,
        Err(e) => json!({ "error": e.to_string() }),
    })
}
