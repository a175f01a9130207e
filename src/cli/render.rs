//! Render CLI command.
//!
//! Reads a recorded exchange and renders its request and response blocks the
//! way an HTTP pipeline would: one correlation ID for the pair, per-call
//! overrides taken from control headers.
//!
//! ```json
//! {
//!   "name": "billing-client",
//!   "elapsed_ms": 42,
//!   "request": {
//!     "uri": "/login?token=abc",
//!     "headers": [["Authorization", ["Bearer xyz"]]],
//!     "body": "{\"password\":\"hunter2\"}"
//!   },
//!   "response": {
//!     "uri": "/login",
//!     "headers": [["Content-Type", ["application/json"]]],
//!     "body": "{\"token\":\"t1\"}"
//!   }
//! }
//! ```

use crate::config::Direction;
use crate::formatter::{Body, HttpLogFormatter, LogEvent};
use crate::headers::SectionOverrides;
use crate::id::IdGenerator;
use anyhow::Context;
use rand::RngCore;
use serde::Deserialize;
use std::path::Path;
use std::time::{Duration, Instant};

/// One side of a recorded exchange.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordedMessage {
    /// URI as sent.
    #[serde(default)]
    pub uri: String,
    /// Headers as `[name, [values...]]` pairs, in wire order.
    #[serde(default)]
    pub headers: Vec<(String, Vec<String>)>,
    /// Body text, if any.
    #[serde(default)]
    pub body: Option<String>,
}

/// A recorded request and, optionally, its response.
#[derive(Debug, Clone, Deserialize)]
pub struct Exchange {
    /// Name shown in the banners; the CLI falls back to `httplog`.
    #[serde(default)]
    pub name: Option<String>,
    /// Correlation ID; a fresh one is drawn when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Duration of the exchange, used for the Took line.
    #[serde(default)]
    pub elapsed_ms: u64,
    /// Request.
    pub request: RecordedMessage,
    /// Response.
    #[serde(default)]
    pub response: Option<RecordedMessage>,
}

impl Exchange {
    /// Reads an exchange from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading exchange {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// Parses an exchange from JSON text.
    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        serde_json::from_str(contents).context("parsing exchange JSON")
    }
}

/// Renders the blocks of `exchange`, request first.
///
/// With `emit` set, blocks are also written through the formatter at the
/// configured level and only the emitted ones are returned.
pub fn render_exchange<R: RngCore>(
    formatter: &HttpLogFormatter,
    exchange: &Exchange,
    ids: &IdGenerator<R>,
    emit: bool,
) -> Vec<String> {
    let id = exchange.id.clone().unwrap_or_else(|| ids.next_id());
    let started_at = Instant::now()
        .checked_sub(Duration::from_millis(exchange.elapsed_ms))
        .unwrap_or_else(Instant::now);

    let messages = [
        Some((Direction::Request, &exchange.request)),
        exchange.response.as_ref().map(|r| (Direction::Response, r)),
    ];

    messages
        .into_iter()
        .flatten()
        .filter_map(|(direction, message)| {
            let event = LogEvent {
                direction,
                overrides: SectionOverrides::from_control_headers(
                    message.headers.iter().map(|(k, v)| (k, v)),
                    direction,
                ),
                id: &id,
                uri: &message.uri,
                headers: &message.headers,
                body: message
                    .body
                    .as_deref()
                    .map_or_else(Body::empty, Body::text),
                started_at,
            };
            if emit {
                formatter.log(event)
            } else {
                Some(formatter.render(event))
            }
        })
        .collect()
}
