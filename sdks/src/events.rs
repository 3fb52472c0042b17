// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! Build events and the Server-Sent Events framing they arrive in.

use serde::{Deserialize, Serialize};

use crate::monitor::MonitorOutcome;

/// One progress notification for a build.
///
/// Subjects follow `<kind>.<action>[.<result>]`, e.g. `network.create`,
/// `network.create.done` or `service.create.error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildEvent {
    #[serde(rename = "_subject")]
    pub subject: String,
    #[serde(rename = "_component", default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(rename = "_component_id", default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BuildEvent {
    /// Leading subject segment (`service`, `network`, `instance`...).
    pub fn kind(&self) -> &str {
        self.subject.split('.').next().unwrap_or_default()
    }

    pub fn action(&self) -> Option<&str> {
        self.subject.split('.').nth(1)
    }

    /// Trailing `done` / `error` segment, if the subject has one.
    pub fn result(&self) -> Option<&str> {
        self.subject.split('.').nth(2)
    }

    /// Outcome of the whole build if this event ends it.
    pub fn outcome(&self) -> Option<MonitorOutcome> {
        if self.kind() != "service" {
            return None;
        }
        match self.result() {
            Some("done") => Some(MonitorOutcome::Done),
            Some("error") => Some(MonitorOutcome::Failed(
                self.error
                    .clone()
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "build failed".to_string()),
            )),
            _ => None,
        }
    }
}

/// Largest event (pending line plus accumulated `data`) the decoder buffers.
pub const MAX_EVENT_SIZE: usize = 1024 * 1024;

/// The stream kept sending bytes without completing an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Event exceeds {limit} bytes")]
pub struct EventTooLarge {
    pub limit: usize,
}

/// Incremental `text/event-stream` decoder.
///
/// Feed it network chunks as they arrive; it returns the `data` payload of
/// every event completed by the chunk. Chunk boundaries may fall anywhere,
/// including inside a UTF-8 sequence.
#[derive(Debug)]
pub struct EventDecoder {
    pending: Vec<u8>,
    data: Vec<String>,
    data_len: usize,
    limit: usize,
}

impl Default for EventDecoder {
    fn default() -> Self {
        Self::with_limit(MAX_EVENT_SIZE)
    }
}

impl EventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            pending: Vec::new(),
            data: Vec::new(),
            data_len: 0,
            limit,
        }
    }

    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, EventTooLarge> {
        self.pending.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if !self.data.is_empty() {
                    payloads.push(self.data.join("\n"));
                    self.data.clear();
                    self.data_len = 0;
                }
                continue;
            }
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };
            if field == "data" {
                self.data_len += value.len();
                self.data.push(value.to_string());
            }
        }

        if self.pending.len() + self.data_len > self.limit {
            return Err(EventTooLarge { limit: self.limit });
        }
        Ok(payloads)
    }
}
