// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! Build monitoring over the backend's event stream.
//!
//! A [`Monitor`] opens one `text/event-stream` connection for a build and
//! hands every event to the caller, in arrival order, until the build ends,
//! the stream drops, or the caller cancels.

use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::ManagerError;
use crate::events::{BuildEvent, EventDecoder};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How a monitoring session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// The build reached its success state.
    Done,
    /// The build reported an error; carries the server's message.
    Failed(String),
    /// The stream ended before any terminal event.
    Disconnected,
    /// The caller cancelled the session.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Connecting,
    Streaming,
    Done,
    Failed,
    Disconnected,
    Cancelled,
}

pub struct Monitor {
    client: Client,
    base_url: String,
    state: MonitorState,
}

impl Monitor {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ManagerError> {
        // No overall timeout: the stream lives as long as the build.
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ManagerError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            state: MonitorState::Connecting,
        })
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Stream events for `build_id` until a terminal outcome.
    ///
    /// `render` is called once per event before the next one is read.
    /// Errors are only returned for failures before streaming starts; a drop
    /// mid-stream is reported as [`MonitorOutcome::Disconnected`].
    pub async fn run<F>(
        &mut self,
        build_id: &str,
        token: &str,
        cancel: &CancellationToken,
        mut render: F,
    ) -> Result<MonitorOutcome, ManagerError>
    where
        F: FnMut(&BuildEvent),
    {
        self.state = MonitorState::Connecting;

        let url = Url::parse_with_params(&format!("{}/events", self.base_url), &[("stream", build_id)])
            .map_err(|e| ManagerError::InvalidRequest(format!("Invalid server URL: {}", e)))?;

        let mut request = self.client.get(url).header(ACCEPT, "text/event-stream");
        if !token.is_empty() {
            request = request.bearer_auth(token);
        }

        debug!(build_id, "Connecting to event stream");
        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            sent = request.send() => Some(sent),
        };
        let Some(sent) = sent else {
            return Ok(self.finish(MonitorOutcome::Cancelled));
        };

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                self.state = MonitorState::Disconnected;
                return Err(ManagerError::Connection(e.to_string()));
            }
        };

        let status = response.status().as_u16();
        if !response.status().is_success() {
            self.state = MonitorState::Disconnected;
            let body = response.text().await.unwrap_or_default();
            return Err(ManagerError::from_status(status, body, "/events"));
        }

        self.state = MonitorState::Streaming;
        info!(build_id, "Streaming build events");

        let mut stream = response.bytes_stream();
        let mut decoder = EventDecoder::new();

        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(self.finish(MonitorOutcome::Cancelled)),
                chunk = stream.next() => chunk,
            };

            let bytes = match chunk {
                Some(Ok(bytes)) => bytes,
                Some(Err(e)) => {
                    warn!(build_id, error = %e, "Event stream read failed");
                    return Ok(self.finish(MonitorOutcome::Disconnected));
                }
                None => return Ok(self.finish(MonitorOutcome::Disconnected)),
            };

            let payloads = match decoder.push(&bytes) {
                Ok(payloads) => payloads,
                Err(e) => {
                    warn!(build_id, error = %e, "Dropping event stream");
                    return Ok(self.finish(MonitorOutcome::Disconnected));
                }
            };

            for payload in payloads {
                let event: BuildEvent = match serde_json::from_str(&payload) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(build_id, error = %e, "Skipping undecodable build event");
                        continue;
                    }
                };

                render(&event);

                if let Some(outcome) = event.outcome() {
                    return Ok(self.finish(outcome));
                }
            }
        }
    }

    fn finish(&mut self, outcome: MonitorOutcome) -> MonitorOutcome {
        self.state = match outcome {
            MonitorOutcome::Done => MonitorState::Done,
            MonitorOutcome::Failed(_) => MonitorState::Failed,
            MonitorOutcome::Disconnected => MonitorState::Disconnected,
            MonitorOutcome::Cancelled => MonitorState::Cancelled,
        };
        debug!(state = ?self.state, "Monitor finished");
        outcome
    }
}
