// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

//! `ernest monitor <service>`: follow a build until it finishes.

use anyhow::Result;
use colored::Colorize;
use ernest_sdk::{Monitor, MonitorOutcome, MonitorTarget};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::AuthorizedSession;
use crate::error::CliError;
use crate::output;

pub async fn monitor_service(name: &str, session: &AuthorizedSession) -> Result<()> {
    let build_id = match session
        .manager
        .resolve_monitor_target(&session.token, name)
        .await?
    {
        MonitorTarget::AlreadyDone(_) => {
            println!("{}", "Service has been successfully built".yellow());
            println!(
                "{}",
                format!(
                    "You can check its information running `ernest service info {}`",
                    name
                )
                .yellow()
            );
            return Ok(());
        }
        MonitorTarget::Stream { build_id, .. } => build_id,
    };

    follow_build(&build_id, session, &format!("✓ Service {} build done", name)).await
}

/// Stream `build_id` until it finishes, printing `done_message` on success.
///
/// Ctrl-C cancels the stream.
pub(crate) async fn follow_build(
    build_id: &str,
    session: &AuthorizedSession,
    done_message: &str,
) -> Result<()> {
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C signal");
            interrupt.cancel();
        }
    });

    let mut monitor = Monitor::new(session.url.clone())?;
    let outcome = monitor
        .run(build_id, &session.token, &cancel, output::render_event)
        .await;
    watcher.abort();

    finish(outcome?, done_message)
}

fn finish(outcome: MonitorOutcome, done_message: &str) -> Result<()> {
    match outcome {
        MonitorOutcome::Done => {
            println!("{}", done_message.green());
            Ok(())
        }
        MonitorOutcome::Failed(message) => Err(CliError::BuildFailed(message).into()),
        MonitorOutcome::Disconnected => Err(CliError::Disconnected.into()),
        MonitorOutcome::Cancelled => Err(CliError::Interrupted.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::exit_code;
    use ernest_sdk::Manager;
    use mockito::Matcher;

    fn session(url: String) -> AuthorizedSession {
        AuthorizedSession {
            manager: Manager::new(url.clone()).unwrap(),
            url,
            token: "token".into(),
        }
    }

    #[tokio::test]
    async fn test_already_built_service_opens_no_stream() {
        let mut server = mockito::Server::new_async().await;
        let _status = server
            .mock("GET", "/services/foo")
            .with_status(200)
            .with_body(r#"{"id": "foo-1234567890", "name": "foo", "status": "done"}"#)
            .create_async()
            .await;
        let events = server
            .mock("GET", "/events")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        monitor_service("foo", &session(server.url())).await.unwrap();
        events.assert_async().await;
    }

    #[tokio::test]
    async fn test_streams_build_until_done() {
        let mut server = mockito::Server::new_async().await;
        let _status = server
            .mock("GET", "/services/foo")
            .with_status(200)
            .with_body(r#"{"id": "foo-1234567890", "name": "foo", "status": "in_progress"}"#)
            .create_async()
            .await;
        let events = server
            .mock("GET", "/events")
            .match_query(Matcher::UrlEncoded("stream".into(), "1234567890".into()))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body("data: {\"_subject\": \"service.create\"}\n\ndata: {\"_subject\": \"service.create.done\"}\n\n")
            .create_async()
            .await;

        monitor_service("foo", &session(server.url())).await.unwrap();
        events.assert_async().await;
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert!(finish(MonitorOutcome::Done, "done").is_ok());
        let failed = finish(MonitorOutcome::Failed("boom".into()), "done").unwrap_err();
        assert_eq!(exit_code(&failed), 7);
        let dropped = finish(MonitorOutcome::Disconnected, "done").unwrap_err();
        assert_eq!(exit_code(&dropped), 8);
        let cancelled = finish(MonitorOutcome::Cancelled, "done").unwrap_err();
        assert_eq!(exit_code(&cancelled), 130);
    }
}
