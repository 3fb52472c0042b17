// Copyright (c) 2026 Ernest contributors
// SPDX-License-Identifier: AGPL-3.0

use ernest_sdk::{
    BuildEvent, ManagerError, Monitor, MonitorOutcome, MonitorState, MAX_EVENT_SIZE,
};
use mockito::{Matcher, Server};
use std::io::Write;
use tokio_util::sync::CancellationToken;

fn sse(events: &[&str]) -> String {
    events
        .iter()
        .map(|event| format!("data: {}\n\n", event))
        .collect()
}

async fn stream_mock(server: &mut Server, body: String) -> mockito::Mock {
    server
        .mock("GET", "/events")
        .match_query(Matcher::UrlEncoded("stream".into(), "1234567890".into()))
        .match_header("authorization", "Bearer token")
        .match_header("accept", "text/event-stream")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn test_stream_until_done() {
    let mut server = Server::new_async().await;
    let body = sse(&[
        r#"{"_subject": "service.create"}"#,
        r#"{"_subject": "network.create", "_component_id": "network::web", "name": "web"}"#,
        r#"{"_subject": "network.create.done", "_component_id": "network::web", "name": "web"}"#,
        r#"{"_subject": "service.create.done"}"#,
        r#"{"_subject": "instance.create"}"#,
    ]);
    let mock = stream_mock(&mut server, body).await;

    let mut monitor = Monitor::new(server.url()).unwrap();
    let mut seen = Vec::new();
    let outcome = monitor
        .run("1234567890", "token", &CancellationToken::new(), |event: &BuildEvent| {
            seen.push(event.subject.clone())
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(outcome, MonitorOutcome::Done);
    assert_eq!(monitor.state(), MonitorState::Done);
    // Events after the terminal one are never rendered.
    assert_eq!(
        seen,
        vec![
            "service.create",
            "network.create",
            "network.create.done",
            "service.create.done"
        ]
    );
}

#[tokio::test]
async fn test_stream_reports_failure() {
    let mut server = Server::new_async().await;
    let body = sse(&[
        r#"{"_subject": "service.create"}"#,
        r#"{"_subject": "service.create.error", "error": "instance quota exceeded"}"#,
    ]);
    let _mock = stream_mock(&mut server, body).await;

    let mut monitor = Monitor::new(server.url()).unwrap();
    let outcome = monitor
        .run("1234567890", "token", &CancellationToken::new(), |_| {})
        .await
        .unwrap();

    assert_eq!(
        outcome,
        MonitorOutcome::Failed("instance quota exceeded".into())
    );
    assert_eq!(monitor.state(), MonitorState::Failed);
}

#[tokio::test]
async fn test_stream_end_without_terminal_event_is_disconnect() {
    let mut server = Server::new_async().await;
    let body = format!(
        "{}data: not json\n\n",
        sse(&[r#"{"_subject": "service.create"}"#])
    );
    let _mock = stream_mock(&mut server, body).await;

    let mut monitor = Monitor::new(server.url()).unwrap();
    let mut rendered = 0;
    let outcome = monitor
        .run("1234567890", "token", &CancellationToken::new(), |_| rendered += 1)
        .await
        .unwrap();

    assert_eq!(outcome, MonitorOutcome::Disconnected);
    assert_eq!(monitor.state(), MonitorState::Disconnected);
    assert_eq!(rendered, 1);
}

#[tokio::test]
async fn test_oversized_event_drops_stream() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/events")
        .match_query(Matcher::UrlEncoded("stream".into(), "1234567890".into()))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_chunked_body(|w| {
            w.write_all(b"data: ")?;
            w.write_all(&vec![b'x'; MAX_EVENT_SIZE + 1])?;
            // Keep the connection open without ever finishing the line.
            std::thread::sleep(std::time::Duration::from_secs(1));
            Ok(())
        })
        .create_async()
        .await;

    let mut monitor = Monitor::new(server.url()).unwrap();
    let mut rendered = 0;
    let outcome = monitor
        .run("1234567890", "token", &CancellationToken::new(), |_| rendered += 1)
        .await
        .unwrap();

    assert_eq!(outcome, MonitorOutcome::Disconnected);
    assert_eq!(monitor.state(), MonitorState::Disconnected);
    assert_eq!(rendered, 0);
}

#[tokio::test]
async fn test_unauthorized_stream() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/events")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body("session expired")
        .create_async()
        .await;

    let mut monitor = Monitor::new(server.url()).unwrap();
    let result = monitor
        .run("1234567890", "stale", &CancellationToken::new(), |_| {})
        .await;

    assert!(matches!(result, Err(ManagerError::Auth(msg)) if msg == "session expired"));
}

#[tokio::test]
async fn test_cancelled_before_connect() {
    let mut server = Server::new_async().await;
    let events = server
        .mock("GET", "/events")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut monitor = Monitor::new(server.url()).unwrap();
    let outcome = monitor.run("1234567890", "token", &cancel, |_| {}).await.unwrap();

    assert_eq!(outcome, MonitorOutcome::Cancelled);
    assert_eq!(monitor.state(), MonitorState::Cancelled);
    events.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_stream_is_connection_error() {
    let mut monitor = Monitor::new("http://127.0.0.1:1").unwrap();
    let result = monitor
        .run("1234567890", "token", &CancellationToken::new(), |_| {})
        .await;

    assert!(matches!(result, Err(ManagerError::Connection(_))));
    assert_eq!(monitor.state(), MonitorState::Disconnected);
}
