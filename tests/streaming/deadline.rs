//! Deadline Tests

use std::time::Duration;

use crate::common::*;
use vtctl::{Context, StreamError};

#[tokio::test]
async fn slow_command_exceeds_deadline() {
    let harness = Harness::start(slow_topo(1, Duration::from_secs(5))).await;
    for (name, client) in harness.clients() {
        let mut stream = client
            .execute_vtctl_command(
                &Context::background(),
                args(&["ListAllTablets", "cell1"]),
                Duration::from_millis(100),
            )
            .await
            .unwrap();
        let err = stream.recv().await.unwrap_err();
        assert_eq!(err, StreamError::DeadlineExceeded { timeout_ms: 100 }, "{name}");
        assert!(err.is_deadline_exceeded());
        assert_eq!(stream.recv().await.unwrap_err(), err, "{name}");
    }
}

#[tokio::test]
async fn lines_before_deadline_are_kept() {
    let harness = Harness::start(slow_topo(8, Duration::from_millis(60))).await;
    for (name, client) in harness.clients() {
        let mut stream = client
            .execute_vtctl_command(
                &Context::background(),
                list_tablets_args(8),
                Duration::from_millis(200),
            )
            .await
            .unwrap();

        let mut lines = 0;
        let err = loop {
            match stream.recv().await {
                Ok(Some(_)) => lines += 1,
                Ok(None) => panic!("{name}: stream should not finish cleanly"),
                Err(e) => break e,
            }
        };
        assert!(err.is_deadline_exceeded(), "{name}: {err}");
        assert!(lines >= 1 && lines < 8, "{name}: got {lines} lines");
    }
}

#[tokio::test]
async fn fast_command_unaffected_by_short_timeout() {
    let harness = Harness::start(populated_topo(3)).await;
    for (name, client) in harness.clients() {
        let events = client
            .execute_vtctl_command(
                &Context::background(),
                args(&["ListAllTablets", "cell1"]),
                Duration::from_secs(2),
            )
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();
        assert_eq!(events.len(), 3, "{name}");
    }
}

#[tokio::test]
async fn server_serves_after_deadline() {
    let harness = Harness::start(slow_topo(1, Duration::from_millis(300))).await;
    for (name, client) in harness.clients() {
        let err = client
            .execute_vtctl_command(
                &Context::background(),
                args(&["ListAllTablets", "cell1"]),
                Duration::from_millis(50),
            )
            .await
            .unwrap()
            .collect()
            .await
            .unwrap_err();
        assert!(err.is_deadline_exceeded(), "{name}");

        let events = client
            .execute_vtctl_command(&Context::background(), args(&["ListAllTablets", "cell1"]), TIMEOUT)
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();
        assert_eq!(events.len(), 1, "{name}");
    }
}
