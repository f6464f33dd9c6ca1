//! Cancellation Tests

use std::time::Duration;

use crate::common::*;
use vtctl::{Context, StreamError};

#[tokio::test]
async fn cancel_mid_stream_stops_lines() {
    let harness = Harness::start(slow_topo(20, Duration::from_millis(30))).await;
    for (name, client) in harness.clients() {
        let ctx = Context::background();
        let mut stream = client
            .execute_vtctl_command(&ctx, list_tablets_args(20), TIMEOUT)
            .await
            .unwrap();
        assert!(stream.recv().await.unwrap().is_some(), "{name}");

        ctx.cancel();
        for _ in 0..3 {
            assert_eq!(stream.recv().await, Err(StreamError::Cancelled), "{name}");
        }
    }
}

#[tokio::test]
async fn cancel_before_first_line() {
    let harness = Harness::start(slow_topo(1, Duration::from_secs(5))).await;
    for (name, client) in harness.clients() {
        let ctx = Context::background();
        let mut stream = client
            .execute_vtctl_command(&ctx, args(&["ListAllTablets", "cell1"]), TIMEOUT)
            .await
            .unwrap();

        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });
        assert_eq!(stream.recv().await, Err(StreamError::Cancelled), "{name}");
    }
}

#[tokio::test]
async fn already_cancelled_context() {
    let harness = Harness::start(populated_topo(1)).await;
    for (name, client) in harness.clients() {
        let ctx = Context::background();
        ctx.cancel();
        let err = match client
            .execute_vtctl_command(&ctx, args(&["ListAllTablets", "cell1"]), TIMEOUT)
            .await
        {
            Ok(stream) => stream.collect().await.unwrap_err(),
            Err(e) => e,
        };
        assert_eq!(err, StreamError::Cancelled, "{name}");
    }
}

#[tokio::test]
async fn dropped_stream_frees_server_for_next_call() {
    let harness = Harness::start(slow_topo(20, Duration::from_millis(30))).await;
    for (name, client) in harness.clients() {
        let mut stream = client
            .execute_vtctl_command(&Context::background(), list_tablets_args(20), TIMEOUT)
            .await
            .unwrap();
        stream.recv().await.unwrap();
        drop(stream);

        let events = client
            .execute_vtctl_command(&Context::background(), list_tablets_args(2), TIMEOUT)
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();
        assert_eq!(events.len(), 2, "{name}");
    }
}
