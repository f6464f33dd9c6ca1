//! Terminal Signal Tests

use crate::common::*;
use vtctl::{event_string, Context, StreamError};

#[tokio::test]
async fn eof_repeats_after_last_line() {
    let harness = Harness::start(populated_topo(1)).await;
    for (name, client) in harness.clients() {
        let mut stream = client
            .execute_vtctl_command(&Context::background(), args(&["ListAllTablets", "cell1"]), TIMEOUT)
            .await
            .unwrap();
        let line = event_string(&stream.recv().await.unwrap().unwrap());
        assert!(line.starts_with("cell1-0000000001 commerce 0 replica host1:15001 host1:3306 [] <null>"), "{name}: {line}");
        for _ in 0..3 {
            assert_eq!(stream.recv().await, Ok(None), "{name}");
        }
    }
}

#[tokio::test]
async fn missing_cell_is_command_error_without_lines() {
    let harness = Harness::start(populated_topo(1)).await;
    for (name, client) in harness.clients() {
        let mut stream = client
            .execute_vtctl_command(&Context::background(), args(&["ListAllTablets", "cell9"]), TIMEOUT)
            .await
            .unwrap();
        let err = stream.recv().await.unwrap_err();
        assert!(err.is_command(), "{name}: {err}");
        assert!(err.to_string().contains("node doesn't exist"), "{name}: {err}");
        for _ in 0..3 {
            assert_eq!(stream.recv().await.unwrap_err(), err, "{name}");
        }
    }
}

#[tokio::test]
async fn empty_cell_is_command_error() {
    // cell2 is registered but holds no tablets
    let harness = Harness::start(populated_topo(1)).await;
    for (name, client) in harness.clients() {
        let err = client
            .execute_vtctl_command(&Context::background(), args(&["ListAllTablets", "cell2"]), TIMEOUT)
            .await
            .unwrap()
            .collect()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("node doesn't exist"), "{name}: {err}");
    }
}

#[tokio::test]
async fn unknown_command_and_bad_flags_are_command_errors() {
    let harness = Harness::start(populated_topo(1)).await;
    for (name, client) in harness.clients() {
        for line in [&["Frobnicate"][..], &["ListAllTablets", "--tablet_type", "bogus"][..]] {
            let err = client
                .execute_vtctl_command(&Context::background(), args(line), TIMEOUT)
                .await
                .unwrap()
                .collect()
                .await
                .unwrap_err();
            assert!(err.is_command(), "{name} {line:?}: {err}");
        }
    }
}

#[tokio::test]
async fn empty_command_rejected_before_streaming() {
    let harness = Harness::start(populated_topo(1)).await;
    for (name, client) in harness.clients() {
        let result = client
            .execute_vtctl_command(&Context::background(), Vec::new(), TIMEOUT)
            .await;
        let err = match result {
            // the TCP transport learns of the rejection from the first frame
            Ok(stream) => stream.collect().await.unwrap_err(),
            Err(e) => e,
        };
        assert_eq!(err, StreamError::command("no command specified"), "{name}");
    }
}
