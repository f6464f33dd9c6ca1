//! Fault Isolation Tests

use crate::common::*;
use vtctl::{Context, SessionState, StreamError};

#[tokio::test]
async fn panic_surfaces_as_fault() {
    let harness = Harness::start(populated_topo(1)).await;
    for (name, client) in harness.clients() {
        let mut stream = client
            .execute_vtctl_command(&Context::background(), args(&["Panic"]), TIMEOUT)
            .await
            .unwrap();
        let err = stream.recv().await.unwrap_err();
        assert!(err.is_fault(), "{name}: {err}");
        let message = err.to_string();
        assert!(message.contains("this command panics on purpose"), "{name}: {message}");
        assert!(message.contains("uncaught vtctl panic"), "{name}: {message}");
        assert_eq!(stream.recv().await.unwrap_err(), err, "{name}");
    }
}

#[tokio::test]
async fn server_keeps_serving_after_fault() {
    let harness = Harness::start(populated_topo(2)).await;
    for (name, client) in harness.clients() {
        for _ in 0..3 {
            let err = client
                .execute_vtctl_command(&Context::background(), args(&["Panic"]), TIMEOUT)
                .await
                .unwrap()
                .collect()
                .await
                .unwrap_err();
            assert!(err.is_fault(), "{name}");

            let events = client
                .execute_vtctl_command(&Context::background(), args(&["ListAllTablets", "cell1"]), TIMEOUT)
                .await
                .unwrap()
                .collect()
                .await
                .unwrap();
            assert_eq!(events.len(), 2, "{name}");
        }
    }
}

#[tokio::test]
async fn concurrent_calls_do_not_share_faults() {
    let harness = Harness::start(populated_topo(10)).await;
    let ctx = Context::background();
    let (panicked, listed) = tokio::join!(
        async {
            harness
                .remote
                .execute_vtctl_command(&ctx, args(&["Panic"]), TIMEOUT)
                .await
                .unwrap()
                .collect()
                .await
        },
        async {
            harness
                .local
                .execute_vtctl_command(&ctx, args(&["ListAllTablets", "cell1"]), TIMEOUT)
                .await
                .unwrap()
                .collect()
                .await
        }
    );
    assert!(matches!(panicked, Err(StreamError::Fault { .. })));
    assert_eq!(listed.unwrap().len(), 10);
}

#[tokio::test]
async fn session_records_fault_state() {
    let harness = Harness::start(populated_topo(1)).await;
    let mut session = harness
        .server
        .execute(
            &Context::background(),
            vtctl::CommandRequest::new(args(&["Panic"]), TIMEOUT),
        )
        .unwrap();
    assert!(session.recv().await.unwrap_err().is_fault());
    assert_eq!(session.state(), SessionState::Fault);
}
