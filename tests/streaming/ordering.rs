//! Ordering Tests

use crate::common::*;
use vtctl::{event_string, Context, Level, TabletAlias};

#[tokio::test]
async fn lines_arrive_in_uid_order() {
    let harness = Harness::start(populated_topo(40)).await;
    for (name, client) in harness.clients() {
        let events = client
            .execute_vtctl_command(&Context::background(), args(&["ListAllTablets", "cell1"]), TIMEOUT)
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();
        let uids: Vec<u32> = events
            .iter()
            .map(|e| {
                let alias: TabletAlias = e.value.split(' ').next().unwrap().parse().unwrap();
                alias.uid
            })
            .collect();
        assert_eq!(uids, (1..=40).collect::<Vec<_>>(), "{name}");
    }
}

#[tokio::test]
async fn output_is_identical_across_runs_and_transports() {
    let harness = Harness::start(populated_topo(25)).await;
    let mut outputs = Vec::new();
    for _ in 0..3 {
        for (_, client) in harness.clients() {
            let events = client
                .execute_vtctl_command(&Context::background(), args(&["ListAllTablets", "cell1"]), TIMEOUT)
                .await
                .unwrap()
                .collect()
                .await
                .unwrap();
            let text: String = events.iter().map(event_string).collect();
            outputs.push(text);
        }
    }
    assert_eq!(outputs[0].lines().count(), 25);
    assert!(outputs.iter().all(|o| o == &outputs[0]));
}

#[tokio::test]
async fn list_tablets_follows_argument_order() {
    let harness = Harness::start(populated_topo(5)).await;
    for (name, client) in harness.clients() {
        let events = client
            .execute_vtctl_command(
                &Context::background(),
                args(&["ListTablets", "cell1-0000000004", "cell1-2", "cell1-0000000005"]),
                TIMEOUT,
            )
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();
        let aliases: Vec<&str> = events.iter().map(|e| e.value.split(' ').next().unwrap()).collect();
        assert_eq!(
            aliases,
            ["cell1-0000000004", "cell1-0000000002", "cell1-0000000005"],
            "{name}"
        );
    }
}

#[tokio::test]
async fn every_line_ends_with_one_newline() {
    let harness = Harness::start(populated_topo(3)).await;
    for (name, client) in harness.clients() {
        let events = client
            .execute_vtctl_command(&Context::background(), args(&["ListAllTablets"]), TIMEOUT)
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();
        // three tablets, plus a warning for the empty cell2
        assert_eq!(events.len(), 4, "{name}");
        assert_eq!(
            events.iter().filter(|e| e.level == Level::Console).count(),
            3,
            "{name}"
        );
        for event in &events {
            let line = event_string(event);
            assert!(line.ends_with('\n') && !line.ends_with("\n\n"), "{name}: {line:?}");
        }
    }
}
