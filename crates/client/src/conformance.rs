//! Conformance suite every [`VtctlClient`] transport must pass.
//!
//! Transports call [`run_suite`] from their tests with a fresh store from
//! [`create_topo_server`] and a client wired to a server over that store.
//! Failures panic with a description of the broken expectation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use vtctl_core::{event_string, Context, Tablet, TabletAlias, TabletType};
use vtctl_topo::{MemoryTopo, TabletStore};

use crate::VtctlClient;

/// The line `ListAllTablets cell1` prints for [`fixture_tablet`].
pub const FIXTURE_LINE: &str = "cell1-0000000001 test_keyspace <null> primary localhost:3333 localhost:3334 [tag: \"value\"] 1970-01-01T01:01:01Z\n";

const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// A memory topology with the single cell `cell1`.
pub fn create_topo_server() -> Arc<MemoryTopo> {
    Arc::new(MemoryTopo::new(&["cell1"]))
}

/// The primary tablet the suite registers.
pub fn fixture_tablet() -> Tablet {
    Tablet {
        alias: TabletAlias::new("cell1", 1),
        hostname: "localhost".into(),
        mysql_hostname: "localhost".into(),
        mysql_port: 3334,
        port_map: [("vt".to_string(), 3333)].into_iter().collect(),
        primary_term_start_time: Utc
            .with_ymd_and_hms(1970, 1, 1, 1, 1, 1)
            .single()
            .map(|t| t + chrono::Duration::nanoseconds(1)),
        tags: [("tag".to_string(), "value".to_string())]
            .into_iter()
            .collect(),
        keyspace: "test_keyspace".into(),
        shard: String::new(),
        tablet_type: TabletType::Primary,
    }
}

fn args(line: &[&str]) -> Vec<String> {
    line.iter().map(|s| s.to_string()).collect()
}

/// Run the suite against `client`, which must serve commands over `store`.
///
/// Registers [`fixture_tablet`], checks the listing line and clean end of
/// stream, a command error for a missing cell, the fault raised by `Panic`,
/// then removes the tablet and checks the listing fails again.
pub async fn run_suite(store: &dyn TabletStore, client: &dyn VtctlClient) {
    let ctx = Context::background();
    let tablet = fixture_tablet();
    if let Err(e) = store.create_tablet(&ctx, tablet.clone()) {
        panic!("CreateTablet: {e}");
    }

    // a command that prints one line
    let mut stream = match client
        .execute_vtctl_command(&ctx, args(&["ListAllTablets", "cell1"]), CALL_TIMEOUT)
        .await
    {
        Ok(stream) => stream,
        Err(e) => panic!("remote error: {e}"),
    };
    match stream.recv().await {
        Ok(Some(event)) => assert_eq!(
            event_string(&event),
            FIXTURE_LINE,
            "unexpected log line"
        ),
        other => panic!("failed to get first line: {other:?}"),
    }
    match stream.recv().await {
        Ok(None) => {}
        other => panic!("didn't get end of log stream: {other:?}"),
    }

    // a command that fails
    let mut stream = match client
        .execute_vtctl_command(&ctx, args(&["ListAllTablets", "cell2"]), CALL_TIMEOUT)
        .await
    {
        Ok(stream) => stream,
        Err(e) => panic!("remote error: {e}"),
    };
    match stream.recv().await {
        Err(e) if e.to_string().contains("node doesn't exist") => {}
        other => panic!("unexpected remote error, got {other:?}, expected \"node doesn't exist\""),
    }

    // a command that panics
    let mut stream = match client
        .execute_vtctl_command(&ctx, args(&["Panic"]), CALL_TIMEOUT)
        .await
    {
        Ok(stream) => stream,
        Err(e) => panic!("remote error: {e}"),
    };
    match stream.recv().await {
        Err(e)
            if e.to_string().contains("this command panics on purpose")
                && e.to_string().contains("uncaught vtctl panic") => {}
        other => panic!(
            "unexpected remote error, got {other:?}, expected \"this command panics on purpose\" and \"uncaught vtctl panic\""
        ),
    }

    if let Err(e) = store.delete_tablet(&ctx, &tablet.alias) {
        panic!("DeleteTablet: {e}");
    }

    // the deleted tablet is gone from the listing
    let mut stream = match client
        .execute_vtctl_command(&ctx, args(&["ListAllTablets", "cell1"]), CALL_TIMEOUT)
        .await
    {
        Ok(stream) => stream,
        Err(e) => panic!("remote error: {e}"),
    };
    match stream.recv().await {
        Err(e) if e.is_command() && e.to_string().contains("node doesn't exist") => {}
        other => panic!(
            "unexpected result after delete, got {other:?}, expected \"node doesn't exist\""
        ),
    }
}
