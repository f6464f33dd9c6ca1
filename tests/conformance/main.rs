//! Conformance Tests
//!
//! Every transport runs the same round-trip suite: the fixture tablet's
//! listing line and clean end of stream, a command error for a missing
//! cell, and the fault raised by `Panic`.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use vtctl::conformance::{create_topo_server, run_suite};
use vtctl::{connect, serve, ClientConfig, Executor, MemoryTopo, VtctlServer};

fn create_server(topo: &Arc<MemoryTopo>) -> Arc<VtctlServer> {
    Arc::new(VtctlServer::new(Executor::new(topo.clone())))
}

async fn start_listener(server: Arc<VtctlServer>) -> (String, CancellationToken) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let shutdown = CancellationToken::new();
    tokio::spawn(serve(listener, server, shutdown.clone()));
    (addr, shutdown)
}

#[tokio::test]
async fn in_process_transport_passes_suite() {
    let topo = create_topo_server();
    let client = connect(&ClientConfig::default(), Some(create_server(&topo))).unwrap();
    run_suite(topo.as_ref(), client.as_ref()).await;
    assert_eq!(topo.tablet_count(), 0, "suite should remove its tablet");
}

#[tokio::test]
async fn tcp_transport_passes_suite() {
    let topo = create_topo_server();
    let (addr, shutdown) = start_listener(create_server(&topo)).await;
    let client = connect(&ClientConfig::tcp(addr), None).unwrap();
    run_suite(topo.as_ref(), client.as_ref()).await;
    shutdown.cancel();
}

#[tokio::test]
async fn suite_is_repeatable_on_one_server() {
    let topo = create_topo_server();
    let server = create_server(&topo);
    let (addr, shutdown) = start_listener(server.clone()).await;

    let local = connect(&ClientConfig::default(), Some(server.clone())).unwrap();
    let remote = connect(&ClientConfig::tcp(addr), None).unwrap();
    for _ in 0..2 {
        run_suite(topo.as_ref(), local.as_ref()).await;
        run_suite(topo.as_ref(), remote.as_ref()).await;
    }
    // four commands per run, four runs
    assert_eq!(server.sessions_started(), 16);
    shutdown.cancel();
}
