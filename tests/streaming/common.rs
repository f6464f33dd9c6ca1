//! Shared harness for streaming tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use vtctl::{
    connect, serve, ClientConfig, Context, Executor, MemoryTopo, Tablet, TabletAlias,
    TabletStore, TabletType, VtctlClient, VtctlServer,
};
use vtctl_topo::TopoResult;

pub const TIMEOUT: Duration = Duration::from_secs(30);

/// Both transports wired to one server.
pub struct Harness {
    pub server: Arc<VtctlServer>,
    pub local: Box<dyn VtctlClient>,
    pub remote: Box<dyn VtctlClient>,
    shutdown: CancellationToken,
}

impl Harness {
    pub async fn start(store: Arc<dyn TabletStore>) -> Self {
        let server = Arc::new(VtctlServer::new(Executor::new(store)));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let shutdown = CancellationToken::new();
        tokio::spawn(serve(listener, server.clone(), shutdown.clone()));

        Self {
            local: connect(&ClientConfig::default(), Some(server.clone())).unwrap(),
            remote: connect(&ClientConfig::tcp(addr), None).unwrap(),
            server,
            shutdown,
        }
    }

    /// The clients under test, labelled for assertion messages.
    pub fn clients(&self) -> [(&'static str, &dyn VtctlClient); 2] {
        [("in_process", self.local.as_ref()), ("tcp", self.remote.as_ref())]
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

pub fn args(line: &[&str]) -> Vec<String> {
    line.iter().map(|s| s.to_string()).collect()
}

pub fn tablet(cell: &str, uid: u32) -> Tablet {
    Tablet {
        alias: TabletAlias::new(cell, uid),
        hostname: format!("host{}", uid),
        mysql_hostname: format!("host{}", uid),
        mysql_port: 3306,
        port_map: [("vt".to_string(), 15000 + uid as i32)].into_iter().collect(),
        keyspace: "commerce".into(),
        shard: "0".into(),
        tablet_type: TabletType::Replica,
        ..Tablet::default()
    }
}

/// A topology with `count` tablets in `cell1`, created in reverse uid order.
pub fn populated_topo(count: u32) -> Arc<MemoryTopo> {
    let topo = MemoryTopo::new(&["cell1", "cell2"]);
    let ctx = Context::background();
    for uid in (1..=count).rev() {
        topo.create_tablet(&ctx, tablet("cell1", uid)).unwrap();
    }
    Arc::new(topo)
}

/// Store that takes `delay` for every tablet lookup and listing, waking
/// early when the call's context is done.
pub struct SlowTopo {
    pub inner: MemoryTopo,
    pub delay: Duration,
}

impl SlowTopo {
    pub fn new(inner: MemoryTopo, delay: Duration) -> Self {
        Self { inner, delay }
    }

    fn stall(&self, ctx: &Context) -> TopoResult<()> {
        let until = std::time::Instant::now() + self.delay;
        while std::time::Instant::now() < until {
            ctx.check()?;
            std::thread::sleep(Duration::from_millis(2));
        }
        ctx.check()?;
        Ok(())
    }
}

impl TabletStore for SlowTopo {
    fn create_tablet(&self, ctx: &Context, tablet: Tablet) -> TopoResult<()> {
        self.inner.create_tablet(ctx, tablet)
    }

    fn delete_tablet(&self, ctx: &Context, alias: &TabletAlias) -> TopoResult<()> {
        self.inner.delete_tablet(ctx, alias)
    }

    fn get_tablet(&self, ctx: &Context, alias: &TabletAlias) -> TopoResult<Tablet> {
        self.stall(ctx)?;
        self.inner.get_tablet(ctx, alias)
    }

    fn list_tablets(&self, ctx: &Context, cell: &str) -> TopoResult<Vec<Tablet>> {
        self.stall(ctx)?;
        self.inner.list_tablets(ctx, cell)
    }

    fn cells(&self, ctx: &Context) -> TopoResult<Vec<String>> {
        self.inner.cells(ctx)
    }
}

/// A slow store holding `count` tablets in `cell1`.
pub fn slow_topo(count: u32, delay: Duration) -> Arc<SlowTopo> {
    let inner = MemoryTopo::new(&["cell1"]);
    let ctx = Context::background();
    for uid in 1..=count {
        inner.create_tablet(&ctx, tablet("cell1", uid)).unwrap();
    }
    Arc::new(SlowTopo::new(inner, delay))
}

/// `ListTablets` over uids `1..=count` of `cell1`.
pub fn list_tablets_args(count: u32) -> Vec<String> {
    let mut line = vec!["ListTablets".to_string()];
    line.extend((1..=count).map(|uid| TabletAlias::new("cell1", uid).to_string()));
    line
}
