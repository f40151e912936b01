use std::time::Duration;

use clap::Parser;
use envconfig::Envconfig;
use lnp_client::LinodeClient;
use lnp_config::{ProviderConfig, init_tracing};
use lnp_lke::{ClusterPollOptions, wait_for_cluster_ready};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Block until an LKE cluster's API server answers and a node is Ready.
#[derive(Parser, Clone, Debug)]
#[command(name = "lke-wait")]
struct Opts {
    /// LKE cluster ID.
    cluster_id: i64,

    /// Give up after this many seconds (0 waits forever).
    /// Defaults to LINODE_LKE_WAIT_TIMEOUT_SECS.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Milliseconds between checks.
    /// Defaults to LINODE_LKE_NODE_READY_POLL_MS.
    #[arg(long)]
    period_ms: Option<u64>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");
    let opts = Opts::parse();

    let cfg = ProviderConfig::init_from_env()?;
    info!(?cfg, cluster_id = opts.cluster_id, "waiting for LKE cluster");
    if cfg.token.is_none() {
        warn!("LINODE_TOKEN is not set; requests will be unauthenticated");
    }

    let client = LinodeClient::new(&cfg)?;
    let mut poll = ClusterPollOptions::from_config(&cfg.lke);
    if let Some(ms) = opts.period_ms {
        poll = poll.with_period(Duration::from_millis(ms));
    }
    match opts.timeout_secs {
        Some(0) => poll.timeout = None,
        Some(secs) => poll = poll.with_timeout(Duration::from_secs(secs)),
        None => {}
    }

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted; cancelling wait");
            on_signal.cancel();
        }
    });

    wait_for_cluster_ready(&client, opts.cluster_id, &cancel, &poll).await?;

    let cluster = client.get_lke_cluster(opts.cluster_id).await?;
    println!(
        "LKE cluster {} ({}) is ready: status={} k8s={}",
        cluster.id, cluster.label, cluster.status, cluster.k8s_version
    );
    Ok(())
}
