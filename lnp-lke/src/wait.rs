use std::future::Future;
use std::time::Duration;

use lnp_client::{ClientError, LinodeClient};
use lnp_config::LkeConfig;
use thiserror::Error;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::condition::{
    ClusterCondition, ClusterConditionOptions, ConditionError, Readiness,
    TransportWrapper,
};
use crate::control_plane::ControlPlaneResponsive;
use crate::node_ready::ClusterHasReadyNode;

const KUBECONFIG_PHASE: &str = "kubeconfig";
/// `tokio::time::interval` panics on a zero period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Polling parameters for a cluster wait.
#[derive(Clone, Default)]
pub struct ClusterPollOptions {
    /// Defaults to the client's poll interval.
    pub period: Option<Duration>,
    /// No deadline when unset; the caller's cancellation still applies.
    pub timeout: Option<Duration>,
    pub transport_wrapper: Option<TransportWrapper>,
}

impl ClusterPollOptions {
    pub fn from_config(cfg: &LkeConfig) -> Self {
        Self {
            period: Some(cfg.node_ready_poll()),
            timeout: cfg.wait_timeout(),
            transport_wrapper: None,
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_transport_wrapper(mut self, wrapper: TransportWrapper) -> Self {
        self.transport_wrapper = Some(wrapper);
        self
    }
}

impl std::fmt::Debug for ClusterPollOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterPollOptions")
            .field("period", &self.period)
            .field("timeout", &self.timeout)
            .field("transport_wrapper", &self.transport_wrapper.is_some())
            .finish()
    }
}

#[derive(Error, Debug)]
pub enum WaitError {
    #[error("failed to get kubeconfig for LKE cluster {cluster_id}: {source}")]
    Kubeconfig {
        cluster_id: i64,
        #[source]
        source: ClientError,
    },

    #[error("condition {condition} failed for LKE cluster {cluster_id}: {source}")]
    Condition {
        cluster_id: i64,
        condition: &'static str,
        #[source]
        source: ConditionError,
    },

    #[error(
        "deadline exceeded waiting for LKE cluster {cluster_id} ({phase}){}",
        last_error_suffix(.last_error)
    )]
    DeadlineExceeded {
        cluster_id: i64,
        phase: &'static str,
        last_error: Option<String>,
    },

    #[error("wait for LKE cluster {cluster_id} was cancelled")]
    Cancelled { cluster_id: i64 },
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    match last_error {
        Some(e) => format!(": {e}"),
        None => String::new(),
    }
}

impl WaitError {
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Races every await of the wait against cancellation and the deadline,
/// and remembers which phase it was in and why the last poll failed.
struct Poller<'a> {
    cluster_id: i64,
    cancel: &'a CancellationToken,
    deadline: Option<Instant>,
    period: Duration,
    phase: &'static str,
    last_error: Option<String>,
}

impl Poller<'_> {
    async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, WaitError> {
        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(WaitError::Cancelled {
                cluster_id: self.cluster_id,
            }),
            _ = deadline => Err(WaitError::DeadlineExceeded {
                cluster_id: self.cluster_id,
                phase: self.phase,
                last_error: self.last_error.clone(),
            }),
            out = fut => Ok(out),
        }
    }

    fn enter(&mut self, phase: &'static str) -> tokio::time::Interval {
        self.phase = phase;
        self.last_error = None;
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }
}

/// Wait until every condition holds for the cluster, evaluated in order.
///
/// The kubeconfig is fetched first and retried while the API reports it
/// unavailable. Each condition is then polled every `period` until it
/// reports [`Readiness::Ready`]. Not-ready results and retryable errors keep
/// the loop going; the last one is reported if the deadline passes.
#[instrument(skip(client, cancel, options, conditions), fields(conditions = conditions.len()))]
pub async fn wait_for_cluster_conditions(
    client: &LinodeClient,
    cluster_id: i64,
    cancel: &CancellationToken,
    options: &ClusterPollOptions,
    conditions: &[&dyn ClusterCondition],
) -> Result<(), WaitError> {
    let mut poller = Poller {
        cluster_id,
        cancel,
        // A timeout too large to represent is treated as no deadline.
        deadline: options.timeout.and_then(|t| Instant::now().checked_add(t)),
        period: options
            .period
            .unwrap_or_else(|| client.poll_interval())
            .max(MIN_PERIOD),
        phase: KUBECONFIG_PHASE,
        last_error: None,
    };

    let mut ticker = poller.enter(KUBECONFIG_PHASE);
    let kubeconfig = loop {
        poller.guard(ticker.tick()).await?;
        match poller
            .guard(client.get_lke_cluster_kubeconfig(cluster_id))
            .await?
        {
            Ok(kubeconfig) => {
                break kubeconfig.decode().map_err(|source| {
                    WaitError::Kubeconfig { cluster_id, source }
                })?;
            }
            Err(e) if e.is_retryable() => {
                debug!(error = %e, "kubeconfig not available yet");
                poller.last_error = Some(e.to_string());
            }
            Err(source) => {
                return Err(WaitError::Kubeconfig { cluster_id, source });
            }
        }
    };

    let condition_options = ClusterConditionOptions {
        kubeconfig,
        transport_wrapper: options.transport_wrapper.clone(),
    };

    for condition in conditions {
        let name = condition.name();
        let mut ticker = poller.enter(name);
        loop {
            poller.guard(ticker.tick()).await?;
            match poller
                .guard(condition.check(cancel, &condition_options))
                .await?
            {
                Ok(Readiness::Ready) => {
                    debug!(condition = name, "condition met");
                    break;
                }
                Ok(Readiness::NotReady(reason)) => {
                    debug!(condition = name, %reason, "condition not met");
                    poller.last_error = Some(reason);
                }
                Err(ConditionError::Cancelled) => {
                    return Err(WaitError::Cancelled { cluster_id });
                }
                Err(e) if e.is_retryable() => {
                    warn!(condition = name, error = %e, "ignoring condition error");
                    poller.last_error = Some(e.to_string());
                }
                Err(source) => {
                    return Err(WaitError::Condition {
                        cluster_id,
                        condition: name,
                        source,
                    });
                }
            }
        }
    }

    info!("all cluster conditions met");
    Ok(())
}

/// Wait until the API server responds and at least one node is `Ready`.
pub async fn wait_for_cluster_ready(
    client: &LinodeClient,
    cluster_id: i64,
    cancel: &CancellationToken,
    options: &ClusterPollOptions,
) -> Result<(), WaitError> {
    let conditions: [&dyn ClusterCondition; 2] =
        [&ControlPlaneResponsive, &ClusterHasReadyNode];
    wait_for_cluster_conditions(client, cluster_id, cancel, options, &conditions)
        .await
}
