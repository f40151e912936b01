use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use kube::config::KubeconfigError;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Decorates the connection configuration before a Kubernetes client is
/// built from it. Used to inject telemetry headers, redirect the endpoint
/// at a test double, or tune timeouts.
///
/// Only the `kube::Config` is exposed, not the HTTP service stack, so
/// per-request middleware (retries, request rewriting, tracing layers) cannot
/// be installed through it.
pub type TransportWrapper =
    Arc<dyn Fn(kube::Config) -> kube::Config + Send + Sync>;

/// Outcome of a successful check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    /// Keep polling; the reason is reported if the wait runs out of time.
    NotReady(String),
}

impl Readiness {
    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self::NotReady(reason.into())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Everything a condition needs to reach the cluster.
#[derive(Clone, Default)]
pub struct ClusterConditionOptions {
    /// Raw kubeconfig YAML.
    pub kubeconfig: Vec<u8>,
    pub transport_wrapper: Option<TransportWrapper>,
}

impl ClusterConditionOptions {
    pub fn new(kubeconfig: impl Into<Vec<u8>>) -> Self {
        Self {
            kubeconfig: kubeconfig.into(),
            transport_wrapper: None,
        }
    }

    pub fn with_transport_wrapper(mut self, wrapper: TransportWrapper) -> Self {
        self.transport_wrapper = Some(wrapper);
        self
    }
}

impl std::fmt::Debug for ClusterConditionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterConditionOptions")
            .field("kubeconfig_len", &self.kubeconfig.len())
            .field("transport_wrapper", &self.transport_wrapper.is_some())
            .finish()
    }
}

#[derive(Error, Debug)]
pub enum ClientBuildError {
    #[error("kubeconfig is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid kubeconfig: {0}")]
    Kubeconfig(#[from] KubeconfigError),

    #[error("failed to create client: {0}")]
    Client(#[from] kube::Error),
}

#[derive(Error, Debug)]
pub enum ConditionError {
    #[error("failed to build kubernetes client: {0}")]
    ClientBuild(#[from] ClientBuildError),

    #[error("failed to get nodes for cluster: {0}")]
    ListNodes(#[source] kube::Error),

    #[error("control plane did not respond: {0}")]
    ControlPlane(#[source] kube::Error),

    #[error("condition check cancelled")]
    Cancelled,
}

impl ConditionError {
    /// API round-trip failures may clear up on a later poll; a bad
    /// kubeconfig or a cancelled check will not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ListNodes(_) | Self::ControlPlane(_))
    }
}

/// A single readiness check against a cluster. Implementations hold no
/// state between calls.
#[async_trait]
pub trait ClusterCondition: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(
        &self,
        cancel: &CancellationToken,
        options: &ClusterConditionOptions,
    ) -> Result<Readiness, ConditionError>;
}

/// Run `check` until it finishes or `cancel` fires, whichever comes first.
pub(crate) async fn cancellable<F>(
    cancel: &CancellationToken,
    check: F,
) -> Result<Readiness, ConditionError>
where
    F: Future<Output = Result<Readiness, ConditionError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ConditionError::Cancelled),
        res = check => res,
    }
}
