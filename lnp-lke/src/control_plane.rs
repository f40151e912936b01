use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::condition::{
    ClusterCondition, ClusterConditionOptions, ConditionError, Readiness,
    cancellable,
};
use crate::k8s;

/// Ready once the API server answers `GET /version`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlPlaneResponsive;

#[async_trait]
impl ClusterCondition for ControlPlaneResponsive {
    fn name(&self) -> &'static str {
        "control-plane-responsive"
    }

    async fn check(
        &self,
        cancel: &CancellationToken,
        options: &ClusterConditionOptions,
    ) -> Result<Readiness, ConditionError> {
        cancellable(cancel, fetch_version(options)).await
    }
}

async fn fetch_version(
    options: &ClusterConditionOptions,
) -> Result<Readiness, ConditionError> {
    let client = k8s::build_client(
        &options.kubeconfig,
        options.transport_wrapper.as_ref(),
    )
    .await?;
    let info = client
        .apiserver_version()
        .await
        .map_err(ConditionError::ControlPlane)?;
    debug!(version = %info.git_version, "control plane responded");
    Ok(Readiness::Ready)
}
