use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use kube::api::{Api, ListParams};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::condition::{
    ClusterCondition, ClusterConditionOptions, ConditionError, Readiness,
    cancellable,
};
use crate::k8s;

/// Reason reported while no node has `Ready=True`.
pub const NO_READY_NODES: &str = "no nodes in cluster are ready";

const NODE_READY: &str = "Ready";
const CONDITION_TRUE: &str = "True";

/// True if the node carries a `Ready` condition with status `True`.
pub fn node_is_ready(node: &Node) -> bool {
    node.status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .map(|conds| {
            conds
                .iter()
                .any(|c| c.type_ == NODE_READY && c.status == CONDITION_TRUE)
        })
        .unwrap_or(false)
}

pub fn any_node_ready(nodes: &[Node]) -> bool {
    nodes.iter().any(node_is_ready)
}

/// List every node in the cluster and report ready once any of them is.
///
/// A failed list is returned as [`ConditionError::ListNodes`] rather than
/// folded into not-ready.
#[instrument(skip_all)]
pub async fn cluster_has_ready_node(
    cancel: &CancellationToken,
    options: &ClusterConditionOptions,
) -> Result<Readiness, ConditionError> {
    cancellable(cancel, fetch_nodes(options)).await
}

async fn fetch_nodes(
    options: &ClusterConditionOptions,
) -> Result<Readiness, ConditionError> {
    let client = k8s::build_client(
        &options.kubeconfig,
        options.transport_wrapper.as_ref(),
    )
    .await?;
    let nodes: Api<Node> = Api::all(client);
    let list = nodes
        .list(&ListParams::default())
        .await
        .map_err(ConditionError::ListNodes)?;

    if any_node_ready(&list.items) {
        debug!(nodes = list.items.len(), "found ready node");
        Ok(Readiness::Ready)
    } else {
        debug!(nodes = list.items.len(), "{NO_READY_NODES}");
        Ok(Readiness::not_ready(NO_READY_NODES))
    }
}

/// [`cluster_has_ready_node`] as a [`ClusterCondition`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterHasReadyNode;

#[async_trait]
impl ClusterCondition for ClusterHasReadyNode {
    fn name(&self) -> &'static str {
        "cluster-has-ready-node"
    }

    async fn check(
        &self,
        cancel: &CancellationToken,
        options: &ClusterConditionOptions,
    ) -> Result<Readiness, ConditionError> {
        cluster_has_ready_node(cancel, options).await
    }
}
