//! Readiness waiting for Linode Kubernetes Engine clusters.
//!
//! A cluster is ready once its API server answers and at least one node
//! reports `Ready=True`. Both checks are [`ClusterCondition`]s driven by
//! [`wait_for_cluster_conditions`].

pub mod condition;
mod control_plane;
pub mod k8s;
mod node_ready;
pub mod wait;

pub use condition::{
    ClientBuildError, ClusterCondition, ClusterConditionOptions,
    ConditionError, Readiness, TransportWrapper,
};
pub use control_plane::ControlPlaneResponsive;
pub use node_ready::{
    ClusterHasReadyNode, NO_READY_NODES, any_node_ready,
    cluster_has_ready_node, node_is_ready,
};
pub use wait::{
    ClusterPollOptions, WaitError, wait_for_cluster_conditions,
    wait_for_cluster_ready,
};
