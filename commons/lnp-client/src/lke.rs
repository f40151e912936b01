use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use tracing::instrument;

use crate::{ClientError, LinodeClient};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LkeCluster {
    pub id: i64,
    pub label: String,
    pub region: String,
    /// `ready` or `not_ready`.
    pub status: String,
    pub k8s_version: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub control_plane: LkeClusterControlPlane,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LkeClusterControlPlane {
    #[serde(default)]
    pub high_availability: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LkeClusterApiEndpoint {
    pub endpoint: String,
}

/// Kubeconfig as returned by the API: a base64-encoded YAML document.
#[derive(Debug, Clone, Deserialize)]
pub struct LkeKubeconfig {
    #[serde(rename = "kubeconfig")]
    pub encoded: String,
}

impl LkeKubeconfig {
    pub fn decode(&self) -> Result<Vec<u8>, ClientError> {
        STANDARD
            .decode(self.encoded.trim())
            .map_err(|e| ClientError::Decode(format!("kubeconfig: {e}")))
    }
}

impl LinodeClient {
    #[instrument(skip(self))]
    pub async fn get_lke_cluster(
        &self,
        cluster_id: i64,
    ) -> Result<LkeCluster, ClientError> {
        self.get(&format!("/lke/clusters/{cluster_id}")).await
    }

    /// Fails with a 503 until the control plane has been provisioned.
    #[instrument(skip(self))]
    pub async fn get_lke_cluster_kubeconfig(
        &self,
        cluster_id: i64,
    ) -> Result<LkeKubeconfig, ClientError> {
        self.get(&format!("/lke/clusters/{cluster_id}/kubeconfig"))
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_lke_cluster_api_endpoints(
        &self,
        cluster_id: i64,
    ) -> Result<Vec<LkeClusterApiEndpoint>, ClientError> {
        self.get_all(&format!("/lke/clusters/{cluster_id}/api-endpoints"))
            .await
    }
}
