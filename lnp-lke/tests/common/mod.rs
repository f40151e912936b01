#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lnp_client::LinodeClient;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Kubeconfig pointing at `server` over plain HTTP.
pub fn kubeconfig_for(server: &str) -> String {
    format!(
        r#"apiVersion: v1
kind: Config
clusters:
- name: lke
  cluster:
    server: {server}
contexts:
- name: lke-ctx
  context:
    cluster: lke
    user: lke-admin
    namespace: default
current-context: lke-ctx
users:
- name: lke-admin
  user:
    token: test-token
"#
    )
}

pub fn node(name: &str, conditions: &[(&str, &str)]) -> Value {
    let conditions: Vec<Value> = conditions
        .iter()
        .map(|(t, s)| json!({"type": t, "status": s}))
        .collect();
    json!({
        "apiVersion": "v1",
        "kind": "Node",
        "metadata": {"name": name},
        "status": {"conditions": conditions}
    })
}

pub fn node_list(nodes: Vec<Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "apiVersion": "v1",
        "kind": "NodeList",
        "metadata": {"resourceVersion": "1"},
        "items": nodes
    }))
}

pub fn version_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "major": "1",
        "minor": "31",
        "gitVersion": "v1.31.4",
        "gitCommit": "a78aa47129b8539636eb86a9d00e31b2720fe06b",
        "gitTreeState": "clean",
        "buildDate": "2024-12-10T11:36:16Z",
        "goVersion": "go1.22.9",
        "compiler": "gc",
        "platform": "linux/amd64"
    }))
}

pub async fn mount_nodes(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/v1/nodes"))
        .respond_with(response)
        .mount(server)
        .await;
}

pub async fn mount_version(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/version"))
        .respond_with(response)
        .mount(server)
        .await;
}

pub fn kubeconfig_response(kubeconfig: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({"kubeconfig": STANDARD.encode(kubeconfig)}))
}

/// Serve the kubeconfig for `cluster_id` from the Linode API mock.
pub async fn mount_kubeconfig(
    linode: &MockServer,
    cluster_id: i64,
    kubeconfig: &str,
) {
    Mock::given(method("GET"))
        .and(path(format!("/v4/lke/clusters/{cluster_id}/kubeconfig")))
        .respond_with(kubeconfig_response(kubeconfig))
        .mount(linode)
        .await;
}

pub fn linode_client(linode: &MockServer) -> LinodeClient {
    LinodeClient::with_base_url(format!("{}/v4", linode.uri()), Some("token"))
        .unwrap()
}
