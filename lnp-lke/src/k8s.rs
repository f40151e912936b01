use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use tracing::trace;

use crate::condition::{ClientBuildError, TransportWrapper};

/// Build a Kubernetes client from raw kubeconfig bytes, applying
/// `wrapper` to the resolved connection config.
///
/// A fresh client is built per call so checks share no connection state.
pub async fn build_client(
    kubeconfig: &[u8],
    wrapper: Option<&TransportWrapper>,
) -> Result<Client, ClientBuildError> {
    install_crypto_provider();

    let text = std::str::from_utf8(kubeconfig)?;
    let kubeconfig = Kubeconfig::from_yaml(text)?;
    let mut config =
        Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await?;
    if let Some(wrap) = wrapper {
        config = wrap(config);
    }
    trace!(cluster_url = %config.cluster_url, "building kubernetes client");

    Ok(Client::try_from(config)?)
}

// rustls needs a process-wide provider once more than one is compiled in.
fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_non_utf8() {
        let res = build_client(&[0xff, 0xfe, 0x00], None).await;
        assert!(matches!(res, Err(ClientBuildError::Utf8(_))));
    }

    #[tokio::test]
    async fn rejects_malformed_yaml() {
        let res = build_client(b"clusters: [unterminated", None).await;
        assert!(matches!(res, Err(ClientBuildError::Kubeconfig(_))));
    }

    #[tokio::test]
    async fn rejects_kubeconfig_without_context() {
        let res = build_client(b"apiVersion: v1\nkind: Config\n", None).await;
        assert!(matches!(res, Err(ClientBuildError::Kubeconfig(_))));
    }
}
