use std::time::Duration;

use lnp_config::ProviderConfig;
use reqwest::{Client, Response, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::error::ClientError;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
const PAGE_SIZE: u32 = 500;

/// HTTP client for the Linode API.
#[derive(Clone, Debug)]
pub struct LinodeClient {
    client: Client,
    base_url: String,
    poll_interval: Duration,
}

/// A single page of a paginated list response.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub pages: u32,
    #[serde(default)]
    pub results: u32,
}

fn first_page() -> u32 {
    1
}

impl LinodeClient {
    /// Create a client from provider configuration.
    pub fn new(cfg: &ProviderConfig) -> Result<Self, ClientError> {
        let user_agent = match &cfg.ua_prefix {
            Some(prefix) if !prefix.is_empty() => {
                format!("{prefix} {}", default_user_agent())
            }
            _ => default_user_agent(),
        };
        let client = build_http_client(
            cfg.token.as_deref(),
            &user_agent,
            cfg.http_timeout(),
        )?;
        Ok(Self {
            client,
            base_url: cfg.base_url(),
            poll_interval: cfg.lke.node_ready_poll(),
        })
    }

    /// Create a client against an explicit versioned API root.
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: Option<&str>,
    ) -> Result<Self, ClientError> {
        let client = build_http_client(
            token,
            &default_user_agent(),
            Duration::from_secs(30),
        )?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Default period for waiters built on this client.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request
    pub async fn get<T>(&self, path: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        trace!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Fetch every page of a list endpoint.
    pub async fn get_all<T>(&self, path: &str) -> Result<Vec<T>, ClientError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let response = self
                .client
                .get(&url)
                .query(&[("page", page), ("page_size", PAGE_SIZE)])
                .send()
                .await?;
            let body: Page<T> = self.handle_response(response).await?;
            debug!(
                path,
                page = body.page,
                pages = body.pages,
                results = body.results,
                "fetched page"
            );
            let pages = body.pages;
            items.extend(body.data);
            if page >= pages {
                break;
            }
            page += 1;
        }
        Ok(items)
    }

    /// Handle HTTP response and deserialize JSON
    async fn handle_response<T>(&self, response: Response) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();

        if status.is_success() {
            let text = response.text().await?;
            Ok(serde_json::from_str(&text)?)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ClientError::api_error(status, &error_text))
        }
    }
}

fn default_user_agent() -> String {
    format!("lnp/{}", env!("CARGO_PKG_VERSION"))
}

fn build_http_client(
    token: Option<&str>,
    user_agent: &str,
    timeout: Duration,
) -> Result<Client, ClientError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        let mut value =
            header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| {
                    ClientError::config_error("token contains invalid characters")
                })?;
        value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, value);
    }

    Ok(Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(timeout)
        .build()?)
}
