use chrono::SecondsFormat;
use lnp_client::{LinodeClient, Login};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::DataSourceError;
use crate::filter::Filterable;

/// Flattened state of one account login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountLoginModel {
    pub id: i64,
    /// RFC 3339, UTC.
    pub datetime: Option<String>,
    pub ip: String,
    pub restricted: bool,
    pub username: String,
    pub status: String,
}

impl From<&Login> for AccountLoginModel {
    fn from(login: &Login) -> Self {
        Self {
            id: login.id,
            datetime: login
                .datetime
                .map(|dt| dt.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true)),
            ip: login.ip.clone(),
            restricted: login.restricted,
            username: login.username.clone(),
            status: login.status.clone(),
        }
    }
}

impl Filterable for Login {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.to_string()),
            "ip" => Some(self.ip.clone()),
            "restricted" => Some(self.restricted.to_string()),
            "status" => Some(self.status.clone()),
            "username" => Some(self.username.clone()),
            _ => None,
        }
    }
}

#[instrument(skip(client))]
pub async fn read_account_login(
    client: &LinodeClient,
    id: i64,
) -> Result<AccountLoginModel, DataSourceError> {
    let login = client
        .get_login(id)
        .await
        .map_err(|source| DataSourceError::ReadLogin { id, source })?;
    debug!(username = %login.username, status = %login.status, "read account login");
    Ok(AccountLoginModel::from(&login))
}
