use lnp_client::LinodeClient;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::account_login::AccountLoginModel;
use crate::filter::{Filter, FilterConfig};
use crate::DataSourceError;

pub const ACCOUNT_LOGINS_FILTERS: FilterConfig = FilterConfig {
    fields: &["ip", "restricted", "status", "username"],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountLoginsModel {
    /// Derived from the filters, so the same query always has the same ID.
    pub id: String,
    pub logins: Vec<AccountLoginModel>,
}

/// List every login on the account that matches all `filters`.
#[instrument(skip(client))]
pub async fn read_account_logins(
    client: &LinodeClient,
    filters: &[Filter],
) -> Result<AccountLoginsModel, DataSourceError> {
    let filter_set = ACCOUNT_LOGINS_FILTERS.compile(filters)?;
    let id = ACCOUNT_LOGINS_FILTERS.generate_id(filters)?;

    let logins = client
        .list_logins()
        .await
        .map_err(DataSourceError::ListLogins)?;
    let total = logins.len();
    let matched = filter_set.apply(logins);
    debug!(total, matched = matched.len(), "filtered account logins");

    Ok(AccountLoginsModel {
        id,
        logins: matched.iter().map(AccountLoginModel::from).collect(),
    })
}
