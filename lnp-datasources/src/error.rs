use lnp_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("failed to read account login {id}: {source}")]
    ReadLogin {
        id: i64,
        #[source]
        source: ClientError,
    },

    #[error("failed to list account logins: {0}")]
    ListLogins(#[source] ClientError),

    #[error("invalid filter field {name:?}; expected one of: {allowed}")]
    InvalidFilter { name: String, allowed: String },

    #[error("failed to compile regex {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to generate data source id: {0}")]
    Id(#[from] serde_json::Error),
}
