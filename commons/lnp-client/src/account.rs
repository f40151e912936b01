use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{ClientError, LinodeClient};

/// An account login attempt, as reported by `/account/logins`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Login {
    pub id: i64,
    /// UTC, without an offset on the wire.
    pub datetime: Option<NaiveDateTime>,
    pub ip: String,
    pub restricted: bool,
    pub username: String,
    /// `successful` or `failed`.
    pub status: String,
}

impl LinodeClient {
    #[instrument(skip(self))]
    pub async fn get_login(&self, login_id: i64) -> Result<Login, ClientError> {
        self.get(&format!("/account/logins/{login_id}")).await
    }

    #[instrument(skip(self))]
    pub async fn list_logins(&self) -> Result<Vec<Login>, ClientError> {
        self.get_all("/account/logins").await
    }
}
