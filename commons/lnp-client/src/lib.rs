//! Minimal Linode API v4 client covering account logins and LKE clusters.

pub mod account;
mod error;
mod http;
pub mod lke;

pub use account::Login;
pub use error::{ApiErrorReason, ClientError};
pub use http::{LinodeClient, Page};
pub use lke::{LkeCluster, LkeClusterApiEndpoint, LkeKubeconfig};
