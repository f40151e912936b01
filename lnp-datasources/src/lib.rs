//! Read-only views over Linode account logins.
//!
//! `account_login` reads one login by ID; `account_logins` lists every
//! login on the account and narrows the result with [`Filter`]s.

pub mod account_login;
pub mod account_logins;
mod error;
pub mod filter;

pub use account_login::{AccountLoginModel, read_account_login};
pub use account_logins::{
    ACCOUNT_LOGINS_FILTERS, AccountLoginsModel, read_account_logins,
};
pub use error::DataSourceError;
pub use filter::{Filter, FilterConfig, FilterSet, Filterable, MatchBy};
