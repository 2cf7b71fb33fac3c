//! Imgur account profile retrieval and normalization.
//!
//! [`ProfileFetcher`] issues the account-info and account-settings calls with the access token in
//! the `Authorization` header and folds both `data` objects into a [`NormalizedProfile`].

pub mod fetcher;
pub mod record;

pub use fetcher::*;
pub use record::*;

// self
use crate::_prelude::*;

/// Provider literal stamped onto every [`NormalizedProfile`].
pub const PROVIDER_NAME: &str = "imgur";

/// API endpoint a profile failure is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProfileEndpoint {
	/// `account/me/`.
	Account,
	/// `account/me/settings`.
	Settings,
}
impl ProfileEndpoint {
	/// Returns a stable label suitable for logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProfileEndpoint::Account => "account",
			ProfileEndpoint::Settings => "account settings",
		}
	}
}
impl Display for ProfileEndpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
