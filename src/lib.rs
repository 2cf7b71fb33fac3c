//! Imgur OAuth 2.0 authentication strategy: authorization-code login, normalized account
//! profiles, and pluggable verify callbacks layered over the `oauth2` crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod profile;
pub mod strategy;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::ProviderConfig,
		http::ReqwestHttpClient,
		oauth::{BasicOAuth2Client, OAuth2Client, ReqwestTransportErrorMapper},
		strategy::{ImgurStrategy, Verify},
	};

	/// OAuth client alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = BasicOAuth2Client<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a reqwest-backed OAuth client for the provided configuration.
	pub fn build_reqwest_test_client(config: &ProviderConfig) -> Arc<ReqwestTestClient> {
		Arc::new(BasicOAuth2Client::with_http_client(
			config.clone(),
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		))
	}

	/// Constructs an [`ImgurStrategy`] wired to the insecure reqwest transport used across
	/// integration tests.
	pub fn build_reqwest_test_strategy<U>(config: ProviderConfig, verify: Verify<U>) -> ImgurStrategy<U>
	where
		U: 'static + Send,
	{
		let client: Arc<dyn OAuth2Client> = build_reqwest_test_client(&config);

		ImgurStrategy::with_client(config, verify, client)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{BoxError, Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
