//! Imgur provider configuration: fixed endpoints plus caller-supplied client credentials.
//!
//! [`ProviderConfig`] is immutable once built. Endpoint strings are stored verbatim; a malformed
//! value is reported as a [`TransportError::InvalidUrl`](crate::error::TransportError) when the
//! strategy first uses it, not while the configuration is assembled.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Imgur's OAuth 2.0 authorization endpoint.
pub const AUTHORIZATION_URL: &str = "https://api.imgur.com/oauth2/authorize";
/// Imgur's OAuth 2.0 token endpoint.
pub const TOKEN_URL: &str = "https://api.imgur.com/oauth2/token";
/// Base URL of Imgur's v3 REST API.
pub const API_BASE: &str = "https://api.imgur.com/3";

/// Validated provider configuration consumed by the OAuth client and profile fetcher.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ProviderConfigBuilder")]
pub struct ProviderConfig {
	authorization_url: String,
	token_url: String,
	api_base: String,
	client_id: String,
	client_secret: TokenSecret,
	callback_url: String,
}
impl ProviderConfig {
	/// Creates an empty builder seeded with Imgur's default endpoints.
	pub fn builder() -> ProviderConfigBuilder {
		ProviderConfigBuilder::default()
	}

	/// Authorization endpoint users are redirected to.
	pub fn authorization_url(&self) -> &str {
		&self.authorization_url
	}

	/// Token endpoint used for the code exchange.
	pub fn token_url(&self) -> &str {
		&self.token_url
	}

	/// REST API base used for profile retrieval, without a trailing slash.
	pub fn api_base(&self) -> &str {
		self.api_base.trim_end_matches('/')
	}

	/// OAuth client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// OAuth client secret.
	pub fn client_secret(&self) -> &TokenSecret {
		&self.client_secret
	}

	/// Redirect URI registered with the provider.
	pub fn callback_url(&self) -> &str {
		&self.callback_url
	}

	/// Account-info endpoint (`{api-base}/account/me/`).
	pub fn account_url(&self) -> String {
		format!("{}/account/me/", self.api_base())
	}

	/// Account-settings endpoint (`{api-base}/account/me/settings`).
	pub fn settings_url(&self) -> String {
		format!("{}/account/me/settings", self.api_base())
	}
}
impl Debug for ProviderConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderConfig")
			.field("authorization_url", &self.authorization_url)
			.field("token_url", &self.token_url)
			.field("api_base", &self.api_base)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &!self.client_secret.is_empty())
			.field("callback_url", &self.callback_url)
			.finish()
	}
}
impl TryFrom<ProviderConfigBuilder> for ProviderConfig {
	type Error = ConfigError;

	fn try_from(builder: ProviderConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

/// Builder for [`ProviderConfig`] values.
///
/// Also serves as the serde shape of the configuration, so hosts can load it from any format
/// and let [`ProviderConfig`]'s `Deserialize` run the same checks.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfigBuilder {
	/// Overrides the authorization endpoint.
	pub authorization_url: Option<String>,
	/// Overrides the token endpoint.
	pub token_url: Option<String>,
	/// Overrides the REST API base.
	pub api_base: Option<String>,
	/// OAuth client identifier (required).
	pub client_id: Option<String>,
	/// OAuth client secret (required).
	pub client_secret: Option<TokenSecret>,
	/// Redirect URI registered with the provider (required).
	pub callback_url: Option<String>,
}
impl ProviderConfigBuilder {
	/// Sets the OAuth client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the OAuth client secret.
	pub fn client_secret(mut self, client_secret: impl Into<TokenSecret>) -> Self {
		self.client_secret = Some(client_secret.into());

		self
	}

	/// Sets the redirect URI.
	pub fn callback_url(mut self, callback_url: impl Into<String>) -> Self {
		self.callback_url = Some(callback_url.into());

		self
	}

	/// Overrides the authorization endpoint.
	pub fn authorization_url(mut self, url: impl Into<String>) -> Self {
		self.authorization_url = Some(url.into());

		self
	}

	/// Overrides the token endpoint.
	pub fn token_url(mut self, url: impl Into<String>) -> Self {
		self.token_url = Some(url.into());

		self
	}

	/// Overrides the REST API base.
	pub fn api_base(mut self, url: impl Into<String>) -> Self {
		self.api_base = Some(url.into());

		self
	}

	/// Consumes the builder, applying endpoint defaults and checking required options.
	pub fn build(self) -> Result<ProviderConfig, ConfigError> {
		let client_id = required("client_id", self.client_id)?;
		let client_secret = self
			.client_secret
			.filter(|secret| !secret.is_empty())
			.ok_or(ConfigError::MissingField { field: "client_secret" })?;
		let callback_url = required("callback_url", self.callback_url)?;

		Ok(ProviderConfig {
			authorization_url: self.authorization_url.unwrap_or_else(|| AUTHORIZATION_URL.into()),
			token_url: self.token_url.unwrap_or_else(|| TOKEN_URL.into()),
			api_base: self.api_base.unwrap_or_else(|| API_BASE.into()),
			client_id,
			client_secret,
			callback_url,
		})
	}
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	value.filter(|value| !value.is_empty()).ok_or(ConfigError::MissingField { field })
}
