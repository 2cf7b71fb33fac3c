//! Two-call profile retrieval against the Imgur REST API.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::ProviderConfig,
	error::{DecodeError, ProfileFetchError, TransportError},
	oauth::{OAuth2Client, TokenPlacement},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	profile::{AccountRecord, Envelope, NormalizedProfile, ProfileEndpoint, SettingsRecord},
};

/// Fetches and normalizes the authenticated user's Imgur profile.
#[derive(Clone)]
pub struct ProfileFetcher {
	client: Arc<dyn OAuth2Client>,
	account_url: String,
	settings_url: String,
}
impl ProfileFetcher {
	/// Creates a fetcher that issues requests through `client` against the configured API base.
	pub fn new(client: Arc<dyn OAuth2Client>, config: &ProviderConfig) -> Self {
		Self { client, account_url: config.account_url(), settings_url: config.settings_url() }
	}

	/// Account-info endpoint.
	pub fn account_url(&self) -> &str {
		&self.account_url
	}

	/// Account-settings endpoint.
	pub fn settings_url(&self) -> &str {
		&self.settings_url
	}

	/// Retrieves account info, then account settings, and merges them.
	///
	/// The account call must succeed before the settings call is issued. Both calls carry the
	/// token in the `Authorization` header.
	pub async fn fetch(
		&self,
		access_token: &TokenSecret,
	) -> Result<NormalizedProfile, ProfileFetchError> {
		const KIND: FlowKind = FlowKind::ProfileFetch;

		let span = FlowSpan::new(KIND, "fetch");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let account: AccountRecord =
					self.get(ProfileEndpoint::Account, &self.account_url, access_token).await?;
				let profile = NormalizedProfile::from_account(account);
				let settings: SettingsRecord =
					self.get(ProfileEndpoint::Settings, &self.settings_url, access_token).await?;

				Ok(profile.merge_settings(settings))
			})
			.await;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	async fn get<T>(
		&self,
		endpoint: ProfileEndpoint,
		url: &str,
		access_token: &TokenSecret,
	) -> Result<T, ProfileFetchError>
	where
		T: DeserializeOwned,
	{
		let span = FlowSpan::for_endpoint(FlowKind::ProfileFetch, "get", endpoint.as_str());
		let result = span
			.instrument(async move {
				let url = Url::parse(url).map_err(|e| ProfileFetchError::Transport {
					endpoint,
					source: TransportError::invalid_url(url, e),
				})?;
				let body = self
					.client
					.authenticated_get(&url, access_token, TokenPlacement::AuthorizationHeader)
					.await
					.map_err(|source| ProfileFetchError::Transport { endpoint, source })?;

				decode_envelope(&body)
					.map_err(|source| ProfileFetchError::Decode { endpoint, source })
			})
			.await;

		obs::record_profile_call(endpoint.as_str(), FlowOutcome::of(&result));

		result
	}
}
impl Debug for ProfileFetcher {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProfileFetcher")
			.field("account_url", &self.account_url)
			.field("settings_url", &self.settings_url)
			.finish_non_exhaustive()
	}
}

/// Decodes a `{ "data": ... }` body, distinguishing invalid JSON from an unexpected shape.
pub fn decode_envelope<T>(body: &[u8]) -> Result<T, DecodeError>
where
	T: DeserializeOwned,
{
	let value = serde_json::from_slice::<serde_json::Value>(body).map_err(DecodeError::Syntax)?;
	let envelope: Envelope<T> =
		serde_path_to_error::deserialize(value).map_err(DecodeError::Shape)?;

	Ok(envelope.data)
}
