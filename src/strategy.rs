//! Imgur authentication strategy: authorization redirect, code exchange, profile retrieval, and
//! verify dispatch.
//!
//! [`ImgurStrategy`] is composed over any [`OAuth2Client`]; the reqwest-backed
//! [`BasicOAuth2Client`](crate::oauth::BasicOAuth2Client) is used by [`ImgurStrategy::new`].

pub mod verify;

pub use verify::*;

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::ProviderConfig,
	error::ProfileFetchError,
	oauth::OAuth2Client,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	profile::{NormalizedProfile, PROVIDER_NAME, ProfileFetcher},
};

/// Boxed future returned by [`AuthenticationStrategy::authenticate`].
pub type StrategyFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Interface a host framework registers login strategies by.
pub trait AuthenticationStrategy<U>: Send + Sync {
	/// Registered strategy name.
	fn name(&self) -> &str;

	/// Builds the URL the user agent is redirected to, carrying the caller-owned `state`.
	fn authorization_url(&self, state: &str) -> Result<Url>;

	/// Completes the callback leg: exchanges `code` and resolves the account to a host user.
	fn authenticate<'a>(&'a self, code: &'a str) -> StrategyFuture<'a, VerifyOutcome<U>>;
}

/// Imgur login strategy.
pub struct ImgurStrategy<U> {
	config: ProviderConfig,
	client: Arc<dyn OAuth2Client>,
	profile: ProfileFetcher,
	verify: Verify<U>,
}
impl<U> ImgurStrategy<U>
where
	U: 'static + Send,
{
	/// Registered strategy name.
	pub const NAME: &'static str = PROVIDER_NAME;

	/// Creates a strategy backed by the crate's reqwest transport.
	#[cfg(feature = "reqwest")]
	pub fn new(config: ProviderConfig, verify: Verify<U>) -> Result<Self> {
		let client: Arc<dyn OAuth2Client> =
			Arc::new(crate::oauth::BasicOAuth2Client::new(config.clone())?);

		Ok(Self::with_client(config, verify, client))
	}

	/// Creates a strategy composed over an existing OAuth 2.0 client.
	pub fn with_client(
		config: ProviderConfig,
		verify: Verify<U>,
		client: Arc<dyn OAuth2Client>,
	) -> Self {
		let profile = ProfileFetcher::new(Arc::clone(&client), &config);

		Self { config, client, profile, verify }
	}

	/// Registered strategy name.
	pub fn name(&self) -> &'static str {
		Self::NAME
	}

	/// Provider configuration.
	pub fn config(&self) -> &ProviderConfig {
		&self.config
	}

	/// Builds the authorization redirect URL for `state`.
	pub fn authorization_url(&self, state: &str) -> Result<Url> {
		const KIND: FlowKind = FlowKind::Authorize;

		let _guard = FlowSpan::new(KIND, "authorization_url").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.client.authorization_url(state);

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	/// Fetches the normalized profile for an access token.
	pub async fn user_profile(
		&self,
		access_token: &TokenSecret,
	) -> Result<NormalizedProfile, ProfileFetchError> {
		self.profile.fetch(access_token).await
	}

	/// Exchanges `code`, fetches the profile, and hands both to the verify callback.
	///
	/// Verify callback errors are returned unmodified as [`Error::Verify`].
	pub async fn authenticate(&self, code: &str) -> Result<VerifyOutcome<U>> {
		const KIND: FlowKind = FlowKind::Authenticate;

		let span = FlowSpan::new(KIND, "authenticate");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let grant = self.exchange_code(code).await?;
				let profile = self.profile.fetch(&grant.access_token).await?;

				self.verify.call(grant, profile).await.map_err(Error::Verify)
			})
			.await;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	async fn exchange_code(&self, code: &str) -> Result<crate::auth::TokenGrant> {
		const KIND: FlowKind = FlowKind::CodeExchange;

		let span = FlowSpan::new(KIND, "exchange_code");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.client.exchange_code(code)).await;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}
}
impl<U> AuthenticationStrategy<U> for ImgurStrategy<U>
where
	U: 'static + Send,
{
	fn name(&self) -> &str {
		Self::NAME
	}

	fn authorization_url(&self, state: &str) -> Result<Url> {
		ImgurStrategy::authorization_url(self, state)
	}

	fn authenticate<'a>(&'a self, code: &'a str) -> StrategyFuture<'a, VerifyOutcome<U>> {
		Box::pin(ImgurStrategy::authenticate(self, code))
	}
}
impl<U> Debug for ImgurStrategy<U> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ImgurStrategy")
			.field("config", &self.config)
			.field("profile", &self.profile)
			.field("verify", &self.verify)
			.finish_non_exhaustive()
	}
}
