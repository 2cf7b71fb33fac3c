//! OAuth 2.0 client capability consumed by the strategy, backed by the `oauth2` crate.
//!
//! [`OAuth2Client`] is the seam between this crate and the generic OAuth machinery: building
//! the authorization URL, exchanging an authorization code, and issuing authenticated `GET`
//! requests. [`BasicOAuth2Client`] implements it on top of [`oauth2::basic::BasicClient`] and any
//! [`ProviderHttpClient`] transport.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
	EndpointNotSet, EndpointSet, HttpClientError, HttpRequest, RedirectUrl, RequestTokenError,
	TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
	http::{
		Method,
		header::{ACCEPT, AUTHORIZATION},
	},
};
// self
use crate::{
	_prelude::*,
	auth::{TokenGrant, TokenSecret},
	config::ProviderConfig,
	error::{TokenEndpointError, TransportError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Boxed future returned by [`OAuth2Client`] operations.
pub type ClientFuture<'a, T, E = Error> = Pin<Box<dyn Future<Output = Result<T, E>> + 'a + Send>>;

/// Capability interface of the generic OAuth 2.0 client the strategy is composed with.
pub trait OAuth2Client: Send + Sync {
	/// Builds the provider authorization URL carrying the caller-supplied `state`.
	fn authorization_url(&self, state: &str) -> Result<Url>;

	/// Exchanges an authorization code for tokens.
	fn exchange_code<'a>(&'a self, code: &'a str) -> ClientFuture<'a, TokenGrant>;

	/// Issues a `GET` request presenting `access_token` as selected by `placement`, returning the
	/// raw body of a successful (2xx) response.
	fn authenticated_get<'a>(
		&'a self,
		url: &'a Url,
		access_token: &'a TokenSecret,
		placement: TokenPlacement,
	) -> ClientFuture<'a, Vec<u8>, TransportError>;
}

/// Where an authenticated `GET` carries the access token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TokenPlacement {
	/// `access_token` query parameter.
	#[default]
	Query,
	/// `Authorization: Bearer <token>` header.
	AuthorizationHeader,
}
impl TokenPlacement {
	/// Query parameter name used by [`TokenPlacement::Query`].
	pub const QUERY_PARAMETER: &'static str = "access_token";
}

/// Maps HTTP transport failures into [`TransportError`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a transport error.
	fn map_transport_error(
		&self,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> TransportError;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> TransportError {
		match err {
			HttpClientError::Reqwest(inner) => {
				let status = meta_status(meta).or_else(|| inner.status().map(|code| code.as_u16()));

				TransportError::Network { source: inner, status }
			},
			HttpClientError::Http(inner) => TransportError::Request(inner),
			HttpClientError::Io(inner) => TransportError::Io(inner),
			HttpClientError::Other(message) => TransportError::Other { message },
			_ => TransportError::Other { message: "unrecognized HTTP client failure".into() },
		}
	}
}

/// [`OAuth2Client`] implementation backed by [`oauth2::basic::BasicClient`].
///
/// The underlying `oauth2` client is assembled per operation from the stored
/// [`ProviderConfig`], so malformed endpoints surface as [`TransportError::InvalidUrl`] at the
/// call that needs them. Client credentials travel in the token request body, which is what
/// Imgur expects.
pub struct BasicOAuth2Client<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	config: ProviderConfig,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> BasicOAuth2Client<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: ProviderConfig,
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { config, http_client: http_client.into(), error_mapper: error_mapper.into() }
	}

	/// Configuration the client was built from.
	pub fn config(&self) -> &ProviderConfig {
		&self.config
	}

	fn oauth_client(&self) -> Result<ConfiguredBasicClient, TransportError> {
		let config = &self.config;
		let auth_url = AuthUrl::new(config.authorization_url().to_owned())
			.map_err(|source| TransportError::invalid_url(config.authorization_url(), source))?;
		let token_url = TokenUrl::new(config.token_url().to_owned())
			.map_err(|source| TransportError::invalid_url(config.token_url(), source))?;
		let redirect_url = RedirectUrl::new(config.callback_url().to_owned())
			.map_err(|source| TransportError::invalid_url(config.callback_url(), source))?;

		Ok(BasicClient::new(ClientId::new(config.client_id().to_owned()))
			.set_client_secret(ClientSecret::new(config.client_secret().expose().to_owned()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url)
			.set_redirect_uri(redirect_url)
			.set_auth_type(AuthType::RequestBody))
	}
}
#[cfg(feature = "reqwest")]
impl BasicOAuth2Client<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client with its own reqwest-backed transport that does not follow redirects.
	pub fn new(config: ProviderConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::without_redirects()?;

		Ok(Self::with_http_client(config, http_client, ReqwestTransportErrorMapper))
	}
}
impl<C, M> OAuth2Client for BasicOAuth2Client<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn authorization_url(&self, state: &str) -> Result<Url> {
		let oauth_client = self.oauth_client()?;
		let (url, _state) = oauth_client.authorize_url(|| CsrfToken::new(state.to_owned())).url();

		Ok(url)
	}

	fn exchange_code<'a>(&'a self, code: &'a str) -> ClientFuture<'a, TokenGrant> {
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let oauth_client = self.oauth_client()?;
			let handle = self.http_client.with_metadata(meta.clone());
			let response = oauth_client
				.exchange_code(AuthorizationCode::new(code.to_owned()))
				.request_async(&handle)
				.await
				.map_err(|err| map_request_error(meta.take(), err, self.error_mapper.as_ref()))?;

			Ok(map_token_response(response))
		})
	}

	fn authenticated_get<'a>(
		&'a self,
		url: &'a Url,
		access_token: &'a TokenSecret,
		placement: TokenPlacement,
	) -> ClientFuture<'a, Vec<u8>, TransportError> {
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let request = build_get_request(url, access_token, placement)?;
			let handle = self.http_client.with_metadata(meta.clone());
			let response = handle.call(request).await.map_err(|err| {
				self.error_mapper.map_transport_error(meta.take().as_ref(), err)
			})?;
			let status = response.status();

			if !status.is_success() {
				return Err(TransportError::status(status.as_u16(), response.body()));
			}

			Ok(response.into_body())
		})
	}
}
impl<C, M> Debug for BasicOAuth2Client<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BasicOAuth2Client").field("config", &self.config).finish()
	}
}

pub(crate) fn build_get_request(
	url: &Url,
	access_token: &TokenSecret,
	placement: TokenPlacement,
) -> Result<HttpRequest, TransportError> {
	let mut target = url.clone();
	let mut builder =
		oauth2::http::Request::builder().method(Method::GET).header(ACCEPT, "application/json");

	match placement {
		TokenPlacement::Query => {
			target
				.query_pairs_mut()
				.append_pair(TokenPlacement::QUERY_PARAMETER, access_token.expose());
		},
		TokenPlacement::AuthorizationHeader => {
			builder = builder.header(AUTHORIZATION, format!("Bearer {}", access_token.expose()));
		},
	}

	Ok(builder.uri(target.as_str()).body(Vec::new())?)
}

fn map_token_response(response: BasicTokenResponse) -> TokenGrant {
	let expires_in = response
		.expires_in()
		.and_then(|lifetime| i64::try_from(lifetime.as_secs()).ok())
		.map(Duration::seconds);
	let scope = response.scopes().map(|scopes| {
		scopes.iter().map(|scope| scope.as_str()).collect::<Vec<_>>().join(" ")
	});

	TokenGrant {
		access_token: TokenSecret::new(response.access_token().secret().to_owned()),
		refresh_token: response
			.refresh_token()
			.map(|refresh| TokenSecret::new(refresh.secret().to_owned())),
		token_type: response.token_type().as_ref().to_owned(),
		expires_in,
		scope,
		issued_at: OffsetDateTime::now_utc(),
	}
}

fn map_request_error<E, M>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> Error
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let meta_ref = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) =>
			map_server_response_error(response, meta_status(meta_ref)),
		RequestTokenError::Request(error) => mapper.map_transport_error(meta_ref, error).into(),
		RequestTokenError::Parse(source, _body) =>
			TokenEndpointError::Parse { source, status: meta_status(meta_ref) }.into(),
		RequestTokenError::Other(message) =>
			TokenEndpointError::Unexpected { message, status: meta_status(meta_ref) }.into(),
	}
}

fn map_server_response_error(response: BasicErrorResponse, status: Option<u16>) -> Error {
	let error = response.error().as_ref().to_owned();
	let description = response.error_description().cloned();
	let reason = description.clone().unwrap_or_else(|| error.clone());

	match error.as_str() {
		"invalid_grant" | "access_denied" => Error::InvalidGrant { reason },
		"invalid_client" | "unauthorized_client" => Error::InvalidClient { reason },
		_ => TokenEndpointError::Rejected { error, description, status }.into(),
	}
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}
