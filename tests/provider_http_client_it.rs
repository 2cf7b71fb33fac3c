// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
	sync::Arc,
};
// crates.io
use parking_lot::Mutex;
use url::Url;
// self
use oauth2_imgur::{
	auth::TokenSecret,
	config::ProviderConfig,
	error::{ProfileFetchError, TransportError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	oauth::{
		BasicOAuth2Client, OAuth2Client, TokenPlacement, TransportErrorMapper,
		oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse, http::StatusCode},
	},
	profile::{ProfileEndpoint, ProfileFetcher},
};

#[derive(Debug)]
enum FakeTransportError {
	Offline,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Offline => write!(f, "Transport offline."),
		}
	}
}
impl StdError for FakeTransportError {}

#[derive(Clone, Debug, PartialEq, Eq)]
struct SeenRequest {
	uri: String,
	authorization: Option<String>,
	accept: Option<String>,
}

#[derive(Clone, Default)]
struct FakeHttpClient {
	seen: Arc<Mutex<Vec<SeenRequest>>>,
	responses: Arc<Mutex<Vec<(u16, &'static str)>>>,
	offline: bool,
}
impl FakeHttpClient {
	fn replying(responses: impl IntoIterator<Item = (u16, &'static str)>) -> Self {
		let mut responses = responses.into_iter().collect::<Vec<_>>();

		responses.reverse();

		Self { responses: Arc::new(Mutex::new(responses)), ..Default::default() }
	}

	fn offline() -> Self {
		Self { offline: true, ..Default::default() }
	}

	fn seen(&self) -> Vec<SeenRequest> {
		self.seen.lock().clone()
	}
}
impl ProviderHttpClient for FakeHttpClient {
	type Handle = FakeHttpHandle;
	type TransportError = FakeTransportError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		FakeHttpHandle { client: self.clone(), slot }
	}
}

struct FakeHttpHandle {
	client: FakeHttpClient,
	slot: ResponseMetadataSlot,
}
impl<'a> AsyncHttpClient<'a> for FakeHttpHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		let header = |name: &str| {
			request.headers().get(name).and_then(|value| value.to_str().ok()).map(str::to_owned)
		};

		self.client.seen.lock().push(SeenRequest {
			uri: request.uri().to_string(),
			authorization: header("authorization"),
			accept: header("accept"),
		});
		self.slot.take();

		let offline = self.client.offline;
		let next = self.client.responses.lock().pop();
		let slot = self.slot.clone();

		Box::pin(async move {
			if offline {
				return Err(HttpClientError::Reqwest(Box::new(FakeTransportError::Offline)));
			}

			let (status, body) = next.unwrap_or((404, "{}"));

			slot.store(ResponseMetadata { status: Some(status) });

			let mut response = HttpResponse::new(body.as_bytes().to_vec());

			*response.status_mut() = StatusCode::from_u16(status)
				.expect("Scripted status code should be valid.");

			Ok(response)
		})
	}
}

#[derive(Debug, Default)]
struct FakeMapper {
	calls: Mutex<Vec<Option<u16>>>,
}
impl TransportErrorMapper<FakeTransportError> for FakeMapper {
	fn map_transport_error(
		&self,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<FakeTransportError>,
	) -> TransportError {
		self.calls.lock().push(meta.and_then(|meta| meta.status));

		match err {
			HttpClientError::Reqwest(inner) => TransportError::Network { source: inner, status: None },
			other => TransportError::Other { message: other.to_string() },
		}
	}
}

fn config() -> ProviderConfig {
	ProviderConfig::builder()
		.client_id("client-it")
		.client_secret("secret-it")
		.callback_url("https://app.example.com/cb")
		.build()
		.expect("Provider configuration should build for transport tests.")
}

fn build_client(
	http: &FakeHttpClient,
	mapper: &Arc<FakeMapper>,
) -> Arc<BasicOAuth2Client<FakeHttpClient, FakeMapper>> {
	Arc::new(BasicOAuth2Client::with_http_client(config(), http.clone(), Arc::clone(mapper)))
}

#[tokio::test]
async fn profile_fetch_sends_token_only_in_authorization_header() {
	let http = FakeHttpClient::replying([
		(200, "{\"data\":{\"id\":\"123\",\"url\":\"jdoe\"}}"),
		(200, "{\"data\":{\"email\":\"a@b.com\"}}"),
	]);
	let client: Arc<dyn OAuth2Client> = build_client(&http, &Arc::new(FakeMapper::default()));
	let fetcher = ProfileFetcher::new(client, &config());
	let profile =
		fetcher.fetch(&TokenSecret::new("tok")).await.expect("Profile fetch should succeed.");
	let seen = http.seen();

	assert_eq!(profile.email_address(), Some("a@b.com"));
	assert_eq!(seen.len(), 2);
	assert_eq!(seen[0].uri, "https://api.imgur.com/3/account/me/");
	assert_eq!(seen[1].uri, "https://api.imgur.com/3/account/me/settings");

	for request in &seen {
		assert_eq!(request.authorization.as_deref(), Some("Bearer tok"));
		assert_eq!(request.accept.as_deref(), Some("application/json"));
		assert!(!request.uri.contains("access_token"));
	}
}

#[tokio::test]
async fn query_placement_appends_access_token_parameter() {
	let http = FakeHttpClient::replying([(200, "{}")]);
	let client = build_client(&http, &Arc::new(FakeMapper::default()));
	let url = Url::parse("https://api.imgur.com/3/account/me/?fields=all")
		.expect("Test URL should parse.");
	let body = client
		.authenticated_get(&url, &TokenSecret::new("tok"), TokenPlacement::default())
		.await
		.expect("Scripted request should succeed.");
	let seen = http.seen();

	assert_eq!(body, b"{}");
	assert_eq!(seen[0].uri, "https://api.imgur.com/3/account/me/?fields=all&access_token=tok");
	assert_eq!(seen[0].authorization, None);
}

#[tokio::test]
async fn non_success_status_becomes_status_error() {
	let http = FakeHttpClient::replying([(429, "{\"data\":{\"error\":\"Too Many Requests\"}}")]);
	let mapper = Arc::new(FakeMapper::default());
	let client: Arc<dyn OAuth2Client> = build_client(&http, &mapper);
	let err = ProfileFetcher::new(client, &config())
		.fetch(&TokenSecret::new("tok"))
		.await
		.expect_err("A 429 should fail the fetch.");

	assert_eq!(http.seen().len(), 1);
	assert!(mapper.calls.lock().is_empty());
	assert!(matches!(
		err,
		ProfileFetchError::Transport {
			endpoint: ProfileEndpoint::Account,
			source: TransportError::Status { status: 429, .. },
		}
	));
}

#[tokio::test]
async fn transport_failures_go_through_the_mapper() {
	let http = FakeHttpClient::offline();
	let mapper = Arc::new(FakeMapper::default());
	let client: Arc<dyn OAuth2Client> = build_client(&http, &mapper);
	let err = ProfileFetcher::new(client, &config())
		.fetch(&TokenSecret::new("tok"))
		.await
		.expect_err("Offline transport should fail the fetch.");

	assert_eq!(mapper.calls.lock().as_slice(), &[None]);

	match err {
		ProfileFetchError::Transport { source: TransportError::Network { source, .. }, .. } =>
			assert_eq!(source.to_string(), "Transport offline."),
		other => panic!("Unexpected error: {other:?}."),
	}
}
