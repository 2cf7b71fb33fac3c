//! Strategy-level error types shared across configuration, transport, token, and profile layers.

// self
use crate::{_prelude::*, profile::ProfileEndpoint};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error type used for transport sources and host verify callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical strategy error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, non-success status).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token endpoint returned an unusable response.
	#[error(transparent)]
	TokenEndpoint(#[from] TokenEndpointError),
	/// User profile could not be retrieved.
	#[error(transparent)]
	Profile(#[from] ProfileFetchError),
	/// Host verify callback failed; surfaced unmodified.
	#[error(transparent)]
	Verify(BoxError),

	/// Provider rejected the grant (e.g., bad or reused authorization code).
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
}

/// Configuration failures raised while assembling the strategy.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required option was not supplied.
	#[error("Missing required option `{field}`.")]
	MissingField {
		/// Name of the missing option.
		field: &'static str,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, HTTP status).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
		/// HTTP status code, when the failure happened after a response arrived.
		status: Option<u16>,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// HTTP request could not be assembled.
	#[error("HTTP request could not be constructed.")]
	Request(#[from] oauth2::http::Error),
	/// Configured endpoint is not a valid URL.
	#[error("Endpoint `{url}` is not a valid URL.")]
	InvalidUrl {
		/// Offending URL string.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider answered with a non-success status.
	#[error("Provider responded with HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body: String,
	},
	/// Any other transport failure reported by the HTTP client.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Client-supplied description.
		message: String,
	},
}
impl TransportError {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src), status: None }
	}

	/// Builds a [`TransportError::Status`] from a raw response body.
	pub fn status(status: u16, body: &[u8]) -> Self {
		Self::Status { status, body: truncate_preview(&String::from_utf8_lossy(body)) }
	}

	/// Builds a [`TransportError::InvalidUrl`] for the provided string.
	pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
		Self::InvalidUrl { url: url.into(), source }
	}
}
/// Token endpoint failures that are not OAuth grant/client rejections.
#[derive(Debug, ThisError)]
pub enum TokenEndpointError {
	/// Provider returned an OAuth error the strategy does not classify further.
	#[error("Token endpoint returned an OAuth error: {error}.")]
	Rejected {
		/// OAuth `error` code.
		error: String,
		/// OAuth `error_description`, when supplied.
		description: Option<String>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint returned something the OAuth client could not interpret.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	Unexpected {
		/// Client-supplied message.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Failures raised while retrieving the user profile.
#[derive(Debug, ThisError)]
pub enum ProfileFetchError {
	/// One of the profile calls failed at the transport level.
	#[error("failed to fetch user profile")]
	Transport {
		/// Endpoint that failed.
		endpoint: ProfileEndpoint,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// A profile response body could not be decoded.
	#[error("Failed to decode the {endpoint} response.")]
	Decode {
		/// Endpoint whose body was rejected.
		endpoint: ProfileEndpoint,
		/// Underlying decoding failure.
		#[source]
		source: DecodeError,
	},
}
impl ProfileFetchError {
	/// Endpoint associated with the failure.
	pub fn endpoint(&self) -> ProfileEndpoint {
		match self {
			Self::Transport { endpoint, .. } | Self::Decode { endpoint, .. } => *endpoint,
		}
	}
}

/// JSON decoding failures for provider API responses.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not valid JSON.
	#[error("Response body is not valid JSON.")]
	Syntax(#[source] serde_json::Error),
	/// Body is JSON but does not have the expected shape.
	#[error("Response body has an unexpected shape at `{}`.", .0.path())]
	Shape(#[source] serde_path_to_error::Error<serde_json::Error>),
}

fn truncate_preview(body: &str) -> String {
	if body.chars().count() <= TransportError::BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf = body.chars().take(TransportError::BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}
