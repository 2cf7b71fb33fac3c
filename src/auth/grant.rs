//! Token endpoint results produced by the authorization-code exchange.

// self
use crate::{_prelude::*, auth::secret::TokenSecret};

/// Tokens and metadata returned by the provider's token endpoint.
///
/// Verify callbacks that ask for token parameters receive a clone of this value alongside the
/// normalized profile.
#[derive(Clone)]
pub struct TokenGrant {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Refresh token secret, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Token type reported by the provider (normally `bearer`).
	pub token_type: String,
	/// Relative lifetime reported by the provider.
	pub expires_in: Option<Duration>,
	/// Space-delimited scopes echoed back by the provider.
	pub scope: Option<String>,
	/// Instant the grant was received.
	pub issued_at: OffsetDateTime,
}
impl TokenGrant {
	/// Creates a bearer grant issued now with no refresh token or expiry.
	pub fn bearer(access_token: impl Into<TokenSecret>) -> Self {
		Self {
			access_token: access_token.into(),
			refresh_token: None,
			token_type: "bearer".into(),
			expires_in: None,
			scope: None,
			issued_at: OffsetDateTime::now_utc(),
		}
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<TokenSecret>) -> Self {
		self.refresh_token = Some(refresh_token.into());

		self
	}

	/// Attaches a relative lifetime.
	pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
		self.expires_in = Some(expires_in);

		self
	}

	/// Absolute expiry derived from `issued_at + expires_in`.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_in.map(|lifetime| self.issued_at + lifetime)
	}

	/// Returns `true` when the grant carries an expiry that has passed at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at().is_some_and(|expires_at| instant >= expires_at)
	}
}
impl Debug for TokenGrant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenGrant")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("token_type", &self.token_type)
			.field("expires_in", &self.expires_in)
			.field("scope", &self.scope)
			.field("issued_at", &self.issued_at)
			.finish()
	}
}
