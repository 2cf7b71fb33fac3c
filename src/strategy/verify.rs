//! Host verify callbacks and their outcomes.

// self
use crate::{
	_prelude::*,
	auth::{TokenGrant, TokenSecret},
	profile::NormalizedProfile,
};

/// Result a verify callback resolves to.
pub type VerifyResult<U> = Result<VerifyOutcome<U>, BoxError>;

/// Boxed future returned by verify callbacks.
pub type VerifyFuture<U> = Pin<Box<dyn Future<Output = VerifyResult<U>> + Send>>;

/// Host decision about an authenticated Imgur account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyOutcome<U> {
	/// The host accepted the account and resolved it to a user.
	Authenticated(U),
	/// The host declined the account without raising an error.
	Rejected {
		/// Optional message surfaced to the end user.
		message: Option<String>,
	},
}
impl<U> VerifyOutcome<U> {
	/// Declines the account without a message.
	pub fn rejected() -> Self {
		Self::Rejected { message: None }
	}

	/// Declines the account with a message.
	pub fn rejected_with(message: impl Into<String>) -> Self {
		Self::Rejected { message: Some(message.into()) }
	}

	/// Returns the accepted user, if any.
	pub fn user(&self) -> Option<&U> {
		match self {
			Self::Authenticated(user) => Some(user),
			Self::Rejected { .. } => None,
		}
	}

	/// Consumes the outcome, returning the accepted user, if any.
	pub fn into_user(self) -> Option<U> {
		match self {
			Self::Authenticated(user) => Some(user),
			Self::Rejected { .. } => None,
		}
	}

	/// Returns `true` when the host accepted the account.
	pub fn is_authenticated(&self) -> bool {
		matches!(self, Self::Authenticated(_))
	}
}

/// Callback receiving `(access_token, refresh_token, profile)`.
pub trait VerifyProfile<U>: Send + Sync {
	/// Resolves the profile to a host user.
	fn verify(
		&self,
		access_token: TokenSecret,
		refresh_token: Option<TokenSecret>,
		profile: NormalizedProfile,
	) -> VerifyFuture<U>;
}
impl<U, F, Fut> VerifyProfile<U> for F
where
	F: Send + Sync + Fn(TokenSecret, Option<TokenSecret>, NormalizedProfile) -> Fut,
	Fut: 'static + Send + Future<Output = VerifyResult<U>>,
{
	fn verify(
		&self,
		access_token: TokenSecret,
		refresh_token: Option<TokenSecret>,
		profile: NormalizedProfile,
	) -> VerifyFuture<U> {
		Box::pin(self(access_token, refresh_token, profile))
	}
}

/// Callback receiving `(access_token, refresh_token, params, profile)`, where `params` is the
/// full token endpoint response.
pub trait VerifyWithParams<U>: Send + Sync {
	/// Resolves the profile to a host user.
	fn verify(
		&self,
		access_token: TokenSecret,
		refresh_token: Option<TokenSecret>,
		params: TokenGrant,
		profile: NormalizedProfile,
	) -> VerifyFuture<U>;
}
impl<U, F, Fut> VerifyWithParams<U> for F
where
	F: Send + Sync + Fn(TokenSecret, Option<TokenSecret>, TokenGrant, NormalizedProfile) -> Fut,
	Fut: 'static + Send + Future<Output = VerifyResult<U>>,
{
	fn verify(
		&self,
		access_token: TokenSecret,
		refresh_token: Option<TokenSecret>,
		params: TokenGrant,
		profile: NormalizedProfile,
	) -> VerifyFuture<U> {
		Box::pin(self(access_token, refresh_token, params, profile))
	}
}

/// Verify callback registered with the strategy, tagged by the arguments it expects.
pub enum Verify<U> {
	/// Receives tokens and the profile.
	Profile(Arc<dyn VerifyProfile<U>>),
	/// Receives tokens, the token endpoint parameters, and the profile.
	WithParams(Arc<dyn VerifyWithParams<U>>),
}
impl<U> Verify<U>
where
	U: 'static,
{
	/// Wraps a `(access_token, refresh_token, profile)` callback.
	pub fn profile<F, Fut>(f: F) -> Self
	where
		F: 'static + Send + Sync + Fn(TokenSecret, Option<TokenSecret>, NormalizedProfile) -> Fut,
		Fut: 'static + Send + Future<Output = VerifyResult<U>>,
	{
		Self::Profile(Arc::new(f))
	}

	/// Wraps a `(access_token, refresh_token, params, profile)` callback.
	pub fn with_params<F, Fut>(f: F) -> Self
	where
		F: 'static
			+ Send
			+ Sync
			+ Fn(TokenSecret, Option<TokenSecret>, TokenGrant, NormalizedProfile) -> Fut,
		Fut: 'static + Send + Future<Output = VerifyResult<U>>,
	{
		Self::WithParams(Arc::new(f))
	}

	/// Dispatches to the wrapped callback.
	pub fn call(&self, grant: TokenGrant, profile: NormalizedProfile) -> VerifyFuture<U> {
		let access_token = grant.access_token.clone();
		let refresh_token = grant.refresh_token.clone();

		match self {
			Verify::Profile(f) => f.verify(access_token, refresh_token, profile),
			Verify::WithParams(f) => f.verify(access_token, refresh_token, grant, profile),
		}
	}
}
impl<U> Clone for Verify<U> {
	fn clone(&self) -> Self {
		match self {
			Verify::Profile(f) => Verify::Profile(Arc::clone(f)),
			Verify::WithParams(f) => Verify::WithParams(Arc::clone(f)),
		}
	}
}
impl<U> Debug for Verify<U> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Verify::Profile(_) => f.write_str("Verify::Profile(..)"),
			Verify::WithParams(_) => f.write_str("Verify::WithParams(..)"),
		}
	}
}
