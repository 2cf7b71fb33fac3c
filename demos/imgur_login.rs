//! Demonstrates a full Imgur login against a local mock of the Imgur API: build the
//! authorization redirect, exchange the callback code, and resolve the profile to an app user.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use oauth2_imgur::{
	config::ProviderConfig,
	error::BoxError,
	profile::NormalizedProfile,
	strategy::{ImgurStrategy, Verify, VerifyOutcome},
};

#[derive(Debug)]
struct AppUser {
	username: String,
	email: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"refresh_token\":\"demo-refresh\",\"token_type\":\"bearer\",\"expires_in\":2419200}",
			);
		})
		.await;
	let account_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/3/account/me/").header("authorization", "Bearer demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"data\":{\"id\":384077,\"url\":\"demo-user\",\"reputation\":42,\"created\":1357344000}}");
		})
		.await;
	let settings_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/3/account/me/settings")
				.header("authorization", "Bearer demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"data\":{\"email\":\"demo@example.com\",\"pro_expiration\":false}}");
		})
		.await;
	let config = ProviderConfig::builder()
		.client_id("demo-client")
		.client_secret("demo-secret")
		.callback_url("https://app.example.com/auth/imgur/callback")
		.authorization_url(server.url("/oauth2/authorize"))
		.token_url(server.url("/oauth2/token"))
		.api_base(server.url("/3"))
		.build()?;
	let verify = Verify::profile(|_access, _refresh, profile: NormalizedProfile| async move {
		let Some(username) = profile.username().map(str::to_owned) else {
			return Ok::<_, BoxError>(VerifyOutcome::rejected_with("Imgur account has no username."));
		};

		Ok(VerifyOutcome::Authenticated(AppUser { username, email: profile.email_address().map(str::to_owned) }))
	});
	let strategy = ImgurStrategy::new(config, verify)?;

	println!("Redirect the user to: {}.", strategy.authorization_url("demo-state")?);

	match strategy.authenticate("demo-code").await? {
		VerifyOutcome::Authenticated(user) =>
			println!("Signed in as {} ({:?}).", user.username, user.email),
		VerifyOutcome::Rejected { message } => println!("Login rejected: {message:?}."),
	}

	token_mock.assert_async().await;
	account_mock.assert_async().await;
	settings_mock.assert_async().await;

	Ok(())
}
