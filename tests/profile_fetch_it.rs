#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use oauth2_imgur::{
	_preludet::*,
	auth::TokenSecret,
	config::ProviderConfig,
	error::{DecodeError, ProfileFetchError, TransportError},
	profile::{AccountId, Lenient, ProExpiration, ProfileEndpoint},
	strategy::{ImgurStrategy, Verify, VerifyOutcome},
};

const ACCESS_TOKEN: &str = "access-it";

fn build_config(server: &MockServer) -> ProviderConfig {
	ProviderConfig::builder()
		.client_id("client-it")
		.client_secret("secret-it")
		.callback_url("https://app.example.com/auth/imgur/callback")
		.api_base(server.url("/3"))
		.build()
		.expect("Provider configuration should build for profile tests.")
}

fn build_strategy(server: &MockServer) -> ImgurStrategy<String> {
	let verify = Verify::profile(|_access, _refresh, _profile| async move {
		Ok::<_, BoxError>(VerifyOutcome::Authenticated("unused".to_owned()))
	});

	build_reqwest_test_strategy(build_config(server), verify)
}

#[tokio::test]
async fn fetch_merges_account_and_settings_with_header_token() {
	let server = MockServer::start_async().await;
	let account = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/3/account/me/")
				.header("authorization", "Bearer access-it")
				.header("accept", "application/json");
			then.status(200).header("content-type", "application/json").body(
				"{\"data\":{\"id\":384077,\"url\":\"jdoe\",\"bio\":\"hi\",\"reputation\":10,\"pro_expiration\":false,\"created\":1000,\"avatar\":null},\"success\":true,\"status\":200}",
			);
		})
		.await;
	let settings = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/3/account/me/settings")
				.header("authorization", "Bearer access-it");
			then.status(200).header("content-type", "application/json").body(
				"{\"data\":{\"email\":\"a@b.com\",\"pro_expiration\":true,\"active_emails\":[\"a@b.com\"],\"blocked_users\":[{\"blocked_id\":1,\"blocked_url\":\"troll\"}],\"show_mature\":false},\"success\":true,\"status\":200}",
			);
		})
		.await;
	let profile = build_strategy(&server)
		.user_profile(&TokenSecret::new(ACCESS_TOKEN))
		.await
		.expect("Profile fetch should succeed against the mock API.");

	account.assert_async().await;
	settings.assert_async().await;

	assert_eq!(profile.provider(), "imgur");
	assert_eq!(profile.id, Some(AccountId::Numeric(384_077)));
	assert_eq!(profile.username(), Some("jdoe"));
	assert_eq!(profile.created, Some(Lenient::Known(1000)));
	assert_eq!(profile.email_address(), Some("a@b.com"));
	assert_eq!(profile.pro_expiration, Some(ProExpiration::Flag(true)));
	assert_eq!(profile.active_emails, Some(Lenient::Known(vec!["a@b.com".to_owned()])));
	assert_eq!(
		profile.blocked_users.as_ref().and_then(Lenient::known).map(Vec::len),
		Some(1)
	);
	assert_eq!(profile.show_mature, Some(Lenient::Known(false)));
}

#[tokio::test]
async fn non_success_account_status_is_a_transport_failure() {
	let server = MockServer::start_async().await;
	let account = server
		.mock_async(|when, then| {
			when.method(GET).path("/3/account/me/");
			then.status(403)
				.header("content-type", "application/json")
				.body("{\"data\":{\"error\":\"Permission denied\"},\"success\":false,\"status\":403}");
		})
		.await;
	let err = build_strategy(&server)
		.user_profile(&TokenSecret::new(ACCESS_TOKEN))
		.await
		.expect_err("A 403 from the account endpoint should fail the fetch.");

	account.assert_async().await;

	assert_eq!(err.to_string(), "failed to fetch user profile");
	assert_eq!(err.endpoint(), ProfileEndpoint::Account);

	match err {
		ProfileFetchError::Transport { source: TransportError::Status { status, body }, .. } => {
			assert_eq!(status, 403);
			assert!(body.contains("Permission denied"));
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn invalid_account_json_fails_fast() {
	let server = MockServer::start_async().await;
	let account = server
		.mock_async(|when, then| {
			when.method(GET).path("/3/account/me/");
			then.status(200).body("not json");
		})
		.await;
	let err = build_strategy(&server)
		.user_profile(&TokenSecret::new(ACCESS_TOKEN))
		.await
		.expect_err("A non-JSON account body should fail the fetch.");

	account.assert_async().await;

	assert!(matches!(
		err,
		ProfileFetchError::Decode {
			endpoint: ProfileEndpoint::Account,
			source: DecodeError::Syntax(_),
		}
	));
}

#[tokio::test]
async fn settings_failure_is_not_swallowed() {
	let server = MockServer::start_async().await;
	let account = server
		.mock_async(|when, then| {
			when.method(GET).path("/3/account/me/");
			then.status(200).body("{\"data\":{\"id\":\"123\",\"url\":\"jdoe\"}}");
		})
		.await;
	let settings = server
		.mock_async(|when, then| {
			when.method(GET).path("/3/account/me/settings");
			then.status(500).body("Internal Server Error");
		})
		.await;
	let err = build_strategy(&server)
		.user_profile(&TokenSecret::new(ACCESS_TOKEN))
		.await
		.expect_err("A settings failure should fail the fetch.");

	account.assert_async().await;
	settings.assert_async().await;

	assert_eq!(err.endpoint(), ProfileEndpoint::Settings);
	assert!(matches!(
		err,
		ProfileFetchError::Transport { source: TransportError::Status { status: 500, .. }, .. }
	));
}

#[tokio::test]
async fn unreachable_api_is_a_network_failure() {
	let config = ProviderConfig::builder()
		.client_id("client-it")
		.client_secret("secret-it")
		.callback_url("https://app.example.com/auth/imgur/callback")
		.api_base("http://127.0.0.1:1/3")
		.build()
		.expect("Provider configuration should build for network test.");
	let verify = Verify::profile(|_access, _refresh, _profile| async move {
		Ok::<_, BoxError>(VerifyOutcome::<()>::rejected())
	});
	let err = build_reqwest_test_strategy(config, verify)
		.user_profile(&TokenSecret::new(ACCESS_TOKEN))
		.await
		.expect_err("Connection failures should fail the fetch.");

	assert_eq!(err.to_string(), "failed to fetch user profile");
	assert!(matches!(
		err,
		ProfileFetchError::Transport {
			endpoint: ProfileEndpoint::Account,
			source: TransportError::Network { .. },
		}
	));
}
