#![cfg(feature = "reqwest")]

// std
use std::net::TcpListener;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use humanapi_strategy::{
	_preludet::*,
	auth::{AccessCredentials, ScopeList},
	config::StrategyConfig,
	error::{BoxError, TransportError},
	profile::{HumanProfile, PROVIDER},
	strategy::{Verdict, VerifyUser, verify_fn},
};

const ACCESS_TOKEN: &str = "token-it";

fn noop_verify() -> impl VerifyUser<User = ()> {
	verify_fn(|_credentials: AccessCredentials, _profile: HumanProfile| async move {
		Ok::<_, BoxError>(Verdict::Authenticated(()))
	})
}

fn build_config(profile_url: &str) -> StrategyConfig {
	StrategyConfig::builder("client-it", "secret-it")
		.callback_url(
			Url::parse("https://app.example.com/callback")
				.expect("Redirect URI should parse successfully."),
		)
		.scope(ScopeList::new(["profile"]).expect("Scope set should be valid for profile tests."))
		.profile_url(Url::parse(profile_url).expect("Profile endpoint should parse successfully."))
		.build()
		.expect("Strategy configuration should build successfully.")
}

#[tokio::test]
async fn fetch_profile_normalizes_known_fields() {
	let server = MockServer::start_async().await;
	let body = "{\"userId\":\"u1\",\"email\":\"a@b.com\",\"defaultTimeZone\":\"UTC\"}";
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/human/profile")
				.header("authorization", format!("Bearer {ACCESS_TOKEN}"));
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await;
	let strategy =
		build_test_strategy(build_config(&server.url("/v1/human/profile")), noop_verify());
	let profile = strategy
		.fetch_profile(ACCESS_TOKEN)
		.await
		.expect("Profile fetch should succeed against the mock endpoint.");

	mock.assert_async().await;

	assert_eq!(profile.provider, PROVIDER);
	assert_eq!(profile.id.as_deref(), Some("u1"));
	assert_eq!(profile.email.as_deref(), Some("a@b.com"));
	assert_eq!(profile.default_time_zone.as_deref(), Some("UTC"));
	assert_eq!(profile.raw, body, "Raw body must be preserved byte-for-byte.");
	assert_eq!(
		profile.json,
		json!({ "userId": "u1", "email": "a@b.com", "defaultTimeZone": "UTC" })
	);
}

#[tokio::test]
async fn fetch_profile_surfaces_parse_errors() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/human/profile");
			then.status(200).header("content-type", "application/json").body("{not json");
		})
		.await;
	let strategy =
		build_test_strategy(build_config(&server.url("/v1/human/profile")), noop_verify());
	let err = strategy
		.fetch_profile(ACCESS_TOKEN)
		.await
		.expect_err("Malformed bodies must fail the fetch.");

	mock.assert_async().await;

	assert!(matches!(err, Error::ProfileParse { .. }));
}

#[tokio::test]
async fn fetch_profile_wraps_non_success_statuses() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/human/profile");
			then.status(503).body("upstream unavailable");
		})
		.await;
	let strategy =
		build_test_strategy(build_config(&server.url("/v1/human/profile")), noop_verify());
	let err = strategy
		.fetch_profile(ACCESS_TOKEN)
		.await
		.expect_err("Non-success statuses must fail the fetch.");

	mock.assert_async().await;

	assert!(matches!(
		err,
		Error::ProfileFetch { source: TransportError::Status { status: 503 } }
	));
}

#[tokio::test]
async fn fetch_profile_wraps_connection_refused() {
	// Bind then drop a listener so the port is free but nothing accepts on it.
	let port = {
		let listener =
			TcpListener::bind("127.0.0.1:0").expect("Ephemeral port should be available.");

		listener.local_addr().expect("Listener address should resolve.").port()
	};
	let strategy = build_test_strategy(
		build_config(&format!("https://127.0.0.1:{port}/v1/human/profile")),
		noop_verify(),
	);
	let err = strategy
		.fetch_profile(ACCESS_TOKEN)
		.await
		.expect_err("Refused connections must fail the fetch.");
	let Error::ProfileFetch { source } = &err else {
		panic!("Transport failures must surface as profile fetch errors, got {err:?}.");
	};

	assert!(matches!(source, TransportError::Network { .. }));
	assert!(
		StdError::source(source).is_some(),
		"The wrapped error must keep the underlying transport cause."
	);
}

#[tokio::test]
async fn concurrent_fetches_stay_independent() {
	let server = MockServer::start_async().await;
	let mock_a = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/human/profile").header("authorization", "Bearer token-a");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"userId\":\"user-a\"}");
		})
		.await;
	let mock_b = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/human/profile").header("authorization", "Bearer token-b");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"userId\":\"user-b\"}");
		})
		.await;
	let strategy =
		build_test_strategy(build_config(&server.url("/v1/human/profile")), noop_verify());
	let (profile_a, profile_b) =
		tokio::join!(strategy.fetch_profile("token-a"), strategy.fetch_profile("token-b"));
	let profile_a = profile_a.expect("First concurrent fetch should succeed.");
	let profile_b = profile_b.expect("Second concurrent fetch should succeed.");

	mock_a.assert_async().await;
	mock_b.assert_async().await;

	assert_eq!(profile_a.id.as_deref(), Some("user-a"));
	assert_eq!(profile_b.id.as_deref(), Some("user-b"));
}
