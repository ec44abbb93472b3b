// std
use std::str::FromStr;
// self
use humanapi_strategy::{
	auth::ScopeList,
	config::{
		DEFAULT_AUTHORIZATION_URL, DEFAULT_PROFILE_URL, DEFAULT_SCOPE_SEPARATOR, DEFAULT_TOKEN_URL,
		StrategyConfig,
	},
	error::ConfigError,
};
use url::Url;

fn url(value: &str) -> Url {
	Url::parse(value).expect("Failed to parse contract-test URL.")
}

#[test]
fn defaults_match_the_hosted_provider_endpoints() {
	let config = StrategyConfig::builder("app-id", "app-secret")
		.callback_url(url("https://www.example.com/auth/humanapi/callback"))
		.scope(
			ScopeList::from_str("profile bloodpressure activity")
				.expect("Scope string should parse successfully."),
		)
		.build()
		.expect("Configuration without endpoint overrides should build successfully.");

	assert_eq!(config.authorization_url.as_str(), DEFAULT_AUTHORIZATION_URL);
	assert_eq!(config.token_url.as_str(), DEFAULT_TOKEN_URL);
	assert_eq!(config.profile_url.as_str(), DEFAULT_PROFILE_URL);
	assert_eq!(config.scope_separator, DEFAULT_SCOPE_SEPARATOR);
	assert_eq!(config.scope.iter().collect::<Vec<_>>(), vec![
		"profile",
		"bloodpressure",
		"activity"
	]);
}

#[test]
fn overridden_endpoints_must_stay_https() {
	let err = StrategyConfig::builder("app-id", "app-secret")
		.callback_url(url("https://www.example.com/callback"))
		.profile_url(url("http://api.example.com/profile"))
		.build()
		.expect_err("Plain-HTTP profile endpoints must be rejected.");

	assert!(matches!(err, ConfigError::InsecureEndpoint { endpoint: "profile", .. }));
}

#[test]
fn config_survives_a_serde_round_trip() {
	let config = StrategyConfig::builder("app-id", "app-secret")
		.callback_url(url("https://www.example.com/callback"))
		.scope(ScopeList::new(["profile"]).expect("Scope fixture should be valid."))
		.scope_separator(',')
		.build()
		.expect("Configuration should build successfully.");
	let payload = serde_json::to_string(&config).expect("Configuration should serialize.");
	let restored: StrategyConfig =
		serde_json::from_str(&payload).expect("Configuration should deserialize.");

	assert_eq!(restored, config);
	assert_eq!(restored.client_secret.expose(), "app-secret");
}

#[test]
fn scope_list_display_uses_spaces() {
	let scopes =
		ScopeList::new(["profile", "activity"]).expect("Scope fixture should be valid.");

	assert_eq!(scopes.to_string(), "profile activity");
	assert_eq!(ScopeList::default().to_string(), "");
}
