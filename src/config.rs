//! Strategy configuration: HumanAPI endpoint defaults, builder, and validation.
//!
//! Configuration is immutable once built. The builder fills in the hosted HumanAPI
//! endpoints and the scope-separator convention when the caller does not override them,
//! and rejects insecure or malformed values before a strategy can be constructed.

// self
use crate::{
	_prelude::*,
	auth::{ScopeList, Secret},
	error::ConfigError,
};

/// Default authorization endpoint for the HumanAPI connect flow.
pub const DEFAULT_AUTHORIZATION_URL: &str = "https://user.humanapi.co/oauth/authorize";
/// Default token endpoint used for the code exchange.
pub const DEFAULT_TOKEN_URL: &str = "https://user.humanapi.co/oauth/token";
/// Default profile resource fetched after the handshake completes.
pub const DEFAULT_PROFILE_URL: &str = "https://api.humanapi.co/v1/human/profile";
/// Default separator used when joining scopes into the authorize URL.
///
/// The space is percent-encoded by the URL serializer when the authorize URL is built.
pub const DEFAULT_SCOPE_SEPARATOR: char = ' ';

/// Immutable strategy configuration consumed by the handshake and profile fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
	/// OAuth 2.0 client identifier issued by the provider.
	pub client_id: String,
	/// OAuth 2.0 client secret; redacted from debug output.
	pub client_secret: Secret,
	/// Redirect URI the provider sends the user back to after granting authorization.
	pub callback_url: Url,
	/// Scopes requested during authorization.
	pub scope: ScopeList,
	/// Separator used when joining scopes into the authorize URL.
	pub scope_separator: char,
	/// Authorization endpoint; defaults to the hosted HumanAPI connect page.
	pub authorization_url: Url,
	/// Token endpoint; defaults to the hosted HumanAPI token service.
	pub token_url: Url,
	/// Profile resource fetched with the issued access token.
	pub profile_url: Url,
}
impl StrategyConfig {
	/// Creates a new builder seeded with the provided client credentials.
	pub fn builder(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> StrategyConfigBuilder {
		StrategyConfigBuilder::new(client_id, client_secret)
	}
}

/// Builder for [`StrategyConfig`] values.
#[derive(Debug)]
pub struct StrategyConfigBuilder {
	client_id: String,
	client_secret: Secret,
	callback_url: Option<Url>,
	scope: ScopeList,
	scope_separator: char,
	authorization_url: Option<Url>,
	token_url: Option<Url>,
	profile_url: Option<Url>,
}
impl StrategyConfigBuilder {
	fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: Secret::new(client_secret),
			callback_url: None,
			scope: ScopeList::default(),
			scope_separator: DEFAULT_SCOPE_SEPARATOR,
			authorization_url: None,
			token_url: None,
			profile_url: None,
		}
	}

	/// Sets the redirect URI registered with the provider.
	pub fn callback_url(mut self, url: Url) -> Self {
		self.callback_url = Some(url);

		self
	}

	/// Sets the requested scopes.
	pub fn scope(mut self, scope: ScopeList) -> Self {
		self.scope = scope;

		self
	}

	/// Overrides the scope separator used in the authorize URL.
	pub fn scope_separator(mut self, separator: char) -> Self {
		self.scope_separator = separator;

		self
	}

	/// Overrides the authorization endpoint.
	pub fn authorization_url(mut self, url: Url) -> Self {
		self.authorization_url = Some(url);

		self
	}

	/// Overrides the token endpoint.
	pub fn token_url(mut self, url: Url) -> Self {
		self.token_url = Some(url);

		self
	}

	/// Overrides the profile resource URL.
	pub fn profile_url(mut self, url: Url) -> Self {
		self.profile_url = Some(url);

		self
	}

	/// Consumes the builder, applies defaults, and validates the resulting configuration.
	pub fn build(self) -> Result<StrategyConfig, ConfigError> {
		if self.client_id.is_empty() {
			return Err(ConfigError::EmptyClientId);
		}

		let callback_url = self.callback_url.ok_or(ConfigError::MissingCallbackUrl)?;
		let authorization_url =
			resolve_endpoint("authorization", self.authorization_url, DEFAULT_AUTHORIZATION_URL)?;
		let token_url = resolve_endpoint("token", self.token_url, DEFAULT_TOKEN_URL)?;
		let profile_url = resolve_endpoint("profile", self.profile_url, DEFAULT_PROFILE_URL)?;
		let config = StrategyConfig {
			client_id: self.client_id,
			client_secret: self.client_secret,
			callback_url,
			scope: self.scope,
			scope_separator: self.scope_separator,
			authorization_url,
			token_url,
			profile_url,
		};

		config.validate()?;

		Ok(config)
	}
}

impl StrategyConfig {
	/// Validates invariants for the configuration.
	fn validate(&self) -> Result<(), ConfigError> {
		validate_endpoint("authorization", &self.authorization_url)?;
		validate_endpoint("token", &self.token_url)?;
		validate_endpoint("profile", &self.profile_url)?;
		validate_scope_separator(self.scope_separator)?;

		Ok(())
	}
}

fn resolve_endpoint(
	name: &'static str,
	configured: Option<Url>,
	default: &str,
) -> Result<Url, ConfigError> {
	match configured {
		Some(url) => Ok(url),
		None => Url::parse(default)
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: name, source }),
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	if url.scheme() != "https" {
		Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}

fn validate_scope_separator(separator: char) -> Result<(), ConfigError> {
	if separator.is_control() {
		Err(ConfigError::InvalidScopeSeparator { separator })
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse fixture URL.")
	}

	fn base_builder() -> StrategyConfigBuilder {
		StrategyConfig::builder("app-id", "app-secret")
			.callback_url(url("https://www.example.com/auth/humanapi/callback"))
	}

	#[test]
	fn builder_fills_documented_defaults() {
		let config = base_builder().build().expect("Defaults should produce a valid config.");

		assert_eq!(config.authorization_url.as_str(), DEFAULT_AUTHORIZATION_URL);
		assert_eq!(config.token_url.as_str(), DEFAULT_TOKEN_URL);
		assert_eq!(config.profile_url.as_str(), DEFAULT_PROFILE_URL);
		assert_eq!(config.scope_separator, DEFAULT_SCOPE_SEPARATOR);
		assert!(config.scope.is_empty());
	}

	#[test]
	fn builder_accepts_overrides() {
		let config = base_builder()
			.scope(ScopeList::new(["profile", "activity"]).expect("Scope fixture should be valid."))
			.scope_separator(',')
			.authorization_url(url("https://auth.example.com/authorize"))
			.token_url(url("https://auth.example.com/token"))
			.profile_url(url("https://api.example.com/profile"))
			.build()
			.expect("Overrides should produce a valid config.");

		assert_eq!(config.authorization_url.as_str(), "https://auth.example.com/authorize");
		assert_eq!(config.token_url.as_str(), "https://auth.example.com/token");
		assert_eq!(config.profile_url.as_str(), "https://api.example.com/profile");
		assert_eq!(config.scope_separator, ',');
		assert_eq!(config.scope.len(), 2);
	}

	#[test]
	fn builder_rejects_insecure_endpoints() {
		let err = base_builder()
			.token_url(url("http://auth.example.com/token"))
			.build()
			.expect_err("Insecure token endpoints must be rejected.");

		assert!(matches!(err, ConfigError::InsecureEndpoint { endpoint: "token", .. }));
	}

	#[test]
	fn builder_rejects_missing_required_fields() {
		let err = StrategyConfig::builder("", "secret")
			.callback_url(url("https://www.example.com/callback"))
			.build()
			.expect_err("Empty client identifiers must be rejected.");

		assert!(matches!(err, ConfigError::EmptyClientId));

		let err = StrategyConfig::builder("app-id", "secret")
			.build()
			.expect_err("Missing callback URLs must be rejected.");

		assert!(matches!(err, ConfigError::MissingCallbackUrl));
	}

	#[test]
	fn builder_rejects_control_separators() {
		let err = base_builder()
			.scope_separator('\u{0007}')
			.build()
			.expect_err("Control-character separators must be rejected.");

		assert!(matches!(err, ConfigError::InvalidScopeSeparator { .. }));
	}

	#[test]
	fn debug_output_redacts_the_client_secret() {
		let config = base_builder().build().expect("Defaults should produce a valid config.");

		assert!(!format!("{config:?}").contains("app-secret"));
	}
}
