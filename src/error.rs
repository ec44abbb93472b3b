//! Strategy-level error types shared across the handshake, exchange, and profile fetch.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error type carried by wrapped variants.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical strategy error exposed by public APIs.
///
/// Every failure surfaces through the caller's `Result`; nothing is swallowed, retried,
/// or treated as fatal to the process at this layer.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token endpoint rejected or mangled the code exchange.
	#[error(transparent)]
	Exchange(#[from] ExchangeError),
	/// Transport failure (DNS, TCP, TLS) during the code exchange.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Profile request failed before a usable body could be read.
	#[error("Failed to fetch the user profile.")]
	ProfileFetch {
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// Profile body was not valid JSON.
	#[error("Profile endpoint returned malformed JSON.")]
	ProfileParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Profile body was not valid UTF-8.
	#[error("Profile endpoint returned a non-UTF-8 body.")]
	ProfileEncoding {
		/// Underlying decoding failure.
		#[source]
		source: std::string::FromUtf8Error,
	},
	/// Returned `state` did not match the authorization session.
	#[error("Authorization state mismatch.")]
	StateMismatch,
	/// Application verification hook failed.
	#[error("Verification hook failed.")]
	Verify {
		/// Application-supplied failure.
		#[source]
		source: BoxError,
	},
}

/// Configuration and validation failures raised by the strategy.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Endpoint URL failed to parse.
	#[error("The {endpoint} endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},

	/// Client identifier is required for every handshake.
	#[error("Client identifier cannot be empty.")]
	EmptyClientId,
	/// Callback URL is required before the handshake can start.
	#[error("Callback URL is required.")]
	MissingCallbackUrl,
	/// Reject scope separators that are control characters.
	#[error("Scope separator must be a printable character.")]
	InvalidScopeSeparator {
		/// Invalid separator that was supplied.
		separator: char,
	},
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Token-exchange failures classified per RFC 6749 semantics.
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// Provider rejected the authorization grant (bad or reused code).
	#[error("Token endpoint rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Client authentication failed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Requested scopes were rejected by the provider.
	#[error("Requested scopes were rejected: {reason}.")]
	InvalidScope {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Provider returned an unexpected response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Provider answered with a non-success status.
	#[error("Provider returned HTTP {status}.")]
	Status {
		/// HTTP status code of the response.
		status: u16,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
