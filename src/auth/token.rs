//! Redacted secrets and the credentials handed to verification hooks.

// std
use std::time::Duration;
// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping client secrets and token material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret(String);
impl Secret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Secret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Secret").field(&"<redacted>").finish()
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Credentials produced by the authorization-code exchange.
///
/// The strategy passes these through to the verification hook without inspecting or
/// persisting them; expiry and scope hints are forwarded verbatim from the token response.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessCredentials {
	/// Access token issued by the provider.
	pub access_token: Secret,
	/// Refresh token, if the provider issued one.
	pub refresh_token: Option<Secret>,
	/// Relative expiry hint forwarded from the token response.
	pub expires_in: Option<Duration>,
	/// Scopes granted by the provider, when echoed back.
	pub scopes: Option<Vec<String>>,
}
impl Debug for AccessCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessCredentials")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expires_in", &self.expires_in)
			.field("scopes", &self.scopes)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = Secret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "Secret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), "super-secret");
	}

	#[test]
	fn credentials_debug_redacts_tokens() {
		let credentials = AccessCredentials {
			access_token: Secret::new("sensitive-access"),
			refresh_token: Some(Secret::new("sensitive-refresh")),
			expires_in: Some(Duration::from_secs(3_600)),
			scopes: None,
		};
		let rendered = format!("{credentials:?}");

		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains("sensitive"), "Token material must never surface in debug output.");
	}
}
