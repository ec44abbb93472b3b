//! Normalized profile records produced from the provider's profile resource.

// self
use crate::_prelude::*;

/// Provider identifier stamped on every normalized profile.
pub const PROVIDER: &str = "humanapi";

/// Provider-agnostic user identity record produced by the profile fetch.
///
/// A fresh record is created on every fetch and owned by the caller once returned.
/// There is no shape validation beyond direct field access: fields missing from the
/// provider response become `None` instead of an error, and the record keeps both the
/// exact raw body and the parsed JSON so verification hooks can reach past the
/// normalized fields.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HumanProfile {
	/// Always the `"humanapi"` literal.
	pub provider: &'static str,
	/// Remote user identifier, sourced from the `userId` field.
	pub id: Option<String>,
	/// Email address associated with the account.
	pub email: Option<String>,
	/// Default time zone configured for the account.
	pub default_time_zone: Option<String>,
	/// Exact unparsed response body.
	pub raw: String,
	/// Parsed JSON response.
	pub json: serde_json::Value,
}
impl HumanProfile {
	/// Parses a raw response body into a normalized profile.
	pub(crate) fn from_body(body: String) -> Result<Self> {
		let deserializer = &mut serde_json::Deserializer::from_str(&body);
		let json: serde_json::Value = serde_path_to_error::deserialize(deserializer)
			.map_err(|source| Error::ProfileParse { source })?;

		Ok(Self {
			provider: PROVIDER,
			id: string_field(&json, "userId"),
			email: string_field(&json, "email"),
			default_time_zone: string_field(&json, "defaultTimeZone"),
			raw: body,
			json,
		})
	}
}

fn string_field(json: &serde_json::Value, field: &str) -> Option<String> {
	json.get(field).and_then(serde_json::Value::as_str).map(str::to_owned)
}
