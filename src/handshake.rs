//! Authorization-code handshake helpers: state nonces, PKCE material, and the session
//! that redirect handlers stash between the authorize redirect and the callback.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, auth::ScopeList, config::StrategyConfig};

const STATE_LEN: usize = 32;
const PKCE_VERIFIER_LEN: usize = 64;

/// Supported PKCE challenge methods surfaced via [`AuthorizationSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PkceCodeChallengeMethod {
	/// SHA-256 based PKCE (RFC 7636 S256).
	S256,
}
impl PkceCodeChallengeMethod {
	/// Returns the RFC 7636 identifier for the challenge method.
	pub fn as_str(self) -> &'static str {
		match self {
			PkceCodeChallengeMethod::S256 => "S256",
		}
	}
}

/// Handshake metadata returned by `start_authorization`.
///
/// Callers keep the session across the redirect (keyed by `state`) and hand it back via
/// [`CallbackRequest`] so the code exchange can attach the PKCE verifier.
#[derive(Clone)]
pub struct AuthorizationSession {
	/// Requested scope list, joined with the configured separator in the URL.
	pub scope: ScopeList,
	/// Opaque state value that must round-trip via the redirect handler.
	pub state: String,
	/// Fully-formed authorize URL that callers should send end-users to.
	pub authorize_url: Url,
	pkce: PkcePair,
}
impl AuthorizationSession {
	pub(crate) fn new(scope: ScopeList, state: String, authorize_url: Url, pkce: PkcePair) -> Self {
		Self { scope, state, authorize_url, pkce }
	}

	/// PKCE code challenge derived from the secret verifier.
	pub fn code_challenge(&self) -> &str {
		&self.pkce.challenge
	}

	/// PKCE challenge method (currently always `S256`).
	pub fn code_challenge_method(&self) -> PkceCodeChallengeMethod {
		self.pkce.method
	}

	/// Validates the returned `state` parameter after the authorization redirect.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state {
			Ok(())
		} else {
			Err(Error::StateMismatch)
		}
	}

	pub(crate) fn into_verifier(self) -> String {
		self.pkce.verifier
	}
}
impl Debug for AuthorizationSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationSession")
			.field("scope", &self.scope)
			.field("state", &self.state)
			.field("authorize_url", &self.authorize_url)
			.field("code_challenge", &self.pkce.challenge)
			.field("code_challenge_method", &self.pkce.method)
			.finish()
	}
}

/// Callback parameters collected by the redirect handler.
#[derive(Clone, Debug)]
pub struct CallbackRequest {
	/// Session issued by `start_authorization` and stashed across the redirect.
	pub session: AuthorizationSession,
	/// Authorization code returned by the provider.
	pub code: String,
	/// State echoed back by the provider.
	pub state: String,
}

#[derive(Clone)]
pub(crate) struct PkcePair {
	pub(crate) verifier: String,
	challenge: String,
	method: PkceCodeChallengeMethod,
}
impl PkcePair {
	pub(crate) fn generate() -> Self {
		let verifier = random_string(PKCE_VERIFIER_LEN);
		let challenge = compute_pkce_challenge(&verifier);

		Self { verifier, challenge, method: PkceCodeChallengeMethod::S256 }
	}
}

pub(crate) fn build_session(config: &StrategyConfig) -> AuthorizationSession {
	let state = random_string(STATE_LEN);
	let pkce = PkcePair::generate();
	let authorize_url = build_authorize_url(config, &state, &pkce);

	AuthorizationSession::new(config.scope.clone(), state, authorize_url, pkce)
}

fn build_authorize_url(config: &StrategyConfig, state: &str, pkce: &PkcePair) -> Url {
	let mut url = config.authorization_url.clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("response_type", "code");
	pairs.append_pair("client_id", &config.client_id);
	pairs.append_pair("redirect_uri", config.callback_url.as_str());

	if let Some(scope_value) = config.scope.join(config.scope_separator) {
		pairs.append_pair("scope", &scope_value);
	}

	pairs.append_pair("state", state);
	pairs.append_pair("code_challenge", &pkce.challenge);
	pairs.append_pair("code_challenge_method", pkce.method.as_str());

	drop(pairs);

	url
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

fn compute_pkce_challenge(verifier: &str) -> String {
	let mut hasher = Sha256::new();

	hasher.update(verifier.as_bytes());

	URL_SAFE_NO_PAD.encode(hasher.finalize())
}
