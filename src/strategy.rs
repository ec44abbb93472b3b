//! The HumanAPI strategy itself plus the capability contract host middleware consumes.
//!
//! [`HumanApiStrategy`] composes a generic OAuth client facade, a profile transport, and
//! an application [`VerifyUser`] hook. It holds nothing but immutable configuration and
//! shared transports, so concurrent authentication attempts never share per-request
//! state. The dyn-compatible [`AuthenticationStrategy`] trait is what routing layers
//! should depend on.

// std
use std::marker::PhantomData;
// self
use crate::{
	_prelude::*,
	auth::AccessCredentials,
	config::StrategyConfig,
	error::{BoxError, TransportError},
	handshake::{self, AuthorizationSession, CallbackRequest},
	http::{ProfileHttpClient, TokenHttpClient},
	oauth::ExchangeFacade,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	profile::HumanProfile,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Fixed strategy name used by host middleware for routing.
pub const STRATEGY_NAME: &str = "humanapi";

/// Future alias returned by [`AuthenticationStrategy`] methods.
pub type StrategyFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;
/// Future alias returned by [`VerifyUser::verify`].
pub type VerifyFuture<'a, U> =
	Pin<Box<dyn Future<Output = Result<Verdict<U>, BoxError>> + 'a + Send>>;

#[cfg(feature = "reqwest")]
/// Strategy specialized for the crate's default reqwest transport.
pub type ReqwestStrategy<V> = HumanApiStrategy<V, ReqwestHttpClient>;

/// Application decision produced by a [`VerifyUser`] hook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict<U> {
	/// Credentials map to a known (or newly provisioned) user.
	Authenticated(U),
	/// Credentials are valid but the application refuses the login.
	Rejected {
		/// Optional human-readable reason.
		reason: Option<String>,
	},
}

/// Application hook that turns `(credentials, profile)` into a user verdict.
///
/// The hook runs exactly once per authentication attempt, after the code exchange and
/// the profile fetch both succeed. Returning an error aborts the attempt and surfaces
/// as [`Error::Verify`]; returning [`Verdict::Rejected`] refuses the login without an
/// error.
pub trait VerifyUser
where
	Self: Send + Sync,
{
	/// User type produced on success.
	type User: Send;

	/// Maps the exchanged credentials and normalized profile to a verdict.
	fn verify(
		&self,
		credentials: AccessCredentials,
		profile: HumanProfile,
	) -> VerifyFuture<'_, Self::User>;
}

/// Adapter that lets plain async closures act as [`VerifyUser`] hooks.
pub struct VerifyFn<F, U> {
	func: F,
	_marker: PhantomData<fn() -> U>,
}

/// Wraps an async closure into a [`VerifyUser`] implementation.
pub fn verify_fn<F, Fut, U>(func: F) -> VerifyFn<F, U>
where
	F: Fn(AccessCredentials, HumanProfile) -> Fut + Send + Sync,
	Fut: 'static + Send + Future<Output = Result<Verdict<U>, BoxError>>,
	U: Send,
{
	VerifyFn { func, _marker: PhantomData }
}
impl<F, Fut, U> VerifyUser for VerifyFn<F, U>
where
	F: Fn(AccessCredentials, HumanProfile) -> Fut + Send + Sync,
	Fut: 'static + Send + Future<Output = Result<Verdict<U>, BoxError>>,
	U: Send,
{
	type User = U;

	fn verify(&self, credentials: AccessCredentials, profile: HumanProfile) -> VerifyFuture<'_, U> {
		Box::pin((self.func)(credentials, profile))
	}
}

/// Pluggable authentication provider contract recognized by host middleware.
///
/// Methods return boxed futures so the trait stays dyn-compatible; middleware can route
/// over `dyn AuthenticationStrategy<User = AppUser>` values without naming transports.
pub trait AuthenticationStrategy
where
	Self: Send + Sync,
{
	/// User type produced by successful authentication.
	type User: Send;

	/// Fixed name used by the middleware for routing.
	fn name(&self) -> &'static str;

	/// Starts a new authorization-code handshake session.
	fn start_authorization(&self) -> AuthorizationSession;

	/// Fetches and normalizes the remote profile for an issued access token.
	fn fetch_profile<'a>(&'a self, access_token: &'a str) -> StrategyFuture<'a, HumanProfile>;

	/// Completes the handshake for a redirect callback and produces a verdict.
	fn authenticate(&self, callback: CallbackRequest) -> StrategyFuture<'_, Verdict<Self::User>>;
}

/// HumanAPI Personal Health Data authentication strategy.
///
/// Applications supply a [`VerifyUser`] hook which receives the exchanged credentials
/// and the normalized profile, then resolves to the user that should be logged in (or a
/// rejection). Configuration defaults point at the hosted HumanAPI endpoints; see
/// [`StrategyConfig`] for the overridable surface.
pub struct HumanApiStrategy<V, C>
where
	V: VerifyUser,
	C: ProfileHttpClient + TokenHttpClient,
{
	config: StrategyConfig,
	verify: V,
	http_client: Arc<C>,
}
#[cfg(feature = "reqwest")]
impl<V> HumanApiStrategy<V, ReqwestHttpClient>
where
	V: VerifyUser,
{
	/// Creates a strategy backed by the crate's default reqwest transport.
	pub fn new(config: StrategyConfig, verify: V) -> Self {
		Self::with_http_client(config, verify, ReqwestHttpClient::default())
	}
}
impl<V, C> HumanApiStrategy<V, C>
where
	V: VerifyUser,
	C: ProfileHttpClient + TokenHttpClient,
{
	/// Creates a strategy that reuses the caller-provided transport.
	pub fn with_http_client(
		config: StrategyConfig,
		verify: V,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self { config, verify, http_client: http_client.into() }
	}

	/// Read access to the immutable configuration.
	pub fn config(&self) -> &StrategyConfig {
		&self.config
	}

	/// Starts a new authorization-code handshake session.
	pub fn start_authorization(&self) -> AuthorizationSession {
		let _guard = FlowSpan::new(FlowKind::Authorize, "start_authorization").entered();

		handshake::build_session(&self.config)
	}

	/// Exchanges an authorization code for access credentials.
	///
	/// The session supplies the PKCE verifier minted by
	/// [`start_authorization`](Self::start_authorization).
	pub async fn exchange_code(
		&self,
		session: AuthorizationSession,
		code: impl Into<String>,
	) -> Result<AccessCredentials> {
		const KIND: FlowKind = FlowKind::Exchange;

		let span = FlowSpan::new(KIND, "exchange_code");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let code = code.into();
		let result = span
			.instrument(async move {
				let facade =
					ExchangeFacade::from_config(&self.config, Arc::clone(&self.http_client))?;

				facade.exchange_code(code, session.into_verifier()).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Fetches the profile resource and normalizes it.
	///
	/// Transport failures and non-success statuses are wrapped as [`Error::ProfileFetch`];
	/// undecodable bodies surface as parse errors. Nothing is retried at this layer.
	pub async fn fetch_profile(&self, access_token: &str) -> Result<HumanProfile> {
		const KIND: FlowKind = FlowKind::ProfileFetch;

		let span = FlowSpan::new(KIND, "fetch_profile");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let response = ProfileHttpClient::get(
					self.http_client.as_ref(),
					&self.config.profile_url,
					access_token,
				)
				.await
				.map_err(|err| Error::ProfileFetch { source: TransportError::network(err) })?;

				if !response.is_success() {
					return Err(Error::ProfileFetch {
						source: TransportError::Status { status: response.status },
					});
				}

				let body = String::from_utf8(response.body)
					.map_err(|source| Error::ProfileEncoding { source })?;

				HumanProfile::from_body(body)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Validates the callback, exchanges the code, fetches the profile, and verifies.
	pub async fn authenticate(&self, callback: CallbackRequest) -> Result<Verdict<V::User>> {
		const KIND: FlowKind = FlowKind::Authenticate;

		let span = FlowSpan::new(KIND, "authenticate");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let CallbackRequest { session, code, state } = callback;

				session.validate_state(&state)?;

				let credentials = self.exchange_code(session, code).await?;
				let profile = self.fetch_profile(credentials.access_token.expose()).await?;

				self.verify
					.verify(credentials, profile)
					.await
					.map_err(|source| Error::Verify { source })
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
impl<V, C> AuthenticationStrategy for HumanApiStrategy<V, C>
where
	V: VerifyUser,
	C: ProfileHttpClient + TokenHttpClient,
{
	type User = V::User;

	fn name(&self) -> &'static str {
		STRATEGY_NAME
	}

	fn start_authorization(&self) -> AuthorizationSession {
		HumanApiStrategy::start_authorization(self)
	}

	fn fetch_profile<'a>(&'a self, access_token: &'a str) -> StrategyFuture<'a, HumanProfile> {
		Box::pin(HumanApiStrategy::fetch_profile(self, access_token))
	}

	fn authenticate(&self, callback: CallbackRequest) -> StrategyFuture<'_, Verdict<Self::User>> {
		Box::pin(HumanApiStrategy::authenticate(self, callback))
	}
}
impl<V, C> Debug for HumanApiStrategy<V, C>
where
	V: VerifyUser,
	C: ProfileHttpClient + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HumanApiStrategy")
			.field("name", &STRATEGY_NAME)
			.field("config", &self.config)
			.finish()
	}
}
