//! Internal facade over the generic `oauth2` client.
//!
//! The facade owns a configured [`BasicClient`] for the lifetime of one exchange and maps
//! every `oauth2` failure into the crate taxonomy: server-side OAuth error codes are
//! classified per RFC 6749, transport failures keep their source chain, and malformed
//! token responses surface the structured parse error.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, PkceCodeVerifier, RedirectUrl, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessCredentials, Secret},
	config::StrategyConfig,
	error::{ConfigError, ExchangeError, TransportError},
	http::{ResponseMetadataSlot, TokenHttpClient},
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Facade that performs the authorization-code exchange for one callback.
pub(crate) struct ExchangeFacade<C>
where
	C: ?Sized + TokenHttpClient,
{
	oauth_client: ConfiguredBasicClient,
	http_client: Arc<C>,
}
impl<C> ExchangeFacade<C>
where
	C: ?Sized + TokenHttpClient,
{
	pub(crate) fn from_config(config: &StrategyConfig, http_client: Arc<C>) -> Result<Self> {
		let auth_url = AuthUrl::new(config.authorization_url.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "authorization", source })?;
		let token_url = TokenUrl::new(config.token_url.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "token", source })?;
		let redirect_url = RedirectUrl::new(config.callback_url.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "callback", source })?;
		// The provider reads client credentials from the POST body, not a Basic header.
		let oauth_client = BasicClient::new(ClientId::new(config.client_id.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret.expose().to_owned()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url)
			.set_redirect_uri(redirect_url)
			.set_auth_type(AuthType::RequestBody);

		Ok(Self { oauth_client, http_client })
	}

	pub(crate) async fn exchange_code(
		&self,
		code: String,
		pkce_verifier: String,
	) -> Result<AccessCredentials> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let response = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code))
			.set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(meta.take().and_then(|value| value.status), err))?;

		Ok(map_token_response(response))
	}
}

fn map_token_response(response: oauth2::basic::BasicTokenResponse) -> AccessCredentials {
	AccessCredentials {
		access_token: Secret::new(response.access_token().secret().clone()),
		refresh_token: response.refresh_token().map(|token| Secret::new(token.secret().clone())),
		expires_in: response.expires_in(),
		scopes: response
			.scopes()
			.map(|scopes| scopes.iter().map(|scope| scope.to_string()).collect()),
	}
}

fn map_request_error<E>(
	status: Option<u16>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, status),
		RequestTokenError::Request(error) => map_transport_error(status, error),
		RequestTokenError::Parse(error, _body) =>
			ExchangeError::Parse { source: error, status }.into(),
		RequestTokenError::Other(message) =>
			ExchangeError::TokenEndpoint { message, status }.into(),
	}
}

fn map_server_response_error(response: BasicErrorResponse, status: Option<u16>) -> Error {
	let code = response.error().as_ref().to_owned();
	let reason = if let Some(description) = response.error_description() {
		format!("{code}: {description}")
	} else {
		code.clone()
	};

	match code.as_str() {
		"invalid_grant" | "access_denied" => ExchangeError::InvalidGrant { reason }.into(),
		"invalid_client" | "unauthorized_client" => ExchangeError::InvalidClient { reason }.into(),
		"invalid_scope" => ExchangeError::InvalidScope { reason }.into(),
		_ => ExchangeError::TokenEndpoint { message: reason, status }.into(),
	}
}

fn map_transport_error<E>(status: Option<u16>, err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) =>
			ExchangeError::TokenEndpoint { message, status }.into(),
		_ => ExchangeError::TokenEndpoint {
			message: "HTTP client error occurred while calling the token endpoint.".into(),
			status,
		}
		.into(),
	}
}
