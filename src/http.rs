//! Transport seams for the code exchange and the profile fetch.
//!
//! [`TokenHttpClient`] feeds the `oauth2` facade and publishes response metadata through
//! [`ResponseMetadataSlot`] so exchange failures keep their HTTP status when they are
//! mapped into the crate taxonomy. [`ProfileHttpClient`] performs the single
//! authenticated GET against the profile resource. The bundled [`ReqwestHttpClient`]
//! implements both so one transport serves the whole strategy.

// std
use std::ops::Deref;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
// self
use crate::_prelude::*;

/// Future returned by [`ProfileHttpClient::get`].
pub type ProfileFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<ProfileResponse, E>> + 'a + Send>>;

/// Raw response captured from the profile resource.
#[derive(Clone, Debug)]
pub struct ProfileResponse {
	/// HTTP status code of the response.
	pub status: u16,
	/// Unparsed response body.
	pub body: Vec<u8>,
}
impl ProfileResponse {
	/// Returns true when the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP transports able to fetch the protected profile resource.
///
/// The access token travels as a bearer `Authorization` header. Implementations must
/// return the body unmodified so callers can keep the exact raw payload alongside the
/// parsed value, and must be `Send + Sync + 'static` so one transport can be shared
/// across concurrent authentication attempts.
pub trait ProfileHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Performs an authenticated GET against `resource`.
	fn get<'a>(
		&'a self,
		resource: &'a Url,
		access_token: &'a str,
	) -> ProfileFuture<'a, Self::TransportError>;
}

/// Abstraction over HTTP transports capable of executing the OAuth code exchange while
/// publishing response metadata for error mapping.
///
/// The trait is the strategy's only dependency on an HTTP stack for the token leg.
/// Callers provide an implementation and the exchange facade requests short-lived
/// [`AsyncHttpClient`] handles that each carry a clone of a [`ResponseMetadataSlot`].
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle tied to a [`ResponseMetadataSlot`].
	///
	/// The request future returned by [`AsyncHttpClient::call`] must be `Send` so the
	/// strategy's boxed futures inherit the same guarantee.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds an [`AsyncHttpClient`] handle that records outcomes in `slot`.
	///
	/// Implementations call [`ResponseMetadataSlot::take`] before submitting the HTTP
	/// request so stale information never leaks into a new invocation, and
	/// [`ResponseMetadataSlot::store`] once a status is known.
	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle;
}

/// Captures metadata from the most recent HTTP response for downstream error mapping.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the token endpoint, if available.
	pub status: Option<u16>,
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between transport and error layers.
///
/// The facade creates a fresh slot for each token request and reads the captured
/// metadata immediately after the `oauth2` call resolves.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Token requests should not follow redirects, matching OAuth 2.0 guidance that token
/// endpoints return results directly instead of delegating to another URI. Configure
/// any custom [`ReqwestClient`] accordingly, because the strategy passes this client
/// into the `oauth2` crate when it builds the exchange facade.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	fn instrumented(&self, slot: ResponseMetadataSlot) -> InstrumentedHandle {
		InstrumentedHandle::new(self.0.clone(), slot)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ProfileHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn get<'a>(
		&'a self,
		resource: &'a Url,
		access_token: &'a str,
	) -> ProfileFuture<'a, Self::TransportError> {
		Box::pin(async move {
			let response =
				self.0.get(resource.clone()).bearer_auth(access_token).send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(ProfileResponse { status, body })
		})
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	type Handle = InstrumentedHandle;
	type TransportError = ReqwestError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		self.instrumented(slot)
	}
}

#[cfg(feature = "reqwest")]
struct InstrumentedHttpClient {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}
#[cfg(feature = "reqwest")]
impl InstrumentedHttpClient {
	fn new(client: ReqwestClient, slot: ResponseMetadataSlot) -> Self {
		Self { client, slot }
	}
}

#[cfg(feature = "reqwest")]
/// Public handle returned by [`ReqwestHttpClient`] that satisfies [`TokenHttpClient`].
#[derive(Clone)]
pub struct InstrumentedHandle(Arc<InstrumentedHttpClient>);
#[cfg(feature = "reqwest")]
impl InstrumentedHandle {
	fn new(client: ReqwestClient, slot: ResponseMetadataSlot) -> Self {
		Self(Arc::new(InstrumentedHttpClient::new(client, slot)))
	}
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for InstrumentedHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = Arc::clone(&self.0);

		Box::pin(async move {
			client.slot.take();

			let response = client
				.client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();

			client.slot.store(ResponseMetadata { status: Some(status.as_u16()) });

			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn metadata_slot_consumes_on_take() {
		let slot = ResponseMetadataSlot::default();

		assert!(slot.take().is_none());

		slot.store(ResponseMetadata { status: Some(401) });

		assert_eq!(slot.take().and_then(|meta| meta.status), Some(401));
		assert!(slot.take().is_none(), "Metadata must not leak into the next request.");
	}

	#[test]
	fn profile_response_success_bounds() {
		assert!(ProfileResponse { status: 200, body: Vec::new() }.is_success());
		assert!(ProfileResponse { status: 299, body: Vec::new() }.is_success());
		assert!(!ProfileResponse { status: 301, body: Vec::new() }.is_success());
		assert!(!ProfileResponse { status: 500, body: Vec::new() }.is_success());
	}
}
