//! HumanAPI authentication strategy—configure the Personal Health Data endpoints once,
//! delegate the OAuth 2.0 authorization-code handshake to a composable client, and hand
//! normalized profiles to an application verification hook.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

// The `test` feature pulls in a self dev-dependency used by the integration tests in `tests/`;
// silence `unused_crate_dependencies` for the lib's own unit-test build, where it is unused.
#[cfg(test)]
use humanapi_strategy as _;

pub mod auth;
pub mod config;
pub mod error;
pub mod handshake;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod profile;
pub mod strategy;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::StrategyConfig,
		http::ReqwestHttpClient,
		strategy::{HumanApiStrategy, VerifyUser},
	};

	/// Strategy type alias used by reqwest-backed integration tests.
	pub type ReqwestTestStrategy<V> = HumanApiStrategy<V, ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`HumanApiStrategy`] backed by the insecure test transport.
	pub fn build_test_strategy<V>(config: StrategyConfig, verify: V) -> ReqwestTestStrategy<V>
	where
		V: VerifyUser,
	{
		HumanApiStrategy::with_http_client(config, verify, test_reqwest_http_client())
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _, tokio as _};
