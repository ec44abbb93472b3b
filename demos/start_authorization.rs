//! Walks through launching a HumanAPI authorization-code session and validating the state
//! echoed back by the redirect handler.

// std
use std::collections::HashMap;
// crates.io
use color_eyre::Result;
use url::Url;
// self
use humanapi_strategy::{
	auth::ScopeList,
	config::StrategyConfig,
	error::BoxError,
	strategy::{HumanApiStrategy, Verdict, verify_fn},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = StrategyConfig::builder("demo-client", "demo-secret")
		.callback_url(Url::parse("https://www.example.com/auth/humanapi/callback")?)
		.scope(ScopeList::new(["profile", "bloodpressure", "activity"])?)
		.build()?;
	let strategy = HumanApiStrategy::new(
		config,
		verify_fn(|_credentials, profile| async move {
			Ok::<_, BoxError>(Verdict::Authenticated(profile.id))
		}),
	);
	let session = strategy.start_authorization();

	println!("Send your user to {}.", &session.authorize_url);
	println!(
		"PKCE challenge ({:?}): {}.",
		session.code_challenge_method(),
		session.code_challenge()
	);

	let mut sessions: HashMap<String, _> = HashMap::new();

	sessions.insert(session.state.clone(), session.clone());

	// Simulate the redirect handler looking up the stored session by `state`.
	let returned_state = session.state.clone();

	if let Some(stashed) = sessions.remove(&returned_state) {
		stashed.validate_state(&returned_state)?;
		println!("Validated state; hand the session and code to `authenticate` in the callback.");
	} else {
		eprintln!("State `{returned_state}` was not recognized.");
	}

	Ok(())
}
