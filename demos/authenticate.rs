//! End-to-end callback handling: exchange the returned code, fetch the profile, and apply
//! an application verification hook.

// crates.io
use color_eyre::Result;
use url::Url;
// self
use humanapi_strategy::{
	auth::ScopeList,
	config::StrategyConfig,
	error::BoxError,
	handshake::CallbackRequest,
	strategy::{HumanApiStrategy, Verdict, verify_fn},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = StrategyConfig::builder("demo-client", "demo-secret")
		.callback_url(Url::parse("https://www.example.com/auth/humanapi/callback")?)
		.scope(ScopeList::new(["profile", "bloodpressure", "activity"])?)
		.build()?;
	let strategy = HumanApiStrategy::new(
		config,
		verify_fn(|credentials, profile| async move {
			println!(
				"Verifying remote user {:?} (refresh token issued: {}).",
				profile.id,
				credentials.refresh_token.is_some()
			);

			Ok::<_, BoxError>(match profile.id {
				Some(id) => Verdict::Authenticated(id),
				None => Verdict::Rejected {
					reason: Some("Profile did not include a user id.".into()),
				},
			})
		}),
	);
	let session = strategy.start_authorization();

	println!("Send your user to {}.", &session.authorize_url);

	// In a real deployment the code and state arrive on the callback route.
	let callback = CallbackRequest {
		state: session.state.clone(),
		session,
		code: "code-from-redirect".into(),
	};

	match strategy.authenticate(callback).await {
		Ok(Verdict::Authenticated(user)) => println!("Authenticated remote user {user}."),
		Ok(Verdict::Rejected { reason }) => println!("Login rejected: {reason:?}."),
		Err(err) => eprintln!("Authentication failed: {err}."),
	}

	Ok(())
}
