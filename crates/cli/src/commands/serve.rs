use tracing::info;

use crate::context::CommandContext;
use crate::error::{CliError, Result};
use crate::server::{AppState, router};

/// Serves the pipelines until the process is stopped.
///
/// # Errors
///
/// Returns an error if:
/// - The config or any session file cannot be loaded
/// - The server cannot bind to the address
pub async fn execute(ctx: &CommandContext, bind: Option<String>) -> Result<()> {
	let config = ctx.config()?;
	let client = config.build_client()?;
	let addr = bind.unwrap_or_else(|| config.bind_address().to_string());

	let app = router(AppState::new(client, ctx.request_options()));
	let listener = tokio::net::TcpListener::bind(&addr)
		.await
		.map_err(|e| CliError::Server(format!("failed to bind to {addr}: {e}")))?;

	info!(target = "feedwalk", %addr, sessions = config.sessions.len(), "serving");
	println!("Listening on http://{addr}/");

	axum::serve(listener, app).await.map_err(|e| CliError::Server(e.to_string()))?;
	Ok(())
}
