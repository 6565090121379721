//! Shell-interpreted ping endpoint
//!
//! Intentionally injectable: the input is pasted into a shell command line,
//! so `;`, `|`, `&&`, backticks and `$()` all chain extra commands.

use super::{required_ip, run_command, AppState, QueryPairs};
use crate::error::Result;
use axum::{extract::State, response::Response};
use cmdinject_core::CommandExecutionStrategy;
use tracing::info;

/// GET /vuln?ip=<value> - ping through `sh -c`
pub async fn vuln_handler(State(state): State<AppState>, query: QueryPairs) -> Result<Response> {
    let ip = required_ip(query)?;

    let strategy = CommandExecutionStrategy::ping_via_shell(&ip);
    info!("Running shell command: {}", strategy);

    run_command(&state, strategy).await
}
