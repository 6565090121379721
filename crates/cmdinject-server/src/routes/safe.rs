//! Argument-vector ping endpoint
//!
//! The input reaches `ping` as one argument and is never parsed by a shell.
//! The blacklist in front of it is a second, deliberately incomplete layer:
//! it does not validate the address, so malformed input still reaches
//! `ping`, which rejects it.

use super::{required_ip, run_command, AppState, QueryPairs};
use crate::error::{Result, ServerError};
use axum::{extract::State, response::Response};
use cmdinject_core::CommandExecutionStrategy;
use tracing::{info, warn};

/// GET /safe?ip=<value> - blacklist check, then ping without a shell
pub async fn safe_handler(State(state): State<AppState>, query: QueryPairs) -> Result<Response> {
    let ip = required_ip(query)?;

    if state.blacklist.is_blocked(&ip) {
        warn!("Blocked input {:?} (pattern {})", ip, state.blacklist.pattern());
        return Err(ServerError::InputBlocked);
    }

    let strategy = CommandExecutionStrategy::ping_direct(&ip);
    info!("Running command: {}", strategy);

    run_command(&state, strategy).await
}
