//! HTTP routes module

mod safe;
mod vuln;

use crate::error::{Result, ServerError, TEXT_PLAIN};
use crate::middleware::security_headers_middleware;
use axum::{
    extract::{rejection::QueryRejection, Query},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use cmdinject_core::{Blacklist, CommandExecutionStrategy, CommandExecutor};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared application state
///
/// Built once at startup. Nothing in here is written while serving requests.
#[derive(Clone)]
pub struct AppState {
    pub blacklist: Arc<Blacklist>,
    pub executor: Arc<dyn CommandExecutor>,
}

impl AppState {
    pub fn new(blacklist: Blacklist, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            blacklist: Arc::new(blacklist),
            executor,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/vuln", get(vuln::vuln_handler))
        .route("/safe", get(safe::safe_handler))
        .layer(middleware::from_fn(security_headers_middleware))
        .fallback(fallback_handler)
        .with_state(state)
}

/// Fallback handler for unmatched routes
async fn fallback_handler() -> ServerError {
    ServerError::RouteNotFound
}

/// Raw `key=value` pairs of the query string, in request order
pub type QueryPairs = std::result::Result<Query<Vec<(String, String)>>, QueryRejection>;

/// Pull a non-empty `ip` out of the query string.
/// When `ip` repeats, the first occurrence wins. An unparseable query
/// string counts as a missing parameter.
fn required_ip(query: QueryPairs) -> Result<String> {
    let ip = match query {
        Ok(Query(pairs)) => pairs
            .into_iter()
            .find(|(key, _)| key == "ip")
            .map(|(_, value)| value)
            .unwrap_or_default(),
        Err(rejection) => {
            debug!("Rejected query string: {}", rejection);
            String::new()
        }
    };

    if ip.is_empty() {
        return Err(ServerError::InputMissing);
    }
    Ok(ip)
}

/// Run a strategy and shape the response: raw output on success,
/// error text plus captured output otherwise
async fn run_command(state: &AppState, strategy: CommandExecutionStrategy) -> Result<Response> {
    let result = state.executor.execute(&strategy).await;

    if let Some(error) = result.error.as_deref() {
        warn!("Command failed ({}): {}", error, strategy);
        return Err(ServerError::ExecutionFailure {
            error: error.to_string(),
            output: result.output_lossy().into_owned(),
        });
    }

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, TEXT_PLAIN)],
        result.output,
    )
        .into_response())
}
