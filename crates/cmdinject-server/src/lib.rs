//! Command-injection lab server
//!
//! Serves two routes that ping a user-supplied host: `/vuln` builds a shell
//! command line from the input, `/safe` filters the input and passes it to
//! `ping` as a single argument.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::{Result, ServerError};
pub use routes::{create_router, AppState};
pub use server::{start, ServerHandle};
