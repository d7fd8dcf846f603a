//! HTTP API for the authentication service

pub mod routes;
pub mod server;

pub use server::{run_server, serve_with_state, AppState, SharedState};
