//! HTTP surface: `POST /generate` runs the crew for one request,
//! `GET /health` reports liveness.

pub mod errors;
pub mod handlers;
pub mod routes;
pub mod server;
