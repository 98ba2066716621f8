//! Back-office (GHC) HTTP API handlers for move management.
//!
//! Every handler runs the same pipeline: authorize the session, parse the
//! resource identifiers, forward the `If-Match` token, call a narrow service
//! port, classify any error into a status, emit audit/events on success and
//! map the result into a JSON payload.

pub mod contract;
pub use contract::model;

pub mod module;
pub use module::GhcApi;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
