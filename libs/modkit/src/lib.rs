//! # ModKit
//!
//! Shared HTTP building blocks for GHC modules: RFC 9457 problem responses,
//! JSON response helpers, trace id extraction and shutdown signal handling.

pub mod api;
pub mod shutdown;

pub use api::problem::{Problem, ProblemResponse, APPLICATION_PROBLEM_JSON};
pub use api::response::{created_json, no_content};
pub use api::trace::extract_trace_id;
