pub mod body;
pub mod context;
pub mod dto;
pub mod emitter;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod locator;
pub mod openapi;
pub mod precondition;
pub mod routes;
pub mod session;
pub mod state;
