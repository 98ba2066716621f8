pub mod error;
pub mod etag;
pub mod events;
pub mod ports;
pub mod session;
