pub mod problem;
pub mod response;
pub mod trace;
