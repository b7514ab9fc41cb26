//! A conversation with Rafiqi: the transcript, the draft being
//! composed, and the lifecycle of the one request that may be in
//! flight at a time.
pub mod core;
pub mod models;

pub use self::core::*;
pub use models::*;
