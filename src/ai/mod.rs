pub mod discovery;
pub mod prompt;
pub mod session;
pub mod speech;
