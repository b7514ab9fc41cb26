pub mod db;

pub use db::{find_transcript, save_transcript};
