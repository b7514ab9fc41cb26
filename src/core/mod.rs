pub mod config;
pub mod db;
pub mod i18n;

pub use config::AppConfig;
