use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::catalog::{Category, Language};
use crate::core::AppConfig;
use crate::store::Theme;

pub mod chat;
pub mod discover;
pub mod init;
pub mod places;
pub mod prefs;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Create the database
    Init {},
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Chat with Rafiqi
    Chat {
        /// Overrides the saved language for this session
        #[arg(long)]
        language: Option<Language>,
    },
    /// List governorates, or the places in one of them
    Places {
        #[arg(long)]
        governorate: Option<String>,
        #[arg(long, default_value = "heritage")]
        category: Category,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Ask Rafiqi for more places than the catalog lists
    Discover {
        #[arg(long)]
        governorate: String,
        #[arg(long, default_value = "heritage")]
        category: Category,
        #[arg(long, default_value = "5", value_parser = clap::value_parser!(u16).range(1..=10))]
        count: u16,
    },
    /// Show or change saved preferences
    Prefs {
        #[arg(long)]
        theme: Option<Theme>,
        #[arg(long)]
        language: Option<Language>,
        #[arg(long)]
        governorate: Option<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format! {
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                }
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Init {}) => {
            init::run(&config.db_path).await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, config).await?;
        }
        Some(Command::Chat { language }) => {
            chat::run(config, language).await?;
        }
        Some(Command::Places {
            governorate,
            category,
            search,
        }) => {
            places::run(&config, governorate.as_deref(), category, &search).await?;
        }
        Some(Command::Discover {
            governorate,
            category,
            count,
        }) => {
            discover::run(&config, &governorate, category, count as usize).await?;
        }
        Some(Command::Prefs {
            theme,
            language,
            governorate,
        }) => {
            prefs::run(&config, theme, language, governorate).await?;
        }
        None => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_count_range() {
        let cli = Cli::try_parse_from(["tourmate", "discover", "--governorate", "luxor"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Discover { count: 5, .. })));

        for count in ["0", "11"] {
            let result = Cli::try_parse_from([
                "tourmate",
                "discover",
                "--governorate",
                "luxor",
                "--count",
                count,
            ]);
            assert!(result.is_err());
        }
    }
}
