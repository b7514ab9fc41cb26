use anyhow::Result;
use tourmate::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
