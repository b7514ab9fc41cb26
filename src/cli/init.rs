use anyhow::Result;

use crate::core::db::ready_db;

pub async fn run(db_path: &str) -> Result<()> {
    println!("Initializing db...");
    ready_db(db_path).await?;
    println!("Finished initializing db");
    Ok(())
}
