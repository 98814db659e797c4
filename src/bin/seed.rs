//! Fixture Loader
//!
//! Run with: cargo run --bin seed          (import fixtures)
//!           cargo run --bin seed -- -d    (destroy users and finance methods)

use finance_tracker::{db, seed, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let destroy = args.iter().skip(1).any(|a| a == "-d");

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set to seed the database"))?;
    let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    println!("Connecting to database...");
    let store = Store::connect(&database_url, max_connections).await?;

    if !db::check_schema(&store).await? {
        store.close().await;
        return Err(anyhow::anyhow!("Database schema incomplete. Please run migrations."));
    }

    let result = if destroy {
        seed::destroy(&store).await.map(|summary| {
            println!(
                "Data destroyed! ({} users, {} finance methods removed)",
                summary.users, summary.finance_methods
            );
        })
    } else {
        seed::import(&store).await.map(|summary| {
            println!(
                "Data imported successfully! ({} users, {} finance methods)",
                summary.users, summary.finance_methods
            );
        })
    };

    store.close().await;

    result.map_err(|e| anyhow::anyhow!("Error: {}", e))
}
