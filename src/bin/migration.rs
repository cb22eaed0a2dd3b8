use anyhow::Result;
use tracing::{error, info};

use etv_ledger::{config, db};

/// Standalone migration runner: brings the orders schema forward to the
/// current version and exits. The embedding application otherwise runs
/// the same migrations at startup before serving queries.
#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| cfg.database_url.clone());
    info!("Running migrations against {}", database_url);

    let pool = db::establish_connection(&database_url).await?;

    if let Err(e) = db::run_migrations(&pool).await {
        error!("Migration failed: {}", e);
        return Err(e.into());
    }

    let version = migrations::current_version(&pool).await?;
    info!("Schema is current: {:?}", version);

    db::close_pool(pool).await?;
    Ok(())
}
