#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use migrations::Migrator;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;

use etv_ledger::services::import::{ImportService, OrderImportRecord};
use etv_ledger::services::orders::OrderService;

/// Helper harness for spinning up a file-backed SQLite database with the
/// current schema applied.
pub struct TestDb {
    pub pool: Arc<DatabaseConnection>,
    _dir: TempDir,
}

impl TestDb {
    /// Construct a new test database with fresh state.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        Self::connect_in(dir, true).await
    }

    /// Construct a test database without running migrations, for tests
    /// that drive the migrator themselves.
    pub async fn new_unmigrated() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        Self::connect_in(dir, false).await
    }

    async fn connect_in(dir: TempDir, migrate: bool) -> Self {
        let url = format!("sqlite://{}/orders.db?mode=rwc", dir.path().display());
        let mut opts = ConnectOptions::new(url);
        opts.max_connections(1).sqlx_logging(false);
        let pool = Database::connect(opts)
            .await
            .expect("connect test database");
        if migrate {
            Migrator::up(&pool, None).await.expect("run migrations");
        }
        TestDb {
            pool: Arc::new(pool),
            _dir: dir,
        }
    }

    pub fn import_service(&self) -> ImportService {
        ImportService::new(self.pool.clone())
    }

    pub fn order_service(&self) -> OrderService {
        OrderService::new(self.pool.clone())
    }
}

pub fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, 0))
        .expect("valid timestamp")
}

pub fn record(
    number: &str,
    asin: &str,
    product: &str,
    ordered_at: NaiveDateTime,
    delivered_at: Option<NaiveDateTime>,
    etv: Decimal,
) -> OrderImportRecord {
    OrderImportRecord {
        number: number.to_string(),
        asin: asin.to_string(),
        product: product.to_string(),
        ordered_at,
        delivered_at,
        etv,
        cancellation: false,
    }
}

pub fn cancellation(number: &str, at: NaiveDateTime) -> OrderImportRecord {
    OrderImportRecord {
        number: number.to_string(),
        asin: String::new(),
        product: String::new(),
        ordered_at: at,
        delivered_at: None,
        etv: Decimal::ZERO,
        cancellation: true,
    }
}
