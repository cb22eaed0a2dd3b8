pub use sea_orm_migration::prelude::*;

use sea_orm_migration::sea_orm::DatabaseConnection;

mod m20240115_000001_create_orders_table;
mod m20240809_000002_replace_cancelled_flag;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240115_000001_create_orders_table::Migration),
            Box::new(m20240809_000002_replace_cancelled_flag::Migration),
        ]
    }
}

/// Known revisions of the `orders` schema.
///
/// `V1` carries a boolean `cancelled` flag; `V2` replaces it with a nullable
/// `cancelled_at` timestamp. Each variant maps to exactly one recorded
/// migration, so the number of applied migrations is the persisted version
/// marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SchemaVersion {
    V1,
    V2,
}

impl SchemaVersion {
    pub const CURRENT: SchemaVersion = SchemaVersion::V2;

    /// The next revision this one upgrades to, if any. There is no
    /// downgrade path: `V2` is terminal.
    pub fn next(self) -> Option<SchemaVersion> {
        match self {
            SchemaVersion::V1 => Some(SchemaVersion::V2),
            SchemaVersion::V2 => None,
        }
    }

    /// Numeric marker as stored in the migration table (count of applied
    /// migrations).
    pub fn as_marker(self) -> u32 {
        match self {
            SchemaVersion::V1 => 1,
            SchemaVersion::V2 => 2,
        }
    }

    fn from_applied(applied: usize) -> Option<SchemaVersion> {
        match applied {
            1 => Some(SchemaVersion::V1),
            2 => Some(SchemaVersion::V2),
            _ => None,
        }
    }
}

/// Reads the schema version of an opened database. `None` means no
/// migration has run yet (a fresh database).
pub async fn current_version(db: &DatabaseConnection) -> Result<Option<SchemaVersion>, DbErr> {
    let applied = Migrator::get_applied_migrations(db).await?;
    Ok(SchemaVersion::from_applied(applied.len()))
}
