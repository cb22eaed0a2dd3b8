use crate::{
    db::DbPool,
    entities::order::{self, Entity as OrderEntity},
    errors::ServiceError,
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// One decoded spreadsheet line. A `cancellation` line reports that the
/// order with this number was cancelled; it never carries new descriptive
/// data for an already-stored row.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderImportRecord {
    #[validate(length(min = 1, message = "Order number is required"))]
    pub number: String,
    pub asin: String,
    pub product: String,
    pub ordered_at: NaiveDateTime,
    pub delivered_at: Option<NaiveDateTime>,
    pub etv: Decimal,
    #[serde(default)]
    pub cancellation: bool,
}

/// Outcome counts for one committed import batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Rows newly inserted.
    pub inserted: u64,
    /// Lines whose number was already stored (idempotent re-upload).
    pub skipped: u64,
    /// Rows transitioned to cancelled by this batch.
    pub cancellations: u64,
}

/// Service ingesting decoded spreadsheet lines into the orders table.
///
/// Bulk import is the only producer of rows. Inserting an existing number
/// is a no-op, never an overwrite, so re-uploading the same spreadsheet is
/// safe.
#[derive(Clone)]
pub struct ImportService {
    db_pool: Arc<DbPool>,
}

impl ImportService {
    /// Creates a new import service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Imports one batch of records inside a single transaction.
    ///
    /// Validation runs over the whole batch before any storage access;
    /// a rejected batch is never partially applied.
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub async fn import_records(
        &self,
        records: Vec<OrderImportRecord>,
    ) -> Result<ImportSummary, ServiceError> {
        for record in &records {
            record
                .validate()
                .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
            if record.etv < Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "order {}: etv must be non-negative",
                    record.number
                )));
            }
        }

        let db = &*self.db_pool;
        let txn = db.begin().await?;

        let mut summary = ImportSummary::default();
        for record in records {
            let inserted = OrderEntity::insert(order::ActiveModel {
                number: Set(record.number.clone()),
                asin: Set(record.asin),
                product: Set(record.product),
                ordered_at: Set(record.ordered_at),
                delivered_at: Set(record.delivered_at),
                etv: Set(record.etv),
                etv_factor: Set(None),
                cancelled_at: Set(None),
                etv_reason: Set(None),
                notes: Set(None),
            })
            .on_conflict(
                OnConflict::column(order::Column::Number)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

            if inserted == 0 {
                summary.skipped += 1;
            } else {
                summary.inserted += 1;
            }

            if record.cancellation {
                // A cancellation line stamps the existing row with its own
                // date; an already-cancelled row keeps its earlier instant.
                let updated = OrderEntity::update_many()
                    .col_expr(
                        order::Column::CancelledAt,
                        Expr::value(Some(record.ordered_at)),
                    )
                    .filter(order::Column::Number.eq(record.number.as_str()))
                    .filter(order::Column::CancelledAt.is_null())
                    .exec(&txn)
                    .await?;
                summary.cancellations += updated.rows_affected;
            }
        }

        txn.commit().await?;

        info!(
            inserted = summary.inserted,
            skipped = summary.skipped,
            cancellations = summary.cancellations,
            "Order import committed"
        );
        Ok(summary)
    }
}
