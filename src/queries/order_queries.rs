use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, Order as SeaOrder, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::db::DbPool;
use crate::entities::order::{self, Entity as OrderEntity};
use crate::errors::ServiceError;

/// Conventional adjustment factor historically auto-applied to thrift-shop
/// resales; a factor equal to it counts as already reviewed.
pub const DEFAULT_THRIFT_FACTOR: Decimal = dec!(0.2);

static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date shape pattern is valid"));

/// Trait representing a generic asynchronous query.
#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    /// Executes the query using the provided database connection
    async fn execute(&self, db: &DbPool) -> Result<Self::Result, ServiceError>;
}

/// Sort column for order listings. Anything unrecognized falls back to the
/// order date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderSortKey {
    Etv,
    EtvFactor,
    AdjustedEtv,
    #[default]
    OrderedAt,
}

impl OrderSortKey {
    /// Total mapping from a raw request parameter; unknown values sort by
    /// order date.
    pub fn from_param(raw: &str) -> Self {
        match raw {
            "etv" => OrderSortKey::Etv,
            "etvFactor" => OrderSortKey::EtvFactor,
            "adjustedEtv" => OrderSortKey::AdjustedEtv,
            _ => OrderSortKey::OrderedAt,
        }
    }
}

/// Sort direction; ascending only for the exact parameter `"asc"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn from_param(raw: &str) -> Self {
        if raw == "asc" {
            SortDir::Asc
        } else {
            SortDir::Desc
        }
    }
}

/// Structured filter/sort/pagination request for the order query engine.
///
/// All date bounds are inclusive. A `search` value shaped like
/// `YYYY-MM-DD` becomes a single-day bound that supersedes `year`
/// entirely; any other `search` value is a case-insensitive substring
/// match over number, ASIN and product name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFilterOptions {
    /// `false` excludes cancelled rows, `true` returns only cancelled rows.
    pub cancelled: bool,
    /// Restrict to rows that still need human review of their ETV factor.
    pub non_adjusted_only: bool,
    /// Inclusive calendar-year bound. The caller validates the accepted
    /// 2000-3000 range before building this value.
    pub year: Option<i32>,
    /// Apply date bounds to the delivery date instead of the order date.
    pub by_delivered: bool,
    pub search: Option<String>,
    pub sort: OrderSortKey,
    pub dir: SortDir,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Return only the number of matching rows, ignoring sort and
    /// pagination.
    pub count_only: bool,
}

/// Either a page of orders or a bare count, depending on
/// [`OrderFilterOptions::count_only`]. Both modes evaluate the identical
/// filter predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderSearchResult {
    Rows(Vec<order::Model>),
    Count(u64),
}

impl OrderSearchResult {
    pub fn into_rows(self) -> Option<Vec<order::Model>> {
        match self {
            OrderSearchResult::Rows(rows) => Some(rows),
            OrderSearchResult::Count(_) => None,
        }
    }

    pub fn into_count(self) -> Option<u64> {
        match self {
            OrderSearchResult::Count(count) => Some(count),
            OrderSearchResult::Rows(_) => None,
        }
    }
}

/// Struct to search orders with the full filter/sort/pagination option set.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchOrdersQuery {
    pub options: OrderFilterOptions,
}

#[async_trait]
impl Query for SearchOrdersQuery {
    type Result = OrderSearchResult;

    #[instrument(skip(self, db), fields(count_only = self.options.count_only))]
    async fn execute(&self, db: &DbPool) -> Result<Self::Result, ServiceError> {
        debug!("Executing SearchOrdersQuery");
        let condition = filter_condition(&self.options)?;

        if self.options.count_only {
            let total = OrderEntity::find().filter(condition).count(db).await?;
            return Ok(OrderSearchResult::Count(total));
        }

        let direction = match self.options.dir {
            SortDir::Asc => SeaOrder::Asc,
            SortDir::Desc => SeaOrder::Desc,
        };

        let query = OrderEntity::find().filter(condition);
        let query = match self.options.sort {
            OrderSortKey::Etv => query.order_by(order::Column::Etv, direction),
            OrderSortKey::EtvFactor => query.order_by(order::Column::EtvFactor, direction),
            OrderSortKey::AdjustedEtv => query.order_by(adjusted_etv_expr(), direction),
            OrderSortKey::OrderedAt => query.order_by(order::Column::OrderedAt, direction),
        };

        // SQLite accepts OFFSET only after LIMIT, so an offset with no
        // limit still needs an explicit upper bound.
        let limit = match (self.options.limit, self.options.offset) {
            (None, Some(_)) => Some(i64::MAX as u64),
            (limit, _) => limit,
        };

        let rows = query
            .limit(limit)
            .offset(self.options.offset)
            .all(db)
            .await?;

        Ok(OrderSearchResult::Rows(rows))
    }
}

/// SQL expression for the derived taxable value, `etv * COALESCE(etv_factor, 0)`.
fn adjusted_etv_expr() -> SimpleExpr {
    Expr::col(order::Column::Etv).mul(Func::coalesce([
        Expr::col(order::Column::EtvFactor).into(),
        Expr::val(0).into(),
    ]))
}

/// Assembles the shared filter predicate out of named fragments with bound
/// parameters. Row mode and count mode both run exactly this condition.
fn filter_condition(options: &OrderFilterOptions) -> Result<Condition, ServiceError> {
    let mut condition = Condition::all();

    condition = condition.add(if options.cancelled {
        order::Column::CancelledAt.is_not_null()
    } else {
        order::Column::CancelledAt.is_null()
    });

    if options.non_adjusted_only {
        // Literal "needs review" predicate: nonzero ETV, and either no
        // factor at all, or a factor that is neither the thrift default
        // nor 1 and has no recorded reason. Downstream reports depend on
        // these exact semantics.
        condition = condition.add(order::Column::Etv.ne(Decimal::ZERO)).add(
            Condition::any()
                .add(order::Column::EtvFactor.is_null())
                .add(
                    Condition::all()
                        .add(order::Column::EtvFactor.ne(DEFAULT_THRIFT_FACTOR))
                        .add(order::Column::EtvFactor.ne(Decimal::ONE))
                        .add(order::Column::EtvReason.is_null()),
                ),
        );
    }

    let axis = if options.by_delivered {
        order::Column::DeliveredAt
    } else {
        order::Column::OrderedAt
    };

    let mut year_bound = options.year;
    if let Some(raw) = options.search.as_deref() {
        if DATE_SHAPE.is_match(raw) {
            let day = parse_search_day(raw)?;
            let (start, end) = day_bounds(day)?;
            condition = condition.add(axis.gte(start)).add(axis.lte(end));
            // A single-day bound supersedes the year bound; the two are
            // never intersected.
            year_bound = None;
        } else {
            condition = condition.add(
                Condition::any()
                    .add(order::Column::Number.contains(raw))
                    .add(order::Column::Asin.contains(raw))
                    .add(order::Column::Product.contains(raw)),
            );
        }
    }

    if let Some(year) = year_bound {
        let (start, end) = year_bounds(year)?;
        condition = condition.add(axis.gte(start)).add(axis.lte(end));
    }

    Ok(condition)
}

/// Decodes a date-shaped search string. The shape gate has already
/// matched, so a failure here means invalid components (month 13, day 99)
/// and is a validation error, not a substring search.
fn parse_search_day(raw: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ServiceError::ValidationError(format!("invalid date in search: {raw}")))
}

fn day_bounds(day: NaiveDate) -> Result<(NaiveDateTime, NaiveDateTime), ServiceError> {
    let end = day
        .and_hms_milli_opt(23, 59, 59, 999)
        .ok_or_else(|| ServiceError::InternalError("end-of-day timestamp out of range".into()))?;
    Ok((day.and_time(NaiveTime::MIN), end))
}

fn year_bounds(year: i32) -> Result<(NaiveDateTime, NaiveDateTime), ServiceError> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| ServiceError::ValidationError(format!("year {year} out of range")))?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| ServiceError::ValidationError(format!("year {year} out of range")))?;
    let (_, end) = day_bounds(last)?;
    Ok((start.and_time(NaiveTime::MIN), end))
}
