use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::entities::order;

/// One month of an already-filtered yearly order set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBreakdownRow {
    /// Calendar month, 1-12.
    pub month: u32,
    pub order_count: u64,
    pub etv_total: Decimal,
    pub adjusted_etv_total: Decimal,
}

/// Partitions a materialized yearly order set into 12 month buckets by
/// order date. Always returns exactly 12 rows, zero-filled for months
/// without orders; no storage access.
pub fn monthly_breakdown(orders: &[order::Model]) -> Vec<MonthlyBreakdownRow> {
    let mut rows: Vec<MonthlyBreakdownRow> = (1..=12)
        .map(|month| MonthlyBreakdownRow {
            month,
            order_count: 0,
            etv_total: Decimal::ZERO,
            adjusted_etv_total: Decimal::ZERO,
        })
        .collect();

    for order in orders {
        let bucket = &mut rows[(order.ordered_at.month() - 1) as usize];
        bucket.order_count += 1;
        bucket.etv_total += order.etv;
        bucket.adjusted_etv_total += order.adjusted_etv();
    }

    rows
}

/// Sums ETV and adjusted ETV over a materialized order set.
pub fn yearly_totals(orders: &[order::Model]) -> (Decimal, Decimal) {
    orders.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(etv, adjusted), order| (etv + order.etv, adjusted + order.adjusted_etv()),
    )
}
