pub mod monthly;

pub use monthly::{monthly_breakdown, yearly_totals, MonthlyBreakdownRow};
