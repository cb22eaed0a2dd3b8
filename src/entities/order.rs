use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One row per unique order `number`. Rows are created only by bulk import
/// and are never deleted; `etv_factor`, `etv_reason` and `notes` are the
/// only user-mutable columns.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub number: String,

    pub asin: String,
    pub product: String,

    /// Acquisition date; all date filtering happens on naive wall-clock
    /// time, since the source data carries no timezone.
    pub ordered_at: NaiveDateTime,
    pub delivered_at: Option<NaiveDateTime>,

    /// Original estimated value, never negative.
    pub etv: Decimal,

    /// Residual fraction of `etv` counted as personal-use value. Absent
    /// means "not yet adjusted"; no upper bound.
    pub etv_factor: Option<Decimal>,

    /// Present iff the order was later cancelled.
    pub cancelled_at: Option<NaiveDateTime>,

    #[validate(length(max = 255))]
    pub etv_reason: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl Model {
    /// Derived taxable value: `etv * etv_factor`, treating an absent
    /// factor as zero. Never stored.
    pub fn adjusted_etv(&self) -> Decimal {
        self.etv * self.etv_factor.unwrap_or(Decimal::ZERO)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn order(etv: Decimal, factor: Option<Decimal>) -> Model {
        Model {
            number: "114-0000001-0000001".to_string(),
            asin: "B000TEST01".to_string(),
            product: "USB cable".to_string(),
            ordered_at: NaiveDate::from_ymd_opt(2024, 3, 14)
                .and_then(|d| d.and_hms_opt(9, 30, 0))
                .expect("valid timestamp"),
            delivered_at: None,
            etv,
            etv_factor: factor,
            cancelled_at: None,
            etv_reason: None,
            notes: None,
        }
    }

    #[test]
    fn adjusted_etv_treats_absent_factor_as_zero() {
        assert_eq!(order(dec!(25.00), None).adjusted_etv(), dec!(0));
    }

    #[test]
    fn adjusted_etv_multiplies_factor() {
        assert_eq!(order(dec!(25.00), Some(dec!(0.2))).adjusted_etv(), dec!(5.00));
        assert_eq!(order(dec!(25.00), Some(dec!(1))).adjusted_etv(), dec!(25.00));
    }
}
