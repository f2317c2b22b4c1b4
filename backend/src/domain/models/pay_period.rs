use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{PayFrequency, PayPeriodStatus};

use super::budget_category::BudgetCategory;

#[derive(Debug, Clone, PartialEq)]
pub struct PayPeriod {
    pub id: i64,
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: PayFrequency,
    pub total_income: Decimal,
    pub status: PayPeriodStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A pay period together with its budget categories
#[derive(Debug, Clone, PartialEq)]
pub struct PayPeriodDetails {
    pub period: PayPeriod,
    pub categories: Vec<BudgetCategory>,
}

/// Inclusive last day of a period starting on `start`.
///
/// Weekly and bi-weekly periods span 7 and 14 days; monthly periods end on the
/// last day of the start month regardless of the start day. Returns `None`
/// only at the edge of chrono's supported calendar.
pub fn period_end_date(start: NaiveDate, frequency: PayFrequency) -> Option<NaiveDate> {
    match frequency {
        PayFrequency::Weekly => start.checked_add_days(Days::new(6)),
        PayFrequency::BiWeekly => start.checked_add_days(Days::new(13)),
        PayFrequency::Monthly => {
            let first_of_next = if start.month() == 12 {
                NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
            };
            first_of_next?.pred_opt()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_and_bi_weekly_spans() {
        assert_eq!(
            period_end_date(date(2024, 1, 1), PayFrequency::Weekly),
            Some(date(2024, 1, 7))
        );
        assert_eq!(
            period_end_date(date(2024, 1, 1), PayFrequency::BiWeekly),
            Some(date(2024, 1, 14))
        );
        assert_eq!(
            period_end_date(date(2024, 12, 25), PayFrequency::BiWeekly),
            Some(date(2025, 1, 7))
        );
    }

    #[test]
    fn test_monthly_ends_on_last_day_of_start_month() {
        assert_eq!(
            period_end_date(date(2024, 2, 10), PayFrequency::Monthly),
            Some(date(2024, 2, 29))
        );
        assert_eq!(
            period_end_date(date(2023, 2, 1), PayFrequency::Monthly),
            Some(date(2023, 2, 28))
        );
        assert_eq!(
            period_end_date(date(2024, 12, 15), PayFrequency::Monthly),
            Some(date(2024, 12, 31))
        );
    }
}
