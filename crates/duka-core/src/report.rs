//! # Sales Reporting
//!
//! Pure categorization of sale summaries by payment method and credit
//! status, plus the time-window bounds the read path queries with.
//!
//! ## Buckets
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Report Categorization                        │
//! │                                                                 │
//! │  total_sales            every sale in the window                │
//! │  sales_paid_in_cash     CASH and balance_amount <= 0            │
//! │  sales_paid_in_credit   balance_amount > 0                      │
//! │  sales_by_mobile_money  MOBILEMONEY                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The read path is snapshot-only: no ordering or write coordination.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{PaymentMethod, SaleType};

// =============================================================================
// Sale Summary
// =============================================================================

/// The slice of a sale the reports aggregate over.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleSummary {
    pub shop_id: Option<String>,
    pub sale_amount: i64,
    pub balance_amount: i64,
    pub payment_method: PaymentMethod,
    pub sale_type: SaleType,
}

impl SaleSummary {
    /// Settled at the counter in cash, no credit carried.
    #[inline]
    fn is_cash(&self) -> bool {
        self.payment_method == PaymentMethod::Cash && self.balance_amount <= 0
    }

    /// Carries outstanding credit.
    #[inline]
    fn is_credit(&self) -> bool {
        self.balance_amount > 0
    }
}

// =============================================================================
// Sales Report
// =============================================================================

/// A categorized view over one time window of sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub total_sales: Vec<SaleSummary>,
    pub sales_paid_in_cash: Vec<SaleSummary>,
    pub sales_paid_in_credit: Vec<SaleSummary>,
    pub sales_by_mobile_money: Vec<SaleSummary>,
}

/// Partitions sale summaries into the report buckets.
///
/// A sale may appear in more than one bucket (`total_sales` always, and
/// e.g. a MOBILEMONEY sale with credit shows under both mobile money and
/// credit).
pub fn categorize_sales(sales: Vec<SaleSummary>) -> SalesReport {
    let sales_paid_in_cash = sales.iter().filter(|s| s.is_cash()).cloned().collect();
    let sales_paid_in_credit = sales.iter().filter(|s| s.is_credit()).cloned().collect();
    let sales_by_mobile_money = sales
        .iter()
        .filter(|s| s.payment_method == PaymentMethod::MobileMoney)
        .cloned()
        .collect();

    SalesReport {
        total_sales: sales,
        sales_paid_in_cash,
        sales_paid_in_credit,
        sales_by_mobile_money,
    }
}

/// Reports for the standard dashboard windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReports {
    pub today: SalesReport,
    pub this_week: SalesReport,
    pub this_month: SalesReport,
    pub all_time: SalesReport,
}

// =============================================================================
// Report Periods
// =============================================================================

/// Standard reporting windows. Weeks start on Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportPeriod {
    Today,
    ThisWeek,
    ThisMonth,
    AllTime,
}

impl ReportPeriod {
    /// Half-open `[start, end)` bounds for this period around `now`.
    ///
    /// `AllTime` is unbounded on both sides. Half-open ends make adjacent
    /// periods non-overlapping regardless of timestamp precision.
    pub fn bounds(&self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let today = now.date_naive();

        let (start, end) = match self {
            ReportPeriod::Today => (today, next_day(today)),
            ReportPeriod::ThisWeek => {
                let start = today
                    .checked_sub_days(Days::new(u64::from(now.weekday().num_days_from_sunday())))
                    .unwrap_or(today);
                (start, start.checked_add_days(Days::new(7)).unwrap_or(start))
            }
            ReportPeriod::ThisMonth => {
                let start = today.with_day(1).unwrap_or(today);
                (
                    start,
                    start.checked_add_months(Months::new(1)).unwrap_or(start),
                )
            }
            ReportPeriod::AllTime => return (None, None),
        };

        (Some(start_of(start)), Some(start_of(end)))
    }
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

fn start_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn summary(method: PaymentMethod, balance: i64) -> SaleSummary {
        SaleSummary {
            shop_id: Some("shop-1".to_string()),
            sale_amount: 1000,
            balance_amount: balance,
            payment_method: method,
            sale_type: if balance > 0 {
                SaleType::Credit
            } else {
                SaleType::Paid
            },
        }
    }

    #[test]
    fn test_categorize_buckets() {
        let report = categorize_sales(vec![
            summary(PaymentMethod::Cash, 0),
            summary(PaymentMethod::Cash, 500),
            summary(PaymentMethod::MobileMoney, 0),
            summary(PaymentMethod::Bank, 0),
        ]);

        assert_eq!(report.total_sales.len(), 4);
        assert_eq!(report.sales_paid_in_cash.len(), 1);
        assert_eq!(report.sales_paid_in_credit.len(), 1);
        assert_eq!(report.sales_by_mobile_money.len(), 1);
    }

    #[test]
    fn test_cash_sale_with_credit_counts_as_credit_not_cash() {
        let report = categorize_sales(vec![summary(PaymentMethod::Cash, 300)]);
        assert!(report.sales_paid_in_cash.is_empty());
        assert_eq!(report.sales_paid_in_credit.len(), 1);
    }

    #[test]
    fn test_today_bounds_are_one_day_half_open() {
        // 2026-03-15 was a Sunday.
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 13, 45, 0).unwrap();
        let (start, end) = ReportPeriod::Today.bounds(now);

        assert_eq!(start.unwrap(), Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap());
        assert_eq!(end.unwrap(), Utc.with_ymd_and_hms(2026, 3, 16, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // 2026-03-18 was a Wednesday; the week began Sunday the 15th.
        let now = Utc.with_ymd_and_hms(2026, 3, 18, 9, 0, 0).unwrap();
        let (start, end) = ReportPeriod::ThisWeek.bounds(now);

        assert_eq!(start.unwrap(), Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap());
        assert_eq!(end.unwrap(), Utc.with_ymd_and_hms(2026, 3, 22, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_month_bounds_cross_year() {
        let now = Utc.with_ymd_and_hms(2025, 12, 30, 23, 0, 0).unwrap();
        let (start, end) = ReportPeriod::ThisMonth.bounds(now);

        assert_eq!(start.unwrap(), Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end.unwrap(), Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_all_time_is_unbounded() {
        let (start, end) = ReportPeriod::AllTime.bounds(Utc::now());
        assert!(start.is_none());
        assert!(end.is_none());
    }
}
