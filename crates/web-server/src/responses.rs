//! Public response shapes and the row-to-response conversions.
//!
//! Every operation has a fixed serializable struct here with an explicit
//! `From<RowType>` conversion, so the projection a query declares and the
//! shape a client receives can never drift apart silently.
//!
//! Rounding convention: aggregates are computed in NUMERIC and rounded to
//! 2 decimal places with midpoint-away-from-zero before conversion to JSON
//! numbers (e.g. a 150.005 total serializes as 150.01). Raw row amounts are
//! passed through unrounded.

use chrono::{DateTime, Utc};
use database::repository::{
    DailySummaryRow, SummaryRow, SuspiciousRow, TopUserRow, TransactionRow, UserRow, UserStatsRow,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// The fixed reason attached to every flagged transaction.
pub const LARGE_TRANSACTION_REASON: &str = "Large transaction (>90th percentile)";

/// Rounds an aggregate to 2 decimal places, half away from zero, and
/// converts it to a JSON-serializable number.
fn round2(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Converts a raw stored amount without rounding.
fn raw_amount(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            created: row.created,
            updated: row.updated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: String,
    pub user_id: i32,
    pub amount: f64,
    pub currency: String,
    pub subid: String,
    pub pending: bool,
    pub paid: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<TransactionRow> for TransactionResponse {
    fn from(row: TransactionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            amount: raw_amount(row.amount),
            currency: row.currency,
            subid: row.subid,
            pending: row.pending,
            paid: row.paid,
            created: row.created,
            updated: row.updated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionSummary {
    pub total_amount: f64,
    pub transaction_count: i64,
    pub average_amount: f64,
    pub currency: String,
}

impl From<SummaryRow> for TransactionSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            total_amount: round2(row.total_amount),
            transaction_count: row.transaction_count,
            average_amount: round2(row.average_amount),
            currency: row.currency,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserStats {
    pub user_id: i32,
    pub email: String,
    pub total_amount: f64,
    pub transaction_count: i64,
    pub average_amount: f64,
    pub pending_count: i64,
    pub paid_count: i64,
}

impl From<UserStatsRow> for UserStats {
    fn from(row: UserStatsRow) -> Self {
        Self {
            user_id: row.user_id,
            email: row.email,
            total_amount: round2(row.total_amount),
            transaction_count: row.transaction_count,
            average_amount: round2(row.average_amount),
            pending_count: row.pending_count,
            paid_count: row.paid_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DailySummary {
    pub date: String,
    pub transaction_count: i64,
    pub total_amount: f64,
}

impl From<DailySummaryRow> for DailySummary {
    fn from(row: DailySummaryRow) -> Self {
        Self {
            date: row.date.format("%Y-%m-%d").to_string(),
            transaction_count: row.transaction_count,
            total_amount: round2(row.total_amount),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TopUser {
    pub user_id: i32,
    pub email: String,
    pub total_amount: f64,
    pub transaction_count: i64,
}

impl From<TopUserRow> for TopUser {
    fn from(row: TopUserRow) -> Self {
        Self {
            user_id: row.user_id,
            email: row.email,
            total_amount: round2(row.total_amount),
            transaction_count: row.transaction_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuspiciousTransaction {
    pub id: String,
    pub user_id: i32,
    pub amount: f64,
    pub reason: &'static str,
    pub created: DateTime<Utc>,
}

impl From<SuspiciousRow> for SuspiciousTransaction {
    fn from(row: SuspiciousRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            amount: raw_amount(row.amount),
            reason: LARGE_TRANSACTION_REASON,
            created: row.created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn aggregates_round_midpoints_away_from_zero() {
        // 100.005 + 50.00 across two transactions.
        assert_eq!(round2(dec("150.005")), 150.01);
        assert_eq!(round2(dec("75.0025")), 75.00);
        assert_eq!(round2(dec("-1.005")), -1.01);
    }

    #[test]
    fn summary_mapping_rounds_both_aggregates() {
        let summary = TransactionSummary::from(SummaryRow {
            total_amount: dec("150.005"),
            transaction_count: 2,
            average_amount: dec("75.0025"),
            currency: "USD".to_string(),
        });
        assert_eq!(summary.total_amount, 150.01);
        assert_eq!(summary.average_amount, 75.00);
        assert_eq!(summary.transaction_count, 2);
    }

    #[test]
    fn zero_transaction_stats_stay_zero_valued() {
        let stats = UserStats::from(UserStatsRow {
            user_id: 7,
            email: "user@example.com".to_string(),
            total_amount: Decimal::ZERO,
            transaction_count: 0,
            average_amount: Decimal::ZERO,
            pending_count: 0,
            paid_count: 0,
        });
        assert_eq!(stats.total_amount, 0.0);
        assert_eq!(stats.average_amount, 0.0);
        assert_eq!(stats.transaction_count, 0);
        assert_eq!(stats.pending_count, 0);
        assert_eq!(stats.paid_count, 0);
    }

    #[test]
    fn daily_summary_serializes_the_calendar_date() {
        let summary = DailySummary::from(DailySummaryRow {
            date: chrono::NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
            transaction_count: 3,
            total_amount: dec("12.345"),
        });
        assert_eq!(summary.date, "2026-08-23");
        assert_eq!(summary.total_amount, 12.35);
    }

    #[test]
    fn suspicious_mapping_attaches_the_fixed_reason() {
        let created = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let flagged = SuspiciousTransaction::from(SuspiciousRow {
            id: "tx-42".to_string(),
            user_id: 9,
            amount: dec("9001.50"),
            created,
        });
        assert_eq!(flagged.reason, LARGE_TRANSACTION_REASON);
        assert_eq!(flagged.amount, 9001.50);
    }

    #[test]
    fn numeric_fields_serialize_as_json_numbers() {
        let summary = TransactionSummary::from(SummaryRow {
            total_amount: dec("10"),
            transaction_count: 1,
            average_amount: dec("10"),
            currency: "EUR".to_string(),
        });
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value["total_amount"].is_number());
        assert!(value["average_amount"].is_number());
    }
}
