//! Query-parameter types and the bounds applied to them.
//!
//! Every client-supplied numeric parameter is range-checked here before any
//! query runs. The wire types are unsigned, so negative values are rejected
//! as malformed during extraction; everything else is validated explicitly
//! against the declared inclusive ranges.

use crate::error::ApiError;
use serde::Deserialize;
use std::ops::RangeInclusive;

const USER_LIMIT_RANGE: RangeInclusive<u32> = 1..=100;
const TRANSACTION_LIMIT_RANGE: RangeInclusive<u32> = 1..=500;
const TOP_USERS_LIMIT_RANGE: RangeInclusive<u32> = 1..=100;
const DAYS_RANGE: RangeInclusive<u32> = 1..=365;

fn default_user_limit() -> u32 { 10 }
fn default_transaction_limit() -> u32 { 50 }
fn default_top_users_limit() -> u32 { 10 }
fn default_days() -> u32 { 7 }

/// Checks a value against its declared inclusive range, naming the
/// parameter in the rejection so the caller can correct it.
fn bounded(name: &str, value: u32, range: &RangeInclusive<u32>) -> Result<i64, ApiError> {
    if range.contains(&value) {
        Ok(i64::from(value))
    } else {
        Err(ApiError::Validation(format!(
            "{name} must be between {} and {}",
            range.start(),
            range.end()
        )))
    }
}

/// Pagination for the users listing.
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_user_limit")]
    pub limit: u32,
}

impl UserListParams {
    pub fn validate(&self) -> Result<(i64, i64), ApiError> {
        let limit = bounded("limit", self.limit, &USER_LIMIT_RANGE)?;
        Ok((i64::from(self.skip), limit))
    }
}

/// Pagination and optional status filters for the transactions listing.
#[derive(Debug, Deserialize)]
pub struct TransactionListParams {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_transaction_limit")]
    pub limit: u32,
    pub pending: Option<bool>,
    pub paid: Option<bool>,
}

impl TransactionListParams {
    pub fn validate(&self) -> Result<(i64, i64), ApiError> {
        let limit = bounded("limit", self.limit, &TRANSACTION_LIMIT_RANGE)?;
        Ok((i64::from(self.skip), limit))
    }
}

/// A bare result-size bound for the per-user/pending/unpaid/suspicious
/// transaction listings.
#[derive(Debug, Deserialize)]
pub struct TransactionLimitParams {
    #[serde(default = "default_transaction_limit")]
    pub limit: u32,
}

impl TransactionLimitParams {
    pub fn validate(&self) -> Result<i64, ApiError> {
        bounded("limit", self.limit, &TRANSACTION_LIMIT_RANGE)
    }
}

/// Result-size bound for the top-users ranking.
#[derive(Debug, Deserialize)]
pub struct TopUsersParams {
    #[serde(default = "default_top_users_limit")]
    pub limit: u32,
}

impl TopUsersParams {
    pub fn validate(&self) -> Result<i64, ApiError> {
        bounded("limit", self.limit, &TOP_USERS_LIMIT_RANGE)
    }
}

/// Trailing-window size for the daily summary.
#[derive(Debug, Deserialize)]
pub struct DailyParams {
    #[serde(default = "default_days")]
    pub days: u32,
}

impl DailyParams {
    pub fn validate(&self) -> Result<i32, ApiError> {
        let days = bounded("days", self.days, &DAYS_RANGE)?;
        Ok(days as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_listing_defaults_are_in_range() {
        let params = UserListParams { skip: 0, limit: default_user_limit() };
        assert_eq!(params.validate().unwrap(), (0, 10));
    }

    #[test]
    fn user_limit_of_zero_is_rejected() {
        let params = UserListParams { skip: 0, limit: 0 };
        assert!(params.validate().is_err());
    }

    #[test]
    fn user_limit_above_100_is_rejected() {
        let params = UserListParams { skip: 0, limit: 101 };
        assert!(params.validate().is_err());
    }

    #[test]
    fn transaction_limit_allows_up_to_500() {
        let params = TransactionListParams { skip: 20, limit: 500, pending: None, paid: None };
        assert_eq!(params.validate().unwrap(), (20, 500));

        let params = TransactionListParams { skip: 0, limit: 501, pending: None, paid: None };
        assert!(params.validate().is_err());
    }

    #[test]
    fn days_window_is_bounded_to_a_year() {
        assert_eq!(DailyParams { days: 7 }.validate().unwrap(), 7);
        assert_eq!(DailyParams { days: 365 }.validate().unwrap(), 365);
        assert!(DailyParams { days: 0 }.validate().is_err());
        assert!(DailyParams { days: 366 }.validate().is_err());
    }

    #[test]
    fn top_users_limit_is_bounded_to_100() {
        assert_eq!(TopUsersParams { limit: 100 }.validate().unwrap(), 100);
        assert!(TopUsersParams { limit: 101 }.validate().is_err());
    }

    #[test]
    fn rejection_names_the_offending_parameter() {
        let err = DailyParams { days: 400 }.validate().unwrap_err();
        match err {
            ApiError::Validation(message) => {
                assert!(message.contains("days"));
                assert!(message.contains("365"));
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }
}
