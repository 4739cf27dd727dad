use crate::DbError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgConnection;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub email: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// A row from the `transactions` table.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    pub id: String,
    pub user_id: i32,
    pub amount: Decimal,
    pub currency: String,
    pub subid: String,
    pub pending: bool,
    pub paid: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// The aggregate over one currency group of the `transactions` table.
#[derive(Debug, Clone, FromRow)]
pub struct SummaryRow {
    pub total_amount: Decimal,
    pub transaction_count: i64,
    pub average_amount: Decimal,
    pub currency: String,
}

/// Per-user transaction aggregates, LEFT-joined so a user with zero
/// transactions still produces a row of zero-valued aggregates.
#[derive(Debug, Clone, FromRow)]
pub struct UserStatsRow {
    pub user_id: i32,
    pub email: String,
    pub total_amount: Decimal,
    pub transaction_count: i64,
    pub average_amount: Decimal,
    pub pending_count: i64,
    pub paid_count: i64,
}

/// Transaction aggregates for one calendar day.
#[derive(Debug, Clone, FromRow)]
pub struct DailySummaryRow {
    pub date: NaiveDate,
    pub transaction_count: i64,
    pub total_amount: Decimal,
}

/// One user ranked by total transaction volume.
#[derive(Debug, Clone, FromRow)]
pub struct TopUserRow {
    pub user_id: i32,
    pub email: String,
    pub total_amount: Decimal,
    pub transaction_count: i64,
}

/// A transaction flagged by the large-amount heuristic.
#[derive(Debug, Clone, FromRow)]
pub struct SuspiciousRow {
    pub id: String,
    pub user_id: i32,
    pub amount: Decimal,
    pub created: DateTime<Utc>,
}

/// Runs a trivial no-op query to verify the session is alive.
pub async fn ping(conn: &mut PgConnection) -> Result<(), DbError> {
    sqlx::query("SELECT 1").execute(conn).await?;
    Ok(())
}

/// Fetches a page of users, ordered by id so pagination is deterministic.
pub async fn list_users(
    conn: &mut PgConnection,
    skip: i64,
    limit: i64,
) -> Result<Vec<UserRow>, DbError> {
    let users = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, created, updated FROM users ORDER BY id LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(conn)
    .await?;
    Ok(users)
}

/// Fetches a single user by id; `None` means the user does not exist.
pub async fn get_user(conn: &mut PgConnection, user_id: i32) -> Result<Option<UserRow>, DbError> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, created, updated FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(user)
}

/// Fetches the most recent transactions for one user.
pub async fn list_user_transactions(
    conn: &mut PgConnection,
    user_id: i32,
    limit: i64,
) -> Result<Vec<TransactionRow>, DbError> {
    let transactions = sqlx::query_as::<_, TransactionRow>(
        r#"
        SELECT id, user_id, amount, currency, subid, pending, paid, created, updated
        FROM transactions
        WHERE user_id = $1
        ORDER BY created DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(conn)
    .await?;
    Ok(transactions)
}

/// Fetches a page of transactions with optional status filters.
///
/// Each filter constrains the result only when supplied: an omitted filter
/// means "no constraint on that field," never "false." When both are given
/// they combine with logical AND.
pub async fn list_transactions(
    conn: &mut PgConnection,
    skip: i64,
    limit: i64,
    pending: Option<bool>,
    paid: Option<bool>,
) -> Result<Vec<TransactionRow>, DbError> {
    let transactions = sqlx::query_as::<_, TransactionRow>(
        r#"
        SELECT id, user_id, amount, currency, subid, pending, paid, created, updated
        FROM transactions
        WHERE ($1::boolean IS NULL OR pending = $1)
          AND ($2::boolean IS NULL OR paid = $2)
        ORDER BY created DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(pending)
    .bind(paid)
    .bind(limit)
    .bind(skip)
    .fetch_all(conn)
    .await?;
    Ok(transactions)
}

/// Aggregates all transactions grouped by currency.
///
/// Known limitation, kept deliberately: the query is bounded to one row, so
/// when several currencies exist an arbitrary single group is returned. An
/// empty transactions table yields no row at all, which is surfaced as
/// [`DbError::EmptyAggregate`] rather than a zero-valued summary.
pub async fn transaction_summary(conn: &mut PgConnection) -> Result<SummaryRow, DbError> {
    let summary = sqlx::query_as::<_, SummaryRow>(
        r#"
        SELECT
            COALESCE(SUM(amount), 0) AS total_amount,
            COUNT(*) AS transaction_count,
            COALESCE(AVG(amount), 0) AS average_amount,
            currency
        FROM transactions
        GROUP BY currency
        LIMIT 1
        "#,
    )
    .fetch_optional(conn)
    .await?;
    summary.ok_or(DbError::EmptyAggregate)
}

/// Computes per-user transaction statistics.
///
/// The LEFT JOIN guarantees a user with zero transactions still yields one
/// row with zero counts and amounts; `None` means the user itself does not
/// exist. `pending_count` and `paid_count` are independent conditional sums,
/// so a transaction flagged both pending and paid counts toward both.
pub async fn user_stats(
    conn: &mut PgConnection,
    user_id: i32,
) -> Result<Option<UserStatsRow>, DbError> {
    let stats = sqlx::query_as::<_, UserStatsRow>(
        r#"
        SELECT
            u.id AS user_id,
            u.email,
            COALESCE(SUM(t.amount), 0) AS total_amount,
            COUNT(t.id) AS transaction_count,
            COALESCE(AVG(t.amount), 0) AS average_amount,
            COALESCE(SUM(CASE WHEN t.pending THEN 1 ELSE 0 END), 0) AS pending_count,
            COALESCE(SUM(CASE WHEN t.paid THEN 1 ELSE 0 END), 0) AS paid_count
        FROM users u
        LEFT JOIN transactions t ON u.id = t.user_id
        WHERE u.id = $1
        GROUP BY u.id, u.email
        "#,
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(stats)
}

/// Aggregates transactions per calendar day over a trailing window,
/// newest date first. The day boundary follows the database session's
/// time zone.
pub async fn daily_summary(
    conn: &mut PgConnection,
    days: i32,
) -> Result<Vec<DailySummaryRow>, DbError> {
    let summaries = sqlx::query_as::<_, DailySummaryRow>(
        r#"
        SELECT
            DATE(created) AS date,
            COUNT(*) AS transaction_count,
            COALESCE(SUM(amount), 0) AS total_amount
        FROM transactions
        WHERE created >= NOW() - make_interval(days => $1)
        GROUP BY DATE(created)
        ORDER BY date DESC
        "#,
    )
    .bind(days)
    .fetch_all(conn)
    .await?;
    Ok(summaries)
}

/// Ranks users by total transaction volume, descending.
///
/// Totals are coalesced to zero so users with no transactions sort last
/// instead of floating to the top as NULLs.
pub async fn top_users(conn: &mut PgConnection, limit: i64) -> Result<Vec<TopUserRow>, DbError> {
    let users = sqlx::query_as::<_, TopUserRow>(
        r#"
        SELECT
            u.id AS user_id,
            u.email,
            COALESCE(SUM(t.amount), 0) AS total_amount,
            COUNT(t.id) AS transaction_count
        FROM users u
        LEFT JOIN transactions t ON u.id = t.user_id
        GROUP BY u.id, u.email
        ORDER BY total_amount DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(conn)
    .await?;
    Ok(users)
}

/// Finds transactions whose amount strictly exceeds the 90th percentile of
/// the full unfiltered amount set, ordered by amount descending.
///
/// The percentile is recomputed over the live dataset on every call; there
/// is no caching layer. An empty table produces a NULL percentile, which
/// matches no row.
pub async fn suspicious_transactions(
    conn: &mut PgConnection,
    limit: i64,
) -> Result<Vec<SuspiciousRow>, DbError> {
    let transactions = sqlx::query_as::<_, SuspiciousRow>(
        r#"
        SELECT id, user_id, amount, created
        FROM transactions
        WHERE amount::float8 > (
            SELECT PERCENTILE_CONT(0.9) WITHIN GROUP (ORDER BY amount::float8)
            FROM transactions
        )
        ORDER BY amount DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(conn)
    .await?;
    Ok(transactions)
}

/// Fetches the most recent transactions still flagged as pending,
/// regardless of their paid flag.
pub async fn pending_transactions(
    conn: &mut PgConnection,
    limit: i64,
) -> Result<Vec<TransactionRow>, DbError> {
    let transactions = sqlx::query_as::<_, TransactionRow>(
        r#"
        SELECT id, user_id, amount, currency, subid, pending, paid, created, updated
        FROM transactions
        WHERE pending = true
        ORDER BY created DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(conn)
    .await?;
    Ok(transactions)
}

/// Fetches unpaid confirmed transactions: settled out of the pending state
/// but never marked paid.
pub async fn unpaid_transactions(
    conn: &mut PgConnection,
    limit: i64,
) -> Result<Vec<TransactionRow>, DbError> {
    let transactions = sqlx::query_as::<_, TransactionRow>(
        r#"
        SELECT id, user_id, amount, currency, subid, pending, paid, created, updated
        FROM transactions
        WHERE pending = false AND paid = false
        ORDER BY created DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(conn)
    .await?;
    Ok(transactions)
}
