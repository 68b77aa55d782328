//! PostgreSQL pool construction
//!
//! One pool per process, created at startup, carried in `AppState` and
//! closed after the server drains.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// How long a request waits for a free connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool options with the connection limit clamped to at least one.
pub fn pool_options(max_connections: u32) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Connect with [`DEFAULT_MAX_CONNECTIONS`].
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/sports_events").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Connect eagerly so a bad URL fails at startup rather than on first request.
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    let options = pool_options(max_connections);
    tracing::debug!(max_connections = options.get_max_connections(), "connecting to database");
    options.connect(database_url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_connections_clamped_to_one() {
        assert_eq!(pool_options(0).get_max_connections(), 1);
        assert_eq!(pool_options(DEFAULT_MAX_CONNECTIONS).get_max_connections(), 10);
        assert_eq!(pool_options(3).get_acquire_timeout(), ACQUIRE_TIMEOUT);
    }

    // Run with: DATABASE_URL=postgres://... cargo test -p sportsreg-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");

        let (one,): (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(one, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn small_pool_serves_many_tasks() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool_with_options(&url, 2)
            .await
            .expect("pool creation failed");

        let mut set = tokio::task::JoinSet::new();
        for i in 0..8i32 {
            let pool = pool.clone();
            set.spawn(async move {
                let (n,): (i32,) = sqlx::query_as("SELECT $1::int")
                    .bind(i)
                    .fetch_one(&pool)
                    .await
                    .expect("query failed");
                n
            });
        }

        let mut seen = Vec::new();
        while let Some(n) = set.join_next().await {
            seen.push(n.expect("task panicked"));
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }
}
