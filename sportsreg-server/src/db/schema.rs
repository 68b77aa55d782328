//! Schema bootstrap: idempotent table creation and the seeded admin account

use sqlx::{PgConnection, PgPool};

use crate::auth::hash_password;
use crate::config::BootstrapAdmin;
use crate::models::{Email, Role};
use crate::Result;

/// Advisory lock key serializing concurrent schema runs
const SCHEMA_LOCK_KEY: i64 = 0x5370_6f72_7473;

/// Create enum types, tables and indexes if they don't exist.
/// Runs in one transaction under an advisory lock.
pub async fn run(pool: &PgPool) -> Result<()> {
    tracing::info!("Running schema migrations...");

    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    // CREATE TYPE has no IF NOT EXISTS
    sqlx::query(
        r#"
        DO $$ BEGIN
            CREATE TYPE user_role AS ENUM ('user', 'admin');
        EXCEPTION
            WHEN duplicate_object THEN NULL;
        END $$
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        DO $$ BEGIN
            CREATE TYPE participation_status AS ENUM ('registered', 'participated', 'absent');
        EXCEPTION
            WHEN duplicate_object THEN NULL;
        END $$
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT NOT NULL,
            password TEXT NOT NULL,
            role user_role NOT NULL DEFAULT 'user',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id BIGSERIAL PRIMARY KEY,
            event_name TEXT NOT NULL,
            sport_type TEXT NOT NULL,
            event_date TIMESTAMPTZ NOT NULL,
            venue TEXT NOT NULL,
            registration_deadline TIMESTAMPTZ NOT NULL,
            description TEXT,
            created_by BIGINT REFERENCES users(id) ON DELETE SET NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS registrations (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            event_id BIGINT NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            registered_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            participation_status participation_status NOT NULL DEFAULT 'registered',
            CONSTRAINT unique_registration UNIQUE (user_id, event_id)
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS feedback (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            event_id BIGINT NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            rating INT NOT NULL CHECK (rating >= 1 AND rating <= 5),
            comment TEXT,
            submitted_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT unique_feedback UNIQUE (user_id, event_id)
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    create_indexes(&mut *tx).await?;
    tx.commit().await?;

    tracing::info!("Schema migrations complete");
    Ok(())
}

async fn create_indexes(conn: &mut PgConnection) -> Result<()> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_date ON events(event_date)")
        .execute(&mut *conn)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_registrations_event ON registrations(event_id)")
        .execute(&mut *conn)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_feedback_event ON feedback(event_id)")
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Seed the bootstrap admin. Existing accounts with that email are left
/// untouched. Returns whether a row was inserted.
pub async fn seed_admin(pool: &PgPool, admin: &BootstrapAdmin) -> Result<bool> {
    let email = Email::new(&admin.email)?;
    let password = admin.password.clone();
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| crate::Error::Internal(format!("hashing task failed: {}", e)))??;

    let result = sqlx::query(
        r#"
        INSERT INTO users (name, email, phone, password, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(&admin.name)
    .bind(email.as_str())
    .bind(&admin.phone)
    .bind(hash)
    .bind(Role::Admin)
    .execute(pool)
    .await?;

    let seeded = result.rows_affected() == 1;
    if seeded {
        tracing::info!(email = %email.as_str(), "Bootstrap admin created");
    } else {
        tracing::debug!(email = %email.as_str(), "Bootstrap admin already present");
    }
    Ok(seeded)
}

/// Run migrations then seed the admin account.
pub async fn bootstrap(pool: &PgPool, admin: &BootstrapAdmin) -> Result<()> {
    run(pool).await?;
    seed_admin(pool, admin).await?;
    Ok(())
}
