//! Database migrations
//!
//! Schema versioning for the credit state. Migrations are embedded; version 1
//! creates the provider and usage tables and seeds one row per provider so
//! routing never observes a missing record.

use chrono::Utc;
use domain::Codename;
use rusqlite::{Connection, params};
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_schema_version(conn)?;

    if current_version < SCHEMA_VERSION {
        info!(
            from_version = current_version,
            to_version = SCHEMA_VERSION,
            "Running database migrations"
        );

        if current_version < 1 {
            if let Err(e) = migrate_v1(conn) {
                error!(version = 1, error = %e, "Migration V001 (credit schema) failed");
                return Err(e);
            }
        }

        set_schema_version(conn, SCHEMA_VERSION)?;
        info!(version = SCHEMA_VERSION, "Database migrations complete");
    } else {
        debug!(version = current_version, "Database schema is up to date");
    }

    Ok(())
}

/// Get current schema version
fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    Ok(version)
}

/// Set schema version
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Default quota limits per provider, `(daily requests, monthly tokens)`.
/// 0 means unlimited; Nova is self-hosted and carries no quotas.
const fn default_limits(codename: Codename) -> (u64, u64) {
    match codename {
        Codename::Orion => (100, 500_000),
        Codename::Titan => (1_500, 1_000_000),
        Codename::Nova => (0, 0),
        Codename::Athena => (200, 500_000),
        Codename::Vox => (100, 100_000),
        Codename::Aether => (50, 50_000),
        Codename::Echo => (300, 0),
    }
}

/// Migration to version 1: credit schema and seed rows
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: credit schema");

    conn.execute_batch(
        "
        -- Per-provider quota state
        CREATE TABLE IF NOT EXISTS providers (
            codename TEXT PRIMARY KEY,
            credit_status INTEGER NOT NULL DEFAULT 1,
            daily_usage INTEGER NOT NULL DEFAULT 0,
            monthly_usage INTEGER NOT NULL DEFAULT 0,
            daily_limit INTEGER NOT NULL DEFAULT 0,
            monthly_limit INTEGER NOT NULL DEFAULT 0,
            last_reset_daily TEXT NOT NULL,
            last_reset_monthly TEXT NOT NULL,
            last_checked TEXT NOT NULL
        );

        -- Append-only usage log
        CREATE TABLE IF NOT EXISTS usage_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            provider TEXT NOT NULL,
            session_id TEXT NOT NULL,
            requests_made INTEGER NOT NULL,
            tokens_used INTEGER NOT NULL,
            timestamp TEXT NOT NULL
        );

        -- Indexes
        CREATE INDEX IF NOT EXISTS idx_usage_log_provider ON usage_log(provider);
        CREATE INDEX IF NOT EXISTS idx_usage_log_timestamp ON usage_log(timestamp);
        ",
    )?;

    let now = Utc::now().to_rfc3339();
    for codename in Codename::ALL {
        let (daily_limit, monthly_limit) = default_limits(codename);
        #[allow(clippy::cast_possible_wrap)] // limits are far below i64::MAX
        conn.execute(
            "INSERT OR IGNORE INTO providers (
                codename, credit_status, daily_usage, monthly_usage,
                daily_limit, monthly_limit,
                last_reset_daily, last_reset_monthly, last_checked
            ) VALUES (?1, 1, 0, 0, ?2, ?3, ?4, ?4, ?4)",
            params![
                codename.as_str(),
                daily_limit as i64,
                monthly_limit as i64,
                now,
            ],
        )?;
    }

    Ok(())
}
