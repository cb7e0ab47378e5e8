use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS accounts (
            username        TEXT PRIMARY KEY,
            password        TEXT NOT NULL,
            activated       INTEGER NOT NULL DEFAULT 0,
            activation_key  TEXT UNIQUE,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS account_authorities (
            username    TEXT NOT NULL REFERENCES accounts(username),
            authority   TEXT NOT NULL,
            PRIMARY KEY (username, authority)
        );

        -- One partition per status, one row per share event.
        CREATE TABLE IF NOT EXISTS shares (
            status_id   TEXT NOT NULL,
            shared_at   TEXT NOT NULL,
            username    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_shares_status
            ON shares(status_id, shared_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
