use crate::models::AccountRow;
use crate::Database;
use anyhow::Result;
use chrono::SecondsFormat;
use murmur_types::models::ShareFact;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

impl Database {
    // -- Accounts --

    /// Insert an account together with its authorities in one transaction.
    pub fn create_account(
        &self,
        username: &str,
        password_hash: &str,
        activated: bool,
        activation_key: Option<&str>,
        authorities: &[&str],
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO accounts (username, password, activated, activation_key) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![username, password_hash, activated, activation_key],
            )?;
            for authority in authorities {
                tx.execute(
                    "INSERT INTO account_authorities (username, authority) VALUES (?1, ?2)",
                    (username, authority),
                )?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    pub fn account_exists(&self, username: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found = conn
                .query_row("SELECT 1 FROM accounts WHERE username = ?1", [username], |_| Ok(()))
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// Fetch an account row and its authorities. Both reads run inside one
    /// transaction so they see the same snapshot.
    pub fn get_account_with_authorities(
        &self,
        username: &str,
    ) -> Result<Option<(AccountRow, Vec<String>)>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let account = match query_account_by_username(&tx, username)? {
                Some(row) => row,
                None => return Ok(None),
            };
            let authorities = query_authorities(&tx, username)?;
            tx.commit()?;
            Ok(Some((account, authorities)))
        })
    }

    /// Activate the account holding `key`. Returns its username, or `None`
    /// when no account matches. Keys are single use.
    pub fn activate_account(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let username = conn
                .query_row(
                    "UPDATE accounts SET activated = 1, activation_key = NULL
                     WHERE activation_key = ?1
                     RETURNING username",
                    [key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(username)
        })
    }

    // -- Shares --

    pub fn insert_share(&self, fact: &ShareFact) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO shares (status_id, shared_at, username) VALUES (?1, ?2, ?3)",
                (
                    fact.status_id.to_string(),
                    fact.shared_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                    &fact.sharer_username,
                ),
            )?;
            Ok(())
        })
    }

    /// Usernames that shared `status_id`, oldest share first, at most `limit`.
    pub fn get_sharers(&self, status_id: &Uuid, limit: u32) -> Result<Vec<String>> {
        self.with_conn(|conn| query_sharers(conn, status_id, limit))
    }
}

fn query_account_by_username(conn: &Connection, username: &str) -> Result<Option<AccountRow>> {
    let mut stmt = conn.prepare(
        "SELECT username, password, activated, created_at FROM accounts WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            Ok(AccountRow {
                username: row.get(0)?,
                password: row.get(1)?,
                activated: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_authorities(conn: &Connection, username: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT authority FROM account_authorities WHERE username = ?1 ORDER BY authority",
    )?;

    let rows = stmt
        .query_map([username], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;

    Ok(rows)
}

fn query_sharers(conn: &Connection, status_id: &Uuid, limit: u32) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT username FROM shares
         WHERE status_id = ?1
         ORDER BY shared_at ASC, rowid ASC
         LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![status_id.to_string(), limit], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;

    Ok(rows)
}
