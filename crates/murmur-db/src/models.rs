/// Database row types — these map directly to SQLite rows.
/// Distinct from murmur-types models to keep the DB layer independent.

pub struct AccountRow {
    pub username: String,
    pub password: String,
    pub activated: bool,
    pub created_at: String,
}
