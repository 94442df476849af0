//! SQL DDL for initializing the password table.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT (monotonic, never reused)
/// - `site` and `user` as entered; `site` is a lookup key but not unique
/// - `password` holding the cipher token, never plaintext
/// - `created_at` / `updated_at` as RFC3339 text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS passwords (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    site TEXT NOT NULL,
    user TEXT NOT NULL,
    password TEXT NOT NULL,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL  -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_passwords_site ON passwords(site);
"#;
