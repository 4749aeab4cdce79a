//! Shared scalar aliases.

/// Surrogate key of every table (`BIGSERIAL`), also the wire id format.
pub type DbId = i64;

/// `TIMESTAMPTZ` columns, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
