use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored row. `password` is the cipher token and opaque to the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CredentialRecord {
    pub id: i64,
    pub site: String,
    pub user: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
