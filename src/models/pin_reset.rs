use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The pending reset grant embedded in a user's record.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinReset {
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PinReset {
    pub const TTL_MINUTES: i64 = 20;

    pub fn new(token_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            token_hash,
            created_at: now,
            expires_at: now + Duration::minutes(Self::TTL_MINUTES),
        }
    }

    /// Valid up to and including `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
