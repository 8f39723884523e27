//! Domain Entities
//!
//! Core entities for the age gate domain.

use chrono::{DateTime, Duration, Utc};
use platform::client::Transport;

use crate::domain::value_objects::VERIFIED_SENTINEL;

/// Verification token issued to a visitor who passed the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationToken {
    pub name: String,
    pub value: &'static str,
    pub expires_at: DateTime<Utc>,
    pub max_age_secs: i64,
    pub secure: bool,
}

impl VerificationToken {
    /// Create a token valid for `lifetime` from `now`
    pub fn new(
        name: impl Into<String>,
        lifetime: std::time::Duration,
        now: DateTime<Utc>,
        transport: Transport,
    ) -> Self {
        let max_age_secs = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);
        let expires_at = Duration::try_seconds(max_age_secs)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            name: name.into(),
            value: VERIFIED_SENTINEL,
            expires_at,
            max_age_secs,
            secure: transport.encrypted,
        }
    }
}
