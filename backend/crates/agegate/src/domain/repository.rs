//! Port Traits
//!
//! Interfaces the domain depends on. Implementations live in the infra layer.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::entities::VerificationToken;
use crate::error::GateResult;

/// Client-side token storage as seen from one request
pub trait TokenStore {
    /// Current value of a token, including tokens issued earlier in this request
    fn token(&self, name: &str) -> Option<&str>;

    /// Issue a token to the client
    fn issue(&mut self, token: &VerificationToken) -> GateResult<()>;
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date used for age computation
    fn today(&self) -> NaiveDate;
}
