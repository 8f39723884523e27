//! Cookie-backed token store

use platform::cookie::{CookieConfig, CookieJar, SameSite};

use crate::domain::entities::VerificationToken;
use crate::domain::repository::TokenStore;
use crate::error::GateResult;

impl TokenStore for CookieJar {
    fn token(&self, name: &str) -> Option<&str> {
        self.get(name)
    }

    fn issue(&mut self, token: &VerificationToken) -> GateResult<()> {
        self.add(&cookie_config(token), token.value)?;
        Ok(())
    }
}

/// Cookie attributes for a verification token: site-wide, script-inaccessible, lax
fn cookie_config(token: &VerificationToken) -> CookieConfig {
    CookieConfig {
        name: token.name.clone(),
        secure: token.secure,
        http_only: true,
        same_site: SameSite::Lax,
        path: "/".to_string(),
        max_age_secs: Some(token.max_age_secs),
        expires: Some(token.expires_at),
    }
}
