//! Verification State
//!
//! Reads and records the visitor's verification fact through a token store.
//! There is no revoke: the fact only reverts when the client
//! drops or expires the token.

use std::sync::Arc;

use platform::client::Transport;

use crate::application::config::GateConfig;
use crate::domain::entities::VerificationToken;
use crate::domain::repository::{Clock, TokenStore};
use crate::domain::value_objects::VerificationFact;
use crate::error::GateResult;

pub struct VerificationState<C>
where
    C: Clock,
{
    config: Arc<GateConfig>,
    clock: Arc<C>,
}

impl<C> VerificationState<C>
where
    C: Clock,
{
    pub fn new(config: Arc<GateConfig>, clock: Arc<C>) -> Self {
        Self { config, clock }
    }

    pub fn fact<S: TokenStore>(&self, store: &S) -> VerificationFact {
        VerificationFact::from_token(store.token(&self.config.cookie_name))
    }

    pub fn is_verified<S: TokenStore>(&self, store: &S) -> bool {
        self.fact(store).is_verified()
    }

    /// Issue the verification token; later reads from the same store see it
    pub fn mark_verified<S: TokenStore>(&self, store: &mut S, transport: Transport) -> GateResult<()> {
        let token = VerificationToken::new(
            self.config.cookie_name.clone(),
            self.config.cookie_lifetime,
            self.clock.now(),
            transport,
        );
        store.issue(&token)?;

        tracing::debug!(
            cookie = %token.name,
            expires_at = %token.expires_at,
            secure = token.secure,
            "Issued verification token"
        );
        Ok(())
    }
}
