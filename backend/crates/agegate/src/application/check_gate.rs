//! Check Gate Use Case

use std::sync::Arc;

use crate::application::config::GateConfig;
use crate::application::verification_state::VerificationState;
use crate::domain::repository::{Clock, TokenStore};
use crate::domain::services::{GateOutcome, evaluate_gate};
use crate::domain::value_objects::PageContext;

/// Decide whether a page must show the prompt
pub struct CheckGateUseCase<C>
where
    C: Clock,
{
    config: Arc<GateConfig>,
    state: VerificationState<C>,
}

impl<C> CheckGateUseCase<C>
where
    C: Clock,
{
    pub fn new(config: Arc<GateConfig>, clock: Arc<C>) -> Self {
        let state = VerificationState::new(config.clone(), clock);
        Self { config, state }
    }

    pub fn evaluate<S: TokenStore>(&self, context: &PageContext, store: &S) -> GateOutcome {
        let outcome = evaluate_gate(context, self.config.policy(), self.state.fact(store));

        tracing::debug!(
            template = %context.template,
            page_id = %context.page_id,
            outcome = outcome.as_str(),
            "Age gate decision"
        );
        outcome
    }

    pub fn should_block<S: TokenStore>(&self, context: &PageContext, store: &S) -> bool {
        self.evaluate(context, store).blocks()
    }
}
