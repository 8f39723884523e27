//! Submit Verification Use Case
//!
//! Transition function of the verification endpoint. Every outcome,
//! including internal failures, is a well-formed [`VerificationResult`].

use std::sync::Arc;

use platform::client::Transport;

use crate::application::config::{GateConfig, PromptMode};
use crate::application::verification_state::VerificationState;
use crate::domain::birth_date::is_of_age;
use crate::domain::repository::{Clock, TokenStore};
use crate::error::GateResult;

pub const SUCCESS_MESSAGE: &str = "Age verified successfully";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Value of `age_confirmed` that counts as a confirmation
pub const CONFIRMED_YES: &str = "yes";

/// Input for one verification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Yes/no prompt
    Confirmation { confirmed: Option<String> },
    /// Date of birth prompt
    BirthDate { birth_date: Option<String> },
}

impl Submission {
    /// Pick the submission shape for the configured prompt mode
    pub fn for_mode(mode: PromptMode, confirmed: Option<String>, birth_date: Option<String>) -> Self {
        match mode {
            PromptMode::Confirmation => Submission::Confirmation { confirmed },
            PromptMode::DateOfBirth => Submission::BirthDate { birth_date },
        }
    }
}

/// Output of one verification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub success: bool,
    pub message: String,
    pub redirect: Option<String>,
}

impl VerificationResult {
    fn verified() -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            redirect: None,
        }
    }

    fn rejected(message: String) -> Self {
        Self {
            success: false,
            message,
            redirect: None,
        }
    }

    fn denied(config: &GateConfig) -> Self {
        Self {
            success: false,
            message: config.underage_message(),
            redirect: Some(config.redirect_url.clone()),
        }
    }

    pub fn internal_error() -> Self {
        Self::rejected(GENERIC_ERROR_MESSAGE.to_string())
    }
}

/// Submit Verification Use Case
pub struct SubmitVerificationUseCase<C>
where
    C: Clock,
{
    config: Arc<GateConfig>,
    clock: Arc<C>,
    state: VerificationState<C>,
}

impl<C> SubmitVerificationUseCase<C>
where
    C: Clock,
{
    pub fn new(config: Arc<GateConfig>, clock: Arc<C>) -> Self {
        let state = VerificationState::new(config.clone(), clock.clone());
        Self {
            config,
            clock,
            state,
        }
    }

    pub fn execute<S: TokenStore>(
        &self,
        submission: Submission,
        store: &mut S,
        transport: Transport,
    ) -> VerificationResult {
        match self.try_execute(submission, store, transport) {
            Ok(result) => result,
            Err(e) => {
                e.log();
                VerificationResult::internal_error()
            }
        }
    }

    fn try_execute<S: TokenStore>(
        &self,
        submission: Submission,
        store: &mut S,
        transport: Transport,
    ) -> GateResult<VerificationResult> {
        match submission {
            Submission::BirthDate { birth_date } => {
                let birth_date = birth_date.unwrap_or_default();
                let birth_date = birth_date.trim();

                if birth_date.is_empty() {
                    tracing::info!("Age verification rejected: empty date of birth");
                    return Ok(VerificationResult::rejected(
                        self.config.invalid_date_text.clone(),
                    ));
                }

                let today = self.clock.today();
                if is_of_age(
                    birth_date,
                    self.config.minimum_age,
                    self.config.date_format,
                    today,
                ) {
                    self.state.mark_verified(store, transport)?;
                    tracing::info!(mode = "date_of_birth", "Age verified");
                    Ok(VerificationResult::verified())
                } else {
                    tracing::info!(mode = "date_of_birth", "Age verification denied");
                    Ok(VerificationResult::denied(&self.config))
                }
            }
            Submission::Confirmation { confirmed } => {
                if confirmed.as_deref() == Some(CONFIRMED_YES) {
                    self.state.mark_verified(store, transport)?;
                    tracing::info!(mode = "confirmation", "Age verified");
                    Ok(VerificationResult::verified())
                } else {
                    tracing::info!(mode = "confirmation", "Age verification denied");
                    Ok(VerificationResult::denied(&self.config))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::VerificationToken;
    use crate::error::GateError;
    use crate::infra::clock::FixedClock;
    use chrono::NaiveDate;
    use platform::cookie::{CookieError, CookieJar};

    /// Store whose writes always fail
    struct BrokenStore;

    impl TokenStore for BrokenStore {
        fn token(&self, _name: &str) -> Option<&str> {
            None
        }

        fn issue(&mut self, token: &VerificationToken) -> GateResult<()> {
            Err(GateError::Cookie(CookieError::InvalidHeader(token.name.clone())))
        }
    }

    fn use_case(config: GateConfig) -> SubmitVerificationUseCase<FixedClock> {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        SubmitVerificationUseCase::new(Arc::new(config), Arc::new(FixedClock::on(today)))
    }

    fn birth_date(text: &str) -> Submission {
        Submission::BirthDate {
            birth_date: Some(text.to_string()),
        }
    }

    #[test]
    fn test_store_failure_becomes_generic_error() {
        let result = use_case(GateConfig::default()).execute(
            Submission::Confirmation {
                confirmed: Some("yes".to_string()),
            },
            &mut BrokenStore,
            Transport::PLAIN,
        );
        assert_eq!(result, VerificationResult::internal_error());
        assert_eq!(result.message, GENERIC_ERROR_MESSAGE);
        assert!(result.redirect.is_none());
    }

    #[test]
    fn test_denial_leaves_store_untouched() {
        let mut jar = CookieJar::default();
        let result = use_case(GateConfig::default()).execute(
            birth_date("2010-01-01"),
            &mut jar,
            Transport::PLAIN,
        );
        assert!(!result.success);
        assert!(jar.pending().is_empty());
    }

    #[test]
    fn test_configured_field_order_applies() {
        let config = GateConfig {
            show_date_picker: true,
            date_format: crate::domain::birth_date::FieldOrder::Dmy,
            ..Default::default()
        };
        let mut jar = CookieJar::default();

        // 15/06/2006 in day-month-year is exactly 18 years on 2024-06-15
        let result = use_case(config).execute(birth_date("15/06/2006"), &mut jar, Transport::PLAIN);
        assert!(result.success);
        assert_eq!(jar.get("age_verified"), Some("1"));
    }

    #[test]
    fn test_for_mode_picks_the_active_field() {
        let submission = Submission::for_mode(
            PromptMode::DateOfBirth,
            Some("yes".to_string()),
            Some("2000-01-01".to_string()),
        );
        assert_eq!(submission, birth_date("2000-01-01"));
    }
}
