//! Wire DTOs for the verification endpoint

use serde::Serialize;

use crate::application::submit_verification::VerificationResult;

/// Form field that marks a request as a verification submission
pub const ACTION_FIELD: &str = "age_verification_action";
/// Value of [`ACTION_FIELD`] for a submission
pub const VERIFY_ACTION: &str = "verify_age";

/// Field carrying the yes/no answer
pub const CONFIRMED_FIELD: &str = "age_confirmed";
/// Field carrying the normalized date of birth
pub const BIRTH_DATE_FIELD: &str = "birth_date";

/// Form-encoded verification submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyForm {
    pub age_verification_action: Option<String>,
    /// "yes" or "no" (yes/no prompt)
    pub age_confirmed: Option<String>,
    /// `YYYY-MM-DD` (date of birth prompt)
    pub birth_date: Option<String>,
}

impl VerifyForm {
    /// Collect the known fields from decoded form pairs
    ///
    /// Repeated fields are allowed: the last value wins, except that the
    /// action stays `verify_age` once any pair carried it.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                ACTION_FIELD if !form.is_submission() => form.age_verification_action = Some(value),
                CONFIRMED_FIELD => form.age_confirmed = Some(value),
                BIRTH_DATE_FIELD => form.birth_date = Some(value),
                _ => {}
            }
        }
        form
    }

    pub fn is_submission(&self) -> bool {
        self.age_verification_action.as_deref() == Some(VERIFY_ACTION)
    }
}

/// JSON body returned by the verification endpoint
#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl From<VerificationResult> for VerifyResponse {
    fn from(result: VerificationResult) -> Self {
        Self {
            success: result.success,
            message: result.message,
            redirect: result.redirect,
        }
    }
}
