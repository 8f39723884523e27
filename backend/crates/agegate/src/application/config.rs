//! Application Configuration
//!
//! Configuration snapshot for the age gate. It is built once (from the
//! environment or in code), validated, and then shared read-only behind an
//! `Arc` with every operation.

use std::collections::HashSet;
use std::env;
use std::time::Duration;

use crate::domain::birth_date::FieldOrder;
use crate::domain::services::GatePolicy;
use crate::domain::value_objects::{MinimumAge, PageId};
use crate::error::{GateError, GateResult};

/// Placeholder replaced by the minimum age in user-facing texts
pub const AGE_PLACEHOLDER: &str = "{age}";

/// Which prompt the visitor is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// Yes/no buttons
    Confirmation,
    /// Three date of birth fields
    DateOfBirth,
}

/// Presentation texts for the prompt fragment. The gate logic never reads these.
#[derive(Debug, Clone)]
pub struct PromptText {
    pub modal_title: String,
    pub modal_text: String,
    pub confirm_button_text: String,
    pub deny_button_text: String,
    pub date_picker_text: String,
    pub show_agreement: bool,
    pub agreement_text: String,
    pub privacy_policy_url: String,
    pub terms_of_use_url: String,
}

impl Default for PromptText {
    fn default() -> Self {
        Self {
            modal_title: "Please verify your age".to_string(),
            modal_text: "You must be {age} years or older to access this website.".to_string(),
            confirm_button_text: "I am {age} or older".to_string(),
            deny_button_text: "I am under {age}".to_string(),
            date_picker_text: "Please enter your date of birth:".to_string(),
            show_agreement: true,
            agreement_text: "By submitting this form, you agree to be bound by the Terms of Use and Privacy Policy".to_string(),
            privacy_policy_url: "/privacy-policy/".to_string(),
            terms_of_use_url: "/terms-of-use/".to_string(),
        }
    }
}

/// Age gate configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Master switch
    pub enabled: bool,
    /// Minimum age required to view gated pages
    pub minimum_age: MinimumAge,
    /// Name of the verification cookie
    pub cookie_name: String,
    /// Verification cookie lifetime
    pub cookie_lifetime: Duration,
    /// Date of birth prompt instead of yes/no buttons
    pub show_date_picker: bool,
    /// Field order of the date of birth prompt
    pub date_format: FieldOrder,
    /// Templates that are never gated
    pub excluded_templates: HashSet<String>,
    /// Pages that are never gated
    pub excluded_pages: HashSet<PageId>,
    /// Where denied visitors are sent
    pub redirect_url: String,
    /// Message for an empty date of birth
    pub invalid_date_text: String,
    /// Message for a denial; `{age}` is replaced
    pub underage_text: String,
    /// Largest form body inspected for a verification submission; larger
    /// bodies go to the host unread
    pub max_form_bytes: usize,
    pub prompt: PromptText,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            minimum_age: MinimumAge::DEFAULT,
            cookie_name: "age_verified".to_string(),
            cookie_lifetime: Duration::from_secs(2_592_000), // 30 days
            show_date_picker: false,
            date_format: FieldOrder::Mdy,
            excluded_templates: HashSet::new(),
            excluded_pages: HashSet::new(),
            redirect_url: "http://responsibility.org/".to_string(),
            invalid_date_text: "Please enter a valid date of birth.".to_string(),
            underage_text: "Sorry, you must be {age} years or older to access this website."
                .to_string(),
            max_form_bytes: 64 * 1024,
            prompt: PromptText::default(),
        }
    }
}

impl GateConfig {
    /// Load from `AGE_GATE_*` environment variables (after `.env`), falling back to defaults
    pub fn from_env() -> GateResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their default
    pub fn from_lookup<F>(lookup: F) -> GateResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("AGE_GATE_ENABLED") {
            config.enabled = parse_bool("AGE_GATE_ENABLED", &v)?;
        }
        if let Some(v) = lookup("AGE_GATE_MINIMUM_AGE") {
            config.minimum_age = v
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(MinimumAge::new)
                .ok_or_else(|| {
                    GateError::invalid_config(
                        "AGE_GATE_MINIMUM_AGE",
                        format!(
                            "expected {}..={}, got {:?}",
                            MinimumAge::MIN,
                            MinimumAge::MAX,
                            v
                        ),
                    )
                })?;
        }
        if let Some(v) = lookup("AGE_GATE_COOKIE_NAME") {
            config.cookie_name = v.trim().to_string();
        }
        if let Some(v) = lookup("AGE_GATE_COOKIE_LIFETIME") {
            let secs = v.trim().parse::<u64>().map_err(|e| {
                GateError::invalid_config("AGE_GATE_COOKIE_LIFETIME", e.to_string())
            })?;
            config.cookie_lifetime = Duration::from_secs(secs);
        }
        if let Some(v) = lookup("AGE_GATE_SHOW_DATE_PICKER") {
            config.show_date_picker = parse_bool("AGE_GATE_SHOW_DATE_PICKER", &v)?;
        }
        if let Some(v) = lookup("AGE_GATE_DATE_FORMAT") {
            config.date_format = v
                .parse()
                .map_err(|e| GateError::invalid_config("AGE_GATE_DATE_FORMAT", format!("{e}")))?;
        }
        if let Some(v) = lookup("AGE_GATE_EXCLUDED_TEMPLATES") {
            config.excluded_templates = split_list(&v).map(str::to_string).collect();
        }
        if let Some(v) = lookup("AGE_GATE_EXCLUDED_PAGES") {
            config.excluded_pages = split_list(&v)
                .map(|id| {
                    id.parse::<u64>().map(PageId).map_err(|e| {
                        GateError::invalid_config(
                            "AGE_GATE_EXCLUDED_PAGES",
                            format!("{id:?}: {e}"),
                        )
                    })
                })
                .collect::<GateResult<_>>()?;
        }
        if let Some(v) = lookup("AGE_GATE_REDIRECT_URL") {
            config.redirect_url = v.trim().to_string();
        }
        if let Some(v) = lookup("AGE_GATE_INVALID_DATE_TEXT") {
            config.invalid_date_text = v;
        }
        if let Some(v) = lookup("AGE_GATE_UNDERAGE_TEXT") {
            config.underage_text = v;
        }
        if let Some(v) = lookup("AGE_GATE_MAX_FORM_BYTES") {
            config.max_form_bytes = v.trim().parse::<usize>().map_err(|e| {
                GateError::invalid_config("AGE_GATE_MAX_FORM_BYTES", e.to_string())
            })?;
        }

        let prompt = &mut config.prompt;
        if let Some(v) = lookup("AGE_GATE_MODAL_TITLE") {
            prompt.modal_title = v;
        }
        if let Some(v) = lookup("AGE_GATE_MODAL_TEXT") {
            prompt.modal_text = v;
        }
        if let Some(v) = lookup("AGE_GATE_CONFIRM_TEXT") {
            prompt.confirm_button_text = v;
        }
        if let Some(v) = lookup("AGE_GATE_DENY_TEXT") {
            prompt.deny_button_text = v;
        }
        if let Some(v) = lookup("AGE_GATE_DATE_PICKER_TEXT") {
            prompt.date_picker_text = v;
        }
        if let Some(v) = lookup("AGE_GATE_SHOW_AGREEMENT") {
            prompt.show_agreement = parse_bool("AGE_GATE_SHOW_AGREEMENT", &v)?;
        }
        if let Some(v) = lookup("AGE_GATE_AGREEMENT_TEXT") {
            prompt.agreement_text = v;
        }
        if let Some(v) = lookup("AGE_GATE_PRIVACY_URL") {
            prompt.privacy_policy_url = v.trim().to_string();
        }
        if let Some(v) = lookup("AGE_GATE_TERMS_URL") {
            prompt.terms_of_use_url = v.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the gate unusable at request time
    pub fn validate(&self) -> GateResult<()> {
        if !platform::cookie::is_valid_cookie_name(&self.cookie_name) {
            return Err(GateError::invalid_config(
                "AGE_GATE_COOKIE_NAME",
                format!("{:?} is not a valid cookie name", self.cookie_name),
            ));
        }
        Ok(())
    }

    pub fn mode(&self) -> PromptMode {
        if self.show_date_picker {
            PromptMode::DateOfBirth
        } else {
            PromptMode::Confirmation
        }
    }

    pub fn policy(&self) -> GatePolicy<'_> {
        GatePolicy {
            enabled: self.enabled,
            excluded_templates: &self.excluded_templates,
            excluded_pages: &self.excluded_pages,
        }
    }

    /// Substitute `{age}` in a user-facing text
    pub fn with_age(&self, text: &str) -> String {
        text.replace(AGE_PLACEHOLDER, &self.minimum_age.to_string())
    }

    pub fn underage_message(&self) -> String {
        self.with_age(&self.underage_text)
    }
}

fn parse_bool(key: &'static str, value: &str) -> GateResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(GateError::invalid_config(
            key,
            format!("expected a boolean, got {other:?}"),
        )),
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = GateConfig::default();

        assert!(config.enabled);
        assert_eq!(config.minimum_age.years(), 18);
        assert_eq!(config.cookie_name, "age_verified");
        assert_eq!(config.cookie_lifetime, Duration::from_secs(2_592_000));
        assert_eq!(config.mode(), PromptMode::Confirmation);
        assert_eq!(config.date_format, FieldOrder::Mdy);
        assert_eq!(config.redirect_url, "http://responsibility.org/");
        assert_eq!(config.max_form_bytes, 64 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = GateConfig::from_lookup(lookup(&[
            ("AGE_GATE_ENABLED", "0"),
            ("AGE_GATE_MINIMUM_AGE", "21"),
            ("AGE_GATE_COOKIE_NAME", "adult"),
            ("AGE_GATE_COOKIE_LIFETIME", "86400"),
            ("AGE_GATE_SHOW_DATE_PICKER", "true"),
            ("AGE_GATE_DATE_FORMAT", "dmy"),
            ("AGE_GATE_EXCLUDED_TEMPLATES", "legal, contact,,"),
            ("AGE_GATE_EXCLUDED_PAGES", "1020,1021"),
            ("AGE_GATE_REDIRECT_URL", "https://example.org/"),
            ("AGE_GATE_MAX_FORM_BYTES", "1024"),
        ]))
        .unwrap();

        assert!(!config.enabled);
        assert_eq!(config.minimum_age.years(), 21);
        assert_eq!(config.cookie_name, "adult");
        assert_eq!(config.cookie_lifetime, Duration::from_secs(86_400));
        assert_eq!(config.mode(), PromptMode::DateOfBirth);
        assert_eq!(config.date_format, FieldOrder::Dmy);
        assert_eq!(config.excluded_templates.len(), 2);
        assert!(config.excluded_templates.contains("contact"));
        assert!(config.excluded_pages.contains(&PageId(1021)));
        assert_eq!(config.redirect_url, "https://example.org/");
        assert_eq!(config.max_form_bytes, 1024);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let cases: &[(&str, &str)] = &[
            ("AGE_GATE_MINIMUM_AGE", "0"),
            ("AGE_GATE_MINIMUM_AGE", "101"),
            ("AGE_GATE_MINIMUM_AGE", "eighteen"),
            ("AGE_GATE_COOKIE_LIFETIME", "-1"),
            ("AGE_GATE_ENABLED", "maybe"),
            ("AGE_GATE_DATE_FORMAT", "iso"),
            ("AGE_GATE_EXCLUDED_PAGES", "12,home"),
            ("AGE_GATE_COOKIE_NAME", "age verified"),
            ("AGE_GATE_MAX_FORM_BYTES", "64k"),
        ];

        for (key, value) in cases {
            let result = GateConfig::from_lookup(lookup(&[(*key, *value)]));
            assert!(
                matches!(result, Err(GateError::InvalidConfig { .. })),
                "{key}={value} should be rejected"
            );
        }
    }

    #[test]
    fn test_underage_message_substitutes_age() {
        let config = GateConfig {
            minimum_age: MinimumAge::new(21).unwrap(),
            ..Default::default()
        };
        assert_eq!(
            config.underage_message(),
            "Sorry, you must be 21 years or older to access this website."
        );
    }
}
