//! Domain Value Objects
//!
//! Immutable value types for the age gate domain.

use std::fmt;

/// Template name reserved for the administrative UI, never gated
pub const ADMIN_TEMPLATE: &str = "admin";

/// Value the verification token carries once a visitor is verified
pub const VERIFIED_SENTINEL: &str = "1";

/// Minimum age a visitor must have reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MinimumAge(u8);

impl MinimumAge {
    pub const DEFAULT: MinimumAge = MinimumAge(18);
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    pub fn new(years: u8) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&years) {
            Some(Self(years))
        } else {
            None
        }
    }

    pub fn years(&self) -> u8 {
        self.0
    }
}

impl Default for MinimumAge {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for MinimumAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a page in the host site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the host tells the gate about the page being rendered
///
/// Host page handlers insert this into the response extensions; responses
/// without it are not pages and are never gated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub template: String,
    pub page_id: PageId,
}

impl PageContext {
    pub fn new(template: impl Into<String>, page_id: u64) -> Self {
        Self {
            template: template.into(),
            page_id: PageId(page_id),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.template == ADMIN_TEMPLATE
    }
}

/// The one fact remembered about a visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationFact {
    Verified,
    Unverified,
}

impl VerificationFact {
    /// Interpret a raw token value. Only the exact sentinel counts.
    pub fn from_token(value: Option<&str>) -> Self {
        match value {
            Some(VERIFIED_SENTINEL) => VerificationFact::Verified,
            _ => VerificationFact::Unverified,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationFact::Verified)
    }
}
