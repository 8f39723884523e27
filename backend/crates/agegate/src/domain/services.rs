//! Domain Services
//!
//! Pure gate rules: decide whether a page must show the verification prompt.

use std::collections::HashSet;

use crate::domain::value_objects::{PageContext, PageId, VerificationFact};

/// The configuration slice the gate rules read
#[derive(Debug, Clone, Copy)]
pub struct GatePolicy<'a> {
    pub enabled: bool,
    pub excluded_templates: &'a HashSet<String>,
    pub excluded_pages: &'a HashSet<PageId>,
}

/// Which rule settled the gate decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Disabled,
    AdminTemplate,
    ExcludedTemplate,
    ExcludedPage,
    AlreadyVerified,
    Block,
}

impl GateOutcome {
    pub fn blocks(&self) -> bool {
        matches!(self, GateOutcome::Block)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GateOutcome::Disabled => "disabled",
            GateOutcome::AdminTemplate => "admin_template",
            GateOutcome::ExcludedTemplate => "excluded_template",
            GateOutcome::ExcludedPage => "excluded_page",
            GateOutcome::AlreadyVerified => "already_verified",
            GateOutcome::Block => "block",
        }
    }
}

/// Evaluate the gate rules in order, stopping at the first match
///
/// The admin template check is fixed and independent of the configurable
/// exclusion list.
pub fn evaluate_gate(
    context: &PageContext,
    policy: GatePolicy<'_>,
    fact: VerificationFact,
) -> GateOutcome {
    if !policy.enabled {
        return GateOutcome::Disabled;
    }
    if context.is_admin() {
        return GateOutcome::AdminTemplate;
    }
    if policy.excluded_templates.contains(&context.template) {
        return GateOutcome::ExcludedTemplate;
    }
    if policy.excluded_pages.contains(&context.page_id) {
        return GateOutcome::ExcludedPage;
    }
    if fact.is_verified() {
        return GateOutcome::AlreadyVerified;
    }
    GateOutcome::Block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy<'a>(
        enabled: bool,
        templates: &'a HashSet<String>,
        pages: &'a HashSet<PageId>,
    ) -> GatePolicy<'a> {
        GatePolicy {
            enabled,
            excluded_templates: templates,
            excluded_pages: pages,
        }
    }

    #[test]
    fn test_rule_order() {
        let templates: HashSet<String> = ["legal".to_string()].into();
        let pages: HashSet<PageId> = [PageId(1020)].into();

        // excluded template on an excluded page reports the template rule first
        let ctx = PageContext::new("legal", 1020);
        assert_eq!(
            evaluate_gate(&ctx, policy(true, &templates, &pages), VerificationFact::Unverified),
            GateOutcome::ExcludedTemplate
        );

        let ctx = PageContext::new("basic-page", 1020);
        assert_eq!(
            evaluate_gate(&ctx, policy(true, &templates, &pages), VerificationFact::Unverified),
            GateOutcome::ExcludedPage
        );

        let ctx = PageContext::new("basic-page", 1);
        assert_eq!(
            evaluate_gate(&ctx, policy(true, &templates, &pages), VerificationFact::Verified),
            GateOutcome::AlreadyVerified
        );
        assert_eq!(
            evaluate_gate(&ctx, policy(true, &templates, &pages), VerificationFact::Unverified),
            GateOutcome::Block
        );
        assert_eq!(
            evaluate_gate(&ctx, policy(false, &templates, &pages), VerificationFact::Unverified),
            GateOutcome::Disabled
        );
    }

    #[test]
    fn test_admin_template_not_listed() {
        let empty_templates = HashSet::new();
        let empty_pages = HashSet::new();
        let ctx = PageContext::new("admin", 2);

        let outcome = evaluate_gate(
            &ctx,
            policy(true, &empty_templates, &empty_pages),
            VerificationFact::Unverified,
        );
        assert_eq!(outcome, GateOutcome::AdminTemplate);
        assert!(!outcome.blocks());
    }
}
