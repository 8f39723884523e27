//! Prompt Injection
//!
//! Splices the prompt fragment into a rendered page right before the
//! closing body tag. Markup without that tag is served untouched.

/// Closing body tag, matched case-sensitively
pub const BODY_CLOSE_MARKER: &str = "</body>";

/// Insert `fragment` before the last closing body tag, if there is one
pub fn inject_before_body_close(body: &str, fragment: &str) -> Option<String> {
    let at = body.rfind(BODY_CLOSE_MARKER)?;

    let mut out = String::with_capacity(body.len() + fragment.len());
    out.push_str(&body[..at]);
    out.push_str(fragment);
    out.push_str(&body[at..]);
    Some(out)
}

/// Apply the gate decision to a rendered body
pub fn intercept(body: String, blocked: bool, fragment: &str) -> String {
    if !blocked {
        return body;
    }

    match inject_before_body_close(&body, fragment) {
        Some(gated) => gated,
        None => {
            tracing::debug!("No closing body tag, serving page without prompt");
            body
        }
    }
}
