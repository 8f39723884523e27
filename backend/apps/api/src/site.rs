//! Demo Site
//!
//! A handful of pages standing in for a CMS. Each page handler tags its
//! response with a [`PageContext`] so the age gate can decide on it.

use agegate::PageContext;
use axum::Router;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;

struct Page {
    template: &'static str,
    id: u64,
    title: &'static str,
    body: &'static str,
}

const HOME: Page = Page {
    template: "home",
    id: 1,
    title: "Cellar Door",
    body: "<p>Small batch wines, delivered.</p>",
};

const ADMIN: Page = Page {
    template: "admin",
    id: 2,
    title: "Admin",
    body: "<p>Site administration.</p>",
};

const TERMS: Page = Page {
    template: "basic-page",
    id: 1020,
    title: "Terms of Use",
    body: "<p>Be nice.</p>",
};

const PRIVACY: Page = Page {
    template: "basic-page",
    id: 1021,
    title: "Privacy Policy",
    body: "<p>We keep one cookie.</p>",
};

/// Routes of the demo site
pub fn router() -> Router {
    Router::new()
        .route("/", get(|| async { render(&HOME) }))
        .route("/admin/", get(|| async { render(&ADMIN) }))
        .route("/terms-of-use/", get(|| async { render(&TERMS) }))
        .route("/privacy-policy/", get(|| async { render(&PRIVACY) }))
        .route("/health", get(|| async { "ok" }))
}

fn render(page: &Page) -> Response {
    let html = format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body><nav><a href=\"/\">Home</a> <a href=\"/terms-of-use/\">Terms</a> \
         <a href=\"/privacy-policy/\">Privacy</a></nav><h1>{title}</h1>{body}</body></html>",
        title = page.title,
        body = page.body,
    );

    let mut response = Html(html).into_response();
    response
        .extensions_mut()
        .insert(PageContext::new(page.template, page.id));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use agegate::{AgeGate, FixedClock, GateConfig, PageId, with_age_gate};
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use tower::ServiceExt;

    async fn fetch(app: Router, uri: &str) -> String {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn app(config: GateConfig) -> Router {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        with_age_gate(router(), AgeGate::new(config, clock))
    }

    #[tokio::test]
    async fn test_pages_are_tagged_and_gated() {
        let html = fetch(app(GateConfig::default()), "/").await;
        assert!(html.contains("<h1>Cellar Door</h1>"));
        assert!(html.contains("age-verification-overlay"));

        let html = fetch(app(GateConfig::default()), "/admin/").await;
        assert!(!html.contains("age-verification-overlay"));
    }

    #[tokio::test]
    async fn test_legal_pages_can_be_excluded() {
        let config = GateConfig {
            excluded_pages: [PageId(1020), PageId(1021)].into(),
            ..Default::default()
        };
        for uri in ["/terms-of-use/", "/privacy-policy/"] {
            let html = fetch(app(config.clone()), uri).await;
            assert!(!html.contains("age-verification-overlay"), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_health_is_never_gated() {
        assert_eq!(fetch(app(GateConfig::default()), "/health").await, "ok");
    }
}
