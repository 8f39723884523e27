//! Request Lifecycle Hooks
//!
//! The gate attaches to the host at two points:
//! - request start: answer verification submissions before any page renders
//! - response ready: splice the prompt into blocked HTML pages
//!
//! Both hooks share one [`CookieJar`] per request so a cookie issued at
//! request start is visible to the post-render decision of the same request.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{ConnectInfo, Form, FromRequest};
use axum::http::{HeaderMap, HeaderValue, Method, Request, header};
use axum::response::{IntoResponse, Response};
use platform::client::{detect_transport, extract_client_ip};
use platform::cookie::CookieJar;

use crate::application::check_gate::CheckGateUseCase;
use crate::application::config::GateConfig;
use crate::application::inject_prompt::intercept;
use crate::application::submit_verification::{Submission, SubmitVerificationUseCase};
use crate::domain::repository::Clock;
use crate::domain::value_objects::PageContext;
use crate::error::GateError;
use crate::presentation::dto::{VerifyForm, VerifyResponse};
use crate::presentation::prompt::{DefaultPrompt, PromptRenderer};

/// Largest page body buffered for prompt injection
pub const MAX_PAGE_BYTES: usize = 16 * 1024 * 1024;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Result of the request start hook
pub enum RequestStart {
    /// Not a submission; hand the (restored) request to the host
    Continue(Request<Body>, CookieJar),
    /// Submission answered; nothing else runs for this request
    Respond(Response),
}

/// Age gate bound to one configuration and clock
pub struct AgeGate<C>
where
    C: Clock,
{
    config: Arc<GateConfig>,
    clock: Arc<C>,
    fragment: Arc<str>,
}

impl<C> Clone for AgeGate<C>
where
    C: Clock,
{
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            clock: self.clock.clone(),
            fragment: self.fragment.clone(),
        }
    }
}

impl<C> AgeGate<C>
where
    C: Clock,
{
    /// Build with the built-in prompt
    pub fn new(config: GateConfig, clock: C) -> Self {
        Self::with_renderer(config, clock, &DefaultPrompt)
    }

    pub fn with_renderer<R: PromptRenderer>(config: GateConfig, clock: C, renderer: &R) -> Self {
        let fragment: Arc<str> = renderer.render(&config).into();
        Self {
            config: Arc::new(config),
            clock: Arc::new(clock),
            fragment,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Request start hook
    pub async fn on_request_start(&self, req: Request<Body>) -> RequestStart {
        let mut jar = CookieJar::from_headers(req.headers());

        // submissions are answered even when the gate is disabled
        if !is_form_post(req.method(), req.headers()) {
            return RequestStart::Continue(req, jar);
        }

        let limit = self.config.max_form_bytes;
        if content_length(req.headers()).is_some_and(|len| len > limit) {
            tracing::trace!(limit, "Form body over the buffering limit, passed on unread");
            return RequestStart::Continue(req, jar);
        }

        let (parts, body) = req.into_parts();
        let bytes = match axum::body::to_bytes(body, limit).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return RequestStart::Respond(GateError::FormBody(e.to_string()).into_response());
            }
        };

        let Some(form) = parse_form(bytes.clone()).await.filter(VerifyForm::is_submission) else {
            return RequestStart::Continue(Request::from_parts(parts, Body::from(bytes)), jar);
        };

        let direct_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());
        let client_ip = extract_client_ip(&parts.headers, direct_ip);
        let transport = detect_transport(&parts.headers, &parts.uri);

        tracing::debug!(
            client_ip = ?client_ip,
            path = %parts.uri.path(),
            "Age verification submission"
        );

        let submission =
            Submission::for_mode(self.config.mode(), form.age_confirmed, form.birth_date);
        let use_case = SubmitVerificationUseCase::new(self.config.clone(), self.clock.clone());
        let result = use_case.execute(submission, &mut jar, transport);

        let mut response = Json(VerifyResponse::from(result)).into_response();
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        jar.write_to(response.headers_mut());

        RequestStart::Respond(response)
    }

    /// Response ready hook
    pub async fn on_response_ready(&self, response: Response, jar: &CookieJar) -> Response {
        let Some(context) = response.extensions().get::<PageContext>().cloned() else {
            tracing::trace!("Response carries no page context, not gated");
            return response;
        };
        if !is_html(response.headers()) {
            return response;
        }

        let use_case = CheckGateUseCase::new(self.config.clone(), self.clock.clone());
        if !use_case.should_block(&context, jar) {
            return response;
        }

        let (mut parts, body) = response.into_parts();
        let bytes = match axum::body::to_bytes(body, MAX_PAGE_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => return GateError::PageBody(e.to_string()).into_response(),
        };

        let html = match String::from_utf8(bytes.to_vec()) {
            Ok(html) => html,
            Err(_) => {
                tracing::debug!(page_id = %context.page_id, "Page body is not UTF-8, serving untouched");
                return Response::from_parts(parts, Body::from(bytes));
            }
        };

        let gated = intercept(html, true, &self.fragment);
        parts.headers.remove(header::CONTENT_LENGTH);
        Response::from_parts(parts, Body::from(gated))
    }
}

fn is_form_post(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::POST && content_type_is(headers, FORM_CONTENT_TYPE)
}

fn is_html(headers: &HeaderMap) -> bool {
    content_type_is(headers, "text/html")
}

fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn content_type_is(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(expected))
}

/// Decode a buffered urlencoded body; `None` when it is not a valid form
async fn parse_form(bytes: Bytes) -> Option<VerifyForm> {
    let req = Request::builder()
        .method(Method::POST)
        .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(Body::from(bytes))
        .ok()?;

    Form::<Vec<(String, String)>>::from_request(req, &())
        .await
        .ok()
        .map(|Form(pairs)| VerifyForm::from_pairs(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_matching() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
        );
        assert!(is_form_post(&Method::POST, &headers));
        assert!(!is_form_post(&Method::GET, &headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("Text/HTML"));
        assert!(is_html(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(!is_html(&headers));
        assert!(!is_html(&HeaderMap::new()));
    }

    #[tokio::test]
    async fn test_parse_form() {
        let form = parse_form(Bytes::from_static(
            b"age_verification_action=verify_age&birth_date=2000-01-01&extra=1",
        ))
        .await
        .unwrap();
        assert!(form.is_submission());
        assert_eq!(form.birth_date.as_deref(), Some("2000-01-01"));
        assert_eq!(form.age_confirmed, None);

        let form = parse_form(Bytes::from_static(b"q=search")).await.unwrap();
        assert!(!form.is_submission());

        let form = parse_form(Bytes::from_static(
            b"age_verification_action=verify_age&age_verification_action=verify_age&age_confirmed=no&age_confirmed=yes",
        ))
        .await
        .unwrap();
        assert!(form.is_submission());
        assert_eq!(form.age_confirmed.as_deref(), Some("yes"));
    }

    #[test]
    fn test_content_length() {
        let mut headers = HeaderMap::new();
        assert_eq!(content_length(&headers), None);

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("42"));
        assert_eq!(content_length(&headers), Some(42));

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("lots"));
        assert_eq!(content_length(&headers), None);
    }
}
