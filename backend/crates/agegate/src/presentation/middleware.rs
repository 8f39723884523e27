//! Age Gate Middleware
//!
//! Wires both lifecycle hooks around the host's handlers.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::repository::Clock;
use crate::presentation::hooks::{AgeGate, RequestStart};

/// Middleware for `axum::middleware::from_fn_with_state`
pub async fn age_gate<C>(State(gate): State<AgeGate<C>>, req: Request<Body>, next: Next) -> Response
where
    C: Clock + 'static,
{
    let (req, jar) = match gate.on_request_start(req).await {
        RequestStart::Continue(req, jar) => (req, jar),
        RequestStart::Respond(response) => return response,
    };

    let response = next.run(req).await;
    gate.on_response_ready(response, &jar).await
}
