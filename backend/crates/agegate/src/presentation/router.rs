//! Router integration

use axum::Router;
use axum::middleware::from_fn_with_state;

use crate::domain::repository::Clock;
use crate::presentation::hooks::AgeGate;
use crate::presentation::middleware::age_gate;

/// Put every route of `router` behind the age gate
pub fn with_age_gate<C>(router: Router, gate: AgeGate<C>) -> Router
where
    C: Clock + 'static,
{
    router.layer(from_fn_with_state(gate, age_gate::<C>))
}
