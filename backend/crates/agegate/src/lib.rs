//! Age Gate Module
//!
//! Content gate that keeps rendered pages behind an age prompt until the
//! visitor has verified once.
//!
//! Clean Architecture structure:
//! - `domain/` - Gate rules, date of birth validation, ports
//! - `application/` - Configuration and use cases
//! - `infra/` - Cookie-backed token store, clocks
//! - `presentation/` - Prompt fragment, lifecycle hooks, axum middleware
//!
//! ## Protocol
//! - Page handlers tag their responses with a [`PageContext`] extension.
//! - Blocked HTML pages get the prompt spliced in before `</body>`.
//! - The prompt posts `age_verification_action=verify_age` back to the page
//!   and receives `{"success", "message", "redirect"?}` as JSON.
//! - A successful verification sets the `age_verified=1` cookie.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{GateConfig, PromptMode, PromptText};
pub use domain::birth_date::FieldOrder;
pub use domain::value_objects::{MinimumAge, PageContext, PageId};
pub use error::{GateError, GateResult};
pub use infra::clock::{FixedClock, SystemClock};
pub use presentation::{AgeGate, DefaultPrompt, PromptRenderer, age_gate, with_age_gate};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
