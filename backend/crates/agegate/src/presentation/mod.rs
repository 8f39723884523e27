//! Presentation Layer
//!
//! Wire DTOs, prompt fragment, lifecycle hooks and middleware.

pub mod dto;
pub mod hooks;
pub mod middleware;
pub mod prompt;
pub mod router;

pub use hooks::{AgeGate, RequestStart};
pub use middleware::age_gate;
pub use prompt::{DefaultPrompt, PromptRenderer};
pub use router::with_age_gate;
