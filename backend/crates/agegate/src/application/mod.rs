//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod check_gate;
pub mod config;
pub mod inject_prompt;
pub mod submit_verification;
pub mod verification_state;
