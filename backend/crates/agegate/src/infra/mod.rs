//! Infrastructure Layer
//!
//! Adapters for the domain ports: the request cookie jar as token store
//! and wall/fixed clocks.

pub mod clock;
pub mod cookie_jar;
