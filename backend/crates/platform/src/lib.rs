//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cookie parsing, building and a per-request cookie jar
//! - Client/transport identification from request headers

pub mod client;
pub mod cookie;
