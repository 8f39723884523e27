//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (VerificationToken)
//! - Domain value objects (MinimumAge, PageContext, VerificationFact)
//! - Domain services (gate rules, date of birth validation)
//! - Port traits (TokenStore, Clock)

pub mod birth_date;
pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
