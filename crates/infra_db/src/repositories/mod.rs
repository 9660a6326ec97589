//! Repository implementations
//!
//! Repositories encapsulate SQL queries and map between database rows and
//! row types. They know nothing about domain rules.

pub mod claims;

pub use claims::ClaimsRepository;
