//! Adapter implementations of the claims ports

pub mod memory;

pub use memory::InMemoryClaimRepository;
