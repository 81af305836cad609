//! Concrete backends for the traits the domain layer defines.
//!
//! - [`persistence`] - link repositories (PostgreSQL, in-memory)
//! - [`cache`] - response caches (Redis, in-process, disabled)

pub mod cache;
pub mod persistence;
