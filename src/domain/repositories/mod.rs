//! Storage traits; implementations live in `crate::infrastructure::persistence`,
//! mocks are generated by `mockall` for unit tests.

pub mod link_repository;

pub use link_repository::LinkRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
