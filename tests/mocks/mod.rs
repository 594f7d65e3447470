//! Shared fixtures for integration tests

pub mod configs;
pub mod entities;

#[allow(unused_imports)]
pub use configs::test_settings;
#[allow(unused_imports)]
pub use entities::*;
