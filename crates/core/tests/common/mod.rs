//! Shared fixtures and mock collaborators for the engine integration tests.

pub mod fixtures;
pub mod mocks;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mocks::*;
