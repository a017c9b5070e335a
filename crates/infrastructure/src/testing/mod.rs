//! Testing utilities for database-backed tests.
//!
//! Starts a throwaway PostgreSQL container through testcontainers. Tests using
//! it are marked `#[ignore]` because they need a running Docker daemon.

mod containers;

pub use containers::{ContainerError, PostgresContainer, PostgresContainerConfig};
