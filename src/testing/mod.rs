//! Testing utilities and mock implementations
//!
//! Mock LLM provider used by unit and integration tests so no live
//! generation service is required.

pub mod mocks;

pub use mocks::*;
