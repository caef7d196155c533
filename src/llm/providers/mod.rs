//! LLM provider implementations
//!
//! Concrete implementations of the LlmProvider trait.

pub mod gemini;

pub use gemini::*;
