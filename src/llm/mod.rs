//! LLM provider abstraction layer
//!
//! This module provides a provider-agnostic interface for LLM interactions.
//! The concrete backend is Google Gemini; the trait seam exists so the
//! triage pipeline can be tested against a scripted mock provider.

pub mod provider;
pub mod providers;

pub use provider::*;
pub use providers::*;
