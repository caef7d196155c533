//! Inquiry triage core
//!
//! The classify-then-dispatch logic shared by every entry point:
//!
//! - `types` - immutable inquiry input, the closed specialty set, and the
//!   explicit per-stage result types.
//! - `classifier` - one LLM call selecting a specialty, with a configured
//!   default substituted for unrecognized output.
//! - `responder` - a single responder component configured per specialty.
//! - `registry` - specialty-to-responder lookup with defensive fallback.
//! - `pipeline` - the one entry point both drivers consume.

pub mod classifier;
pub mod pipeline;
pub mod registry;
pub mod responder;
pub mod types;

pub use classifier::Classifier;
pub use pipeline::TriagePipeline;
pub use registry::ResponderRegistry;
pub use responder::{Responder, SpecialtyProfile};
pub use types::{Classification, Inquiry, Specialty, TriageOutcome, TriageStatus};
