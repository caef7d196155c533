//! Atlas Triage - mortgage servicing inquiry routing
//!
//! Routes a customer inquiry about a serviced loan to one of four
//! specialty responders based on an LLM classification step, then returns
//! the responder's generated text in a response envelope.
//!
//! # Overview
//!
//! - Classification and response generation go through the `LlmProvider`
//!   trait (Google Gemini in production, a scripted mock in tests)
//! - The specialty set is a closed enum; raw classifier output is parsed
//!   into it at exactly one boundary, with a configured default substituted
//!   for anything unrecognized
//! - One `TriagePipeline` entry point serves both the batch driver and the
//!   HTTP adapter
//!
//! # Quick Start
//!
//! ```rust
//! use atlas_triage::triage::{Inquiry, Specialty};
//!
//! let inquiry = Inquiry::new(
//!     "CUST001",
//!     "LOAN12345",
//!     "I want to know when my next payment is due.",
//! );
//! assert_eq!(inquiry.customer_id, "CUST001");
//!
//! // Raw classifier output is normalized and checked against the closed
//! // specialty set; anything else is None and a default is substituted.
//! assert_eq!(
//!     Specialty::parse_label("  Customer_Service\n"),
//!     Some(Specialty::CustomerService)
//! );
//! assert_eq!(Specialty::parse_label("escalation desk"), None);
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod llm;
pub mod observability;
pub mod server;
pub mod testing;
pub mod triage;

pub use config::TriageConfig;
pub use error::{TriageError, TriageResult};
pub use triage::{Classification, Inquiry, Specialty, TriageOutcome, TriagePipeline, TriageStatus};
