//! Domain types for inquiry triage
//!
//! The inquiry is immutable input; each pipeline stage returns an explicit
//! result value instead of mutating a shared record. The specialty set is a
//! closed enum, so an invalid routing target is unrepresentable; raw
//! classifier text is parsed into the enum exactly once, at the
//! `Specialty::parse_label` boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A customer inquiry about a serviced loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inquiry {
    pub customer_id: String,
    pub loan_number: String,
    pub message: String,
}

impl Inquiry {
    pub fn new(
        customer_id: impl Into<String>,
        loan_number: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            loan_number: loan_number.into(),
            message: message.into(),
        }
    }
}

/// The closed set of specialty responders an inquiry can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    CustomerService,
    DocumentProcessor,
    RiskCompliance,
    PortfolioManager,
}

impl Specialty {
    /// Every specialty, in registry construction order
    pub const ALL: [Specialty; 4] = [
        Specialty::CustomerService,
        Specialty::DocumentProcessor,
        Specialty::RiskCompliance,
        Specialty::PortfolioManager,
    ];

    /// Wire/label form of the specialty name
    pub fn as_str(&self) -> &'static str {
        match self {
            Specialty::CustomerService => "customer_service",
            Specialty::DocumentProcessor => "document_processor",
            Specialty::RiskCompliance => "risk_compliance",
            Specialty::PortfolioManager => "portfolio_manager",
        }
    }

    /// One-line routing description shown to the classifier model
    pub fn routing_description(&self) -> &'static str {
        match self {
            Specialty::CustomerService => {
                "Payment questions, account status, general inquiries"
            }
            Specialty::DocumentProcessor => "Document uploads, loan modifications",
            Specialty::RiskCompliance => "Delinquency, fraud, compliance issues",
            Specialty::PortfolioManager => "Refinancing, rate changes, investment questions",
        }
    }

    /// Parse raw classifier output into a specialty
    ///
    /// This is the only place free-text label output crosses into the
    /// closed enum: input is trimmed, case-folded, and checked for set
    /// membership. Anything else is None and the caller applies its
    /// fallback policy.
    pub fn parse_label(raw: &str) -> Option<Specialty> {
        let normalized = raw.trim().to_lowercase();
        Specialty::ALL
            .iter()
            .copied()
            .find(|s| s.as_str() == normalized)
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-inquiry lifecycle status
///
/// pending --classify--> processing --respond--> completed. There is no
/// retry, cancelled, or partial-completion transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageStatus {
    Pending,
    Processing,
    Completed,
}

impl fmt::Display for TriageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TriageStatus::Pending => "pending",
            TriageStatus::Processing => "processing",
            TriageStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Result of the classification stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// The specialty selected for the inquiry, after fallback resolution
    pub specialty: Specialty,
    /// The classifier model's raw label output, kept for observability
    pub raw_label: String,
    /// True when the raw output did not match any specialty and the
    /// configured default was substituted
    pub fell_back: bool,
}

/// Result of a full triage run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageOutcome {
    /// The specialty whose responder produced the final text
    pub routed_to: Specialty,
    /// The classification stage result that selected it
    pub classification: Classification,
    /// Responder output keyed by specialty; exactly one entry per inquiry
    pub responses: HashMap<Specialty, String>,
    /// The text returned to the caller; non-empty on every success
    pub final_response: String,
    pub status: TriageStatus,
    pub received_at: DateTime<Utc>,
}
