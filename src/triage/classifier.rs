//! LLM-based inquiry classification
//!
//! One low-temperature completion call asks the model to name the specialty
//! that should handle an inquiry. The raw output is normalized and parsed
//! against the closed specialty set; anything unrecognized is replaced by
//! the configured default specialty. That substitution is silent toward the
//! caller by policy - classification errors are masked, not propagated -
//! but it is logged at WARN and flagged on the returned Classification.

use crate::error::{TriageError, TriageResult};
use crate::llm::provider::{CompletionRequest, LlmProvider, Message};
use crate::triage::types::{Classification, Inquiry, Specialty};
use std::sync::Arc;
use tracing::{debug, warn};

/// Classifier that selects a specialty for each inquiry
pub struct Classifier {
    provider: Arc<dyn LlmProvider>,
    model: String,
    /// Temperature for classification calls (default: 0.1 for consistency)
    temperature: f32,
    default_specialty: Specialty,
}

impl Classifier {
    /// Create a new classifier
    pub fn new(provider: Arc<dyn LlmProvider>, model: String, default_specialty: Specialty) -> Self {
        Self {
            provider,
            model,
            temperature: 0.1,
            default_specialty,
        }
    }

    /// Create classifier with custom temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build the classification prompt (pure function)
    fn build_classification_prompt(inquiry: &Inquiry) -> String {
        let mut catalog = String::new();
        for specialty in Specialty::ALL {
            catalog.push_str(&format!(
                "- {}: {}\n",
                specialty.as_str(),
                specialty.routing_description()
            ));
        }

        let label_list = Specialty::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"Analyze this customer inquiry and decide which specialty should handle it:

Customer ID: {}
Loan Number: {}
Inquiry: {}

Available specialties:
{}
Respond with ONLY the specialty name that should handle this: {}"#,
            inquiry.customer_id, inquiry.loan_number, inquiry.message, catalog, label_list
        )
    }

    /// Resolve raw model output into a classification (pure function)
    ///
    /// Unrecognized output maps to the default specialty with fell_back
    /// set; there is no retry or re-prompt.
    fn resolve_label(raw: &str, default_specialty: Specialty) -> Classification {
        match Specialty::parse_label(raw) {
            Some(specialty) => Classification {
                specialty,
                raw_label: raw.trim().to_string(),
                fell_back: false,
            },
            None => Classification {
                specialty: default_specialty,
                raw_label: raw.trim().to_string(),
                fell_back: true,
            },
        }
    }

    /// Classify an inquiry into exactly one specialty
    pub async fn classify(&self, inquiry: &Inquiry) -> TriageResult<Classification> {
        let request = CompletionRequest {
            messages: vec![
                Message::system(
                    "You are a mortgage servicing supervisor routing customer inquiries.",
                ),
                Message::user(Self::build_classification_prompt(inquiry)),
            ],
            model: self.model.clone(),
            max_tokens: Some(16),
            temperature: Some(self.temperature),
        };

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| TriageError::llm(e.to_string()))?;

        let raw = response.content.unwrap_or_default();
        let classification = Self::resolve_label(&raw, self.default_specialty);

        if classification.fell_back {
            warn!(
                customer_id = %inquiry.customer_id,
                loan_number = %inquiry.loan_number,
                raw_label = %classification.raw_label,
                fallback = %classification.specialty,
                "Classifier output unrecognized, substituting default specialty"
            );
        } else {
            debug!(
                customer_id = %inquiry.customer_id,
                specialty = %classification.specialty,
                "Inquiry classified"
            );
        }

        Ok(classification)
    }
}
