//! Specialty responders
//!
//! The four specialties differ only in their role instructions, so a single
//! Responder component is configured four ways through a SpecialtyProfile.
//! A responder is a pure function of the inquiry: one outbound completion
//! call merging the profile's instructions with the inquiry's three fields,
//! producing unconstrained natural-language text. Call failures are not
//! caught here; they propagate to the pipeline's caller.

use crate::error::{TriageError, TriageResult};
use crate::llm::provider::{CompletionRequest, LlmProvider, Message};
use crate::triage::types::{Inquiry, Specialty};
use std::sync::Arc;
use tracing::debug;

/// Role configuration for one specialty
#[derive(Debug, Clone, Copy)]
pub struct SpecialtyProfile {
    pub specialty: Specialty,
    /// System role the responder model assumes
    role: &'static str,
    /// How the inquiry text is labeled in the prompt
    message_label: &'static str,
    /// Role-specific guidance appended after the inquiry fields
    guidance: &'static str,
}

impl SpecialtyProfile {
    /// The profile for a given specialty
    pub fn of(specialty: Specialty) -> Self {
        match specialty {
            Specialty::CustomerService => Self {
                specialty,
                role: "You are a helpful mortgage customer service representative.",
                message_label: "Customer Question",
                guidance: "Provide a helpful response addressing their concern. Be professional and empathetic.\n\
                           For payment questions, explain next steps they can take.\n\
                           For account status, let them know how they can get current information.",
            },
            Specialty::DocumentProcessor => Self {
                specialty,
                role: "You are a mortgage document processing specialist.",
                message_label: "Request",
                guidance: "Provide guidance on:\n\
                           - What documents they need to submit\n\
                           - How to submit documents\n\
                           - Processing timelines\n\
                           - Next steps in the process\n\n\
                           Be clear and specific about requirements.",
            },
            Specialty::RiskCompliance => Self {
                specialty,
                role: "You are a mortgage risk and compliance specialist.",
                message_label: "Issue",
                guidance: "For delinquency issues, provide:\n\
                           - Available assistance programs\n\
                           - Steps to avoid foreclosure\n\
                           - Payment plan options\n\n\
                           For compliance matters, explain:\n\
                           - Regulatory protections\n\
                           - Customer rights\n\
                           - Proper procedures\n\n\
                           Be supportive and provide actionable guidance.",
            },
            Specialty::PortfolioManager => Self {
                specialty,
                role: "You are a mortgage portfolio management specialist.",
                message_label: "Inquiry",
                guidance: "For refinancing questions, explain:\n\
                           - Current market conditions\n\
                           - Qualification requirements\n\
                           - Potential benefits and costs\n\
                           - Application process\n\n\
                           For rate inquiries, provide:\n\
                           - How rates are determined\n\
                           - Rate change notifications\n\
                           - Options available\n\n\
                           Be informative and helpful in guiding their decision.",
            },
        }
    }
}

/// One responder, configured by its specialty profile
pub struct Responder {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    profile: SpecialtyProfile,
}

impl Responder {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: String,
        temperature: f32,
        max_tokens: u32,
        profile: SpecialtyProfile,
    ) -> Self {
        Self {
            provider,
            model,
            temperature,
            max_tokens,
            profile,
        }
    }

    /// The specialty this responder answers for
    pub fn specialty(&self) -> Specialty {
        self.profile.specialty
    }

    /// Build the response prompt (pure function)
    fn build_response_prompt(profile: &SpecialtyProfile, inquiry: &Inquiry) -> String {
        format!(
            "Help the customer with their inquiry:\n\n\
             Customer ID: {}\n\
             Loan Number: {}\n\
             {}: {}\n\n\
             {}",
            inquiry.customer_id,
            inquiry.loan_number,
            profile.message_label,
            inquiry.message,
            profile.guidance
        )
    }

    /// Generate the response text for an inquiry
    pub async fn respond(&self, inquiry: &Inquiry) -> TriageResult<String> {
        let request = CompletionRequest {
            messages: vec![
                Message::system(self.profile.role),
                Message::user(Self::build_response_prompt(&self.profile, inquiry)),
            ],
            model: self.model.clone(),
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        };

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| TriageError::llm(e.to_string()))?;

        let text = response.content.unwrap_or_default();
        if text.trim().is_empty() {
            return Err(TriageError::llm(format!(
                "Empty completion from {} responder",
                self.profile.specialty
            )));
        }

        debug!(
            specialty = %self.profile.specialty,
            chars = text.len(),
            "Responder produced reply"
        );

        Ok(text)
    }
}
