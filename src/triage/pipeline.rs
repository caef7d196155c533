//! The triage pipeline
//!
//! Single entry point for running one inquiry through classify, dispatch,
//! respond, and assembly. Both the batch driver and the HTTP adapter call
//! this and nothing else, so the two surfaces cannot drift apart.

use crate::config::TriageConfig;
use crate::error::TriageResult;
use crate::llm::provider::LlmProvider;
use crate::triage::classifier::Classifier;
use crate::triage::registry::ResponderRegistry;
use crate::triage::types::{Inquiry, TriageOutcome, TriageStatus};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Classify-then-dispatch pipeline over a fixed responder registry
pub struct TriagePipeline {
    classifier: Classifier,
    registry: ResponderRegistry,
}

impl TriagePipeline {
    /// Assemble a pipeline from already-built stages
    pub fn new(classifier: Classifier, registry: ResponderRegistry) -> Self {
        Self {
            classifier,
            registry,
        }
    }

    /// Build the full pipeline from configuration and a provider
    pub fn from_config(config: &TriageConfig, provider: Arc<dyn LlmProvider>) -> Self {
        let default_specialty = config.default_specialty();

        let classifier = Classifier::new(
            provider.clone(),
            config.llm.model.clone(),
            default_specialty,
        )
        .with_temperature(config.routing.temperature);

        let registry = ResponderRegistry::for_provider(
            provider,
            &config.llm.model,
            config.llm.temperature,
            config.llm.max_tokens,
            default_specialty,
        );

        Self::new(classifier, registry)
    }

    /// Run one inquiry through the pipeline
    ///
    /// Exactly one responder runs per inquiry. A successful outcome always
    /// has status Completed, a non-empty final response, and a single
    /// responses entry keyed by the routed specialty.
    pub async fn run(&self, inquiry: &Inquiry) -> TriageResult<TriageOutcome> {
        let received_at = Utc::now();

        // pending -> processing
        let classification = self.classifier.classify(inquiry).await?;

        let (routed_to, responder) = self.registry.resolve(classification.specialty)?;

        // processing -> completed
        let text = responder.respond(inquiry).await?;

        let mut responses = HashMap::new();
        responses.insert(routed_to, text.clone());

        info!(
            customer_id = %inquiry.customer_id,
            loan_number = %inquiry.loan_number,
            routed_to = %routed_to,
            fell_back = classification.fell_back,
            "Inquiry triage completed"
        );

        Ok(TriageOutcome {
            routed_to,
            classification,
            responses,
            final_response: text,
            status: TriageStatus::Completed,
            received_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mocks::MockLlmProvider;
    use crate::triage::types::Specialty;

    fn pipeline_with(provider: Arc<MockLlmProvider>) -> TriagePipeline {
        let classifier = Classifier::new(
            provider.clone(),
            "mock-model".to_string(),
            Specialty::CustomerService,
        );
        let registry = ResponderRegistry::for_provider(
            provider,
            "mock-model",
            0.1,
            1024,
            Specialty::CustomerService,
        );
        TriagePipeline::new(classifier, registry)
    }

    fn inquiry() -> Inquiry {
        Inquiry::new(
            "CUST001",
            "LOAN12345",
            "I want to know when my next payment is due and check my balance.",
        )
    }

    #[tokio::test]
    async fn test_run_completes_with_routed_response() {
        let provider = Arc::new(MockLlmProvider::new(vec![
            "customer_service".to_string(),
            "Your next payment is due June 1st.".to_string(),
        ]));
        let pipeline = pipeline_with(provider);

        let outcome = pipeline.run(&inquiry()).await.unwrap();

        assert_eq!(outcome.status, TriageStatus::Completed);
        assert_eq!(outcome.routed_to, Specialty::CustomerService);
        assert_eq!(outcome.final_response, "Your next payment is due June 1st.");
        assert!(!outcome.classification.fell_back);
    }

    #[tokio::test]
    async fn test_run_populates_exactly_one_response_entry() {
        let provider = Arc::new(MockLlmProvider::new(vec![
            "document_processor".to_string(),
            "Please upload your income documents.".to_string(),
        ]));
        let pipeline = pipeline_with(provider);

        let outcome = pipeline.run(&inquiry()).await.unwrap();

        assert_eq!(outcome.responses.len(), 1);
        assert_eq!(
            outcome.responses.get(&outcome.routed_to).map(String::as_str),
            Some("Please upload your income documents.")
        );
    }

    #[tokio::test]
    async fn test_run_falls_back_on_unrecognized_label() {
        let provider = Arc::new(MockLlmProvider::new(vec![
            "I think the servicing desk should see this".to_string(),
            "Happy to help with your account.".to_string(),
        ]));
        let pipeline = pipeline_with(provider);

        let outcome = pipeline.run(&inquiry()).await.unwrap();

        assert_eq!(outcome.routed_to, Specialty::CustomerService);
        assert!(outcome.classification.fell_back);
        assert_eq!(outcome.status, TriageStatus::Completed);
        assert!(!outcome.final_response.is_empty());
    }

    #[tokio::test]
    async fn test_run_never_returns_empty_success() {
        // Classifier answers, responder produces an empty completion.
        let provider = Arc::new(MockLlmProvider::new(vec![
            "customer_service".to_string(),
            "".to_string(),
        ]));
        let pipeline = pipeline_with(provider);

        let result = pipeline.run(&inquiry()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_propagates_responder_failure() {
        // Classification succeeds against one provider; the responders use
        // a failing provider, so the pipeline error surfaces to the caller.
        let classify_provider = Arc::new(MockLlmProvider::single_response("risk_compliance"));
        let respond_provider = Arc::new(MockLlmProvider::with_failure());

        let classifier = Classifier::new(
            classify_provider,
            "mock-model".to_string(),
            Specialty::CustomerService,
        );
        let registry = ResponderRegistry::for_provider(
            respond_provider,
            "mock-model",
            0.1,
            1024,
            Specialty::CustomerService,
        );
        let pipeline = TriagePipeline::new(classifier, registry);

        let result = pipeline.run(&inquiry()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_from_config_builds_working_pipeline() {
        let config = TriageConfig::test_config();
        let provider = Arc::new(MockLlmProvider::new(vec![
            "portfolio_manager".to_string(),
            "Current rates favor refinancing.".to_string(),
        ]));
        let pipeline = TriagePipeline::from_config(&config, provider);

        let outcome = pipeline.run(&inquiry()).await.unwrap();

        assert_eq!(outcome.routed_to, Specialty::PortfolioManager);
        assert_eq!(outcome.final_response, "Current rates favor refinancing.");
    }
}
