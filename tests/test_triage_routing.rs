//! End-to-end routing tests over the triage pipeline
//!
//! Uses the scripted mock provider so routing behavior is deterministic:
//! the first scripted response plays the classifier's label output, the
//! second plays the responder's text.

use atlas_triage::testing::mocks::MockLlmProvider;
use atlas_triage::triage::{
    Classifier, Inquiry, ResponderRegistry, Specialty, TriagePipeline, TriageStatus,
};
use std::sync::Arc;

fn pipeline_scripted(responses: Vec<&str>) -> TriagePipeline {
    let provider = Arc::new(MockLlmProvider::new(
        responses.into_iter().map(String::from).collect(),
    ));
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

fn scenario_inquiries() -> Vec<(Inquiry, Specialty)> {
    vec![
        (
            Inquiry::new(
                "CUST001",
                "LOAN12345",
                "I want to know when my next payment is due and check my balance.",
            ),
            Specialty::CustomerService,
        ),
        (
            Inquiry::new(
                "CUST002",
                "LOAN67890",
                "I need to submit income documents for a loan modification request.",
            ),
            Specialty::DocumentProcessor,
        ),
        (
            Inquiry::new(
                "CUST003",
                "LOAN11111",
                "I'm having trouble making payments and worried about foreclosure.",
            ),
            Specialty::RiskCompliance,
        ),
        (
            Inquiry::new(
                "CUST004",
                "LOAN22222",
                "I'm interested in refinancing my mortgage due to lower interest rates.",
            ),
            Specialty::PortfolioManager,
        ),
    ]
}

#[tokio::test]
async fn test_scenarios_route_to_expected_specialties() {
    // When the classifier model answers as prompted, each scenario lands
    // on its specialty.
    for (inquiry, expected) in scenario_inquiries() {
        let pipeline = pipeline_scripted(vec![expected.as_str(), "Here is your guidance."]);

        let outcome = pipeline.run(&inquiry).await.unwrap();

        assert_eq!(outcome.routed_to, expected, "inquiry: {}", inquiry.message);
        assert!(!outcome.classification.fell_back);
        assert_eq!(outcome.status, TriageStatus::Completed);
    }
}

#[tokio::test]
async fn test_valid_inquiries_complete_with_nonempty_response() {
    let pipeline = pipeline_scripted(vec![
        "customer_service",
        "Your payment is due on the first of each month.",
    ]);
    let inquiry = Inquiry::new("CUST001", "LOAN12345", "Payment question");

    let outcome = pipeline.run(&inquiry).await.unwrap();

    assert_eq!(outcome.status, TriageStatus::Completed);
    assert!(!outcome.final_response.is_empty());
}

#[tokio::test]
async fn test_out_of_set_labels_fall_back_deterministically() {
    let bad_labels = [
        "",
        "   \n",
        "underwriting",
        "customer service",
        "I would send this to risk_compliance for review",
        "CUSTOMER-SERVICE",
    ];

    for raw in bad_labels {
        let pipeline = pipeline_scripted(vec![raw, "Fallback guidance."]);
        let inquiry = Inquiry::new("CUST009", "LOAN99999", "Some inquiry");

        let outcome = pipeline.run(&inquiry).await.unwrap();

        assert_eq!(
            outcome.routed_to,
            Specialty::CustomerService,
            "raw label {raw:?} must resolve to the configured default"
        );
        assert!(outcome.classification.fell_back);
        assert_eq!(outcome.status, TriageStatus::Completed);
    }
}

#[tokio::test]
async fn test_case_and_whitespace_variants_do_not_fall_back() {
    for raw in ["RISK_COMPLIANCE", "  risk_compliance  ", "Risk_Compliance\n"] {
        let pipeline = pipeline_scripted(vec![raw, "Assistance program details."]);
        let inquiry = Inquiry::new("CUST003", "LOAN11111", "Foreclosure worry");

        let outcome = pipeline.run(&inquiry).await.unwrap();

        assert_eq!(outcome.routed_to, Specialty::RiskCompliance);
        assert!(!outcome.classification.fell_back);
    }
}

#[tokio::test]
async fn test_exactly_one_response_entry_keyed_by_routed_specialty() {
    // Both for a clean classification and for a fallback
    for labels in [vec!["portfolio_manager", "Rates answer."], vec!["???", "Default answer."]] {
        let pipeline = pipeline_scripted(labels);
        let inquiry = Inquiry::new("CUST004", "LOAN22222", "Refinancing");

        let outcome = pipeline.run(&inquiry).await.unwrap();

        assert_eq!(outcome.responses.len(), 1);
        assert!(outcome.responses.contains_key(&outcome.routed_to));
    }
}

#[tokio::test]
async fn test_provider_outage_fails_the_request_entirely() {
    // No partial results: the whole run errors when the provider is down.
    let provider = Arc::new(MockLlmProvider::with_failure());
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
    let pipeline = TriagePipeline::new(classifier, registry);

    let result = pipeline
        .run(&Inquiry::new("CUST001", "LOAN12345", "Payment question"))
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_empty_responder_output_is_never_an_empty_success() {
    let pipeline = pipeline_scripted(vec!["customer_service", "   "]);

    let result = pipeline
        .run(&Inquiry::new("CUST001", "LOAN12345", "Payment question"))
        .await;

    assert!(result.is_err());
}
