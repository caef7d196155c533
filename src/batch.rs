//! Batch scenario driver
//!
//! Runs a fixed list of representative inquiries through the pipeline
//! sequentially and prints each stage's output. Purely illustrative: a
//! failed scenario is printed and the run continues.

use crate::triage::{Inquiry, TriagePipeline};

/// The fixed demonstration scenarios
pub fn scenarios() -> Vec<Inquiry> {
    vec![
        Inquiry::new(
            "CUST001",
            "LOAN12345",
            "I want to know when my next payment is due and check my balance.",
        ),
        Inquiry::new(
            "CUST002",
            "LOAN67890",
            "I need to submit income documents for a loan modification request.",
        ),
        Inquiry::new(
            "CUST003",
            "LOAN11111",
            "I'm having trouble making payments and worried about foreclosure.",
        ),
        Inquiry::new(
            "CUST004",
            "LOAN22222",
            "I'm interested in refinancing my mortgage due to lower interest rates.",
        ),
    ]
}

/// Run every scenario, printing stage output; returns (completed, failed)
pub async fn run_batch(pipeline: &TriagePipeline) -> (usize, usize) {
    let mut completed = 0;
    let mut failed = 0;

    for (i, inquiry) in scenarios().iter().enumerate() {
        println!("--- Scenario {} ---", i + 1);
        println!("Customer: {}", inquiry.customer_id);
        println!("Loan: {}", inquiry.loan_number);
        println!("Inquiry: {}", inquiry.message);

        match pipeline.run(inquiry).await {
            Ok(outcome) => {
                let fallback_note = if outcome.classification.fell_back {
                    " (fallback)"
                } else {
                    ""
                };
                println!("Routed to: {}{}", outcome.routed_to, fallback_note);
                println!("Response: {}", outcome.final_response);
                println!("Status: {}", outcome.status);
                completed += 1;
            }
            Err(e) => {
                println!("Error: {e}");
                failed += 1;
            }
        }

        println!("{}", "=".repeat(50));
    }

    (completed, failed)
}
