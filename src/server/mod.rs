//! HTTP adapter for the triage pipeline
//!
//! A synchronous request/response surface over `TriagePipeline`:
//!
//! - `POST /inquiries` - triage one inquiry and return the response envelope
//! - `GET /health` - service status (configured or not)
//! - `GET /live` - liveness probe
//!
//! Every response carries permissive CORS headers; preflight requests are
//! answered by the CORS layer and never reach triage logic. Error payloads
//! expose only a sanitized message, never internal type names.
//!
//! The credential check is per request: when no API key was available at
//! startup the server still runs, with an empty pipeline slot, and every
//! inquiry is answered with a configuration error.

use crate::error::TriageError;
use crate::triage::{Inquiry, Specialty, TriageOutcome, TriagePipeline, TriageStatus};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, Instrument};
use uuid::Uuid;
use warp::http::StatusCode;
use warp::Filter;

/// Wire format of an inquiry request body
///
/// Fields are optional at the serde layer so field presence can be
/// validated explicitly with a stable error message.
#[derive(Debug, Clone, Deserialize)]
pub struct InquiryRequest {
    pub customer_id: Option<String>,
    pub loan_number: Option<String>,
    pub inquiry_message: Option<String>,
}

/// Success envelope returned to the caller
#[derive(Debug, Serialize)]
struct InquiryEnvelope {
    customer_id: String,
    loan_number: String,
    routed_to: Specialty,
    response: String,
    status: TriageStatus,
}

impl InquiryEnvelope {
    fn from_outcome(inquiry: &Inquiry, outcome: TriageOutcome) -> Self {
        Self {
            customer_id: inquiry.customer_id.clone(),
            loan_number: inquiry.loan_number.clone(),
            routed_to: outcome.routed_to,
            response: outcome.final_response,
            status: outcome.status,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: String,
}

#[derive(Debug, Serialize)]
struct DiagnosticEnvelope {
    message: String,
    service: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct HealthEnvelope {
    status: String,
    service: String,
    configured: bool,
}

#[derive(Debug, Serialize)]
struct LivenessEnvelope {
    alive: bool,
}

/// HTTP server wrapping the triage pipeline
pub struct TriageServer {
    service_id: String,
    pipeline: Option<Arc<TriagePipeline>>,
}

impl TriageServer {
    /// Create a server; `pipeline` is None when no credential was available
    pub fn new(service_id: String, pipeline: Option<Arc<TriagePipeline>>) -> Self {
        Self {
            service_id,
            pipeline,
        }
    }

    /// Validate an inquiry request body (pure function)
    ///
    /// All three fields must be present and non-blank.
    fn validate_request(request: &InquiryRequest) -> Option<Inquiry> {
        let customer_id = request.customer_id.as_deref()?.trim();
        let loan_number = request.loan_number.as_deref()?.trim();
        let message = request.inquiry_message.as_deref()?.trim();

        if customer_id.is_empty() || loan_number.is_empty() || message.is_empty() {
            return None;
        }

        Some(Inquiry::new(customer_id, loan_number, message))
    }

    /// Handle one POST /inquiries request
    async fn handle_inquiry(
        self: Arc<Self>,
        body: Bytes,
    ) -> Result<warp::reply::WithStatus<warp::reply::Json>, Infallible> {
        // Empty body is a reachability probe, not an inquiry
        if body.is_empty() {
            let diagnostic = DiagnosticEnvelope {
                message: format!("{} service is reachable", self.service_id),
                service: self.service_id.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            };
            return Ok(warp::reply::with_status(
                warp::reply::json(&diagnostic),
                StatusCode::OK,
            ));
        }

        let request: InquiryRequest = match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(_) => {
                return Ok(warp::reply::with_status(
                    warp::reply::json(&ErrorEnvelope {
                        error: "Invalid JSON body".to_string(),
                    }),
                    StatusCode::BAD_REQUEST,
                ));
            }
        };

        let inquiry = match Self::validate_request(&request) {
            Some(inquiry) => inquiry,
            None => {
                return Ok(warp::reply::with_status(
                    warp::reply::json(&ErrorEnvelope {
                        error: "Missing required fields".to_string(),
                    }),
                    StatusCode::BAD_REQUEST,
                ));
            }
        };

        let pipeline = match &self.pipeline {
            Some(pipeline) => pipeline.clone(),
            None => {
                return Ok(warp::reply::with_status(
                    warp::reply::json(&ErrorEnvelope {
                        error: "API key not configured".to_string(),
                    }),
                    StatusCode::INTERNAL_SERVER_ERROR,
                ));
            }
        };

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "inquiry_request",
            %request_id,
            customer_id = %inquiry.customer_id
        );

        let result = pipeline.run(&inquiry).instrument(span).await;

        match result {
            Ok(outcome) => Ok(warp::reply::with_status(
                warp::reply::json(&InquiryEnvelope::from_outcome(&inquiry, outcome)),
                StatusCode::OK,
            )),
            Err(e) => {
                error!(%request_id, error = %e, "Inquiry triage failed");
                Ok(warp::reply::with_status(
                    warp::reply::json(&ErrorEnvelope {
                        error: error_body(&e),
                    }),
                    StatusCode::INTERNAL_SERVER_ERROR,
                ))
            }
        }
    }

    /// Build the complete route tree with the CORS layer applied
    pub fn routes(
        self: Arc<Self>,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let inquiry_server = self.clone();
        let health_server = self.clone();
        let live_server = self;

        // POST /inquiries - the triage endpoint
        let inquiry_route = warp::path("inquiries")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::bytes())
            .and_then(move |body: Bytes| {
                let server = inquiry_server.clone();
                async move { server.handle_inquiry(body).await }
            });

        // GET /health - configuration-aware status
        let health_route = warp::path("health")
            .and(warp::get())
            .and_then(move || {
                let server = health_server.clone();
                async move {
                    let configured = server.pipeline.is_some();
                    let envelope = HealthEnvelope {
                        status: if configured { "healthy" } else { "unconfigured" }.to_string(),
                        service: server.service_id.clone(),
                        configured,
                    };
                    let status_code = if configured {
                        StatusCode::OK
                    } else {
                        StatusCode::SERVICE_UNAVAILABLE
                    };
                    Ok::<_, Infallible>(warp::reply::with_status(
                        warp::reply::json(&envelope),
                        status_code,
                    ))
                }
            });

        // GET /live - liveness probe
        let live_route = warp::path("live").and(warp::get()).and_then(move || {
            let _server = live_server.clone();
            async move {
                Ok::<_, Infallible>(warp::reply::with_status(
                    warp::reply::json(&LivenessEnvelope { alive: true }),
                    StatusCode::OK,
                ))
            }
        });

        let cors = warp::cors()
            .allow_any_origin()
            .allow_headers(vec!["content-type"])
            .allow_methods(vec!["GET", "POST", "OPTIONS"]);

        inquiry_route.or(health_route).or(live_route).with(cors)
    }

    /// Run the server until the shutdown future resolves
    pub async fn run(
        self: Arc<Self>,
        port: u16,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) {
        let routes = self.routes();

        let (addr, server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], port), shutdown);

        info!("Triage server listening on {}", addr);
        server.await;
    }
}

/// Caller-facing error body: sanitized message only, no internals
fn error_body(error: &TriageError) -> String {
    error.public_message()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        customer_id: Option<&str>,
        loan_number: Option<&str>,
        message: Option<&str>,
    ) -> InquiryRequest {
        InquiryRequest {
            customer_id: customer_id.map(String::from),
            loan_number: loan_number.map(String::from),
            inquiry_message: message.map(String::from),
        }
    }

    #[test]
    fn test_validate_request_accepts_complete_input() {
        let inquiry = TriageServer::validate_request(&request(
            Some("CUST001"),
            Some("LOAN12345"),
            Some("Payment question"),
        ))
        .expect("valid request");

        assert_eq!(inquiry.customer_id, "CUST001");
        assert_eq!(inquiry.loan_number, "LOAN12345");
        assert_eq!(inquiry.message, "Payment question");
    }

    #[test]
    fn test_validate_request_trims_fields() {
        let inquiry = TriageServer::validate_request(&request(
            Some("  CUST001 "),
            Some("LOAN12345"),
            Some(" Payment question\n"),
        ))
        .expect("valid request");

        assert_eq!(inquiry.customer_id, "CUST001");
        assert_eq!(inquiry.message, "Payment question");
    }

    #[test]
    fn test_validate_request_rejects_missing_fields() {
        assert!(TriageServer::validate_request(&request(
            None,
            Some("LOAN12345"),
            Some("text")
        ))
        .is_none());
        assert!(TriageServer::validate_request(&request(
            Some("CUST001"),
            None,
            Some("text")
        ))
        .is_none());
        assert!(TriageServer::validate_request(&request(
            Some("CUST001"),
            Some("LOAN12345"),
            None
        ))
        .is_none());
    }

    #[test]
    fn test_validate_request_rejects_blank_fields() {
        assert!(TriageServer::validate_request(&request(
            Some("   "),
            Some("LOAN12345"),
            Some("text")
        ))
        .is_none());
        assert!(TriageServer::validate_request(&request(
            Some("CUST001"),
            Some("LOAN12345"),
            Some("")
        ))
        .is_none());
    }
}
