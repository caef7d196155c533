//! Responder registry and dispatch lookup
//!
//! Maps each specialty to its configured responder. Lookup cannot fail for
//! a registry built through `for_provider`, but `resolve` still applies the
//! default-specialty fallback defensively so a partially-populated registry
//! degrades the same way unrecognized classifier output does.

use crate::error::{TriageError, TriageResult};
use crate::llm::provider::LlmProvider;
use crate::triage::responder::{Responder, SpecialtyProfile};
use crate::triage::types::Specialty;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Registry of responders keyed by specialty
pub struct ResponderRegistry {
    responders: HashMap<Specialty, Responder>,
    default_specialty: Specialty,
}

impl ResponderRegistry {
    /// Create an empty registry with a fallback specialty
    pub fn new(default_specialty: Specialty) -> Self {
        Self {
            responders: HashMap::new(),
            default_specialty,
        }
    }

    /// Build a fully-populated registry, one responder per specialty
    pub fn for_provider(
        provider: Arc<dyn LlmProvider>,
        model: &str,
        temperature: f32,
        max_tokens: u32,
        default_specialty: Specialty,
    ) -> Self {
        let mut registry = Self::new(default_specialty);
        for specialty in Specialty::ALL {
            registry.register(Responder::new(
                provider.clone(),
                model.to_string(),
                temperature,
                max_tokens,
                SpecialtyProfile::of(specialty),
            ));
        }
        registry
    }

    /// Register a responder under its own specialty, replacing any existing one
    pub fn register(&mut self, responder: Responder) {
        self.responders.insert(responder.specialty(), responder);
    }

    /// Number of registered responders
    pub fn len(&self) -> usize {
        self.responders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responders.is_empty()
    }

    /// Resolve a specialty to its responder
    ///
    /// Missing entries fall back to the default specialty's responder,
    /// mirroring the classifier's substitution policy. Errors only when the
    /// default itself is unregistered.
    pub fn resolve(&self, specialty: Specialty) -> TriageResult<(Specialty, &Responder)> {
        if let Some(responder) = self.responders.get(&specialty) {
            return Ok((specialty, responder));
        }

        warn!(
            requested = %specialty,
            fallback = %self.default_specialty,
            "No responder registered for specialty, using default"
        );

        self.responders
            .get(&self.default_specialty)
            .map(|responder| (self.default_specialty, responder))
            .ok_or_else(|| {
                TriageError::internal(format!(
                    "No responder registered for default specialty {}",
                    self.default_specialty
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mocks::MockLlmProvider;

    fn full_registry() -> ResponderRegistry {
        ResponderRegistry::for_provider(
            Arc::new(MockLlmProvider::single_response("ok")),
            "mock-model",
            0.1,
            1024,
            Specialty::CustomerService,
        )
    }

    #[test]
    fn test_for_provider_registers_all_specialties() {
        let registry = full_registry();

        assert_eq!(registry.len(), Specialty::ALL.len());
        for specialty in Specialty::ALL {
            let (resolved, _) = registry.resolve(specialty).unwrap();
            assert_eq!(resolved, specialty);
        }
    }

    #[test]
    fn test_resolve_missing_specialty_uses_default() {
        let provider = Arc::new(MockLlmProvider::single_response("ok"));
        let mut registry = ResponderRegistry::new(Specialty::CustomerService);
        registry.register(Responder::new(
            provider,
            "mock-model".to_string(),
            0.1,
            1024,
            SpecialtyProfile::of(Specialty::CustomerService),
        ));

        let (resolved, _) = registry.resolve(Specialty::RiskCompliance).unwrap();

        assert_eq!(resolved, Specialty::CustomerService);
    }

    #[test]
    fn test_resolve_fails_when_default_unregistered() {
        let registry = ResponderRegistry::new(Specialty::CustomerService);

        let result = registry.resolve(Specialty::PortfolioManager);

        assert!(matches!(result, Err(TriageError::Internal { .. })));
    }

    #[test]
    fn test_register_replaces_existing_responder() {
        let mut registry = full_registry();
        let before = registry.len();

        registry.register(Responder::new(
            Arc::new(MockLlmProvider::single_response("replacement")),
            "mock-model".to_string(),
            0.5,
            512,
            SpecialtyProfile::of(Specialty::CustomerService),
        ));

        assert_eq!(registry.len(), before);
    }
}
