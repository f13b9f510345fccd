//! Capability Registry
//!
//! Maps the configured provider name to a concrete capability.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::CapabilitySettings;
use crate::error::{Error, Result};

use super::{
    AddresseeRequest, MeetingCapability, MockCapability, OpenAiCapability, ResponseRequest,
    SharedCapability, SummaryRequest,
};

// ─────────────────────────────────────────────────────────────────
// Provider Kind
// ─────────────────────────────────────────────────────────────────

/// Supported capability providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// OpenAI-compatible chat-completions API
    OpenAi,
    /// Scripted offline capability
    Mock,
    /// No capability; every call fails
    Disabled,
}

impl ProviderKind {
    /// Get all provider kinds
    pub fn all() -> &'static [ProviderKind] {
        &[ProviderKind::OpenAi, ProviderKind::Mock, ProviderKind::Disabled]
    }

    /// Get the provider name
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Mock => "mock",
            ProviderKind::Disabled => "none",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "gemini" => Some(ProviderKind::OpenAi),
            "mock" => Some(ProviderKind::Mock),
            "none" | "off" => Some(ProviderKind::Disabled),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─────────────────────────────────────────────────────────────────
// Unavailable Capability
// ─────────────────────────────────────────────────────────────────

/// Stand-in used when no real capability could be constructed
#[derive(Debug, Clone)]
pub struct UnavailableCapability {
    reason: String,
}

impl UnavailableCapability {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl MeetingCapability for UnavailableCapability {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn generate_response(&self, _request: ResponseRequest) -> Result<String> {
        Err(Error::capability_unavailable(self.reason.clone()))
    }

    async fn classify_addressee(&self, _request: AddresseeRequest) -> Result<String> {
        Err(Error::capability_unavailable(self.reason.clone()))
    }

    async fn summarize(&self, _request: SummaryRequest) -> Result<String> {
        Err(Error::capability_unavailable(self.reason.clone()))
    }
}

// ─────────────────────────────────────────────────────────────────
// Construction
// ─────────────────────────────────────────────────────────────────

/// Build the capability named by `settings.provider`.
///
/// Never fails: an unknown provider or a construction error is reported
/// once and degrades to `UnavailableCapability`, so meetings still run
/// with failure placeholders.
pub fn build_capability(settings: &CapabilitySettings) -> SharedCapability {
    let Some(kind) = ProviderKind::parse(&settings.provider) else {
        let reason = format!("unknown provider '{}'", settings.provider);
        warn!(provider = %settings.provider, "Unknown capability provider, running without one");
        return Arc::new(UnavailableCapability::new(reason));
    };

    let capability: SharedCapability = match kind {
        ProviderKind::OpenAi => {
            if settings.api_key.is_empty() {
                warn!("No API key configured; requests may be rejected by the endpoint");
            }
            match OpenAiCapability::new(settings.clone()) {
                Ok(capability) => Arc::new(capability),
                Err(e) => {
                    warn!(error = %e, "Failed to construct capability, running without one");
                    Arc::new(UnavailableCapability::new(e.to_string()))
                }
            }
        }
        ProviderKind::Mock => Arc::new(MockCapability::new()),
        ProviderKind::Disabled => Arc::new(UnavailableCapability::new("capability disabled")),
    };

    info!(provider = %kind, capability = capability.name(), "Capability ready");
    capability
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: &str) -> CapabilitySettings {
        CapabilitySettings {
            provider: provider.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(ProviderKind::parse("openai"), Some(ProviderKind::OpenAi));
        assert_eq!(ProviderKind::parse(" MOCK "), Some(ProviderKind::Mock));
        assert_eq!(ProviderKind::parse("none"), Some(ProviderKind::Disabled));
        assert_eq!(ProviderKind::parse("llama"), None);
        for kind in ProviderKind::all() {
            assert_eq!(ProviderKind::parse(kind.name()), Some(*kind));
        }
    }

    #[test]
    fn test_build_known_providers() {
        assert_eq!(build_capability(&settings("mock")).name(), "mock");
        assert_eq!(build_capability(&settings("openai")).name(), "openai");
        assert_eq!(build_capability(&settings("none")).name(), "unavailable");
    }

    #[test]
    fn test_unknown_provider_degrades() {
        assert_eq!(build_capability(&settings("telepathy")).name(), "unavailable");
    }

    #[tokio::test]
    async fn test_unavailable_always_fails() {
        let capability = UnavailableCapability::new("offline");
        let result = capability
            .summarize(SummaryRequest {
                topic: "t".into(),
                transcript: "User: hi".into(),
            })
            .await;
        match result {
            Err(Error::CapabilityUnavailable { reason }) => assert_eq!(reason, "offline"),
            other => panic!("expected unavailable error, got {:?}", other),
        }
    }
}
