//! Addressee resolution.
//!
//! Decides whether a human utterance targets exactly one persona. The
//! judgment is delegated to the capability; whatever comes back is only
//! trusted if it is, verbatim, a current roster name.

use std::time::Duration;

use tracing::{debug, warn};

use crate::capability::{AddresseeRequest, Operation, SharedCapability};
use crate::error::Error;

use super::transcript::TranscriptEntry;

/// Resolves the single persona, if any, a human line is aimed at.
#[derive(Clone)]
pub struct AddresseeResolver {
    capability: SharedCapability,
    timeout: Duration,
}

impl AddresseeResolver {
    pub fn new(capability: SharedCapability, timeout: Duration) -> Self {
        Self {
            capability,
            timeout,
        }
    }

    /// Classify `human_text` against `roster_names`.
    ///
    /// Blank text short-circuits to `None` without a capability call.
    /// Failures and timeouts also yield `None`, so the caller falls back to
    /// random speaker selection.
    pub async fn resolve(
        &self,
        human_text: &str,
        roster_names: &[String],
        recent: &[TranscriptEntry],
    ) -> Option<String> {
        if human_text.trim().is_empty() {
            return None;
        }

        let request = AddresseeRequest {
            utterance: human_text.to_string(),
            persona_names: roster_names.to_vec(),
            recent_lines: recent.to_vec(),
        };

        let classify = self.capability.classify_addressee(request);
        let outcome = tokio::time::timeout(self.timeout, classify)
            .await
            .unwrap_or_else(|_| {
                Err(Error::CapabilityTimeout {
                    operation: Operation::ClassifyAddressee.to_string(),
                    timeout_secs: self.timeout.as_secs(),
                })
            });

        match outcome {
            Ok(raw) => {
                let target = validate_candidate(&raw, roster_names);
                debug!(raw = %raw.trim(), target = ?target, "Addressee classified");
                target
            }
            Err(e) => {
                warn!(error = %e, "Addressee classification failed, treating as unaddressed");
                None
            }
        }
    }
}

/// Accept `raw` only if, once trimmed, it is exactly one of `roster_names`.
///
/// The no-target token, prose, several names and case variants all map to
/// `None`.
pub fn validate_candidate(raw: &str, roster_names: &[String]) -> Option<String> {
    let candidate = raw.trim();
    roster_names
        .iter()
        .find(|name| name.as_str() == candidate)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::prompts::NO_TARGET_TOKEN;
    use crate::capability::{MockCapability, MockConfig};
    use std::sync::Arc;

    fn names() -> Vec<String> {
        vec!["Alex".into(), "Ben".into()]
    }

    fn resolver_with(config: MockConfig) -> (AddresseeResolver, Arc<MockCapability>) {
        let mock = Arc::new(MockCapability::with_config(config));
        let resolver = AddresseeResolver::new(mock.clone(), Duration::from_secs(5));
        (resolver, mock)
    }

    #[test]
    fn test_validate_candidate() {
        let names = names();
        assert_eq!(validate_candidate("Alex", &names), Some("Alex".into()));
        assert_eq!(validate_candidate("  Ben\n", &names), Some("Ben".into()));
        assert_eq!(validate_candidate(NO_TARGET_TOKEN, &names), None);
        assert_eq!(validate_candidate("", &names), None);
        assert_eq!(validate_candidate("Alex, Ben", &names), None);
        assert_eq!(validate_candidate("alex", &names), None);
        assert_eq!(validate_candidate("It is Alex.", &names), None);
        assert_eq!(validate_candidate("Chloe", &names), None);
    }

    #[tokio::test]
    async fn test_blank_text_skips_capability() {
        let (resolver, mock) = resolver_with(MockConfig::default());
        assert_eq!(resolver.resolve("   ", &names(), &[]).await, None);
        assert_eq!(mock.call_count(Operation::ClassifyAddressee), 0);
    }

    #[tokio::test]
    async fn test_named_persona_resolves() {
        let (resolver, _) = resolver_with(MockConfig::default());
        let target = resolver.resolve("Alex, what do you think?", &names(), &[]).await;
        assert_eq!(target, Some("Alex".into()));
    }

    #[tokio::test]
    async fn test_unknown_reply_is_rejected() {
        let (resolver, _) = resolver_with(MockConfig {
            fixed_addressee: Some("Dana".into()),
            ..Default::default()
        });
        assert_eq!(resolver.resolve("Dana?", &names(), &[]).await, None);
    }

    #[tokio::test]
    async fn test_context_is_forwarded() {
        let (resolver, mock) = resolver_with(MockConfig::default());
        let recent = vec![TranscriptEntry::persona("Ben", "Ship in Q2.")];
        resolver.resolve("Why Q2?", &names(), &recent).await;

        let requests = mock.addressee_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].recent_lines, recent);
        assert_eq!(requests[0].persona_names, names());
    }

    #[tokio::test]
    async fn test_failure_yields_none() {
        let (resolver, _) = resolver_with(MockConfig {
            fail_classify_addressee: true,
            ..Default::default()
        });
        assert_eq!(resolver.resolve("Alex?", &names(), &[]).await, None);
    }

    #[tokio::test]
    async fn test_timeout_yields_none() {
        let mock = Arc::new(MockCapability::with_config(MockConfig {
            latency_ms: 500,
            ..Default::default()
        }));
        let resolver = AddresseeResolver::new(mock, Duration::from_millis(20));
        assert_eq!(resolver.resolve("Alex?", &names(), &[]).await, None);
    }
}
