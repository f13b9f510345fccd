//! Mock capability for testing
//!
//! Provides a scripted, deterministic implementation of `MeetingCapability`
//! for unit tests and offline runs (`provider = "mock"`).

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::time::Duration;

use crate::error::{Error, Result};

use super::prompts::NO_TARGET_TOKEN;
use super::traits::{
    AddresseeRequest, MeetingCapability, Operation, ResponseRequest, SummaryRequest,
};

// ─────────────────────────────────────────────────────────────────
// Mock Capability Configuration
// ─────────────────────────────────────────────────────────────────

/// Configuration for mock capability behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Simulated latency per call (ms)
    pub latency_ms: u64,

    /// Whether to fail on certain operations
    pub fail_generate_response: bool,
    pub fail_classify_addressee: bool,
    pub fail_summarize: bool,

    /// Utterances handed out in order before falling back
    pub scripted_responses: Vec<String>,

    /// Fixed utterance once the script is exhausted
    pub fixed_response: Option<String>,

    /// Fixed raw addressee reply (bypasses name matching)
    pub fixed_addressee: Option<String>,

    /// Fixed summary text
    pub fixed_summary: Option<String>,
}

// ─────────────────────────────────────────────────────────────────
// Mock Capability
// ─────────────────────────────────────────────────────────────────

/// Mock implementation of MeetingCapability for testing
pub struct MockCapability {
    config: MockConfig,
    script: RwLock<VecDeque<String>>,
    call_counts: RwLock<CallCounts>,
    response_requests: RwLock<Vec<ResponseRequest>>,
    addressee_requests: RwLock<Vec<AddresseeRequest>>,
}

/// Track method call counts for verification
#[derive(Debug, Default)]
struct CallCounts {
    generate_response: u32,
    classify_addressee: u32,
    summarize: u32,
}

impl MockCapability {
    /// Create a new mock capability with default configuration
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    /// Create a new mock capability with custom configuration
    pub fn with_config(config: MockConfig) -> Self {
        let script = config.scripted_responses.iter().cloned().collect();
        Self {
            config,
            script: RwLock::new(script),
            call_counts: RwLock::new(CallCounts::default()),
            response_requests: RwLock::new(Vec::new()),
            addressee_requests: RwLock::new(Vec::new()),
        }
    }

    /// Get the number of times an operation was called
    pub fn call_count(&self, operation: Operation) -> u32 {
        let counts = self.call_counts.read();
        match operation {
            Operation::GenerateResponse => counts.generate_response,
            Operation::ClassifyAddressee => counts.classify_addressee,
            Operation::Summarize => counts.summarize,
        }
    }

    /// Reset all call counts
    #[cfg(test)]
    pub fn reset_counts(&self) {
        *self.call_counts.write() = CallCounts::default();
    }

    /// Every response request received, in call order
    #[cfg(test)]
    pub fn response_requests(&self) -> Vec<ResponseRequest> {
        self.response_requests.read().clone()
    }

    /// Every addressee request received, in call order
    #[cfg(test)]
    pub fn addressee_requests(&self) -> Vec<AddresseeRequest> {
        self.addressee_requests.read().clone()
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }
    }

    fn failure(operation: Operation) -> Error {
        Error::capability_failed(operation.as_str(), "mock failure")
    }

    /// Next utterance: script first, then the fixed response, then a
    /// deterministic line built from the request.
    fn next_utterance(&self, request: &ResponseRequest) -> String {
        if let Some(line) = self.script.write().pop_front() {
            return line;
        }
        if let Some(ref fixed) = self.config.fixed_response {
            return fixed.clone();
        }

        let turn = self.call_count(Operation::GenerateResponse);
        format!(
            "Point {} on {}: show me one real customer who pays for this.",
            turn, request.topic
        )
    }

    /// The single roster name spoken as a word in the utterance, if exactly
    /// one appears.
    fn match_name(request: &AddresseeRequest) -> String {
        let words: Vec<&str> = request
            .utterance
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let mut mentioned = request
            .persona_names
            .iter()
            .filter(|name| words.contains(&name.as_str()));

        match (mentioned.next(), mentioned.next()) {
            (Some(name), None) => name.clone(),
            _ => NO_TARGET_TOKEN.to_string(),
        }
    }

    fn canned_summary(request: &SummaryRequest) -> String {
        let remarks = request.transcript.lines().filter(|l| !l.trim().is_empty()).count();
        format!(
            "# Agenda\n- {}\n\n# Discussion\n- {} remarks were exchanged.\n\n# Feedback\n- Decide on one owner and one next step.",
            request.topic, remarks
        )
    }
}

impl Default for MockCapability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MeetingCapability for MockCapability {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate_response(&self, request: ResponseRequest) -> Result<String> {
        self.call_counts.write().generate_response += 1;
        self.response_requests.write().push(request.clone());
        self.simulate_latency().await;

        if self.config.fail_generate_response {
            return Err(Self::failure(Operation::GenerateResponse));
        }

        Ok(self.next_utterance(&request))
    }

    async fn classify_addressee(&self, request: AddresseeRequest) -> Result<String> {
        self.call_counts.write().classify_addressee += 1;
        self.addressee_requests.write().push(request.clone());
        self.simulate_latency().await;

        if self.config.fail_classify_addressee {
            return Err(Self::failure(Operation::ClassifyAddressee));
        }

        Ok(self
            .config
            .fixed_addressee
            .clone()
            .unwrap_or_else(|| Self::match_name(&request)))
    }

    async fn summarize(&self, request: SummaryRequest) -> Result<String> {
        self.call_counts.write().summarize += 1;
        self.simulate_latency().await;

        if self.config.fail_summarize {
            return Err(Self::failure(Operation::Summarize));
        }

        Ok(self
            .config
            .fixed_summary
            .clone()
            .unwrap_or_else(|| Self::canned_summary(&request)))
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::Persona;

    fn response_request() -> ResponseRequest {
        ResponseRequest {
            persona: Persona::new("Alex", "ENTP"),
            topic: "Pricing".to_string(),
            transcript: "Kim: thoughts?".to_string(),
        }
    }

    fn addressee_request(utterance: &str) -> AddresseeRequest {
        AddresseeRequest {
            utterance: utterance.to_string(),
            persona_names: vec!["Alex".into(), "Ben".into(), "Chloe".into()],
            recent_lines: vec![],
        }
    }

    #[tokio::test]
    async fn test_scripted_then_fixed_responses() {
        let capability = MockCapability::with_config(MockConfig {
            scripted_responses: vec!["first".into(), "second".into()],
            fixed_response: Some("fixed".into()),
            ..Default::default()
        });

        let mut out = Vec::new();
        for _ in 0..3 {
            out.push(capability.generate_response(response_request()).await.unwrap());
        }
        assert_eq!(out, vec!["first", "second", "fixed"]);
        assert_eq!(capability.response_requests().len(), 3);
    }

    #[tokio::test]
    async fn test_default_response_mentions_topic() {
        let capability = MockCapability::new();
        let text = capability.generate_response(response_request()).await.unwrap();
        assert!(text.contains("Pricing"));
    }

    #[tokio::test]
    async fn test_name_matching() {
        let capability = MockCapability::new();
        let single = capability
            .classify_addressee(addressee_request("Alex, what do you think?"))
            .await
            .unwrap();
        assert_eq!(single, "Alex");

        let several = capability
            .classify_addressee(addressee_request("Alex and Ben, any ideas?"))
            .await
            .unwrap();
        assert_eq!(several, NO_TARGET_TOKEN);

        let partial = capability
            .classify_addressee(addressee_request("Alexander thinks so"))
            .await
            .unwrap();
        assert_eq!(partial, NO_TARGET_TOKEN);
    }

    #[tokio::test]
    async fn test_canned_summary_sections() {
        let capability = MockCapability::new();
        let summary = capability
            .summarize(SummaryRequest {
                topic: "Pricing".into(),
                transcript: "User: a\nAlex: b".into(),
            })
            .await
            .unwrap();
        assert!(summary.starts_with("# Agenda"));
        assert!(summary.contains("# Discussion\n- 2 remarks"));
        assert!(summary.contains("# Feedback"));
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let capability = MockCapability::with_config(MockConfig {
            fail_generate_response: true,
            fail_summarize: true,
            ..Default::default()
        });

        assert!(capability.generate_response(response_request()).await.is_err());
        assert!(capability
            .summarize(SummaryRequest {
                topic: "t".into(),
                transcript: String::new(),
            })
            .await
            .is_err());
        assert!(capability.classify_addressee(addressee_request("hi")).await.is_ok());
    }

    #[tokio::test]
    async fn test_call_counting() {
        let capability = MockCapability::new();

        let _ = capability.generate_response(response_request()).await;
        let _ = capability.generate_response(response_request()).await;
        let _ = capability.classify_addressee(addressee_request("hi")).await;

        assert_eq!(capability.call_count(Operation::GenerateResponse), 2);
        assert_eq!(capability.call_count(Operation::ClassifyAddressee), 1);
        assert_eq!(capability.call_count(Operation::Summarize), 0);

        capability.reset_counts();
        assert_eq!(capability.call_count(Operation::GenerateResponse), 0);
    }
}
