use serde::{Deserialize, Serialize};

use crate::core::signals::MatchSignal;
use crate::models::domain::{
    ConfidenceLevel, GuardianSummary, LinkedChild, MatchOutcome, MatchResult, MatchingWeights,
};

/// One fired signal, as shown to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalView {
    pub code: String,
    pub weight: u32,
    pub reason: String,
}

/// A guardian match rendered for the onboarding UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianMatchView {
    #[serde(rename = "guardianId")]
    pub guardian_id: String,
    pub guardian: GuardianSummary,
    pub score: u32,
    pub confidence: ConfidenceLevel,
    #[serde(rename = "matchReasons")]
    pub match_reasons: Vec<String>,
    pub signals: Vec<SignalView>,
    #[serde(rename = "linkedChildren")]
    pub linked_children: Vec<LinkedChild>,
}

impl GuardianMatchView {
    pub fn render(result: &MatchResult, weights: &MatchingWeights) -> Self {
        Self {
            guardian_id: result.guardian_id.clone(),
            guardian: result.guardian.clone(),
            score: result.score,
            confidence: result.confidence,
            match_reasons: result.match_reasons(),
            signals: result
                .signals
                .iter()
                .map(|signal: &MatchSignal| SignalView {
                    code: signal.code().to_string(),
                    weight: signal.weight(weights),
                    reason: signal.reason(),
                })
                .collect(),
            linked_children: result.linked_children.clone(),
        }
    }
}

/// Response for the guardian match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindGuardianMatchesResponse {
    pub matches: Vec<GuardianMatchView>,
    pub outcome: MatchOutcome,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
