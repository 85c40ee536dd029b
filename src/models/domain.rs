use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::signals::MatchSignal;

/// Signals volunteered by a newly authenticated person
///
/// Read-only input to a match run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisteringUserProfile {
    pub email: String,
    #[serde(rename = "altEmail", default)]
    pub alt_email: Option<String>,
    #[serde(rename = "firstName", default)]
    pub first_name: String,
    #[serde(rename = "lastName", default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Pre-existing guardian entity, usually created by a club import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianRecord {
    pub id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    /// Account that has already claimed this record, if any
    #[serde(rename = "claimedBy", default)]
    pub claimed_by: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl GuardianRecord {
    pub fn is_claimed(&self) -> bool {
        self.claimed_by.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Child entity with its own address, independent of any guardian's
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "dateOfBirth", default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl PlayerRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Active,
    Pending,
    Declined,
}

impl LinkStatus {
    /// Declined links are a relationship the family has repudiated and never
    /// take part in matching.
    pub fn is_matchable(self) -> bool {
        matches!(self, LinkStatus::Active | LinkStatus::Pending)
    }
}

/// Relationship between a guardian and a player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianPlayerLink {
    #[serde(rename = "guardianId")]
    pub guardian_id: String,
    #[serde(rename = "playerId")]
    pub player_id: String,
    pub status: LinkStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A link joined with the player it points at
#[derive(Debug, Clone)]
pub struct LinkedPlayer {
    pub link: GuardianPlayerLink,
    pub player: PlayerRecord,
}

/// Outcome of the linked-child postcode check for one guardian
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPostcodeMatch {
    pub matches: bool,
    #[serde(rename = "matchedPlayers")]
    pub matched_players: Vec<String>,
}

impl PlayerPostcodeMatch {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Child shown next to a guardian match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedChild {
    #[serde(rename = "playerId")]
    pub player_id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: Option<String>,
    /// `None` when either the user or the child has no postcode
    #[serde(rename = "postcodeMatchesUser")]
    pub postcode_matches_user: Option<bool>,
}

/// Guardian fields carried back to the onboarding flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianSummary {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "isClaimed")]
    pub is_claimed: bool,
}

impl From<&GuardianRecord> for GuardianSummary {
    fn from(guardian: &GuardianRecord) -> Self {
        Self {
            first_name: guardian.first_name.clone(),
            last_name: guardian.last_name.clone(),
            email: guardian.email.clone(),
            phone: guardian.phone.clone(),
            is_claimed: guardian.is_claimed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

/// Scored match for one (profile, guardian) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub guardian_id: String,
    pub guardian: GuardianSummary,
    pub guardian_created_at: DateTime<Utc>,
    pub score: u32,
    pub confidence: ConfidenceLevel,
    /// Fired signals in evaluation order
    pub signals: Vec<MatchSignal>,
    pub linked_children: Vec<LinkedChild>,
}

impl MatchResult {
    pub fn match_reasons(&self) -> Vec<String> {
        self.signals.iter().map(MatchSignal::reason).collect()
    }
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingWeights {
    pub email_exact: u32,
    pub surname_postcode: u32,
    pub surname_town: u32,
    pub phone: u32,
    pub postcode_only: u32,
    pub town_only: u32,
    pub house_number: u32,
    pub player_postcode_bonus: u32,
}

/// Weight table shared with every caller that interprets scores
pub const MATCHING_WEIGHTS: MatchingWeights = MatchingWeights {
    email_exact: 50,
    surname_postcode: 45,
    surname_town: 35,
    phone: 30,
    postcode_only: 20,
    town_only: 10,
    house_number: 5,
    player_postcode_bonus: 10,
};

impl Default for MatchingWeights {
    fn default() -> Self {
        MATCHING_WEIGHTS
    }
}

/// Score bands used to classify results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfidenceThresholds {
    pub high: u32,
    pub medium: u32,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self { high: 60, medium: 40 }
    }
}

impl ConfidenceThresholds {
    pub fn level(&self, score: u32) -> ConfidenceLevel {
        if score >= self.high {
            ConfidenceLevel::High
        } else if score >= self.medium {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// Decision handed to the onboarding flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MatchOutcome {
    /// A single high-confidence, unclaimed record
    AutoClaim {
        #[serde(rename = "guardianId")]
        guardian_id: String,
    },
    /// Candidates exist but the user has to pick or confirm
    NeedsConfirmation {
        #[serde(rename = "guardianIds")]
        guardian_ids: Vec<String>,
    },
    NoMatch,
}
