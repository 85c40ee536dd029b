use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::RegisteringUserProfile;

/// Request to match a registering user against guardian records
///
/// The candidate count is bounded by `matching.max_candidates`, checked in the
/// route handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindGuardianMatchesRequest {
    pub profile: RegisteringUserProfile,
    /// Guardians the caller has scoped the search to
    #[serde(alias = "candidate_guardian_ids", rename = "candidateGuardianIds", default)]
    pub candidate_guardian_ids: Vec<String>,
}

/// Request to check one guardian's linked players against a postcode
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlayerPostcodeMatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "guardian_id", rename = "guardianId")]
    pub guardian_id: String,
    #[serde(default)]
    pub postcode: String,
}
