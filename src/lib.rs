//! Guardian Match - identity matching for club onboarding
//!
//! Decides which club-imported guardian records belong to a newly registered
//! user by combining email, phone, address and linked-child signals into a
//! ranked, explainable score.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    calculate_match_score, check_player_postcode_match, classify_matches, is_valid_e164,
    normalize_phone_number, normalize_postcode, GuardianMatcher, MatchSignal,
};
pub use models::{
    GuardianRecord, MatchOutcome, MatchResult, MatchingWeights, PlayerPostcodeMatch,
    RegisteringUserProfile, MATCHING_WEIGHTS,
};
pub use services::{GuardianLinkRepository, InMemoryGuardianStore};
