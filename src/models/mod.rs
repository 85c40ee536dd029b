// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ConfidenceLevel, ConfidenceThresholds, GuardianPlayerLink, GuardianRecord, GuardianSummary,
    LinkStatus, LinkedChild, LinkedPlayer, MatchOutcome, MatchResult, MatchingWeights,
    PlayerPostcodeMatch, PlayerRecord, RegisteringUserProfile, MATCHING_WEIGHTS,
};
pub use requests::{FindGuardianMatchesRequest, PlayerPostcodeMatchRequest};
pub use responses::{
    ErrorResponse, FindGuardianMatchesResponse, GuardianMatchView, HealthResponse, SignalView,
};
