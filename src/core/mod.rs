// Core algorithm exports
pub mod bonus;
pub mod matcher;
pub mod normalize;
pub mod outcome;
pub mod scoring;
pub mod signals;

pub use bonus::{check_player_postcode_match, resolve_player_postcode_matches};
pub use matcher::{find_guardian_matches_unbatched, GuardianMatcher};
pub use normalize::{is_valid_e164, normalize_phone_number, normalize_postcode, DEFAULT_COUNTRY_CODE};
pub use outcome::classify_matches;
pub use scoring::{calculate_match_score, MatchScore};
pub use signals::MatchSignal;
