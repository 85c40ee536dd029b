use serde::{Deserialize, Serialize};

use crate::models::MatchingWeights;

/// One independently evaluated piece of evidence linking a user to a guardian
///
/// Weights and display strings are both derived from the variant, so the
/// weight table and the reason list cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "camelCase")]
pub enum MatchSignal {
    EmailExact { alternate: bool },
    SurnamePostcode,
    SurnameTown,
    Phone,
    PostcodeOnly,
    TownOnly,
    HouseNumber,
    PlayerPostcodeBonus { players: Vec<String> },
}

impl MatchSignal {
    pub fn weight(&self, weights: &MatchingWeights) -> u32 {
        match self {
            MatchSignal::EmailExact { .. } => weights.email_exact,
            MatchSignal::SurnamePostcode => weights.surname_postcode,
            MatchSignal::SurnameTown => weights.surname_town,
            MatchSignal::Phone => weights.phone,
            MatchSignal::PostcodeOnly => weights.postcode_only,
            MatchSignal::TownOnly => weights.town_only,
            MatchSignal::HouseNumber => weights.house_number,
            MatchSignal::PlayerPostcodeBonus { .. } => weights.player_postcode_bonus,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            MatchSignal::EmailExact { .. } => "emailExact",
            MatchSignal::SurnamePostcode => "surnamePostcode",
            MatchSignal::SurnameTown => "surnameTown",
            MatchSignal::Phone => "phone",
            MatchSignal::PostcodeOnly => "postcodeOnly",
            MatchSignal::TownOnly => "townOnly",
            MatchSignal::HouseNumber => "houseNumber",
            MatchSignal::PlayerPostcodeBonus { .. } => "playerPostcodeBonus",
        }
    }

    /// Human-readable match reason
    pub fn reason(&self) -> String {
        match self {
            MatchSignal::EmailExact { alternate: false } => "Email match (primary)".to_string(),
            MatchSignal::EmailExact { alternate: true } => "Email match (alternate)".to_string(),
            MatchSignal::SurnamePostcode => "Surname + Postcode match (same household)".to_string(),
            MatchSignal::SurnameTown => "Surname + Town match (same area)".to_string(),
            MatchSignal::Phone => "Phone match".to_string(),
            MatchSignal::PostcodeOnly => "Postcode match".to_string(),
            MatchSignal::TownOnly => "Town match".to_string(),
            MatchSignal::HouseNumber => "House number match".to_string(),
            MatchSignal::PlayerPostcodeBonus { players } => {
                format!("Postcode matches linked player(s): {}", players.join(", "))
            }
        }
    }
}

impl std::fmt::Display for MatchSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason())
    }
}
