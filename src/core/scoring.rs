use crate::core::normalize::{
    extract_house_number, extract_town, has_phone_digits, normalize_phone_number,
    normalize_postcode, normalize_text, DEFAULT_COUNTRY_CODE,
};
use crate::core::signals::MatchSignal;
use crate::models::{GuardianRecord, MatchingWeights, PlayerPostcodeMatch, RegisteringUserProfile};

/// Score for one (profile, guardian) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchScore {
    pub score: u32,
    /// Fired signals in evaluation order
    pub signals: Vec<MatchSignal>,
}

impl MatchScore {
    pub fn match_reasons(&self) -> Vec<String> {
        self.signals.iter().map(MatchSignal::reason).collect()
    }
}

/// Calculate an additive match score for a guardian against a user profile
///
/// Evaluation order (and therefore reason order):
/// 1. Email (primary, then alternate)
/// 2. Phone, compared in E.164 form
/// 3. Surname/address family, the most specific of
///    surname+postcode, surname+town, postcode only, town only
/// 4. House number
/// 5. Linked-player postcode bonus
///
/// Empty fields on either side never fire a signal.
pub fn calculate_match_score(
    guardian: &GuardianRecord,
    user: &RegisteringUserProfile,
    player_postcode_match: Option<&PlayerPostcodeMatch>,
    weights: &MatchingWeights,
) -> MatchScore {
    let mut signals = Vec::new();

    if let Some(signal) = email_signal(guardian, user) {
        signals.push(signal);
    }

    if phones_match(guardian.phone.as_deref(), user.phone.as_deref()) {
        signals.push(MatchSignal::Phone);
    }

    if let Some(signal) = address_signal(guardian, user) {
        signals.push(signal);
    }

    let guardian_house = extract_house_number(guardian.address.as_deref());
    let user_house = extract_house_number(user.address.as_deref());
    if !guardian_house.is_empty() && guardian_house == user_house {
        signals.push(MatchSignal::HouseNumber);
    }

    if let Some(bonus) = player_postcode_match.filter(|m| m.matches) {
        signals.push(MatchSignal::PlayerPostcodeBonus {
            players: bonus.matched_players.clone(),
        });
    }

    let score = signals
        .iter()
        .map(|s| s.weight(weights))
        .fold(0, u32::saturating_add);

    MatchScore { score, signals }
}

fn email_signal(guardian: &GuardianRecord, user: &RegisteringUserProfile) -> Option<MatchSignal> {
    let guardian_email = normalize_text(guardian.email.as_deref().unwrap_or_default());
    if guardian_email.is_empty() {
        return None;
    }

    if guardian_email == normalize_text(&user.email) {
        return Some(MatchSignal::EmailExact { alternate: false });
    }

    let alt_email = normalize_text(user.alt_email.as_deref().unwrap_or_default());
    (guardian_email == alt_email).then_some(MatchSignal::EmailExact { alternate: true })
}

#[inline]
fn phones_match(guardian_phone: Option<&str>, user_phone: Option<&str>) -> bool {
    match (guardian_phone, user_phone) {
        (Some(g), Some(u)) if has_phone_digits(g) && has_phone_digits(u) => {
            normalize_phone_number(g, DEFAULT_COUNTRY_CODE)
                == normalize_phone_number(u, DEFAULT_COUNTRY_CODE)
        }
        _ => false,
    }
}

/// Pick the single most specific surname/postcode/town signal
fn address_signal(guardian: &GuardianRecord, user: &RegisteringUserProfile) -> Option<MatchSignal> {
    let user_surname = normalize_text(&user.last_name);
    let surname_match = !user_surname.is_empty() && user_surname == normalize_text(&guardian.last_name);

    let user_postcode = normalize_postcode(user.postcode.as_deref().unwrap_or_default());
    let postcode_match = !user_postcode.is_empty()
        && user_postcode == normalize_postcode(guardian.postcode.as_deref().unwrap_or_default());

    let user_town = extract_town(user.address.as_deref(), user.town.as_deref());
    let town_match = !user_town.is_empty()
        && user_town == extract_town(guardian.address.as_deref(), guardian.town.as_deref());

    match (surname_match, postcode_match, town_match) {
        (true, true, _) => Some(MatchSignal::SurnamePostcode),
        (true, false, true) => Some(MatchSignal::SurnameTown),
        (false, true, _) => Some(MatchSignal::PostcodeOnly),
        (_, false, true) => Some(MatchSignal::TownOnly),
        _ => None,
    }
}
