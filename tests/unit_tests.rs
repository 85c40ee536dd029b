// Unit tests for Guardian Match

use chrono::Utc;
use guardian_match::core::{
    calculate_match_score, is_valid_e164, normalize_phone_number, normalize_postcode, MatchSignal,
    DEFAULT_COUNTRY_CODE,
};
use guardian_match::models::{
    GuardianRecord, MatchingWeights, PlayerPostcodeMatch, RegisteringUserProfile, MATCHING_WEIGHTS,
};

fn create_guardian() -> GuardianRecord {
    GuardianRecord {
        id: "g1".to_string(),
        first_name: "Siobhan".to_string(),
        last_name: "Murphy".to_string(),
        email: Some("siobhan.murphy@example.ie".to_string()),
        phone: Some("085 765 4321".to_string()),
        postcode: Some("BT61 1XY".to_string()),
        address: Some("4 Mall West".to_string()),
        town: Some("Armagh".to_string()),
        claimed_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn create_user() -> RegisteringUserProfile {
    RegisteringUserProfile {
        email: "new.parent@example.com".to_string(),
        first_name: "Siobhan".to_string(),
        last_name: "Murphy".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_postcode_examples() {
    assert_eq!(normalize_postcode("bt60 1ab"), "BT601AB");
    assert_eq!(normalize_postcode("D02 X285"), "D02X285");
}

#[test]
fn test_postcode_normalization_idempotent() {
    let samples = ["bt60 1ab", " d02   x285 ", "SW1A1AA", "", "\t\n", "ｂｔ６０"];
    for raw in samples {
        let once = normalize_postcode(raw);
        assert_eq!(normalize_postcode(&once), once, "not idempotent for {:?}", raw);
    }
}

#[test]
fn test_phone_normalization() {
    assert_eq!(normalize_phone_number("087 123 4567", DEFAULT_COUNTRY_CODE), "+353871234567");
    assert_eq!(normalize_phone_number("+44 7700 900123", DEFAULT_COUNTRY_CODE), "+447700900123");
    assert_eq!(normalize_phone_number("353871234567", DEFAULT_COUNTRY_CODE), "+353871234567");
}

#[test]
fn test_e164_validity() {
    assert!(is_valid_e164("+353871234567"));
    assert!(!is_valid_e164("+0123"));
    assert!(!is_valid_e164("+1234567890123456"));
}

#[test]
fn test_weight_table_stability() {
    assert_eq!(MATCHING_WEIGHTS.email_exact, 50);
    assert_eq!(MATCHING_WEIGHTS.surname_postcode, 45);
    assert_eq!(MATCHING_WEIGHTS.surname_town, 35);
    assert_eq!(MATCHING_WEIGHTS.phone, 30);
    assert_eq!(MATCHING_WEIGHTS.postcode_only, 20);
    assert_eq!(MATCHING_WEIGHTS.town_only, 10);
    assert_eq!(MATCHING_WEIGHTS.house_number, 5);
    assert_eq!(MATCHING_WEIGHTS.player_postcode_bonus, 10);
    assert_eq!(MatchingWeights::default(), MATCHING_WEIGHTS);
}

#[test]
fn test_surname_town_stacks_with_bonus() {
    let guardian = create_guardian();
    let mut user = create_user();
    user.town = Some("ARMAGH".to_string());
    let bonus = PlayerPostcodeMatch {
        matches: true,
        matched_players: vec!["Ciara Murphy".to_string()],
    };

    let result = calculate_match_score(&guardian, &user, Some(&bonus), &MATCHING_WEIGHTS);

    assert!(result.score >= 45);
    let reasons = result.match_reasons();
    assert!(reasons.len() >= 2);
    assert_ne!(reasons[0], reasons[1]);
    assert_eq!(
        result.signals,
        vec![
            MatchSignal::SurnameTown,
            MatchSignal::PlayerPostcodeBonus {
                players: vec!["Ciara Murphy".to_string()]
            },
        ]
    );
}

#[test]
fn test_bonus_absent_or_false_adds_nothing() {
    let guardian = create_guardian();
    let user = create_user();
    let not_matching = PlayerPostcodeMatch {
        matches: false,
        matched_players: vec!["Ciara Murphy".to_string()],
    };

    for bonus in [None, Some(&not_matching)] {
        let result = calculate_match_score(&guardian, &user, bonus, &MATCHING_WEIGHTS);
        assert!(result
            .match_reasons()
            .iter()
            .all(|r| !r.contains("Postcode matches linked")));
    }
}

#[test]
fn test_bonus_reason_exact_text() {
    let guardian = create_guardian();
    let user = create_user();
    let bonus = PlayerPostcodeMatch {
        matches: true,
        matched_players: vec!["Emma Smith".to_string(), "Jack Smith".to_string()],
    };

    let result = calculate_match_score(&guardian, &user, Some(&bonus), &MATCHING_WEIGHTS);

    assert_eq!(result.score, 10);
    assert_eq!(
        result.match_reasons(),
        vec!["Postcode matches linked player(s): Emma Smith, Jack Smith"]
    );
}

#[test]
fn test_every_signal_family_together() {
    let guardian = create_guardian();
    let user = RegisteringUserProfile {
        email: "SIOBHAN.MURPHY@example.ie".to_string(),
        last_name: "murphy".to_string(),
        phone: Some("+353 85 765 4321".to_string()),
        postcode: Some("bt611xy".to_string()),
        address: Some("4 Mall West, Armagh".to_string()),
        ..Default::default()
    };
    let bonus = PlayerPostcodeMatch {
        matches: true,
        matched_players: vec!["Ciara Murphy".to_string()],
    };

    let result = calculate_match_score(&guardian, &user, Some(&bonus), &MATCHING_WEIGHTS);

    assert_eq!(result.score, 50 + 30 + 45 + 5 + 10);
    assert_eq!(
        result.match_reasons(),
        vec![
            "Email match (primary)",
            "Phone match",
            "Surname + Postcode match (same household)",
            "House number match",
            "Postcode matches linked player(s): Ciara Murphy",
        ]
    );
}

#[test]
fn test_empty_profile_scores_zero() {
    let guardian = create_guardian();
    let user = RegisteringUserProfile::default();

    let result = calculate_match_score(&guardian, &user, None, &MATCHING_WEIGHTS);

    assert_eq!(result.score, 0);
    assert!(result.signals.is_empty());
}

#[test]
fn test_scoring_is_deterministic() {
    let guardian = create_guardian();
    let mut user = create_user();
    user.postcode = Some("BT61 1XY".to_string());

    let first = calculate_match_score(&guardian, &user, None, &MATCHING_WEIGHTS);
    let second = calculate_match_score(&guardian, &user, None, &MATCHING_WEIGHTS);

    assert_eq!(first, second);
}
