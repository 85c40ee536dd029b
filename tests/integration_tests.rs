// Integration tests for Guardian Match

use chrono::{DateTime, Duration, TimeZone, Utc};
use guardian_match::core::{check_player_postcode_match, find_guardian_matches_unbatched, GuardianMatcher};
use guardian_match::models::{
    ConfidenceLevel, GuardianPlayerLink, GuardianRecord, LinkStatus, MatchOutcome, PlayerRecord,
    RegisteringUserProfile,
};
use guardian_match::services::InMemoryGuardianStore;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

fn create_guardian(id: &str, last_name: &str, postcode: Option<&str>, minutes: i64) -> GuardianRecord {
    GuardianRecord {
        id: id.to_string(),
        first_name: "Pat".to_string(),
        last_name: last_name.to_string(),
        email: None,
        phone: None,
        postcode: postcode.map(str::to_string),
        address: None,
        town: None,
        claimed_by: None,
        created_at: base_time() + Duration::minutes(minutes),
        updated_at: base_time() + Duration::minutes(minutes),
    }
}

fn create_player(id: &str, first_name: &str, last_name: &str, postcode: Option<&str>) -> PlayerRecord {
    PlayerRecord {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        date_of_birth: Some("2014-05-02".to_string()),
        postcode: postcode.map(str::to_string),
        address: None,
    }
}

fn link(store: &mut InMemoryGuardianStore, guardian_id: &str, player_id: &str, status: LinkStatus) {
    store.insert_link(GuardianPlayerLink {
        guardian_id: guardian_id.to_string(),
        player_id: player_id.to_string(),
        status,
        created_at: base_time(),
    });
}

fn create_user(last_name: &str, postcode: Option<&str>) -> RegisteringUserProfile {
    RegisteringUserProfile {
        email: "new.parent@example.com".to_string(),
        first_name: "Jo".to_string(),
        last_name: last_name.to_string(),
        postcode: postcode.map(str::to_string),
        ..Default::default()
    }
}

/// Twelve guardians with a mix of households, shared towns and linked children
fn create_club_store() -> (InMemoryGuardianStore, Vec<GuardianRecord>) {
    let mut store = InMemoryGuardianStore::new();
    let mut guardians = Vec::new();

    for i in 0..12 {
        let surname = if i % 3 == 0 { "Smith" } else { "Kelly" };
        let postcode = match i % 4 {
            0 => Some("BT60 1AB"),
            1 => Some("BT61 1XY"),
            2 => None,
            _ => Some("D02 X285"),
        };
        let mut guardian = create_guardian(&format!("g{:02}", i), surname, postcode, (i % 5) as i64);
        if i % 2 == 0 {
            guardian.town = Some("Armagh".to_string());
        }
        if i == 7 {
            guardian.email = Some("new.parent@example.com".to_string());
        }
        guardians.push(guardian);

        let player_id = format!("p{:02}", i);
        let child_postcode = if i % 2 == 0 { Some("bt601ab") } else { Some("BT99 9ZZ") };
        store.insert_player(create_player(&player_id, "Child", surname, child_postcode));
        let status = if i % 5 == 0 { LinkStatus::Declined } else { LinkStatus::Active };
        link(&mut store, &guardians[i].id, &player_id, status);
    }

    (store, guardians)
}

#[tokio::test]
async fn test_integration_separated_parent() {
    let mut store = InMemoryGuardianStore::new();
    let guardian = create_guardian("g1", "Smith", Some("BT61 1XY"), 0);
    store.insert_player(create_player("p1", "Emma", "Smith", Some("BT60 1AB")));
    link(&mut store, "g1", "p1", LinkStatus::Active);

    let bonus = check_player_postcode_match(&store, "g1", "BT60 1AB").await.unwrap();
    assert!(bonus.matches);
    assert_eq!(bonus.matched_players, vec!["Emma Smith"]);

    let matcher = GuardianMatcher::default();
    let user = create_user("Smith", Some("BT60 1AB"));
    let results = matcher.find_guardian_matches(&store, &[guardian], &user).await.unwrap();

    assert_eq!(results.len(), 1);
    let reasons = results[0].match_reasons();
    assert!(reasons.contains(&"Postcode matches linked player(s): Emma Smith".to_string()));
    assert!(results[0].score >= 10);
    assert_eq!(results[0].linked_children[0].postcode_matches_user, Some(true));
}

#[tokio::test]
async fn test_integration_declined_link_excluded() {
    let mut store = InMemoryGuardianStore::new();
    store.insert_player(create_player("p1", "Emma", "Smith", Some("BT60 1AB")));
    link(&mut store, "g1", "p1", LinkStatus::Declined);

    let bonus = check_player_postcode_match(&store, "g1", "BT60 1AB").await.unwrap();

    assert!(!bonus.matches);
    assert!(bonus.matched_players.is_empty());
}

#[tokio::test]
async fn test_integration_pending_link_counts() {
    let mut store = InMemoryGuardianStore::new();
    store.insert_player(create_player("p1", "Emma", "Smith", Some("BT60 1AB")));
    link(&mut store, "g1", "p1", LinkStatus::Pending);

    let bonus = check_player_postcode_match(&store, "g1", "bt60 1ab").await.unwrap();

    assert!(bonus.matches);
}

#[tokio::test]
async fn test_integration_siblings_partial_match() {
    let mut store = InMemoryGuardianStore::new();
    store.insert_player(create_player("p1", "Emma", "Smith", Some("BT60 1AB")));
    store.insert_player(create_player("p2", "Jack", "Smith", Some("BT60 1AB")));
    store.insert_player(create_player("p3", "Lucy", "Smith", Some("BT70 2CD")));
    for player in ["p1", "p2", "p3"] {
        link(&mut store, "g1", player, LinkStatus::Active);
    }

    let bonus = check_player_postcode_match(&store, "g1", "BT60 1AB").await.unwrap();

    assert!(bonus.matches);
    assert_eq!(bonus.matched_players, vec!["Emma Smith", "Jack Smith"]);
}

#[tokio::test]
async fn test_integration_empty_postcode_skips_repository() {
    let store = InMemoryGuardianStore::new();

    let bonus = check_player_postcode_match(&store, "g1", "   ").await.unwrap();

    assert!(!bonus.matches);
    assert_eq!(store.round_trips(), 0);
}

#[tokio::test]
async fn test_integration_batched_equals_unbatched() {
    let (store, guardians) = create_club_store();
    let matcher = GuardianMatcher::default();
    let mut user = create_user("Smith", Some("BT60 1AB"));
    user.town = Some("armagh".to_string());

    let batched = matcher.find_guardian_matches(&store, &guardians, &user).await.unwrap();
    assert_eq!(store.round_trips(), 1);

    let unbatched = find_guardian_matches_unbatched(&matcher, &store, &guardians, &user)
        .await
        .unwrap();
    assert_eq!(store.round_trips(), 1 + 2 * guardians.len());

    assert!(!batched.is_empty());
    assert_eq!(batched, unbatched);
}

#[tokio::test]
async fn test_integration_ranking_is_deterministic() {
    let (store, guardians) = create_club_store();
    let matcher = GuardianMatcher::default();
    let user = create_user("Kelly", Some("BT61 1XY"));

    let first = matcher.find_guardian_matches(&store, &guardians, &user).await.unwrap();
    let second = matcher.find_guardian_matches(&store, &guardians, &user).await.unwrap();

    assert_eq!(first, second);

    for pair in first.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.score >= b.score);
        if a.score == b.score {
            assert!((a.guardian_created_at, &a.guardian_id) <= (b.guardian_created_at, &b.guardian_id));
        }
    }
}

#[tokio::test]
async fn test_integration_zero_scores_excluded() {
    let (store, guardians) = create_club_store();
    let matcher = GuardianMatcher::default();
    let user = RegisteringUserProfile {
        email: "nobody@example.org".to_string(),
        last_name: "Zed".to_string(),
        ..Default::default()
    };

    let results = matcher.find_guardian_matches(&store, &guardians, &user).await.unwrap();

    assert!(results.is_empty());
    assert_eq!(matcher.classify(&results), MatchOutcome::NoMatch);
}

#[tokio::test]
async fn test_integration_email_auto_claim() {
    let (store, guardians) = create_club_store();
    let matcher = GuardianMatcher::default();
    let user = create_user("Kelly", Some("D02 X285"));

    let results = matcher.find_guardian_matches(&store, &guardians, &user).await.unwrap();

    // g07 shares email, surname and postcode: 50 + 45
    assert_eq!(results[0].guardian_id, "g07");
    assert_eq!(results[0].score, 95);
    assert_eq!(results[0].confidence, ConfidenceLevel::High);
    assert_eq!(
        matcher.classify(&results),
        MatchOutcome::AutoClaim {
            guardian_id: "g07".to_string()
        }
    );
}

#[tokio::test]
async fn test_integration_claimed_guardian_needs_confirmation() {
    let store = InMemoryGuardianStore::new();
    let mut guardian = create_guardian("g1", "Smith", Some("BT60 1AB"), 0);
    guardian.email = Some("new.parent@example.com".to_string());
    guardian.claimed_by = Some("user-42".to_string());

    let matcher = GuardianMatcher::default();
    let user = create_user("Smith", Some("BT60 1AB"));
    let results = matcher.find_guardian_matches(&store, &[guardian], &user).await.unwrap();

    assert_eq!(
        matcher.classify(&results),
        MatchOutcome::NeedsConfirmation {
            guardian_ids: vec!["g1".to_string()]
        }
    );
}

#[tokio::test]
async fn test_integration_linked_children_exclude_declined() {
    let (store, guardians) = create_club_store();
    let matcher = GuardianMatcher::default();
    let user = create_user("Smith", Some("BT60 1AB"));

    let results = matcher.find_guardian_matches(&store, &guardians, &user).await.unwrap();

    // g00 and g10 have declined links only
    for result in results.iter().filter(|r| r.guardian_id == "g00" || r.guardian_id == "g10") {
        assert!(result.linked_children.is_empty());
    }
    let g06 = results.iter().find(|r| r.guardian_id == "g06").unwrap();
    assert_eq!(g06.linked_children.len(), 1);
    assert_eq!(g06.linked_children[0].postcode_matches_user, Some(true));
}
