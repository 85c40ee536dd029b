use std::collections::HashMap;

use crate::core::normalize::normalize_postcode;
use crate::models::{LinkedChild, LinkedPlayer, PlayerPostcodeMatch};
use crate::services::GuardianLinkRepository;

/// Check whether a user's postcode matches any child linked to a guardian
///
/// Handles separated parents: the child may live at the registering user's
/// address even when the guardian record holds another one. Makes one
/// repository call; use [`resolve_player_postcode_matches`] when scoring
/// many guardians.
pub async fn check_player_postcode_match<R: GuardianLinkRepository>(
    repo: &R,
    guardian_id: &str,
    user_postcode: &str,
) -> Result<PlayerPostcodeMatch, R::Error> {
    let normalized = normalize_postcode(user_postcode);
    if normalized.is_empty() {
        return Ok(PlayerPostcodeMatch::none());
    }

    let links = repo.find_links_by_guardian_id(guardian_id).await?;
    Ok(match_linked_players(&links, &normalized))
}

/// Build the guardian id -> bonus lookup from one batched link fetch
///
/// Every guardian in `guardian_ids` gets an entry, including those without
/// links.
pub fn resolve_player_postcode_matches(
    guardian_ids: &[String],
    links_by_guardian: &HashMap<String, Vec<LinkedPlayer>>,
    user_postcode: &str,
) -> HashMap<String, PlayerPostcodeMatch> {
    let normalized = normalize_postcode(user_postcode);

    guardian_ids
        .iter()
        .map(|id| {
            let result = match links_by_guardian.get(id) {
                Some(links) if !normalized.is_empty() => match_linked_players(links, &normalized),
                _ => PlayerPostcodeMatch::none(),
            };
            (id.clone(), result)
        })
        .collect()
}

/// Compare linked players against an already normalized user postcode
pub fn match_linked_players(links: &[LinkedPlayer], normalized_user_postcode: &str) -> PlayerPostcodeMatch {
    if normalized_user_postcode.is_empty() {
        return PlayerPostcodeMatch::none();
    }

    let matched_players: Vec<String> = links
        .iter()
        .filter(|linked| linked.link.status.is_matchable())
        .filter(|linked| {
            let player_postcode = normalize_postcode(linked.player.postcode.as_deref().unwrap_or_default());
            !player_postcode.is_empty() && player_postcode == normalized_user_postcode
        })
        .map(|linked| linked.player.full_name())
        .collect();

    PlayerPostcodeMatch {
        matches: !matched_players.is_empty(),
        matched_players,
    }
}

/// Children to show next to a guardian match, declined links excluded
pub fn project_linked_children(links: &[LinkedPlayer], user_postcode: Option<&str>) -> Vec<LinkedChild> {
    let user_postcode = normalize_postcode(user_postcode.unwrap_or_default());

    links
        .iter()
        .filter(|linked| linked.link.status.is_matchable())
        .map(|linked| {
            let player_postcode = normalize_postcode(linked.player.postcode.as_deref().unwrap_or_default());
            let postcode_matches_user = (!user_postcode.is_empty() && !player_postcode.is_empty())
                .then(|| player_postcode == user_postcode);

            LinkedChild {
                player_id: linked.player.id.clone(),
                first_name: linked.player.first_name.clone(),
                last_name: linked.player.last_name.clone(),
                date_of_birth: linked.player.date_of_birth.clone(),
                postcode_matches_user,
            }
        })
        .collect()
}
