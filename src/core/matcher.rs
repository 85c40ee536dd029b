use std::cmp::Ordering;
use std::collections::HashSet;

use crate::core::bonus::{
    check_player_postcode_match, project_linked_children, resolve_player_postcode_matches,
};
use crate::core::outcome::classify_matches;
use crate::core::scoring::calculate_match_score;
use crate::models::{
    ConfidenceThresholds, GuardianRecord, GuardianSummary, MatchOutcome, MatchResult,
    MatchingWeights, RegisteringUserProfile,
};
use crate::services::GuardianLinkRepository;

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Batched linked-player lookup (one repository round trip)
/// 2. Linked-player postcode bonus per guardian
/// 3. Signal scoring
/// 4. Zero-score filter and deterministic ranking
///
/// Holds only immutable configuration; safe to share across requests.
#[derive(Debug, Clone)]
pub struct GuardianMatcher {
    weights: MatchingWeights,
    thresholds: ConfidenceThresholds,
}

impl GuardianMatcher {
    pub fn new(weights: MatchingWeights, thresholds: ConfidenceThresholds) -> Self {
        Self { weights, thresholds }
    }

    pub fn with_default_weights() -> Self {
        Self::new(MatchingWeights::default(), ConfidenceThresholds::default())
    }

    pub fn weights(&self) -> &MatchingWeights {
        &self.weights
    }

    pub fn thresholds(&self) -> &ConfidenceThresholds {
        &self.thresholds
    }

    /// Find the guardian records that plausibly belong to a registering user
    ///
    /// # Arguments
    /// * `repo` - Link store used for the linked-player bonus
    /// * `candidates` - Guardians to consider, selected by the caller
    /// * `user` - Signals volunteered by the registering user
    ///
    /// # Returns
    /// Results with a score above zero, highest first. Equal scores are
    /// ordered by guardian creation time, then guardian id.
    pub async fn find_guardian_matches<R: GuardianLinkRepository>(
        &self,
        repo: &R,
        candidates: &[GuardianRecord],
        user: &RegisteringUserProfile,
    ) -> Result<Vec<MatchResult>, R::Error> {
        let mut seen = HashSet::new();
        let candidates: Vec<&GuardianRecord> = candidates
            .iter()
            .filter(|guardian| seen.insert(guardian.id.as_str()))
            .collect();

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let guardian_ids: Vec<String> = candidates.iter().map(|g| g.id.clone()).collect();

        // Stage 1: one batched fetch for every candidate
        let links_by_guardian = repo.find_links_by_guardian_ids(&guardian_ids).await?;

        // Stage 2: in-memory bonus lookup
        let user_postcode = user.postcode.as_deref().unwrap_or_default();
        let bonus_by_guardian =
            resolve_player_postcode_matches(&guardian_ids, &links_by_guardian, user_postcode);

        tracing::debug!(
            "Resolved links for {} candidates ({} with linked players)",
            guardian_ids.len(),
            links_by_guardian.len()
        );

        // Stage 3 & 4: score, drop zero scores
        let mut results: Vec<MatchResult> = candidates
            .into_iter()
            .filter_map(|guardian| {
                let scored = calculate_match_score(
                    guardian,
                    user,
                    bonus_by_guardian.get(&guardian.id),
                    &self.weights,
                );

                if scored.score == 0 {
                    return None;
                }

                let linked_children = links_by_guardian
                    .get(&guardian.id)
                    .map(|links| project_linked_children(links, user.postcode.as_deref()))
                    .unwrap_or_default();

                Some(MatchResult {
                    guardian_id: guardian.id.clone(),
                    guardian: GuardianSummary::from(guardian),
                    guardian_created_at: guardian.created_at,
                    score: scored.score,
                    confidence: self.thresholds.level(scored.score),
                    signals: scored.signals,
                    linked_children,
                })
            })
            .collect();

        results.sort_by(rank_order);

        tracing::debug!("Scored {} guardian matches", results.len());

        Ok(results)
    }

    /// Classify ranked results with this matcher's thresholds
    pub fn classify(&self, results: &[MatchResult]) -> MatchOutcome {
        classify_matches(results, &self.thresholds)
    }
}

impl Default for GuardianMatcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Score descending, then creation time ascending, then id ascending
fn rank_order(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.guardian_created_at.cmp(&b.guardian_created_at))
        .then_with(|| a.guardian_id.cmp(&b.guardian_id))
}

/// Score every candidate through the single-guardian resolver
///
/// Same results as [`GuardianMatcher::find_guardian_matches`], but each
/// candidate goes through [`check_player_postcode_match`] and a separate link
/// fetch for its children: two round trips per candidate, one when the user
/// gave no postcode.
pub async fn find_guardian_matches_unbatched<R: GuardianLinkRepository>(
    matcher: &GuardianMatcher,
    repo: &R,
    candidates: &[GuardianRecord],
    user: &RegisteringUserProfile,
) -> Result<Vec<MatchResult>, R::Error> {
    let mut results = Vec::new();
    let mut seen = HashSet::new();
    let user_postcode = user.postcode.as_deref().unwrap_or_default();

    for guardian in candidates {
        if !seen.insert(guardian.id.as_str()) {
            continue;
        }

        let bonus = check_player_postcode_match(repo, &guardian.id, user_postcode).await?;
        let links = repo.find_links_by_guardian_id(&guardian.id).await?;

        let scored = calculate_match_score(guardian, user, Some(&bonus), matcher.weights());
        if scored.score == 0 {
            continue;
        }

        results.push(MatchResult {
            guardian_id: guardian.id.clone(),
            guardian: GuardianSummary::from(guardian),
            guardian_created_at: guardian.created_at,
            score: scored.score,
            confidence: matcher.thresholds().level(scored.score),
            signals: scored.signals,
            linked_children: project_linked_children(&links, user.postcode.as_deref()),
        });
    }

    results.sort_by(rank_order);
    Ok(results)
}
