use crate::models::{ConfidenceLevel, ConfidenceThresholds, MatchOutcome, MatchResult};

/// Turn ranked results into an onboarding decision
///
/// Auto-claim only when the top result is the sole high-confidence match and
/// nobody has claimed it yet. Any other non-empty list needs the user to
/// confirm.
pub fn classify_matches(results: &[MatchResult], thresholds: &ConfidenceThresholds) -> MatchOutcome {
    let Some(top) = results.first() else {
        return MatchOutcome::NoMatch;
    };

    let high_count = results
        .iter()
        .filter(|r| thresholds.level(r.score) == ConfidenceLevel::High)
        .count();

    if high_count == 1 && thresholds.level(top.score) == ConfidenceLevel::High && !top.guardian.is_claimed {
        return MatchOutcome::AutoClaim {
            guardian_id: top.guardian_id.clone(),
        };
    }

    MatchOutcome::NeedsConfirmation {
        guardian_ids: results.iter().map(|r| r.guardian_id.clone()).collect(),
    }
}
