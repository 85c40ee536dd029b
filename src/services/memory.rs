use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::models::{GuardianPlayerLink, LinkedPlayer, PlayerRecord};
use crate::services::GuardianLinkRepository;

/// In-process guardian-player link store
///
/// Links are indexed by guardian id, so lookups never scan the whole link
/// table. Every repository call is counted in [`round_trips`](Self::round_trips).
#[derive(Debug, Default)]
pub struct InMemoryGuardianStore {
    players: HashMap<String, PlayerRecord>,
    links_by_guardian: HashMap<String, Vec<GuardianPlayerLink>>,
    round_trips: AtomicUsize,
}

impl InMemoryGuardianStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_player(&mut self, player: PlayerRecord) {
        self.players.insert(player.id.clone(), player);
    }

    /// Add a link; links for one guardian keep insertion order
    pub fn insert_link(&mut self, link: GuardianPlayerLink) {
        self.links_by_guardian
            .entry(link.guardian_id.clone())
            .or_default()
            .push(link);
    }

    /// Number of repository calls served so far
    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    fn linked_players(&self, guardian_id: &str) -> Vec<LinkedPlayer> {
        self.links_by_guardian
            .get(guardian_id)
            .map(|links| {
                links
                    .iter()
                    .filter(|link| link.status.is_matchable())
                    .filter_map(|link| {
                        self.players.get(&link.player_id).map(|player| LinkedPlayer {
                            link: link.clone(),
                            player: player.clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl GuardianLinkRepository for InMemoryGuardianStore {
    type Error = Infallible;

    async fn find_links_by_guardian_ids(
        &self,
        guardian_ids: &[String],
    ) -> Result<HashMap<String, Vec<LinkedPlayer>>, Infallible> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);

        Ok(guardian_ids
            .iter()
            .map(|id| (id.clone(), self.linked_players(id)))
            .filter(|(_, links)| !links.is_empty())
            .collect())
    }

    async fn find_links_by_guardian_id(&self, guardian_id: &str) -> Result<Vec<LinkedPlayer>, Infallible> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);

        Ok(self.linked_players(guardian_id))
    }
}
