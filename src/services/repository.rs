//! The `GuardianLinkRepository` port.
//!
//! The matching engine only reads guardian-player links through this trait.
//! Implementations exist for PostgreSQL ([`crate::services::PostgresClient`])
//! and for an in-process store ([`crate::services::InMemoryGuardianStore`]).

use std::collections::HashMap;
use std::future::Future;

use crate::models::LinkedPlayer;

/// Read access to guardian-player links, keyed by guardian id
///
/// Both methods return only active or pending links, each joined with its
/// player, in link creation order. Declined links are never returned.
///
/// Every call counts as one round trip to the backing store.
pub trait GuardianLinkRepository: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Links for every guardian in `guardian_ids`, in a single round trip
    ///
    /// Guardians without links may be absent from the returned map.
    fn find_links_by_guardian_ids<'a>(
        &'a self,
        guardian_ids: &'a [String],
    ) -> impl Future<Output = Result<HashMap<String, Vec<LinkedPlayer>>, Self::Error>> + Send + 'a;

    /// Links for a single guardian
    fn find_links_by_guardian_id<'a>(
        &'a self,
        guardian_id: &'a str,
    ) -> impl Future<Output = Result<Vec<LinkedPlayer>, Self::Error>> + Send + 'a;
}
