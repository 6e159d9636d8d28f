//! Profile service - authenticated upsert with dependent cache refresh

use std::sync::Arc;

use chrono::Utc;
use fieldmachine_domain::{
    AuthIdentity, FieldMachineError, ProfileUpdate, Result, UserProfile,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::ports::{MutationObserver, ProfileCache, ProfileRepository, SessionProvider};

/// Profile update service.
///
/// The cache is an explicit injected handle rather than ambient global state,
/// and identity is an explicit parameter rather than an implicit context
/// lookup, so the whole flow is testable with in-memory ports.
pub struct ProfileService {
    repository: Arc<dyn ProfileRepository>,
    cache: Arc<dyn ProfileCache>,
    observers: Vec<Arc<dyn MutationObserver>>,
}

impl ProfileService {
    /// Create a new profile service
    pub fn new(repository: Arc<dyn ProfileRepository>, cache: Arc<dyn ProfileCache>) -> Self {
        Self { repository, cache, observers: Vec::new() }
    }

    /// Register an observer notified once per settled mutation
    pub fn with_observer(mut self, observer: Arc<dyn MutationObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Update (insert-or-replace) the caller's profile.
    ///
    /// Preconditions: `identity` must be present; an absent identity fails
    /// immediately with `Unauthenticated` and performs no store access and no
    /// cache mutation.
    ///
    /// On success exactly one upsert is issued, conflict-keyed on the
    /// identity, followed by exactly one cache invalidation for that
    /// identity. There is no read-before-write, so retrying with the same
    /// payload is idempotent. A failed store write propagates unchanged and
    /// leaves the cache untouched.
    pub async fn update_profile(
        &self,
        identity: Option<&AuthIdentity>,
        payload: ProfileUpdate,
    ) -> Result<()> {
        let result = self.apply_update(identity, payload).await;
        for observer in &self.observers {
            observer.on_settled(&result);
        }
        result
    }

    /// Convenience wrapper resolving identity from a session provider first.
    pub async fn update_profile_for_session(
        &self,
        session: &dyn SessionProvider,
        payload: ProfileUpdate,
    ) -> Result<()> {
        let identity = session.current_identity();
        self.update_profile(identity.as_ref(), payload).await
    }

    /// Read the caller's profile, serving from the cache when possible.
    ///
    /// A miss reads the store and populates the cache; the write path never
    /// does, so a read after a successful update is always a fresh fetch.
    pub async fn get_profile(&self, identity: &AuthIdentity) -> Result<Option<UserProfile>> {
        if let Some(profile) = self.cache.get(identity) {
            return Ok(Some(profile));
        }

        let profile = self.repository.get_by_identity(identity).await?;
        if let Some(profile) = &profile {
            self.cache.insert(identity, profile.clone());
        }
        Ok(profile)
    }

    async fn apply_update(
        &self,
        identity: Option<&AuthIdentity>,
        payload: ProfileUpdate,
    ) -> Result<()> {
        let Some(identity) = identity else {
            warn!("profile update rejected: no authenticated identity");
            return Err(FieldMachineError::Unauthenticated(
                "profile update requires an authenticated caller".into(),
            ));
        };

        let now = Utc::now().timestamp();
        let record = payload.into_record(identity, Uuid::new_v4().to_string(), now);

        self.repository.upsert(record).await?;

        // Invalidate-only: the next read must be a fresh fetch.
        self.cache.invalidate(identity);
        info!(identity = %identity, "profile upserted, cached view invalidated");
        Ok(())
    }
}
