//! Port interfaces for the profile update flow
//!
//! These traits define the boundaries between core business logic and
//! infrastructure implementations: the persistent store, the session
//! provider, the read-side profile cache, and the view-layer observer.

use async_trait::async_trait;
use fieldmachine_domain::{AuthIdentity, Result, UserProfile};

/// Trait for user profile persistence and retrieval.
///
/// `upsert` must behave as insert-or-replace keyed on `auth_user_id`: issuing
/// the same record twice leaves the same final state, and a failed upsert
/// leaves prior state unchanged.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Get a profile by its stable auth user id (the conflict key)
    async fn get_by_identity(&self, identity: &AuthIdentity) -> Result<Option<UserProfile>>;

    /// Insert-or-replace a profile, conflict-resolved on `auth_user_id`
    async fn upsert(&self, profile: UserProfile) -> Result<()>;
}

/// Source of truth for "is a caller authenticated".
///
/// The profile update operation takes identity as an explicit parameter;
/// this port exists for callers that resolve it from session state first.
pub trait SessionProvider: Send + Sync {
    /// Current authenticated identity, or `None` when unauthenticated
    fn current_identity(&self) -> Option<AuthIdentity>;
}

/// Read-side cache of profile views, keyed by identity.
///
/// The write path only ever invalidates; it never populates. Invalidating an
/// absent entry is a no-op, so concurrent invalidations commute.
pub trait ProfileCache: Send + Sync {
    fn get(&self, identity: &AuthIdentity) -> Option<UserProfile>;

    fn insert(&self, identity: &AuthIdentity, profile: UserProfile);

    /// Mark any cached view for `identity` as stale (remove it)
    fn invalidate(&self, identity: &AuthIdentity);
}

/// Observer notified once per settled profile mutation.
///
/// Decouples pending/success/error bookkeeping (a view-layer concern) from
/// the core operation.
pub trait MutationObserver: Send + Sync {
    fn on_settled(&self, result: &Result<()>);
}
