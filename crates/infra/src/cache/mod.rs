//! Read-side profile view cache backed by moka
//!
//! Entries expire after a configurable TTL and the cache is bounded by entry
//! count. The write path never touches this cache except to invalidate.

use std::time::Duration;

use fieldmachine_core::profile::ports::ProfileCache;
use fieldmachine_domain::{AuthIdentity, CacheConfig, UserProfile};
use moka::sync::Cache;
use tracing::debug;

/// TTL + capacity bounded cache of profile views, keyed by auth user id.
pub struct MokaProfileCache {
    cache: Cache<String, UserProfile>,
}

impl MokaProfileCache {
    /// Create a cache from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_live(Duration::from_secs(config.ttl_seconds))
            .build();
        Self { cache }
    }

    /// Number of currently cached views (approximate under concurrency).
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl Default for MokaProfileCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl ProfileCache for MokaProfileCache {
    fn get(&self, identity: &AuthIdentity) -> Option<UserProfile> {
        self.cache.get(identity.as_str())
    }

    fn insert(&self, identity: &AuthIdentity, profile: UserProfile) {
        self.cache.insert(identity.as_str().to_owned(), profile);
    }

    fn invalidate(&self, identity: &AuthIdentity) {
        debug!(auth_user_id = %identity, "invalidating cached profile view");
        self.cache.invalidate(identity.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_profile(auth_user_id: &str, full_name: &str) -> UserProfile {
        UserProfile {
            id: format!("profile-{auth_user_id}"),
            auth_user_id: auth_user_id.into(),
            full_name: Some(full_name.into()),
            phone: None,
            cpf_cnpj: None,
            address: None,
            profile_image: None,
            rating: 0.0,
            total_rentals: 0,
            verified: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn insert_then_get_returns_cached_view() {
        let cache = MokaProfileCache::default();
        let identity = AuthIdentity::new("u-123");

        cache.insert(&identity, test_profile("u-123", "Ana"));

        let hit = cache.get(&identity).expect("cached view");
        assert_eq!(hit.full_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn invalidate_removes_the_entry() {
        let cache = MokaProfileCache::default();
        let identity = AuthIdentity::new("u-123");

        cache.insert(&identity, test_profile("u-123", "Ana"));
        cache.invalidate(&identity);

        assert!(cache.get(&identity).is_none());
    }

    #[test]
    fn invalidating_an_absent_entry_is_a_no_op() {
        let cache = MokaProfileCache::default();
        cache.invalidate(&AuthIdentity::new("nobody"));
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = MokaProfileCache::new(&CacheConfig { ttl_seconds: 1, capacity: 10 });
        let identity = AuthIdentity::new("u-123");

        cache.insert(&identity, test_profile("u-123", "Ana"));
        assert!(cache.get(&identity).is_some());
        std::thread::sleep(Duration::from_millis(1100));

        assert!(cache.get(&identity).is_none());
    }
}
