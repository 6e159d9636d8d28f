//! User profile types
//!
//! Profiles are keyed by the authenticated caller's stable user id
//! (`auth_user_id`), which is the upsert conflict key in the store.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, stable token for an authenticated caller.
///
/// Issued by the session provider; immutable for the lifetime of a session.
/// Absence of an identity means "unauthenticated".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthIdentity(String);

impl AuthIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AuthIdentity {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// User profile record, at most one per identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    /// Stable auth user id; unique conflict key for upserts.
    pub auth_user_id: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    /// Brazilian tax identifier (CPF or CNPJ), digits plus formatting.
    pub cpf_cnpj: Option<String>,
    /// Address fields (city, state, cep, ...); structure is opaque to the
    /// update operation and stored as JSON.
    pub address: Option<BTreeMap<String, String>>,
    pub profile_image: Option<String>,
    pub rating: f64,
    pub total_rentals: i64,
    pub verified: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Partial payload for the profile update operation.
///
/// The identity is deliberately not part of the payload; it is an explicit
/// parameter of the operation and is merged into the stored record there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub cpf_cnpj: Option<String>,
    pub address: Option<BTreeMap<String, String>>,
    pub profile_image: Option<String>,
}

impl ProfileUpdate {
    /// Merge this payload with an identity into a full profile record ready
    /// for an upsert. `now` is unix seconds; the store keeps `created_at`
    /// from the first insert on conflict.
    pub fn into_record(self, identity: &AuthIdentity, id: String, now: i64) -> UserProfile {
        UserProfile {
            id,
            auth_user_id: identity.as_str().to_owned(),
            full_name: self.full_name,
            phone: self.phone,
            cpf_cnpj: self.cpf_cnpj,
            address: self.address,
            profile_image: self.profile_image,
            rating: 0.0,
            total_rentals: 0,
            verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}
