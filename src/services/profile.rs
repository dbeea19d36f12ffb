//! Profile repository — authoritative profile records keyed by user id.
//!
//! DESIGN
//! ======
//! Profiles live apart from identities: the session store only caches a copy
//! and always re-reads the authoritative record after a mutation. `update`
//! upserts — a missing record starts from defaults — while the narrower
//! `update_preferences` insists the record already exists. Both merge
//! `preferences` one level deep.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::account::{Preferences, PreferencesPatch, ProfilePatch, Theme, UserProfile};
use crate::latency::Latency;
use crate::services::directory::DEMO_USER_ID;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile not found: {0}")]
    NotFound(Uuid),
    /// Reserved for real backing stores; the in-memory repository never
    /// returns it.
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// Port for profile storage and retrieval.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Read a profile. Absent records are `Ok(None)`, not an error.
    async fn get(&self, user_id: Uuid) -> Result<Option<UserProfile>, ProfileError>;
    /// Merge a patch into the stored profile, creating a default record
    /// first if none exists. Returns the new authoritative record.
    async fn update(&self, user_id: Uuid, patch: ProfilePatch) -> Result<UserProfile, ProfileError>;
    /// Merge a preferences patch into an existing record. Fails with
    /// [`ProfileError::NotFound`] when no record exists.
    async fn update_preferences(
        &self,
        user_id: Uuid,
        patch: PreferencesPatch,
    ) -> Result<Preferences, ProfileError>;
    /// Remove a record. Removing an absent record is not an error.
    async fn delete(&self, user_id: Uuid) -> Result<(), ProfileError>;
}

// =============================================================================
// IN-MEMORY REPOSITORY
// =============================================================================

/// In-memory profile table. Simulates backend latency on every call.
pub struct MemoryProfileRepository {
    profiles: RwLock<HashMap<Uuid, UserProfile>>,
    latency: Latency,
}

impl MemoryProfileRepository {
    #[must_use]
    pub fn new(latency: Latency) -> Self {
        Self { profiles: RwLock::new(HashMap::new()), latency }
    }

    /// Repository pre-populated with the demo account's profile.
    #[must_use]
    pub fn seeded(latency: Latency) -> Self {
        let demo = UserProfile {
            bio: Some("Software developer".into()),
            location: Some("San Francisco, CA".into()),
            website: Some("https://example.com".into()),
            phone_number: Some("+1234567890".into()),
            date_of_birth: Some("1990-01-01".into()),
            preferences: Preferences {
                notifications: true,
                newsletter: true,
                theme: Theme::Light,
                language: "en".into(),
            },
        };
        let mut profiles = HashMap::new();
        profiles.insert(DEMO_USER_ID, demo);
        Self { profiles: RwLock::new(profiles), latency }
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserProfile>, ProfileError> {
        self.latency.simulate().await;
        let profiles = self.profiles.read().await;
        Ok(profiles.get(&user_id).cloned())
    }

    async fn update(&self, user_id: Uuid, patch: ProfilePatch) -> Result<UserProfile, ProfileError> {
        self.latency.simulate().await;
        let mut profiles = self.profiles.write().await;
        let profile = profiles.entry(user_id).or_default();
        profile.apply(patch);
        debug!(user_id = %user_id, "profile updated");
        Ok(profile.clone())
    }

    async fn update_preferences(
        &self,
        user_id: Uuid,
        patch: PreferencesPatch,
    ) -> Result<Preferences, ProfileError> {
        self.latency.simulate().await;
        let mut profiles = self.profiles.write().await;
        let profile = profiles.get_mut(&user_id).ok_or(ProfileError::NotFound(user_id))?;
        profile.preferences.apply(patch);
        Ok(profile.preferences.clone())
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), ProfileError> {
        self.latency.simulate().await;
        let mut profiles = self.profiles.write().await;
        profiles.remove(&user_id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
