//! Account and profile data model.
//!
//! DESIGN
//! ======
//! `UserAccount` is the registered identity (directory-owned), `UserProfile`
//! the descriptive/preference record (profile-repository-owned), and
//! `Session` the union of both that the session store publishes. Partial
//! updates are expressed as patch structs: top-level fields merge shallowly,
//! `preferences` merges one level deep so a single key can be flipped without
//! replacing the record.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// PREFERENCES
// =============================================================================

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// User preferences. Always fully populated; defaults are applied when a
/// profile record is first created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Push/app notifications enabled.
    pub notifications: bool,
    /// Newsletter subscription.
    pub newsletter: bool,
    /// Color theme.
    pub theme: Theme,
    /// Locale tag, e.g. `"en"`.
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { notifications: true, newsletter: false, theme: Theme::Light, language: "en".into() }
    }
}

/// Partial preferences update. Present keys overwrite, absent keys are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesPatch {
    pub notifications: Option<bool>,
    pub newsletter: Option<bool>,
    pub theme: Option<Theme>,
    pub language: Option<String>,
}

impl Preferences {
    /// Merge a patch one level deep.
    pub fn apply(&mut self, patch: PreferencesPatch) {
        if let Some(notifications) = patch.notifications {
            self.notifications = notifications;
        }
        if let Some(newsletter) = patch.newsletter {
            self.newsletter = newsletter;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
    }
}

// =============================================================================
// PROFILE
// =============================================================================

/// Descriptive profile record keyed by user id. Every descriptive field is
/// optional ("not set"); `preferences` is always present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub preferences: Preferences,
}

/// Partial profile update. Top-level fields overwrite shallowly; the nested
/// `preferences` patch merges key by key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub preferences: Option<PreferencesPatch>,
}

impl UserProfile {
    /// Merge a patch: shallow on top-level fields, one level deep on
    /// `preferences`.
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(bio) = patch.bio {
            self.bio = Some(bio);
        }
        if let Some(location) = patch.location {
            self.location = Some(location);
        }
        if let Some(website) = patch.website {
            self.website = Some(website);
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = Some(phone_number);
        }
        if let Some(date_of_birth) = patch.date_of_birth {
            self.date_of_birth = Some(date_of_birth);
        }
        if let Some(preferences) = patch.preferences {
            self.preferences.apply(preferences);
        }
    }
}

// =============================================================================
// ACCOUNT
// =============================================================================

/// Registered identity. `id` is immutable once minted; `email` is the
/// directory lookup key and is stored normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Partial identity update. `id` and `email` are not patchable: the id is
/// immutable and the email is the directory key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

impl UserAccount {
    /// Mint a fresh account with a new v4 id and current timestamps.
    #[must_use]
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into the account.
    pub fn apply(&mut self, patch: AccountPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// The current authenticated identity plus its cached profile. Serialized
/// with the account fields flattened, which is also the durable slot layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    pub account: UserAccount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

impl Session {
    #[must_use]
    pub fn new(account: UserAccount, profile: Option<UserProfile>) -> Self {
        Self { account, profile }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;

    /// Account with fixed timestamps for deterministic assertions.
    #[must_use]
    pub fn dummy_account() -> UserAccount {
        let ts = time::macros::datetime!(2024-01-01 00:00:00 UTC);
        UserAccount {
            id: Uuid::new_v4(),
            email: "ann@example.com".into(),
            name: "Ann".into(),
            avatar: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    /// Profile with every descriptive field set.
    #[must_use]
    pub fn dummy_profile() -> UserProfile {
        UserProfile {
            bio: Some("Rust developer".into()),
            location: Some("NYC".into()),
            website: Some("https://example.com".into()),
            phone_number: Some("+1234567890".into()),
            date_of_birth: Some("1990-01-01".into()),
            preferences: Preferences::default(),
        }
    }
}
