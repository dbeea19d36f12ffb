//! Account directory — registered identities keyed by email.
//!
//! DESIGN
//! ======
//! The directory models the backend's user table behind an async port so a
//! network-backed implementation can be substituted without touching the
//! session store. The in-memory implementation stands in for that backend
//! and simulates its call latency. Email uniqueness is enforced here, in one
//! place, rather than by pre-checks in callers.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::account::UserAccount;
use crate::latency::Latency;

/// Fixed id of the demo account every fresh install knows about.
pub const DEMO_USER_ID: Uuid = uuid::uuid!("5eed0000-0000-4000-8000-000000000001");
/// Email of the demo account.
pub const DEMO_EMAIL: &str = "test@example.com";

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("email already registered: {0}")]
    AlreadyRegistered(String),
    /// Reserved for real backing stores; the in-memory directory never
    /// returns it.
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Normalize an email for use as a directory key: trim + ASCII lowercase.
/// Returns `None` unless the value has exactly one `@` between two non-empty
/// halves.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}

/// Port for identity lookup and registration.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Look up a registered account by its (normalized) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DirectoryError>;
    /// Register a new account. Fails if the email is already taken.
    async fn register(&self, account: UserAccount) -> Result<(), DirectoryError>;
    /// Write an account back under its email key. Upserts.
    async fn update(&self, account: UserAccount) -> Result<(), DirectoryError>;
}

// =============================================================================
// IN-MEMORY DIRECTORY
// =============================================================================

/// In-memory directory keyed by email. Simulates backend latency on every
/// call.
pub struct MemoryDirectory {
    accounts: RwLock<HashMap<String, UserAccount>>,
    latency: Latency,
}

impl MemoryDirectory {
    #[must_use]
    pub fn new(latency: Latency) -> Self {
        Self { accounts: RwLock::new(HashMap::new()), latency }
    }

    /// Directory pre-populated with the demo account.
    #[must_use]
    pub fn seeded(latency: Latency) -> Self {
        let now = time::OffsetDateTime::now_utc();
        let demo = UserAccount {
            id: DEMO_USER_ID,
            email: DEMO_EMAIL.into(),
            name: "Test User".into(),
            avatar: None,
            created_at: now,
            updated_at: now,
        };
        let mut accounts = HashMap::new();
        accounts.insert(demo.email.clone(), demo);
        Self { accounts: RwLock::new(accounts), latency }
    }
}

#[async_trait]
impl AccountDirectory for MemoryDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DirectoryError> {
        self.latency.simulate().await;
        let accounts = self.accounts.read().await;
        Ok(accounts.get(email).cloned())
    }

    async fn register(&self, account: UserAccount) -> Result<(), DirectoryError> {
        self.latency.simulate().await;
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.email) {
            return Err(DirectoryError::AlreadyRegistered(account.email));
        }
        debug!(user_id = %account.id, email = %account.email, "account registered");
        accounts.insert(account.email.clone(), account);
        Ok(())
    }

    async fn update(&self, account: UserAccount) -> Result<(), DirectoryError> {
        self.latency.simulate().await;
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.email.clone(), account);
        Ok(())
    }
}

#[cfg(test)]
#[path = "directory_test.rs"]
mod tests;
