//! Session store — single source of truth for "who is logged in".
//!
//! DESIGN
//! ======
//! The store folds directory lookups and profile fetches into one `Session`
//! value, persists it to the durable slot on every mutation, and publishes
//! it on a watch channel so UI layers re-render on change. Operations are
//! expected to be driven serially by one user; each computes its result from
//! data captured before its await points and publishes unconditionally.
//!
//! TRADE-OFFS
//! ==========
//! `logout` clears the in-memory value immediately and unconditionally. A
//! login or signup still in flight when that happens will publish its
//! session afterwards and resurrect it — accepted for a single-user demo
//! core, and pinned by a test so changing it is a deliberate contract
//! change. There is no cancellation and no timeout: a started operation
//! always completes and applies its effect.

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::account::{AccountPatch, ProfilePatch, Session, UserAccount};
use crate::services::directory::{AccountDirectory, DirectoryError, normalize_email};
use crate::services::profile::{ProfileError, ProfileRepository};
use crate::storage::{KeyValueStore, StorageError};

/// Durable slot key holding the JSON-serialized session.
pub const SESSION_KEY: &str = "user";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("email already registered: {0}")]
    AlreadyRegistered(String),
    #[error("not authenticated")]
    NotAuthenticated,
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Cloneable handle over the session state. All clones share the same
/// current value, subscribers, and injected backends.
#[derive(Clone)]
pub struct SessionStore {
    directory: Arc<dyn AccountDirectory>,
    profiles: Arc<dyn ProfileRepository>,
    storage: Arc<dyn KeyValueStore>,
    current: watch::Sender<Option<Session>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(
        directory: Arc<dyn AccountDirectory>,
        profiles: Arc<dyn ProfileRepository>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        let (current, _) = watch::channel(None);
        Self { directory, profiles, storage, current }
    }

    // =========================================================================
    // READ SURFACE
    // =========================================================================

    /// The current session, if any.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    /// True iff a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Subscribe to session changes. The receiver always holds the latest
    /// value; `changed().await` wakes on every publish.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    // =========================================================================
    // AUTHENTICATION
    // =========================================================================

    /// Log in a registered email. The password is accepted but never
    /// verified — the demo backend stores no secrets.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` when the email is unknown (or malformed);
    /// directory/profile/storage errors pass through.
    pub async fn login(&self, email: &str, _password: &str) -> Result<Session, SessionError> {
        let Some(normalized) = normalize_email(email) else {
            return Err(SessionError::InvalidCredentials);
        };
        let Some(account) = self.directory.find_by_email(&normalized).await? else {
            warn!(email = %normalized, "login with unknown email");
            return Err(SessionError::InvalidCredentials);
        };

        let profile = self.profiles.get(account.id).await?;
        let session = Session::new(account, profile);
        self.persist(&session)?;
        info!(user_id = %session.account.id, email = %session.account.email, "user logged in");
        self.publish(Some(session.clone()));
        Ok(session)
    }

    /// Register a fresh email and log it in. Mints a new account, seeds a
    /// default profile, and persists the resulting session.
    ///
    /// # Errors
    ///
    /// `InvalidEmail` for a malformed address, `AlreadyRegistered` for a
    /// duplicate; directory/profile/storage errors pass through.
    pub async fn signup(
        &self,
        email: &str,
        _password: &str,
        name: &str,
    ) -> Result<Session, SessionError> {
        let normalized = normalize_email(email).ok_or(SessionError::InvalidEmail)?;
        let account = UserAccount::new(normalized, name);

        match self.directory.register(account.clone()).await {
            Ok(()) => {}
            Err(DirectoryError::AlreadyRegistered(email)) => {
                warn!(email = %email, "signup with registered email");
                return Err(SessionError::AlreadyRegistered(email));
            }
            Err(e) => return Err(e.into()),
        }

        // Initialize the default profile record, then read back the
        // authoritative copy.
        self.profiles.update(account.id, ProfilePatch::default()).await?;
        let profile = self.profiles.get(account.id).await?;

        let session = Session::new(account, profile);
        self.persist(&session)?;
        info!(user_id = %session.account.id, email = %session.account.email, "user signed up");
        self.publish(Some(session.clone()));
        Ok(session)
    }

    /// Clear the session. Takes effect on the in-memory value immediately;
    /// a failure to clear the durable slot is logged, not surfaced.
    pub fn logout(&self) {
        self.publish(None);
        if let Err(e) = self.storage.remove(SESSION_KEY) {
            warn!(error = %e, "failed to clear persisted session");
        }
        info!("user logged out");
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Merge an identity patch into the current account and write it back
    /// to the directory.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without an active session.
    pub async fn update_account(&self, patch: AccountPatch) -> Result<Session, SessionError> {
        let Some(mut session) = self.current() else {
            return Err(SessionError::NotAuthenticated);
        };

        session.account.apply(patch);
        session.account.updated_at = OffsetDateTime::now_utc();
        self.directory.update(session.account.clone()).await?;

        self.persist(&session)?;
        debug!(user_id = %session.account.id, "account updated");
        self.publish(Some(session.clone()));
        Ok(session)
    }

    /// Merge a profile patch through the profile repository and fold the
    /// authoritative result back into the session.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without an active session.
    pub async fn update_profile(&self, patch: ProfilePatch) -> Result<Session, SessionError> {
        let Some(mut session) = self.current() else {
            return Err(SessionError::NotAuthenticated);
        };

        let profile = self.profiles.update(session.account.id, patch).await?;
        session.profile = Some(profile);
        session.account.updated_at = OffsetDateTime::now_utc();

        self.persist(&session)?;
        debug!(user_id = %session.account.id, "profile updated");
        self.publish(Some(session.clone()));
        Ok(session)
    }

    // =========================================================================
    // REHYDRATION
    // =========================================================================

    /// Restore the persisted session at startup, if any, and spawn a
    /// best-effort background refresh of its cached profile. A missing,
    /// unreadable, or corrupt slot leaves the store anonymous.
    pub fn restore(&self) -> Option<Session> {
        let payload = match self.storage.get(SESSION_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read persisted session");
                return None;
            }
        };
        let session: Session = match serde_json::from_str(&payload) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "corrupt persisted session discarded");
                return None;
            }
        };

        info!(user_id = %session.account.id, "session restored");
        self.publish(Some(session.clone()));

        let store = self.clone();
        tokio::spawn(async move { store.refresh_profile().await });
        Some(session)
    }

    /// Re-read the current session's profile from the repository and fold
    /// it in. Best-effort: a fetch failure keeps the cached copy and is
    /// only logged.
    pub async fn refresh_profile(&self) {
        let Some(session) = self.current() else { return };
        match self.profiles.get(session.account.id).await {
            Ok(Some(profile)) => {
                self.current.send_modify(|current| {
                    if let Some(s) = current.as_mut() {
                        if s.account.id == session.account.id {
                            s.profile = Some(profile);
                        }
                    }
                });
                debug!(user_id = %session.account.id, "profile refreshed");
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, user_id = %session.account.id, "profile refresh failed; keeping cached copy");
            }
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn persist(&self, session: &Session) -> Result<(), SessionError> {
        let payload = serde_json::to_string(session).map_err(StorageError::from)?;
        self.storage.set(SESSION_KEY, &payload)?;
        Ok(())
    }

    fn publish(&self, session: Option<Session>) {
        self.current.send_replace(session);
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
