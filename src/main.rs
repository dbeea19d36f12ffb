//! Scripted demo of the session flows a UI would drive.

use std::sync::Arc;

use authcore::account::ProfilePatch;
use authcore::latency::Latency;
use authcore::services::directory::{DEMO_EMAIL, MemoryDirectory};
use authcore::services::profile::MemoryProfileRepository;
use authcore::services::session::SessionStore;
use authcore::storage::FileKeyValueStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let slot_path = std::env::var("SESSION_SLOT_PATH").unwrap_or_else(|_| "session.json".into());
    let storage = FileKeyValueStore::open(&slot_path).expect("session slot init failed");

    let latency = Latency::from_env();
    let store = SessionStore::new(
        Arc::new(MemoryDirectory::seeded(latency)),
        Arc::new(MemoryProfileRepository::seeded(latency)),
        Arc::new(storage),
    );

    // Restore a previous run's session, or log in the seeded demo account.
    let session = match store.restore() {
        Some(session) => {
            tracing::info!(email = %session.account.email, "restored previous session");
            session
        }
        None => {
            let session = store
                .login(DEMO_EMAIL, "password123")
                .await
                .expect("demo login failed");
            tracing::info!(email = %session.account.email, name = %session.account.name, "logged in");
            session
        }
    };

    let session = store
        .update_profile(ProfilePatch { location: Some("Lisbon".into()), ..ProfilePatch::default() })
        .await
        .expect("profile update failed");
    tracing::info!(
        user_id = %session.account.id,
        location = session.profile.as_ref().and_then(|p| p.location.as_deref()),
        "profile updated"
    );

    tracing::info!(
        authenticated = store.is_authenticated(),
        slot = %slot_path,
        "session persisted; run again to restore it, or delete the slot file to reset"
    );
}
