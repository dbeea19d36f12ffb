use super::*;
use crate::account::test_helpers::dummy_account;

// =============================================================================
// normalize_email
// =============================================================================

#[test]
fn normalize_email_trims_and_lowercases() {
    assert_eq!(normalize_email("  Ann@Example.COM "), Some("ann@example.com".to_owned()));
}

#[test]
fn normalize_email_rejects_malformed_values() {
    assert_eq!(normalize_email(""), None);
    assert_eq!(normalize_email("ann"), None);
    assert_eq!(normalize_email("@example.com"), None);
    assert_eq!(normalize_email("ann@"), None);
    assert_eq!(normalize_email("a@b@c"), None);
}

// =============================================================================
// MemoryDirectory
// =============================================================================

#[tokio::test]
async fn register_then_find_round_trips() {
    let directory = MemoryDirectory::new(Latency::none());
    let account = dummy_account();
    directory.register(account.clone()).await.unwrap();

    let found = directory.find_by_email("ann@example.com").await.unwrap();
    assert_eq!(found, Some(account));
}

#[tokio::test]
async fn find_unknown_email_is_none() {
    let directory = MemoryDirectory::new(Latency::none());
    assert!(directory.find_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn register_duplicate_email_fails() {
    let directory = MemoryDirectory::new(Latency::none());
    directory.register(dummy_account()).await.unwrap();

    let err = directory.register(dummy_account()).await.unwrap_err();
    assert!(matches!(err, DirectoryError::AlreadyRegistered(email) if email == "ann@example.com"));
}

#[tokio::test]
async fn update_replaces_stored_account() {
    let directory = MemoryDirectory::new(Latency::none());
    let mut account = dummy_account();
    directory.register(account.clone()).await.unwrap();

    account.name = "Bea".into();
    directory.update(account).await.unwrap();

    let found = directory.find_by_email("ann@example.com").await.unwrap().unwrap();
    assert_eq!(found.name, "Bea");
}

#[tokio::test]
async fn seeded_directory_knows_the_demo_account() {
    let directory = MemoryDirectory::seeded(Latency::none());
    let demo = directory.find_by_email(DEMO_EMAIL).await.unwrap().unwrap();
    assert_eq!(demo.id, DEMO_USER_ID);
    assert_eq!(demo.name, "Test User");
}
