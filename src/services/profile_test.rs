use super::*;

fn repo() -> MemoryProfileRepository {
    MemoryProfileRepository::new(Latency::none())
}

// =============================================================================
// get
// =============================================================================

#[tokio::test]
async fn get_missing_record_is_none() {
    let repo = repo();
    assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn seeded_repo_has_demo_profile() {
    let repo = MemoryProfileRepository::seeded(Latency::none());
    let profile = repo.get(DEMO_USER_ID).await.unwrap().unwrap();
    assert_eq!(profile.location.as_deref(), Some("San Francisco, CA"));
    assert!(profile.preferences.newsletter);
}

// =============================================================================
// update
// =============================================================================

#[tokio::test]
async fn update_missing_record_starts_from_defaults() {
    let repo = repo();
    let user_id = Uuid::new_v4();

    let profile = repo
        .update(user_id, ProfilePatch { bio: Some("hi".into()), ..ProfilePatch::default() })
        .await
        .unwrap();

    assert_eq!(profile.bio.as_deref(), Some("hi"));
    assert!(profile.preferences.notifications);
    assert!(!profile.preferences.newsletter);
    assert_eq!(profile.preferences.theme, Theme::Light);
    assert_eq!(profile.preferences.language, "en");
}

#[tokio::test]
async fn update_merges_shallowly_and_persists() {
    let repo = repo();
    let user_id = Uuid::new_v4();

    repo.update(user_id, ProfilePatch { location: Some("NYC".into()), ..ProfilePatch::default() })
        .await
        .unwrap();
    repo.update(user_id, ProfilePatch { bio: Some("x".into()), ..ProfilePatch::default() })
        .await
        .unwrap();

    let stored = repo.get(user_id).await.unwrap().unwrap();
    assert_eq!(stored.bio.as_deref(), Some("x"));
    assert_eq!(stored.location.as_deref(), Some("NYC"));
}

#[tokio::test]
async fn update_same_patch_twice_is_idempotent() {
    let repo = repo();
    let user_id = Uuid::new_v4();
    let patch = ProfilePatch { bio: Some("x".into()), ..ProfilePatch::default() };

    let first = repo.update(user_id, patch.clone()).await.unwrap();
    let second = repo.update(user_id, patch).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn update_merges_preferences_one_level_deep() {
    let repo = repo();
    let user_id = Uuid::new_v4();
    repo.update(user_id, ProfilePatch::default()).await.unwrap();

    let profile = repo
        .update(
            user_id,
            ProfilePatch {
                preferences: Some(PreferencesPatch {
                    theme: Some(Theme::Dark),
                    ..PreferencesPatch::default()
                }),
                ..ProfilePatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(profile.preferences.theme, Theme::Dark);
    assert!(profile.preferences.notifications);
    assert!(!profile.preferences.newsletter);
    assert_eq!(profile.preferences.language, "en");
}

// =============================================================================
// update_preferences
// =============================================================================

#[tokio::test]
async fn update_preferences_missing_record_fails() {
    let repo = repo();
    let user_id = Uuid::new_v4();

    let err = repo
        .update_preferences(user_id, PreferencesPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ProfileError::NotFound(id) if id == user_id));
}

#[tokio::test]
async fn update_preferences_merges_and_persists() {
    let repo = repo();
    let user_id = Uuid::new_v4();
    repo.update(user_id, ProfilePatch::default()).await.unwrap();

    let prefs = repo
        .update_preferences(
            user_id,
            PreferencesPatch { newsletter: Some(true), ..PreferencesPatch::default() },
        )
        .await
        .unwrap();
    assert!(prefs.newsletter);
    assert!(prefs.notifications);

    let stored = repo.get(user_id).await.unwrap().unwrap();
    assert!(stored.preferences.newsletter);
}

// =============================================================================
// delete
// =============================================================================

#[tokio::test]
async fn delete_removes_record() {
    let repo = repo();
    let user_id = Uuid::new_v4();
    repo.update(user_id, ProfilePatch::default()).await.unwrap();

    repo.delete(user_id).await.unwrap();
    assert!(repo.get(user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_absent_record_is_ok() {
    let repo = repo();
    assert!(repo.delete(Uuid::new_v4()).await.is_ok());
}
