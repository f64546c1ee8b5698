//! Registration, identity plumbing and contact discovery.

mod common;

use common::{ids, Fixture};
use photoshare_common::hash_identity;
use photoshare_identity::RequestContext;
use photoshare_model::{ContactResolution, UserRecord};
use photoshare_service::{ErrorClass, ServiceError};

#[tokio::test]
async fn test_authenticate_hashes_provider_identities() {
    let fx: Fixture = Fixture::new();
    let ctx: RequestContext = fx
        .service
        .authenticate(Some("Bearer token-alice"))
        .await
        .unwrap();
    assert_eq!(ctx.subject, "alice");
    assert_eq!(ctx.bearer_token.as_deref(), Some("token-alice"));
    assert_eq!(ctx.contacts.email, Some(hash_identity("alice@example.com")));
    assert_eq!(ctx.contacts.apple_id, None);
}

#[tokio::test]
async fn test_authenticate_failures() {
    let fx: Fixture = Fixture::new();

    let err: ServiceError = fx.service.authenticate(None).await.unwrap_err();
    assert!(matches!(err, ServiceError::MissingCredential));
    assert_eq!(err.class(), ErrorClass::Unauthorized);

    let err: ServiceError = fx
        .service
        .authenticate(Some("Bearer forged"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthenticated(_)));
}

#[tokio::test]
async fn test_register_and_read_back() {
    let fx: Fixture = Fixture::new();
    let (ctx, user_id) = fx.register("alice").await;

    let me: UserRecord = fx.service.current_user(&ctx).await.unwrap();
    assert_eq!(me.id, user_id);
    assert_eq!(me.private_key, "priv-alice");
    assert_eq!(fx.service.public_key(&user_id).await.unwrap(), "pub-alice");
}

#[tokio::test]
async fn test_unregistered_caller_has_no_data() {
    let fx: Fixture = Fixture::new();
    let ctx: RequestContext = fx
        .service
        .authenticate(Some("Bearer token-ghost"))
        .await
        .unwrap();
    let err: ServiceError = fx.service.current_user(&ctx).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::NoContent);
}

#[tokio::test]
async fn test_resolve_single_phone_digest() {
    let fx: Fixture = Fixture::new();
    let (alice, alice_id) = fx.register("alice").await;
    let h1: String = alice.contacts.phone.clone().unwrap();

    let resolution: ContactResolution = fx
        .service
        .resolve_contacts(&[], &[h1], &[])
        .await
        .unwrap();
    assert_eq!(resolution.existing.len(), 1);
    assert_eq!(resolution.existing[&alice_id], "pub-alice");
    assert!(resolution.unmatched.is_empty());
}

#[tokio::test]
async fn test_resolve_merges_spaces_without_duplicates() {
    let fx: Fixture = Fixture::new();
    let (alice, alice_id) = fx.register("alice").await;
    let (_bob, bob_id) = fx.register("bob").await;
    let unknown: String = hash_identity("+15550000000");

    let resolution: ContactResolution = fx
        .service
        .resolve_contacts(
            &[alice_id.clone()],
            &[alice.contacts.phone.clone().unwrap(), unknown.clone()],
            &[alice.contacts.email.clone().unwrap(), hash_identity("bob@example.com")],
        )
        .await
        .unwrap();

    assert_eq!(resolution.existing.len(), 2);
    assert!(resolution.existing.contains_key(&alice_id));
    assert!(resolution.existing.contains_key(&bob_id));
    assert_eq!(resolution.unmatched, vec![unknown]);
}

#[tokio::test]
async fn test_resolve_nothing() {
    let fx: Fixture = Fixture::new();
    fx.register("alice").await;

    let err: ServiceError = fx.service.resolve_contacts(&[], &[], &[]).await.unwrap_err();
    assert!(matches!(err, ServiceError::NoData));

    let err: ServiceError = fx
        .service
        .resolve_contacts(&[], &[hash_identity("+15550000000")], &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NoData));
}

#[tokio::test]
async fn test_update_contact_follows_token() {
    let fx: Fixture = Fixture::new();
    let (ctx, user_id) = fx.register("alice").await;

    let mut refreshed: RequestContext = ctx.clone();
    refreshed.contacts.email = Some(hash_identity("alice@new.example.com"));
    fx.service.update_contact(&refreshed).await.unwrap();

    let resolution: ContactResolution = fx
        .service
        .resolve_contacts(&[], &[], &[hash_identity("alice@new.example.com")])
        .await
        .unwrap();
    assert!(resolution.existing.contains_key(&user_id));
}

#[tokio::test]
async fn test_verify_identifiers() {
    let fx: Fixture = Fixture::new();
    let (_, alice_id) = fx.register("alice").await;

    let valid: Vec<String> = fx
        .service
        .verify_identifiers(&[alice_id.clone(), "7c0d3c8e-0000-4000-8000-000000000000".to_string()])
        .await
        .unwrap();
    assert_eq!(valid, vec![alice_id]);

    let err: ServiceError = fx.service.verify_identifiers(&ids(&[])).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_storage_claims_unavailable_by_default() {
    let fx: Fixture = Fixture::new();
    let (ctx, _) = fx.register("alice").await;
    let err: ServiceError = fx.service.grant_storage_claim(&ctx).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::NotImplemented);
}
