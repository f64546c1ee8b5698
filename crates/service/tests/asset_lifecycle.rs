//! Asset lifecycle across metadata and object storage.

mod common;

use std::collections::HashMap;

use common::{asset, asset_with_original, ids, Fixture};
use photoshare_common::ValidationError;
use photoshare_model::{decode_total_size, encode_total_size, AssetRecord, NewAsset, SizeMap};
use photoshare_service::ServiceError;
use photoshare_storage::ObjectLocator;

#[tokio::test]
async fn test_reported_size_floors_each_representation() {
    let fx: Fixture = Fixture::new();
    let (ctx, _) = fx.register("alice").await;

    let cases: [(i64, i64, u64); 4] = [
        (0, 0, 262_144),
        (1_000_000, 2_000, 1_131_072),
        (131_072, 131_073, 262_145),
        (5_000_000, 400_000, 5_400_000),
    ];
    for (n, (original, low, expected)) in cases.into_iter().enumerate() {
        let id: String = format!("a{}", n);
        fx.storage.insert("media", format!("{}_original", id), original);
        fx.storage.insert("media", format!("{}_low", id), low);

        let size: Option<u64> = fx
            .service
            .create_asset(&ctx, &asset_with_original("media", &id))
            .await
            .unwrap();
        assert_eq!(size, Some(expected), "original={} low={}", original, low);
        assert_eq!(decode_total_size(&encode_total_size(expected)), Some(expected));
    }
}

#[tokio::test]
async fn test_low_key_is_derived_from_original_key() {
    let fx: Fixture = Fixture::new();
    let (ctx, _) = fx.register("alice").await;
    fx.storage.insert("media", "trip/IMG_1_original", 400_000);
    fx.storage.insert("media", "trip/IMG_1_low", 20_000);

    let mut new_asset: NewAsset = asset("media", "x");
    new_asset.remote_path = "https://s3.example.com/media/trip/IMG_1_low".to_string();
    new_asset.remote_path_orig = Some("https://s3.example.com/media/trip/IMG_1_original".to_string());
    fx.service.create_asset(&ctx, &new_asset).await.unwrap();

    assert_eq!(
        fx.storage.head_calls(),
        vec![
            ObjectLocator::new("media", "trip/IMG_1_original"),
            ObjectLocator::new("media", "trip/IMG_1_low"),
        ]
    );

    // Deletion removes exactly the pair the size probe measured.
    fx.service.delete_assets(&ctx, &ids(&["x"])).await.unwrap();
    assert_eq!(
        fx.storage.delete_calls(),
        vec![(
            "media".to_string(),
            ids(&["trip/IMG_1_low", "trip/IMG_1_original"])
        )]
    );
    assert!(fx.storage.is_empty());
}

#[tokio::test]
async fn test_zero_dimensions_touch_nothing() {
    let fx: Fixture = Fixture::new();
    let (ctx, _) = fx.register("alice").await;
    fx.store.clear_calls();

    let mut flat: NewAsset = asset_with_original("media", "a1");
    flat.pixel_width = 0;
    flat.pixel_height = 0;

    let err: ServiceError = fx.service.create_asset(&ctx, &flat).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::ZeroDimension { .. })
    ));
    assert!(fx.store.calls().is_empty());
    assert!(fx.storage.head_calls().is_empty());
}

#[tokio::test]
async fn test_create_many_keeps_items_before_failure() {
    let fx: Fixture = Fixture::new();
    let (ctx, _) = fx.register("alice").await;

    let mut b: NewAsset = asset("media", "B");
    b.pixel_width = 0;
    let c: NewAsset = asset("media", "C");

    let err: ServiceError = fx
        .service
        .create_assets(&ctx, &[asset("media", "A"), b, c])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::ZeroDimension { width: 0, .. })
    ));

    let stored: HashMap<String, AssetRecord> = fx.service.assets(&ctx).await.unwrap();
    assert_eq!(stored.keys().collect::<Vec<_>>(), vec!["A"]);
}

#[tokio::test]
async fn test_create_many_reports_sizes_of_items_with_originals() {
    let fx: Fixture = Fixture::new();
    let (ctx, _) = fx.register("alice").await;
    fx.storage.insert("media", "B_original", 1_000_000);
    fx.storage.insert("media", "B_low", 1_000);

    let sizes: SizeMap = fx
        .service
        .create_assets(&ctx, &[asset("media", "A"), asset_with_original("media", "B")])
        .await
        .unwrap();
    assert_eq!(sizes.len(), 1);
    assert_eq!(sizes["B"], 1_131_072);
}

#[tokio::test]
async fn test_delete_groups_objects_by_bucket() {
    let fx: Fixture = Fixture::new();
    let (ctx, _) = fx.register("alice").await;
    for (bucket, id) in [("photos-eu", "a1"), ("photos-us", "a2"), ("photos-eu", "a3")] {
        fx.storage.insert(bucket, format!("{}_original", id), 200_000);
        fx.storage.insert(bucket, format!("{}_low", id), 20_000);
        fx.service
            .create_asset(&ctx, &asset_with_original(bucket, id))
            .await
            .unwrap();
    }

    fx.service
        .delete_assets(&ctx, &ids(&["a1", "a2", "a3"]))
        .await
        .unwrap();

    let calls: Vec<(String, Vec<String>)> = fx.storage.delete_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "photos-eu");
    assert_eq!(
        calls[0].1,
        ids(&["a1_low", "a1_original", "a3_low", "a3_original"])
    );
    assert_eq!(calls[1], ("photos-us".to_string(), ids(&["a2_low", "a2_original"])));
    assert!(fx.storage.is_empty());
}

#[tokio::test]
async fn test_delete_failure_leaves_orphaned_objects() {
    let fx: Fixture = Fixture::new();
    let (ctx, _) = fx.register("alice").await;
    fx.storage.insert("photos-eu", "a1_low", 10);
    fx.storage.insert("photos-us", "a2_low", 10);
    fx.service.create_asset(&ctx, &asset("photos-eu", "a1")).await.unwrap();
    fx.service.create_asset(&ctx, &asset("photos-us", "a2")).await.unwrap();
    fx.storage.fail_deletes_in("photos-eu");

    let err: ServiceError = fx
        .service
        .delete_assets(&ctx, &ids(&["a1", "a2"]))
        .await
        .unwrap_err();
    assert!(err.is_server_fault());

    // Metadata is gone; the first bucket failed, so the second was never reached.
    assert!(matches!(
        fx.service.assets(&ctx).await.unwrap_err(),
        ServiceError::NoData
    ));
    assert!(fx.storage.contains("photos-eu", "a1_low"));
    assert!(fx.storage.contains("photos-us", "a2_low"));
    assert_eq!(fx.storage.delete_calls().len(), 1);
}

#[tokio::test]
async fn test_filename_patch_is_idempotent() {
    let fx: Fixture = Fixture::new();
    let (ctx, _) = fx.register("alice").await;
    fx.service.create_asset(&ctx, &asset("media", "a1")).await.unwrap();
    fx.service.create_asset(&ctx, &asset("media", "a2")).await.unwrap();

    let names: HashMap<String, String> = HashMap::from([
        ("a1".to_string(), "IMG_0001.HEIC".to_string()),
        ("a2".to_string(), "IMG_0002.MOV".to_string()),
    ]);
    fx.service.set_original_filenames(&ctx, &names).await.unwrap();
    let first: HashMap<String, AssetRecord> = fx.service.assets(&ctx).await.unwrap();

    fx.service.set_original_filenames(&ctx, &names).await.unwrap();
    let second: HashMap<String, AssetRecord> = fx.service.assets(&ctx).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second["a2"].original_filename.as_deref(), Some("IMG_0002.MOV"));

    fx.service
        .set_original_filename(&ctx, "a1", "renamed.heic")
        .await
        .unwrap();
    let third: HashMap<String, AssetRecord> = fx.service.assets(&ctx).await.unwrap();
    assert_eq!(third["a1"].original_filename.as_deref(), Some("renamed.heic"));
}

#[tokio::test]
async fn test_attach_original_path_later() {
    let fx: Fixture = Fixture::new();
    let (ctx, _) = fx.register("alice").await;
    fx.service.create_asset(&ctx, &asset("media", "a1")).await.unwrap();
    fx.storage.insert("media", "a1_original", 3_000_000);
    fx.storage.insert("media", "a1_low", 90_000);

    let size: u64 = fx
        .service
        .attach_original_path(
            &ctx,
            "a1",
            "https://s3.us-east-1.amazonaws.com/media/a1_original",
        )
        .await
        .unwrap();
    assert_eq!(size, 3_131_072);

    let stored: HashMap<String, AssetRecord> = fx.service.assets(&ctx).await.unwrap();
    assert_eq!(stored["a1"].total_size, Some(3_131_072));
}

#[tokio::test]
async fn test_owner_scoping() {
    let fx: Fixture = Fixture::new();
    let (alice, _) = fx.register("alice").await;
    let (bob, _) = fx.register("bob").await;
    fx.storage.insert("media", "a1_low", 10);
    fx.service.create_asset(&alice, &asset("media", "a1")).await.unwrap();

    fx.service.delete_assets(&bob, &ids(&["a1"])).await.unwrap();
    assert!(fx.storage.delete_calls().is_empty());
    assert!(fx.service.assets(&alice).await.unwrap().contains_key("a1"));
}
