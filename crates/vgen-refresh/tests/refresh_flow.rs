//! End-to-end refresh against a mocked storage API.

use serde_json::json;
use vgen_models::Scene;
use vgen_refresh::{RefreshConfig, SceneRefresher};
use vgen_storage::{StorageClient, StorageConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("vgen_refresh=debug,vgen_storage=debug")
        .with_test_writer()
        .try_init();
}

fn refresher_for(server: &MockServer) -> SceneRefresher<StorageClient> {
    let client = StorageClient::new(StorageConfig::new(server.uri(), "service-key"))
        .expect("client should build");
    SceneRefresher::new(client, RefreshConfig::new(server.uri()))
}

#[tokio::test]
async fn test_signed_scene_gets_new_token() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/sign/media/abc.png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "signedURL": "/object/sign/media/abc.png?token=2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let refresher = refresher_for(&server);
    let original = format!("{}/storage/v1/object/sign/media/abc.png?token=1", server.uri());
    let scenes = vec![Scene::new().with_primary_image(original)];

    let refreshed = refresher.refresh_batch(scenes).await;

    assert_eq!(refreshed.len(), 1);
    assert_eq!(
        refreshed[0].primary_image,
        Some(format!("{}/storage/v1/object/sign/media/abc.png?token=2", server.uri()))
    );
}

#[tokio::test]
async fn test_public_batch_makes_no_requests() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let refresher = refresher_for(&server);
    let scenes = vec![Scene::new().with_primary_image(format!(
        "{}/storage/v1/object/public/media/abc.png",
        server.uri()
    ))];

    let outcome = refresher.refresh_batch_detailed(scenes.clone()).await;

    assert!(outcome.skipped);
    assert_eq!(outcome.scenes, scenes);
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_backend_rejection_keeps_original_link() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/sign/media/voice.mp3"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "statusCode": "404",
            "error": "not_found",
            "message": "Object not found"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/sign/media/clip.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "signedURL": "/object/sign/media/clip.mp4?token=new"
        })))
        .mount(&server)
        .await;

    let refresher = refresher_for(&server);
    let audio = format!("{}/storage/v1/object/sign/media/voice.mp3?token=old", server.uri());
    let video = format!("{}/storage/v1/object/sign/media/clip.mp4?token=old", server.uri());
    let scene = Scene::new().with_audio(audio.clone()).with_video(video);

    let (refreshed, report) = refresher.refresh_scene_with_report(&scene).await;

    assert_eq!(refreshed.audio, Some(audio));
    assert_eq!(
        refreshed.video,
        Some(format!("{}/storage/v1/object/sign/media/clip.mp4?token=new", server.uri()))
    );
    assert_eq!(report.refreshed, 1);
    assert_eq!(report.fallbacks.len(), 1);
}

#[tokio::test]
async fn test_failing_backend_returns_batch_unchanged() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let refresher = refresher_for(&server);
    let endpoint = server.uri();
    let original = format!("{}/storage/v1/object/sign/media/abc.png?token=1", endpoint);
    let scenes = vec![
        Scene::new().with_primary_image(original.clone()),
        Scene::new().with_alternate_images([original.clone(), original.clone()]),
    ];

    let outcome = refresher.refresh_batch_detailed(scenes.clone()).await;

    assert!(!outcome.skipped);
    assert_eq!(outcome.scenes, scenes);
    assert_eq!(outcome.report.fallbacks.len(), 3);
}

#[tokio::test]
async fn test_malformed_signed_url_keeps_original_link() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/sign/media/abc.png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "signedURL": "quota exceeded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let refresher = refresher_for(&server);
    let original = format!("{}/storage/v1/object/sign/media/abc.png?token=1", server.uri());
    let scene = Scene::new().with_primary_image(original.clone());

    let (refreshed, report) = refresher.refresh_scene_with_report(&scene).await;

    assert_eq!(refreshed.primary_image, Some(original));
    assert_eq!(report.refreshed, 0);
    assert_eq!(report.fallbacks.len(), 1);
    assert!(report.fallbacks[0].reason.contains("malformed signedURL"));
}
