//! End-to-end pipeline tests against a mocked social service.

use std::collections::HashMap;
use std::path::Path;

use astroreel_bot::{run_once, BotContext, Settings};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png_bytes() -> Vec<u8> {
    use image::ImageEncoder;

    let img = image::RgbImage::from_pixel(64, 64, image::Rgb([200, 40, 80]));
    let mut bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut bytes)
        .write_image(img.as_raw(), 64, 64, image::ColorType::Rgb8)
        .unwrap();
    bytes
}

fn settings_for(server: &MockServer, dir: &Path) -> Settings {
    let env: HashMap<&str, String> = HashMap::from([
        ("IG_USERNAME", "stargazer".to_string()),
        ("IG_PASSWORD", "hunter2".to_string()),
        ("APOD_API_URL", format!("{}/planetary/apod", server.uri())),
        ("NEWS_API_URL", format!("{}/v4/articles", server.uri())),
        ("SOCIAL_API_URL", server.uri()),
        ("WORK_DIR", dir.join("work").display().to_string()),
        (
            "SESSION_FILE",
            dir.join("session.json").display().to_string(),
        ),
        (
            "BRANDING_IMAGE_PATH",
            dir.join("profile_pic.jpg").display().to_string(),
        ),
        ("REEL_FPS", "5".to_string()),
        ("REEL_DURATION_SECS", "1".to_string()),
        ("RETRY_MAX_ATTEMPTS", "1".to_string()),
        ("RETRY_INITIAL_DELAY_SECS", "0".to_string()),
    ]);
    Settings::from_provider(|key| env.get(key).cloned()).unwrap()
}

async fn mount_apod(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "title": "Pillars of Creation",
            "explanation": "Towers of gas and dust in the Eagle Nebula.",
            "url": format!("{}/images/pillars.png", server.uri()),
            "media_type": "image",
            "date": "2026-08-23"
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/images/pillars.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes()))
        .mount(server)
        .await;
}

fn no_reel_left(work_dir: &Path) -> bool {
    if !work_dir.exists() {
        return true;
    }
    std::fs::read_dir(work_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .all(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            !name.ends_with(".mp4") && !name.ends_with(".avi")
        })
}

#[tokio::test]
async fn test_full_run_publishes_and_cleans_up() {
    let server = MockServer::start().await;
    mount_apod(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/accounts/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "user_id": "42",
            "token": "fresh-token"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user_id": "42",
            "profile_pic_url": format!("{}/images/pillars.png", server.uri())
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/media/reels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "media_id": "media-123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = settings_for(&server, dir.path());
    let work_dir = settings.work_dir.clone();
    let session_file = settings.session_file.clone();

    let mut ctx = BotContext::from_settings(settings).unwrap();
    assert!(run_once(&mut ctx).await);

    assert!(session_file.exists());
    assert!(no_reel_left(&work_dir));
}

#[tokio::test]
async fn test_challenge_fails_run_and_leaves_no_session() {
    let server = MockServer::start().await;
    mount_apod(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/accounts/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "status": "fail",
            "error_type": "challenge_required",
            "message": "Verify your account."
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/media/reels"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = settings_for(&server, dir.path());
    let work_dir = settings.work_dir.clone();
    let session_file = settings.session_file.clone();

    let mut ctx = BotContext::from_settings(settings).unwrap();
    assert!(!run_once(&mut ctx).await);

    assert!(!session_file.exists());
    assert!(no_reel_left(&work_dir));
}

#[tokio::test]
async fn test_source_outage_still_renders_placeholder_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/articles"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/accounts/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "user_id": "42",
            "token": "fresh-token"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user_id": "42",
            "profile_pic_url": null
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/media/reels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "media_id": "media-456"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = settings_for(&server, dir.path());
    let work_dir = settings.work_dir.clone();

    let mut ctx = BotContext::from_settings(settings).unwrap();
    assert!(run_once(&mut ctx).await);
    assert!(no_reel_left(&work_dir));
}
