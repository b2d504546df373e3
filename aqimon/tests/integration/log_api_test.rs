//! 暗号化ログとAPIのエンドツーエンドテスト

use crate::support::monitor::{init_monitor, spawn_monitor, test_config};
use aqimon::crypto::{self, kdf, FileSaltStore};
use aqimon::sampler::format_record;
use reqwest::StatusCode;
use serde_json::Value;
use tempfile::tempdir;

#[tokio::test]
async fn log_is_not_found_until_first_record() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let ctx = init_monitor(&config, &[]).await;
    let server = spawn_monitor(&ctx).await;

    let client = reqwest::Client::new();
    let response = client.get(server.url("/api/log")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "No log file found.");

    let current: Value = client
        .get(server.url("/api/aqi"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current["aqi"], 0.0);
    assert_eq!(current["status"], "Initializing...");

    server.stop().await;
}

#[tokio::test]
async fn three_ticks_produce_three_decryptable_lines_in_order() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    assert!(!config.salt_path().exists());
    assert!(!config.log_path().exists());

    let ctx = init_monitor(&config, &[40.0, 200.0, 90.0]).await;
    let mut expected = Vec::new();
    for _ in 0..3 {
        let reading = ctx.sampler.tick().await.unwrap();
        expected.push(format_record(&reading));
    }
    assert!(expected[0].ends_with("AQI: 40.0 [Normal]"));
    assert!(expected[1].ends_with("AQI: 200.0 [⚠️ HIGH POLLUTION]"));
    assert!(expected[2].ends_with("AQI: 90.0 [Normal]"));

    let server = spawn_monitor(&ctx).await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/api/log")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
    let body = response.text().await.unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);

    let key = kdf::derive_existing_key("sid1234", &FileSaltStore::new(config.salt_path())).unwrap();
    let decrypted: Vec<String> = lines
        .iter()
        .map(|line| crypto::decrypt_record(line, &key).unwrap())
        .collect();
    assert_eq!(decrypted, expected);

    let current: Value = client
        .get(server.url("/api/aqi"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current["aqi"], 90.0);
    assert_eq!(current["status"], "Normal");

    server.stop().await;
}

#[tokio::test]
async fn identical_records_encrypt_to_distinct_lines() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let ctx = init_monitor(&config, &[75.0, 75.0]).await;
    ctx.sampler.tick().await.unwrap();
    ctx.sampler.tick().await.unwrap();

    let bytes = ctx.state.surface.log_bytes().await.unwrap().unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_ne!(lines[0], lines[1]);
}

#[tokio::test]
async fn concurrent_reads_during_appends_see_whole_lines() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let values: Vec<f64> = (0..20).map(|i| 50.0 + i as f64).collect();
    let ctx = init_monitor(&config, &values).await;
    let server = spawn_monitor(&ctx).await;
    let key = kdf::derive_existing_key("sid1234", &FileSaltStore::new(config.salt_path())).unwrap();

    let sampler = ctx.sampler.clone();
    let writer = tokio::spawn(async move {
        for _ in 0..20 {
            sampler.tick().await.unwrap();
        }
    });

    let client = reqwest::Client::new();
    let mut readers = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        let url = server.url("/api/log");
        readers.push(tokio::spawn(async move {
            let mut bodies = Vec::new();
            for _ in 0..5 {
                let response = client.get(&url).send().await.unwrap();
                if response.status() == StatusCode::OK {
                    bodies.push(response.text().await.unwrap());
                }
            }
            bodies
        }));
    }

    writer.await.unwrap();
    for reader in readers {
        for body in reader.await.unwrap() {
            assert!(body.is_empty() || body.ends_with('\n'));
            for line in body.lines() {
                crypto::decrypt_record(line, &key).unwrap();
            }
        }
    }

    server.stop().await;
}
