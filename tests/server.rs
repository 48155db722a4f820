//! End-to-end tests for the demo server.

use std::time::Duration;

use micro_web::config::AppConfig;
use micro_web::{HttpServer, Shutdown};
use tokio::net::TcpListener;

mod common;

#[tokio::test]
async fn test_serves_files_as_attachments() {
    let dir = common::TempDir::new();
    dir.write("hello.txt", "hi files");

    let mut config = AppConfig::default();
    config.files.root = dir.path.to_string_lossy().into_owned();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let client = common::client();

    let res = client
        .get(format!("http://{}/files/hello.txt?inline=true", addr))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()["content-disposition"],
        "inline; filename='hello.txt'"
    );
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "hi files");

    let res = client
        .get(format!("http://{}/files/hello.txt", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers()["content-disposition"],
        "attachment; filename='hello.txt'"
    );

    let res = client
        .get(format!("http://{}/files/missing.txt", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);

    let res = client
        .get(format!("http://{}/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let info: serde_json::Value = res.json().await.unwrap();
    assert_eq!(info["service"], "micro-web");

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), server_task)
        .await
        .expect("server did not shut down")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_inline_by_default_from_config() {
    let dir = common::TempDir::new();
    dir.write("report.csv", "a,b\n1,2\n");

    let mut config = AppConfig::default();
    config.files.root = dir.path.to_string_lossy().into_owned();
    config.files.inline_by_default = true;

    let addr = common::spawn_app(HttpServer::new(config).router()).await;
    let res = common::client()
        .get(format!("http://{}/files/report.csv", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()["content-disposition"],
        "inline; filename='report.csv'"
    );
}
