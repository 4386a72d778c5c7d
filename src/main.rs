mod config;
mod modules;
mod server;
mod services;

use config::AppConfig;
use services::image_storage::{ImageUploader, S3Storage};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cfg = AppConfig::from_env();

    let storage = S3Storage::new(cfg.aws_uploads_bucket_name.clone()).await;

    let uploader = ImageUploader::new(
        Arc::new(storage),
        cfg.uploads_cdn_base_url.clone(),
        Duration::from_secs(cfg.upload_timeout_secs),
    );

    let app = server::controller::new(uploader);

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), cfg.http_port);
    println!("[WEB] listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
