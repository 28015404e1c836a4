use anyhow::{Context, Result};

use farm_market_client::client::MediaUploader;
use farm_market_client::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    println!("=== MEDIA UPLOAD TEST ===\n");

    let config_path = "configs/client.toml";
    println!("🔧 Loading client config from: {}", config_path);
    let config = ClientConfig::load(Some(config_path))?;

    println!("✅ Config loaded successfully!");
    println!("   Cloud name: {}", config.media.cloud_name);
    println!("   Upload preset: {}", config.media.upload_preset);
    println!("   Endpoint: {}", config.media_upload_endpoint());

    let Some(image_path) = std::env::args().nth(1) else {
        println!("\nUsage: test_media_upload <image.jpg>");
        return Ok(());
    };

    let image = tokio::fs::read(&image_path)
        .await
        .with_context(|| format!("Failed to read image: {}", image_path))?;
    println!("\n📷 Uploading {} ({} bytes)", image_path, image.len());

    let uploader = MediaUploader::from_config(&config)?;
    match uploader.upload_image(&image).await {
        Ok(url) => {
            println!("✅ Upload succeeded");
            println!("   Hosted URL: {}", url);
        }
        Err(e) => {
            println!("❌ Upload failed: {}", e.user_message());
        }
    }

    Ok(())
}
