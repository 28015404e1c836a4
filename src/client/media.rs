use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{error, info};

use super::transport::{
    HttpMethod, MultipartForm, RequestBody, Transport, TransportRequest, WreqTransport,
};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::MediaUploadResponse;
use crate::models::responses::non_empty_or;

/// Uploads product images straight to the media host. The hosted URL it
/// returns is what the backend stores.
#[derive(Clone)]
pub struct MediaUploader {
    endpoint: String,
    upload_preset: String,
    transport: Arc<dyn Transport>,
}

impl MediaUploader {
    pub fn new(
        endpoint: impl Into<String>,
        upload_preset: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        MediaUploader {
            endpoint: endpoint.into(),
            upload_preset: upload_preset.into(),
            transport,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        if !config.has_media_host() {
            return Err(anyhow::anyhow!("Media cloud_name is not configured"));
        }

        let transport = WreqTransport::new(config.api.emulate_browser)?;
        Ok(Self::new(
            config.media_upload_endpoint(),
            config.media.upload_preset.clone(),
            Arc::new(transport),
        ))
    }

    pub fn build_form(&self, image: &[u8]) -> MultipartForm {
        MultipartForm::new()
            .text("file", jpeg_data_uri(image))
            .text("upload_preset", self.upload_preset.clone())
    }

    pub async fn upload_image(&self, image: &[u8]) -> ClientResult<String> {
        let request = TransportRequest {
            method: HttpMethod::Post,
            url: self.endpoint.clone(),
            headers: Vec::new(),
            body: RequestBody::Multipart(self.build_form(image)),
        };

        let response = self.transport.send(request).await?;

        // The media host reports failures in the body, so the status is not
        // consulted before decoding.
        let parsed: MediaUploadResponse = serde_json::from_str(&response.body).map_err(|e| {
            ClientError::Decode(format!("media host returned status {}: {}", response.status, e))
        })?;

        match parsed.secure_url {
            Some(url) if !url.trim().is_empty() => {
                info!("Uploaded image ({} bytes) to {}", image.len(), url);
                Ok(url)
            }
            _ => {
                let message = non_empty_or(
                    parsed.error.and_then(|e| e.message),
                    "Failed to upload image.",
                );
                error!("Media upload error: {}", message);
                Err(ClientError::Application(message))
            }
        }
    }

    /// Uploads all images concurrently. Any failure fails the whole batch.
    pub async fn upload_all(&self, images: &[Vec<u8>]) -> ClientResult<Vec<String>> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        info!("Uploading {} images", images.len());
        try_join_all(images.iter().map(|image| self.upload_image(image))).await
    }
}

pub fn jpeg_data_uri(image: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(image))
}
