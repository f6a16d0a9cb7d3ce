//! Image upload endpoint

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use crate::utils::errors::{ApiError, ApiResult};
use super::ApiClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub url: String,
}

pub struct UploadsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UploadsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Upload an image as multipart `file`; returns the hosted URL
    pub async fn upload_image(&self, file_name: &str, content_type: &str, bytes: Vec<u8>) -> ApiResult<String> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", "event360_preset");

        let response: UploadResponse = self.client.post_multipart("/api/upload/image", form).await?;
        Ok(response.url)
    }
}
