//! Image upload checks

use crate::utils::errors::Result;
use super::blocked;

pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Accept only `image/*` payloads up to 5 MB
pub fn validate_image(content_type: Option<&str>, size: u64) -> Result<()> {
    let is_image = content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false);
    if !is_image {
        return Err(blocked("Please upload an image file"));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(blocked("Image size should be less than 5MB"));
    }
    Ok(())
}
