use crate::config::BrandingConfig;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// A decodable branding image kept in its original encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandingImage {
    pub data: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

impl BrandingImage {
    /// Height that keeps the aspect ratio at `width_mm`.
    pub fn height_for_width(&self, width_mm: f32) -> f32 {
        if self.width_px == 0 {
            return 0.0;
        }
        width_mm * self.height_px as f32 / self.width_px as f32
    }

    pub fn width_for_height(&self, height_mm: f32) -> f32 {
        if self.height_px == 0 {
            return 0.0;
        }
        height_mm * self.width_px as f32 / self.height_px as f32
    }
}

/// Loads the configured branding images. A missing or unreadable asset is
/// reported as `None`; callers fall back to text.
#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    branding: BrandingConfig,
}

impl AssetLoader {
    pub fn new(branding: BrandingConfig) -> Self {
        Self { branding }
    }

    pub fn cover_logo(&self) -> Option<BrandingImage> {
        self.branding.cover_logo.as_deref().and_then(load_image)
    }

    pub fn header_mark(&self) -> Option<BrandingImage> {
        self.branding.header_mark.as_deref().and_then(load_image)
    }
}

pub fn load_image(path: &Path) -> Option<BrandingImage> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            debug!("Branding asset {} unavailable: {}", path.display(), e);
            return None;
        }
    };
    match image::load_from_memory(&data) {
        Ok(decoded) => Some(BrandingImage {
            width_px: decoded.width(),
            height_px: decoded.height(),
            data,
        }),
        Err(e) => {
            warn!("Branding asset {} could not be decoded: {}", path.display(), e);
            None
        }
    }
}
