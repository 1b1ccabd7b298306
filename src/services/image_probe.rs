// src/services/image_probe.rs
use crate::errors::AdLensError;
use image::GenericImageView;

const MAX_DIMENSION: u32 = 4096;

pub struct ImageProbe;

impl ImageProbe {
    pub fn new() -> Self {
        Self
    }

    /// Decode the uploaded bytes and return their dimensions. Rejects data
    /// that is not a decodable image or that exceeds 4096x4096.
    pub fn validate(&self, data: &[u8]) -> Result<(u32, u32), AdLensError> {
        let img = image::load_from_memory(data)
            .map_err(|e| AdLensError::Validation(format!("invalid image data: {}", e)))?;

        let (width, height) = img.dimensions();
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(AdLensError::Validation(format!(
                "image dimensions exceed {}x{}",
                MAX_DIMENSION, MAX_DIMENSION
            )));
        }

        Ok((width, height))
    }
}

impl Default for ImageProbe {
    fn default() -> Self {
        Self::new()
    }
}
