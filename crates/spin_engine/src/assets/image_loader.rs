//! Image loading for textured appearances

use std::path::Path;
use crate::assets::AssetError;

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data, row-major from the top-left corner
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Decode an image file (format picked from the contents)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();
        log::debug!("Loading image from: {:?}", path_ref);

        if !path_ref.exists() {
            return Err(AssetError::NotFound(path_ref.display().to_string()));
        }

        let img = image::open(path_ref)
            .map_err(|e| AssetError::LoadFailed(format!("{}: {e}", path_ref.display())))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        log::info!("Loaded image {}x{} from {:?}", width, height, path_ref);

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Decode an in-memory image
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| AssetError::LoadFailed(format!("in-memory image: {e}")))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        log::debug!("Loaded image {}x{} from memory", width, height);

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Solid color image
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        Self {
            data: color.repeat(pixel_count),
            width,
            height,
        }
    }

    /// RGBA value at pixel `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.data
            .get(offset..offset + 4)
            .and_then(|px| px.try_into().ok())
    }

    /// Nearest-texel lookup for texture coordinates in `[0, 1]` (clamped)
    ///
    /// `v = 0` is the bottom row of the image.
    pub fn sample(&self, uv: [f32; 2]) -> Option<[u8; 4]> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let to_index = |t: f32, size: u32| {
            let max = (size - 1) as f32;
            (t.clamp(0.0, 1.0) * max).round() as u32
        };
        let x = to_index(uv[0], self.width);
        let y = self.height - 1 - to_index(uv[1], self.height);
        self.pixel(x, y)
    }

    /// Size of the pixel data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}
