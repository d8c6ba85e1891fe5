//! The composite texture handed to the renderer and the upload path.
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};
use std::sync::{Arc, OnceLock};

struct Inner {
    pixels: RgbaImage,
    generation: u64,
    png: OnceLock<Result<Arc<[u8]>, String>>,
}

/// Immutable composite raster. Clones share the same pixels.
///
/// The PNG encoding is produced on first request and cached. Textures
/// taken verbatim from a user override keep the override's own bytes.
#[derive(Clone)]
pub struct CompositeTexture {
    inner: Arc<Inner>,
}

impl CompositeTexture {
    pub fn from_pixels(pixels: RgbaImage, generation: u64) -> Self {
        Self {
            inner: Arc::new(Inner {
                pixels,
                generation,
                png: OnceLock::new(),
            }),
        }
    }

    pub(crate) fn from_encoded(pixels: RgbaImage, png: Arc<[u8]>, generation: u64) -> Self {
        let texture = Self::from_pixels(pixels, generation);
        let _ = texture.inner.png.set(Ok(png));
        texture
    }

    pub fn width(&self) -> u32 {
        self.inner.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.pixels.height()
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.inner.pixels
    }

    /// PNG payload for uploads. Encoded once, then shared.
    pub fn png(&self) -> Result<Arc<[u8]>, String> {
        self.inner
            .png
            .get_or_init(|| encode_png(&self.inner.pixels).map(Arc::from))
            .clone()
    }

    pub fn ptr_eq(&self, other: &CompositeTexture) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for CompositeTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeTexture")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("generation", &self.generation())
            .finish()
    }
}

pub fn encode_png(pixels: &RgbaImage) -> Result<Vec<u8>, String> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            pixels.as_raw(),
            pixels.width(),
            pixels.height(),
            ColorType::Rgba8,
        )
        .map_err(|e| e.to_string())?;
    Ok(buffer)
}
