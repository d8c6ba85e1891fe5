//! Garment texture compositor.
//!
//! Builds the single texture wrapped onto the preview garment from a base
//! colour, an optional reference template and up to four side images.

pub mod color;
pub mod compositor;
pub mod error;
pub mod gate;
pub mod generation;
pub mod job;
pub mod side;
pub mod source;
pub mod surface;
pub mod template;
pub mod texture;
pub mod zone;

pub use color::ColorValue;
pub use compositor::{
    ComposeOutcome, ComposeRequest, Compositor, CompositorConfig, TemplateOverride,
    reference_alpha,
};
pub use error::{AssetLoadError, AssetLoadFailure, CompositorError, JobError, ZoneLayoutError};
pub use generation::{CompositeSlot, GenerationTracker, Ticket};
pub use side::{SideImageSet, SideKey};
pub use source::{DefaultSourceLoader, ImageSource, SourceLoader};
pub use texture::CompositeTexture;
pub use zone::{Zone, ZoneLayout};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::error::AssetLoadError;
    use crate::source::{ImageSource, SourceLoader};
    use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::time::Duration;

    pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(width, height, color)
    }

    pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image.clone())
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[derive(Clone)]
    pub enum Behavior {
        Image(RgbaImage),
        Delay(Duration, RgbaImage),
        Fail,
    }

    /// Loader keyed by file name, for driving the compositor without disk access.
    #[derive(Clone, Default)]
    pub struct ScriptedLoader {
        scripts: HashMap<String, Behavior>,
    }

    impl ScriptedLoader {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, name: &str, behavior: Behavior) -> Self {
            self.scripts.insert(name.to_string(), behavior);
            self
        }
    }

    impl SourceLoader for ScriptedLoader {
        fn load(&self, source: &ImageSource) -> Result<RgbaImage, AssetLoadError> {
            let ImageSource::File(path) = source else {
                return Err(AssetLoadError::UnsupportedSource(source.describe()));
            };
            match self.scripts.get(path.to_string_lossy().as_ref()) {
                Some(Behavior::Image(image)) => Ok(image.clone()),
                Some(Behavior::Delay(delay, image)) => {
                    std::thread::sleep(*delay);
                    Ok(image.clone())
                }
                Some(Behavior::Fail) | None => {
                    Err(AssetLoadError::Io(format!("{} not found", path.display())))
                }
            }
        }
    }
}
