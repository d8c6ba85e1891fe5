//! Reference (UV template) image, fetched once per compositor and cached.
use crate::source::{ImageSource, SourceLoader};
use image::RgbaImage;
use std::sync::{Arc, OnceLock};

/// Lazily loaded reference template.
///
/// A failed load is cached too: the session degrades to base-colour-only
/// compositing instead of retrying on every compute.
#[derive(Debug, Default)]
pub struct TemplateCache {
    source: Option<ImageSource>,
    cached: OnceLock<Option<Arc<RgbaImage>>>,
}

impl TemplateCache {
    pub fn new(source: Option<ImageSource>) -> Self {
        Self {
            source,
            cached: OnceLock::new(),
        }
    }

    /// Template raster, loading it on first use.
    pub fn get(&self, loader: &dyn SourceLoader) -> Option<Arc<RgbaImage>> {
        self.cached
            .get_or_init(|| {
                let source = self.source.as_ref()?;
                match loader.load(source) {
                    Ok(image) => {
                        log::info!(
                            "Reference template loaded: {} ({}x{})",
                            source.describe(),
                            image.width(),
                            image.height()
                        );
                        Some(Arc::new(image))
                    }
                    Err(e) => {
                        log::warn!(
                            "Reference template {} unavailable, compositing without it: {}",
                            source.describe(),
                            e
                        );
                        None
                    }
                }
            })
            .clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.cached.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssetLoadError;
    use image::Rgba;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLoader {
        calls: AtomicUsize,
        succeed: bool,
    }

    impl SourceLoader for CountingLoader {
        fn load(&self, _source: &ImageSource) -> Result<RgbaImage, AssetLoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255])))
            } else {
                Err(AssetLoadError::Io("offline".to_string()))
            }
        }
    }

    #[test]
    fn loads_once_and_caches() {
        let loader = CountingLoader {
            calls: AtomicUsize::new(0),
            succeed: true,
        };
        let cache = TemplateCache::new(Some(ImageSource::from_url("template.png")));
        assert!(cache.get(&loader).is_some());
        assert!(cache.get(&loader).is_some());
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failures_are_cached_and_non_fatal() {
        let loader = CountingLoader {
            calls: AtomicUsize::new(0),
            succeed: false,
        };
        let cache = TemplateCache::new(Some(ImageSource::from_url("template.png")));
        assert!(cache.get(&loader).is_none());
        assert!(cache.get(&loader).is_none());
        assert!(cache.is_resolved());
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_source_means_no_template() {
        let loader = CountingLoader {
            calls: AtomicUsize::new(0),
            succeed: true,
        };
        assert!(TemplateCache::new(None).get(&loader).is_none());
        assert_eq!(loader.calls.load(Ordering::SeqCst), 0);
    }
}
