//! Image source references and the fetch/decode helper.
use crate::error::AssetLoadError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a side image (or the reference template) comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Local file. `file://` URLs resolve here.
    File(PathBuf),
    /// `data:<mime>;base64,<payload>` as produced by a browser file reader.
    DataUrl(String),
    /// Already fetched encoded bytes.
    Bytes(Arc<[u8]>),
    /// Network URL. Resolved by the host page, never fetched here.
    Remote(String),
}

impl ImageSource {
    /// Classify a URL-ish string coming from the host page or a job file.
    pub fn from_url(url: &str) -> Self {
        let trimmed = url.trim();
        if trimmed.starts_with("data:") {
            ImageSource::DataUrl(trimmed.to_string())
        } else if let Some(path) = trimmed.strip_prefix("file://") {
            ImageSource::File(PathBuf::from(path))
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ImageSource::Remote(trimmed.to_string())
        } else {
            ImageSource::File(PathBuf::from(trimmed))
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ImageSource::File(path) => path.as_os_str().is_empty(),
            ImageSource::DataUrl(url) | ImageSource::Remote(url) => url.trim().is_empty(),
            ImageSource::Bytes(bytes) => bytes.is_empty(),
        }
    }

    /// Short description for log lines (never the payload itself).
    pub fn describe(&self) -> String {
        match self {
            ImageSource::File(path) => path.display().to_string(),
            ImageSource::DataUrl(url) => format!("data URL ({} chars)", url.len()),
            ImageSource::Bytes(bytes) => format!("{} bytes in memory", bytes.len()),
            ImageSource::Remote(url) => url.clone(),
        }
    }
}

/// Fetches and decodes image sources into RGBA rasters.
///
/// Implementations must be deterministic for static sources: the same
/// source always decodes to the same pixels.
pub trait SourceLoader: Send + Sync {
    fn load(&self, source: &ImageSource) -> Result<RgbaImage, AssetLoadError>;
}

/// Loader for files, data URLs and in-memory bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSourceLoader;

impl SourceLoader for DefaultSourceLoader {
    fn load(&self, source: &ImageSource) -> Result<RgbaImage, AssetLoadError> {
        let bytes = read_source_bytes(source)?;
        decode_rgba(&bytes)
    }
}

/// Raw encoded bytes behind a source.
pub fn read_source_bytes(source: &ImageSource) -> Result<Arc<[u8]>, AssetLoadError> {
    match source {
        ImageSource::File(path) => std::fs::read(path)
            .map(Arc::from)
            .map_err(|e| AssetLoadError::Io(format!("{}: {}", path.display(), e))),
        ImageSource::DataUrl(url) => decode_data_url(url).map(Arc::from),
        ImageSource::Bytes(bytes) => Ok(Arc::clone(bytes)),
        ImageSource::Remote(url) => Err(AssetLoadError::UnsupportedSource(url.clone())),
    }
}

pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, AssetLoadError> {
    image::load_from_memory(bytes)
        .map(|image| image.to_rgba8())
        .map_err(|e| AssetLoadError::Decode(e.to_string()))
}

/// Decode the payload of a base64 data URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, AssetLoadError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| AssetLoadError::InvalidDataUrl("missing data: prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AssetLoadError::InvalidDataUrl("missing ',' separator".to_string()))?;

    if !header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        return Err(AssetLoadError::InvalidDataUrl(
            "only base64 data URLs are supported".to_string(),
        ));
    }

    // Browsers may wrap long payloads.
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| AssetLoadError::InvalidDataUrl(e.to_string()))
}

/// Encode PNG bytes as a data URL (used when handing composites to the host page).
pub fn encode_png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn png_bytes(image: &RgbaImage) -> Vec<u8> {
        let mut buffer = Vec::new();
        image::DynamicImage::ImageRgba8(image.clone())
            .write_to(
                &mut std::io::Cursor::new(&mut buffer),
                image::ImageOutputFormat::Png,
            )
            .unwrap();
        buffer
    }

    #[test]
    fn classifies_urls() {
        assert!(matches!(
            ImageSource::from_url("data:image/png;base64,AAAA"),
            ImageSource::DataUrl(_)
        ));
        assert_eq!(
            ImageSource::from_url("file:///tmp/front.png"),
            ImageSource::File(PathBuf::from("/tmp/front.png"))
        );
        assert!(matches!(
            ImageSource::from_url("https://cdn.example.com/logo.png"),
            ImageSource::Remote(_)
        ));
        assert!(ImageSource::from_url("   ").is_empty());
    }

    #[test]
    fn data_url_round_trips_through_loader() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let url = encode_png_data_url(&png_bytes(&image));

        let decoded = DefaultSourceLoader.load(&ImageSource::DataUrl(url)).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn rejects_non_base64_data_urls() {
        let err = decode_data_url("data:text/plain,hello").unwrap_err();
        assert!(matches!(err, AssetLoadError::InvalidDataUrl(_)));

        let err = decode_data_url("image/png;base64,AAAA").unwrap_err();
        assert!(matches!(err, AssetLoadError::InvalidDataUrl(_)));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let source = ImageSource::Bytes(Arc::from(vec![0u8, 1, 2, 3, 4]));
        assert!(matches!(
            DefaultSourceLoader.load(&source),
            Err(AssetLoadError::Decode(_))
        ));
    }

    #[test]
    fn remote_urls_are_not_fetched() {
        let source = ImageSource::from_url("http://example.com/a.png");
        assert!(matches!(
            DefaultSourceLoader.load(&source),
            Err(AssetLoadError::UnsupportedSource(_))
        ));
    }

    #[test]
    fn missing_files_report_io() {
        let source = ImageSource::File(PathBuf::from("/definitely/not/here.png"));
        assert!(matches!(
            DefaultSourceLoader.load(&source),
            Err(AssetLoadError::Io(_))
        ));
    }
}
