//! Drawing surface allocation and the raster operations drawn onto it.
use crate::error::CompositorError;
use crate::zone::{PixelRect, fit_contain};
use constants::texture::MAX_SURFACE_DIMENSION;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Allocate a zeroed RGBA surface, reporting failure instead of aborting.
pub fn allocate_surface(width: u32, height: u32) -> Result<RgbaImage, CompositorError> {
    if width == 0 || height == 0 {
        return Err(CompositorError::Unavailable(format!(
            "cannot create a {width}x{height} drawing surface"
        )));
    }
    if width > MAX_SURFACE_DIMENSION || height > MAX_SURFACE_DIMENSION {
        return Err(CompositorError::Unavailable(format!(
            "{width}x{height} exceeds the {MAX_SURFACE_DIMENSION}px surface limit"
        )));
    }

    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(|| CompositorError::Unavailable("surface size overflows".to_string()))?;

    let mut raw: Vec<u8> = Vec::new();
    raw.try_reserve_exact(len)
        .map_err(|e| CompositorError::Unavailable(e.to_string()))?;
    raw.resize(len, 0);

    RgbaImage::from_raw(width, height, raw)
        .ok_or_else(|| CompositorError::Unavailable("surface buffer size mismatch".to_string()))
}

pub fn fill(surface: &mut RgbaImage, color: Rgba<u8>) {
    for pixel in surface.pixels_mut() {
        *pixel = color;
    }
}

/// Source-over blend of `overlay` at `opacity` across the whole surface.
///
/// The overlay is stretched to the surface when sizes differ (the template
/// normally defines the surface size, so this is the rare path).
pub fn blend_with_opacity(surface: &mut RgbaImage, overlay: &RgbaImage, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity == 0.0 {
        return;
    }

    let resized;
    let overlay = if overlay.dimensions() == surface.dimensions() {
        overlay
    } else {
        resized = imageops::resize(
            overlay,
            surface.width(),
            surface.height(),
            FilterType::Triangle,
        );
        &resized
    };

    for (dst, src) in surface.pixels_mut().zip(overlay.pixels()) {
        *dst = blend_pixel(*dst, *src, opacity);
    }
}

fn blend_pixel(dst: Rgba<u8>, src: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let alpha = src[3] as f32 / 255.0 * opacity;
    let keep = 1.0 - alpha;
    let channel = |s: u8, d: u8| -> u8 {
        (s as f32 * alpha + d as f32 * keep).round().clamp(0.0, 255.0) as u8
    };
    let out_alpha = (alpha + (dst[3] as f32 / 255.0) * keep) * 255.0;

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        out_alpha.round().clamp(0.0, 255.0) as u8,
    ])
}

/// Draw `image` into `zone` with aspect-preserving containment.
///
/// Returns the rectangle actually covered, or `None` when nothing was drawn.
pub fn draw_contained(surface: &mut RgbaImage, image: &RgbaImage, zone: PixelRect) -> Option<PixelRect> {
    let target = fit_contain(image.width(), image.height(), zone)?;

    if image.dimensions() == (target.width, target.height) {
        imageops::overlay(surface, image, target.x as i64, target.y as i64);
    } else {
        let scaled = imageops::resize(image, target.width, target.height, FilterType::Triangle);
        imageops::overlay(surface, &scaled, target.x as i64, target.y as i64);
    }

    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unusable_dimensions() {
        assert!(matches!(
            allocate_surface(0, 64),
            Err(CompositorError::Unavailable(_))
        ));
        assert!(matches!(
            allocate_surface(MAX_SURFACE_DIMENSION + 1, 16),
            Err(CompositorError::Unavailable(_))
        ));
    }

    #[test]
    fn blend_matches_source_over() {
        let mut surface = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let overlay = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        blend_with_opacity(&mut surface, &overlay, 0.8);
        assert_eq!(surface.get_pixel(1, 1), &Rgba([204, 204, 204, 255]));
    }

    #[test]
    fn transparent_overlay_pixels_leave_surface_untouched() {
        let mut surface = RgbaImage::from_pixel(2, 1, Rgba([40, 50, 60, 255]));
        let overlay = RgbaImage::from_pixel(2, 1, Rgba([255, 0, 0, 0]));
        blend_with_opacity(&mut surface, &overlay, 0.8);
        assert_eq!(surface.get_pixel(0, 0), &Rgba([40, 50, 60, 255]));
    }

    #[test]
    fn draw_contained_stays_inside_zone() {
        let mut surface = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        let image = RgbaImage::from_pixel(10, 20, Rgba([255, 0, 0, 255]));
        let zone = PixelRect {
            x: 10,
            y: 10,
            width: 50,
            height: 40,
        };
        let drawn = draw_contained(&mut surface, &image, zone).unwrap();
        assert_eq!(
            drawn,
            PixelRect {
                x: 25,
                y: 10,
                width: 20,
                height: 40
            }
        );
        assert_eq!(surface.get_pixel(30, 30), &Rgba([255, 0, 0, 255]));
        assert_eq!(surface.get_pixel(20, 30), &Rgba([0, 0, 0, 255]));
    }
}
