//! Zone layout policy: where each side's artwork lands on the composite canvas.
use crate::error::ZoneLayoutError;
use crate::side::SideKey;
use constants::zones::{BACK_ZONE, FRONT_ZONE, LEFT_ZONE, RIGHT_ZONE};
use serde::{Deserialize, Serialize};

/// Rectangle in fractions of the canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Zone {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    const fn from_tuple(rect: (f32, f32, f32, f32)) -> Self {
        Self::new(rect.0, rect.1, rect.2, rect.3)
    }

    fn overlaps(&self, other: &Zone) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Integer rectangle on a concrete canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn contains(&self, other: &PixelRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}

/// One zone per side. Static garment geometry, never derived from user input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneLayout {
    pub front: Zone,
    pub back: Zone,
    pub left: Zone,
    pub right: Zone,
}

impl Default for ZoneLayout {
    fn default() -> Self {
        Self {
            front: Zone::from_tuple(FRONT_ZONE),
            back: Zone::from_tuple(BACK_ZONE),
            left: Zone::from_tuple(LEFT_ZONE),
            right: Zone::from_tuple(RIGHT_ZONE),
        }
    }
}

impl ZoneLayout {
    pub fn zone(&self, side: SideKey) -> &Zone {
        match side {
            SideKey::Front => &self.front,
            SideKey::Back => &self.back,
            SideKey::Left => &self.left,
            SideKey::Right => &self.right,
        }
    }

    /// Reject zones that leave the canvas, have no area, or overlap.
    ///
    /// Non-overlap is what makes per-side draw order irrelevant to the
    /// final pixels.
    pub fn validate(&self) -> Result<(), ZoneLayoutError> {
        for side in SideKey::ALL {
            let zone = self.zone(side);
            if zone.width <= 0.0 || zone.height <= 0.0 {
                return Err(ZoneLayoutError::Empty { side });
            }
            let inside = zone.x >= 0.0
                && zone.y >= 0.0
                && zone.x + zone.width <= 1.0 + f32::EPSILON
                && zone.y + zone.height <= 1.0 + f32::EPSILON;
            if !inside {
                return Err(ZoneLayoutError::OutOfBounds {
                    side,
                    detail: format!("{zone:?}"),
                });
            }
        }

        for (i, first) in SideKey::ALL.iter().enumerate() {
            for second in &SideKey::ALL[i + 1..] {
                if self.zone(*first).overlaps(self.zone(*second)) {
                    return Err(ZoneLayoutError::Overlap {
                        first: *first,
                        second: *second,
                    });
                }
            }
        }

        Ok(())
    }

    /// Zone of `side` on a `canvas_width` x `canvas_height` canvas.
    pub fn pixel_rect(&self, side: SideKey, canvas_width: u32, canvas_height: u32) -> PixelRect {
        let zone = self.zone(side);
        let scale = |fraction: f32, extent: u32| -> u32 {
            ((fraction.clamp(0.0, 1.0) as f64) * extent as f64).round() as u32
        };

        let x0 = scale(zone.x, canvas_width);
        let y0 = scale(zone.y, canvas_height);
        let x1 = scale(zone.x + zone.width, canvas_width).max(x0);
        let y1 = scale(zone.y + zone.height, canvas_height).max(y0);

        PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }
}

/// Aspect-preserving containment of an `image_width` x `image_height` image in `rect`.
///
/// The limiting dimension fills the rect exactly, the other is scaled to
/// match and centred. Returns `None` for degenerate inputs.
pub fn fit_contain(image_width: u32, image_height: u32, rect: PixelRect) -> Option<PixelRect> {
    if image_width == 0 || image_height == 0 || rect.width == 0 || rect.height == 0 {
        return None;
    }

    let (iw, ih) = (image_width as u64, image_height as u64);
    let (rw, rh) = (rect.width as u64, rect.height as u64);

    // Width is limiting when rw / iw <= rh / ih.
    let (width, height) = if rw * ih <= rh * iw {
        let scaled = ((ih * rw) as f64 / iw as f64).round() as u64;
        (rw, scaled.clamp(1, rh))
    } else {
        let scaled = ((iw * rh) as f64 / ih as f64).round() as u64;
        (scaled.clamp(1, rw), rh)
    };

    Some(PixelRect {
        x: rect.x + ((rw - width) / 2) as u32,
        y: rect.y + ((rh - height) / 2) as u32,
        width: width as u32,
        height: height as u32,
    })
}

/// A layer of the composite, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Base,
    Reference,
    Side(SideKey),
}

/// Z-order of every compute: `Compositor::compose` draws these layers bottom to top.
pub const LAYER_ORDER: [Layer; 6] = [
    Layer::Base,
    Layer::Reference,
    Layer::Side(SideKey::Front),
    Layer::Side(SideKey::Back),
    Layer::Side(SideKey::Left),
    Layer::Side(SideKey::Right),
];
