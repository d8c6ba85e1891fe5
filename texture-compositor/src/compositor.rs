//! Multi-zone texture compositor.
//!
//! One compute waits for every present side image to settle, then draws the
//! layers of `LAYER_ORDER` bottom to top: base colour, reference template,
//! and each loaded side image inside its zone.
use crate::color::ColorValue;
use crate::error::{AssetLoadError, AssetLoadFailure, CompositorError};
use crate::gate::LoadGate;
use crate::generation::Ticket;
use crate::side::{SideImageSet, SideKey};
use crate::source::{DefaultSourceLoader, ImageSource, SourceLoader, decode_rgba};
use crate::surface::{allocate_surface, blend_with_opacity, draw_contained, fill};
use crate::template::TemplateCache;
use crate::texture::CompositeTexture;
use crate::zone::{LAYER_ORDER, Layer, ZoneLayout};
use constants::texture::{
    FALLBACK_TEXTURE_SIZE, IMAGE_LOAD_TIMEOUT_MS, REFERENCE_ALPHA_EMPTY,
    REFERENCE_ALPHA_WITH_ARTWORK,
};
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use web_time::Instant;

/// Compositor settings. Every field has a default from `constants`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Canvas edge length when no reference template is loaded.
    pub fallback_resolution: u32,
    /// Upper bound for one batch of side image loads.
    pub load_timeout_ms: u64,
    /// Zone rectangles per side.
    pub zones: ZoneLayout,
    /// Reference template location (path, `file://` or data URL).
    pub template: Option<String>,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            fallback_resolution: FALLBACK_TEXTURE_SIZE,
            load_timeout_ms: IMAGE_LOAD_TIMEOUT_MS,
            zones: ZoneLayout::default(),
            template: None,
        }
    }
}

impl CompositorConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}

/// Full pre-composited image supplied by the user. Bypasses zone compositing.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateOverride(pub Arc<[u8]>);

impl TemplateOverride {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Inputs of one compute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposeRequest {
    pub base_color: ColorValue,
    pub sides: SideImageSet,
    pub reference_overlay: bool,
    pub template_override: Option<TemplateOverride>,
}

/// Result of a finished compute.
#[derive(Debug, Clone)]
pub struct ComposeOutcome {
    pub texture: CompositeTexture,
    /// Sides whose images did not load. They contributed nothing.
    pub failures: Vec<AssetLoadFailure>,
    /// Number of side images the request asked for.
    pub requested: usize,
}

impl ComposeOutcome {
    /// Every requested image failed (the only case worth warning the user about).
    pub fn all_failed(&self) -> bool {
        self.requested > 0 && self.failures.len() == self.requested
    }
}

/// Overlay opacity: strong while the canvas is empty, faint once artwork exists.
pub fn reference_alpha(side_image_count: usize) -> f32 {
    if side_image_count == 0 {
        REFERENCE_ALPHA_EMPTY
    } else {
        REFERENCE_ALPHA_WITH_ARTWORK
    }
}

type LoadMessage = (SideKey, Result<RgbaImage, AssetLoadError>);

/// Compositor instance owning its template cache.
///
/// Every compute draws onto a surface of its own, which becomes the
/// resulting texture.
///
/// Each `compose` call is self-contained; callers coalesce rapid edits
/// themselves if they want to.
pub struct Compositor {
    config: CompositorConfig,
    loader: Arc<dyn SourceLoader>,
    template: TemplateCache,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("config", &self.config)
            .field("template_resolved", &self.template.is_resolved())
            .finish()
    }
}

impl Compositor {
    pub fn new(config: CompositorConfig, loader: Arc<dyn SourceLoader>) -> Self {
        let template = TemplateCache::new(config.template.as_deref().map(ImageSource::from_url));
        Self {
            config,
            loader,
            template,
        }
    }

    pub fn with_default_loader(config: CompositorConfig) -> Self {
        Self::new(config, Arc::new(DefaultSourceLoader))
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Cached reference template, loading it on first use.
    pub fn template(&self) -> Option<Arc<RgbaImage>> {
        self.template.get(self.loader.as_ref())
    }

    /// Canvas size: the template's when one is loaded, the fallback otherwise.
    pub fn canvas_size(&self) -> (u32, u32) {
        self.template()
            .map(|template| template.dimensions())
            .unwrap_or((
                self.config.fallback_resolution,
                self.config.fallback_resolution,
            ))
    }

    /// Produce the composite for `request`.
    ///
    /// Resolves once every requested side load has settled. Failed loads are
    /// reported in the outcome, never as an error.
    pub fn compose(
        &self,
        request: &ComposeRequest,
        ticket: &Ticket,
    ) -> Result<ComposeOutcome, CompositorError> {
        ticket.check()?;

        if let Some(user_template) = request
            .template_override
            .as_ref()
            .filter(|user_template| !user_template.is_empty())
        {
            return resolve_override(user_template, ticket);
        }

        let template = self.template();
        let (width, height) = self.canvas_size();
        let mut surface = allocate_surface(width, height)?;
        let mut loads = self.load_sides(&request.sides, ticket)?;

        for layer in LAYER_ORDER {
            match layer {
                Layer::Base => fill(&mut surface, request.base_color.to_fill()),
                Layer::Reference if request.reference_overlay => match &template {
                    Some(template) => blend_with_opacity(
                        &mut surface,
                        template,
                        reference_alpha(request.sides.count()),
                    ),
                    None => {
                        log::debug!("Reference overlay requested but no template is available")
                    }
                },
                Layer::Reference => {}
                Layer::Side(side) => {
                    let Some(image) = loads.take(side) else {
                        continue;
                    };
                    let zone = self.config.zones.pixel_rect(side, width, height);
                    if draw_contained(&mut surface, &image, zone).is_none() {
                        log::debug!("{side} image is empty, nothing drawn");
                    }
                }
            }
        }

        log::debug!(
            "Composite {} ready ({}x{}, {} failed loads)",
            ticket.generation(),
            width,
            height,
            loads.failures.len()
        );
        Ok(ComposeOutcome {
            texture: CompositeTexture::from_pixels(surface, ticket.generation()),
            failures: loads.failures,
            requested: request.sides.count(),
        })
    }

    /// Start every load and wait until each one has settled or timed out.
    fn load_sides(
        &self,
        sides: &SideImageSet,
        ticket: &Ticket,
    ) -> Result<SideLoads, CompositorError> {
        let mut gate = LoadGate::new(sides.present().map(|(side, _)| side));
        let mut loads = SideLoads::default();
        if gate.is_open() {
            return Ok(loads);
        }

        let (sender, receiver) = mpsc::channel();
        for (side, source) in sides.present() {
            dispatch_load(
                Arc::clone(&self.loader),
                side,
                source.clone(),
                sender.clone(),
            );
        }
        drop(sender);

        let deadline = Instant::now() + self.config.load_timeout();

        while !gate.is_open() {
            match next_settled(&receiver, deadline) {
                Ok((side, result)) => {
                    if !gate.settle(side) {
                        continue;
                    }
                    match result {
                        Ok(image) => loads.images.push((side, image)),
                        Err(reason) => {
                            log::warn!("{side} image failed to load: {reason}");
                            loads.failures.push(AssetLoadFailure { side, reason });
                        }
                    }
                    ticket.check()?;
                }
                Err(RecvTimeoutError::Timeout) => {
                    for side in gate.outstanding() {
                        log::warn!("{side} image load timed out");
                        gate.settle(side);
                        loads.failures.push(AssetLoadFailure {
                            side,
                            reason: AssetLoadError::Timeout,
                        });
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    for side in gate.outstanding() {
                        gate.settle(side);
                        loads.failures.push(AssetLoadFailure {
                            side,
                            reason: AssetLoadError::Io("load ended without a result".to_string()),
                        });
                    }
                }
            }
        }

        Ok(loads)
    }
}

/// Settled side loads of one compute, waiting to be drawn in layer order.
#[derive(Default)]
struct SideLoads {
    images: Vec<(SideKey, RgbaImage)>,
    failures: Vec<AssetLoadFailure>,
}

impl SideLoads {
    fn take(&mut self, side: SideKey) -> Option<RgbaImage> {
        let index = self.images.iter().position(|(loaded, _)| *loaded == side)?;
        Some(self.images.swap_remove(index).1)
    }
}

fn resolve_override(
    user_template: &TemplateOverride,
    ticket: &Ticket,
) -> Result<ComposeOutcome, CompositorError> {
    let pixels = decode_rgba(&user_template.0)
        .map_err(|e| CompositorError::InvalidTemplateOverride(e.to_string()))?;

    let texture = match image::guess_format(&user_template.0) {
        Ok(ImageFormat::Png) => {
            CompositeTexture::from_encoded(pixels, Arc::clone(&user_template.0), ticket.generation())
        }
        _ => CompositeTexture::from_pixels(pixels, ticket.generation()),
    };

    Ok(ComposeOutcome {
        texture,
        failures: Vec::new(),
        requested: 0,
    })
}

/// Run one load off the compositing thread and report into the gate's channel.
fn dispatch_load(
    loader: Arc<dyn SourceLoader>,
    side: SideKey,
    source: ImageSource,
    sender: Sender<LoadMessage>,
) {
    let job = move || {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            loader.load(&source)
        }))
        .unwrap_or_else(|_| Err(AssetLoadError::Decode("decoder panicked".to_string())));
        let _ = sender.send((side, result));
    };

    #[cfg(not(target_arch = "wasm32"))]
    rayon::spawn(job);

    // No worker threads on the web: loads run inline and are already
    // queued by the time the gate starts draining.
    #[cfg(target_arch = "wasm32")]
    job();
}

#[cfg(not(target_arch = "wasm32"))]
fn next_settled(
    receiver: &Receiver<LoadMessage>,
    deadline: Instant,
) -> Result<LoadMessage, RecvTimeoutError> {
    receiver.recv_timeout(deadline.saturating_duration_since(Instant::now()))
}

#[cfg(target_arch = "wasm32")]
fn next_settled(
    receiver: &Receiver<LoadMessage>,
    _deadline: Instant,
) -> Result<LoadMessage, RecvTimeoutError> {
    use std::sync::mpsc::TryRecvError;
    receiver.try_recv().map_err(|e| match e {
        TryRecvError::Empty => RecvTimeoutError::Timeout,
        TryRecvError::Disconnected => RecvTimeoutError::Disconnected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{CompositeSlot, GenerationTracker};
    use crate::test_support::{Behavior, ScriptedLoader, png_bytes, solid};
    use crate::zone::PixelRect;
    use image::Rgba;
    use std::path::PathBuf;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const YELLOW: Rgba<u8> = Rgba([255, 255, 0, 255]);

    fn small_config() -> CompositorConfig {
        CompositorConfig {
            fallback_resolution: 200,
            load_timeout_ms: 5_000,
            ..CompositorConfig::default()
        }
    }

    fn file(name: &str) -> ImageSource {
        ImageSource::File(PathBuf::from(name))
    }

    fn request_with(sides: &[(SideKey, &str)]) -> ComposeRequest {
        let mut request = ComposeRequest {
            base_color: ColorValue::from("#f5f5f5"),
            ..ComposeRequest::default()
        };
        for (side, name) in sides {
            request.sides.set(*side, file(name));
        }
        request
    }

    fn bounding_box(image: &RgbaImage, color: Rgba<u8>) -> Option<PixelRect> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, pixel) in image.enumerate_pixels() {
            if *pixel == color {
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        bounds.map(|(x0, y0, x1, y1)| PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
        })
    }

    fn four_colour_loader() -> ScriptedLoader {
        ScriptedLoader::new()
            .with("front.png", Behavior::Image(solid(64, 64, RED)))
            .with("back.png", Behavior::Image(solid(30, 90, GREEN)))
            .with("left.png", Behavior::Image(solid(120, 40, BLUE)))
            .with("right.png", Behavior::Image(solid(17, 23, YELLOW)))
    }

    fn four_sides() -> ComposeRequest {
        request_with(&[
            (SideKey::Front, "front.png"),
            (SideKey::Back, "back.png"),
            (SideKey::Left, "left.png"),
            (SideKey::Right, "right.png"),
        ])
    }

    #[test]
    fn repeated_computes_are_pixel_identical() {
        let compositor = Compositor::new(small_config(), Arc::new(four_colour_loader()));
        let request = four_sides();

        let first = compositor.compose(&request, &Ticket::detached()).unwrap();
        let second = compositor.compose(&request, &Ticket::detached()).unwrap();
        assert_eq!(first.texture.pixels(), second.texture.pixels());
        assert_eq!(first.texture.png().unwrap(), second.texture.png().unwrap());
    }

    #[test]
    fn override_wins_over_every_other_input() {
        let user_image = solid(32, 16, Rgba([12, 34, 56, 255]));
        let bytes = png_bytes(&user_image);
        let compositor = Compositor::new(small_config(), Arc::new(four_colour_loader()));

        let mut plain = four_sides();
        plain.template_override = Some(TemplateOverride::new(bytes.clone()));
        let mut different = ComposeRequest {
            base_color: ColorValue::from("#000"),
            reference_overlay: true,
            ..ComposeRequest::default()
        };
        different.template_override = Some(TemplateOverride::new(bytes.clone()));

        for request in [plain, different] {
            let outcome = compositor.compose(&request, &Ticket::detached()).unwrap();
            assert_eq!(outcome.texture.pixels(), &user_image);
            assert_eq!(&*outcome.texture.png().unwrap(), bytes.as_slice());
            assert_eq!(outcome.requested, 0);
        }
    }

    #[test]
    fn empty_override_falls_back_to_zone_compositing() {
        let compositor = Compositor::new(small_config(), Arc::new(four_colour_loader()));
        let mut request = request_with(&[(SideKey::Front, "front.png")]);
        request.template_override = Some(TemplateOverride::new(Vec::new()));

        let outcome = compositor.compose(&request, &Ticket::detached()).unwrap();
        assert_eq!((outcome.texture.width(), outcome.texture.height()), (200, 200));
        assert!(bounding_box(outcome.texture.pixels(), RED).is_some());
    }

    #[test]
    fn unreadable_override_keeps_caller_state() {
        let compositor = Compositor::new(small_config(), Arc::new(four_colour_loader()));
        let request = ComposeRequest {
            template_override: Some(TemplateOverride::new(vec![1u8, 2, 3])),
            ..ComposeRequest::default()
        };
        assert!(matches!(
            compositor.compose(&request, &Ticket::detached()),
            Err(CompositorError::InvalidTemplateOverride(_))
        ));
    }

    #[test]
    fn every_side_lands_inside_its_zone_and_saturates_it() {
        let config = small_config();
        let zones = config.zones;
        let compositor = Compositor::new(config, Arc::new(four_colour_loader()));

        let outcome = compositor.compose(&four_sides(), &Ticket::detached()).unwrap();
        assert!(outcome.failures.is_empty());

        for (side, color) in [
            (SideKey::Front, RED),
            (SideKey::Back, GREEN),
            (SideKey::Left, BLUE),
            (SideKey::Right, YELLOW),
        ] {
            let zone = zones.pixel_rect(side, 200, 200);
            let drawn = bounding_box(outcome.texture.pixels(), color)
                .unwrap_or_else(|| panic!("{side} not drawn"));
            assert!(zone.contains(&drawn), "{side}: {drawn:?} outside {zone:?}");
            assert!(
                drawn.width == zone.width || drawn.height == zone.height,
                "{side}: {drawn:?} does not saturate {zone:?}"
            );
        }
    }

    #[test]
    fn one_failed_load_does_not_block_the_others() {
        let loader = four_colour_loader()
            .with("back.png", Behavior::Fail)
            .with("left.png", Behavior::Delay(Duration::from_millis(60), solid(8, 8, BLUE)));
        let compositor = Compositor::new(small_config(), Arc::new(loader));

        let started = std::time::Instant::now();
        let outcome = compositor.compose(&four_sides(), &Ticket::detached()).unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].side, SideKey::Back);
        assert!(!outcome.all_failed());

        let pixels = outcome.texture.pixels();
        assert!(bounding_box(pixels, RED).is_some());
        assert!(bounding_box(pixels, GREEN).is_none());
        assert!(bounding_box(pixels, BLUE).is_some());
        assert!(bounding_box(pixels, YELLOW).is_some());
    }

    #[test]
    fn all_failed_is_reported() {
        let loader = ScriptedLoader::new()
            .with("front.png", Behavior::Fail)
            .with("back.png", Behavior::Fail);
        let compositor = Compositor::new(small_config(), Arc::new(loader));
        let request = request_with(&[(SideKey::Front, "front.png"), (SideKey::Back, "back.png")]);

        let outcome = compositor.compose(&request, &Ticket::detached()).unwrap();
        assert!(outcome.all_failed());
        assert_eq!(
            outcome.texture.pixels().get_pixel(0, 0),
            &Rgba([245, 245, 245, 255])
        );
    }

    #[test]
    fn hanging_loads_time_out_as_failures() {
        let loader = four_colour_loader().with("right.png", Behavior::Delay(Duration::from_secs(1), solid(4, 4, YELLOW)));
        let config = CompositorConfig {
            load_timeout_ms: 150,
            ..small_config()
        };
        let compositor = Compositor::new(config, Arc::new(loader));

        let started = std::time::Instant::now();
        let outcome = compositor.compose(&four_sides(), &Ticket::detached()).unwrap();
        assert!(started.elapsed() < Duration::from_millis(900));
        assert_eq!(
            outcome.failures,
            vec![AssetLoadFailure {
                side: SideKey::Right,
                reason: AssetLoadError::Timeout
            }]
        );
        assert!(bounding_box(outcome.texture.pixels(), RED).is_some());
    }

    #[test]
    fn superseded_compute_never_overwrites_the_newer_result() {
        let loader = ScriptedLoader::new()
            .with("slow.png", Behavior::Delay(Duration::from_millis(300), solid(10, 10, RED)))
            .with("fast.png", Behavior::Image(solid(10, 10, GREEN)));
        let compositor = Compositor::new(small_config(), Arc::new(loader));
        let tracker = GenerationTracker::new();
        let mut slot = CompositeSlot::default();

        let request_a = request_with(&[(SideKey::Front, "slow.png")]);
        let request_b = request_with(&[(SideKey::Front, "fast.png")]);
        let ticket_a = tracker.begin();

        std::thread::scope(|scope| {
            let handle_a = scope.spawn(|| compositor.compose(&request_a, &ticket_a));
            std::thread::sleep(Duration::from_millis(50));

            let ticket_b = tracker.begin();
            let outcome_b = compositor.compose(&request_b, &ticket_b).unwrap();
            slot.commit(&ticket_b, outcome_b.texture).unwrap();

            match handle_a.join().unwrap() {
                Err(CompositorError::StaleComputeDiscarded { .. }) => {}
                Ok(outcome_a) => assert!(slot.commit(&ticket_a, outcome_a.texture).is_err()),
                Err(other) => panic!("unexpected error: {other}"),
            }
        });

        let current = slot.current().unwrap();
        assert_eq!(current.generation(), 2);
        assert!(bounding_box(current.pixels(), GREEN).is_some());
        assert!(bounding_box(current.pixels(), RED).is_none());
    }

    #[test]
    fn overlay_alpha_drops_once_artwork_exists() {
        let template = solid(100, 100, Rgba([255, 255, 255, 255]));
        let loader = ScriptedLoader::new()
            .with("template.png", Behavior::Image(template))
            .with("front.png", Behavior::Image(solid(8, 8, RED)));
        let config = CompositorConfig {
            template: Some("template.png".to_string()),
            ..small_config()
        };
        let compositor = Compositor::new(config, Arc::new(loader));

        let mut empty = ComposeRequest {
            base_color: ColorValue::from("#000000"),
            reference_overlay: true,
            ..ComposeRequest::default()
        };
        let outcome = compositor.compose(&empty, &Ticket::detached()).unwrap();
        assert_eq!(outcome.texture.pixels().get_pixel(0, 0), &Rgba([204, 204, 204, 255]));

        empty.sides.set(SideKey::Front, file("front.png"));
        let outcome = compositor.compose(&empty, &Ticket::detached()).unwrap();
        assert_eq!(outcome.texture.pixels().get_pixel(0, 0), &Rgba([89, 89, 89, 255]));

        empty.reference_overlay = false;
        let outcome = compositor.compose(&empty, &Ticket::detached()).unwrap();
        assert_eq!(outcome.texture.pixels().get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn side_images_are_layered_above_the_reference() {
        let loader = ScriptedLoader::new()
            .with("template.png", Behavior::Image(solid(200, 200, Rgba([255, 255, 255, 255]))))
            .with("front.png", Behavior::Image(solid(64, 64, RED)));
        let config = CompositorConfig {
            template: Some("template.png".to_string()),
            ..small_config()
        };
        let zone = config.zones.pixel_rect(SideKey::Front, 200, 200);
        let compositor = Compositor::new(config, Arc::new(loader));
        let request = ComposeRequest {
            base_color: ColorValue::from("#000000"),
            reference_overlay: true,
            ..request_with(&[(SideKey::Front, "front.png")])
        };

        let outcome = compositor.compose(&request, &Ticket::detached()).unwrap();
        let pixels = outcome.texture.pixels();
        let centre = (zone.x + zone.width / 2, zone.y + zone.height / 2);
        assert_eq!(pixels.get_pixel(centre.0, centre.1), &RED);
        assert_eq!(pixels.get_pixel(0, 0), &Rgba([89, 89, 89, 255]));
    }

    #[test]
    fn canvas_follows_template_dimensions() {
        let loader = ScriptedLoader::new()
            .with("template.png", Behavior::Image(solid(120, 120, Rgba([0, 0, 0, 0]))));
        let config = CompositorConfig {
            template: Some("template.png".to_string()),
            ..small_config()
        };
        let compositor = Compositor::new(config, Arc::new(loader));
        let outcome = compositor
            .compose(&ComposeRequest::default(), &Ticket::detached())
            .unwrap();
        assert_eq!((outcome.texture.width(), outcome.texture.height()), (120, 120));
    }

    #[test]
    fn missing_template_degrades_to_base_colour() {
        let config = CompositorConfig {
            template: Some("missing.png".to_string()),
            ..small_config()
        };
        let compositor = Compositor::new(config, Arc::new(ScriptedLoader::new()));
        let request = ComposeRequest {
            base_color: ColorValue::from("#102030"),
            reference_overlay: true,
            ..ComposeRequest::default()
        };
        let outcome = compositor.compose(&request, &Ticket::detached()).unwrap();
        assert_eq!((outcome.texture.width(), outcome.texture.height()), (200, 200));
        assert_eq!(outcome.texture.pixels().get_pixel(150, 10), &Rgba([16, 32, 48, 255]));
    }

    #[test]
    fn unusable_surface_is_reported_as_unavailable() {
        let config = CompositorConfig {
            fallback_resolution: 0,
            ..small_config()
        };
        let compositor = Compositor::new(config, Arc::new(ScriptedLoader::new()));
        assert!(matches!(
            compositor.compose(&ComposeRequest::default(), &Ticket::detached()),
            Err(CompositorError::Unavailable(_))
        ));
    }

    #[test]
    fn invalid_base_colour_still_produces_a_raster() {
        let compositor = Compositor::new(small_config(), Arc::new(ScriptedLoader::new()));
        let request = ComposeRequest {
            base_color: ColorValue::from("not-a-colour"),
            ..ComposeRequest::default()
        };
        let outcome = compositor.compose(&request, &Ticket::detached()).unwrap();
        assert_eq!(outcome.texture.pixels().get_pixel(5, 5), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn red_front_square_on_default_canvas() {
        let loader = ScriptedLoader::new().with("front.png", Behavior::Image(solid(64, 64, RED)));
        let compositor = Compositor::new(CompositorConfig::default(), Arc::new(loader));
        let request = request_with(&[(SideKey::Front, "front.png")]);

        let outcome = compositor.compose(&request, &Ticket::detached()).unwrap();
        let pixels = outcome.texture.pixels();
        assert_eq!(pixels.dimensions(), (2048, 2048));

        let zone = ZoneLayout::default().pixel_rect(SideKey::Front, 2048, 2048);
        let drawn = bounding_box(pixels, RED).unwrap();
        let side = zone.width.min(zone.height);
        assert_eq!((drawn.width, drawn.height), (side, side));
        assert_eq!(drawn.x, zone.x + (zone.width - side) / 2);
        assert_eq!(drawn.y, zone.y + (zone.height - side) / 2);

        let background = Rgba([245, 245, 245, 255]);
        assert_eq!(pixels.get_pixel(0, 0), &background);
        assert_eq!(pixels.get_pixel(2047, 2047), &background);
        assert_eq!(pixels.get_pixel(zone.x, zone.y + zone.height / 2), &background);
        let red_count = pixels.pixels().filter(|p| **p == RED).count() as u32;
        assert_eq!(red_count, side * side);
    }
}
