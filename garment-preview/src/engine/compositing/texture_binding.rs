use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use image::RgbaImage;
use texture_compositor::CompositeTexture;

pub fn rgba_to_image(pixels: &RgbaImage) -> Image {
    Image::new(
        Extent3d {
            width: pixels.width(),
            height: pixels.height(),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        pixels.as_raw().clone(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    )
}

/// Upload `pixels` into `slot`, dropping the image it replaces.
pub fn replace_image(
    images: &mut Assets<Image>,
    slot: &mut Option<Handle<Image>>,
    pixels: &RgbaImage,
) -> Handle<Image> {
    let handle = images.add(rgba_to_image(pixels));
    if let Some(previous) = slot.replace(handle.clone()) {
        images.remove(previous.id());
    }
    handle
}

/// Empty `slot` and drop the image it held.
pub fn unbind_image(images: &mut Assets<Image>, slot: &mut Option<Handle<Image>>) {
    if let Some(previous) = slot.take() {
        images.remove(previous.id());
    }
}

pub fn bind_composite(
    images: &mut Assets<Image>,
    slot: &mut Option<Handle<Image>>,
    texture: &CompositeTexture,
) -> Handle<Image> {
    replace_image(images, slot, texture.pixels())
}
