use crate::session::form::PrintLocation;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use constants::garment::{DECAL_BASE_SIZE, DECAL_HEIGHT, DECAL_SURFACE_OFFSET, TORSO_SIZE};
use constants::render_settings::{GARMENT_ROUGHNESS, MAX_LOGO_SCALE, MIN_LOGO_SCALE};
use std::f32::consts::PI;

/// Logo quad parented to the torso.
#[derive(Component)]
pub struct Decal;

#[derive(Resource, Debug, Clone)]
pub struct DecalAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
    /// 1x1 transparent image bound while there is no logo.
    pub blank: Handle<Image>,
}

pub fn blank_image() -> Image {
    Image::new_fill(
        Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 0],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

pub fn setup_decal_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    let blank = images.add(blank_image());
    let material = materials.add(StandardMaterial {
        base_color_texture: Some(blank.clone()),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: GARMENT_ROUGHNESS,
        ..default()
    });
    commands.insert_resource(DecalAssets {
        mesh: meshes.add(Rectangle::new(DECAL_BASE_SIZE, DECAL_BASE_SIZE)),
        material,
        blank,
    });
}

/// Decal placement in torso space.
///
/// The quad faces +Z. Back prints are turned half a revolution about the
/// vertical axis so the logo reads correctly from behind, then spun by
/// `rotation_degrees` about the face normal like front prints.
pub fn decal_transform(location: PrintLocation, scale: f32, rotation_degrees: f32) -> Transform {
    let surface = TORSO_SIZE.2 / 2.0 + DECAL_SURFACE_OFFSET;
    let spin = Quat::from_rotation_z(rotation_degrees.to_radians());
    let (z, rotation) = match location {
        PrintLocation::Front => (surface, spin),
        PrintLocation::Back => (-surface, Quat::from_rotation_y(PI) * spin),
    };
    let scale = if scale.is_finite() {
        scale.clamp(MIN_LOGO_SCALE, MAX_LOGO_SCALE)
    } else {
        1.0
    };

    Transform {
        translation: Vec3::new(0.0, DECAL_HEIGHT, z),
        rotation,
        scale: Vec3::new(scale, scale, 1.0),
    }
}
