use crate::engine::garment::decal::{Decal, DecalAssets, decal_transform};
use crate::engine::garment::material::{GarmentMaterial, apply_preview_state, garment_material};
use crate::engine::garment::preview_state::{GarmentPreviewState, RenderMode};
use bevy::prelude::*;
use constants::garment::{
    COLLAR_HEIGHT, COLLAR_RADIUS, SHOULDER_HEIGHT, SHOULDER_OFFSET_X, SHOULDER_RADIUS,
    SLEEVE_HEIGHT, SLEEVE_LENGTH, SLEEVE_OFFSET_X, SLEEVE_RADIUS, SLEEVE_TILT_RADIANS, TORSO_SIZE,
};

/// Root of the garment assembly.
#[derive(Component)]
pub struct Garment;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GarmentPart {
    Torso,
    LeftShoulder,
    RightShoulder,
    LeftSleeve,
    RightSleeve,
    Collar,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartShape {
    Cuboid(Vec3),
    Sphere(f32),
    Cylinder { radius: f32, length: f32 },
}

impl PartShape {
    fn add_mesh(self, meshes: &mut Assets<Mesh>) -> Handle<Mesh> {
        match self {
            PartShape::Cuboid(size) => meshes.add(Cuboid::new(size.x, size.y, size.z)),
            PartShape::Sphere(radius) => meshes.add(Sphere::new(radius)),
            PartShape::Cylinder { radius, length } => meshes.add(Cylinder::new(radius, length)),
        }
    }
}

/// Part shapes and placements relative to the garment root.
///
/// Sleeves hang outward from the shoulders, mirrored about the YZ plane.
pub fn garment_layout() -> [(GarmentPart, PartShape, Transform); 6] {
    let (width, height, depth) = TORSO_SIZE;
    let shoulder = PartShape::Sphere(SHOULDER_RADIUS);
    let sleeve = PartShape::Cylinder {
        radius: SLEEVE_RADIUS,
        length: SLEEVE_LENGTH,
    };

    [
        (
            GarmentPart::Torso,
            PartShape::Cuboid(Vec3::new(width, height, depth)),
            Transform::IDENTITY,
        ),
        (
            GarmentPart::LeftShoulder,
            shoulder,
            Transform::from_xyz(-SHOULDER_OFFSET_X, SHOULDER_HEIGHT, 0.0),
        ),
        (
            GarmentPart::RightShoulder,
            shoulder,
            Transform::from_xyz(SHOULDER_OFFSET_X, SHOULDER_HEIGHT, 0.0),
        ),
        (
            GarmentPart::LeftSleeve,
            sleeve,
            Transform::from_xyz(-SLEEVE_OFFSET_X, SLEEVE_HEIGHT, 0.0)
                .with_rotation(Quat::from_rotation_z(-SLEEVE_TILT_RADIANS)),
        ),
        (
            GarmentPart::RightSleeve,
            sleeve,
            Transform::from_xyz(SLEEVE_OFFSET_X, SLEEVE_HEIGHT, 0.0)
                .with_rotation(Quat::from_rotation_z(SLEEVE_TILT_RADIANS)),
        ),
        (
            GarmentPart::Collar,
            PartShape::Sphere(COLLAR_RADIUS),
            Transform::from_xyz(0.0, COLLAR_HEIGHT, 0.0),
        ),
    ]
}

/// Spawn the garment once. Every part shares the single garment material.
pub fn spawn_garment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    decal_assets: Res<DecalAssets>,
    preview: Res<GarmentPreviewState>,
) {
    let mut base = garment_material();
    apply_preview_state(&mut base, &preview);
    let material = materials.add(base);
    commands.insert_resource(GarmentMaterial(material.clone()));

    let root = commands
        .spawn((Garment, Transform::default(), Visibility::default()))
        .id();

    for (part, shape, transform) in garment_layout() {
        let mesh = shape.add_mesh(&mut meshes);
        let child = commands
            .spawn((part, Mesh3d(mesh), MeshMaterial3d(material.clone()), transform))
            .id();
        commands.entity(root).add_child(child);

        if part == GarmentPart::Torso {
            let visibility = match preview.effective_mode() {
                RenderMode::SingleDecal => Visibility::Inherited,
                RenderMode::FullTexture => Visibility::Hidden,
            };
            let decal = commands
                .spawn((
                    Decal,
                    Mesh3d(decal_assets.mesh.clone()),
                    MeshMaterial3d(decal_assets.material.clone()),
                    decal_transform(
                        preview.print_location,
                        preview.logo_scale,
                        preview.logo_rotation_degrees,
                    ),
                    visibility,
                ))
                .id();
            commands.entity(child).add_child(decal);
        }
    }

    info!("Garment spawned");
}
