use crate::engine::garment::decal::{Decal, DecalAssets, decal_transform};
use crate::engine::garment::preview_state::{GarmentPreviewState, RenderMode};
use bevy::prelude::*;
use constants::render_settings::{
    GARMENT_CLEARCOAT, GARMENT_CLEARCOAT_ROUGHNESS, GARMENT_ROUGHNESS,
};
use texture_compositor::ColorValue;

/// Material shared by every garment part.
#[derive(Resource, Debug, Clone)]
pub struct GarmentMaterial(pub Handle<StandardMaterial>);

/// Uniform semi-glossy fabric finish.
pub fn garment_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::WHITE,
        perceptual_roughness: GARMENT_ROUGHNESS,
        clearcoat: GARMENT_CLEARCOAT,
        clearcoat_perceptual_roughness: GARMENT_CLEARCOAT_ROUGHNESS,
        ..default()
    }
}

pub fn to_bevy_color(color: &ColorValue) -> Color {
    let [r, g, b, a] = color.to_fill().0;
    Color::srgba_u8(r, g, b, a)
}

/// Composite texture unmodulated in full-texture mode, plain base colour otherwise.
pub fn apply_preview_state(material: &mut StandardMaterial, state: &GarmentPreviewState) {
    match (state.effective_mode(), &state.composite) {
        (RenderMode::FullTexture, Some(composite)) => {
            material.base_color = Color::WHITE;
            material.base_color_texture = Some(composite.clone());
        }
        _ => {
            material.base_color = to_bevy_color(&state.base_color);
            material.base_color_texture = None;
        }
    }
}

/// Rebind garment and decal whenever the preview state changes.
pub fn rebind_garment_material(
    state: Res<GarmentPreviewState>,
    garment: Option<Res<GarmentMaterial>>,
    decal_assets: Option<Res<DecalAssets>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut decals: Query<(&mut Transform, &mut Visibility), With<Decal>>,
) {
    if !state.is_changed() {
        return;
    }

    if let Some(garment) = garment {
        if let Some(material) = materials.get_mut(&garment.0) {
            apply_preview_state(material, &state);
        }
    }

    if let Some(decal_assets) = decal_assets {
        if let Some(material) = materials.get_mut(&decal_assets.material) {
            // A blank texture stays bound when there is no logo.
            material.base_color_texture =
                Some(state.logo.clone().unwrap_or_else(|| decal_assets.blank.clone()));
        }
    }

    let show_decal = state.effective_mode() == RenderMode::SingleDecal;
    for (mut transform, mut visibility) in &mut decals {
        *transform = decal_transform(
            state.print_location,
            state.logo_scale,
            state.logo_rotation_degrees,
        );
        *visibility = if show_decal {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_is_semi_glossy() {
        let material = garment_material();
        assert_eq!(material.perceptual_roughness, 0.55);
        assert_eq!(material.clearcoat, 0.1);
        assert_eq!(material.clearcoat_perceptual_roughness, 0.3);
    }

    #[test]
    fn composite_is_shown_unmodulated() {
        let mut material = garment_material();
        let state = GarmentPreviewState {
            base_color: ColorValue::from("#ff0000"),
            composite: Some(Handle::default()),
            ..GarmentPreviewState::default()
        };
        apply_preview_state(&mut material, &state);
        assert_eq!(material.base_color, Color::WHITE);
        assert!(material.base_color_texture.is_some());
    }

    #[test]
    fn decal_mode_shows_the_base_colour() {
        let mut material = garment_material();
        material.base_color_texture = Some(Handle::default());
        let state = GarmentPreviewState {
            base_color: ColorValue::from("#ff0000"),
            composite: Some(Handle::default()),
            mode: RenderMode::SingleDecal,
            ..GarmentPreviewState::default()
        };
        apply_preview_state(&mut material, &state);
        assert_eq!(material.base_color, Color::srgba_u8(255, 0, 0, 255));
        assert!(material.base_color_texture.is_none());
    }
}
