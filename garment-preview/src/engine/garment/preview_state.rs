use crate::session::form::PrintLocation;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use texture_compositor::ColorValue;

/// How artwork reaches the garment surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Composite wrapped over the whole mesh.
    #[default]
    FullTexture,
    /// One logo quad on the front or back face.
    SingleDecal,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_texture" => Ok(RenderMode::FullTexture),
            "single_decal" | "decal" => Ok(RenderMode::SingleDecal),
            other => Err(format!("unknown render mode '{other}'")),
        }
    }
}

impl RenderMode {
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::FullTexture => RenderMode::SingleDecal,
            RenderMode::SingleDecal => RenderMode::FullTexture,
        }
    }
}

/// Inputs of the preview material. Rebinding happens whenever this changes.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GarmentPreviewState {
    pub base_color: ColorValue,
    pub composite: Option<Handle<Image>>,
    pub logo: Option<Handle<Image>>,
    pub print_location: PrintLocation,
    pub logo_scale: f32,
    pub logo_rotation_degrees: f32,
    pub mode: RenderMode,
}

impl Default for GarmentPreviewState {
    fn default() -> Self {
        Self {
            base_color: ColorValue::default(),
            composite: None,
            logo: None,
            print_location: PrintLocation::Front,
            logo_scale: 1.0,
            logo_rotation_degrees: 0.0,
            mode: RenderMode::FullTexture,
        }
    }
}

impl GarmentPreviewState {
    /// Full-texture mode needs a composite; without one the decal path is used.
    pub fn effective_mode(&self) -> RenderMode {
        match (self.mode, &self.composite) {
            (RenderMode::FullTexture, Some(_)) => RenderMode::FullTexture,
            _ => RenderMode::SingleDecal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decal_is_used_until_a_composite_exists() {
        let mut state = GarmentPreviewState::default();
        assert_eq!(state.effective_mode(), RenderMode::SingleDecal);

        state.composite = Some(Handle::default());
        assert_eq!(state.effective_mode(), RenderMode::FullTexture);

        state.mode = RenderMode::SingleDecal;
        assert_eq!(state.effective_mode(), RenderMode::SingleDecal);
    }

    #[test]
    fn render_mode_names() {
        assert_eq!("decal".parse::<RenderMode>(), Ok(RenderMode::SingleDecal));
        assert_eq!("full_texture".parse::<RenderMode>(), Ok(RenderMode::FullTexture));
        assert!("wireframe".parse::<RenderMode>().is_err());
        assert_eq!(RenderMode::FullTexture.toggled(), RenderMode::SingleDecal);
    }
}
