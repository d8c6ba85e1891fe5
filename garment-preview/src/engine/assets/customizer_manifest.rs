use crate::session::catalog::StaticCatalog;
use bevy::prelude::*;
use constants::assets::{DEFAULT_DESIGN_STORE_DIR, REFERENCE_TEMPLATE_PATH};
use serde::{Deserialize, Serialize};
use texture_compositor::{CompositorConfig, ZoneLayoutError};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ManifestError {
    #[error("fallback resolution must be positive")]
    Resolution,
    #[error("load timeout must be positive")]
    Timeout,
    #[error(transparent)]
    Zones(#[from] ZoneLayoutError),
}

/// Runtime configuration of the customizer, loaded from `customizer/manifest.json`.
///
/// Every field is optional in the file. Missing fields take the compiled-in
/// defaults.
#[derive(Asset, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomizerManifest {
    pub compositor: CompositorConfig,
    pub design_store_dir: String,
    pub catalog: StaticCatalog,
}

impl Default for CustomizerManifest {
    fn default() -> Self {
        Self {
            compositor: CompositorConfig {
                template: Some(REFERENCE_TEMPLATE_PATH.to_string()),
                ..CompositorConfig::default()
            },
            design_store_dir: DEFAULT_DESIGN_STORE_DIR.to_string(),
            catalog: StaticCatalog::default(),
        }
    }
}

impl CustomizerManifest {
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.compositor.fallback_resolution == 0 {
            return Err(ManifestError::Resolution);
        }
        if self.compositor.load_timeout_ms == 0 {
            return Err(ManifestError::Timeout);
        }
        self.compositor.zones.validate()?;
        Ok(())
    }

    /// Compositor settings with the template resolved against the asset root.
    pub fn compositor_config(&self) -> CompositorConfig {
        let mut config = self.compositor.clone();
        config.template = config.template.map(|template| resolve_asset_path(&template));
        config
    }
}

/// Asset-relative paths are read straight from disk by the compositor, so
/// anchor them to the asset directory. URLs and absolute paths pass through.
fn resolve_asset_path(location: &str) -> String {
    if location.contains("://") || location.starts_with("data:") {
        return location.to_string();
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let path = std::path::Path::new(location);
        if path.is_relative() {
            let root = bevy::asset::io::file::FileAssetReader::get_base_path().join("assets");
            return root.join(path).to_string_lossy().into_owned();
        }
    }

    location.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use texture_compositor::Zone;

    #[test]
    fn empty_manifest_uses_defaults() {
        let manifest: CustomizerManifest = serde_json::from_str("{}").unwrap();
        assert_eq!(manifest, CustomizerManifest::default());
        assert_eq!(manifest.compositor.fallback_resolution, 2048);
        assert_eq!(manifest.validate(), Ok(()));
    }

    #[test]
    fn partial_compositor_section_keeps_other_defaults() {
        let manifest: CustomizerManifest =
            serde_json::from_str(r#"{ "compositor": { "fallback_resolution": 1024 } }"#).unwrap();
        assert_eq!(manifest.compositor.fallback_resolution, 1024);
        assert_eq!(manifest.compositor.load_timeout_ms, 20_000);
        // An explicit compositor section without a template has none.
        assert_eq!(manifest.compositor.template, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut manifest = CustomizerManifest::default();
        manifest.compositor.fallback_resolution = 0;
        assert_eq!(manifest.validate(), Err(ManifestError::Resolution));

        let mut manifest = CustomizerManifest::default();
        manifest.compositor.zones.left = Zone::new(0.0, 0.0, 0.5, 0.5);
        assert!(matches!(manifest.validate(), Err(ManifestError::Zones(_))));
    }

    #[test]
    fn shipped_manifest_is_valid() {
        let manifest: CustomizerManifest =
            serde_json::from_str(include_str!("../../../assets/customizer/manifest.json")).unwrap();
        assert_eq!(manifest.validate(), Ok(()));
        assert_eq!(manifest.compositor.zones, texture_compositor::ZoneLayout::default());
        assert_eq!(
            manifest.compositor.template.as_deref(),
            Some(REFERENCE_TEMPLATE_PATH)
        );
    }

    #[test]
    fn urls_are_not_rebased() {
        assert_eq!(resolve_asset_path("data:image/png;base64,AA"), "data:image/png;base64,AA");
        let resolved = resolve_asset_path("customizer/uv_template.png");
        assert!(resolved.ends_with("uv_template.png"));
    }
}
