use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::assets::CUSTOMIZER_MANIFEST_PATH;
use std::sync::Arc;
use texture_compositor::Compositor;

use crate::engine::assets::customizer_manifest::CustomizerManifest;
use crate::engine::compositing::compose_task::PreviewCompositor;
use crate::engine::loading::progress::LoadingProgress;
use crate::session::design_store::DesignStore;

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<CustomizerManifest>>,
}

pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    manifest_loader.handle = Some(asset_server.load(CUSTOMIZER_MANIFEST_PATH));
}

/// Wait for the manifest, then install the resources built from it.
///
/// A failed load or an invalid manifest falls back to the defaults instead of
/// leaving the preview stuck in `Loading`.
pub fn load_manifest_system(
    mut commands: Commands,
    mut loading_progress: ResMut<LoadingProgress>,
    manifest_loader: Res<ManifestLoader>,
    manifests: Res<Assets<CustomizerManifest>>,
    asset_server: Res<AssetServer>,
) {
    if loading_progress.manifest_resolved {
        return;
    }
    let Some(handle) = manifest_loader.handle.as_ref() else {
        return;
    };

    let manifest = if let Some(manifest) = manifests.get(handle) {
        match manifest.validate() {
            Ok(()) => {
                println!("✓ Customizer manifest loaded");
                manifest.clone()
            }
            Err(e) => {
                warn!("Customizer manifest rejected ({e}), using defaults");
                CustomizerManifest::default()
            }
        }
    } else if let LoadState::Failed(e) = asset_server.load_state(handle.id()) {
        warn!("Customizer manifest unavailable ({e}), using defaults");
        CustomizerManifest::default()
    } else {
        return;
    };

    install_manifest(&mut commands, &manifest);
    loading_progress.manifest_resolved = true;
}

fn install_manifest(commands: &mut Commands, manifest: &CustomizerManifest) {
    let compositor = Compositor::with_default_loader(manifest.compositor_config());
    let (width, height) = compositor.canvas_size();
    info!(
        "Compositor ready: {}x{} canvas, template {}",
        width,
        height,
        if compositor.template().is_some() { "loaded" } else { "missing" }
    );

    commands.insert_resource(PreviewCompositor(Arc::new(compositor)));
    commands.insert_resource(manifest.catalog.clone());
    commands.insert_resource(DesignStore::for_platform(&manifest.design_store_dir));
}
