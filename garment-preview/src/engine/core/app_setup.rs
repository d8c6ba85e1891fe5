use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::assets::customizer_manifest::CustomizerManifest;
use crate::engine::camera::orbit_camera::{camera_controller, spawn_preview_camera};
use crate::engine::compositing::compose_task::{ComposeTasks, dispatch_compose, poll_compose_tasks};
use crate::engine::compositing::preview_sync::{PreviewBindings, sync_preview_state};
use crate::engine::core::app_state::{
    AppState, FpsText, track_garment_spawned, transition_to_running,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::garment::decal::setup_decal_assets;
use crate::engine::garment::material::rebind_garment_material;
use crate::engine::garment::mesh::spawn_garment;
use crate::engine::garment::preview_state::GarmentPreviewState;
use crate::engine::loading::manifest_loader::{ManifestLoader, load_manifest_system, start_loading};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::systems::loading_overlay::{loading_overlay_system, spawn_loading_label};
use crate::engine::systems::render_mode::render_mode_system;
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::session::catalog::StaticCatalog;
use crate::session::controller::DesignSession;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::{file_drop::file_drop_system, fps_tracking::fps_text_update_system};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers CustomizerManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<CustomizerManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin);

    // Catalog is replaced once the manifest resolves.
    app.init_resource::<LoadingProgress>()
        .init_resource::<ManifestLoader>()
        .init_resource::<StaticCatalog>()
        .init_resource::<DesignSession>()
        .init_resource::<GarmentPreviewState>()
        .init_resource::<PreviewBindings>()
        .init_resource::<ComposeTasks>();

    app.add_systems(
        Startup,
        (
            setup,
            spawn_preview_camera,
            setup_decal_assets,
            spawn_garment,
            start_loading,
        )
            .chain(),
    )
    .add_systems(
        Update,
        (load_manifest_system, track_garment_spawned, transition_to_running)
            .chain()
            .run_if(in_state(AppState::Loading)),
    );

    let runtime_systems = (
        render_mode_system,
        dispatch_compose,
        poll_compose_tasks,
        sync_preview_state,
        rebind_garment_material,
    )
        .chain();

    app.add_systems(Update, runtime_systems.run_if(in_state(AppState::Running)))
        // Orbiting and loading feedback stay live in every state.
        .add_systems(
            Update,
            (camera_controller, loading_overlay_system, fps_notification_system),
        );

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system).add_systems(
            Update,
            file_drop_system
                .before(dispatch_compose)
                .run_if(in_state(AppState::Running)),
        );
    }

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
    commands.insert_resource(AmbientLight {
        brightness: 300.0,
        ..default()
    });
}

fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    spawn_loading_label(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
