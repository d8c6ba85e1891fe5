use crate::engine::compositing::preview_sync::PreviewBindings;
#[cfg(not(target_arch = "wasm32"))]
use crate::session::controller::DesignSession;
use bevy::prelude::*;

/// `T` switches between full texture and decal, `R` toggles the reference overlay.
///
/// In the browser both are driven by RPC, so the system only reports changes.
pub fn render_mode_system(
    mut bindings: ResMut<PreviewBindings>,
    #[cfg(not(target_arch = "wasm32"))] mut session: ResMut<DesignSession>,
    #[cfg(not(target_arch = "wasm32"))] keyboard: Res<ButtonInput<KeyCode>>,
) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if keyboard.just_pressed(KeyCode::KeyT) {
            bindings.mode = bindings.mode.toggled();
            info!("Render mode: {:?}", bindings.mode);
        }

        if keyboard.just_pressed(KeyCode::KeyR) {
            let enabled = !session.reference_overlay();
            session.set_reference_overlay(enabled);
            info!("Reference overlay: {}", if enabled { "on" } else { "off" });
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        if bindings.is_changed() && !bindings.is_added() {
            info!("Render mode changed to: {:?}", bindings.mode);
        }
    }
}
