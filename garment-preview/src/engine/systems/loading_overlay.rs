use crate::engine::compositing::compose_task::ComposeTasks;
use crate::engine::core::app_state::AppState;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;

#[derive(Component)]
pub struct LoadingLabel;

pub fn spawn_loading_label(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("Loading preview…"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(0.2, 0.2, 0.2)),
                LoadingLabel,
            ));
        });
}

pub fn is_loading(state: &AppState, composes_in_flight: usize) -> bool {
    *state == AppState::Loading || composes_in_flight > 0
}

/// Toggle the placeholder and tell the host page whenever it flips.
pub fn loading_overlay_system(
    state: Res<State<AppState>>,
    tasks: Res<ComposeTasks>,
    mut labels: Query<&mut Visibility, With<LoadingLabel>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut shown: Local<Option<bool>>,
) {
    let loading = is_loading(state.get(), tasks.in_flight());
    if *shown == Some(loading) {
        return;
    }
    *shown = Some(loading);

    for mut visibility in &mut labels {
        *visibility = if loading {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    rpc_interface.send_notification("loading_state", serde_json::json!({ "loading": loading }));
}
