use crate::engine::garment::mesh::Garment;
use crate::engine::loading::progress::LoadingProgress;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

#[derive(Component)]
pub struct FpsText;

pub fn track_garment_spawned(
    mut loading_progress: ResMut<LoadingProgress>,
    garments: Query<(), With<Garment>>,
) {
    if !loading_progress.garment_spawned && !garments.is_empty() {
        loading_progress.garment_spawned = true;
    }
}

pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.is_complete() {
        println!("→ Preview ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    #[test]
    fn running_waits_for_manifest_and_garment() {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_state::<AppState>()
            .init_resource::<LoadingProgress>()
            .add_systems(
                Update,
                (track_garment_spawned, transition_to_running)
                    .chain()
                    .run_if(in_state(AppState::Loading)),
            );

        app.world_mut().spawn(Garment);
        app.update();
        app.update();
        assert_eq!(
            app.world().resource::<State<AppState>>().get(),
            &AppState::Loading
        );

        app.world_mut()
            .resource_mut::<LoadingProgress>()
            .manifest_resolved = true;
        app.update();
        app.update();
        assert_eq!(
            app.world().resource::<State<AppState>>().get(),
            &AppState::Running
        );
    }
}
