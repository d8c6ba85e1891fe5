use bevy::prelude::*;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadingProgress {
    pub manifest_resolved: bool,
    pub garment_spawned: bool,
}

impl LoadingProgress {
    pub fn is_complete(&self) -> bool {
        self.manifest_resolved && self.garment_spawned
    }
}
