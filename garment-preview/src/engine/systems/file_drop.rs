use crate::session::controller::DesignSession;
use bevy::prelude::*;
use texture_compositor::{ImageSource, SideKey};

/// First side without artwork, in front, back, left, right order.
pub fn next_free_side(session: &DesignSession) -> Option<SideKey> {
    SideKey::ALL
        .into_iter()
        .find(|side| session.sides().get(*side).is_none())
}

/// Dropped files fill the free side slots in order. Drops beyond four replace nothing.
pub fn file_drop_system(
    mut events: EventReader<FileDragAndDrop>,
    mut session: ResMut<DesignSession>,
) {
    for event in events.read() {
        let FileDragAndDrop::DroppedFile { path_buf, .. } = event else {
            continue;
        };
        match next_free_side(&session) {
            Some(side) => {
                info!("{} artwork: {}", side.as_str(), path_buf.display());
                session.set_side_image(side, ImageSource::File(path_buf.clone()));
            }
            None => warn!(
                "Every side already has artwork, ignoring {}",
                path_buf.display()
            ),
        }
    }
}
