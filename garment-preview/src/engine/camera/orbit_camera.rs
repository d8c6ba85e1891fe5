use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use constants::render_settings::{
    CAMERA_FOV_DEGREES, DEFAULT_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE, MAX_CAMERA_PITCH,
    MIN_CAMERA_DISTANCE, ORBIT_SENSITIVITY, ZOOM_LINE_STEP, ZOOM_PIXEL_STEP,
};

#[derive(Component)]
pub struct PreviewCamera;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::new(0.0, 0.1, 0.0),
            distance: DEFAULT_CAMERA_DISTANCE,
            yaw: 0.0,
            pitch: -0.15,
        }
    }
}

impl OrbitCamera {
    /// Rotate by a mouse delta in pixels. Pitch stays clear of the poles.
    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ORBIT_SENSITIVITY;
        self.pitch = (self.pitch - delta.y * ORBIT_SENSITIVITY).clamp(-MAX_CAMERA_PITCH, MAX_CAMERA_PITCH);
    }

    /// Move towards the focus by `amount` (negative moves away).
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance - amount).clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE);
    }

    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        let position = self.focus + rotation * Vec3::Z * self.distance;
        Transform::from_translation(position).looking_at(self.focus, Vec3::Y)
    }
}

pub fn spawn_preview_camera(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            ..default()
        }),
        orbit.transform(),
        PreviewCamera,
    ));
    commands.insert_resource(orbit);
}

/// Left-drag orbits, wheel zooms. Other buttons are ignored.
pub fn camera_controller(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut mouse_wheel: EventReader<MouseWheel>,
    mut orbit: ResMut<OrbitCamera>,
    mut query: Query<&mut Transform, With<PreviewCamera>>,
) {
    let dragging = mouse_button.pressed(MouseButton::Left);
    let drag: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();
    if dragging && drag != Vec2::ZERO {
        orbit.orbit(drag);
    }

    for wheel in mouse_wheel.read() {
        let step = match wheel.unit {
            MouseScrollUnit::Line => ZOOM_LINE_STEP,
            MouseScrollUnit::Pixel => ZOOM_PIXEL_STEP,
        };
        orbit.zoom(wheel.y * step);
    }

    if !orbit.is_changed() {
        return;
    }
    let Ok(mut transform) = query.single_mut() else {
        return;
    };
    *transform = orbit.transform();
}
