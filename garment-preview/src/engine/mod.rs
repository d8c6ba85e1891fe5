//! Bevy side of the customizer: garment scene, camera, compose pipeline and
//! app wiring.

pub mod assets;
pub mod camera;
pub mod compositing;
pub mod core;
pub mod garment;
pub mod loading;
pub mod systems;
