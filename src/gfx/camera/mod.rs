pub mod camera_rig;
pub mod camera_utils;
pub mod orbit_controls;
pub mod perspective;

// Re-export main types
pub use camera_rig::{apply_scroll_override, scroll_position, CameraRig};
pub use camera_utils::CameraUniform;
pub use orbit_controls::OrbitControls;
pub use perspective::PerspectiveCamera;
