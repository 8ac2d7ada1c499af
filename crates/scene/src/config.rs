use foundation::math::Vec3;

use crate::camera::Easing;

/// Scene constants shared by the director's collaborators.
///
/// Distances are in scene units; the globe is a sphere of `globe_radius` at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub globe_radius: f64,
    /// Peak height of a connection arc above the globe surface.
    pub arc_height_scale: f64,
    pub arc_segments: usize,
    /// Radius of the sphere fly targets are projected onto before the offset is applied.
    pub camera_orbit_radius: f64,
    pub fly_offset: Vec3,
    pub fly_duration_s: f64,
    pub fly_easing: Easing,
    pub initial_camera_position: Vec3,
    pub marker_radius: f64,
    pub az_marker_radius: f64,
    /// Radial gap between consecutive availability-zone markers stacked above a region.
    pub az_spacing: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            globe_radius: 50.0,
            arc_height_scale: 15.0,
            arc_segments: crate::arc::DEFAULT_ARC_SEGMENTS,
            camera_orbit_radius: 130.0,
            fly_offset: Vec3::new(0.0, 0.0, 40.0),
            fly_duration_s: 1.8,
            fly_easing: Easing::Power2InOut,
            initial_camera_position: Vec3::new(0.0, 0.0, 150.0),
            marker_radius: 1.6,
            az_marker_radius: 0.9,
            az_spacing: 1.4,
        }
    }
}
