//! Raised connection arcs between two sites on the globe.
//!
//! The path is a lofted chord, not a geodesic: both endpoints are projected onto the
//! sphere, the straight segment between them is sampled, and every sample is pushed back
//! out radially to `base_radius + sin(t * PI) * height_scale`. For short and medium
//! distances this is visually indistinguishable from a great-circle arc; for nearly
//! antipodal endpoints the chord passes close to the centre and the loft flattens out.

use catalog::Region;
use foundation::math::{GeoPoint, Vec3};

pub const DEFAULT_ARC_SEGMENTS: usize = 50;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArcParams {
    /// Number of segments; the path has `segments + 1` points.
    pub segments: usize,
    pub base_radius: f64,
    pub height_scale: f64,
}

impl ArcParams {
    pub fn new(base_radius: f64, height_scale: f64) -> Self {
        Self {
            segments: DEFAULT_ARC_SEGMENTS,
            base_radius,
            height_scale,
        }
    }

    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }
}

/// Arc geometry for a region pair, ready for a line renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcGeometry {
    pub from: String,
    pub to: String,
    pub points: Vec<Vec3>,
}

pub fn build_arc(from: &Region, to: &Region, params: ArcParams) -> ArcGeometry {
    ArcGeometry {
        from: from.code.clone(),
        to: to.code.clone(),
        points: build_arc_points(from.geo_point(), to.geo_point(), params),
    }
}

/// Samples the lofted path from `from` to `to`.
///
/// The first and last points lie on the base sphere; every point in between sits higher,
/// peaking at the middle sample. A `segments` of 0 is treated as 1.
pub fn build_arc_points(from: GeoPoint, to: GeoPoint, params: ArcParams) -> Vec<Vec3> {
    let segments = params.segments.max(1);
    let start = from.project(params.base_radius);
    let end = to.project(params.base_radius);

    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            let height = (t * std::f64::consts::PI).sin() * params.height_scale;
            start.lerp(end, t).normalize() * (params.base_radius + height)
        })
        .collect()
}
