use super::Vec3;

/// A geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lng_deg: f64,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lng_deg: f64) -> Self {
        Self { lat_deg, lng_deg }
    }

    pub fn project(self, radius: f64) -> Vec3 {
        project(self.lat_deg, self.lng_deg, radius)
    }
}

/// Projects a latitude/longitude pair onto a sphere of `radius` centred at the origin.
///
/// Scene convention (y-up):
/// - latitude 90 maps to the north pole at `(0, radius, 0)`,
/// - latitude 0, longitude 0 maps to `(radius, 0, 0)`,
/// - longitude is offset by 180 degrees and mirrored on x so that longitude increases
///   towards `-z`.
///
/// Preconditions: `lat_deg` in [-90, 90], `lng_deg` in [-180, 180], `radius > 0`.
/// Out-of-range latitude is not guarded.
pub fn project(lat_deg: f64, lng_deg: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (lng_deg + 180.0).to_radians();
    let sin_phi = phi.sin();

    Vec3::new(
        -(radius * sin_phi * theta.cos()),
        radius * phi.cos(),
        radius * sin_phi * theta.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::{GeoPoint, project};
    use crate::math::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        assert_close(a.x, b.x, eps);
        assert_close(a.y, b.y, eps);
        assert_close(a.z, b.z, eps);
    }

    #[test]
    fn equator_prime_meridian() {
        assert_vec_close(project(0.0, 0.0, 50.0), Vec3::new(50.0, 0.0, 0.0), 1e-9);
    }

    #[test]
    fn equator_90e_points_down_negative_z() {
        assert_vec_close(project(0.0, 90.0, 50.0), Vec3::new(0.0, 0.0, -50.0), 1e-9);
    }

    #[test]
    fn north_pole_is_y_up_for_any_longitude() {
        let expected = Vec3::new(0.0, 10.0, 0.0);
        for lng in [-180.0, -97.5, 0.0, 45.0, 180.0] {
            assert_vec_close(project(90.0, lng, 10.0), expected, 1e-9);
        }
    }

    #[test]
    fn distance_from_origin_equals_radius() {
        for radius in [0.5, 50.0, 130.0] {
            let mut lat = -90.0;
            while lat <= 90.0 {
                let mut lng = -180.0;
                while lng <= 180.0 {
                    let p = project(lat, lng, radius);
                    assert_close(p.length(), radius, 1e-9 * radius.max(1.0));
                    lng += 22.5;
                }
                lat += 15.0;
            }
        }
    }

    #[test]
    fn antimeridian_is_continuous() {
        assert_vec_close(project(12.0, 180.0, 50.0), project(12.0, -180.0, 50.0), 1e-9);
    }

    #[test]
    fn geo_point_projects_like_free_function() {
        let p = GeoPoint::new(53.3498, -6.2603);
        assert_eq!(p.project(50.0), project(53.3498, -6.2603, 50.0));
    }
}
