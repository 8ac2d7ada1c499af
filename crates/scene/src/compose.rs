use catalog::RegionCatalog;
use foundation::math::{Vec3, project};
use tracing::{debug, warn};

use crate::arc::{ArcGeometry, ArcParams, build_arc};
use crate::camera::{CameraController, CameraPose, FlyOptions, TweenHandle};
use crate::config::SceneConfig;
use crate::director::SceneState;
use crate::markers::{RegionMarker, layout_markers};

/// A camera flight started while composing a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFlight {
    pub target: String,
    pub handle: TweenHandle,
    pub destination: Vec3,
}

/// Render inputs derived from one [`SceneState`] value.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub arc: Option<ArcGeometry>,
    pub markers: Vec<RegionMarker>,
    pub camera_flight: Option<CameraFlight>,
}

/// Turns director state into geometry and camera motion.
///
/// Holds the camera and the last state it composed. A state equal to the previous one
/// produces nothing, and the camera is only sent flying when the fly target changes.
#[derive(Debug, Clone)]
pub struct SceneComposer {
    config: SceneConfig,
    camera: CameraController,
    last: Option<SceneState>,
}

impl SceneComposer {
    pub fn new(config: SceneConfig) -> Self {
        let camera = CameraController::new(config.initial_camera_position);
        Self {
            config,
            camera,
            last: None,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn fly_options(&self) -> FlyOptions {
        FlyOptions {
            duration_s: self.config.fly_duration_s,
            easing: self.config.fly_easing,
            offset: self.config.fly_offset,
        }
    }

    fn arc_params(&self) -> ArcParams {
        ArcParams::new(self.config.globe_radius, self.config.arc_height_scale)
            .with_segments(self.config.arc_segments)
    }

    /// Composes `state` if it differs from the previously composed state.
    pub fn compose(&mut self, catalog: &RegionCatalog, state: &SceneState) -> Option<SceneFrame> {
        if self.last.as_ref() == Some(state) {
            return None;
        }
        let previous_target = self.last.as_ref().and_then(|s| s.fly_target.clone());

        let arc = state.comparison_pair.as_ref().and_then(|pair| {
            match (catalog.get(&pair.first), catalog.get(&pair.second)) {
                (Some(a), Some(b)) => Some(build_arc(a, b, self.arc_params())),
                _ => {
                    warn!(first = %pair.first, second = %pair.second, "arc endpoint not in catalog");
                    None
                }
            }
        });

        let camera_flight = match &state.fly_target {
            Some(code) if previous_target.as_ref() != Some(code) => self.start_flight(catalog, code),
            _ => None,
        };

        let frame = SceneFrame {
            arc,
            markers: layout_markers(catalog, state, &self.config),
            camera_flight,
        };
        self.last = Some(state.clone());
        Some(frame)
    }

    fn start_flight(&mut self, catalog: &RegionCatalog, code: &str) -> Option<CameraFlight> {
        let Some(region) = catalog.get(code) else {
            warn!(%code, "fly target not in catalog");
            return None;
        };
        let target = project(region.lat, region.lng, self.config.camera_orbit_radius);
        let handle = self.camera.fly_to(target, self.fly_options());
        let destination = target + self.config.fly_offset;
        debug!(%code, ?destination, "camera flight started");
        Some(CameraFlight {
            target: code.to_string(),
            handle,
            destination,
        })
    }

    /// Advances the camera by one frame.
    pub fn tick(&mut self, dt_s: f64) -> CameraPose {
        self.camera.advance(dt_s)
    }

    pub fn tick_frame(&mut self, frame: runtime::Frame) -> CameraPose {
        self.camera.advance_frame(frame)
    }
}

impl Default for SceneComposer {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::director::SceneDirector;
    use intent::{Action, RegionSet, ReplicationMode};
    use runtime::FrameClock;

    fn catalog() -> RegionCatalog {
        RegionCatalog::bundled().unwrap()
    }

    fn fly(code: &str) -> Action {
        Action::CameraFly {
            target: code.into(),
            reason: String::new(),
        }
    }

    #[test]
    fn unchanged_state_is_not_recomposed() {
        let catalog = catalog();
        let mut composer = SceneComposer::default();
        let state = SceneState::default();
        assert!(composer.compose(&catalog, &state).is_some());
        assert!(composer.compose(&catalog, &state).is_none());
    }

    #[test]
    fn comparison_pair_produces_an_arc() {
        let catalog = catalog();
        let mut director = SceneDirector::new();
        let mut composer = SceneComposer::default();
        director.apply(&Action::CompareRegions {
            regions: RegionSet::new(["ap-northeast-1", "ap-northeast-2", "ap-southeast-1"]).unwrap(),
            mode: ReplicationMode::ActivePassive,
            reason: String::new(),
        });

        let frame = composer.compose(&catalog, director.state()).unwrap();
        let arc = frame.arc.unwrap();
        assert_eq!(arc.from, "ap-northeast-1");
        assert_eq!(arc.to, "ap-northeast-2");
        assert_eq!(arc.points.len(), 51);
        assert!(frame.camera_flight.is_none());
        assert_eq!(frame.markers.iter().filter(|m| m.highlighted).count(), 3);
    }

    #[test]
    fn fly_target_starts_a_flight_once() {
        let catalog = catalog();
        let mut director = SceneDirector::new();
        let mut composer = SceneComposer::default();

        director.apply(&fly("eu-west-1"));
        let frame = composer.compose(&catalog, director.state()).unwrap();
        let flight = frame.camera_flight.unwrap();
        let region = catalog.get("eu-west-1").unwrap();
        let expected = project(region.lat, region.lng, 130.0) + Vec3::new(0.0, 0.0, 40.0);
        assert!(flight.destination.distance(expected) < 1e-9);
        assert!(composer.camera().is_running(flight.handle));

        // Selecting a marker changes the state but not the fly target.
        director.select_region("eu-west-1");
        let frame = composer.compose(&catalog, director.state()).unwrap();
        assert!(frame.camera_flight.is_none());
        assert!(composer.camera().is_running(flight.handle));

        let mut clock = FrameClock::default();
        while composer.camera().is_animating() {
            composer.tick_frame(clock.tick(1.0 / 30.0));
        }
        assert!(composer.camera().position().distance(expected) < 1e-9);
    }

    #[test]
    fn retargeting_supersedes_the_running_flight() {
        let catalog = catalog();
        let mut director = SceneDirector::new();
        let mut composer = SceneComposer::default();

        director.apply(&fly("eu-west-1"));
        let first = composer
            .compose(&catalog, director.state())
            .and_then(|f| f.camera_flight)
            .unwrap();
        composer.tick(0.5);

        director.apply(&fly("ap-southeast-2"));
        let second = composer
            .compose(&catalog, director.state())
            .and_then(|f| f.camera_flight)
            .unwrap();
        assert!(!composer.camera().is_running(first.handle));
        assert!(composer.camera().is_running(second.handle));
        assert_eq!(composer.camera().destination(), Some(second.destination));
    }

    #[test]
    fn error_clears_arc_and_highlights() {
        let catalog = catalog();
        let mut director = SceneDirector::new();
        let mut composer = SceneComposer::default();
        director.apply(&Action::ProvisionArchitecture {
            regions: RegionSet::new(["us-east-1", "eu-central-1"]).unwrap(),
            architecture: Vec::new(),
            reason: String::new(),
        });
        assert!(composer.compose(&catalog, director.state()).unwrap().arc.is_some());

        director.apply(&Action::error("no"));
        let frame = composer.compose(&catalog, director.state()).unwrap();
        assert!(frame.arc.is_none());
        assert!(frame.markers.iter().all(|m| !m.highlighted));
    }
}
