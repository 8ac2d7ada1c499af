//! Camera flights towards points on or above the globe.
//!
//! The controller tweens the camera *position* only. Orientation is not animated: on every
//! frame the camera looks at the globe centre, so a flight can never lose sight of the
//! globe regardless of the path it takes.

use foundation::math::Vec3;
use runtime::Frame;

/// Time-remapping curve for a flight.
///
/// Names follow the GSAP convention used by web front ends, where `power2` is a cubic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    Power2In,
    Power2Out,
    #[default]
    Power2InOut,
}

impl Easing {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "none" | "linear" => Some(Easing::Linear),
            "power2.in" => Some(Easing::Power2In),
            "power2" | "power2.out" => Some(Easing::Power2Out),
            "power2.inOut" => Some(Easing::Power2InOut),
            _ => None,
        }
    }

    /// Maps linear progress in [0, 1] to eased progress in [0, 1].
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Power2In => t * t * t,
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
            Easing::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyOptions {
    pub duration_s: f64,
    pub easing: Easing,
    /// Added to the target point to get the final camera position.
    pub offset: Vec3,
}

impl Default for FlyOptions {
    fn default() -> Self {
        Self {
            duration_s: 1.8,
            easing: Easing::Power2InOut,
            offset: Vec3::new(0.0, 0.0, 40.0),
        }
    }
}

/// Identifies one flight. Only the most recent handle is ever running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TweenHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub fn forward(&self) -> Vec3 {
        (self.look_at - self.position).normalize()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    handle: TweenHandle,
    from: Vec3,
    to: Vec3,
    duration_s: f64,
    elapsed_s: f64,
    easing: Easing,
}

impl Tween {
    fn position_at(&self, elapsed_s: f64) -> Vec3 {
        let t = if self.duration_s > 0.0 {
            elapsed_s / self.duration_s
        } else {
            1.0
        };
        self.from.lerp(self.to, self.easing.apply(t))
    }

    fn is_finished(&self) -> bool {
        self.elapsed_s >= self.duration_s
    }
}

#[derive(Debug, Clone)]
pub struct CameraController {
    position: Vec3,
    active: Option<Tween>,
    next_handle: u64,
}

impl CameraController {
    pub fn new(initial_position: Vec3) -> Self {
        Self {
            position: initial_position,
            active: None,
            next_handle: 0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            look_at: Vec3::ZERO,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_running(&self, handle: TweenHandle) -> bool {
        self.active.is_some_and(|t| t.handle == handle)
    }

    /// Where the running flight will end, if any.
    pub fn destination(&self) -> Option<Vec3> {
        self.active.map(|t| t.to)
    }

    /// Starts a flight from the current position to `target + options.offset`.
    ///
    /// A flight already in progress is replaced; the new one starts from wherever the
    /// camera is now, so the motion stays continuous. A non-positive duration moves the
    /// camera immediately.
    pub fn fly_to(&mut self, target: Vec3, options: FlyOptions) -> TweenHandle {
        let handle = TweenHandle(self.next_handle);
        self.next_handle += 1;

        let to = target + options.offset;
        if options.duration_s <= 0.0 {
            self.position = to;
            self.active = None;
            return handle;
        }

        self.active = Some(Tween {
            handle,
            from: self.position,
            to,
            duration_s: options.duration_s,
            elapsed_s: 0.0,
            easing: options.easing,
        });
        handle
    }

    /// Advances the running flight by `dt_s` seconds and returns the new pose.
    pub fn advance(&mut self, dt_s: f64) -> CameraPose {
        if let Some(mut tween) = self.active {
            tween.elapsed_s += dt_s.max(0.0);
            if tween.is_finished() {
                self.position = tween.to;
                self.active = None;
            } else {
                self.position = tween.position_at(tween.elapsed_s);
                self.active = Some(tween);
            }
        }
        self.pose()
    }

    pub fn advance_frame(&mut self, frame: Frame) -> CameraPose {
        self.advance(frame.dt_s)
    }
}
