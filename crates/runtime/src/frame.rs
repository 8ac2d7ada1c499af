use foundation::time::Time;

/// Deterministic frame metadata.
///
/// The render loop ticks at its own cadence; animations (camera flights) only ever
/// observe time through a `Frame`, so a recorded sequence of frames replays exactly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time since the previous frame (seconds).
    pub dt_s: f64,
    /// Engine time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    /// A fixed-step frame: engine time is derived from the index.
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}

/// Produces frames from variable wall-clock deltas.
///
/// Deltas are clamped to `max_dt_s` so a stalled tab or a slow oracle round trip does not
/// make an in-flight animation jump to its end in a single frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    index: u64,
    time: Time,
    max_dt_s: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl FrameClock {
    pub fn new(max_dt_s: f64) -> Self {
        Self {
            index: 0,
            time: Time(0.0),
            max_dt_s: max_dt_s.max(0.0),
        }
    }

    /// Advances the clock and returns the frame that starts now.
    pub fn tick(&mut self, dt_s: f64) -> Frame {
        let dt_s = dt_s.clamp(0.0, self.max_dt_s);
        let frame = Frame {
            index: self.index,
            dt_s,
            time: self.time,
        };
        self.index += 1;
        self.time = self.time.advanced_by(dt_s);
        frame
    }

    pub fn frames_elapsed(&self) -> u64 {
        self.index
    }

    pub fn now(&self) -> Time {
        self.time
    }
}
