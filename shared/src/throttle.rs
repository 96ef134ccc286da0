/// Gates per-frame callbacks down to a fixed minimum interval.
///
/// The first tick only records a start time. After that a tick is let through
/// once at least `interval_ms` has passed since the last accepted tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameThrottle {
    interval_ms: f64,
    start: Option<f64>,
}

impl FrameThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            start: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn ready(&mut self, tick_ms: f64) -> bool {
        let Some(start) = self.start else {
            self.start = Some(tick_ms);
            return false;
        };

        if tick_ms - start < self.interval_ms {
            return false;
        }

        self.start = Some(tick_ms);
        true
    }
}
