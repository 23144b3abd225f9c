//! Frame timing that works both natively and on the web.

#[cfg(target_arch = "wasm32")]
fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

#[cfg(not(target_arch = "wasm32"))]
fn now_seconds() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Hands out the elapsed seconds since the previous tick, once per frame.
pub struct FrameClock {
    last: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: now_seconds() }
    }

    /// Seconds since the last call. Clamped to be non-negative, so a
    /// host clock hiccup can never run the animation backwards.
    pub fn tick(&mut self) -> f32 {
        let now = now_seconds();
        let dt = (now - self.last).max(0.0);
        self.last = now;
        dt as f32
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_are_non_negative_and_consume_time() {
        let mut clock = FrameClock::new();
        let a = clock.tick();
        let b = clock.tick();
        assert!(a >= 0.0);
        assert!(b >= 0.0);
        // Back-to-back ticks measure tiny intervals, not cumulative time
        assert!(b < 1.0);
    }
}
