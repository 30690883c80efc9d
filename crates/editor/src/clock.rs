//! Time source for animations, click timing and creation stamps.

/// Milliseconds since the Unix epoch
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by `SystemTime`. Not available on wasm32; the browser
/// binding supplies its own clock there.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}
