use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Interval, MissedTickBehavior, interval};

/**
    Allows at most one start per period, shared by concurrent callers.

    A zero period disables pacing entirely.
*/
pub struct Pacer {
    interval: Option<Mutex<Interval>>,
}

impl Pacer {
    pub fn new(period: Duration) -> Self {
        let interval = (!period.is_zero()).then(|| {
            let mut interval = interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Mutex::new(interval)
        });
        Self { interval }
    }

    /// Wait for the next slot. The first call returns immediately.
    pub async fn wait(&self) {
        if let Some(interval) = &self.interval {
            interval.lock().await.tick().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_pacer_spaces_starts() {
        let pacer = Pacer::new(Duration::from_secs(1));
        let start = Instant::now();

        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;

        assert!(start.elapsed() >= Duration::from_secs(2));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_never_waits() {
        let pacer = Pacer::new(Duration::ZERO);
        let start = Instant::now();

        for _ in 0..10 {
            pacer.wait().await;
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
