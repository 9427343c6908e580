//! Politeness delay between fetches
//!
//! Every completed fetch is followed by a pause chosen uniformly from
//! `[0, max_delay)`, spreading requests against the remote catalog.

use rand::Rng;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    max_delay: Duration,
}

impl Throttle {
    pub fn new(max_delay: Duration) -> Self {
        Self { max_delay }
    }

    /// Picks the next delay; always zero when the maximum is zero
    pub fn next_delay(&self) -> Duration {
        let max_ms = self.max_delay.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..max_ms))
    }

    /// Sleeps for a randomly chosen delay
    pub async fn pause(&self) {
        let delay = self.next_delay();
        debug!("Sleeping for {:?}", delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
