//! Optional artificial latency so clients see realistic loading states.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    FetchAll,
    FetchOne,
    FetchRange,
    FetchRecent,
    Create,
    Update,
    Delete,
    Reset,
    Predict,
}

impl Op {
    fn delay_ms(self) -> u64 {
        match self {
            Op::FetchOne | Op::FetchRecent => 200,
            Op::FetchRange | Op::Reset => 250,
            Op::FetchAll | Op::Delete => 300,
            Op::Update => 350,
            Op::Create => 400,
            Op::Predict => 500,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Latency {
    enabled: bool,
}

impl Latency {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn duration(&self, op: Op) -> Duration {
        if self.enabled {
            Duration::from_millis(op.delay_ms())
        } else {
            Duration::ZERO
        }
    }

    pub async fn wait(&self, op: Op) {
        let delay = self.duration(op);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_latency_is_zero() {
        assert_eq!(Latency::disabled().duration(Op::Predict), Duration::ZERO);
    }

    #[test]
    fn writes_are_slower_than_single_reads() {
        let latency = Latency::new(true);
        assert!(latency.duration(Op::Create) > latency.duration(Op::FetchOne));
        assert_eq!(latency.duration(Op::Predict), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_sleeps_for_the_operation_delay() {
        let latency = Latency::new(true);
        let before = tokio::time::Instant::now();
        latency.wait(Op::Update).await;
        assert!(before.elapsed() >= Duration::from_millis(350));
    }
}
