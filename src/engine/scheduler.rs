use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// 固定间隔的等待器；等待期间可被取消。
#[derive(Clone, Copy, Debug)]
pub struct Scheduler {
    delay: Duration,
}

impl Scheduler {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 返回 `false` 表示等待被取消。
    pub async fn wait(&self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        if self.delay.is_zero() {
            return true;
        }
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.delay) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn waits_full_delay() {
        let scheduler = Scheduler::new(Duration::from_millis(25));
        let cancel = CancellationToken::new();
        let started = tokio::time::Instant::now();
        assert!(scheduler.wait(&cancel).await);
        assert!(started.elapsed() >= Duration::from_millis(25));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn cancellation_interrupts_wait() {
        let scheduler = Scheduler::new(Duration::from_secs(3600));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });
        let started = tokio::time::Instant::now();
        assert!(!scheduler.wait(&cancel).await);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn already_cancelled_returns_immediately() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(!Scheduler::new(Duration::ZERO).wait(&cancel).await);
    }
}
