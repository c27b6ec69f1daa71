use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

/// Messages cycled while an outfit transformation is running
pub const IMAGE_MESSAGES: [&str; 6] = [
    "Analyzing silhouette...",
    "Selecting fabrics...",
    "Stitching details...",
    "Adjusting light...",
    "Applying filters...",
    "Almost ready...",
];

/// Messages cycled while a video is being generated
pub const VIDEO_MESSAGES: [&str; 5] = [
    "Rendering cinematic motion...",
    "Animating textures...",
    "Compositing scene...",
    "Perfecting camera movement...",
    "Finalizing fashion sequence...",
];

/// Shown before anything has run
pub const IDLE_MESSAGE: &str = "Tailoring your new look...";

/// Which message sequence to cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressKind {
    Image,
    Video,
}

impl ProgressKind {
    pub fn messages(self) -> &'static [&'static str] {
        match self {
            ProgressKind::Image => &IMAGE_MESSAGES,
            ProgressKind::Video => &VIDEO_MESSAGES,
        }
    }
}

/// Repeating message cycle; the background task is aborted when the
/// ticker is cancelled or dropped
pub struct ProgressTicker {
    kind: ProgressKind,
    task: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    /// Publish the first message now and advance every `period`
    ///
    /// Outside a tokio runtime only the first message is published.
    pub fn start(kind: ProgressKind, period: Duration, feed: Arc<watch::Sender<String>>) -> Self {
        let messages = kind.messages();
        feed.send_replace(messages[0].to_string());
        // interval_at rejects a zero period
        let period = period.max(Duration::from_millis(1));

        let task = tokio::runtime::Handle::try_current().ok().map(|runtime| {
            runtime.spawn(async move {
                let mut ticks = interval_at(Instant::now() + period, period);
                let mut index = 0;
                loop {
                    ticks.tick().await;
                    index = (index + 1) % messages.len();
                    feed.send_replace(messages[index].to_string());
                }
            })
        });

        debug!("Progress ticker started ({:?})", kind);
        Self { kind, task }
    }

    pub fn kind(&self) -> ProgressKind {
        self.kind
    }

    /// Stop cycling
    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Progress ticker cancelled ({:?})", self.kind);
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn feed() -> (Arc<watch::Sender<String>>, watch::Receiver<String>) {
        let (tx, rx) = watch::channel(IDLE_MESSAGE.to_string());
        (Arc::new(tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycles_and_wraps() {
        let (tx, rx) = feed();
        let _ticker = ProgressTicker::start(ProgressKind::Video, Duration::from_millis(3500), tx);
        assert_eq!(*rx.borrow(), VIDEO_MESSAGES[0]);

        sleep(Duration::from_millis(3600)).await;
        assert_eq!(*rx.borrow(), VIDEO_MESSAGES[1]);

        sleep(Duration::from_millis(3500 * 4)).await;
        assert_eq!(*rx.borrow(), VIDEO_MESSAGES[0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_cycling() {
        let (tx, rx) = feed();
        let ticker = ProgressTicker::start(ProgressKind::Image, Duration::from_millis(3500), tx);
        sleep(Duration::from_millis(3600)).await;
        assert_eq!(*rx.borrow(), IMAGE_MESSAGES[1]);

        ticker.cancel();
        sleep(Duration::from_secs(30)).await;
        assert_eq!(*rx.borrow(), IMAGE_MESSAGES[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_still_cycles() {
        let (tx, rx) = feed();
        let _ticker = ProgressTicker::start(ProgressKind::Image, Duration::ZERO, tx);
        sleep(Duration::from_micros(1500)).await;
        assert_eq!(*rx.borrow(), IMAGE_MESSAGES[1]);
    }

    #[test]
    fn test_without_runtime_publishes_first_message() {
        let (tx, rx) = feed();
        let ticker = ProgressTicker::start(ProgressKind::Image, Duration::from_millis(10), tx);
        assert_eq!(*rx.borrow(), IMAGE_MESSAGES[0]);
        assert_eq!(ticker.kind(), ProgressKind::Image);
    }
}
