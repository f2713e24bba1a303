use std::sync::Arc;
use std::time::Duration;

use actix_web::rt::{self, task::JoinHandle, time};
use futures::lock::Mutex;
use futures::stream::{self, Stream, StreamExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;

/// Samples are drawn from `0..SAMPLE_CEILING`.
pub const SAMPLE_CEILING: u32 = 100;

/// One refresh of the HR dashboard chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "seq": 3,
    "labels": ["Point 1", "Point 2", "Point 3"],
    "values": [42, 7, 93]
}))]
pub struct SampleFrame {
    pub seq: u64,
    pub labels: Vec<String>,
    pub values: Vec<u32>,
}

impl SampleFrame {
    pub fn generate<R: Rng>(seq: u64, points: usize, rng: &mut R) -> Self {
        Self {
            seq,
            labels: (1..=points).map(|i| format!("Point {i}")).collect(),
            values: (0..points).map(|_| rng.gen_range(0..SAMPLE_CEILING)).collect(),
        }
    }
}

struct Ticking<R> {
    ticker: Option<time::Interval>,
    rng: R,
    seq: u64,
}

/// Lazy stream of frames: the first one right away, then one per `period`.
/// Nothing is scheduled until the stream is polled.
pub fn sample_frames<R>(period: Duration, points: usize, rng: R) -> impl Stream<Item = SampleFrame>
where
    R: Rng + Send + 'static,
{
    let period = period.max(Duration::from_millis(1));
    let state = Ticking {
        ticker: None,
        rng,
        seq: 0,
    };

    stream::unfold(state, move |mut state| async move {
        state
            .ticker
            .get_or_insert_with(|| time::interval(period))
            .tick()
            .await;
        let frame = SampleFrame::generate(state.seq, points, &mut state.rng);
        state.seq += 1;
        Some((frame, state))
    })
}

/// Background producer for the HR chart, started and stopped explicitly.
pub struct SampleFeed {
    period: Duration,
    points: usize,
    latest: Arc<Mutex<Option<SampleFrame>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SampleFeed {
    pub fn new(period: Duration, points: usize) -> Self {
        Self {
            period,
            points,
            latest: Arc::new(Mutex::new(None)),
            task: Mutex::new(None),
        }
    }

    /// Starts producing frames. Returns false if the feed is already running.
    pub async fn start(&self) -> bool {
        let mut task = self.task.lock().await;
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        let latest = Arc::clone(&self.latest);
        let frames = sample_frames(self.period, self.points, StdRng::from_entropy());
        *task = Some(rt::spawn(async move {
            let mut frames = Box::pin(frames);
            while let Some(frame) = frames.next().await {
                debug!(seq = frame.seq, "Sample frame produced");
                *latest.lock().await = Some(frame);
            }
        }));

        info!(period_ms = self.period.as_millis() as u64, points = self.points, "Sample feed started");
        true
    }

    /// Stops the producer and forgets the last frame. Safe to call when stopped.
    pub async fn stop(&self) {
        if let Some(handle) = self.task.lock().await.take() {
            handle.abort();
            info!("Sample feed stopped");
        }
        *self.latest.lock().await = None;
    }

    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub async fn latest(&self) -> Option<SampleFrame> {
        self.latest.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_bounded_and_labelled() {
        let mut rng = StdRng::seed_from_u64(7);
        let frame = SampleFrame::generate(0, 10, &mut rng);
        assert_eq!(frame.values.len(), 10);
        assert_eq!(frame.labels.first().map(String::as_str), Some("Point 1"));
        assert_eq!(frame.labels.last().map(String::as_str), Some("Point 10"));
        assert!(frame.values.iter().all(|v| *v < SAMPLE_CEILING));
    }

    #[test]
    fn same_seed_gives_same_frame() {
        let a = SampleFrame::generate(1, 5, &mut StdRng::seed_from_u64(42));
        let b = SampleFrame::generate(1, 5, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[actix_web::test]
    async fn stream_yields_sequenced_frames() {
        let frames: Vec<_> = sample_frames(Duration::from_millis(1), 3, StdRng::seed_from_u64(1))
            .take(3)
            .collect()
            .await;
        let seqs: Vec<u64> = frames.iter().map(|f| f.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert!(frames.iter().all(|f| f.values.len() == 3));
    }

    #[actix_web::test]
    async fn feed_can_be_stopped_and_restarted() {
        let feed = SampleFeed::new(Duration::from_millis(5), 4);
        assert!(feed.latest().await.is_none());

        assert!(feed.start().await);
        assert!(!feed.start().await);
        time::sleep(Duration::from_millis(30)).await;
        assert!(feed.is_running().await);
        assert_eq!(feed.latest().await.map(|f| f.values.len()), Some(4));

        feed.stop().await;
        assert!(!feed.is_running().await);
        assert!(feed.latest().await.is_none());

        assert!(feed.start().await);
        time::sleep(Duration::from_millis(30)).await;
        let restarted = feed.latest().await.unwrap();
        assert!(restarted.seq < 20);
        feed.stop().await;
    }
}
