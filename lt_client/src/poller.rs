//! Fixed-interval polling with freshness tracking.
//!
//! A [`Poller`] repeatedly reads one complete view and keeps the last one it
//! got. A failed read never clears what is held; it only records the error,
//! and the freshness rule decides whether the held view is still worth
//! showing as live.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use live_table::{Freshness, PlayerId, PlayerView, PollingConfig, SessionId, TableView, ViewKind};
use log::{debug, warn};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::api_client::{ApiClient, ClientError, ClientResult};

/// Something that can produce a complete view on demand.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    type View: Clone + Send + Sync + 'static;

    /// Which consumer class this source feeds; picks the poll interval.
    fn kind(&self) -> ViewKind;

    async fn fetch(&self) -> ClientResult<Self::View>;
}

/// The shared table screen of one session.
#[derive(Clone, Debug)]
pub struct TableSource {
    client: Arc<ApiClient>,
    session_id: SessionId,
}

impl TableSource {
    pub fn new(client: Arc<ApiClient>, session_id: SessionId) -> Self {
        Self { client, session_id }
    }
}

#[async_trait]
impl SnapshotSource for TableSource {
    type View = TableView;

    fn kind(&self) -> ViewKind {
        ViewKind::Table
    }

    async fn fetch(&self) -> ClientResult<TableView> {
        self.client.get_table(self.session_id).await
    }
}

/// One player's own view of a session.
#[derive(Clone, Debug)]
pub struct PlayerSource {
    client: Arc<ApiClient>,
    session_id: SessionId,
    player_id: PlayerId,
}

impl PlayerSource {
    pub fn new(client: Arc<ApiClient>, session_id: SessionId, player_id: PlayerId) -> Self {
        Self {
            client,
            session_id,
            player_id,
        }
    }
}

#[async_trait]
impl SnapshotSource for PlayerSource {
    type View = PlayerView;

    fn kind(&self) -> ViewKind {
        ViewKind::Player
    }

    async fn fetch(&self) -> ClientResult<PlayerView> {
        self.client
            .get_player_view(self.session_id, self.player_id)
            .await
    }
}

/// What a display should render after a poll.
#[derive(Clone, Debug)]
pub struct PollStatus<V> {
    /// The last view successfully read, if any.
    pub view: Option<V>,
    pub freshness: Freshness,
    /// Message from the most recent failed read, cleared by the next success.
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
}

impl<V> PollStatus<V> {
    pub fn is_live(&self) -> bool {
        self.freshness.is_live()
    }
}

pub struct Poller<S: SnapshotSource> {
    source: S,
    interval: Duration,
    stale_after: Duration,
    held: Option<S::View>,
    last_success: Option<Instant>,
    last_error: Option<String>,
    consecutive_failures: u32,
}

impl<S: SnapshotSource> Poller<S> {
    pub fn new(source: S, config: &PollingConfig) -> Self {
        let interval = config.interval_for(source.kind());
        Self {
            source,
            interval,
            stale_after: config.stale_after(),
            held: None,
            last_success: None,
            last_error: None,
            consecutive_failures: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Read once. On success the held view is replaced wholesale; on failure
    /// the held view is kept and the error recorded. A read that takes longer
    /// than the stale threshold is abandoned and counts as a failure.
    pub async fn poll_once(&mut self) -> PollStatus<S::View> {
        let fetched = tokio::time::timeout(self.stale_after, self.source.fetch())
            .await
            .unwrap_or(Err(ClientError::Timeout(self.stale_after)));
        match fetched {
            Ok(view) => {
                if self.consecutive_failures > 0 {
                    debug!(
                        "Poll recovered after {} failed attempt(s)",
                        self.consecutive_failures
                    );
                }
                self.held = Some(view);
                self.last_success = Some(Instant::now());
                self.last_error = None;
                self.consecutive_failures = 0;
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                warn!(
                    "Poll failed ({} in a row): {}",
                    self.consecutive_failures, e
                );
                self.last_error = Some(e.to_string());
            }
        }
        self.status(Instant::now())
    }

    /// Current status as seen at `now`.
    pub fn status(&self, now: Instant) -> PollStatus<S::View> {
        PollStatus {
            view: self.held.clone(),
            freshness: Freshness::classify(self.last_success, now, self.stale_after),
            last_error: self.last_error.clone(),
            consecutive_failures: self.consecutive_failures,
        }
    }

    /// Poll on a fixed interval, publishing every status until all receivers
    /// are gone.
    pub async fn run(mut self, updates: watch::Sender<PollStatus<S::View>>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let status = self.poll_once().await;
            if updates.send(status).is_err() {
                debug!("All poll receivers dropped, stopping poller");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a fixed script of results, one per fetch.
    struct ScriptedSource {
        script: Mutex<VecDeque<ClientResult<u32>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<ClientResult<u32>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
            }
        }
    }

    fn down() -> ClientResult<u32> {
        Err(ClientError::Decode("connection dropped".to_string()))
    }

    #[async_trait]
    impl SnapshotSource for ScriptedSource {
        type View = u32;

        fn kind(&self) -> ViewKind {
            ViewKind::Table
        }

        async fn fetch(&self) -> ClientResult<u32> {
            self.script.lock().unwrap().pop_front().unwrap_or_else(down)
        }
    }

    fn config() -> PollingConfig {
        PollingConfig {
            player_interval_ms: 10,
            table_interval_ms: 20,
            stale_after_ms: 5000,
        }
    }

    #[tokio::test]
    async fn test_unavailable_before_first_success() {
        let mut poller = Poller::new(ScriptedSource::new(vec![down()]), &config());
        assert_eq!(poller.status(Instant::now()).freshness, Freshness::Unavailable);

        let status = poller.poll_once().await;
        assert_eq!(status.freshness, Freshness::Unavailable);
        assert!(status.view.is_none());
        assert_eq!(status.consecutive_failures, 1);
        assert!(status.last_error.is_some());
    }

    #[tokio::test]
    async fn test_failure_keeps_held_view() {
        let mut poller = Poller::new(ScriptedSource::new(vec![Ok(7), down(), down()]), &config());

        let status = poller.poll_once().await;
        assert_eq!(status.view, Some(7));
        assert!(status.is_live());

        poller.poll_once().await;
        let status = poller.poll_once().await;
        assert_eq!(status.view, Some(7));
        assert_eq!(status.consecutive_failures, 2);
        // Still inside the threshold, so the held view is live.
        assert!(status.is_live());
    }

    #[tokio::test]
    async fn test_held_view_goes_stale_after_threshold() {
        let mut poller = Poller::new(ScriptedSource::new(vec![Ok(1)]), &config());
        poller.poll_once().await;

        let later = Instant::now() + Duration::from_millis(5001);
        let status = poller.status(later);
        assert_eq!(status.freshness, Freshness::Stale);
        assert_eq!(status.view, Some(1));
    }

    #[tokio::test]
    async fn test_success_replaces_view_and_clears_error() {
        let mut poller = Poller::new(ScriptedSource::new(vec![Ok(1), down(), Ok(2)]), &config());
        poller.poll_once().await;
        poller.poll_once().await;

        let status = poller.poll_once().await;
        assert_eq!(status.view, Some(2));
        assert!(status.last_error.is_none());
        assert_eq!(status.consecutive_failures, 0);
    }

    /// Accepts the request and never answers.
    struct SilentSource;

    #[async_trait]
    impl SnapshotSource for SilentSource {
        type View = u32;

        fn kind(&self) -> ViewKind {
            ViewKind::Player
        }

        async fn fetch(&self) -> ClientResult<u32> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_unanswered_read_times_out() {
        let config = PollingConfig {
            stale_after_ms: 50,
            ..config()
        };
        let mut poller = Poller::new(SilentSource, &config);

        let status = tokio::time::timeout(Duration::from_secs(5), poller.poll_once())
            .await
            .expect("poll should give up on its own");
        assert_eq!(status.freshness, Freshness::Unavailable);
        assert_eq!(status.consecutive_failures, 1);
        assert!(status.last_error.unwrap().contains("No response"));
    }

    #[test]
    fn test_interval_follows_view_kind() {
        let poller = Poller::new(ScriptedSource::new(vec![]), &config());
        assert_eq!(poller.interval(), Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_run_publishes_until_receiver_dropped() {
        let poller = Poller::new(ScriptedSource::new(vec![Ok(1), Ok(2)]), &config());
        let (tx, mut rx) = watch::channel(poller.status(Instant::now()));
        let task = tokio::spawn(poller.run(tx));

        // The channel keeps only the latest status, so intermediate ones may be skipped.
        loop {
            rx.changed().await.unwrap();
            if rx.borrow_and_update().view == Some(2) {
                break;
            }
        }

        drop(rx);
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("poller should stop once receivers are gone")
            .unwrap();
    }
}
