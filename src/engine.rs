//! The feed aggregation engine.
//!
//! [`Engine`] owns the [`StateStore`] and is the only thing that mutates it.
//! Network work never touches state directly: submissions and polling cycles
//! run as spawned tasks that report back over a channel, and
//! [`Engine::step`] applies each report on the engine owner's task.  With a
//! current-thread runtime this gives the single-threaded, interleaved model
//! the UI relies on: no locks, but reports arrive in completion order, not
//! in the order the requests were made.
//!
//! ## Submitting a feed
//!
//! ```text
//! add_feed ─► Processing ─ validate ─┬─ ok ──► Sending ─ load ─┬─ ok ──► Ready
//!                                    └─ err ─► Error           └─ err ─► Error
//! ```
//!
//! ## Polling
//!
//! [`Engine::poll_all`] reloads every subscribed feed and merges any new
//! posts.  Failures are logged and otherwise ignored: they never touch the
//! add-feed status or the feedback message, and never stop the schedule.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{Feedback, LoadError, UnknownPost};
use crate::poll::{poll_cycle, PollScheduler};
use crate::source::{FeedFetcher, FeedLoader, FeedParser, ParsedFeed, ParsedPost, Post};
use crate::state::{AddFeedStatus, AppState, Change, StateStore};
use crate::validate::validate;

/// Reports sent from load and poll tasks back to the engine.
#[derive(Debug)]
enum EngineEvent {
    /// A submitted feed finished loading.
    Loaded {
        url: String,
        outcome: Result<ParsedFeed, LoadError>,
    },
    /// One feed of a polling cycle settled.
    Polled {
        url: String,
        outcome: Result<ParsedFeed, LoadError>,
    },
    /// Every feed of the current polling cycle has settled.
    CycleSettled,
}

/// What woke [`Engine::step`].
enum Wake {
    Event(EngineEvent),
    PollDue,
}

pub struct Engine {
    store: StateStore,
    loader: FeedLoader,
    scheduler: PollScheduler,
    tx: mpsc::UnboundedSender<EngineEvent>,
    rx: mpsc::UnboundedReceiver<EngineEvent>,
    /// Submissions and polling cycles whose reports are still outstanding.
    in_flight: usize,
    cycle_in_flight: bool,
    /// Consecutive poll failures per feed URL, for logging.
    poll_failures: HashMap<String, u32>,
}

impl Engine {
    pub fn new(
        fetcher: Arc<dyn FeedFetcher>,
        parser: Arc<dyn FeedParser>,
        poll_interval: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            store: StateStore::new(),
            loader: FeedLoader::new(fetcher, parser),
            scheduler: PollScheduler::new(poll_interval),
            tx,
            rx,
            in_flight: 0,
            cycle_in_flight: false,
            poll_failures: HashMap::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    /// Register an observer for every state change.
    pub fn subscribe(&mut self, observer: impl FnMut(&Change<'_>) + 'static) {
        self.store.subscribe(observer);
    }

    /// Schedule the first polling cycle one interval from now.
    pub fn start_polling(&mut self) {
        info!(
            interval_ms = self.scheduler.interval().as_millis() as u64,
            "polling started"
        );
        self.scheduler.schedule();
    }

    /// Cancel the pending polling cycle.  A cycle already in flight still
    /// completes, and reschedules when it settles.
    pub fn stop_polling(&mut self) {
        self.scheduler.cancel();
    }

    /// Whether no submission or polling cycle is outstanding.
    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    // -- operations ----------------------------------------------------------

    /// Submit `url` for subscription.
    ///
    /// Validation runs immediately; on success the feed is loaded in the
    /// background and the result is applied by a later [`step`](Self::step).
    /// Ignored while a previous submission is still being sent.
    pub fn add_feed(&mut self, url: &str) {
        if self.store.state().add_feed_status == AddFeedStatus::Sending {
            debug!(%url, "submission ignored while another is in flight");
            return;
        }
        self.store.set_status(AddFeedStatus::Processing);

        let existing = self.store.feed_urls();
        if let Err(errors) = validate(url, &existing) {
            info!(%url, ?errors, "feed URL rejected");
            if let Some(&first) = errors.first() {
                self.store.set_feedback(Some(Feedback::Invalid(first)));
            }
            self.store.set_status(AddFeedStatus::Error);
            return;
        }

        self.store.set_feedback(Some(Feedback::Loading));
        self.store.set_status(AddFeedStatus::Sending);
        debug!(%url, "loading new feed");

        self.in_flight += 1;
        let loader = self.loader.clone();
        let tx = self.tx.clone();
        let url = url.to_string();
        tokio::spawn(async move {
            let outcome = loader.load(&url).await;
            // The receiver lives as long as the engine; if it is gone there
            // is nobody left to tell.
            let _ = tx.send(EngineEvent::Loaded { url, outcome });
        });
    }

    /// Start a polling cycle over every subscribed feed now.
    ///
    /// Cancels a pending scheduled cycle.  Does nothing while a cycle is
    /// already in flight; that cycle schedules the next one when it settles.
    pub fn poll_all(&mut self) {
        if self.cycle_in_flight {
            debug!("polling cycle already in flight");
            return;
        }
        self.scheduler.cancel();

        let urls = self.store.feed_urls();
        debug!(feeds = urls.len(), "polling cycle started");
        if urls.is_empty() {
            self.scheduler.schedule();
            return;
        }

        self.in_flight += 1;
        self.cycle_in_flight = true;
        let loader = self.loader.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            poll_cycle(urls, loader, |url, outcome| {
                let _ = tx.send(EngineEvent::Polled { url, outcome });
            })
            .await;
            let _ = tx.send(EngineEvent::CycleSettled);
        });
    }

    /// Append the posts in `incoming` whose guid is not yet known, tagged
    /// with `feed_url` and unseen, in the order given.  Returns how many were
    /// added.
    pub fn merge_posts(&mut self, feed_url: &str, incoming: Vec<ParsedPost>) -> usize {
        let mut batch = HashSet::new();
        let fresh: Vec<Post> = incoming
            .into_iter()
            .filter(|p| !self.store.contains_post(&p.guid) && batch.insert(p.guid.clone()))
            .map(|p| p.into_post(feed_url))
            .collect();

        let added = fresh.len();
        self.store.extend_posts(fresh);
        added
    }

    /// Mark the post with `guid` as seen.  Idempotent.
    pub fn mark_seen(&mut self, guid: &str) -> Result<(), UnknownPost> {
        let index = self
            .store
            .post_index(guid)
            .ok_or_else(|| UnknownPost(guid.to_string()))?;
        self.store.set_seen(index);
        Ok(())
    }

    /// Show the post with `guid` in the detail view and mark it seen.
    pub fn open_post(&mut self, guid: &str) -> Result<(), UnknownPost> {
        if !self.store.contains_post(guid) {
            return Err(UnknownPost(guid.to_string()));
        }
        self.store.set_current_guid(Some(guid.to_string()));
        self.mark_seen(guid)
    }

    /// Close the detail view.
    pub fn close_post(&mut self) {
        self.store.set_current_guid(None);
    }

    // -- driving -------------------------------------------------------------

    /// Wait for the next report or for the scheduled polling cycle, and act
    /// on it.  Cancel-safe, so it can sit in a `select!` next to UI input.
    pub async fn step(&mut self) {
        let wake = tokio::select! {
            biased;
            Some(event) = self.rx.recv() => Wake::Event(event),
            () = self.scheduler.due() => Wake::PollDue,
        };

        match wake {
            Wake::Event(event) => self.apply(event),
            Wake::PollDue => self.poll_all(),
        }
    }

    /// Process reports until no submission or polling cycle is outstanding.
    pub async fn settle(&mut self) {
        while !self.is_idle() {
            self.step().await;
        }
    }

    fn apply(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Loaded { url, outcome } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.finish_submission(&url, outcome);
            }
            EngineEvent::Polled { url, outcome } => self.finish_poll(url, outcome),
            EngineEvent::CycleSettled => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.cycle_in_flight = false;
                self.scheduler.schedule();
                debug!("polling cycle settled");
            }
        }
    }

    fn finish_submission(&mut self, url: &str, outcome: Result<ParsedFeed, LoadError>) {
        match outcome {
            Ok(parsed) => {
                let (feed, posts) = parsed.into_feed(url);
                info!(%url, title = %feed.title, "feed added");
                self.store.push_feed(feed);
                let added = self.merge_posts(url, posts);
                debug!(%url, added, "merged posts from new feed");
                self.store.set_feedback(Some(Feedback::Success));
                self.store.set_status(AddFeedStatus::Ready);
            }
            Err(err) => {
                warn!(%url, error = %err, "failed to load feed");
                self.store.set_feedback(Some(Feedback::from(&err)));
                self.store.set_status(AddFeedStatus::Error);
            }
        }
    }

    fn finish_poll(&mut self, url: String, outcome: Result<ParsedFeed, LoadError>) {
        match outcome {
            Ok(parsed) => {
                self.poll_failures.remove(&url);
                let added = self.merge_posts(&url, parsed.posts);
                if added > 0 {
                    info!(%url, added, "new posts");
                } else {
                    debug!(%url, "no new posts");
                }
            }
            Err(err) => {
                let failures = self.poll_failures.entry(url.clone()).or_insert(0);
                *failures += 1;
                warn!(%url, consecutive = *failures, error = %err, "feed poll failed");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NetworkError, ValidationError};
    use crate::source::RssParser;
    use crate::state::{StatePath, Value};
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const A: &str = "https://a.test/rss";
    const B: &str = "https://b.test/rss";

    /// In-memory fetcher with a scripted response per URL.
    #[derive(Default)]
    struct ScriptedFetcher {
        responses: Mutex<HashMap<String, Result<String, NetworkError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn respond(&self, url: &str, response: Result<String, NetworkError>) {
            self.responses.lock().unwrap().insert(url.to_string(), response);
        }

        fn serve(&self, url: &str, guids: &[&str]) {
            self.respond(url, Ok(rss_document(guids)));
        }

        fn fail(&self, url: &str) {
            self.respond(url, Err(NetworkError("connection refused".into())));
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FeedFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<String, NetworkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(NetworkError(format!("no route to {url}"))))
        }
    }

    struct PanickingFetcher;

    #[async_trait]
    impl FeedFetcher for PanickingFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, NetworkError> {
            panic!("fetcher exploded")
        }
    }

    fn rss_document(guids: &[&str]) -> String {
        let items: String = guids
            .iter()
            .map(|g| {
                format!(
                    "<item><guid>{g}</guid><title>Post {g}</title><link>https://x.test/{g}</link></item>"
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Feed</title><link>https://x.test</link><description>About</description>{items}</channel></rss>"#
        )
    }

    fn engine_with(fetcher: Arc<ScriptedFetcher>) -> Engine {
        Engine::new(fetcher, Arc::new(RssParser::new()), Duration::from_millis(5000))
    }

    /// Engine with feed A (g1, g2) already subscribed.
    async fn engine_with_feed_a() -> (Engine, Arc<ScriptedFetcher>) {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.serve(A, &["g1", "g2"]);
        let mut engine = engine_with(Arc::clone(&fetcher));
        engine.add_feed(A);
        engine.settle().await;
        (engine, fetcher)
    }

    fn record_paths(engine: &mut Engine) -> Rc<RefCell<Vec<StatePath>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        engine.subscribe(move |change| sink.borrow_mut().push(change.path.clone()));
        log
    }

    fn guids(engine: &Engine) -> Vec<&str> {
        engine.state().posts.iter().map(|p| p.guid.as_str()).collect()
    }

    fn parsed(guid: &str) -> ParsedPost {
        ParsedPost {
            guid: guid.to_string(),
            title: guid.to_string(),
            link: String::new(),
            description: String::new(),
            published: None,
        }
    }

    // -- add_feed ------------------------------------------------------------

    #[tokio::test]
    async fn add_feed_merges_feed_and_posts() {
        let (engine, _) = engine_with_feed_a().await;
        let state = engine.state();

        assert_eq!(state.feeds.len(), 1);
        assert_eq!(state.feeds[0].url, A, "feed is tagged with the submitted URL");
        assert_eq!(state.feeds[0].title, "Feed");
        assert_eq!(guids(&engine), vec!["g1", "g2"]);
        assert!(state.posts.iter().all(|p| !p.seen && p.feed_url == A));
        assert_eq!(state.add_feed_status, AddFeedStatus::Ready);
        assert_eq!(state.feedback, Some(Feedback::Success));
    }

    #[tokio::test]
    async fn add_feed_walks_the_status_machine() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.serve(A, &["g1"]);
        let mut engine = engine_with(fetcher);
        let log = record_paths(&mut engine);

        engine.add_feed(A);
        assert_eq!(engine.state().add_feed_status, AddFeedStatus::Sending);
        assert_eq!(engine.state().feedback, Some(Feedback::Loading));
        engine.settle().await;

        assert_eq!(
            *log.borrow(),
            vec![
                StatePath::AddFeedStatus, // processing
                StatePath::Feedback,      // loading
                StatePath::AddFeedStatus, // sending
                StatePath::Feeds,
                StatePath::Posts,
                StatePath::Feedback, // success
                StatePath::AddFeedStatus, // ready
            ]
        );
    }

    #[tokio::test]
    async fn duplicate_submission_is_rejected() {
        let (mut engine, fetcher) = engine_with_feed_a().await;
        let calls_before = fetcher.calls();

        engine.add_feed(A);
        engine.settle().await;

        let state = engine.state();
        assert_eq!(state.add_feed_status, AddFeedStatus::Error);
        assert_eq!(state.feedback, Some(Feedback::Invalid(ValidationError::Duplicate)));
        assert_eq!(state.feeds.len(), 1);
        assert_eq!(state.posts.len(), 2);
        assert_eq!(fetcher.calls(), calls_before, "nothing is fetched");
    }

    #[tokio::test]
    async fn empty_submission_reports_required() {
        let mut engine = engine_with(Arc::new(ScriptedFetcher::default()));

        engine.add_feed("");

        assert_eq!(engine.state().add_feed_status, AddFeedStatus::Error);
        assert_eq!(
            engine.state().feedback,
            Some(Feedback::Invalid(ValidationError::Required))
        );
        assert!(engine.is_idle());
    }

    #[tokio::test]
    async fn network_failure_leaves_state_untouched() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.fail(A);
        let mut engine = engine_with(fetcher);

        engine.add_feed(A);
        engine.settle().await;

        assert_eq!(engine.state().add_feed_status, AddFeedStatus::Error);
        assert_eq!(engine.state().feedback, Some(Feedback::Network));
        assert!(engine.state().feeds.is_empty());
        assert!(engine.state().posts.is_empty());
    }

    #[tokio::test]
    async fn non_feed_document_reports_parse_error() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.respond(A, Ok("<html><body>hello</body></html>".into()));
        let mut engine = engine_with(fetcher);

        engine.add_feed(A);
        engine.settle().await;

        assert_eq!(engine.state().feedback, Some(Feedback::Parse));
        assert!(engine.state().feeds.is_empty());
    }

    #[tokio::test]
    async fn panicking_load_reports_unexpected() {
        let mut engine = Engine::new(
            Arc::new(PanickingFetcher),
            Arc::new(RssParser::new()),
            Duration::from_millis(5000),
        );

        engine.add_feed(A);
        engine.settle().await;

        assert_eq!(engine.state().feedback, Some(Feedback::Unexpected));
        assert_eq!(engine.state().add_feed_status, AddFeedStatus::Error);
    }

    #[tokio::test]
    async fn error_state_accepts_a_new_submission() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.serve(B, &["b1"]);
        let mut engine = engine_with(fetcher);

        engine.add_feed("not a url");
        assert_eq!(engine.state().add_feed_status, AddFeedStatus::Error);

        engine.add_feed(B);
        engine.settle().await;
        assert_eq!(engine.state().add_feed_status, AddFeedStatus::Ready);
        assert_eq!(engine.state().feeds.len(), 1);
    }

    #[tokio::test]
    async fn submission_while_sending_is_ignored() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.serve(A, &["g1"]);
        fetcher.serve(B, &["b1"]);
        let mut engine = engine_with(Arc::clone(&fetcher));

        engine.add_feed(A);
        engine.add_feed(B);
        engine.settle().await;

        assert_eq!(engine.state().feeds.len(), 1);
        assert_eq!(fetcher.calls(), 1);
    }

    // -- merge_posts ---------------------------------------------------------

    #[tokio::test]
    async fn merge_is_idempotent() {
        let mut engine = engine_with(Arc::new(ScriptedFetcher::default()));
        let batch = vec![parsed("g1"), parsed("g2")];

        assert_eq!(engine.merge_posts(A, batch.clone()), 2);
        assert_eq!(engine.merge_posts(A, batch), 0);
        assert_eq!(guids(&engine), vec!["g1", "g2"]);
    }

    #[tokio::test]
    async fn merge_appends_only_unknown_guids_in_order() {
        let mut engine = engine_with(Arc::new(ScriptedFetcher::default()));
        engine.merge_posts(A, vec![parsed("g1"), parsed("g2")]);

        let added = engine.merge_posts(B, vec![parsed("g3"), parsed("g1"), parsed("g4"), parsed("g3")]);

        assert_eq!(added, 2);
        assert_eq!(guids(&engine), vec!["g1", "g2", "g3", "g4"]);
        assert_eq!(engine.state().posts[0].feed_url, A, "existing posts keep their feed");
        assert_eq!(engine.state().posts[2].feed_url, B);
    }

    #[tokio::test]
    async fn merging_nothing_new_does_not_notify() {
        let mut engine = engine_with(Arc::new(ScriptedFetcher::default()));
        engine.merge_posts(A, vec![parsed("g1")]);
        let log = record_paths(&mut engine);

        engine.merge_posts(A, vec![parsed("g1")]);

        assert!(log.borrow().is_empty());
    }

    // -- poll_all ------------------------------------------------------------

    #[tokio::test]
    async fn poll_failure_on_one_feed_does_not_block_others() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.serve(A, &["a1"]);
        fetcher.serve(B, &["b1"]);
        let mut engine = engine_with(Arc::clone(&fetcher));
        engine.add_feed(A);
        engine.settle().await;
        engine.add_feed(B);
        engine.settle().await;

        fetcher.fail(A);
        fetcher.serve(B, &["b1", "b2"]);
        let log = record_paths(&mut engine);

        engine.poll_all();
        engine.settle().await;

        assert_eq!(guids(&engine), vec!["a1", "b1", "b2"]);
        assert_eq!(engine.state().posts[2].feed_url, B);
        assert_eq!(engine.state().add_feed_status, AddFeedStatus::Ready);
        assert_eq!(engine.state().feedback, Some(Feedback::Success), "feedback untouched");
        assert_eq!(*log.borrow(), vec![StatePath::Posts]);
        assert!(engine.scheduler.is_scheduled(), "next cycle is still scheduled");
        assert_eq!(engine.poll_failures.get(A), Some(&1));
    }

    #[tokio::test]
    async fn poll_with_known_guids_adds_nothing() {
        let (mut engine, _) = engine_with_feed_a().await;

        engine.poll_all();
        engine.settle().await;

        assert_eq!(engine.state().posts.len(), 2);
    }

    #[tokio::test]
    async fn poll_failure_count_resets_on_success() {
        let (mut engine, fetcher) = engine_with_feed_a().await;

        fetcher.fail(A);
        for _ in 0..3 {
            engine.poll_all();
            engine.settle().await;
        }
        assert_eq!(engine.poll_failures.get(A), Some(&3));

        fetcher.serve(A, &["g1", "g2", "g3"]);
        engine.poll_all();
        engine.settle().await;

        assert!(engine.poll_failures.get(A).is_none());
        assert_eq!(engine.state().posts.len(), 3);
    }

    #[tokio::test]
    async fn overlapping_poll_requests_run_one_cycle() {
        let (mut engine, fetcher) = engine_with_feed_a().await;
        let calls_before = fetcher.calls();

        engine.poll_all();
        engine.poll_all();
        engine.settle().await;

        assert_eq!(fetcher.calls(), calls_before + 1);
    }

    #[tokio::test]
    async fn post_set_only_grows() {
        let (mut engine, fetcher) = engine_with_feed_a().await;
        let mut last = engine.state().posts.len();

        let scripts: [&[&str]; 4] = [&["g1"], &["g3"], &[], &["g2", "g4", "g3"]];
        for guids in scripts {
            fetcher.serve(A, guids);
            engine.poll_all();
            engine.settle().await;
            let now = engine.state().posts.len();
            assert!(now >= last, "post count went from {last} to {now}");
            last = now;
        }
        assert_eq!(last, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_cycle_fires_after_interval() {
        let (mut engine, fetcher) = engine_with_feed_a().await;
        fetcher.serve(A, &["g1", "g2", "g3"]);

        engine.start_polling();
        let started = tokio::time::Instant::now();
        engine.step().await; // the timer fires and starts a cycle
        engine.settle().await;

        assert!(started.elapsed() >= Duration::from_millis(5000));
        assert_eq!(engine.state().posts.len(), 3);
        assert!(engine.scheduler.is_scheduled());
    }

    #[tokio::test]
    async fn stop_polling_cancels_the_timer() {
        let (mut engine, _) = engine_with_feed_a().await;
        engine.start_polling();
        engine.stop_polling();
        assert!(!engine.scheduler.is_scheduled());
    }

    // -- mark_seen / open_post -----------------------------------------------

    #[tokio::test]
    async fn mark_seen_is_idempotent_and_local() {
        let (mut engine, _) = engine_with_feed_a().await;

        engine.mark_seen("g1").unwrap();
        engine.mark_seen("g1").unwrap();

        assert!(engine.state().posts[0].seen);
        assert!(!engine.state().posts[1].seen);
    }

    #[tokio::test]
    async fn mark_seen_rejects_unknown_guid() {
        let (mut engine, _) = engine_with_feed_a().await;
        assert_eq!(engine.mark_seen("nope"), Err(UnknownPost("nope".into())));
    }

    #[tokio::test]
    async fn open_post_sets_current_then_marks_seen() {
        let (mut engine, _) = engine_with_feed_a().await;
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        engine.subscribe(move |change| {
            if let Value::Guid(guid) = change.value {
                sink.borrow_mut().push(format!("current={}", guid.unwrap_or("-")));
            } else {
                sink.borrow_mut().push(change.path.to_string());
            }
        });

        engine.open_post("g2").unwrap();
        engine.close_post();

        assert_eq!(*changes.borrow(), vec!["current=g2", "posts.1.seen", "current=-"]);
        assert!(engine.state().current_guid.is_none());
        assert!(engine.state().posts[1].seen, "closing keeps the post seen");
    }
}
