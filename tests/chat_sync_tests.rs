//! Integration tests for the chat synchronisation loop
//!
//! Drives the fetch cycle and send path against an in-memory server

use async_trait::async_trait;
use companion::chat::{
    ChatError, ChatResult, ChatSurface, ChatTransport, ChatViewModel, PollState, Poller,
    RenderOp, ScrollMetrics, fetch_cycle, submit,
};
use companion::types::{Message, OutgoingMessage, SendResponse};
use companion::views::chat::{ChatEntry, ChatList};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn offline() -> ChatError {
    ChatError::Status {
        status: 503,
        body: "offline".into(),
    }
}

fn message(id: u64, content: &str, is_user: bool) -> Message {
    Message {
        id: Some(id),
        user: Some(if is_user { "leo" } else { "ana" }.into()),
        content: Some(content.into()),
        image_url: None,
        timestamp: Some("2026-10-14T09:00:00+00:00".into()),
        is_user,
    }
}

/// Server stand-in: queued fetch results, falling back to the last
/// conversation state once the queue runs dry.
#[derive(Default)]
struct FakeServer {
    fetches: RefCell<VecDeque<ChatResult<Vec<Message>>>>,
    state: RefCell<Vec<Message>>,
    send_results: RefCell<VecDeque<ChatResult<SendResponse>>>,
    fetch_calls: Cell<usize>,
    sent: RefCell<Vec<OutgoingMessage>>,
}

impl FakeServer {
    fn with_state(messages: Vec<Message>) -> Self {
        let server = Self::default();
        *server.state.borrow_mut() = messages;
        server
    }

    fn queue_fetch(&self, result: ChatResult<Vec<Message>>) {
        self.fetches.borrow_mut().push_back(result);
    }

    fn queue_send(&self, result: ChatResult<SendResponse>) {
        self.send_results.borrow_mut().push_back(result);
    }
}

#[async_trait(?Send)]
impl ChatTransport for FakeServer {
    async fn fetch_messages(&self) -> ChatResult<Vec<Message>> {
        self.fetch_calls.set(self.fetch_calls.get() + 1);
        match self.fetches.borrow_mut().pop_front() {
            Some(result) => result,
            None => Ok(self.state.borrow().clone()),
        }
    }

    async fn send_message(&self, draft: &OutgoingMessage) -> ChatResult<SendResponse> {
        self.sent.borrow_mut().push(draft.clone());
        self.send_results.borrow_mut().pop_front().unwrap_or_else(|| {
            Ok(SendResponse {
                status: "ok".into(),
            })
        })
    }
}

/// Renderer stand-in that keeps the same list the real view keeps.
struct RecordingSurface {
    model: ChatViewModel,
    list: ChatList,
    metrics: Option<ScrollMetrics>,
    render_calls: usize,
    scrolls: usize,
    composer_cleared: usize,
}

impl RecordingSurface {
    fn new() -> Self {
        Self {
            model: ChatViewModel::new(Some("leo".into())),
            list: ChatList::default(),
            metrics: None,
            render_calls: 0,
            scrolls: 0,
            composer_cleared: 0,
        }
    }

    fn scrolled_up() -> Self {
        Self {
            metrics: Some(ScrollMetrics {
                offset: 0.0,
                viewport: 300.0,
                content: 2000.0,
            }),
            ..Self::new()
        }
    }

    fn message_keys(&self) -> Vec<String> {
        self.list
            .entries()
            .iter()
            .filter_map(|entry| match entry {
                ChatEntry::Message(view) => Some(view.key.clone()),
                ChatEntry::DateHeader { .. } => None,
            })
            .collect()
    }

    fn bubbles(&self) -> Vec<(String, bool)> {
        self.list
            .entries()
            .iter()
            .filter_map(|entry| match entry {
                ChatEntry::Message(view) => {
                    Some((view.text.clone().unwrap_or_default(), view.optimistic))
                }
                ChatEntry::DateHeader { .. } => None,
            })
            .collect()
    }
}

#[async_trait(?Send)]
impl ChatSurface for RecordingSurface {
    fn with_model<R>(&mut self, f: impl FnOnce(&mut ChatViewModel) -> R) -> R {
        f(&mut self.model)
    }

    async fn scroll_metrics(&self) -> Option<ScrollMetrics> {
        self.metrics
    }

    fn render(&mut self, ops: Vec<RenderOp>) {
        self.render_calls += 1;
        if self.list.apply(ops) {
            self.scrolls += 1;
        }
    }

    fn clear_composer(&mut self) {
        self.composer_cleared += 1;
    }
}

/// Handle onto one [`RecordingSurface`] so overlapping cycles can share it.
/// The first scroll measurement is slow, like a script round-trip.
#[derive(Clone)]
struct SharedSurface {
    inner: Rc<RefCell<RecordingSurface>>,
    measurements: Rc<Cell<usize>>,
}

impl SharedSurface {
    fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RecordingSurface::new())),
            measurements: Rc::new(Cell::new(0)),
        }
    }

    fn message_keys(&self) -> Vec<String> {
        self.inner.borrow().message_keys()
    }
}

#[async_trait(?Send)]
impl ChatSurface for SharedSurface {
    fn with_model<R>(&mut self, f: impl FnOnce(&mut ChatViewModel) -> R) -> R {
        f(&mut self.inner.borrow_mut().model)
    }

    async fn scroll_metrics(&self) -> Option<ScrollMetrics> {
        let call = self.measurements.get();
        self.measurements.set(call + 1);
        if call == 0 {
            for _ in 0..5 {
                tokio::task::yield_now().await;
            }
        }
        self.inner.borrow().metrics
    }

    fn render(&mut self, ops: Vec<RenderOp>) {
        self.inner.borrow_mut().render(ops);
    }

    fn clear_composer(&mut self) {
        self.inner.borrow_mut().clear_composer();
    }
}

mod fetch_tests {
    use super::*;

    #[tokio::test]
    async fn empty_conversation_touches_nothing() {
        init_logging();
        let server = FakeServer::with_state(Vec::new());
        let mut surface = RecordingSurface::new();

        assert_eq!(fetch_cycle(&server, &mut surface).await, 0);
        assert_eq!(surface.render_calls, 0);
        assert_eq!(surface.scrolls, 0);
        assert!(surface.list.entries().is_empty());
    }

    #[tokio::test]
    async fn first_load_renders_all_and_scrolls() {
        let server = FakeServer::with_state(vec![
            message(1, "hola", false),
            message(2, "hey", true),
            message(3, "qué tal", false),
        ]);
        // Scrolled far up, yet the first content still lands at the bottom.
        let mut surface = RecordingSurface::scrolled_up();

        assert_eq!(fetch_cycle(&server, &mut surface).await, 3);
        assert_eq!(surface.model.seen_count(), 3);
        assert_eq!(surface.bubbles().len(), 3);
        assert_eq!(surface.scrolls, 1);
    }

    #[tokio::test]
    async fn refetching_same_state_is_a_no_op() {
        let server = FakeServer::with_state(vec![message(1, "a", false), message(2, "b", true)]);
        let mut surface = RecordingSurface::new();

        fetch_cycle(&server, &mut surface).await;
        let after_first = surface.list.clone();
        assert_eq!(fetch_cycle(&server, &mut surface).await, 0);

        assert_eq!(surface.list, after_first);
        assert_eq!(surface.render_calls, 1);
        assert_eq!(surface.bubbles().len(), 2);
    }

    #[tokio::test]
    async fn seen_ids_accumulate_across_fetches() {
        let server = FakeServer::default();
        server.queue_fetch(Ok(vec![message(1, "a", false), message(2, "b", false)]));
        server.queue_fetch(Ok(vec![message(2, "b", false), message(3, "c", true)]));
        // Server trimmed its window; nothing is forgotten client-side.
        server.queue_fetch(Ok(vec![message(3, "c", true)]));
        let mut surface = RecordingSurface::new();

        for _ in 0..3 {
            fetch_cycle(&server, &mut surface).await;
        }
        assert_eq!(surface.model.seen_count(), 3);
        assert!((1..=3).all(|id| surface.model.has_seen(id)));
        assert_eq!(surface.bubbles().len(), 3);
    }

    #[tokio::test]
    async fn reader_scrolled_up_is_not_interrupted() {
        let server = FakeServer::default();
        server.queue_fetch(Ok(vec![message(1, "a", false)]));
        server.queue_fetch(Ok(vec![message(1, "a", false), message(2, "b", false)]));
        let mut surface = RecordingSurface::scrolled_up();

        fetch_cycle(&server, &mut surface).await;
        assert_eq!(surface.scrolls, 1);
        fetch_cycle(&server, &mut surface).await;
        assert_eq!(surface.scrolls, 1);
        assert_eq!(surface.bubbles().len(), 2);
    }

    #[tokio::test]
    async fn follower_near_bottom_keeps_following() {
        let server = FakeServer::default();
        server.queue_fetch(Ok(vec![message(1, "a", false)]));
        server.queue_fetch(Ok(vec![message(1, "a", false), message(2, "b", false)]));
        let mut surface = RecordingSurface::new();
        surface.metrics = Some(ScrollMetrics {
            offset: 1650.0,
            viewport: 300.0,
            content: 2000.0,
        });

        fetch_cycle(&server, &mut surface).await;
        fetch_cycle(&server, &mut surface).await;
        assert_eq!(surface.scrolls, 2);
    }

    #[tokio::test]
    async fn transport_failure_is_swallowed() {
        init_logging();
        let server = FakeServer::default();
        server.queue_fetch(Err(offline()));
        let mut surface = RecordingSurface::new();

        assert_eq!(fetch_cycle(&server, &mut surface).await, 0);
        assert_eq!(surface.render_calls, 0);
    }
}

mod send_tests {
    use super::*;

    #[tokio::test]
    async fn empty_draft_does_nothing() {
        let server = FakeServer::default();
        let mut surface = RecordingSurface::new();

        let sent = submit(&server, &mut surface, OutgoingMessage::new("  ", None)).await;
        assert!(!sent);
        assert_eq!(surface.render_calls, 0);
        assert_eq!(surface.composer_cleared, 0);
        assert!(server.sent.borrow().is_empty());
        assert_eq!(server.fetch_calls.get(), 0);
    }

    #[tokio::test]
    async fn successful_send_replaces_bubble_with_persisted_message() {
        let server = FakeServer::with_state(vec![message(10, "hi", true)]);
        let mut surface = RecordingSurface::new();

        assert!(submit(&server, &mut surface, OutgoingMessage::new("hi", None)).await);
        assert_eq!(server.sent.borrow().len(), 1);
        assert_eq!(server.fetch_calls.get(), 1);
        assert_eq!(surface.bubbles(), [("hi".to_string(), false)]);
        assert_eq!(surface.model.optimistic_count(), 0);
    }

    #[tokio::test]
    async fn offline_send_then_recovery() {
        init_logging();
        let server = FakeServer::default();
        server.queue_send(Err(offline()));
        server.queue_fetch(Err(offline()));
        let mut surface = RecordingSurface::new();

        assert!(submit(&server, &mut surface, OutgoingMessage::new("hi", None)).await);
        assert_eq!(surface.composer_cleared, 1);
        assert_eq!(surface.bubbles(), [("hi".to_string(), true)]);
        assert_eq!(server.fetch_calls.get(), 1);

        // Connection is back and the message was persisted after all.
        *server.state.borrow_mut() = vec![message(11, "hi", true)];
        assert_eq!(fetch_cycle(&server, &mut surface).await, 1);
        assert_eq!(surface.bubbles(), [("hi".to_string(), false)]);

        fetch_cycle(&server, &mut surface).await;
        assert_eq!(surface.bubbles().len(), 1);
    }

    #[tokio::test]
    async fn rejected_send_still_refetches() {
        let server = FakeServer::with_state(Vec::new());
        server.queue_send(Ok(SendResponse {
            status: "error".into(),
        }));
        let mut surface = RecordingSurface::new();

        submit(&server, &mut surface, OutgoingMessage::new("hola", None)).await;
        assert_eq!(server.fetch_calls.get(), 1);
        // Nothing new arrived, so the placeholder stays until something does.
        assert_eq!(surface.bubbles(), [("hola".to_string(), true)]);
    }

    #[tokio::test]
    async fn send_then_poll_render_once() {
        let server = FakeServer::with_state(vec![message(5, "hola", false)]);
        let mut surface = RecordingSurface::new();

        submit(&server, &mut surface, OutgoingMessage::new("x", None)).await;
        fetch_cycle(&server, &mut surface).await;
        let hola = surface
            .bubbles()
            .into_iter()
            .filter(|(text, _)| text == "hola")
            .count();
        assert_eq!(hola, 1);
    }
}

mod overlap_tests {
    use super::*;

    #[tokio::test]
    async fn overlapping_fetches_keep_server_order() {
        let server = FakeServer::default();
        server.queue_fetch(Ok(vec![message(1, "a", false)]));
        server.queue_fetch(Ok(vec![message(1, "a", false), message(2, "b", false)]));
        let surface = SharedSurface::new();
        let (mut slow, mut fast) = (surface.clone(), surface.clone());

        let (first, second) = tokio::join!(
            fetch_cycle(&server, &mut slow),
            fetch_cycle(&server, &mut fast),
        );

        assert_eq!(first + second, 2);
        assert_eq!(surface.message_keys(), ["msg-1", "msg-2"]);
        assert_eq!(surface.inner.borrow().model.seen_count(), 2);
    }

    #[tokio::test]
    async fn send_racing_poll_renders_each_id_once() {
        let server =
            FakeServer::with_state(vec![message(1, "hola", false), message(2, "x", true)]);
        let surface = SharedSurface::new();
        let (mut sender, mut poller) = (surface.clone(), surface.clone());

        let (sent, _) = tokio::join!(
            submit(&server, &mut sender, OutgoingMessage::new("x", None)),
            fetch_cycle(&server, &mut poller),
        );

        assert!(sent);
        assert_eq!(server.fetch_calls.get(), 2);
        assert_eq!(surface.message_keys(), ["msg-1", "msg-2"]);
        let inner = surface.inner.borrow();
        assert_eq!(inner.model.optimistic_count(), 0);
        assert_eq!(inner.model.rendered_count(), 2);
    }
}

mod poller_tests {
    use super::*;

    #[tokio::test]
    async fn first_tick_moves_to_polling() {
        let server = FakeServer::with_state(vec![message(1, "a", false)]);
        let mut surface = RecordingSurface::new();
        let mut poller = Poller::new(Duration::from_secs(3));

        assert_eq!(poller.state(), PollState::Idle);
        poller.tick(&server, &mut surface).await;
        assert_eq!(poller.state(), PollState::Polling);
        poller.tick(&server, &mut surface).await;
        assert_eq!(poller.state(), PollState::Polling);
        assert_eq!(poller.ticks(), 2);
        assert_eq!(surface.bubbles().len(), 1);
    }

    #[tokio::test]
    async fn run_fetches_then_waits_each_interval() {
        let server = FakeServer::with_state(vec![message(1, "a", false)]);
        let mut surface = RecordingSurface::new();
        let waits = Cell::new(Vec::new());

        let run = Poller::new(Duration::from_millis(2500)).run(&server, &mut surface, |interval| {
            let mut seen = waits.take();
            seen.push(interval);
            waits.set(seen);
            tokio::task::yield_now()
        });
        let _ = tokio::time::timeout(Duration::from_millis(50), run).await;

        let waits = waits.take();
        assert!(waits.len() >= 2);
        assert!(waits.iter().all(|d| *d == Duration::from_millis(2500)));
        assert!(server.fetch_calls.get() >= waits.len());
        assert_eq!(surface.bubbles().len(), 1);
    }
}
