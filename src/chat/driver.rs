use super::transport::ChatTransport;
use super::view_model::{ChatViewModel, RenderOp, ScrollMetrics};
use crate::types::OutgoingMessage;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(2000);
pub const MAX_POLL_INTERVAL: Duration = Duration::from_millis(3000);
pub const DEFAULT_POLL_INTERVAL: Duration = MAX_POLL_INTERVAL;

/// Where the driver reads view-model state from and sends render
/// instructions to.
#[async_trait(?Send)]
pub trait ChatSurface {
    fn with_model<R>(&mut self, f: impl FnOnce(&mut ChatViewModel) -> R) -> R;

    async fn scroll_metrics(&self) -> Option<ScrollMetrics>;

    fn render(&mut self, ops: Vec<RenderOp>);

    fn clear_composer(&mut self);
}

/// Fetches the conversation once and renders whatever is new. Returns the
/// number of messages rendered; failures are logged and count as zero.
///
/// Scroll is measured before the seen set is touched. From the seen-set
/// insert to the render there is no await, so overlapping cycles cannot
/// interleave their slices of new messages.
pub async fn fetch_cycle<T, S>(transport: &T, surface: &mut S) -> usize
where
    T: ChatTransport + ?Sized,
    S: ChatSurface,
{
    let messages = match transport.fetch_messages().await {
        Ok(messages) => messages,
        Err(err) => {
            tracing::warn!("error fetching messages: {err}");
            return 0;
        }
    };

    if !surface.with_model(|model| model.has_unseen(&messages)) {
        return 0;
    }
    let metrics = surface.scroll_metrics().await;

    let (count, ops) = surface.with_model(|model| {
        let fresh = model.record_and_filter_new(messages);
        let preserve = model.should_preserve_scroll(metrics);
        (fresh.len(), model.reconcile_after_fetch(fresh, preserve))
    });
    if count == 0 {
        return 0;
    }
    tracing::debug!(count, "rendering new messages");
    surface.render(ops);
    count
}

/// Send path: optimistic bubble first, then the request, then one
/// out-of-band fetch whatever the request's outcome. Returns `false` for an
/// empty draft, which does nothing at all.
pub async fn submit<T, S>(transport: &T, surface: &mut S, draft: OutgoingMessage) -> bool
where
    T: ChatTransport + ?Sized,
    S: ChatSurface,
{
    if draft.is_empty() {
        return false;
    }

    let ops = surface.with_model(|model| model.append_optimistic(&draft));
    surface.render(ops);
    surface.clear_composer();

    match transport.send_message(&draft).await {
        Ok(response) if !response.is_ok() => {
            tracing::warn!(status = %response.status, "send was not accepted");
        }
        Ok(_) => {}
        Err(err) => tracing::warn!("error sending message: {err}"),
    }

    fetch_cycle(transport, surface).await;
    true
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PollState {
    #[default]
    Idle,
    Polling,
}

/// Timer-driven fetch loop. There is no stop state: the host drops the
/// task when the page goes away.
#[derive(Debug)]
pub struct Poller {
    state: PollState,
    interval: Duration,
    ticks: u64,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            state: PollState::Idle,
            interval: interval.clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL),
            ticks: 0,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub async fn tick<T, S>(&mut self, transport: &T, surface: &mut S) -> usize
    where
        T: ChatTransport + ?Sized,
        S: ChatSurface,
    {
        self.state = PollState::Polling;
        self.ticks += 1;
        tracing::debug!(tick = self.ticks, "polling chat");
        fetch_cycle(transport, surface).await
    }

    /// Fetches immediately, then once per interval for as long as the
    /// future is polled.
    pub async fn run<T, S, W, Fut>(mut self, transport: &T, surface: &mut S, mut wait: W)
    where
        T: ChatTransport + ?Sized,
        S: ChatSurface,
        W: FnMut(Duration) -> Fut,
        Fut: Future<Output = ()>,
    {
        loop {
            self.tick(transport, surface).await;
            wait(self.interval).await;
        }
    }
}
