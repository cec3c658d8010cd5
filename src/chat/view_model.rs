use super::dates::{date_label, now_local, parse_timestamp, time_label};
use crate::types::{Message, OutgoingMessage};
use std::collections::HashSet;
use time::OffsetDateTime;

/// Distance from the bottom, in CSS pixels, that still counts as following
/// the conversation.
pub const NEAR_BOTTOM_THRESHOLD: f64 = 100.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub offset: f64,
    pub viewport: f64,
    pub content: f64,
}

impl ScrollMetrics {
    pub fn is_near_bottom(&self) -> bool {
        self.offset + self.viewport >= self.content - NEAR_BOTTOM_THRESHOLD
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MessageView {
    pub key: String,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub time: String,
    pub mine: bool,
    pub optimistic: bool,
}

/// One mutation for the renderer to carry out.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOp {
    AppendDateHeader { label: String },
    AppendMessage(MessageView),
    RemoveOptimistic,
    ScrollToBottom,
}

/// Bookkeeping behind the chat list: which server ids are already on
/// screen, which date section is open, and how many optimistic bubbles are
/// waiting to be replaced.
#[derive(Debug, Default)]
pub struct ChatViewModel {
    current_user: Option<String>,
    seen_ids: HashSet<u64>,
    last_date_header: Option<String>,
    rendered_messages: usize,
    optimistic: usize,
    next_local_key: u64,
}

impl ChatViewModel {
    pub fn new(current_user: Option<String>) -> Self {
        Self {
            current_user,
            ..Self::default()
        }
    }

    pub fn seen_count(&self) -> usize {
        self.seen_ids.len()
    }

    pub fn has_seen(&self, id: u64) -> bool {
        self.seen_ids.contains(&id)
    }

    pub fn optimistic_count(&self) -> usize {
        self.optimistic
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered_messages
    }

    /// Whether `messages` holds anything not rendered yet. Leaves the seen
    /// set untouched.
    pub fn has_unseen(&self, messages: &[Message]) -> bool {
        messages
            .iter()
            .any(|msg| msg.id.is_none_or(|id| !self.seen_ids.contains(&id)))
    }

    /// Keeps the messages not rendered before and marks their ids as seen.
    /// Messages without an id cannot be deduplicated and always pass.
    pub fn record_and_filter_new(&mut self, messages: Vec<Message>) -> Vec<Message> {
        messages
            .into_iter()
            .filter(|msg| match msg.id {
                Some(id) => self.seen_ids.insert(id),
                None => true,
            })
            .collect()
    }

    /// Must be sampled before any new content is appended. A list that
    /// cannot be measured is treated as followed.
    pub fn should_preserve_scroll(&self, metrics: Option<ScrollMetrics>) -> bool {
        metrics.is_none_or(|metrics| metrics.is_near_bottom())
    }

    pub fn append_optimistic(&mut self, draft: &OutgoingMessage) -> Vec<RenderOp> {
        self.append_optimistic_at(draft, now_local())
    }

    pub fn append_optimistic_at(
        &mut self,
        draft: &OutgoingMessage,
        now: OffsetDateTime,
    ) -> Vec<RenderOp> {
        let mut ops = Vec::with_capacity(3);
        self.push_date_header(&mut ops, now, now);
        let key = self.local_key("optimistic");
        ops.push(RenderOp::AppendMessage(MessageView {
            key,
            text: draft.content.clone(),
            image_url: None,
            time: time_label(now),
            mine: true,
            optimistic: true,
        }));
        ops.push(RenderOp::ScrollToBottom);
        self.optimistic += 1;
        ops
    }

    pub fn reconcile_after_fetch(
        &mut self,
        new_messages: Vec<Message>,
        preserve_scroll: bool,
    ) -> Vec<RenderOp> {
        self.reconcile_after_fetch_at(new_messages, preserve_scroll, now_local())
    }

    /// Turns freshly filtered messages into render instructions. An empty
    /// batch produces no instructions at all.
    pub fn reconcile_after_fetch_at(
        &mut self,
        new_messages: Vec<Message>,
        preserve_scroll: bool,
        now: OffsetDateTime,
    ) -> Vec<RenderOp> {
        if new_messages.is_empty() {
            return Vec::new();
        }

        let was_empty = self.rendered_messages == 0;
        let mut ops = Vec::with_capacity(new_messages.len() * 2 + 2);
        if self.optimistic > 0 {
            ops.push(RenderOp::RemoveOptimistic);
            self.optimistic = 0;
        }

        for msg in new_messages {
            let sent_at = msg
                .timestamp
                .as_deref()
                .and_then(|raw| parse_timestamp(raw, now));
            if let Some(sent_at) = sent_at {
                self.push_date_header(&mut ops, sent_at, now);
            }
            let key = match msg.id {
                Some(id) => format!("msg-{id}"),
                None => self.local_key("local"),
            };
            let mine = msg.is_mine(self.current_user.as_deref());
            ops.push(RenderOp::AppendMessage(MessageView {
                key,
                text: msg.text().map(str::to_string),
                image_url: msg.image_url.filter(|url| !url.is_empty()),
                time: time_label(sent_at.unwrap_or(now)),
                mine,
                optimistic: false,
            }));
            self.rendered_messages += 1;
        }

        if preserve_scroll || was_empty {
            ops.push(RenderOp::ScrollToBottom);
        }
        ops
    }

    fn push_date_header(
        &mut self,
        ops: &mut Vec<RenderOp>,
        at: OffsetDateTime,
        now: OffsetDateTime,
    ) {
        let label = date_label(at.date(), now.date());
        if self.last_date_header.as_deref() != Some(label.as_str()) {
            self.last_date_header = Some(label.clone());
            ops.push(RenderOp::AppendDateHeader { label });
        }
    }

    fn local_key(&mut self, prefix: &str) -> String {
        self.next_local_key += 1;
        format!("{prefix}-{}", self.next_local_key)
    }
}
