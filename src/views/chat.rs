use crate::chat::{
    ChatSurface, ChatViewModel, HttpTransport, MessageView, Poller, RenderOp, ScrollMetrics,
    submit,
};
use crate::host;
use crate::types::OutgoingMessage;
use crate::views::shared::PendingImage;
use async_trait::async_trait;
use dioxus::events::Key;
use dioxus::prelude::*;
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum ChatEntry {
    DateHeader { key: String, label: String },
    Message(MessageView),
}

impl ChatEntry {
    pub fn key(&self) -> &str {
        match self {
            ChatEntry::DateHeader { key, .. } => key,
            ChatEntry::Message(view) => &view.key,
        }
    }
}

/// What is on screen, rebuilt only through [`ChatList::apply`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatList {
    entries: Vec<ChatEntry>,
    headers: usize,
}

impl ChatList {
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// Executes render instructions in order. Returns whether the list
    /// should be scrolled to the bottom afterwards.
    pub fn apply(&mut self, ops: Vec<RenderOp>) -> bool {
        let mut scroll = false;
        for op in ops {
            match op {
                RenderOp::AppendDateHeader { label } => {
                    self.headers += 1;
                    self.entries.push(ChatEntry::DateHeader {
                        key: format!("header-{}", self.headers),
                        label,
                    });
                }
                RenderOp::AppendMessage(view) => self.entries.push(ChatEntry::Message(view)),
                RenderOp::RemoveOptimistic => self
                    .entries
                    .retain(|entry| !matches!(entry, ChatEntry::Message(view) if view.optimistic)),
                RenderOp::ScrollToBottom => scroll = true,
            }
        }
        scroll
    }
}

#[derive(Clone, Copy)]
struct SignalSurface {
    model: Signal<ChatViewModel>,
    list: Signal<ChatList>,
    input: Signal<String>,
    pending_image: Signal<Option<PendingImage>>,
}

#[async_trait(?Send)]
impl ChatSurface for SignalSurface {
    fn with_model<R>(&mut self, f: impl FnOnce(&mut ChatViewModel) -> R) -> R {
        self.model.with_mut(f)
    }

    async fn scroll_metrics(&self) -> Option<ScrollMetrics> {
        host::scroll_metrics().await
    }

    fn render(&mut self, ops: Vec<RenderOp>) {
        if ops.is_empty() {
            return;
        }
        let scroll = self.list.with_mut(|list| list.apply(ops));
        if scroll {
            host::scroll_to_bottom();
        }
    }

    fn clear_composer(&mut self) {
        self.input.set(String::new());
        self.pending_image.set(None);
        host::reset_file_input();
    }
}

#[component]
pub fn ChatView(
    base_url: String,
    csrf_token: Option<String>,
    current_user: Option<String>,
    poll_interval: Duration,
    modal_image: Signal<Option<String>>,
) -> Element {
    let model = use_signal(|| ChatViewModel::new(current_user.clone()));
    let list = use_signal(ChatList::default);
    let mut input = use_signal(String::new);
    let mut pending_image = use_signal(|| Option::<PendingImage>::None);
    let transport =
        use_signal(|| Rc::new(HttpTransport::new(base_url.clone(), csrf_token.clone())));
    let surface = SignalSurface {
        model,
        list,
        input,
        pending_image,
    };

    use_future(move || async move {
        let transport = transport.read().clone();
        let mut surface = surface;
        Poller::new(poll_interval)
            .run(transport.as_ref(), &mut surface, host::sleep)
            .await;
    });

    let send = move || {
        let draft = OutgoingMessage::new(
            &input(),
            pending_image().map(|pending| pending.attachment),
        );
        if draft.is_empty() {
            return;
        }
        let transport = transport.read().clone();
        let mut surface = surface;
        spawn(async move {
            submit(transport.as_ref(), &mut surface, draft).await;
        });
    };

    let on_pick = move |ev: FormEvent| async move {
        let Some(engine) = ev.files() else {
            return;
        };
        let Some(name) = engine.files().into_iter().next() else {
            return;
        };
        match engine.read_file(&name).await {
            Some(bytes) => pending_image.set(Some(PendingImage::new(&name, bytes))),
            None => tracing::warn!(file = %name, "could not read attachment"),
        }
    };

    let snapshot = list();
    let preview = pending_image();

    rsx! {
        div { class: "chat-widget widget",
            div { id: host::CHAT_LIST_ID, class: "chat-messages",
                for entry in snapshot.entries().iter() {
                    ChatRow { key: "{entry.key()}", entry: entry.clone(), modal_image }
                }
            }

            if let Some(preview) = preview {
                div { id: "image-preview-container", class: "image-preview-container",
                    img {
                        id: "image-preview",
                        class: "image-preview",
                        src: "{preview.preview_url}",
                    }
                    button {
                        class: "btn-ghost clear-image",
                        r#type: "button",
                        title: "Quitar imagen",
                        onclick: move |_| {
                            pending_image.set(None);
                            host::reset_file_input();
                        },
                        "×"
                    }
                }
            }

            form { class: "chat-input-area",
                onsubmit: move |ev| {
                    ev.prevent_default();
                    send();
                },
                label { class: "file-btn", title: "Adjuntar imagen",
                    input {
                        id: host::CHAT_FILE_INPUT_ID,
                        r#type: "file",
                        accept: "image/*",
                        style: "display: none;",
                        onchange: on_pick,
                    }
                    "📷"
                }
                textarea {
                    id: "chat-input",
                    rows: "1",
                    placeholder: "Escribe un mensaje…",
                    value: "{input}",
                    oninput: move |ev| input.set(ev.value()),
                    onkeydown: move |ev| {
                        if ev.key() == Key::Enter && !ev.modifiers().shift() {
                            ev.prevent_default();
                            send();
                        }
                    },
                }
                button {
                    class: "btn btn-primary send-btn",
                    r#type: "button",
                    onclick: move |_| send(),
                    "Enviar"
                }
            }
        }
    }
}

#[component]
fn ChatRow(entry: ChatEntry, modal_image: Signal<Option<String>>) -> Element {
    let mut modal_image = modal_image;
    match entry {
        ChatEntry::DateHeader { label, .. } => rsx! {
            div { class: "chat-date-header", "{label}" }
        },
        ChatEntry::Message(view) => {
            let side = if view.mine { "user" } else { "bot" };
            let optimistic = if view.optimistic { "optimistic" } else { "" };
            let image = view.image_url.clone().map(|url| {
                let target = url.clone();
                rsx! {
                    img {
                        class: "chat-image",
                        src: "{url}",
                        onclick: move |_| modal_image.set(Some(target.clone())),
                    }
                }
            });
            rsx! {
                div { class: "message {side} {optimistic}",
                    {image}
                    if let Some(text) = view.text.as_deref() {
                        p { "{text}" }
                    }
                    span { class: "message-time", "{view.time}" }
                }
            }
        }
    }
}
