//! Glue to the page hosting the app. Everything here runs small scripts
//! through the renderer and degrades to a default when the host cannot
//! answer.

use crate::chat::ScrollMetrics;
use crate::config::PageContext;
use anyhow::{Result, anyhow};
use dioxus::prelude::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const CHAT_LIST_ID: &str = "chat-messages";
pub const CHAT_FILE_INPUT_ID: &str = "chat-file";

const PAGE_CONTEXT_JS: &str = r#"
const body = document.body;
const slider = document.getElementById('mood-range');
const data = body ? body.dataset : {};
return {
    user: data.user || null,
    other_mood: data.otherMood || null,
    saved_mood: (slider && slider.dataset.currentMood) || data.currentMood || null,
    origin: window.location.origin || null,
    cookies: document.cookie || null,
};
"#;

const SCROLL_METRICS_JS: &str = r#"
const el = document.getElementById('chat-messages');
if (!el) return null;
return { offset: el.scrollTop, viewport: el.clientHeight, content: el.scrollHeight };
"#;

const SCROLL_TO_BOTTOM_JS: &str = r#"
requestAnimationFrame(() => {
    const el = document.getElementById('chat-messages');
    if (el) el.scrollTop = el.scrollHeight;
});
"#;

const VIBRATE_JS: &str = "if (navigator.vibrate) { try { navigator.vibrate(5); } catch (e) {} }";

#[derive(Deserialize)]
struct RawScroll {
    offset: f64,
    viewport: f64,
    content: f64,
}

async fn eval_json<T: DeserializeOwned>(script: &str) -> Result<T> {
    document::eval(script)
        .join::<T>()
        .await
        .map_err(|err| anyhow!("script evaluation failed: {err:?}"))
}

pub async fn read_page_context() -> PageContext {
    match eval_json::<PageContext>(PAGE_CONTEXT_JS).await {
        Ok(page) => page.normalized(),
        Err(err) => {
            tracing::warn!("page context unavailable: {err}");
            PageContext::default()
        }
    }
}

pub async fn scroll_metrics() -> Option<ScrollMetrics> {
    match eval_json::<Option<RawScroll>>(SCROLL_METRICS_JS).await {
        Ok(raw) => raw.map(|raw| ScrollMetrics {
            offset: raw.offset,
            viewport: raw.viewport,
            content: raw.content,
        }),
        Err(err) => {
            tracing::debug!("scroll metrics unavailable: {err}");
            None
        }
    }
}

/// Scrolls on the next frame, after pending list updates are painted.
pub fn scroll_to_bottom() {
    let _ = document::eval(SCROLL_TO_BOTTOM_JS);
}

fn reset_input_js(id: &str) -> String {
    format!("const el = document.getElementById('{id}'); if (el) el.value = '';")
}

/// Forgets the picked file so choosing the same one again fires `change`.
pub fn reset_file_input() {
    let _ = document::eval(&reset_input_js(CHAT_FILE_INPUT_ID));
}

pub fn haptic_tick() {
    let _ = document::eval(VIBRATE_JS);
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

// No tokio timer in the browser; borrow the page's.
#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    let script = format!(
        "await new Promise((resolve) => setTimeout(resolve, {})); return true;",
        duration.as_millis()
    );
    if let Err(err) = eval_json::<bool>(&script).await {
        tracing::warn!("timer unavailable: {err}");
    }
}
