use crate::types::ImageAttachment;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dioxus::prelude::*;
use std::path::Path;

/// An attachment picked in the composer, with the preview shown beside it.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingImage {
    pub attachment: ImageAttachment,
    pub preview_url: String,
}

impl PendingImage {
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Self {
        let mime = mime_for(file_name).to_string();
        let preview_url = format!("data:{mime};base64,{}", STANDARD.encode(&bytes));
        let file_name = display_file_name(file_name);
        Self {
            attachment: ImageAttachment {
                file_name,
                mime,
                bytes,
            },
            preview_url,
        }
    }
}

pub fn mime_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

pub fn display_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|stem| stem.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Full-size overlay for a chat image; any click closes it.
#[component]
pub fn ImageModal(image: Signal<Option<String>>) -> Element {
    let mut image = image;
    let Some(url) = image() else {
        return rsx! {};
    };
    rsx! {
        div {
            id: "image-modal",
            class: "image-modal",
            onclick: move |_| image.set(None),
            span { class: "image-modal-close", "×" }
            img { id: "modal-img", class: "image-modal-content", src: "{url}" }
        }
    }
}
