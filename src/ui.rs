use crate::config::{AppConfig, PageContext};
use crate::host;
use crate::mood::MoodSlider;
use crate::theme::RootStyle;
use crate::views::{ChatView, ImageModal, MoodPanel};
use dioxus::prelude::*;

const COMPANION_CSS: Asset = asset!("/assets/companion.css");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AppTab {
    Chat,
    Mood,
}

#[component]
pub fn App() -> Element {
    let page = use_resource(|| host::read_page_context());
    let config = use_hook(AppConfig::load);

    let body = match page.cloned() {
        Some(page) => rsx! { Companion { page, config } },
        None => rsx! { div { class: "loading", "Cargando…" } },
    };
    rsx! {
        document::Link { rel: "stylesheet", href: COMPANION_CSS }
        {body}
    }
}

/// Initial background: the partner's mood when the page names one,
/// otherwise our own restored mood.
fn initial_painted_mood(page: &PageContext) -> String {
    page.other_mood.clone().unwrap_or_else(|| {
        MoodSlider::restore(page.saved_mood.as_deref())
            .form_value()
            .to_string()
    })
}

#[component]
fn Companion(page: PageContext, config: AppConfig) -> Element {
    let active_tab = use_signal(|| AppTab::Chat);
    let painted_mood = use_signal(|| Some(initial_painted_mood(&page)));
    let modal_image = use_signal(|| Option::<String>::None);

    let base_url = config.base_url(&page);
    let csrf_token = page.csrf_token();
    use_hook(|| tracing::info!(%base_url, user = ?page.user, "starting companion"));

    rsx! {
        BackgroundStyles { painted_mood }
        div { class: "header no-divider",
            div { class: "header-content",
                TabNavigation { active_tab }
            }
        }
        div { class: "tab-panels",
            TabPanel {
                active_tab,
                tab: AppTab::Chat,
                children: rsx!(
                    ChatView {
                        base_url,
                        csrf_token: csrf_token.clone(),
                        current_user: page.user.clone(),
                        poll_interval: config.poll_interval,
                        modal_image,
                    }
                ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Mood,
                children: rsx!(
                    MoodPanel {
                        saved_mood: page.saved_mood.clone(),
                        csrf_token,
                        painted_mood,
                    }
                ),
            }
        }
        ImageModal { image: modal_image }
    }
}

#[component]
fn BackgroundStyles(painted_mood: Signal<Option<String>>) -> Element {
    let css = RootStyle::for_mood(painted_mood().as_deref()).css();
    rsx! {
        style { dangerous_inner_html: "{css}" }
    }
}

#[component]
fn TabPanel(active_tab: Signal<AppTab>, tab: AppTab, children: Element) -> Element {
    let is_active = active_tab() == tab;
    let class_suffix = if is_active { "active" } else { "" };
    rsx! {
        div {
            class: format_args!("tab-panel {}", class_suffix),
            aria_hidden: (!is_active).to_string(),
            {children}
        }
    }
}

#[component]
fn TabNavigation(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        div { class: "tabs",
            TabButton { active_tab, tab: AppTab::Chat, label: "Chat" }
            TabButton { active_tab, tab: AppTab::Mood, label: "Ánimo" }
        }
    }
}

#[component]
fn TabButton(active_tab: Signal<AppTab>, tab: AppTab, label: &'static str) -> Element {
    let mut active_tab = active_tab;
    let class = if active_tab() == tab {
        "tab active"
    } else {
        "tab"
    };
    rsx! {
        h1 {
            class: class,
            onclick: move |_| active_tab.set(tab),
            "{label}"
        }
    }
}
