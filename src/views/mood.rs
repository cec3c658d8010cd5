use crate::host;
use crate::mood::{Mood, MoodSlider, SLIDER_MAX};
use dioxus::prelude::*;

/// Slider that previews a mood on the page background and persists it
/// through a plain form post.
#[component]
pub fn MoodPanel(
    saved_mood: Option<String>,
    csrf_token: Option<String>,
    painted_mood: Signal<Option<String>>,
) -> Element {
    let mut slider = use_signal(|| MoodSlider::restore(saved_mood.as_deref()));
    let mut painted_mood = painted_mood;

    let current = slider();
    let reactions = current.reactions();
    let thumb = current.thumb_background();
    let max = SLIDER_MAX.to_string();

    rsx! {
        form { id: "mood-form", class: "mood-form widget", method: "post",
            if let Some(token) = csrf_token {
                input { r#type: "hidden", name: "csrfmiddlewaretoken", value: "{token}" }
            }
            div { id: "mood-label", class: "mood-label", "{current.label()}" }
            div { id: "mood-icons-track", class: "mood-icons-track",
                for (index, mood) in Mood::ALL.iter().enumerate() {
                    div {
                        key: "{mood.key()}",
                        class: reactions[index].class(),
                        style: reactions[index].inline_style(),
                        dangerous_inner_html: mood.icon_svg(),
                    }
                }
            }
            input {
                id: "mood-range",
                class: "mood-range",
                r#type: "range",
                min: "0",
                max: "{max}",
                step: "1",
                value: "{current.value()}",
                style: "--thumb-bg: {thumb};",
                oninput: move |ev| {
                    let value = ev.value();
                    if slider.with_mut(|slider| slider.set_raw(&value)) {
                        painted_mood.set(Some(slider.read().form_value().to_string()));
                        host::haptic_tick();
                    }
                },
            }
            input {
                r#type: "hidden",
                id: "id_mood",
                name: "mood",
                value: "{current.form_value()}",
            }
            button { class: "btn btn-primary", r#type: "submit", "Guardar" }
        }
    }
}
