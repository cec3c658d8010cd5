//! Mood enumeration and the slider that picks one.
//!
//! Slider positions index the enumeration in declaration order, so the
//! order of [`Mood::ALL`] is part of the persisted contract.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mood {
    Enojado,
    Triste,
    Cansado,
    Tranqui,
    Feliz,
    Amoroso,
}

/// The five colour roles painted onto the page root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub bg1: &'static str,
    pub bg2: &'static str,
    pub blob1: &'static str,
    pub blob2: &'static str,
    pub blob3: &'static str,
}

pub const DEFAULT_SLIDER_INDEX: usize = 3;
pub const DEFAULT_PALETTE_MOOD: Mood = Mood::Feliz;
pub const SLIDER_MAX: usize = 5;

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Enojado,
        Mood::Triste,
        Mood::Cansado,
        Mood::Tranqui,
        Mood::Feliz,
        Mood::Amoroso,
    ];

    pub fn from_index(index: usize) -> Option<Mood> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Case-insensitive lookup, accepting the English names and the
    /// retired `calmado` key.
    pub fn from_key(key: &str) -> Option<Mood> {
        let mood = match key.trim().to_lowercase().as_str() {
            "enojado" | "angry" => Mood::Enojado,
            "triste" | "sad" => Mood::Triste,
            "cansado" | "tired" => Mood::Cansado,
            "tranqui" | "calmado" | "calm" => Mood::Tranqui,
            "feliz" | "happy" => Mood::Feliz,
            "amoroso" | "love" => Mood::Amoroso,
            _ => return None,
        };
        Some(mood)
    }

    pub fn key(self) -> &'static str {
        match self {
            Mood::Enojado => "enojado",
            Mood::Triste => "triste",
            Mood::Cansado => "cansado",
            Mood::Tranqui => "tranqui",
            Mood::Feliz => "feliz",
            Mood::Amoroso => "amoroso",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Mood::Enojado => "Enojado",
            Mood::Triste => "Triste",
            Mood::Cansado => "Cansado",
            Mood::Tranqui => "Tranqui",
            Mood::Feliz => "Feliz",
            Mood::Amoroso => "Amoroso",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Enojado => "😡",
            Mood::Triste => "😢",
            Mood::Cansado => "😴",
            Mood::Tranqui => "😊",
            Mood::Feliz => "😄",
            Mood::Amoroso => "❤️",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Mood::Enojado => Palette {
                bg1: "#cb2d3e",
                bg2: "#ef473a",
                blob1: "rgba(203, 45, 62, 0.9)",
                blob2: "rgba(239, 71, 58, 0.9)",
                blob3: "rgba(180, 20, 20, 0.5)",
            },
            Mood::Triste => Palette {
                bg1: "#141E30",
                bg2: "#243B55",
                blob1: "rgba(20, 30, 48, 0.9)",
                blob2: "rgba(36, 59, 85, 0.9)",
                blob3: "rgba(10, 20, 40, 0.5)",
            },
            Mood::Cansado => Palette {
                bg1: "#8e9eab",
                bg2: "#eef2f3",
                blob1: "rgba(142, 158, 171, 0.8)",
                blob2: "rgba(200, 210, 220, 0.8)",
                blob3: "rgba(100, 110, 120, 0.5)",
            },
            Mood::Tranqui => Palette {
                bg1: "#4facfe",
                bg2: "#00f2fe",
                blob1: "rgba(79, 172, 254, 0.8)",
                blob2: "rgba(0, 242, 254, 0.8)",
                blob3: "rgba(0, 198, 255, 0.6)",
            },
            Mood::Feliz => Palette {
                bg1: "#ffb347",
                bg2: "#ffcc33",
                blob1: "rgba(255, 179, 71, 0.8)",
                blob2: "rgba(255, 204, 51, 0.8)",
                blob3: "rgba(255, 223, 0, 0.6)",
            },
            Mood::Amoroso => Palette {
                bg1: "#ec008c",
                bg2: "#fc6767",
                blob1: "rgba(236, 0, 140, 0.8)",
                blob2: "rgba(252, 103, 103, 0.8)",
                blob3: "rgba(255, 20, 147, 0.6)",
            },
        }
    }

    pub fn icon_svg(self) -> &'static str {
        match self {
            Mood::Enojado => ANGRY_SVG,
            Mood::Triste => SAD_SVG,
            Mood::Cansado => TIRED_SVG,
            Mood::Tranqui => CALM_SVG,
            Mood::Feliz => HAPPY_SVG,
            Mood::Amoroso => LOVE_SVG,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Palette for a raw key, falling back to the default mood.
pub fn palette_for(key: Option<&str>) -> Palette {
    key.and_then(Mood::from_key)
        .unwrap_or(DEFAULT_PALETTE_MOOD)
        .palette()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    Active,
    Neighbor,
    Dimmed,
}

impl Emphasis {
    pub fn between(selected: usize, icon: usize) -> Self {
        match selected.abs_diff(icon) {
            0 => Emphasis::Active,
            1 => Emphasis::Neighbor,
            _ => Emphasis::Dimmed,
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Emphasis::Active => "mood-icon-wrapper active",
            Emphasis::Neighbor => "mood-icon-wrapper neighbor",
            Emphasis::Dimmed => "mood-icon-wrapper",
        }
    }

    pub fn inline_style(self) -> &'static str {
        match self {
            Emphasis::Dimmed => "transform: scale(0.85); opacity: 0.5; filter: grayscale(50%);",
            _ => "",
        }
    }
}

/// Slider position plus everything derived from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoodSlider {
    value: usize,
}

impl MoodSlider {
    /// Restores the slider from a persisted key; unknown or missing keys
    /// land on the default position.
    pub fn restore(saved: Option<&str>) -> Self {
        let value = saved
            .and_then(Mood::from_key)
            .map(Mood::index)
            .unwrap_or(DEFAULT_SLIDER_INDEX);
        Self { value }
    }

    pub fn value(&self) -> usize {
        self.value
    }

    pub fn mood(&self) -> Mood {
        Mood::ALL[self.value]
    }

    /// Applies a raw `input` event value. Returns `false` when the value is
    /// not a slider position, leaving the state untouched.
    pub fn set_raw(&mut self, raw: &str) -> bool {
        match raw.trim().parse::<usize>() {
            Ok(value) if value <= SLIDER_MAX => {
                self.value = value;
                true
            }
            _ => false,
        }
    }

    pub fn label(&self) -> &'static str {
        self.mood().display_name()
    }

    /// Value for the hidden form field that persists the mood.
    pub fn form_value(&self) -> &'static str {
        self.mood().key()
    }

    pub fn reactions(&self) -> [Emphasis; 6] {
        std::array::from_fn(|icon| Emphasis::between(self.value, icon))
    }

    /// `--thumb-bg` value drawing the mood emoji on the slider thumb.
    pub fn thumb_background(&self) -> String {
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48" viewBox="0 0 48 48"><style>text {{ font-family: "Segoe UI Emoji", "Apple Color Emoji", "Noto Color Emoji", sans-serif; }}</style><text x="50%" y="55%" dominant-baseline="middle" text-anchor="middle" font-size="36">{}</text></svg>"#,
            self.mood().emoji()
        );
        format!(
            "url(\"data:image/svg+xml;charset=UTF-8,{}\")",
            urlencoding::encode(&svg)
        )
    }
}

const ANGRY_SVG: &str = r##"<svg viewBox="0 0 36 36" fill="url(#grad_angry)"><defs><linearGradient id="grad_angry" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" style="stop-color:#FF5E62;stop-opacity:1" /><stop offset="100%" style="stop-color:#FF9966;stop-opacity:1" /></linearGradient></defs><circle cx="18" cy="18" r="18"/><path fill="#FFF" d="M11 23c0-2.5 7-2.5 14 0M10 14l5 2M26 14l-5 2" stroke="#FFF" stroke-width="2" stroke-linecap="round"/></svg>"##;

const SAD_SVG: &str = r##"<svg viewBox="0 0 36 36" fill="url(#grad_sad)"><defs><linearGradient id="grad_sad" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" style="stop-color:#5B86E5;stop-opacity:1" /><stop offset="100%" style="stop-color:#36D1DC;stop-opacity:1" /></linearGradient></defs><circle cx="18" cy="18" r="18"/><circle fill="#FFF" cx="12" cy="14" r="2"/><circle fill="#FFF" cx="24" cy="14" r="2"/><path fill="none" stroke="#FFF" stroke-width="2" stroke-linecap="round" d="M12 25s3-2 6-2 6 2 6 2"/><path fill="#FFF" d="M25 15c.5 2 1 4 0 5" opacity="0.5"/></svg>"##;

const TIRED_SVG: &str = r##"<svg viewBox="0 0 36 36" fill="url(#grad_tired)"><defs><linearGradient id="grad_tired" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" style="stop-color:#bdc3c7;stop-opacity:1" /><stop offset="100%" style="stop-color:#2c3e50;stop-opacity:1" /></linearGradient></defs><circle cx="18" cy="18" r="18"/><path fill="none" stroke="#FFF" stroke-width="2" d="M10 16h6M20 16h6"/><circle fill="#FFF" cx="28" cy="12" r="3" opacity="0.5"/><circle fill="#FFF" cx="32" cy="8" r="1.5" opacity="0.5"/><path fill="none" stroke="#FFF" stroke-width="2" d="M14 24s2 2 4 2 4-2 4-2"/></svg>"##;

const CALM_SVG: &str = r##"<svg viewBox="0 0 36 36" fill="url(#grad_calm)"><defs><linearGradient id="grad_calm" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" style="stop-color:#89f7fe;stop-opacity:1" /><stop offset="100%" style="stop-color:#66a6ff;stop-opacity:1" /></linearGradient></defs><circle cx="18" cy="18" r="18"/><circle fill="#FFF" cx="12" cy="15" r="2"/><circle fill="#FFF" cx="24" cy="15" r="2"/><path fill="none" stroke="#FFF" stroke-width="2" d="M13 22s2.5 2 5 2 5-2 5-2"/></svg>"##;

const HAPPY_SVG: &str = r##"<svg viewBox="0 0 36 36" fill="url(#grad_happy)"><defs><linearGradient id="grad_happy" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" style="stop-color:#F2994A;stop-opacity:1" /><stop offset="100%" style="stop-color:#F2C94C;stop-opacity:1" /></linearGradient></defs><circle cx="18" cy="18" r="18"/><path fill="none" stroke="#FFF" stroke-width="2" stroke-linecap="round" d="M12 22s2.5 3 6 3 6-3 6-3"/><circle fill="#FFF" cx="12" cy="14" r="2"/><circle fill="#FFF" cx="24" cy="14" r="2"/></svg>"##;

const LOVE_SVG: &str = r##"<svg viewBox="0 0 36 36" fill="url(#grad_love)"><defs><linearGradient id="grad_love" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" style="stop-color:#ff9a9e;stop-opacity:1" /><stop offset="100%" style="stop-color:#fecfef;stop-opacity:1" /></linearGradient></defs><circle cx="18" cy="18" r="18"/><path fill="#FFF" d="M18 25s-7-4-9-9c-2-5 3-8 6-5 1 1 3 4 3 4s2-3 3-4c3-3 8 0 6 5-2 5-9 9-9 9z"/></svg>"##;
