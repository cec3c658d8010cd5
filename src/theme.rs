use crate::mood::palette_for;

pub const BG_GRADIENT_1: &str = "--bg-gradient-1";
pub const BG_GRADIENT_2: &str = "--bg-gradient-2";
pub const BLOB_COLOR_1: &str = "--blob-color-1";
pub const BLOB_COLOR_2: &str = "--blob-color-2";
pub const BLOB_COLOR_3: &str = "--blob-color-3";

pub const MOOD_VARIABLES: [&str; 5] = [
    BG_GRADIENT_1,
    BG_GRADIENT_2,
    BLOB_COLOR_1,
    BLOB_COLOR_2,
    BLOB_COLOR_3,
];

/// Something that accepts CSS custom property writes.
pub trait StyleTarget {
    fn set_property(&mut self, name: &'static str, value: &str);
}

/// Paints the mood background. Unknown or missing keys use the default
/// palette, so all five variables are always written.
pub fn apply_mood<T: StyleTarget + ?Sized>(key: Option<&str>, target: &mut T) {
    let palette = palette_for(key);
    target.set_property(BG_GRADIENT_1, palette.bg1);
    target.set_property(BG_GRADIENT_2, palette.bg2);
    target.set_property(BLOB_COLOR_1, palette.blob1);
    target.set_property(BLOB_COLOR_2, palette.blob2);
    target.set_property(BLOB_COLOR_3, palette.blob3);
}

/// Custom properties destined for `:root`, rendered as one stylesheet
/// so a repaint lands in a single DOM write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RootStyle {
    properties: Vec<(&'static str, String)>,
}

impl RootStyle {
    pub fn for_mood(key: Option<&str>) -> Self {
        let mut style = Self::default();
        apply_mood(key, &mut style);
        style
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.properties.iter().map(|(name, _)| *name)
    }

    pub fn css(&self) -> String {
        let body: String = self
            .properties
            .iter()
            .map(|(name, value)| format!("    {name}: {value};\n"))
            .collect();
        format!(":root {{\n{body}}}")
    }
}

impl StyleTarget for RootStyle {
    fn set_property(&mut self, name: &'static str, value: &str) {
        match self.properties.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value.to_string(),
            None => self.properties.push((name, value.to_string())),
        }
    }
}
