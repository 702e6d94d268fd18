use itertools::Itertools;
use protrack_protocol::{Paint, Scene};
use std::collections::BTreeMap;

const PALETTE: [&str; 12] = [
    "#f8766d", "#00bfc4", "#7cae00", "#c77cff", "#e68613", "#00a9ff", "#0cb702", "#ff61cc",
    "#aba300", "#8494ff", "#00be67", "#ed68ed",
];
const FALLBACK: &str = "#6e6e6e";

/// Maps color categories to concrete colors.
///
/// Keys are sorted before colors are handed out, so a given set of
/// categories always gets the same colors regardless of row order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryPalette {
    colors: BTreeMap<String, &'static str>,
}

impl CategoryPalette {
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let colors = keys
            .into_iter()
            .sorted()
            .dedup()
            .enumerate()
            .map(|(idx, key)| (key.to_string(), PALETTE[idx % PALETTE.len()]))
            .collect();
        Self { colors }
    }

    pub fn for_scene(scene: &Scene) -> Self {
        Self::new(scene.category_keys())
    }

    pub fn color_for(&self, key: &str) -> &'static str {
        self.colors.get(key).copied().unwrap_or(FALLBACK)
    }

    pub fn resolve(&self, paint: &Paint) -> String {
        match paint {
            Paint::Color(color) => color.clone(),
            Paint::Category(key) => self.color_for(key).to_string(),
        }
    }

    /// Categories with their colors, in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.colors.iter().map(|(key, color)| (key.as_str(), *color))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
