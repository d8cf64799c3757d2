use crate::api::policy::Category;
use crate::core::constants::GRID_STROKE_COLOR;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Renderer-side lookup from [`Category`] to a CSS colour.
///
/// The classifier never consults a palette; exporters take one as an
/// optional argument. Categories without an entry fall back to the grid
/// stroke colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct Palette {
    colors: BTreeMap<Category, String>,
}

impl Palette {
    pub fn empty() -> Self {
        Self {
            colors: BTreeMap::new(),
        }
    }

    pub fn with(mut self, category: Category, color: impl Into<String>) -> Self {
        self.colors.insert(category, color.into());
        self
    }

    pub fn color(&self, category: Category) -> &str {
        self.colors
            .get(&category)
            .map(String::as_str)
            .unwrap_or(GRID_STROKE_COLOR)
    }

    pub fn get(&self, category: Category) -> Option<&str> {
        self.colors.get(&category).map(String::as_str)
    }

    /// Overlays `other` on top of this palette.
    pub fn merge(mut self, other: &Palette) -> Self {
        for (category, color) in &other.colors {
            self.colors.insert(*category, color.clone());
        }
        self
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::empty()
            .with(Category::Good, "#1a9850")
            .with(Category::Poor, "#d73027")
            .with(Category::Absent, "#d73027")
            .with(Category::Minimal, "#fdae61")
            .with(Category::Partial, "#fee08b")
            .with(Category::Combined, "#1a9850")
            .with(Category::Full, "#1a9850")
    }
}

impl TryFrom<BTreeMap<String, String>> for Palette {
    type Error = String;

    fn try_from(raw: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut colors = BTreeMap::new();
        for (key, color) in raw {
            colors.insert(key.parse::<Category>()?, color);
        }
        Ok(Self { colors })
    }
}

impl From<Palette> for BTreeMap<String, String> {
    fn from(palette: Palette) -> Self {
        palette
            .colors
            .into_iter()
            .map(|(category, color)| (category.to_string(), color))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_covers_every_category() {
        let palette = Palette::default();
        for category in Category::ALL {
            assert!(palette.get(category).is_some());
        }
    }

    #[test]
    fn test_fallback_colour() {
        let palette = Palette::empty().with(Category::Good, "green");
        assert_eq!(palette.color(Category::Good), "green");
        assert_eq!(palette.color(Category::Poor), GRID_STROKE_COLOR);
    }

    #[test]
    fn test_palette_from_toml() -> Result<(), toml::de::Error> {
        let palette: Palette = toml::from_str("good = \"#00ff00\"\npoor = \"#ff0000\"")?;
        assert_eq!(palette.color(Category::Good), "#00ff00");
        assert_eq!(palette.color(Category::Poor), "#ff0000");
        assert!(palette.get(Category::Full).is_none());
        Ok(())
    }

    #[test]
    fn test_unknown_category_rejected() {
        let result: Result<Palette, _> = toml::from_str("purple = \"#800080\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_overrides() {
        let merged = Palette::default().merge(&Palette::empty().with(Category::Full, "blue"));
        assert_eq!(merged.color(Category::Full), "blue");
        assert_eq!(merged.color(Category::Good), "#1a9850");
    }
}
