use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::time::Duration;

use crate::storage::CACHE_KEY;

/// Stylesheet embedded into the preview document unless overridden.
pub const DEFAULT_PREVIEW_CSS: &str = include_str!("../assets/markdown.css");

/// How rendered HTML reaches the isolated preview document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryStrategy {
    /// Install the shell once, then post each render as a message.
    #[default]
    Message,
    /// Rebuild and reload the whole document on every render.
    Document,
}

/// Ids of the page elements the app mounts onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub editor_wrapper: SmolStr,
    pub preview: SmolStr,
    pub dragger: SmolStr,
    pub readout: SmolStr,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            editor_wrapper: "editor-wrapper".into(),
            preview: "preview".into(),
            dragger: "dragger".into(),
            readout: "event-tracker".into(),
        }
    }
}

/// highlight.js assets referenced from the preview shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlightAssets {
    /// Base URL of the highlight.js distribution, without trailing slash.
    pub base_url: String,
    /// Theme name under `styles/`.
    pub theme: String,
    /// Extra language bundles under `languages/`.
    pub languages: Vec<String>,
}

impl Default for HighlightAssets {
    fn default() -> Self {
        Self {
            base_url: "./highlight.js/11.9.0".to_string(),
            theme: "atom-one-dark".to_string(),
            languages: vec!["javascript".into(), "go".into(), "diff".into()],
        }
    }
}

impl HighlightAssets {
    pub fn stylesheet_url(&self) -> String {
        format!("{}/styles/{}.min.css", self.base_url, self.theme)
    }

    /// Core script first, then one script per language bundle.
    pub fn script_urls(&self) -> Vec<String> {
        std::iter::once(format!("{}/highlight.min.js", self.base_url))
            .chain(
                self.languages
                    .iter()
                    .map(|lang| format!("{}/languages/{}.min.js", self.base_url, lang)),
            )
            .collect()
    }
}

/// Editor configuration.
///
/// Every field has a default, so an empty object (or no config at all) gives
/// the stock layout: 500ms debounce, message delivery, and the standard
/// element ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Storage key of the cached document.
    pub cache_key: SmolStr,
    /// Quiet period before a burst of edits is committed.
    pub debounce_ms: u32,
    /// Media query that switches the divider to vertical resizing.
    pub narrow_query: String,
    pub delivery: DeliveryStrategy,
    pub placeholder: String,
    /// Stylesheet for the preview document. `None` uses the bundled one.
    pub preview_css: Option<String>,
    /// `None` disables highlight.js in the preview.
    pub highlight: Option<HighlightAssets>,
    pub elements: ElementIds,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            cache_key: CACHE_KEY.into(),
            debounce_ms: 500,
            narrow_query: "(max-width: 767px)".to_string(),
            delivery: DeliveryStrategy::default(),
            placeholder: "Input some Markdown".to_string(),
            preview_css: None,
            highlight: Some(HighlightAssets::default()),
            elements: ElementIds::default(),
        }
    }
}

impl EditorConfig {
    /// Parse config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.debounce_ms))
    }

    pub fn preview_css(&self) -> &str {
        self.preview_css.as_deref().unwrap_or(DEFAULT_PREVIEW_CSS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.cache_key, "$$markdown-online$$");
        assert_eq!(config.debounce_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_override() {
        let config = EditorConfig::from_json(
            r#"{"debounceMs": 250, "delivery": "document", "elements": {"preview": "out"}}"#,
        )
        .unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.delivery, DeliveryStrategy::Document);
        assert_eq!(config.elements.preview, "out");
        assert_eq!(config.elements.dragger, "dragger");
    }

    #[test]
    fn test_highlight_disabled() {
        let config = EditorConfig::from_json(r#"{"highlight": null}"#).unwrap();
        assert!(config.highlight.is_none());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EditorConfig::from_json("{\"debounceMs\": \"soon\"}"),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn test_highlight_urls() {
        let assets = HighlightAssets::default();
        assert_eq!(
            assets.stylesheet_url(),
            "./highlight.js/11.9.0/styles/atom-one-dark.min.css"
        );
        assert_eq!(
            assets.script_urls(),
            vec![
                "./highlight.js/11.9.0/highlight.min.js",
                "./highlight.js/11.9.0/languages/javascript.min.js",
                "./highlight.js/11.9.0/languages/go.min.js",
                "./highlight.js/11.9.0/languages/diff.min.js",
            ]
        );
    }

    #[test]
    fn test_bundled_css_used_by_default() {
        let config = EditorConfig::default();
        assert_eq!(config.preview_css(), DEFAULT_PREVIEW_CSS);
        assert!(!DEFAULT_PREVIEW_CSS.is_empty());
    }
}
