//! Icon data as stored by the cache.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Raw data for one icon.
///
/// The cache stores icon data as-is; turning it into markup is up to the
/// renderer. Stored entries are immutable and are replaced as a whole.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconData {
    /// SVG body (contents of the `<svg>` element).
    pub body: String,
    /// ViewBox width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// ViewBox height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// ViewBox left offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    /// ViewBox top offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    /// Rotation in quarter turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<u8>,
    /// Horizontal flip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_flip: Option<bool>,
    /// Vertical flip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_flip: Option<bool>,
}

impl IconData {
    /// Create icon data with only a body.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    /// Set the viewBox size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// A set of icons sharing one prefix, as returned by bulk loaders and the
/// icon API.
///
/// ```json
/// { "prefix": "mdi", "icons": { "home": { "body": "<path/>" } }, "not_found": ["nope"] }
/// ```
///
/// Set-level dimensions act as defaults for icons that do not carry their own.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IconSet {
    /// Icon set prefix.
    pub prefix: String,
    /// Icons by name.
    #[serde(default)]
    pub icons: BTreeMap<String, IconData>,
    /// Names the source confirmed as absent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_found: Vec<String>,
    /// Default viewBox width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Default viewBox height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Default viewBox left offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    /// Default viewBox top offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
}

impl IconSet {
    /// Create an empty set.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Add an icon to the set.
    pub fn with_icon(mut self, name: impl Into<String>, data: IconData) -> Self {
        self.icons.insert(name.into(), data);
        self
    }

    /// Mark a name as not found.
    pub fn with_not_found(mut self, name: impl Into<String>) -> Self {
        self.not_found.push(name.into());
        self
    }

    /// Get an icon with the set-level defaults applied.
    pub fn resolve_icon(&self, name: &str) -> Option<IconData> {
        let mut icon = self.icons.get(name)?.clone();
        icon.width = icon.width.or(self.width);
        icon.height = icon.height.or(self.height);
        icon.left = icon.left.or(self.left);
        icon.top = icon.top.or(self.top);
        Some(icon)
    }

    /// Check whether the set answers for `name`, either way.
    pub fn mentions(&self, name: &str) -> bool {
        self.icons.contains_key(name) || self.not_found.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_data_json() {
        let icon: IconData =
            serde_json::from_str(r#"{"body":"<g/>","width":24,"hFlip":true}"#).unwrap();
        assert_eq!(icon.body, "<g/>");
        assert_eq!(icon.width, Some(24.0));
        assert_eq!(icon.h_flip, Some(true));
        assert_eq!(icon.v_flip, None);
    }

    #[test]
    fn test_icon_set_json_ignores_unknown_fields() {
        let set: IconSet = serde_json::from_str(
            r#"{
                "prefix": "mdi",
                "lastModified": 1700000000,
                "aliases": {},
                "icons": { "home": { "body": "<path/>" } },
                "width": 24,
                "height": 24,
                "not_found": ["nope"]
            }"#,
        )
        .unwrap();

        assert_eq!(set.prefix, "mdi");
        assert_eq!(set.not_found, vec!["nope".to_string()]);
        assert!(set.mentions("home"));
        assert!(set.mentions("nope"));
        assert!(!set.mentions("other"));
    }

    #[test]
    fn test_resolve_icon_applies_defaults() {
        let set = IconSet {
            width: Some(24.0),
            height: Some(24.0),
            ..IconSet::new("mdi")
        }
        .with_icon("home", IconData::new("<path/>"))
        .with_icon("wide", IconData::new("<path/>").with_size(32.0, 16.0));

        let home = set.resolve_icon("home").unwrap();
        assert_eq!(home.width, Some(24.0));
        assert_eq!(home.height, Some(24.0));

        let wide = set.resolve_icon("wide").unwrap();
        assert_eq!(wide.width, Some(32.0));
        assert_eq!(wide.height, Some(16.0));

        assert!(set.resolve_icon("missing").is_none());
    }
}
