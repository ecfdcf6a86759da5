//! Outline types: the per-document structure-extraction artifact.

use serde::{Deserialize, Serialize};

/// Title used when a document cannot be opened or parsed at all.
pub const FALLBACK_TITLE: &str = "Untitled";

/// Title used when the first page has no line usable as a title.
pub const FALLBACK_TITLE_NO_LINES: &str = "Untitled PDF";

/// A single heading with its level label and page anchor.
///
/// `level` is one of "H1".."H4"; H1 denotes the largest size cluster.
/// Outline order is document reading order, not level order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: String,
    pub text: String,
    pub page: u32,
}

impl Heading {
    pub fn new(level: impl Into<String>, text: impl Into<String>, page: u32) -> Self {
        Self {
            level: level.into(),
            text: text.into(),
            page,
        }
    }
}

/// The per-document outline: a title plus an ordered heading sequence.
///
/// Serializes to the structure-extraction JSON shape:
/// `{"title": ..., "outline": [{"level","text","page"}, ...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,
    pub outline: Vec<Heading>,
}

impl Outline {
    /// Create an outline with a title and headings.
    pub fn new(title: impl Into<String>, outline: Vec<Heading>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// The degenerate outline emitted for unreadable documents.
    pub fn untitled() -> Self {
        Self {
            title: FALLBACK_TITLE.to_string(),
            outline: Vec::new(),
        }
    }

    /// Check if the outline has no headings.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.outline.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untitled_outline() {
        let outline = Outline::untitled();
        assert_eq!(outline.title, "Untitled");
        assert!(outline.is_empty());
    }

    #[test]
    fn test_outline_json_shape() {
        let outline = Outline::new(
            "Annual Report",
            vec![Heading::new("H1", "Overview", 1), Heading::new("H2", "1.1 Revenue", 2)],
        );
        let json = serde_json::to_value(&outline).unwrap();
        assert_eq!(json["title"], "Annual Report");
        assert_eq!(json["outline"][0]["level"], "H1");
        assert_eq!(json["outline"][1]["page"], 2);
    }

    #[test]
    fn test_outline_roundtrip_ignores_extra_keys() {
        let raw = r#"{"title":"T","outline":[{"level":"H1","text":"A","page":1,"extra":true}]}"#;
        let outline: Outline = serde_json::from_str(raw).unwrap();
        assert_eq!(outline.len(), 1);
        assert_eq!(outline.outline[0].text, "A");
    }
}
