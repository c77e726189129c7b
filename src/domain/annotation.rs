//! Annotation Entity
//!
//! A technician's note (position + tread depth) bundled with its photos.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Position label
    #[serde(default)]
    pub comment1: String,
    /// Tread depth reading, numeric as text
    #[serde(default)]
    pub comment2: String,
    /// Ordered set; first insertion wins
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl Annotation {
    pub fn new(comment1: &str, comment2: &str) -> Self {
        Self {
            comment1: comment1.to_string(),
            comment2: comment2.to_string(),
            image_urls: Vec::new(),
        }
    }

    /// Same annotation iff both trimmed comments match exactly
    pub fn matches(&self, comment1: &str, comment2: &str) -> bool {
        self.comment1.trim() == comment1.trim() && self.comment2.trim() == comment2.trim()
    }

    /// Append URLs not already present, keeping first-seen order
    pub fn add_urls<'a>(&mut self, urls: impl IntoIterator<Item = &'a String>) {
        for url in urls {
            if !self.image_urls.contains(url) {
                self.image_urls.push(url.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_trims_both_sides() {
        let a = Annotation::new(" LF ", "4");
        assert!(a.matches("LF", " 4 "));
        assert!(!a.matches("LF", "5"));
        assert!(!a.matches("lf", "4"));
    }

    #[test]
    fn test_add_urls_suppresses_duplicates() {
        let mut a = Annotation::new("LF", "4");
        let urls = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        a.add_urls(&urls);
        a.add_urls(&vec!["b".to_string(), "c".to_string()]);
        assert_eq!(a.image_urls, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_image_urls_default_empty() {
        let a: Annotation = serde_json::from_str(r#"{"comment1":"RF","comment2":"6"}"#).unwrap();
        assert!(a.image_urls.is_empty());
    }
}
