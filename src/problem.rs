use serde::{Deserialize, Serialize};

/// Suffix the listing UIs put on a tag chip when more tags are hidden ("1+", "2+").
pub const TRUNCATION_MARKER: char = '+';

/// One practice problem as scraped from a listing or detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub url: String,
    pub name: String,
    pub difficulty: String,
    pub tags: Vec<String>,
}

impl Problem {
    pub fn new(
        url: impl Into<String>,
        name: impl Into<String>,
        difficulty: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            difficulty: difficulty.into(),
            tags,
        }
    }

    /// True when at least one tag carries the truncation marker.
    pub fn has_partial_tags(&self) -> bool {
        self.tags.iter().any(|t| t.ends_with(TRUNCATION_MARKER))
    }

    /// Copy of this problem with its tag list replaced wholesale.
    pub fn with_tags(&self, tags: Vec<String>) -> Self {
        Self {
            tags,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(t: &[&str]) -> Vec<String> {
        t.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn complete_tags_are_not_partial() {
        let p = Problem::new("u", "Two Sum", "Easy", tags(&["Array", "String"]));
        assert!(!p.has_partial_tags());
    }

    #[test]
    fn marker_suffix_is_partial() {
        let p = Problem::new("u", "Two Sum", "Easy", tags(&["Array", "2+"]));
        assert!(p.has_partial_tags());
    }

    #[test]
    fn empty_tags_are_complete() {
        let p = Problem::new("u", "Two Sum", "Easy", Vec::new());
        assert!(!p.has_partial_tags());
    }

    #[test]
    fn marker_elsewhere_is_not_partial() {
        let p = Problem::new("u", "X", "Easy", tags(&["C++ Basics+Extras"]));
        assert!(!p.has_partial_tags());
    }

    #[test]
    fn with_tags_replaces() {
        let p = Problem::new("u", "Two Sum", "Easy", tags(&["Array", "2+"]));
        let q = p.with_tags(tags(&["Hash Table"]));
        assert_eq!(q.tags, tags(&["Hash Table"]));
        assert_eq!(q.name, p.name);
        assert_eq!(q.url, p.url);
    }

    #[test]
    fn json_shape() {
        let p = Problem::new("https://x/p", "P", "Beginner", tags(&["Math"]));
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "url": "https://x/p",
                "name": "P",
                "difficulty": "Beginner",
                "tags": ["Math"]
            })
        );
    }
}
