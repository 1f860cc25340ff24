//! Traveler roster

use serde::{Deserialize, Serialize};

/// Largest party the planner keeps a roster for
pub const MAX_TRAVELERS: u32 = 50;

/// Ordered list of traveler display names
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TravelerRoster(Vec<String>);

impl TravelerRoster {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// Placeholder name for the traveler at `index` (0-based)
    pub fn placeholder(index: usize) -> String {
        format!("Traveler {}", index + 1)
    }

    /// A roster with `count` placeholder names
    pub fn with_count(count: usize) -> Self {
        Self((0..count).map(Self::placeholder).collect())
    }

    /// Resize to `count` entries, keeping existing names in order
    pub fn resized(&self, count: usize) -> Self {
        let mut names: Vec<String> = self.0.iter().take(count).cloned().collect();
        while names.len() < count {
            names.push(Self::placeholder(names.len()));
        }
        Self(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_count() {
        let roster = TravelerRoster::with_count(2);
        assert_eq!(roster.names(), &["Traveler 1", "Traveler 2"]);
    }

    #[test]
    fn test_resized_keeps_names() {
        let roster = TravelerRoster::new(vec!["Ann".into(), "Bo".into()]);
        let grown = roster.resized(3);
        assert_eq!(grown.names(), &["Ann", "Bo", "Traveler 3"]);
        let shrunk = roster.resized(1);
        assert_eq!(shrunk.names(), &["Ann"]);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_serializes_as_list() {
        let roster = TravelerRoster::new(vec!["Ann".into()]);
        assert_eq!(serde_json::to_string(&roster).unwrap(), r#"["Ann"]"#);
        assert!(roster.contains("Ann"));
    }
}
