use serde::{Deserialize, Serialize};

/// Most recent searches kept.
pub const MAX_RECENT: usize = 5;

pub const TRENDING_WORKOUTS: &[&str] = &[
    "Quick abs workout",
    "No equipment training",
    "Stretching routine",
    "10 min morning yoga",
];

const SEED_SEARCHES: &[&str] = &["Yoga for beginners", "HIIT cardio", "Full body strength"];

/// Recent workout searches, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistory {
    recent: Vec<String>,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self {
            recent: SEED_SEARCHES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self { recent: Vec::new() }
    }

    /// Record a search and return the query to run.
    ///
    /// Blank queries return `None`. A query already in the list leaves the
    /// list untouched.
    pub fn record(&mut self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        if !self.recent.iter().any(|q| q == query) {
            self.recent.insert(0, query.to_string());
            self.recent.truncate(MAX_RECENT);
        }
        Some(query.to_string())
    }

    pub fn remove(&mut self, query: &str) -> bool {
        let before = self.recent.len();
        self.recent.retain(|q| q != query);
        self.recent.len() != before
    }

    pub fn recent(&self) -> &[String] {
        &self.recent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_history() {
        let history = SearchHistory::new();
        assert_eq!(
            history.recent(),
            &["Yoga for beginners", "HIIT cardio", "Full body strength"]
        );
    }

    #[test]
    fn test_record_pushes_front() {
        let mut history = SearchHistory::new();
        assert_eq!(history.record("  leg day  ").as_deref(), Some("leg day"));
        assert_eq!(history.recent()[0], "leg day");
        assert_eq!(history.recent().len(), 4);
    }

    #[test]
    fn test_record_caps_length() {
        let mut history = SearchHistory::new();
        for q in ["a", "b", "c", "d"] {
            history.record(q);
        }
        assert_eq!(history.recent(), &["d", "c", "b", "a", "Yoga for beginners"]);
    }

    #[test]
    fn test_repeat_search_unchanged() {
        let mut history = SearchHistory::new();
        assert_eq!(history.record("HIIT cardio").as_deref(), Some("HIIT cardio"));
        assert_eq!(history, SearchHistory::new());
    }

    #[test]
    fn test_blank_search_ignored() {
        let mut history = SearchHistory::empty();
        assert!(history.record("   ").is_none());
        assert!(history.recent().is_empty());
    }

    #[test]
    fn test_remove() {
        let mut history = SearchHistory::new();
        assert!(history.remove("HIIT cardio"));
        assert!(!history.remove("HIIT cardio"));
        assert_eq!(history.recent().len(), 2);
    }
}
