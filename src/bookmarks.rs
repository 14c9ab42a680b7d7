use std::collections::HashSet;

use dashmap::DashMap;

/// Local bookmark cache: the set of canonical reservation ids each user has
/// saved. Lives outside the record store entirely — losing it loses
/// bookmarks, never reservations. The engine itself never writes here;
/// callers toggle marks after a booking or listing round-trip.
pub struct SavedMarks {
    marks: DashMap<String, HashSet<String>>,
}

impl Default for SavedMarks {
    fn default() -> Self {
        Self::new()
    }
}

impl SavedMarks {
    pub fn new() -> Self {
        Self {
            marks: DashMap::new(),
        }
    }

    /// Returns false if the id was already saved.
    pub fn add(&self, user: &str, canonical_id: &str) -> bool {
        self.marks
            .entry(user.to_string())
            .or_default()
            .insert(canonical_id.to_string())
    }

    /// Returns false if the id was not saved.
    pub fn remove(&self, user: &str, canonical_id: &str) -> bool {
        self.marks
            .get_mut(user)
            .map(|mut set| set.remove(canonical_id))
            .unwrap_or(false)
    }

    pub fn is_saved(&self, user: &str, canonical_id: &str) -> bool {
        self.marks
            .get(user)
            .is_some_and(|set| set.contains(canonical_id))
    }

    pub fn list(&self, user: &str) -> Vec<String> {
        self.marks
            .get(user)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_remove_roundtrip() {
        let marks = SavedMarks::new();
        assert!(marks.add("a@x.test", "r-1"));
        assert!(marks.is_saved("a@x.test", "r-1"));
        assert!(marks.remove("a@x.test", "r-1"));
        assert!(!marks.is_saved("a@x.test", "r-1"));
    }

    #[test]
    fn add_twice_is_idempotent() {
        let marks = SavedMarks::new();
        assert!(marks.add("a@x.test", "r-1"));
        assert!(!marks.add("a@x.test", "r-1"));
        assert_eq!(marks.list("a@x.test").len(), 1);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let marks = SavedMarks::new();
        assert!(!marks.remove("a@x.test", "r-1"));
    }

    #[test]
    fn users_are_independent() {
        let marks = SavedMarks::new();
        marks.add("a@x.test", "r-1");
        assert!(!marks.is_saved("b@x.test", "r-1"));
        assert!(marks.list("b@x.test").is_empty());
    }
}
