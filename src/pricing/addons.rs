//! Add-on Sets

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Selected add-on keys.
///
/// Stored as a sequence in selection order with duplicates removed. Two sets are
/// equal when they hold the same keys, whatever the order.
#[derive(Debug, Clone, Default, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct AddonSet {
    keys: SmallVec<[String; 4]>,
}

impl AddonSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key; returns `false` if it was already present.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();

        if self.contains(&key) {
            return false;
        }

        self.keys.push(key);

        true
    }

    /// Remove a key; returns `true` if it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.keys.len();

        self.keys.retain(|existing| existing != key);

        self.keys.len() != before
    }

    /// Whether the key is in the set.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|existing| existing == key)
    }

    /// Iterate over the keys in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Keys in canonical (sorted) order.
    pub fn sorted(&self) -> SmallVec<[&str; 4]> {
        let mut keys: SmallVec<[&str; 4]> = self.iter().collect();

        keys.sort_unstable();

        keys
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no add-ons are selected.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl PartialEq for AddonSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.sorted() == other.sorted()
    }
}

impl<S: Into<String>> FromIterator<S> for AddonSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = AddonSet::new();

        for key in iter {
            set.insert(key);
        }

        set
    }
}

impl From<Vec<String>> for AddonSet {
    fn from(keys: Vec<String>) -> Self {
        keys.into_iter().collect()
    }
}

impl From<AddonSet> for Vec<String> {
    fn from(set: AddonSet) -> Self {
        set.keys.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn order_does_not_affect_equality() {
        let a: AddonSet = ["egg", "sauce"].into_iter().collect();
        let b: AddonSet = ["sauce", "egg"].into_iter().collect();

        assert_eq!(a, b);
    }

    #[test]
    fn different_keys_are_not_equal() {
        let a: AddonSet = ["egg"].into_iter().collect();
        let b: AddonSet = ["egg", "sauce"].into_iter().collect();
        let c: AddonSet = ["sauce"].into_iter().collect();

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(AddonSet::new(), AddonSet::default());
    }

    #[test]
    fn duplicates_are_dropped_and_order_kept() {
        let set: AddonSet = ["sauce", "egg", "sauce"].into_iter().collect();

        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["sauce", "egg"]);
        assert_eq!(set.sorted().as_slice(), &["egg", "sauce"]);
    }

    #[test]
    fn insert_and_remove() {
        let mut set = AddonSet::new();

        assert!(set.insert("egg"));
        assert!(!set.insert("egg"));
        assert!(set.contains("egg"));
        assert!(set.remove("egg"));
        assert!(!set.remove("egg"));
        assert!(set.is_empty());
    }

    #[test]
    fn serializes_as_plain_sequence() -> TestResult {
        let set: AddonSet = ["sauce", "egg"].into_iter().collect();

        let json = serde_json::to_string(&set)?;

        assert_eq!(json, r#"["sauce","egg"]"#);

        let back: AddonSet = serde_json::from_str(r#"["egg","egg","sauce"]"#)?;

        assert_eq!(back.len(), 2);
        assert_eq!(back, set);

        Ok(())
    }
}
