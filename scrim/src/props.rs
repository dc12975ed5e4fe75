//! Pass-through property bags.
//!
//! An overlay's props are arbitrary key/value data the manager carries from
//! the caller to the host renderer without interpreting it. Props merge in
//! three layers: creation options over manager defaults, then per-open
//! props over both. Later layers win key-by-key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arbitrary key/value properties carried by an overlay instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Props(Map<String, Value>);

impl Props {
    /// Create an empty property bag.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    ///
    /// # Example
    ///
    /// ```
    /// use scrim::props::Props;
    ///
    /// let props = Props::new().with("title", "Delete file?").with("count", 3);
    /// assert_eq!(props.get("count"), Some(&3.into()));
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a value, replacing any existing entry for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look a value up by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Merge `over` on top of `self`. Entries in `over` win.
    pub fn merged(mut self, over: Props) -> Props {
        for (key, value) in over.0 {
            self.0.insert(key, value);
        }
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Props {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_later_layer_wins() {
        let defaults = Props::new().with("title", "untitled").with("dim", true);
        let overrides = Props::new().with("title", "Confirm");
        let merged = defaults.merged(overrides);
        assert_eq!(merged.get("title"), Some(&"Confirm".into()));
        assert_eq!(merged.get("dim"), Some(&true.into()));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn merged_with_empty_is_identity() {
        let props = Props::new().with("a", 1);
        let merged = props.clone().merged(Props::new());
        assert_eq!(merged, props);
    }
}
