//! The set of detectable items for one game.

use std::collections::BTreeSet;

/// Full set of item keys a game can clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCatalog {
    items: BTreeSet<String>,
    final_item: Option<String>,
}

impl ItemCatalog {
    /// Creates a catalog. `final_item` is the item whose clearing ends a
    /// chapter-linear game; it must be part of `items`.
    #[must_use]
    pub fn new(items: BTreeSet<String>, final_item: Option<String>) -> Self {
        let final_item = final_item.filter(|item| items.contains(item));
        Self { items, final_item }
    }

    /// Every item key.
    #[must_use]
    pub fn items(&self) -> &BTreeSet<String> {
        &self.items
    }

    /// The item tied to the final chapter, if any.
    #[must_use]
    pub fn final_item(&self) -> Option<&str> {
        self.final_item.as_deref()
    }

    /// Whether `item` is a known key.
    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        self.items.contains(item)
    }

    /// Catalog items not yet in `cleared`.
    #[must_use]
    pub fn remaining(&self, cleared: &BTreeSet<String>) -> BTreeSet<String> {
        self.items.difference(cleared).cloned().collect()
    }

    /// Whether `cleared` covers the whole catalog.
    #[must_use]
    pub fn is_cleared_by(&self, cleared: &BTreeSet<String>) -> bool {
        self.items.is_subset(cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_remaining_excludes_cleared_items() {
        let catalog = ItemCatalog::new(set(&["clock", "cup"]), None);
        assert_eq!(catalog.remaining(&set(&["cup"])), set(&["clock"]));
        assert!(!catalog.is_cleared_by(&set(&["cup"])));
        assert!(catalog.is_cleared_by(&set(&["cup", "clock"])));
    }

    #[test]
    fn test_final_item_outside_catalog_is_dropped() {
        let catalog = ItemCatalog::new(set(&["cup"]), Some("clock".to_owned()));
        assert_eq!(catalog.final_item(), None);
    }
}
