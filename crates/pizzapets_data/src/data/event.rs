use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A child inscription of a pet (or of a doomsday device), i.e. one
/// feeding event as reported by the data source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeedingEvent {
    pub id: String,
    pub height: u64,
    #[serde(default)]
    pub timestamp: u64,
    /// Arrival order within the source listing.
    #[serde(default)]
    pub index: usize,
}

/// Feeding events indexed by the block height they take effect at,
/// each list kept in arrival order.
pub type EventMap = BTreeMap<u64, Vec<FeedingEvent>>;

/// One page of a paginated children listing.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ChildrenPage {
    pub children: Vec<FeedingEvent>,
    #[serde(default)]
    pub more: bool,
}

impl ChildrenPage {
    /// Folds this page into a height-indexed map, appending after any
    /// events already recorded for the same height.
    pub fn index_into(self, mapping: &mut EventMap) {
        let mut children = self.children;
        children.sort_by_key(|c| c.index);
        for child in children {
            mapping.entry(child.height).or_default().push(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(id: &str, height: u64, index: usize) -> FeedingEvent {
        FeedingEvent {
            id: id.to_string(),
            height,
            timestamp: 0,
            index,
        }
    }

    #[test]
    fn test_index_into_orders_by_arrival() {
        let page = ChildrenPage {
            children: vec![child("b", 5, 1), child("a", 5, 0), child("c", 7, 2)],
            more: false,
        };
        let mut mapping = EventMap::new();
        page.index_into(&mut mapping);
        let ids: Vec<&str> = mapping[&5].iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(mapping[&7].len(), 1);
    }

    #[test]
    fn test_pages_append_at_same_height() {
        let mut mapping = EventMap::new();
        ChildrenPage {
            children: vec![child("a", 5, 0)],
            more: true,
        }
        .index_into(&mut mapping);
        ChildrenPage {
            children: vec![child("b", 5, 1)],
            more: false,
        }
        .index_into(&mut mapping);
        assert_eq!(mapping[&5].len(), 2);
    }
}
