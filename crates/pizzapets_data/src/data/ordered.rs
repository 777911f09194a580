use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// A JSON object that remembers the order its keys were written in.
///
/// Item catalogs, effect lists and the doomsday device mapping are all
/// walked in document order, so a plain `HashMap` would change results.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<T> {
    entries: Vec<(String, T)>,
    /// Key to position in `entries`.
    index: HashMap<String, usize>,
}

impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> OrderedMap<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> FromIterator<(String, T)> for OrderedMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<T: Serialize> Serialize for OrderedMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<T> {
    type Value = OrderedMap<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::new();
        while let Some((key, value)) = access.next_entry::<String, T>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_order_is_kept() {
        let map: OrderedMap<u32> = serde_json::from_str(r#"{"80": 1, "01": 2, "10": 3}"#).unwrap();
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["80", "01", "10"]);
        assert_eq!(map.get("01"), Some(&2));
    }

    #[test]
    fn test_duplicate_key_keeps_first_position() {
        let map: OrderedMap<u32> = serde_json::from_str(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&3));
        assert_eq!(map.keys().next(), Some("a"));
    }

    #[test]
    fn test_lookup_after_many_inserts() {
        let mut map = OrderedMap::new();
        for n in 0..2_000u32 {
            map.insert(format!("{:04x}", n), n);
        }
        map.insert("0010", 99);
        assert_eq!(map.len(), 2_000);
        assert_eq!(map.get("0010"), Some(&99));
        assert_eq!(map.get("07cf"), Some(&1_999));
        assert!(!map.contains_key("07d0"));
        assert_eq!(map.keys().nth(16), Some("0010"));
    }

    #[test]
    fn test_serialize_preserves_order() {
        let map: OrderedMap<u32> = vec![("z".to_string(), 1), ("a".to_string(), 2)]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"z":1,"a":2}"#);
    }
}
