use super::RawValue;
use compact_str::CompactString;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// An insertion-ordered map with unique string keys.
///
/// Documents are small, so lookups are linear scans.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields<V> {
    entries: Vec<(CompactString, V)>,
}

/// A plain key/value document.
pub type SimpleMapping = Fields<RawValue>;

/// One object from a list-of-objects document, before grouping.
pub type FlatRecord = Fields<FieldValue>;

/// The value stored under a field of a [`FlatRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(RawValue),
    List(Vec<NestedItem>),
}

/// One entry of a nested list such as `controls` or `healthy`.
#[derive(Debug, Clone, PartialEq)]
pub enum NestedItem {
    Record(Fields<RawValue>),
    Value(RawValue),
}

impl<V> Fields<V> {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Insert a value, replacing any existing value for the key in place.
    ///
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<CompactString>, value: V) -> Option<V> {
        let key = key.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(core::mem::replace(existing, value));
        }

        self.entries.push((key, value));
        None
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for Fields<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<CompactString>, V> FromIterator<(K, V)> for Fields<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (k, v) in iter {
            let _ = fields.insert(k, v);
        }
        fields
    }
}

impl<V: Serialize> Serialize for Fields<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k.as_str(), v)?;
        }
        map.end()
    }
}

impl FlatRecord {
    /// Returns the scalar stored under `key`, ignoring nested lists.
    #[must_use]
    pub fn scalar(&self, key: &str) -> Option<&RawValue> {
        match self.get(key)? {
            FieldValue::Scalar(value) => Some(value),
            FieldValue::List(_) => None,
        }
    }

    /// Returns the nested list stored under `key`.
    #[must_use]
    pub fn list(&self, key: &str) -> Option<&[NestedItem]> {
        match self.get(key)? {
            FieldValue::List(items) => Some(items),
            FieldValue::Scalar(_) => None,
        }
    }

    /// Returns the scalar under `key` unless it is missing or the empty string.
    #[must_use]
    pub fn non_empty(&self, key: &str) -> Option<&RawValue> {
        self.scalar(key).filter(|v| !v.is_empty())
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(value) => value.serialize(serializer),
            Self::List(items) => items.serialize(serializer),
        }
    }
}

impl Serialize for NestedItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Record(fields) => fields.serialize(serializer),
            Self::Value(value) => value.serialize(serializer),
        }
    }
}
