//! The untyped tree every OPS message is parsed into and built from.

use indexmap::IndexMap;

/// A node of the OPS wire grammar.
///
/// The tree keeps the container tag seen on the wire: a `dt_assoc` becomes
/// [`WireValue::Assoc`] and a `dt_array` becomes [`WireValue::Array`], even
/// when the assoc happens to be keyed `"0"`, `"1"`, ... Whether such an assoc
/// is really a list is decided by the typed destination, see
/// [`Assoc::as_sequence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireValue {
    /// Text content of an `item`.
    Scalar(String),
    /// A `dt_assoc` container.
    Assoc(Assoc),
    /// A `dt_array` container.
    Array(Vec<WireValue>),
}

impl WireValue {
    /// Returns the text if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the map if this is an assoc.
    #[must_use]
    pub fn as_assoc(&self) -> Option<&Assoc> {
        match self {
            Self::Assoc(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the elements if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[WireValue]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Whether this node carries no content at all: an empty string, or a
    /// container without children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(s) => s.trim().is_empty(),
            Self::Assoc(a) => a.is_empty(),
            Self::Array(a) => a.is_empty(),
        }
    }

    /// Short name of the node kind, for error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Assoc(_) => "dt_assoc",
            Self::Array(_) => "dt_array",
        }
    }
}

impl From<&str> for WireValue {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_owned())
    }
}

impl From<String> for WireValue {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

impl From<Assoc> for WireValue {
    fn from(a: Assoc) -> Self {
        Self::Assoc(a)
    }
}

impl From<Vec<WireValue>> for WireValue {
    fn from(items: Vec<WireValue>) -> Self {
        Self::Array(items)
    }
}

/// Keyed children of a `dt_assoc`.
///
/// Iteration and encoding follow insertion order, which is what makes the
/// serialized body (and therefore its signature) reproducible. Equality
/// ignores order: two assocs are equal when they hold the same keys with
/// equal values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assoc(IndexMap<String, WireValue>);

impl Assoc {
    /// Create an empty assoc.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert a child, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<WireValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`Assoc::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<WireValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a child by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.0.get(key)
    }

    /// Whether a child with this key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WireValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Interpret the children as a sequence.
    ///
    /// Succeeds only when the keys are exactly the decimal indices
    /// `0..len` (in any order, without leading zeros or signs); the
    /// elements are returned in index order. An empty assoc is an empty
    /// sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<Vec<&WireValue>> {
        let mut slots: Vec<Option<&WireValue>> = vec![None; self.0.len()];
        for (key, value) in &self.0 {
            let index: usize = key.parse().ok()?;
            if index.to_string() != *key {
                return None;
            }
            *slots.get_mut(index)? = Some(value);
        }
        slots.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<WireValue>> FromIterator<(K, V)> for Assoc {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Assoc {
    type Item = (String, WireValue);
    type IntoIter = indexmap::map::IntoIter<String, WireValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
