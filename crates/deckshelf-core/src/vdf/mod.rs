//! Binary key-value codec for the game client's shortcut store.
//!
//! # Format
//!
//! A document is a map. A map is a sequence of entries terminated by a
//! single `0x08` byte. Each entry is a type marker, a key, and a value:
//!
//! | marker | value                                   |
//! |--------|-----------------------------------------|
//! | `0x00` | nested map                              |
//! | `0x01` | NUL-terminated UTF-8 string             |
//! | `0x02` | 4-byte little-endian unsigned integer   |
//!
//! Keys are NUL-terminated strings. Neither keys nor string values may
//! contain an embedded NUL byte.
//!
//! Entry order is preserved in both directions so a re-saved file diffs
//! cleanly against the previous one.

mod reader;
mod writer;

pub use reader::decode;
pub use writer::encode;

pub(crate) const MARKER_MAP: u8 = 0x00;
pub(crate) const MARKER_STRING: u8 = 0x01;
pub(crate) const MARKER_NUMBER: u8 = 0x02;
pub(crate) const MARKER_END_OF_MAP: u8 = 0x08;
pub(crate) const END_OF_STRING: u8 = 0x00;

/// A value in a binary document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Map(VdfMap),
    String(String),
    Number(u32),
}

impl Node {
    pub fn as_map(&self) -> Option<&VdfMap> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Node::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Type name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Map(_) => "map",
            Node::String(_) => "string",
            Node::Number(_) => "number",
        }
    }
}

impl From<VdfMap> for Node {
    fn from(map: VdfMap) -> Self {
        Node::Map(map)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Node::Number(value)
    }
}

/// An insertion-ordered map of string keys to nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VdfMap {
    entries: Vec<(String, Node)>,
}

impl VdfMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. An existing key keeps its position and takes the new
    /// value; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Node>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_map(&self, key: &str) -> Option<&VdfMap> {
        self.get(key).and_then(Node::as_map)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Node::as_str)
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(Node::as_u32)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for VdfMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = VdfMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
