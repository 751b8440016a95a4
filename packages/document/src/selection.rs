use crate::key::NodeKey;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointType {
    /// Character offset inside a text node
    Text,
    /// Child index inside an element
    Element,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub key: NodeKey,
    pub offset: usize,
    pub kind: PointType,
}

impl Point {
    pub fn text(key: NodeKey, offset: usize) -> Self {
        Self {
            key,
            offset,
            kind: PointType::Text,
        }
    }

    pub fn element(key: NodeKey, offset: usize) -> Self {
        Self {
            key,
            offset,
            kind: PointType::Element,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == PointType::Text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSelection {
    pub anchor: Point,
    pub focus: Point,
}

impl RangeSelection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn caret(point: Point) -> Self {
        Self::new(point, point)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// A set of whole nodes, selected as units
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSelection {
    keys: BTreeSet<NodeKey>,
}

impl NodeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(key: NodeKey) -> Self {
        let mut selection = Self::new();
        selection.add(key);
        selection
    }

    pub fn add(&mut self, key: NodeKey) {
        self.keys.insert(key);
    }

    pub fn remove(&mut self, key: NodeKey) -> bool {
        self.keys.remove(&key)
    }

    pub fn has(&self, key: NodeKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.keys.iter().copied()
    }
}

impl FromIterator<NodeKey> for NodeSelection {
    fn from_iter<I: IntoIterator<Item = NodeKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Range(RangeSelection),
    Node(NodeSelection),
}

impl Selection {
    pub fn caret(point: Point) -> Self {
        Selection::Range(RangeSelection::caret(point))
    }

    pub fn as_range(&self) -> Option<&RangeSelection> {
        match self {
            Selection::Range(range) => Some(range),
            Selection::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&NodeSelection> {
        match self {
            Selection::Node(nodes) => Some(nodes),
            Selection::Range(_) => None,
        }
    }

    /// The caret point if this is a collapsed range
    pub fn caret_point(&self) -> Option<Point> {
        self.as_range()
            .filter(|range| range.is_collapsed())
            .map(|range| range.focus)
    }

    pub fn contains_node(&self, key: NodeKey) -> bool {
        self.as_node().is_some_and(|nodes| nodes.has(key))
    }
}
