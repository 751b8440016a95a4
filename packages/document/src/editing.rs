//! Caret-level editing on top of the structural tree operations
//!
//! These are the host's default behaviours for typing and deleting.
//! Entities are atomic here too: the caret is only ever placed beside
//! them and deletion removes them whole.

use crate::error::Result;
use crate::key::NodeKey;
use crate::node::{ElementKind, NodeKind, LINK_TYPE};
use crate::selection::{NodeSelection, Point, PointType, RangeSelection, Selection};
use crate::tree::DocumentTree;
use std::cmp::Ordering;

/// Where an inline node goes for the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineTarget {
    /// Inside a text node, which must be split first
    Split { text: NodeKey, offset: usize },
    /// At a child index of an element. Under the root a paragraph is
    /// created to hold the node.
    At { parent: NodeKey, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Backward,
    Forward,
}

impl DocumentTree {
    /// Resolve the insertion target for the current selection
    ///
    /// A range resolves at its focus; a node selection resolves after its
    /// last node in document order.
    pub fn inline_target(&self) -> Option<InlineTarget> {
        match self.selection()? {
            Selection::Range(range) => self.target_for_point(&range.focus),
            Selection::Node(nodes) => {
                let last = self.last_in_document_order(nodes)?;
                let node = self.get(last)?;
                if node.kind().is_block() {
                    return Some(InlineTarget::At {
                        parent: last,
                        index: node.children().len(),
                    });
                }
                Some(InlineTarget::At {
                    parent: self.parent(last)?,
                    index: self.index_in_parent(last)? + 1,
                })
            }
        }
    }

    pub fn target_for_point(&self, point: &Point) -> Option<InlineTarget> {
        if !self.is_valid_point(point) {
            return None;
        }
        match point.kind {
            PointType::Element => Some(InlineTarget::At {
                parent: point.key,
                index: point.offset,
            }),
            PointType::Text => {
                let len = self.text(point.key)?.len();
                let parent = self.parent(point.key)?;
                let index = self.index_in_parent(point.key)?;
                if point.offset == 0 {
                    Some(InlineTarget::At { parent, index })
                } else if point.offset >= len {
                    Some(InlineTarget::At {
                        parent,
                        index: index + 1,
                    })
                } else {
                    Some(InlineTarget::Split {
                        text: point.key,
                        offset: point.offset,
                    })
                }
            }
        }
    }

    pub fn insert_inline(&mut self, target: InlineTarget, kind: NodeKind) -> Result<NodeKey> {
        match target {
            InlineTarget::Split { text, offset } => {
                let right = self.split_text(text, offset)?;
                self.insert_before(right, kind)
            }
            InlineTarget::At { parent, index } if self.is_root(parent) => {
                let paragraph = self.insert_at(parent, index, NodeKind::paragraph())?;
                self.append(paragraph, kind)
            }
            InlineTarget::At { parent, index } => self.insert_at(parent, index, kind),
        }
    }

    /// The root's last paragraph, created when the root has none
    pub fn last_paragraph_or_create(&mut self) -> Result<NodeKey> {
        let root = self.root();
        match self.children(root).last() {
            Some(last) => Ok(*last),
            None => self.append(root, NodeKind::paragraph()),
        }
    }

    // ---- caret placement ----

    /// Collapse the selection immediately after `key`
    pub fn select_after(&mut self, key: NodeKey) -> Result<()> {
        let point = match self.next_sibling(key) {
            Some(next) if self.get(next).is_some_and(|n| n.is_text()) => Point::text(next, 0),
            _ => {
                let parent = self.parent(key).unwrap_or(self.root());
                let index = self.index_in_parent(key).map_or(0, |i| i + 1);
                Point::element(parent, index)
            }
        };
        self.set_selection(Some(Selection::caret(point)));
        Ok(())
    }

    /// Collapse the selection at the end of `key`'s content
    pub fn select_end(&mut self, key: NodeKey) -> Result<()> {
        let node = self.node(key)?;
        let point = match node.kind() {
            NodeKind::Text(text) => Point::text(key, text.len()),
            NodeKind::Element(element) => Point::element(key, element.children.len()),
            NodeKind::Entity(_) => return self.select_after(key),
        };
        self.set_selection(Some(Selection::caret(point)));
        Ok(())
    }

    /// Select `key` as a node selection, replacing any range, or adding to
    /// an existing node selection when `extend` is set
    pub fn select_node(&mut self, key: NodeKey, extend: bool) {
        let mut nodes = match self.selection() {
            Some(Selection::Node(nodes)) if extend => nodes.clone(),
            _ => NodeSelection::new(),
        };
        nodes.add(key);
        self.set_selection(Some(Selection::Node(nodes)));
    }

    /// The node right before a collapsed caret, without crossing elements
    pub fn node_before_caret(&self) -> Option<NodeKey> {
        let caret = self.selection()?.caret_point()?;
        match caret.kind {
            PointType::Text if caret.offset == 0 => self.previous_sibling(caret.key),
            PointType::Text => None,
            PointType::Element => caret
                .offset
                .checked_sub(1)
                .and_then(|i| self.children(caret.key).get(i).copied()),
        }
    }

    /// The node right after a collapsed caret, without crossing elements
    pub fn node_after_caret(&self) -> Option<NodeKey> {
        let caret = self.selection()?.caret_point()?;
        match caret.kind {
            PointType::Text => {
                let len = self.text(caret.key)?.len();
                if caret.offset >= len {
                    self.next_sibling(caret.key)
                } else {
                    None
                }
            }
            PointType::Element => self.children(caret.key).get(caret.offset).copied(),
        }
    }

    /// Remove an inline node and leave the caret where it was: at the end
    /// of the previous text sibling, else the start of the next one, else
    /// at the removal site. Links left empty are removed with it.
    pub fn remove_and_collapse(&mut self, key: NodeKey) -> Result<()> {
        let key = self.outermost_sole_link(key);
        let parent = self.node(key)?.parent().unwrap_or(self.root());
        let index = self.index_in_parent(key).unwrap_or(0);

        let previous = self.previous_sibling(key).and_then(|k| self.text(k).map(|t| (k, t.len())));
        let next = self.next_sibling(key).filter(|k| self.text(*k).is_some());
        let point = match (previous, next) {
            (Some((prev, len)), _) => Point::text(prev, len),
            (None, Some(next)) => Point::text(next, 0),
            (None, None) => Point::element(parent, index),
        };

        self.set_selection(Some(Selection::caret(point)));
        self.remove(key)
    }

    // Climb through links whose only child is `key`
    fn outermost_sole_link(&self, mut key: NodeKey) -> NodeKey {
        while let Some(parent) = self.parent(key) {
            let is_link = self.get(parent).map(|n| n.type_tag()) == Some(LINK_TYPE);
            if !is_link || self.children(parent).len() != 1 {
                break;
            }
            key = parent;
        }
        key
    }

    /// Remove several nodes, the caret ending where the first one was
    pub fn remove_nodes_and_collapse(&mut self, keys: &[NodeKey]) -> Result<()> {
        let mut ordered: Vec<_> = keys.iter().copied().filter(|k| self.contains(*k)).collect();
        ordered.sort_by_key(|k| self.path(*k));

        let mut iter = ordered.into_iter();
        if let Some(first) = iter.next() {
            self.remove_and_collapse(first)?;
        }
        for key in iter {
            if self.contains(key) {
                self.remove(key)?;
            }
        }
        Ok(())
    }

    // ---- typing ----

    /// Insert text at the selection. Returns false when there is none.
    pub fn insert_text(&mut self, text: &str) -> Result<bool> {
        if text.is_empty() {
            return Ok(false);
        }
        let Some(selection) = self.selection().cloned() else {
            return Ok(false);
        };

        let caret = match selection {
            Selection::Node(_) => {
                let Some(target) = self.inline_target() else {
                    return Ok(false);
                };
                let key = self.insert_inline(target, NodeKind::text(text))?;
                self.select_end(key)?;
                return Ok(true);
            }
            Selection::Range(range) if !range.is_collapsed() => {
                self.delete_range(range)?;
                match self.selection().and_then(Selection::caret_point) {
                    Some(caret) => caret,
                    None => return Ok(false),
                }
            }
            Selection::Range(range) => range.focus,
        };

        if !self.is_valid_point(&caret) {
            return Ok(false);
        }

        let len = text.chars().count();
        match caret.kind {
            PointType::Text => {
                self.insert_text_at(caret.key, caret.offset, text)?;
                self.set_selection(Some(Selection::caret(Point::text(caret.key, caret.offset + len))));
            }
            PointType::Element => {
                let children = self.children(caret.key);
                let before = caret.offset.checked_sub(1).and_then(|i| children.get(i).copied());
                let after = children.get(caret.offset).copied();

                if let Some(prev) = before.filter(|k| self.text(*k).is_some()) {
                    let end = self.text(prev).map_or(0, |t| t.len());
                    self.insert_text_at(prev, end, text)?;
                    self.set_selection(Some(Selection::caret(Point::text(prev, end + len))));
                } else if let Some(next) = after.filter(|k| self.text(*k).is_some()) {
                    self.insert_text_at(next, 0, text)?;
                    self.set_selection(Some(Selection::caret(Point::text(next, len))));
                } else {
                    let target = InlineTarget::At {
                        parent: caret.key,
                        index: caret.offset,
                    };
                    let key = self.insert_inline(target, NodeKind::text(text))?;
                    self.select_end(key)?;
                }
            }
        }
        Ok(true)
    }

    // ---- deletion ----

    /// Delete backward: the selected nodes, the selected range, one
    /// character, or a whole adjacent entity. Returns whether anything
    /// changed.
    pub fn delete_backward(&mut self) -> Result<bool> {
        self.delete(Direction::Backward)
    }

    /// Forward counterpart of [`DocumentTree::delete_backward`]
    pub fn delete_forward(&mut self) -> Result<bool> {
        self.delete(Direction::Forward)
    }

    fn delete(&mut self, direction: Direction) -> Result<bool> {
        match self.selection().cloned() {
            None => Ok(false),
            Some(Selection::Node(nodes)) => {
                if nodes.is_empty() {
                    return Ok(false);
                }
                let keys: Vec<_> = nodes.keys().collect();
                self.remove_nodes_and_collapse(&keys)?;
                Ok(true)
            }
            Some(Selection::Range(range)) if !range.is_collapsed() => {
                self.delete_range(range)?;
                Ok(true)
            }
            Some(Selection::Range(_)) => self.delete_at_caret(direction),
        }
    }

    fn delete_at_caret(&mut self, direction: Direction) -> Result<bool> {
        // Every pass either deletes something or moves the caret strictly
        // towards the edge of the document
        loop {
            let Some(caret) = self.selection().and_then(Selection::caret_point) else {
                return Ok(false);
            };
            if !self.is_valid_point(&caret) {
                return Ok(false);
            }

            if caret.is_text() {
                let len = self.text(caret.key).map_or(0, |t| t.len());
                let inside = match direction {
                    Direction::Backward => caret.offset > 0,
                    Direction::Forward => caret.offset < len,
                };
                if inside {
                    let from = match direction {
                        Direction::Backward => caret.offset - 1,
                        Direction::Forward => caret.offset,
                    };
                    self.remove_text_range(caret.key, from, from + 1)?;
                    self.set_selection(Some(Selection::caret(Point::text(caret.key, from))));
                    if self.text(caret.key).is_some_and(|t| t.is_empty()) {
                        self.remove_and_collapse(caret.key)?;
                    }
                    return Ok(true);
                }
            }

            let neighbour = match direction {
                Direction::Backward => self.node_before_caret(),
                Direction::Forward => self.node_after_caret(),
            };

            let Some(neighbour) = neighbour else {
                return self.delete_across_boundary(caret, direction);
            };

            let node = self.node(neighbour)?;
            match node.kind() {
                NodeKind::Entity(_) => {
                    self.remove_and_collapse(neighbour)?;
                    return Ok(true);
                }
                NodeKind::Text(text) if text.is_empty() => {
                    self.remove(neighbour)?;
                }
                NodeKind::Text(text) => {
                    let point = match direction {
                        Direction::Backward => Point::text(neighbour, text.len()),
                        Direction::Forward => Point::text(neighbour, 0),
                    };
                    self.set_selection(Some(Selection::caret(point)));
                }
                NodeKind::Element(element) => {
                    let point = match direction {
                        Direction::Backward => Point::element(neighbour, element.children.len()),
                        Direction::Forward => Point::element(neighbour, 0),
                    };
                    self.set_selection(Some(Selection::caret(point)));
                }
            }
        }
    }

    // The caret is at the edge of its container: step out of a link, or
    // join the block with its neighbour.
    fn delete_across_boundary(&mut self, caret: Point, direction: Direction) -> Result<bool> {
        let container = match caret.kind {
            PointType::Text => match self.parent(caret.key) {
                Some(parent) => parent,
                None => return Ok(false),
            },
            PointType::Element => caret.key,
        };

        let Some(element) = self.get(container).and_then(|n| n.as_element()) else {
            return Ok(false);
        };

        match element.kind {
            ElementKind::Link { .. } => {
                let parent = self.parent(container).unwrap_or(self.root());
                let index = self.index_in_parent(container).unwrap_or(0);
                let offset = match direction {
                    Direction::Backward => index,
                    Direction::Forward => index + 1,
                };
                self.set_selection(Some(Selection::caret(Point::element(parent, offset))));
                self.delete_at_caret(direction)
            }
            ElementKind::Paragraph => {
                let (into, from) = match direction {
                    Direction::Backward => match self.previous_sibling(container) {
                        Some(previous) => (previous, container),
                        None => return Ok(false),
                    },
                    Direction::Forward => match self.next_sibling(container) {
                        Some(next) => (container, next),
                        None => return Ok(false),
                    },
                };
                self.merge_blocks(into, from, direction)?;
                Ok(true)
            }
            ElementKind::Root => Ok(false),
        }
    }

    // Move `from`'s children to the end of `into` and drop `from`
    fn merge_blocks(&mut self, into: NodeKey, from: NodeKey, direction: Direction) -> Result<()> {
        let join = self.children(into).len();
        if direction == Direction::Backward {
            let point = match self.children(into).last().copied() {
                Some(last) if self.text(last).is_some() => {
                    Point::text(last, self.text(last).map_or(0, |t| t.len()))
                }
                _ => Point::element(into, join),
            };
            self.set_selection(Some(Selection::caret(point)));
        }

        let children = self.children(from).to_vec();
        for (i, child) in children.into_iter().enumerate() {
            self.move_node(child, into, join + i)?;
        }
        self.remove(from)
    }

    /// Delete everything between the two ends of `range` and collapse to
    /// its start. Blocks spanned by the range are joined.
    pub fn delete_range(&mut self, range: RangeSelection) -> Result<()> {
        let (start, end) = match self.compare_points(&range.anchor, &range.focus) {
            Ordering::Greater => (range.focus, range.anchor),
            _ => (range.anchor, range.focus),
        };
        if !self.is_valid_point(&start) || !self.is_valid_point(&end) {
            return Ok(());
        }

        if start.key == end.key && start.is_text() {
            self.remove_text_range(start.key, start.offset, end.offset)?;
            self.set_selection(Some(Selection::caret(start)));
            return Ok(());
        }

        let start_pos = self.position(&start);
        let end_pos = self.position(&end);
        let start_block = self.block_of(start.key);
        let end_block = self.block_of(end.key);

        // Plan first: positions shift once deletion begins
        let mut removals = Vec::new();
        let mut trims = Vec::new();
        for leaf in self.inline_leaves() {
            let Some(node) = self.get(leaf) else { continue };
            let mut leaf_start = self.path(leaf);
            let mut leaf_end = leaf_start.clone();
            leaf_start.push(0);
            leaf_end.push(node.content_len());
            if leaf_end <= start_pos || leaf_start >= end_pos {
                continue;
            }

            match node.as_text() {
                Some(text) => {
                    let from = if leaf == start.key { start.offset } else { 0 };
                    let to = if leaf == end.key { end.offset } else { text.len() };
                    if from == 0 && to == text.len() && leaf != start.key {
                        removals.push(leaf);
                    } else {
                        trims.push((leaf, from, to));
                    }
                }
                None => removals.push(leaf),
            }
        }

        let root_children = self.children(self.root()).to_vec();
        let block_index = |block: Option<NodeKey>| block.and_then(|b| root_children.iter().position(|k| *k == b));
        let between: Vec<NodeKey> = match (block_index(start_block), block_index(end_block)) {
            (Some(s), Some(e)) if e > s + 1 => root_children[s + 1..e].to_vec(),
            _ => Vec::new(),
        };

        for (leaf, from, to) in trims {
            self.remove_text_range(leaf, from, to)?;
        }
        for leaf in removals {
            if self.contains(leaf) {
                self.remove(leaf)?;
            }
        }
        for block in between {
            if self.contains(block) {
                self.remove(block)?;
            }
        }
        if let (Some(into), Some(from)) = (start_block, end_block) {
            if into != from && self.contains(from) {
                let join = self.children(into).len();
                let children = self.children(from).to_vec();
                for (i, child) in children.into_iter().enumerate() {
                    self.move_node(child, into, join + i)?;
                }
                self.remove(from)?;
            }
        }

        self.set_selection(Some(Selection::caret(start)));
        Ok(())
    }

    /// Text and entity nodes in document order
    pub fn inline_leaves(&self) -> Vec<NodeKey> {
        self.descendants(self.root())
            .into_iter()
            .filter(|key| self.get(*key).is_some_and(|n| !n.is_element()))
            .collect()
    }

    fn last_in_document_order(&self, nodes: &NodeSelection) -> Option<NodeKey> {
        nodes
            .keys()
            .filter(|key| self.contains(*key))
            .max_by_key(|key| self.path(*key))
    }
}
