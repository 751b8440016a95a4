//! Keyed document tree
//!
//! The tree owns every node in a flat map and records which keys were
//! created, updated and destroyed since the last [`DocumentTree::take_changes`].
//! Structural edits keep the selection valid: points into removed nodes
//! are moved to the removal site and element offsets are shifted.

use crate::error::{DocumentError, Result};
use crate::key::{KeyAllocator, NodeKey};
use crate::node::{ElementKind, ElementNode, Node, NodeKind, TextFormat, TextNode};
use crate::selection::{Point, PointType, Selection};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Keys touched since the last commit, with the type tag of created and
/// destroyed nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub created: BTreeMap<NodeKey, &'static str>,
    pub updated: BTreeSet<NodeKey>,
    pub destroyed: BTreeMap<NodeKey, &'static str>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.destroyed.is_empty()
    }

    /// Created and updated keys
    pub fn dirty(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.created.keys().chain(self.updated.iter()).copied()
    }
}

#[derive(Debug, Clone)]
pub struct DocumentTree {
    nodes: HashMap<NodeKey, Node>,
    root: NodeKey,
    selection: Option<Selection>,
    keys: KeyAllocator,
    changes: ChangeSet,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree {
    pub fn new() -> Self {
        let mut keys = KeyAllocator::new();
        let root = keys.allocate();
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                key: root,
                parent: None,
                kind: NodeKind::Element(ElementNode {
                    kind: ElementKind::Root,
                    children: Vec::new(),
                }),
            },
        );

        Self {
            nodes,
            root,
            selection: None,
            keys,
            changes: ChangeSet::default(),
        }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(&key)
    }

    pub fn node(&self, key: NodeKey) -> Result<&Node> {
        self.nodes.get(&key).ok_or(DocumentError::NodeNotFound(key))
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.get(key).map(Node::children).unwrap_or(&[])
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.get(key).and_then(Node::parent)
    }

    pub fn index_in_parent(&self, key: NodeKey) -> Option<usize> {
        let parent = self.parent(key)?;
        self.children(parent).iter().position(|child| *child == key)
    }

    pub fn previous_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let index = self.index_in_parent(key)?;
        let parent = self.parent(key)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    pub fn next_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let index = self.index_in_parent(key)?;
        let parent = self.parent(key)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn text(&self, key: NodeKey) -> Option<&TextNode> {
        self.get(key).and_then(Node::as_text)
    }

    pub fn is_root(&self, key: NodeKey) -> bool {
        key == self.root
    }

    /// The root child containing `key` (or `key` itself when it is one)
    pub fn block_of(&self, key: NodeKey) -> Option<NodeKey> {
        let mut current = key;
        loop {
            let parent = self.parent(current)?;
            if parent == self.root {
                return Some(current);
            }
            current = parent;
        }
    }

    /// `key` and everything below it, in document order
    pub fn descendants(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    pub fn nodes_of_type(&self, node_type: &str) -> Vec<NodeKey> {
        self.descendants(self.root)
            .into_iter()
            .filter(|key| self.get(*key).is_some_and(|n| n.type_tag() == node_type))
            .collect()
    }

    /// Plain text of the whole document; blocks are separated by a blank line
    pub fn text_content(&self) -> String {
        self.children(self.root)
            .iter()
            .map(|block| self.node_text_content(*block))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn node_text_content(&self, key: NodeKey) -> String {
        let Some(node) = self.get(key) else {
            return String::new();
        };
        match &node.kind {
            NodeKind::Text(text) => text.text.clone(),
            NodeKind::Entity(entity) => entity.text_content(),
            NodeKind::Element(_) if key == self.root => self.text_content(),
            NodeKind::Element(element) => element
                .children
                .iter()
                .map(|child| self.node_text_content(*child))
                .collect(),
        }
    }

    // ---- structural edits ----

    pub fn append(&mut self, parent: NodeKey, kind: NodeKind) -> Result<NodeKey> {
        let index = self.node(parent)?.children().len();
        self.insert_at(parent, index, kind)
    }

    pub fn insert_at(&mut self, parent: NodeKey, index: usize, mut kind: NodeKind) -> Result<NodeKey> {
        self.check_insert(parent, index, &kind)?;
        if let NodeKind::Element(element) = &mut kind {
            element.children.clear();
        }

        let key = self.keys.allocate();
        let node_type = kind.type_tag();
        self.nodes.insert(
            key,
            Node {
                key,
                parent: Some(parent),
                kind,
            },
        );
        self.children_mut(parent)?.insert(index, key);
        self.shift_element_points(parent, index, 1);
        self.changes.created.insert(key, node_type);
        self.mark_dirty(parent);
        Ok(key)
    }

    pub fn insert_before(&mut self, sibling: NodeKey, kind: NodeKind) -> Result<NodeKey> {
        let (parent, index) = self.location(sibling)?;
        self.insert_at(parent, index, kind)
    }

    pub fn insert_after(&mut self, sibling: NodeKey, kind: NodeKind) -> Result<NodeKey> {
        let (parent, index) = self.location(sibling)?;
        self.insert_at(parent, index + 1, kind)
    }

    /// Remove `key` and its whole subtree
    pub fn remove(&mut self, key: NodeKey) -> Result<()> {
        let (parent, index) = self.location(key)?;
        let removed = self.descendants(key);

        self.children_mut(parent)?.remove(index);
        for gone in &removed {
            if let Some(node) = self.nodes.remove(gone) {
                self.changes.updated.remove(gone);
                // Created and destroyed within one batch: nobody saw it
                if self.changes.created.remove(gone).is_none() {
                    self.changes.destroyed.insert(*gone, node.type_tag());
                }
            }
        }

        self.repair_selection_after_removal(&removed, parent, index);
        self.mark_dirty(parent);
        tracing::trace!(%key, count = removed.len(), "removed subtree");
        Ok(())
    }

    /// Put a new node where `key` is; element children carry over when
    /// both nodes are elements. Returns the new key.
    pub fn replace(&mut self, key: NodeKey, kind: NodeKind) -> Result<NodeKey> {
        let (parent, index) = self.location(key)?;
        let carry_children = self.node(key)?.is_element() && matches!(kind, NodeKind::Element(_));

        let new_key = self.insert_at(parent, index, kind)?;
        if carry_children {
            let children = self.children(key).to_vec();
            for (i, child) in children.into_iter().enumerate() {
                self.move_node(child, new_key, i)?;
            }
        }
        self.remove(key)?;
        Ok(new_key)
    }

    /// Detach `key` and attach it under `parent` at `index`
    pub fn move_node(&mut self, key: NodeKey, parent: NodeKey, index: usize) -> Result<()> {
        let (old_parent, old_index) = self.location(key)?;
        if self.descendants(key).contains(&parent) {
            return Err(DocumentError::InvalidChild {
                parent: self.node(parent)?.type_tag(),
                child: self.node(key)?.type_tag(),
            });
        }
        self.check_child(parent, &self.node(key)?.kind)?;

        let available = self.children(parent).len() - usize::from(parent == old_parent);
        if index > available {
            return Err(DocumentError::OffsetOutOfRange { key: parent, offset: index });
        }

        self.children_mut(old_parent)?.remove(old_index);
        self.shift_element_points_after_removal(old_parent, old_index);
        self.mark_dirty(old_parent);

        self.children_mut(parent)?.insert(index, key);
        self.shift_element_points(parent, index, 1);
        if let Some(node) = self.nodes.get_mut(&key) {
            node.parent = Some(parent);
        }
        self.mark_dirty(key);
        Ok(())
    }

    // ---- text edits ----

    pub fn set_text(&mut self, key: NodeKey, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        let len = text.chars().count();
        let node = self.text_mut(key)?;
        if node.text == text {
            return Ok(());
        }
        node.text = text;
        self.map_points(|point| match point.kind {
            PointType::Text if point.key == key && point.offset > len => Point::text(key, len),
            _ => point,
        });
        self.mark_dirty(key);
        Ok(())
    }

    /// Returns whether the style changed
    pub fn set_text_style(&mut self, key: NodeKey, style: impl Into<String>) -> Result<bool> {
        let style = style.into();
        let node = self.text_mut(key)?;
        if node.style == style {
            return Ok(false);
        }
        node.style = style;
        self.mark_dirty(key);
        Ok(true)
    }

    /// Returns whether the format changed
    pub fn set_text_format(&mut self, key: NodeKey, format: TextFormat) -> Result<bool> {
        let node = self.text_mut(key)?;
        if node.format == format {
            return Ok(false);
        }
        node.format = format;
        self.mark_dirty(key);
        Ok(true)
    }

    pub fn insert_text_at(&mut self, key: NodeKey, offset: usize, text: &str) -> Result<()> {
        let node = self.text_mut(key)?;
        let byte = char_to_byte(&node.text, offset).ok_or(DocumentError::OffsetOutOfRange { key, offset })?;
        node.text.insert_str(byte, text);
        self.mark_dirty(key);
        Ok(())
    }

    /// Remove characters `from..to` of a text node
    pub fn remove_text_range(&mut self, key: NodeKey, from: usize, to: usize) -> Result<()> {
        let node = self.text_mut(key)?;
        let (Some(start), Some(end)) = (char_to_byte(&node.text, from), char_to_byte(&node.text, to)) else {
            return Err(DocumentError::OffsetOutOfRange { key, offset: to });
        };
        if start >= end {
            return Ok(());
        }
        node.text.replace_range(start..end, "");

        let removed = to - from;
        self.map_points(|point| match point.kind {
            PointType::Text if point.key == key && point.offset > from => {
                Point::text(key, point.offset.saturating_sub(removed).max(from))
            }
            _ => point,
        });
        self.mark_dirty(key);
        Ok(())
    }

    /// Split a text node at a character offset. The left part keeps the
    /// key; the right part is a new sibling with the same format, returned.
    pub fn split_text(&mut self, key: NodeKey, offset: usize) -> Result<NodeKey> {
        let node = self.text_mut(key)?;
        let byte = char_to_byte(&node.text, offset).ok_or(DocumentError::OffsetOutOfRange { key, offset })?;
        let right = TextNode {
            text: node.text.split_off(byte),
            format: node.format,
            style: node.style.clone(),
        };

        let right_key = self.insert_after(key, NodeKind::Text(right))?;
        self.map_points(|point| match point.kind {
            PointType::Text if point.key == key && point.offset > offset => {
                Point::text(right_key, point.offset - offset)
            }
            _ => point,
        });
        self.mark_dirty(key);
        Ok(right_key)
    }

    // ---- selection ----

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    pub fn is_node_selected(&self, key: NodeKey) -> bool {
        self.selection.as_ref().is_some_and(|s| s.contains_node(key))
    }

    /// A point is valid when it names a live node of the right kind with
    /// an offset inside it
    pub fn is_valid_point(&self, point: &Point) -> bool {
        let Some(node) = self.get(point.key) else {
            return false;
        };
        match point.kind {
            PointType::Text => node.as_text().is_some_and(|t| point.offset <= t.len()),
            PointType::Element => node.as_element().is_some_and(|e| point.offset <= e.children.len()),
        }
    }

    /// Document-order comparison of two points
    pub fn compare_points(&self, a: &Point, b: &Point) -> Ordering {
        self.position(a).cmp(&self.position(b))
    }

    /// Child-index path from the root to `key`
    pub fn path(&self, key: NodeKey) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = key;
        while let Some(index) = self.index_in_parent(current) {
            path.push(index);
            match self.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        path.reverse();
        path
    }

    pub(crate) fn position(&self, point: &Point) -> Vec<usize> {
        let mut position = self.path(point.key);
        position.push(point.offset);
        position
    }

    // ---- change tracking ----

    /// Mark `key` and its ancestors as updated
    pub fn mark_dirty(&mut self, key: NodeKey) {
        let mut current = Some(key);
        while let Some(key) = current {
            if !self.contains(key) {
                break;
            }
            if !self.changes.created.contains_key(&key) {
                self.changes.updated.insert(key);
            }
            current = self.parent(key);
        }
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    pub fn take_changes(&mut self) -> ChangeSet {
        std::mem::take(&mut self.changes)
    }

    /// Keep allocating past every key `other` has handed out
    pub fn adopt_keys(&mut self, other: &DocumentTree) {
        self.keys.advance_past(&other.keys);
    }

    // ---- internals ----

    fn location(&self, key: NodeKey) -> Result<(NodeKey, usize)> {
        if key == self.root {
            return Err(DocumentError::RootImmutable);
        }
        self.node(key)?;
        let parent = self.parent(key).ok_or(DocumentError::NodeNotFound(key))?;
        let index = self
            .index_in_parent(key)
            .ok_or(DocumentError::NodeNotFound(key))?;
        Ok((parent, index))
    }

    fn check_insert(&self, parent: NodeKey, index: usize, kind: &NodeKind) -> Result<()> {
        self.check_child(parent, kind)?;
        if index > self.children(parent).len() {
            return Err(DocumentError::OffsetOutOfRange { key: parent, offset: index });
        }
        Ok(())
    }

    fn check_child(&self, parent: NodeKey, kind: &NodeKind) -> Result<()> {
        let parent_node = self.node(parent)?;
        let Some(element) = parent_node.as_element() else {
            return Err(DocumentError::NotAnElement(parent));
        };

        let allowed = match element.kind {
            ElementKind::Root => kind.is_block(),
            ElementKind::Paragraph => kind.is_inline(),
            // Links hold leaves only
            ElementKind::Link { .. } => kind.is_inline() && !matches!(kind, NodeKind::Element(_)),
        };
        if allowed {
            Ok(())
        } else {
            Err(DocumentError::InvalidChild {
                parent: parent_node.type_tag(),
                child: kind.type_tag(),
            })
        }
    }

    fn children_mut(&mut self, key: NodeKey) -> Result<&mut Vec<NodeKey>> {
        match self.nodes.get_mut(&key) {
            Some(Node {
                kind: NodeKind::Element(element),
                ..
            }) => Ok(&mut element.children),
            Some(_) => Err(DocumentError::NotAnElement(key)),
            None => Err(DocumentError::NodeNotFound(key)),
        }
    }

    fn text_mut(&mut self, key: NodeKey) -> Result<&mut TextNode> {
        match self.nodes.get_mut(&key) {
            Some(Node {
                kind: NodeKind::Text(text),
                ..
            }) => Ok(text),
            Some(_) => Err(DocumentError::NotText(key)),
            None => Err(DocumentError::NodeNotFound(key)),
        }
    }

    fn map_points(&mut self, f: impl Fn(Point) -> Point) {
        if let Some(Selection::Range(range)) = &mut self.selection {
            range.anchor = f(range.anchor);
            range.focus = f(range.focus);
        }
    }

    fn shift_element_points(&mut self, parent: NodeKey, index: usize, by: usize) {
        self.map_points(|point| match point.kind {
            PointType::Element if point.key == parent && point.offset > index => {
                Point::element(parent, point.offset + by)
            }
            _ => point,
        });
    }

    fn shift_element_points_after_removal(&mut self, parent: NodeKey, index: usize) {
        self.map_points(|point| match point.kind {
            PointType::Element if point.key == parent && point.offset > index => {
                Point::element(parent, point.offset - 1)
            }
            _ => point,
        });
    }

    fn repair_selection_after_removal(&mut self, removed: &[NodeKey], parent: NodeKey, index: usize) {
        if let Some(Selection::Node(nodes)) = &mut self.selection {
            for key in removed {
                nodes.remove(*key);
            }
            return;
        }

        self.shift_element_points_after_removal(parent, index);
        self.map_points(|point| {
            if removed.contains(&point.key) {
                Point::element(parent, index)
            } else {
                point
            }
        });
    }
}

/// Byte index of a character offset; `None` past the end
pub(crate) fn char_to_byte(text: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return Some(0);
    }
    match text.char_indices().nth(offset) {
        Some((byte, _)) => Some(byte),
        None if text.chars().count() == offset => Some(text.len()),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{NodeSelection, RangeSelection};
    use crate::testing::Chip;
    use pretty_assertions::assert_eq;

    fn paragraph_with_text(tree: &mut DocumentTree, text: &str) -> (NodeKey, NodeKey) {
        let p = tree.append(tree.root(), NodeKind::paragraph()).unwrap();
        let t = tree.append(p, NodeKind::text(text)).unwrap();
        (p, t)
    }

    #[test]
    fn test_new_tree_is_empty() {
        let tree = DocumentTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.text_content(), "");
    }

    #[test]
    fn test_append_and_navigate() {
        let mut tree = DocumentTree::new();
        let (p, a) = paragraph_with_text(&mut tree, "a");
        let chip = tree.append(p, NodeKind::entity(Chip::new("x"))).unwrap();
        let b = tree.append(p, NodeKind::text("b")).unwrap();

        assert_eq!(tree.children(p), &[a, chip, b]);
        assert_eq!(tree.previous_sibling(chip), Some(a));
        assert_eq!(tree.next_sibling(chip), Some(b));
        assert_eq!(tree.next_sibling(b), None);
        assert_eq!(tree.index_in_parent(b), Some(2));
        assert_eq!(tree.block_of(chip), Some(p));
        assert_eq!(tree.text_content(), "a[x]b");
    }

    #[test]
    fn test_keys_are_unique_and_never_reused() {
        let mut tree = DocumentTree::new();
        let (_, t) = paragraph_with_text(&mut tree, "a");
        tree.remove(t).unwrap();
        let p = tree.children(tree.root())[0];
        let again = tree.append(p, NodeKind::text("a")).unwrap();
        assert_ne!(t, again);
    }

    #[test]
    fn test_inline_under_root_is_rejected() {
        let mut tree = DocumentTree::new();
        let err = tree.append(tree.root(), NodeKind::text("loose")).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::InvalidChild { parent: "root", child: "text" }
        ));

        let err = tree
            .append(tree.root(), NodeKind::entity(Chip::new("x")))
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidChild { .. }));
    }

    #[test]
    fn test_cannot_append_to_leaf() {
        let mut tree = DocumentTree::new();
        let (_, t) = paragraph_with_text(&mut tree, "a");
        assert!(matches!(
            tree.append(t, NodeKind::text("b")),
            Err(DocumentError::NotAnElement(_))
        ));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        assert!(matches!(tree.remove(root), Err(DocumentError::RootImmutable)));
    }

    #[test]
    fn test_remove_reports_destroyed_subtree() {
        let mut tree = DocumentTree::new();
        let (p, t) = paragraph_with_text(&mut tree, "a");
        let chip = tree.append(p, NodeKind::entity(Chip::new("x"))).unwrap();
        tree.take_changes();

        tree.remove(p).unwrap();
        let changes = tree.take_changes();
        assert_eq!(changes.destroyed.get(&p), Some(&"paragraph"));
        assert_eq!(changes.destroyed.get(&t), Some(&"text"));
        assert_eq!(changes.destroyed.get(&chip), Some(&Chip::TYPE));
        assert!(!tree.contains(chip));
    }

    #[test]
    fn test_created_then_removed_is_not_reported() {
        let mut tree = DocumentTree::new();
        let (p, _) = paragraph_with_text(&mut tree, "a");
        tree.take_changes();

        let chip = tree.append(p, NodeKind::entity(Chip::new("x"))).unwrap();
        tree.remove(chip).unwrap();
        let changes = tree.take_changes();
        assert!(!changes.created.contains_key(&chip));
        assert!(!changes.destroyed.contains_key(&chip));
        assert!(changes.updated.contains(&p));
    }

    #[test]
    fn test_mark_dirty_marks_ancestors() {
        let mut tree = DocumentTree::new();
        let (p, t) = paragraph_with_text(&mut tree, "a");
        tree.take_changes();

        tree.set_text(t, "b").unwrap();
        let changes = tree.take_changes();
        assert!(changes.updated.contains(&t));
        assert!(changes.updated.contains(&p));
        assert!(changes.updated.contains(&tree.root()));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut tree = DocumentTree::new();
        let (p, a) = paragraph_with_text(&mut tree, "a");
        let chip = tree.append(p, NodeKind::entity(Chip::new("x"))).unwrap();
        let b = tree.append(p, NodeKind::text("b")).unwrap();

        let new_chip = tree.replace(chip, NodeKind::entity(Chip::new("y"))).unwrap();
        assert_ne!(new_chip, chip);
        assert_eq!(tree.children(p), &[a, new_chip, b]);
        assert_eq!(tree.text_content(), "a[y]b");
    }

    #[test]
    fn test_replace_element_carries_children() {
        let mut tree = DocumentTree::new();
        let (p, t) = paragraph_with_text(&mut tree, "a");
        let link = tree.append(p, NodeKind::link("https://one")).unwrap();
        let inner = tree.append(link, NodeKind::text("go")).unwrap();

        let new_link = tree.replace(link, NodeKind::link("https://two")).unwrap();
        assert_eq!(tree.children(p), &[t, new_link]);
        assert_eq!(tree.children(new_link), &[inner]);
        assert_eq!(tree.parent(inner), Some(new_link));
    }

    #[test]
    fn test_split_text_moves_later_points() {
        let mut tree = DocumentTree::new();
        let (p, t) = paragraph_with_text(&mut tree, "hello");
        tree.set_selection(Some(Selection::caret(Point::text(t, 4))));

        let right = tree.split_text(t, 2).unwrap();
        assert_eq!(tree.children(p), &[t, right]);
        assert_eq!(tree.text(t).unwrap().text, "he");
        assert_eq!(tree.text(right).unwrap().text, "llo");
        assert_eq!(
            tree.selection().and_then(Selection::caret_point),
            Some(Point::text(right, 2))
        );
    }

    #[test]
    fn test_split_keeps_format() {
        let mut tree = DocumentTree::new();
        let (_, t) = paragraph_with_text(&mut tree, "bold");
        tree.set_text_format(t, TextFormat::BOLD).unwrap();
        let right = tree.split_text(t, 1).unwrap();
        assert_eq!(tree.text(right).unwrap().format, TextFormat::BOLD);
    }

    #[test]
    fn test_split_out_of_range() {
        let mut tree = DocumentTree::new();
        let (_, t) = paragraph_with_text(&mut tree, "ab");
        assert!(matches!(
            tree.split_text(t, 5),
            Err(DocumentError::OffsetOutOfRange { offset: 5, .. })
        ));
    }

    #[test]
    fn test_removal_repairs_range_points() {
        let mut tree = DocumentTree::new();
        let (p, a) = paragraph_with_text(&mut tree, "a");
        let b = tree.append(p, NodeKind::text("b")).unwrap();
        tree.set_selection(Some(Selection::caret(Point::text(a, 1))));

        tree.remove(a).unwrap();
        assert_eq!(
            tree.selection().and_then(Selection::caret_point),
            Some(Point::element(p, 0))
        );
        assert!(tree.contains(b));
    }

    #[test]
    fn test_removal_shifts_element_points() {
        let mut tree = DocumentTree::new();
        let (p, a) = paragraph_with_text(&mut tree, "a");
        tree.append(p, NodeKind::text("b")).unwrap();
        tree.set_selection(Some(Selection::caret(Point::element(p, 2))));

        tree.remove(a).unwrap();
        assert_eq!(
            tree.selection().and_then(Selection::caret_point),
            Some(Point::element(p, 1))
        );
    }

    #[test]
    fn test_removal_purges_node_selection() {
        let mut tree = DocumentTree::new();
        let (p, _) = paragraph_with_text(&mut tree, "a");
        let chip = tree.append(p, NodeKind::entity(Chip::new("x"))).unwrap();
        tree.set_selection(Some(Selection::Node(NodeSelection::single(chip))));

        tree.remove(chip).unwrap();
        assert!(!tree.is_node_selected(chip));
        assert!(tree.selection().and_then(Selection::as_node).is_some_and(NodeSelection::is_empty));
    }

    #[test]
    fn test_compare_points() {
        let mut tree = DocumentTree::new();
        let (p, a) = paragraph_with_text(&mut tree, "abc");
        let chip = tree.append(p, NodeKind::entity(Chip::new("x"))).unwrap();
        let (_, b) = paragraph_with_text(&mut tree, "def");

        assert_eq!(
            tree.compare_points(&Point::text(a, 1), &Point::text(a, 2)),
            Ordering::Less
        );
        assert_eq!(
            tree.compare_points(&Point::element(p, 1), &Point::text(a, 3)),
            Ordering::Greater
        );
        assert_eq!(
            tree.compare_points(&Point::element(p, 1), &Point::element(p, 2)),
            Ordering::Less
        );
        assert_eq!(
            tree.compare_points(&Point::text(b, 0), &Point::element(p, 2)),
            Ordering::Greater
        );
        assert_eq!(tree.path(chip), vec![0, 1]);
    }

    #[test]
    fn test_move_node_rejects_cycles() {
        let mut tree = DocumentTree::new();
        let (p, _) = paragraph_with_text(&mut tree, "a");
        let link = tree.append(p, NodeKind::link("https://x")).unwrap();
        assert!(tree.move_node(p, link, 0).is_err());
        assert_eq!(tree.parent(link), Some(p));
    }

    #[test]
    fn test_rejected_move_leaves_tree_intact() {
        let mut tree = DocumentTree::new();
        let (p, t) = paragraph_with_text(&mut tree, "a");
        let root = tree.root();
        assert!(tree.move_node(t, root, 0).is_err());
        assert_eq!(tree.children(p), &[t]);
    }

    #[test]
    fn test_remove_text_range() {
        let mut tree = DocumentTree::new();
        let (_, t) = paragraph_with_text(&mut tree, "héllo");
        tree.set_selection(Some(Selection::Range(RangeSelection::new(
            Point::text(t, 1),
            Point::text(t, 5),
        ))));
        tree.remove_text_range(t, 1, 3).unwrap();
        assert_eq!(tree.text(t).unwrap().text, "hlo");

        let range = *tree.selection().and_then(Selection::as_range).unwrap();
        assert_eq!(range.anchor, Point::text(t, 1));
        assert_eq!(range.focus, Point::text(t, 3));
    }

    #[test]
    fn test_char_to_byte() {
        assert_eq!(char_to_byte("héllo", 0), Some(0));
        assert_eq!(char_to_byte("héllo", 2), Some(3));
        assert_eq!(char_to_byte("héllo", 5), Some(6));
        assert_eq!(char_to_byte("héllo", 6), None);
    }
}
