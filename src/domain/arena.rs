//! Arena-backed forest of record nodes.
//!
//! Every node lives in one generational arena owned by the [`Forest`]. A node
//! is owned either by its parent's `children` list or by the forest's root
//! list; the `parent` link is a plain arena index and never keeps a node alive.
//! Removing a node from its owner frees its whole subtree.

use std::fmt;
use std::ops::Range;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::record::{LineFormat, Record};

/// Handle to a node inside a [`Forest`].
///
/// Handles stay `Copy`-cheap and are checked against the arena generation, so a
/// handle to a deleted node is reported as [`DomainError::StaleNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (idx, generation) = self.0.into_raw_parts();
        write!(f, "#{idx}.{generation}")
    }
}

/// Tree node stored in the arena.
#[derive(Debug)]
pub struct TreeNode {
    /// The node's own record
    pub record: Record,
    /// Non-owning link to the node holding this one in its children
    parent: Option<NodeId>,
    /// Owned children, kept in sibling order
    children: Vec<NodeId>,
}

impl TreeNode {
    fn new(record: Record) -> Self {
        Self {
            record,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Ordered list of root nodes plus the arena that stores every node.
///
/// Mutations take `&mut self`, so a tree cannot change while a [`NodeRef`] or
/// one of the iterators borrowed from it is alive.
#[derive(Debug)]
pub struct Forest {
    arena: Arena<TreeNode>,
    roots: Vec<NodeId>,
    format: LineFormat,
}

impl Default for Forest {
    fn default() -> Self {
        Self::new()
    }
}

impl Forest {
    pub fn new() -> Self {
        Self::with_format(LineFormat::default())
    }

    /// Empty forest that renders with the delimiter of `format`.
    pub fn with_format(format: LineFormat) -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
            format,
        }
    }

    pub fn format(&self) -> &LineFormat {
        &self.format
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn root_refs(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.roots.iter().map(move |&id| self.node_ref(id))
    }

    /// Number of live nodes across all trees.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.arena.get(id.0)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    /// Read-only view of a live node.
    pub fn node(&self, id: NodeId) -> DomainResult<NodeRef<'_>> {
        self.arena
            .get(id.0)
            .map(|node| NodeRef {
                forest: self,
                id,
                node,
            })
            .ok_or(DomainError::StaleNode(id))
    }

    /// View of a node reachable from a live node; the owner links guarantee it is live.
    fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef {
            forest: self,
            id,
            node: &self.arena[id.0],
        }
    }

    fn ensure_live(&self, id: NodeId) -> DomainResult<()> {
        if self.arena.contains(id.0) {
            Ok(())
        } else {
            Err(DomainError::StaleNode(id))
        }
    }

    // ------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------

    /// Append a new root node at the end of the root list.
    #[instrument(level = "trace", skip(self))]
    pub fn push_root(&mut self, record: Record) -> NodeId {
        let id = NodeId(self.arena.insert(TreeNode::new(record)));
        self.roots.push(id);
        id
    }

    /// Append a new node as the last child of `parent`, ignoring sibling order.
    ///
    /// Used while rebuilding a flat file, where the file order is authoritative.
    #[instrument(level = "trace", skip(self))]
    pub fn append_child(&mut self, parent: NodeId, record: Record) -> DomainResult<NodeId> {
        self.ensure_live(parent)?;
        let mut node = TreeNode::new(record);
        node.parent = Some(parent);
        let id = NodeId(self.arena.insert(node));
        self.arena[parent.0].children.push(id);
        Ok(id)
    }

    /// Create a node for `record` and insert it below `parent` in sibling order.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_record(&mut self, parent: NodeId, record: Record) -> DomainResult<NodeId> {
        self.ensure_live(parent)?;
        let id = NodeId(self.arena.insert(TreeNode::new(record)));
        self.place_child(parent, id);
        Ok(id)
    }

    /// Move the existing node `node` (with its subtree) below `parent`.
    ///
    /// The node is taken out of its current owner first, so it is never held
    /// twice. It lands before the first sibling whose type tag is greater or
    /// equal to its own, or at the end.
    #[instrument(level = "trace", skip(self))]
    pub fn insert(&mut self, parent: NodeId, node: NodeId) -> DomainResult<()> {
        self.ensure_live(parent)?;
        self.ensure_live(node)?;
        if self.node_ref(parent).ancestors().any(|a| a.id == node) {
            return Err(DomainError::CycleDetected(node));
        }
        self.detach(node);
        self.place_child(parent, node);
        Ok(())
    }

    /// Insert before the first sibling whose tag is `>=` the child's tag.
    /// Among equal tags the newest child therefore comes first.
    fn place_child(&mut self, parent: NodeId, child: NodeId) {
        let pos = {
            let tag = self.arena[child.0].record.type_tag();
            let siblings = &self.arena[parent.0].children;
            siblings
                .iter()
                .position(|s| self.arena[s.0].record.type_tag() >= tag)
                .unwrap_or(siblings.len())
        };
        self.arena[parent.0].children.insert(pos, child);
        self.arena[child.0].parent = Some(parent);
    }

    /// Take a live node out of its owner without freeing it.
    fn detach(&mut self, id: NodeId) {
        match self.arena[id.0].parent.take() {
            Some(parent) => self.arena[parent.0].children.retain(|&c| c != id),
            None => self.roots.retain(|&r| r != id),
        }
    }

    // ------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------

    /// Remove `id` from its parent's children and free its subtree.
    ///
    /// Returns the record of the removed node. Root nodes have no parent and
    /// cannot be deleted this way.
    #[instrument(level = "trace", skip(self))]
    pub fn delete(&mut self, id: NodeId) -> DomainResult<Record> {
        let node = self.arena.get(id.0).ok_or(DomainError::StaleNode(id))?;
        let parent = node.parent.ok_or(DomainError::NoParent(id))?;
        self.arena[parent.0].children.retain(|&c| c != id);
        self.free_subtree(id)
            .map(|node| node.record)
            .ok_or(DomainError::StaleNode(id))
    }

    fn free_subtree(&mut self, id: NodeId) -> Option<TreeNode> {
        let root = self.arena.remove(id.0)?;
        let mut pending = root.children.clone();
        while let Some(child) = pending.pop() {
            if let Some(node) = self.arena.remove(child.0) {
                pending.extend(node.children);
            }
        }
        Some(root)
    }

    /// Remove, below `id`, every node for which `predicate` is false, together
    /// with its subtree. Surviving children are filtered in turn. The node
    /// `id` itself is always kept.
    #[instrument(level = "debug", skip(self, predicate))]
    pub fn filter<P>(&mut self, id: NodeId, mut predicate: P) -> DomainResult<()>
    where
        P: FnMut(&NodeRef<'_>) -> bool,
    {
        self.ensure_live(id)?;
        self.prune(vec![id], &mut predicate);
        Ok(())
    }

    /// Forest-wide [`Forest::filter`]: roots failing `predicate` are removed
    /// as well, as if they were children of an implicit sentinel root.
    #[instrument(level = "debug", skip(self, predicate))]
    pub fn retain<P>(&mut self, mut predicate: P)
    where
        P: FnMut(&NodeRef<'_>) -> bool,
    {
        let (keep, dropped): (Vec<NodeId>, Vec<NodeId>) = self
            .roots
            .iter()
            .partition(|&&r| predicate(&self.node_ref(r)));
        for gone in dropped {
            self.free_subtree(gone);
        }
        let pending = keep.iter().rev().copied().collect();
        self.roots = keep;
        self.prune(pending, &mut predicate);
    }

    fn prune<P>(&mut self, mut pending: Vec<NodeId>, predicate: &mut P)
    where
        P: FnMut(&NodeRef<'_>) -> bool,
    {
        let mut removed = 0usize;
        while let Some(current) = pending.pop() {
            let (keep, dropped): (Vec<NodeId>, Vec<NodeId>) = self.arena[current.0]
                .children
                .iter()
                .partition(|&&c| predicate(&self.node_ref(c)));
            for gone in dropped {
                removed += 1;
                self.free_subtree(gone);
            }
            pending.extend(keep.iter().rev());
            self.arena[current.0].children = keep;
        }
        debug!(removed, "filtered subtrees");
    }

    // ------------------------------------------------------------
    // Field mutation
    // ------------------------------------------------------------

    pub fn record_mut(&mut self, id: NodeId) -> DomainResult<&mut Record> {
        self.arena
            .get_mut(id.0)
            .map(|node| &mut node.record)
            .ok_or(DomainError::StaleNode(id))
    }

    /// Replace one field of a node's record.
    pub fn set_field(
        &mut self,
        id: NodeId,
        index: usize,
        value: impl Into<String>,
    ) -> DomainResult<()> {
        self.record_mut(id)?.set(index, value)
    }

    /// Replace a half-open range of a node's fields.
    pub fn splice_fields<I, S>(&mut self, id: NodeId, range: Range<usize>, values: I) -> DomainResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record_mut(id)?.splice(range, values)
    }

    // ------------------------------------------------------------
    // Forest-level queries
    // ------------------------------------------------------------

    /// Depth-first pre-order walk over every tree, roots in order.
    pub fn iter(&self) -> DepthFirst<'_> {
        DepthFirst::new(self, self.roots.iter().rev().copied().collect())
    }

    pub fn find_all<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = NodeRef<'a>> + 'a
    where
        P: FnMut(&NodeRef<'a>) -> bool + 'a,
    {
        self.iter().filter(move |node| predicate(node))
    }

    pub fn find_first<'a, P>(&'a self, predicate: P) -> DomainResult<NodeRef<'a>>
    where
        P: FnMut(&NodeRef<'a>) -> bool + 'a,
    {
        self.find_all(predicate).next().ok_or(DomainError::NotFound)
    }

    pub fn nodes_of_type<'a>(&'a self, type_tag: &'a str) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        self.find_all(move |node| node.type_tag() == type_tag)
    }

    pub fn first_node_of_type(&self, type_tag: &str) -> DomainResult<NodeRef<'_>> {
        self.iter()
            .find(|node| node.type_tag() == type_tag)
            .ok_or(DomainError::NotFound)
    }

    /// Total number of nodes over all trees.
    pub fn size(&self) -> usize {
        self.root_refs().map(|root| root.count()).sum()
    }

    /// Number of nodes in the trees whose root type tag starts with `prefix`.
    pub fn size_by_type_prefix(&self, prefix: &str) -> usize {
        self.root_refs()
            .filter(|root| root.type_tag().starts_with(prefix))
            .map(|root| root.count())
            .sum()
    }

    /// Flat-file text of the whole forest.
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn render_into<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        self.root_refs().try_for_each(|root| root.render_into(out))
    }
}

impl fmt::Display for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render_into(f)
    }
}

/// Structural equality: same records, same shape, same order.
impl PartialEq for Forest {
    fn eq(&self, other: &Self) -> bool {
        self.roots.len() == other.roots.len()
            && self.root_refs().zip(other.root_refs()).all(|(a, b)| a == b)
    }
}

impl Eq for Forest {}

/// Borrowed view of one node and its subtree.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    forest: &'a Forest,
    id: NodeId,
    node: &'a TreeNode,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn record(&self) -> &'a Record {
        &self.node.record
    }

    pub fn type_tag(&self) -> &'a str {
        self.node.record.type_tag()
    }

    /// This node's own record in the forest's delimiter, without children.
    pub fn line(&self) -> String {
        self.node.record.to_line(self.forest.format.delimiter)
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent.map(|p| self.forest.node_ref(p))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let forest = self.forest;
        self.node.children.iter().map(move |&c| forest.node_ref(c))
    }

    pub fn is_leaf(&self) -> bool {
        self.node.children.is_empty()
    }

    /// Pre-order walk: this node, then each child's subtree left to right.
    pub fn depth_first(&self) -> DepthFirst<'a> {
        DepthFirst::new(self.forest, vec![self.id])
    }

    pub fn find_all<P>(&self, mut predicate: P) -> impl Iterator<Item = NodeRef<'a>> + 'a
    where
        P: FnMut(&NodeRef<'a>) -> bool + 'a,
    {
        self.depth_first().filter(move |node| predicate(node))
    }

    pub fn find_first<P>(&self, predicate: P) -> DomainResult<NodeRef<'a>>
    where
        P: FnMut(&NodeRef<'a>) -> bool + 'a,
    {
        self.find_all(predicate).next().ok_or(DomainError::NotFound)
    }

    pub fn nodes_of_type(&self, type_tag: &'a str) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        self.find_all(move |node| node.type_tag() == type_tag)
    }

    pub fn first_node_of_type(&self, type_tag: &str) -> DomainResult<NodeRef<'a>> {
        self.depth_first()
            .find(|node| node.type_tag() == type_tag)
            .ok_or(DomainError::NotFound)
    }

    /// This node, its parent, and so on up to the root.
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors {
            forest: self.forest,
            next: Some(self.id),
        }
    }

    /// Number of nodes in this subtree, including this node.
    pub fn count(&self) -> usize {
        self.depth_first().count()
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn render_into<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        let delimiter = self.forest.format.delimiter;
        self.depth_first()
            .try_for_each(|node| node.record().write_line(out, delimiter))
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("record", &self.node.record)
            .field("children", &self.node.children.len())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render_into(f)
    }
}

/// Structural equality across forests; compared without recursion.
impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(*self, *other)];
        while let Some((a, b)) = pending.pop() {
            if a.node.record != b.node.record || a.node.children.len() != b.node.children.len() {
                return false;
            }
            pending.extend(a.children().zip(b.children()));
        }
        true
    }
}

/// Stack-based pre-order iterator.
pub struct DepthFirst<'a> {
    forest: &'a Forest,
    stack: Vec<NodeId>,
}

impl<'a> DepthFirst<'a> {
    fn new(forest: &'a Forest, stack: Vec<NodeId>) -> Self {
        Self { forest, stack }
    }
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let node = self.forest.node_ref(current);
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.node.children.iter().rev());
        Some(node)
    }
}

/// Walks parent links upwards, starting with the node itself.
pub struct Ancestors<'a> {
    forest: &'a Forest,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.forest.node_ref(self.next?);
        self.next = node.node.parent;
        Some(node)
    }
}
