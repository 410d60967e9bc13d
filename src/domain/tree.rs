//! The editable document and its selection cursor.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, instrument, trace};

use crate::domain::arena::{Node, TreeArena};
use crate::domain::element::{Element, NodeId};
use crate::domain::error::{DomainError, TreeResult};
use crate::domain::render::{RenderOptions, Renderer};

/// Tag of the root container of a new tree.
pub const DEFAULT_ROOT_TAG: &str = "div";

/// A template tree with a single selection cursor.
///
/// The cursor is the pair (`selected`, `part`). `part` addresses one of the
/// selected node's owned parts and is kept within
/// `0..=selected.element.last_part()`.
///
/// Cloning a tree is a full snapshot; callers can build undo on top of it.
#[derive(Debug, Clone)]
pub struct Tree {
    pub(crate) arena: TreeArena,
    pub(crate) root: NodeId,
    pub(crate) selected: NodeId,
    pub(crate) part: usize,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Empty tree: one childless `<div>` root.
    pub fn new() -> Self {
        Self::with_root_tag(DEFAULT_ROOT_TAG)
    }

    pub fn with_root_tag(tag_name: &str) -> Self {
        Self::with_root(Element::markup(tag_name, Vec::new()))
    }

    /// Tree whose root holds `element`.
    ///
    /// Child ids cannot refer into a fresh arena, so any ids in the
    /// element's lists are dropped.
    pub fn with_root(mut element: Element) -> Self {
        if !element.is_detached() {
            let dropped = element.take_children().flatten();
            debug!(dropped = dropped.len(), "root element was not detached");
        }
        let mut arena = TreeArena::new();
        let root = arena.insert(element);
        Self {
            arena,
            root,
            selected: root,
            part: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn selected(&self) -> NodeId {
        self.selected
    }

    pub fn part(&self) -> usize {
        self.part
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.arena.get(id).map(|node| &node.element)
    }

    pub fn selected_element(&self) -> &Element {
        &self.arena[self.selected].element
    }

    /// Children of `id`, owned parts concatenated.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.element(id).map(Element::children).unwrap_or_default()
    }

    /// Number of stored nodes, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    pub fn depth(&self) -> usize {
        self.arena.depth(self.root)
    }

    // Navigation

    /// Steps to the next part of the selection, or to its next sibling.
    #[instrument(level = "trace", skip(self))]
    pub fn select_next_sibling(&mut self) {
        if self.part < self.selected_element().last_part() {
            self.part += 1;
        } else if let Some(next) = self.arena[self.selected].next {
            self.selected = next;
            self.part = 0;
        }
        trace!(selected = ?self.selected, part = self.part, "cursor");
    }

    /// Steps to the previous part of the selection, or onto the last part
    /// of its previous sibling.
    #[instrument(level = "trace", skip(self))]
    pub fn select_prev_sibling(&mut self) {
        if self.part > 0 {
            self.part -= 1;
        } else if let Some(prev) = self.arena[self.selected].prev {
            self.selected = prev;
            self.part = self.arena[prev].element.last_part();
        }
        trace!(selected = ?self.selected, part = self.part, "cursor");
    }

    /// Moves to the parent, selecting the part that held the node just left.
    #[instrument(level = "trace", skip(self))]
    pub fn select_parent(&mut self) {
        let Some(parent) = self.arena[self.selected].parent else {
            return;
        };
        self.part = self.part_holding(parent, self.selected);
        self.selected = parent;
        trace!(selected = ?self.selected, part = self.part, "cursor");
    }

    /// Descends into the primary part only; an empty primary part makes
    /// this a no-op even when later parts hold children.
    #[instrument(level = "trace", skip(self))]
    pub fn select_first_child(&mut self) {
        if let Some(first) = self.selected_element().first_child() {
            self.selected = first;
            self.part = 0;
        }
        trace!(selected = ?self.selected, part = self.part, "cursor");
    }

    /// Descends into the trailing part, see [`Element::last_child`].
    #[instrument(level = "trace", skip(self))]
    pub fn select_last_child(&mut self) {
        if let Some(last) = self.selected_element().last_child() {
            self.selected = last;
            self.part = self.arena[last].element.last_part();
        }
        trace!(selected = ?self.selected, part = self.part, "cursor");
    }

    #[instrument(level = "trace", skip(self))]
    pub fn select_root(&mut self) {
        self.selected = self.root;
        self.part = 0;
    }

    /// Part of `container` holding `child`, clamped to the navigable range.
    pub(crate) fn part_holding(&self, container: NodeId, child: NodeId) -> usize {
        let element = &self.arena[container].element;
        element
            .part_containing(child)
            .unwrap_or(0)
            .min(element.last_part())
    }

    // Invariants

    /// Verifies the structural invariants of the whole tree.
    ///
    /// Checks that the root is unlinked, that every child points back to
    /// its container, that sibling links follow the concatenated parts,
    /// that no node is shared or orphaned, and that the cursor is valid.
    #[instrument(level = "debug", skip(self))]
    pub fn check_invariants(&self) -> TreeResult<()> {
        let root = self.arena.get(self.root).ok_or(DomainError::MissingNode(self.root))?;
        if root.parent.is_some() || root.prev.is_some() || root.next.is_some() {
            return Err(DomainError::RootLinked(self.root));
        }

        let mut seen = HashSet::from([self.root]);
        let mut stack = vec![self.root];
        while let Some(container) = stack.pop() {
            let children = self.arena[container].element.children();
            for (i, &child) in children.iter().enumerate() {
                let node = self
                    .arena
                    .get(child)
                    .ok_or(DomainError::MissingNode(child))?;
                if !seen.insert(child) {
                    return Err(DomainError::DuplicateChild { node: child });
                }
                if node.parent != Some(container) {
                    return Err(DomainError::WrongParent {
                        node: child,
                        expected: container,
                        actual: node.parent,
                    });
                }
                let prev = i.checked_sub(1).map(|j| children[j]);
                let next = children.get(i + 1).copied();
                if node.prev != prev || node.next != next {
                    return Err(DomainError::BrokenSiblings { node: child });
                }
                stack.push(child);
            }
        }

        if seen.len() != self.arena.len() {
            return Err(DomainError::OrphanNodes {
                count: self.arena.len() - seen.len(),
            });
        }
        if !seen.contains(&self.selected) {
            return Err(DomainError::SelectionUnreachable(self.selected));
        }
        let max = self.selected_element().last_part();
        if self.part > max {
            return Err(DomainError::PartOutOfRange {
                part: self.part,
                max,
            });
        }
        Ok(())
    }

    // Serialization

    /// Canonical markup of the whole tree, tab indented.
    pub fn render(&self) -> String {
        self.render_with(&RenderOptions::default())
    }

    pub fn render_with(&self, options: &RenderOptions) -> String {
        Renderer::new(&self.arena, options).render(self.root)
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
