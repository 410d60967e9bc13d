use generational_arena::Arena;
use tracing::instrument;

use crate::domain::element::{Element, NodeId};

/// Tree node: one element plus lookup links to its neighbours.
///
/// The links are never ownership edges. Ownership follows the child list
/// that holds the node's id; the links are recomputed by
/// [`TreeArena::relink`] after every structural change.
#[derive(Debug, Clone)]
pub struct Node {
    pub element: Element,
    /// Container node, None for the root and for detached nodes
    pub parent: Option<NodeId>,
    /// Previous node in the container's concatenated parts
    pub prev: Option<NodeId>,
    /// Next node in the container's concatenated parts
    pub next: Option<NodeId>,
}

impl Node {
    fn detached(element: Element) -> Self {
        Self {
            element,
            parent: None,
            prev: None,
            next: None,
        }
    }
}

/// Arena storage for all nodes of one document.
///
/// Uses a generational arena so that ids of discarded nodes are never
/// confused with nodes inserted later.
#[derive(Debug, Clone, Default)]
pub struct TreeArena {
    nodes: Arena<Node>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
        }
    }

    /// Stores `element` as a detached node.
    #[instrument(level = "trace", skip(self, element), fields(kind = %element.kind()))]
    pub fn insert(&mut self, element: Element) -> NodeId {
        self.nodes.insert(Node::detached(element))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Reassigns `parent`, `prev` and `next` for every child of `container`.
    ///
    /// The chain runs over all parts concatenated in declaration order, so
    /// the last child of one part links to the first child of the next.
    #[instrument(level = "trace", skip(self))]
    pub fn relink(&mut self, container: NodeId) {
        let children = self.nodes[container].element.children();
        for (i, &child) in children.iter().enumerate() {
            let node = &mut self.nodes[child];
            node.parent = Some(container);
            node.prev = i.checked_sub(1).map(|j| children[j]);
            node.next = children.get(i + 1).copied();
        }
    }

    /// Removes `id` and every node below it.
    ///
    /// Does not touch the list that referenced `id`; callers detach first.
    #[instrument(level = "debug", skip(self))]
    pub fn discard(&mut self, id: NodeId) -> usize {
        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.element.children());
                removed += 1;
            }
        }
        removed
    }

    pub fn depth(&self, id: NodeId) -> usize {
        match self.nodes.get(id) {
            Some(node) => {
                1 + node
                    .element
                    .children()
                    .into_iter()
                    .map(|child| self.depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }
}

impl std::ops::Index<NodeId> for TreeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}

impl std::ops::IndexMut<NodeId> for TreeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }
}
