//! Structural edits on the selected node: replacement, insertion, removal.

use tracing::{debug, instrument};

use crate::domain::element::{
    Attribute, AwaitArm, AwaitBinding, Branch, EachBinding, Element, Migration, NodeId,
};
use crate::domain::tree::Tree;

/// Where a new node goes relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Last child of the selected node's designated part
    Append,
    /// First child of the selected node's designated part
    Prepend,
    /// Sibling directly before the selection
    Before,
    /// Sibling directly after the selection
    After,
}

impl Tree {
    // Replacement

    pub fn replace_with_element(
        &mut self,
        tag_name: impl Into<String>,
        attributes: Vec<Attribute>,
    ) {
        let children = self.take_selected_children().flatten();
        self.install(Element::Markup {
            tag_name: tag_name.into(),
            attributes,
            children,
        });
    }

    pub fn replace_with_component(
        &mut self,
        name: impl Into<String>,
        src: impl Into<String>,
        properties: Vec<Attribute>,
    ) {
        let children = self.take_selected_children().flatten();
        self.install(Element::Component {
            name: name.into(),
            src: src.into(),
            properties,
            children,
        });
    }

    /// Turns the selection into a one-branch `if`; the old children become
    /// the branch body and an old else/catch list becomes the `else`.
    pub fn replace_with_if(&mut self, condition: impl Into<String>) {
        let Migration { primary, secondary } = self.take_selected_children();
        self.install(Element::If {
            branches: vec![Branch {
                condition: condition.into(),
                children: primary,
            }],
            else_children: secondary,
        });
    }

    pub fn replace_with_each(&mut self, binding: EachBinding) {
        let Migration { primary, secondary } = self.take_selected_children();
        self.install(Element::Each {
            expression: binding.expression,
            binding: binding.binding,
            key: binding.key,
            index: binding.index,
            children: primary,
            else_children: secondary,
        });
    }

    /// Without a catch binding there is no catch arm, so a migrated
    /// else/catch list is appended to `then`.
    pub fn replace_with_await(&mut self, binding: AwaitBinding) {
        let migration = self.take_selected_children();
        let (then_children, catch) = match binding.catch_expression {
            Some(expression) => (
                migration.primary,
                Some(AwaitArm {
                    expression,
                    children: migration.secondary.unwrap_or_default(),
                }),
            ),
            None => (migration.flatten(), None),
        };
        self.install(Element::Await {
            expression: binding.expression,
            then: AwaitArm {
                expression: binding.then_expression,
                children: then_children,
            },
            catch,
        });
    }

    pub fn replace_with_key(&mut self, expression: impl Into<String>) {
        let children = self.take_selected_children().flatten();
        self.install(Element::Key {
            expression: expression.into(),
            children,
        });
    }

    /// Interpolations own no children: the old subtree is discarded.
    pub fn replace_with_expression(&mut self, expression: impl Into<String>, html: bool) {
        let dropped = self.take_selected_children().flatten();
        let discarded: usize = dropped.into_iter().map(|id| self.arena.discard(id)).sum();
        if discarded > 0 {
            debug!(discarded, "dropped children of replaced element");
        }
        let expression = expression.into();
        self.install(if html {
            Element::Html { expression }
        } else {
            Element::Expression { expression }
        });
    }

    fn take_selected_children(&mut self) -> Migration {
        self.arena[self.selected].element.take_children()
    }

    /// Puts `element` on the selected node and re-homes its children.
    #[instrument(level = "debug", skip(self, element), fields(kind = %element.kind()))]
    fn install(&mut self, element: Element) {
        self.arena[self.selected].element = element;
        self.arena.relink(self.selected);
        self.part = 0;
    }

    // Insertion

    /// Adds `element` as the last child of the part designated by the cursor.
    ///
    /// Returns `None` without changing anything when the selected node has
    /// no such part or does not accept children (await blocks, interpolations).
    pub fn append_child_element(&mut self, element: Element) -> Option<NodeId> {
        self.insert_element(InsertPosition::Append, element)
    }

    pub fn prepend_child_element(&mut self, element: Element) -> Option<NodeId> {
        self.insert_element(InsertPosition::Prepend, element)
    }

    /// Adds `element` right before the selection, in the parent part that
    /// holds it. No-op at the root.
    pub fn insert_element_before(&mut self, element: Element) -> Option<NodeId> {
        self.insert_element(InsertPosition::Before, element)
    }

    pub fn insert_element_after(&mut self, element: Element) -> Option<NodeId> {
        self.insert_element(InsertPosition::After, element)
    }

    /// Inserts a detached element; the cursor does not move.
    #[instrument(level = "debug", skip(self, element), fields(kind = %element.kind()))]
    pub fn insert_element(&mut self, position: InsertPosition, element: Element) -> Option<NodeId> {
        if !element.is_detached() {
            debug!("element already owns children, not inserted");
            return None;
        }
        let (container, part, index) = self.insertion_slot(position)?;
        let id = self.arena.insert(element);
        self.arena[container].element.parts_mut()[part].insert(index, id);
        self.arena.relink(container);
        debug!(?id, ?container, part, index, "inserted node");
        Some(id)
    }

    /// Container, owned-part index and list index for a new node, or
    /// `None` when the insertion is a no-op.
    fn insertion_slot(&self, position: InsertPosition) -> Option<(NodeId, usize, usize)> {
        match position {
            InsertPosition::Append | InsertPosition::Prepend => {
                let element = &self.arena[self.selected].element;
                let part = element.insertion_part(self.part)?;
                let index = match position {
                    InsertPosition::Append => element.parts()[part].len(),
                    _ => 0,
                };
                Some((self.selected, part, index))
            }
            InsertPosition::Before | InsertPosition::After => {
                let container = self.arena[self.selected].parent?;
                let element = &self.arena[container].element;
                if !element.accepts_children() {
                    return None;
                }
                let (part, index) = element.parts().iter().enumerate().find_map(|(part, list)| {
                    list.iter()
                        .position(|&id| id == self.selected)
                        .map(|index| (part, index))
                })?;
                let index = match position {
                    InsertPosition::After => index + 1,
                    _ => index,
                };
                Some((container, part, index))
            }
        }
    }

    // Removal

    /// Removes the selection and its subtree.
    ///
    /// The cursor moves to the following node of the same container, else
    /// the preceding one, else the container itself. No-op at the root.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_selected(&mut self) -> Option<NodeId> {
        let removed = self.selected;
        let node = &self.arena[removed];
        let container = node.parent?;
        let (prev, next) = (node.prev, node.next);
        let holding_part = self.part_holding(container, removed);

        for part in self.arena[container].element.parts_mut() {
            part.retain(|&id| id != removed);
        }
        let discarded = self.arena.discard(removed);
        self.arena.relink(container);
        debug!(?removed, discarded, "removed node");

        match (next, prev) {
            (Some(next), _) => {
                self.selected = next;
                self.part = 0;
            }
            (None, Some(prev)) => {
                self.selected = prev;
                self.part = self.arena[prev].element.last_part();
            }
            (None, None) => {
                self.selected = container;
                self.part = holding_part;
            }
        }
        Some(removed)
    }
}
