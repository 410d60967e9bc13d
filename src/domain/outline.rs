/*
Outline view of a template tree for terminals.

Multi-part containers get one group per part so that the cursor part is
visible; the selected node carries a marker with its part index.
 */
use termtree::Tree as TermTree;

use crate::domain::element::{AwaitArm, Element, NodeId};
use crate::domain::tree::Tree;

const CURSOR_MARKER: &str = "◀";

pub trait TreeOutline {
    fn to_outline(&self) -> TermTree<String>;
}

impl TreeOutline for Tree {
    fn to_outline(&self) -> TermTree<String> {
        build_outline(self, self.root())
    }
}

fn build_outline(tree: &Tree, id: NodeId) -> TermTree<String> {
    let Some(element) = tree.element(id) else {
        return TermTree::new("<missing>".to_string());
    };
    let mut label = node_label(element);
    if id == tree.selected() {
        label = format!("{label} {CURSOR_MARKER} part {}", tree.part());
    }

    let children = |ids: &[NodeId]| -> Vec<TermTree<String>> {
        ids.iter().map(|&child| build_outline(tree, child)).collect()
    };
    let group = |name: String, ids: &[NodeId]| TermTree::new(name).with_leaves(children(ids));

    let leaves = match element {
        Element::Markup { children: ids, .. }
        | Element::Component { children: ids, .. }
        | Element::Key { children: ids, .. }
        | Element::AwaitCatch {
            catch: AwaitArm { children: ids, .. },
            ..
        } => children(ids),
        Element::If {
            branches,
            else_children,
        } => branches
            .iter()
            .map(|branch| group(format!("if {}", branch.condition), &branch.children))
            .chain(else_children.iter().map(|ids| group("else".to_string(), ids)))
            .collect(),
        Element::Each {
            children: ids,
            else_children,
            ..
        } => std::iter::once(group("body".to_string(), ids))
            .chain(else_children.iter().map(|ids| group("else".to_string(), ids)))
            .collect(),
        Element::Await { then, catch, .. } => {
            std::iter::once(group(format!("then {}", then.expression), &then.children))
                .chain(
                    catch
                        .iter()
                        .map(|arm| group(format!("catch {}", arm.expression), &arm.children)),
                )
                .collect()
        }
        Element::Expression { .. } | Element::Html { .. } => Vec::new(),
    };

    TermTree::new(label).with_leaves(leaves)
}

/// One-line description of an element.
pub fn node_label(element: &Element) -> String {
    match element {
        Element::Markup { tag_name, .. } => format!("<{tag_name}>"),
        Element::Component { name, src, .. } => format!("<{name}> ({src})"),
        Element::Key { expression, .. } => format!("{{#key {expression}}}"),
        Element::If { .. } => "{#if}".to_string(),
        Element::Each {
            expression,
            binding,
            ..
        } => format!("{{#each {expression} as {binding}}}"),
        Element::Await { expression, .. } => format!("{{#await {expression}}}"),
        Element::AwaitCatch { expression, .. } => format!("{{#await {expression}}} catch"),
        Element::Expression { expression } => format!("{{{expression}}}"),
        Element::Html { expression } => format!("{{@html {expression}}}"),
    }
}
