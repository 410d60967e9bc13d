//! Markup serialization of a template tree.

use std::fmt::Write;

use itertools::Itertools;

use crate::domain::arena::TreeArena;
use crate::domain::element::{Attribute, Element, NodeId};

/// Rendering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Indentation unit repeated once per nesting level
    pub indent: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
        }
    }
}

/// Renders nodes of one arena to canonical markup.
pub struct Renderer<'a> {
    arena: &'a TreeArena,
    options: &'a RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(arena: &'a TreeArena, options: &'a RenderOptions) -> Self {
        Self { arena, options }
    }

    /// Markup for `id` and its subtree, every line newline terminated.
    pub fn render(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id, 0);
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId, depth: usize) {
        let Some(node) = self.arena.get(id) else {
            return;
        };
        let pad = self.options.indent.repeat(depth);
        // Writing into a String cannot fail
        let _ = match &node.element {
            Element::Markup {
                tag_name,
                attributes,
                children,
            } => self.write_tag(out, &pad, tag_name, attributes, children, depth),
            Element::Component {
                name,
                properties,
                children,
                ..
            } => self.write_tag(out, &pad, name, properties, children, depth),
            Element::Key {
                expression,
                children,
            } => {
                let _ = writeln!(out, "{pad}{{#key {expression}}}");
                self.write_children(out, children, depth + 1);
                writeln!(out, "{pad}{{/key}}")
            }
            Element::If {
                branches,
                else_children,
            } => {
                for (i, branch) in branches.iter().enumerate() {
                    let _ = if i == 0 {
                        writeln!(out, "{pad}{{#if {}}}", branch.condition)
                    } else {
                        writeln!(out, "{pad}{{:else if {}}}", branch.condition)
                    };
                    self.write_children(out, &branch.children, depth + 1);
                }
                if let Some(else_children) = else_children {
                    let _ = writeln!(out, "{pad}{{:else}}");
                    self.write_children(out, else_children, depth + 1);
                }
                writeln!(out, "{pad}{{/if}}")
            }
            Element::Each {
                expression,
                binding,
                key,
                index,
                children,
                else_children,
            } => {
                let index = index.as_ref().map(|i| format!(", {i}")).unwrap_or_default();
                let key = key.as_ref().map(|k| format!(" ({k})")).unwrap_or_default();
                let _ = writeln!(out, "{pad}{{#each {expression} as {binding}{index}{key}}}");
                self.write_children(out, children, depth + 1);
                if let Some(else_children) = else_children {
                    let _ = writeln!(out, "{pad}{{:else}}");
                    self.write_children(out, else_children, depth + 1);
                }
                writeln!(out, "{pad}{{/each}}")
            }
            // TODO: emit {#await}/{:then}/{:catch} blocks once await navigation and insertion land
            Element::Await { .. } | Element::AwaitCatch { .. } => Ok(()),
            Element::Expression { expression } => writeln!(out, "{pad}{{{expression}}}"),
            Element::Html { expression } => writeln!(out, "{pad}{{@html {expression}}}"),
        };
    }

    fn write_tag(
        &self,
        out: &mut String,
        pad: &str,
        name: &str,
        attributes: &[Attribute],
        children: &[NodeId],
        depth: usize,
    ) -> std::fmt::Result {
        let attributes = attributes
            .iter()
            .map(|(key, value)| format!(" {key}=\"{value}\""))
            .join("");
        if children.is_empty() {
            return writeln!(out, "{pad}<{name}{attributes} />");
        }
        writeln!(out, "{pad}<{name}{attributes}>")?;
        self.write_children(out, children, depth + 1);
        writeln!(out, "{pad}</{name}>")
    }

    fn write_children(&self, out: &mut String, children: &[NodeId], depth: usize) {
        for &child in children {
            self.write_node(out, child, depth);
        }
    }
}
