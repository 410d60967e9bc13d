//! Element variants and the parts (child lists) each variant owns.

use std::fmt;

use generational_arena::Index;

/// Stable handle of a node stored in the tree arena.
pub type NodeId = Index;

/// Name/value pair used for markup attributes and component properties.
pub type Attribute = (String, String);

/// Tag of an [`Element`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Markup,
    Component,
    Key,
    If,
    Each,
    Await,
    AwaitCatch,
    Expression,
    Html,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Markup => "element",
            ElementKind::Component => "component",
            ElementKind::Key => "key",
            ElementKind::If => "if",
            ElementKind::Each => "each",
            ElementKind::Await => "await",
            ElementKind::AwaitCatch => "await:catch",
            ElementKind::Expression => "expression",
            ElementKind::Html => "html",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `{#if}` / `{:else if}` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub condition: String,
    pub children: Vec<NodeId>,
}

/// `{:then value}` or `{:catch error}` arm of an await block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwaitArm {
    /// Name bound to the resolved value or the error
    pub expression: String,
    pub children: Vec<NodeId>,
}

/// Binders of an `{#each}` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EachBinding {
    /// Iterated expression, e.g. `items`
    pub expression: String,
    /// Item binder (`as item`)
    pub binding: String,
    /// Optional key expression (`(item.id)`)
    pub key: Option<String>,
    /// Optional index binder (`, i`)
    pub index: Option<String>,
}

impl EachBinding {
    pub fn new(expression: impl Into<String>, binding: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            binding: binding.into(),
            key: None,
            index: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }
}

/// Expressions of an `{#await}` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwaitBinding {
    /// Awaited promise expression
    pub expression: String,
    /// Name bound in the `then` arm
    pub then_expression: String,
    /// Name bound in the `catch` arm; `None` means no catch arm
    pub catch_expression: Option<String>,
}

/// Payload of a tree node. The set of variants is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Plain markup tag, `type: "element"`
    Markup {
        tag_name: String,
        attributes: Vec<Attribute>,
        children: Vec<NodeId>,
    },
    Component {
        name: String,
        src: String,
        properties: Vec<Attribute>,
        children: Vec<NodeId>,
    },
    Key {
        expression: String,
        children: Vec<NodeId>,
    },
    If {
        branches: Vec<Branch>,
        else_children: Option<Vec<NodeId>>,
    },
    Each {
        expression: String,
        binding: String,
        key: Option<String>,
        index: Option<String>,
        children: Vec<NodeId>,
        else_children: Option<Vec<NodeId>>,
    },
    Await {
        expression: String,
        then: AwaitArm,
        catch: Option<AwaitArm>,
    },
    AwaitCatch {
        expression: String,
        catch: AwaitArm,
    },
    Expression {
        expression: String,
    },
    Html {
        expression: String,
    },
}

/// Children taken out of an element during a replacement.
///
/// `secondary` carries the `else`/`catch` list of the source variant. Its
/// presence matters: an empty `Some` still produces an `else` clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Migration {
    pub primary: Vec<NodeId>,
    pub secondary: Option<Vec<NodeId>>,
}

impl Migration {
    /// Both lists as one, primary first.
    pub fn flatten(self) -> Vec<NodeId> {
        let mut nodes = self.primary;
        nodes.extend(self.secondary.unwrap_or_default());
        nodes
    }
}

impl Element {
    pub fn markup(tag_name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Element::Markup {
            tag_name: tag_name.into(),
            attributes,
            children: Vec::new(),
        }
    }

    pub fn component(
        name: impl Into<String>,
        src: impl Into<String>,
        properties: Vec<Attribute>,
    ) -> Self {
        Element::Component {
            name: name.into(),
            src: src.into(),
            properties,
            children: Vec::new(),
        }
    }

    pub fn key(expression: impl Into<String>) -> Self {
        Element::Key {
            expression: expression.into(),
            children: Vec::new(),
        }
    }

    pub fn if_block<S: Into<String>>(
        conditions: impl IntoIterator<Item = S>,
        with_else: bool,
    ) -> Self {
        Element::If {
            branches: conditions
                .into_iter()
                .map(|condition| Branch {
                    condition: condition.into(),
                    children: Vec::new(),
                })
                .collect(),
            else_children: with_else.then(Vec::new),
        }
    }

    pub fn each(binding: EachBinding, with_else: bool) -> Self {
        Element::Each {
            expression: binding.expression,
            binding: binding.binding,
            key: binding.key,
            index: binding.index,
            children: Vec::new(),
            else_children: with_else.then(Vec::new),
        }
    }

    pub fn await_block(binding: AwaitBinding) -> Self {
        Element::Await {
            expression: binding.expression,
            then: AwaitArm {
                expression: binding.then_expression,
                children: Vec::new(),
            },
            catch: binding.catch_expression.map(|expression| AwaitArm {
                expression,
                children: Vec::new(),
            }),
        }
    }

    pub fn await_catch(expression: impl Into<String>, catch_expression: impl Into<String>) -> Self {
        Element::AwaitCatch {
            expression: expression.into(),
            catch: AwaitArm {
                expression: catch_expression.into(),
                children: Vec::new(),
            },
        }
    }

    pub fn expression(expression: impl Into<String>) -> Self {
        Element::Expression {
            expression: expression.into(),
        }
    }

    pub fn html(expression: impl Into<String>) -> Self {
        Element::Html {
            expression: expression.into(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Markup { .. } => ElementKind::Markup,
            Element::Component { .. } => ElementKind::Component,
            Element::Key { .. } => ElementKind::Key,
            Element::If { .. } => ElementKind::If,
            Element::Each { .. } => ElementKind::Each,
            Element::Await { .. } => ElementKind::Await,
            Element::AwaitCatch { .. } => ElementKind::AwaitCatch,
            Element::Expression { .. } => ElementKind::Expression,
            Element::Html { .. } => ElementKind::Html,
        }
    }

    /// Owned child lists in declaration order.
    ///
    /// This is the one place that knows the per-variant layout; traversal,
    /// relinking and migration all go through it.
    pub fn parts(&self) -> Vec<&[NodeId]> {
        match self {
            Element::Markup { children, .. }
            | Element::Component { children, .. }
            | Element::Key { children, .. } => vec![children.as_slice()],
            Element::If {
                branches,
                else_children,
            } => branches
                .iter()
                .map(|branch| branch.children.as_slice())
                .chain(else_children.as_deref())
                .collect(),
            Element::Each {
                children,
                else_children,
                ..
            } => std::iter::once(children.as_slice())
                .chain(else_children.as_deref())
                .collect(),
            Element::Await { then, catch, .. } => std::iter::once(then.children.as_slice())
                .chain(catch.as_ref().map(|arm| arm.children.as_slice()))
                .collect(),
            Element::AwaitCatch { catch, .. } => vec![catch.children.as_slice()],
            Element::Expression { .. } | Element::Html { .. } => Vec::new(),
        }
    }

    /// Mutable view of [`Element::parts`], same order.
    pub fn parts_mut(&mut self) -> Vec<&mut Vec<NodeId>> {
        match self {
            Element::Markup { children, .. }
            | Element::Component { children, .. }
            | Element::Key { children, .. } => vec![children],
            Element::If {
                branches,
                else_children,
            } => branches
                .iter_mut()
                .map(|branch| &mut branch.children)
                .chain(else_children.as_mut())
                .collect(),
            Element::Each {
                children,
                else_children,
                ..
            } => std::iter::once(children)
                .chain(else_children.as_mut())
                .collect(),
            Element::Await { then, catch, .. } => std::iter::once(&mut then.children)
                .chain(catch.as_mut().map(|arm| &mut arm.children))
                .collect(),
            Element::AwaitCatch { catch, .. } => vec![&mut catch.children],
            Element::Expression { .. } | Element::Html { .. } => Vec::new(),
        }
    }

    /// All owned children, parts concatenated in order.
    pub fn children(&self) -> Vec<NodeId> {
        self.parts().into_iter().flatten().copied().collect()
    }

    pub fn has_children(&self) -> bool {
        self.parts().iter().any(|part| !part.is_empty())
    }

    /// True when every owned list is empty, i.e. the element can be placed
    /// in a tree without dragging other nodes along.
    pub fn is_detached(&self) -> bool {
        !self.has_children()
    }

    /// Index of the last part the cursor can step through.
    pub fn last_part(&self) -> usize {
        match self {
            Element::If {
                branches,
                else_children,
            } => {
                if else_children.is_some() {
                    branches.len()
                } else {
                    branches.len().saturating_sub(1)
                }
            }
            Element::Each { else_children, .. } => usize::from(else_children.is_some()),
            // await exposes a single navigable part until its part model is finished
            Element::Await { .. } => 0,
            Element::Markup { .. }
            | Element::Component { .. }
            | Element::Key { .. }
            | Element::AwaitCatch { .. }
            | Element::Expression { .. }
            | Element::Html { .. } => 0,
        }
    }

    /// First child of the primary part (first `if` branch, `each` body,
    /// `await` then arm). Other parts are never entered.
    pub fn first_child(&self) -> Option<NodeId> {
        self.parts()
            .first()
            .and_then(|part| part.first())
            .copied()
    }

    /// Last child of the trailing part: the else/catch list when present
    /// and non-empty, otherwise the last branch, body or then arm.
    pub fn last_child(&self) -> Option<NodeId> {
        match self {
            Element::If {
                branches,
                else_children,
            } => else_children
                .as_ref()
                .and_then(|ids| ids.last())
                .or_else(|| branches.last().and_then(|branch| branch.children.last()))
                .copied(),
            Element::Each {
                children,
                else_children,
                ..
            } => else_children
                .as_ref()
                .and_then(|ids| ids.last())
                .or_else(|| children.last())
                .copied(),
            Element::Await { then, catch, .. } => catch
                .as_ref()
                .and_then(|arm| arm.children.last())
                .or_else(|| then.children.last())
                .copied(),
            Element::Markup { children, .. }
            | Element::Component { children, .. }
            | Element::Key { children, .. }
            | Element::AwaitCatch {
                catch: AwaitArm { children, .. },
                ..
            } => children.last().copied(),
            Element::Expression { .. } | Element::Html { .. } => None,
        }
    }

    /// Index of the owned part that holds `child`.
    pub fn part_containing(&self, child: NodeId) -> Option<usize> {
        self.parts()
            .iter()
            .position(|part| part.contains(&child))
    }

    /// Whether new children may be inserted into this element's parts.
    pub fn accepts_children(&self) -> bool {
        match self {
            Element::Markup { .. }
            | Element::Component { .. }
            | Element::Key { .. }
            | Element::If { .. }
            | Element::Each { .. } => true,
            // insertion into await blocks is not supported yet
            Element::Await { .. } | Element::AwaitCatch { .. } => false,
            Element::Expression { .. } | Element::Html { .. } => false,
        }
    }

    /// Owned-part index designated by the cursor part for append/prepend.
    ///
    /// For `if`, part `branches.len()` names the else list; for `each`,
    /// any part other than 0 names the else list. Missing lists and
    /// containers that do not accept children yield `None`.
    pub fn insertion_part(&self, part: usize) -> Option<usize> {
        match self {
            Element::Markup { .. } | Element::Component { .. } | Element::Key { .. } => Some(0),
            Element::If {
                branches,
                else_children,
            } => {
                if part == branches.len() {
                    else_children.as_ref().map(|_| part)
                } else {
                    (part < branches.len()).then_some(part)
                }
            }
            Element::Each { else_children, .. } => {
                if part == 0 {
                    Some(0)
                } else {
                    else_children.as_ref().map(|_| 1)
                }
            }
            Element::Await { .. } | Element::AwaitCatch { .. } => None,
            Element::Expression { .. } | Element::Html { .. } => None,
        }
    }

    /// Moves every owned child out, following the migration table.
    ///
    /// The element keeps its other fields and is left with empty lists.
    pub fn take_children(&mut self) -> Migration {
        match self {
            Element::Markup { children, .. }
            | Element::Component { children, .. }
            | Element::Key { children, .. } => Migration {
                primary: std::mem::take(children),
                secondary: None,
            },
            Element::If {
                branches,
                else_children,
            } => Migration {
                primary: branches
                    .iter_mut()
                    .flat_map(|branch| std::mem::take(&mut branch.children))
                    .collect(),
                secondary: else_children.take(),
            },
            Element::Each {
                children,
                else_children,
                ..
            } => Migration {
                primary: std::mem::take(children),
                secondary: else_children.take(),
            },
            Element::Await { then, catch, .. } => Migration {
                primary: std::mem::take(&mut then.children),
                secondary: catch.as_mut().map(|arm| std::mem::take(&mut arm.children)),
            },
            Element::AwaitCatch { catch, .. } => Migration {
                primary: std::mem::take(&mut catch.children),
                secondary: None,
            },
            Element::Expression { .. } | Element::Html { .. } => Migration::default(),
        }
    }
}
