//! Applies parsed edit commands to a tree.

use termtree::Tree as TermTree;
use tracing::{debug, instrument, trace};

use crate::application::script::{EditCommand, Motion, ScriptLine};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{ElementRequest, RenderOptions, Tree, TreeOutline};

/// A tree plus the settings used while editing it.
#[derive(Debug, Clone)]
pub struct EditSession {
    tree: Tree,
    options: RenderOptions,
    /// Verify invariants after every mutating command
    check: bool,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(Tree::new(), RenderOptions::default(), false)
    }
}

impl EditSession {
    pub fn new(tree: Tree, options: RenderOptions, check: bool) -> Self {
        Self {
            tree,
            options,
            check,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    pub fn render(&self) -> String {
        self.tree.render_with(&self.options)
    }

    pub fn outline(&self) -> TermTree<String> {
        self.tree.to_outline()
    }

    /// Applies one command; returns output for `print` and `outline`.
    pub fn apply(&mut self, command: &EditCommand) -> ApplicationResult<Option<String>> {
        trace!(?command, "apply");
        let mutated = match command {
            EditCommand::Select(motion) => {
                self.select(*motion);
                false
            }
            EditCommand::Replace(request) => {
                self.replace(request.clone());
                true
            }
            EditCommand::Insert(position, request) => {
                if self
                    .tree
                    .insert_element(*position, request.clone().into())
                    .is_none()
                {
                    debug!(?position, "insertion not possible at cursor, ignored");
                }
                true
            }
            EditCommand::Remove => {
                if self.tree.remove_selected().is_none() {
                    debug!("root cannot be removed, ignored");
                }
                true
            }
            EditCommand::Print => return Ok(Some(self.render())),
            EditCommand::Outline => return Ok(Some(self.outline().to_string())),
            EditCommand::Check => {
                self.tree.check_invariants()?;
                false
            }
        };
        if mutated && self.check {
            self.tree.check_invariants()?;
        }
        Ok(None)
    }

    /// Applies a parsed script, collecting the output of every
    /// `print`/`outline` command. Errors carry the failing line.
    #[instrument(level = "debug", skip(self, lines), fields(commands = lines.len()))]
    pub fn run(&mut self, lines: &[ScriptLine]) -> ApplicationResult<Vec<String>> {
        let mut outputs = Vec::new();
        for ScriptLine { line, command } in lines {
            match self.apply(command) {
                Ok(Some(output)) => outputs.push(output),
                Ok(None) => {}
                Err(ApplicationError::Domain(e)) => {
                    return Err(ApplicationError::script(*line, e.to_string()))
                }
                Err(e) => return Err(e),
            }
        }
        Ok(outputs)
    }

    fn select(&mut self, motion: Motion) {
        match motion {
            Motion::Next => self.tree.select_next_sibling(),
            Motion::Prev => self.tree.select_prev_sibling(),
            Motion::Parent => self.tree.select_parent(),
            Motion::FirstChild => self.tree.select_first_child(),
            Motion::LastChild => self.tree.select_last_child(),
            Motion::Root => self.tree.select_root(),
        }
    }

    fn replace(&mut self, request: ElementRequest) {
        match request {
            ElementRequest::Markup {
                tag_name,
                attributes,
            } => self.tree.replace_with_element(tag_name, attributes),
            ElementRequest::Component {
                name,
                src,
                properties,
            } => self.tree.replace_with_component(name, src, properties),
            ElementRequest::If { conditions, .. } => {
                let condition = conditions.into_iter().next().unwrap_or_default();
                self.tree.replace_with_if(condition)
            }
            ElementRequest::Each { binding, .. } => self.tree.replace_with_each(binding),
            ElementRequest::Await(binding) => self.tree.replace_with_await(binding),
            ElementRequest::Key { expression } => self.tree.replace_with_key(expression),
            ElementRequest::Expression { expression, html } => {
                self.tree.replace_with_expression(expression, html)
            }
            // Rejected by the parser; there is no replacement form for it
            ElementRequest::AwaitCatch { .. } => {
                debug!("await:catch is not a replacement target, ignored")
            }
        }
    }
}
