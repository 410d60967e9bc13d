//! Creation requests for detached elements.

use crate::domain::element::{Attribute, AwaitBinding, EachBinding, Element};

/// Discriminated request describing a new element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementRequest {
    Markup {
        tag_name: String,
        attributes: Vec<Attribute>,
    },
    Component {
        name: String,
        src: String,
        properties: Vec<Attribute>,
    },
    If {
        /// One condition per branch, first one is the `{#if}` clause
        conditions: Vec<String>,
        with_else: bool,
    },
    Each {
        binding: EachBinding,
        with_else: bool,
    },
    Await(AwaitBinding),
    AwaitCatch {
        expression: String,
        catch_expression: String,
    },
    Key {
        expression: String,
    },
    Expression {
        expression: String,
        /// Raw markup interpolation (`{@html ...}`)
        html: bool,
    },
}

/// Builds a detached element with empty, correctly shaped child lists.
pub fn create_element(request: ElementRequest) -> Element {
    match request {
        ElementRequest::Markup {
            tag_name,
            attributes,
        } => Element::markup(tag_name, attributes),
        ElementRequest::Component {
            name,
            src,
            properties,
        } => Element::component(name, src, properties),
        ElementRequest::If {
            conditions,
            with_else,
        } => Element::if_block(conditions, with_else),
        ElementRequest::Each { binding, with_else } => Element::each(binding, with_else),
        ElementRequest::Await(binding) => Element::await_block(binding),
        ElementRequest::AwaitCatch {
            expression,
            catch_expression,
        } => Element::await_catch(expression, catch_expression),
        ElementRequest::Key { expression } => Element::key(expression),
        ElementRequest::Expression { expression, html } => {
            if html {
                Element::html(expression)
            } else {
                Element::expression(expression)
            }
        }
    }
}

impl From<ElementRequest> for Element {
    fn from(request: ElementRequest) -> Self {
        create_element(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::element::ElementKind;

    #[test]
    fn given_if_request_with_else_when_creating_then_has_empty_branches_and_else() {
        let element = create_element(ElementRequest::If {
            conditions: vec!["a".into(), "b".into(), "c".into()],
            with_else: true,
        });

        match element {
            Element::If {
                branches,
                else_children,
            } => {
                assert_eq!(branches.len(), 3);
                assert!(branches.iter().all(|b| b.children.is_empty()));
                assert_eq!(branches[1].condition, "b");
                assert_eq!(else_children, Some(vec![]));
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn given_if_request_without_else_when_creating_then_has_no_else() {
        let element = create_element(ElementRequest::If {
            conditions: vec!["a".into()],
            with_else: false,
        });
        assert!(matches!(
            element,
            Element::If {
                else_children: None,
                ..
            }
        ));
    }

    #[test]
    fn given_expression_request_with_html_flag_when_creating_then_html_variant() {
        let element: Element = ElementRequest::Expression {
            expression: "raw".into(),
            html: true,
        }
        .into();
        assert_eq!(element.kind(), ElementKind::Html);
    }

    #[test]
    fn given_each_request_when_creating_then_keeps_binders() {
        let element = create_element(ElementRequest::Each {
            binding: EachBinding::new("items", "item")
                .with_index("i")
                .with_key("item.id"),
            with_else: false,
        });
        match element {
            Element::Each {
                expression,
                binding,
                key,
                index,
                children,
                else_children,
            } => {
                assert_eq!(expression, "items");
                assert_eq!(binding, "item");
                assert_eq!(key.as_deref(), Some("item.id"));
                assert_eq!(index.as_deref(), Some("i"));
                assert!(children.is_empty());
                assert!(else_children.is_none());
            }
            other => panic!("expected each, got {:?}", other),
        }
    }
}
