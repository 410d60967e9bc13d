//! Integration tests for replacement, insertion and removal.

use rstest::rstest;

use svisuelte::domain::{
    create_element, AwaitBinding, EachBinding, Element, ElementKind, ElementRequest,
    InsertPosition, NodeId, Tree,
};
use svisuelte::util::testing;

/// Root `<div>` holding `{a}` and `{b}`, cursor on the root.
fn div_with_two_expressions() -> (Tree, NodeId, NodeId) {
    testing::init_test_setup();
    let mut tree = Tree::new();
    let a = tree.append_child_element(Element::expression("a")).unwrap();
    let b = tree.append_child_element(Element::expression("b")).unwrap();
    (tree, a, b)
}

fn assert_links(
    tree: &Tree,
    id: NodeId,
    parent: NodeId,
    prev: Option<NodeId>,
    next: Option<NodeId>,
) {
    let node = tree.node(id).unwrap();
    assert_eq!(node.parent, Some(parent), "parent of {id:?}");
    assert_eq!(node.prev, prev, "prev of {id:?}");
    assert_eq!(node.next, next, "next of {id:?}");
}

// ============================================================
// Replacement
// ============================================================

#[test]
fn given_markup_with_two_expressions_when_replacing_with_each_then_children_kept_in_order() {
    let (mut tree, a, b) = div_with_two_expressions();
    let root = tree.root();

    tree.replace_with_each(EachBinding::new("items", "item"));

    match tree.selected_element() {
        Element::Each {
            children,
            else_children,
            ..
        } => {
            assert_eq!(children, &vec![a, b]);
            assert!(else_children.is_none());
        }
        other => panic!("expected each, got {other:?}"),
    }
    assert_links(&tree, a, root, None, Some(b));
    assert_links(&tree, b, root, Some(a), None);
    assert_eq!(tree.render(), "{#each items as item}\n\t{a}\n\t{b}\n{/each}\n");
    tree.check_invariants().unwrap();
}

#[rstest]
#[case::element(|t: &mut Tree| t.replace_with_element("section", vec![]), ElementKind::Markup)]
#[case::component(
    |t: &mut Tree| t.replace_with_component("Card", "./Card.svelte", vec![]),
    ElementKind::Component
)]
#[case::key(|t: &mut Tree| t.replace_with_key("id"), ElementKind::Key)]
#[case::if_block(|t: &mut Tree| t.replace_with_if("ok"), ElementKind::If)]
#[case::each(|t: &mut Tree| t.replace_with_each(EachBinding::new("xs", "x")), ElementKind::Each)]
#[case::await_block(|t: &mut Tree| t.replace_with_await(AwaitBinding {
    expression: "p".into(),
    then_expression: "v".into(),
    catch_expression: None,
}), ElementKind::Await)]
fn given_children_when_replacing_then_all_children_preserved(
    #[case] replace: fn(&mut Tree),
    #[case] kind: ElementKind,
) {
    let (mut tree, a, b) = div_with_two_expressions();
    let len = tree.len();

    replace(&mut tree);

    assert_eq!(tree.selected_element().kind(), kind);
    assert_eq!(tree.children(tree.root()), vec![a, b]);
    assert_eq!(tree.len(), len);
    assert_eq!(tree.part(), 0);
    tree.check_invariants().unwrap();
}

#[test]
fn given_each_with_else_when_replacing_with_markup_then_else_appended_after_body() {
    testing::init_test_setup();
    let mut tree = Tree::new();
    tree.append_child_element(Element::each(EachBinding::new("xs", "x"), true))
        .unwrap();
    tree.select_first_child();
    let body = tree.append_child_element(Element::expression("x")).unwrap();
    tree.select_next_sibling();
    let fallback = tree.append_child_element(Element::expression("none")).unwrap();

    tree.replace_with_element("ul", vec![]);

    assert_eq!(tree.children(tree.selected()), vec![body, fallback]);
    assert_eq!(tree.part(), 0);
    tree.check_invariants().unwrap();
}

#[test]
fn given_each_with_else_when_replacing_with_if_then_else_list_carried_over() {
    testing::init_test_setup();
    let mut tree = Tree::new();
    tree.append_child_element(Element::each(EachBinding::new("xs", "x"), true))
        .unwrap();
    tree.select_first_child();
    let body = tree.append_child_element(Element::expression("x")).unwrap();
    tree.select_next_sibling();
    let fallback = tree.append_child_element(Element::expression("none")).unwrap();

    tree.replace_with_if("xs.length");

    match tree.selected_element() {
        Element::If {
            branches,
            else_children,
        } => {
            assert_eq!(branches.len(), 1);
            assert_eq!(branches[0].condition, "xs.length");
            assert_eq!(branches[0].children, vec![body]);
            assert_eq!(else_children.as_deref(), Some(&[fallback][..]));
        }
        other => panic!("expected if, got {other:?}"),
    }
    tree.check_invariants().unwrap();
}

#[test]
fn given_if_chain_with_else_when_replacing_with_if_then_branches_flatten_in_order() {
    testing::init_test_setup();
    let mut tree = Tree::new();
    tree.append_child_element(Element::if_block(["a", "b", "c"], true))
        .unwrap();
    tree.select_first_child();
    let mut filled = Vec::new();
    for name in ["p0", "p1", "p2", "fallback"] {
        filled.push(tree.append_child_element(Element::expression(name)).unwrap());
        tree.select_next_sibling();
    }

    tree.replace_with_if("ok");

    match tree.selected_element() {
        Element::If {
            branches,
            else_children,
        } => {
            assert_eq!(branches.len(), 1);
            assert_eq!(branches[0].children, filled[..3].to_vec());
            assert_eq!(else_children.as_deref(), Some(&filled[3..]));
        }
        other => panic!("expected if, got {other:?}"),
    }
    assert_eq!(tree.part(), 0);
    tree.check_invariants().unwrap();
}

#[test]
fn given_await_with_then_and_catch_children_when_replacing_then_catch_is_secondary() {
    testing::init_test_setup();
    let mut tree = Tree::new();
    tree.append_child_element(Element::each(EachBinding::new("xs", "x"), true))
        .unwrap();
    tree.select_first_child();
    let resolved = tree.append_child_element(Element::expression("v")).unwrap();
    tree.select_next_sibling();
    let failed = tree.append_child_element(Element::expression("err")).unwrap();
    tree.replace_with_await(AwaitBinding {
        expression: "p".into(),
        then_expression: "v".into(),
        catch_expression: Some("err".into()),
    });

    tree.replace_with_each(EachBinding::new("ys", "y"));

    match tree.selected_element() {
        Element::Each {
            children,
            else_children,
            ..
        } => {
            assert_eq!(children, &vec![resolved]);
            assert_eq!(else_children.as_deref(), Some(&[failed][..]));
        }
        other => panic!("expected each, got {other:?}"),
    }

    tree.replace_with_await(AwaitBinding {
        expression: "p".into(),
        then_expression: "v".into(),
        catch_expression: Some("err".into()),
    });
    tree.replace_with_element("section", vec![]);

    assert_eq!(tree.children(tree.selected()), vec![resolved, failed]);
    tree.check_invariants().unwrap();
}

#[test]
fn given_element_owning_existing_node_when_appending_then_none_and_tree_unchanged() {
    let (mut tree, a, b) = div_with_two_expressions();
    let before = tree.render();
    let len = tree.len();
    let mut owning = Element::if_block(["ok"], false);
    if let Element::If { branches, .. } = &mut owning {
        branches[0].children.push(a);
    }

    assert_eq!(tree.append_child_element(owning), None);

    assert_eq!(tree.len(), len);
    assert_eq!(tree.children(tree.root()), vec![a, b]);
    assert_eq!(tree.render(), before);
    tree.check_invariants().unwrap();
}

#[test]
fn given_subtree_when_replacing_with_expression_then_subtree_discarded() {
    let (mut tree, a, _) = div_with_two_expressions();

    tree.replace_with_expression("label", false);

    assert_eq!(tree.len(), 1);
    assert!(tree.node(a).is_none());
    assert_eq!(tree.render(), "{label}\n");
    tree.check_invariants().unwrap();
}

// ============================================================
// Insertion
// ============================================================

#[test]
fn given_empty_root_when_appending_expression_then_renders_indented_child() {
    testing::init_test_setup();
    let mut tree = Tree::new();

    tree.append_child_element(Element::expression("x")).unwrap();

    assert_eq!(tree.render(), "<div>\n\t{x}\n</div>\n");
}

#[rstest]
#[case(InsertPosition::Append, vec!["a", "b", "new"])]
#[case(InsertPosition::Prepend, vec!["new", "a", "b"])]
fn given_root_selected_when_inserting_child_then_position_respected(
    #[case] position: InsertPosition,
    #[case] expected: Vec<&str>,
) {
    let (mut tree, _, _) = div_with_two_expressions();

    tree.insert_element(position, Element::expression("new")).unwrap();

    let texts: Vec<String> = tree
        .children(tree.root())
        .into_iter()
        .map(|id| match tree.element(id) {
            Some(Element::Expression { expression }) => expression.clone(),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(texts, expected);
    tree.check_invariants().unwrap();
}

#[rstest]
#[case(InsertPosition::Before, "<div>\n\t{a}\n\t{new}\n\t{b}\n</div>\n")]
#[case(InsertPosition::After, "<div>\n\t{a}\n\t{b}\n\t{new}\n</div>\n")]
fn given_selected_child_when_inserting_sibling_then_placed_next_to_it(
    #[case] position: InsertPosition,
    #[case] expected: &str,
) {
    let (mut tree, _, b) = div_with_two_expressions();
    tree.select_last_child();
    assert_eq!(tree.selected(), b);

    tree.insert_element(position, Element::expression("new")).unwrap();

    assert_eq!(tree.selected(), b);
    assert_eq!(tree.render(), expected);
    tree.check_invariants().unwrap();
}

#[rstest]
#[case(InsertPosition::Before)]
#[case(InsertPosition::After)]
fn given_root_selected_when_inserting_sibling_then_no_op(#[case] position: InsertPosition) {
    testing::init_test_setup();
    let mut tree = Tree::new();

    assert!(tree.insert_element(position, Element::expression("x")).is_none());
    assert_eq!(tree.len(), 1);
}

#[rstest]
#[case::expression(Element::expression("x"))]
#[case::html(Element::html("x"))]
#[case::await_catch(Element::await_catch("p", "e"))]
fn given_leaf_or_await_selected_when_appending_then_no_op(#[case] target: Element) {
    testing::init_test_setup();
    let mut tree = Tree::new();
    tree.append_child_element(target).unwrap();
    tree.select_first_child();

    assert!(tree.append_child_element(Element::expression("y")).is_none());
    assert_eq!(tree.len(), 2);
}

#[test]
fn given_cursor_on_else_part_when_appending_then_child_lands_in_else() {
    testing::init_test_setup();
    let mut tree = Tree::new();
    tree.append_child_element(Element::if_block(["a", "b"], true))
        .unwrap();
    tree.select_first_child();
    tree.select_next_sibling();
    tree.select_next_sibling();
    assert_eq!(tree.part(), 2);

    let id = tree.append_child_element(Element::expression("z")).unwrap();

    match tree.selected_element() {
        Element::If {
            branches,
            else_children,
        } => {
            assert!(branches.iter().all(|branch| branch.children.is_empty()));
            assert_eq!(else_children.as_deref(), Some(&[id][..]));
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn given_each_without_else_when_appending_then_body_used() {
    testing::init_test_setup();
    let mut tree = Tree::new();
    tree.append_child_element(Element::each(EachBinding::new("xs", "x"), false))
        .unwrap();
    tree.select_first_child();

    let id = tree.append_child_element(Element::expression("x")).unwrap();

    assert_eq!(tree.children(tree.selected()), vec![id]);
}

// ============================================================
// Creation shape
// ============================================================

#[rstest]
#[case(ElementRequest::If { conditions: vec!["a".into(), "b".into()], with_else: true }, 3, 2)]
#[case(ElementRequest::If { conditions: vec!["a".into()], with_else: false }, 1, 0)]
#[case(ElementRequest::Each { binding: EachBinding::new("xs", "x"), with_else: true }, 2, 1)]
#[case(ElementRequest::Each { binding: EachBinding::new("xs", "x"), with_else: false }, 1, 0)]
#[case(ElementRequest::Key { expression: "k".into() }, 1, 0)]
#[case(ElementRequest::Expression { expression: "e".into(), html: true }, 0, 0)]
fn given_request_when_creating_then_empty_parts_of_right_shape(
    #[case] request: ElementRequest,
    #[case] parts: usize,
    #[case] last_part: usize,
) {
    let element = create_element(request);

    assert_eq!(element.parts().len(), parts);
    assert!(element.parts().iter().all(|part| part.is_empty()));
    assert_eq!(element.last_part(), last_part);
    assert!(element.is_detached());
}

// ============================================================
// Removal
// ============================================================

#[test]
fn given_selected_middle_child_when_removing_then_next_selected_and_subtree_gone() {
    testing::init_test_setup();
    let mut tree = Tree::new();
    let a = tree.append_child_element(Element::expression("a")).unwrap();
    let section = tree
        .append_child_element(Element::markup("section", vec![]))
        .unwrap();
    let c = tree.append_child_element(Element::expression("c")).unwrap();
    tree.select_first_child();
    tree.select_next_sibling();
    let inner = tree.append_child_element(Element::expression("inner")).unwrap();

    assert_eq!(tree.remove_selected(), Some(section));

    assert_eq!(tree.selected(), c);
    assert!(tree.node(inner).is_none());
    assert_eq!(tree.len(), 3);
    assert_links(&tree, a, tree.root(), None, Some(c));
    tree.check_invariants().unwrap();
}

#[test]
fn given_only_child_when_removing_then_parent_selected() {
    let (mut tree, _, _) = div_with_two_expressions();
    tree.select_first_child();
    tree.remove_selected().unwrap();
    tree.remove_selected().unwrap();

    assert_eq!((tree.selected(), tree.part()), (tree.root(), 0));
    assert_eq!(tree.render(), "<div />\n");
    tree.check_invariants().unwrap();
}

#[test]
fn given_root_selected_when_removing_then_no_op() {
    testing::init_test_setup();
    let mut tree = Tree::new();

    assert!(tree.remove_selected().is_none());
    assert_eq!(tree.len(), 1);
}
